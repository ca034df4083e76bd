use core::sync::atomic::{AtomicU32, Ordering};

use esp_println::println;

static FRAMES: AtomicU32 = AtomicU32::new(0);
static SENSOR_READ_FAILURES: AtomicU32 = AtomicU32::new(0);
static SENSOR_READS_SKIPPED: AtomicU32 = AtomicU32::new(0);
static CALIBRATION_RESETS: AtomicU32 = AtomicU32::new(0);
static SOUNDS_PLAYED: AtomicU32 = AtomicU32::new(0);
static SOUNDS_DROPPED: AtomicU32 = AtomicU32::new(0);
static MATRIX_WRITE_FAILURES: AtomicU32 = AtomicU32::new(0);

pub(crate) fn record_frame() {
    FRAMES.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_sensor_failure() {
    SENSOR_READ_FAILURES.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_sensor_skip() {
    SENSOR_READS_SKIPPED.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_calibration_reset() {
    CALIBRATION_RESETS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_sound_played() {
    SOUNDS_PLAYED.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_sound_dropped() {
    SOUNDS_DROPPED.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_matrix_write_failure() {
    MATRIX_WRITE_FAILURES.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn log_summary() {
    println!(
        "stats: frames={} sensor_errs={} sensor_skips={} calib_resets={} sounds={}+{} dropped matrix_errs={}",
        FRAMES.load(Ordering::Relaxed),
        SENSOR_READ_FAILURES.load(Ordering::Relaxed),
        SENSOR_READS_SKIPPED.load(Ordering::Relaxed),
        CALIBRATION_RESETS.load(Ordering::Relaxed),
        SOUNDS_PLAYED.load(Ordering::Relaxed),
        SOUNDS_DROPPED.load(Ordering::Relaxed),
        MATRIX_WRITE_FAILURES.load(Ordering::Relaxed),
    );
}
