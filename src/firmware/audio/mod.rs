pub mod notes;
pub mod plan;
pub mod scores;
pub mod sequencer;

use core::cell::RefCell;

use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};
use esp_hal::handler;

use crate::drivers::tone_timer::ToneTimer;
use notes::Score;
use sequencer::Sequencer;

type DeviceSequencer = Sequencer<ToneTimer>;

// Shared with the compare-match interrupt; every access goes through the
// critical-section bracket below.
static SEQUENCER: Mutex<CriticalSectionRawMutex, RefCell<Option<DeviceSequencer>>> =
    Mutex::new(RefCell::new(None));

pub(crate) fn install(timer: ToneTimer, sound_enabled: bool) {
    let sequencer = Sequencer::new(
        timer,
        sound_enabled,
        Some(scores::SCORE_SOUND_OFF),
        scores::SCORE_TICK_MS,
    );
    SEQUENCER.lock(|cell| {
        cell.replace(Some(sequencer));
    });
}

pub(crate) fn interrupt_handler() -> esp_hal::interrupt::InterruptHandler {
    tone_alarm
}

pub(crate) fn request_tone(freq_hz: u32, duration_ms: u32, priority: u8) -> bool {
    with_sequencer(|seq| seq.request_tone(freq_hz, duration_ms, priority)).unwrap_or(false)
}

pub(crate) fn request_score(score: Score, priority: u8) -> bool {
    with_sequencer(|seq| seq.request_score(score, priority)).unwrap_or(false)
}

pub(crate) fn set_sound_enabled(enabled: bool) {
    let _ = with_sequencer(|seq| seq.set_sound_enabled(enabled));
}

/// True while a note is being toggled from interrupt context. The frame
/// loop holds off sensor bus traffic while this is set.
pub(crate) fn is_active() -> bool {
    with_sequencer(|seq| seq.is_active()).unwrap_or(false)
}

fn with_sequencer<R>(operation: impl FnOnce(&mut DeviceSequencer) -> R) -> Option<R> {
    SEQUENCER.lock(|cell| cell.borrow_mut().as_mut().map(operation))
}

#[handler]
fn tone_alarm() {
    SEQUENCER.lock(|cell| {
        if let Some(sequencer) = cell.borrow_mut().as_mut() {
            sequencer.on_compare_match();
        }
    });
}
