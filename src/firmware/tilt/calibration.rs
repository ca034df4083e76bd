use super::classifier::TiltSample;

const CALIBRATION_SAMPLES: u32 = 32;
// Manhattan distance between consecutive raw samples that still counts as
// holding the device still.
const STILLNESS_TOLERANCE: i32 = 12;
// One g in full-resolution counts (3.9 mg/LSB).
const AT_REST_COUNTS: i32 = 256;
// The board mounts the sensor component-side down; at rest Z reads -1 g.
const GRAVITY_SIGN: i32 = -1;
// Offset registers step at four data counts per LSB. Verified against
// hardware; do not fold into AT_REST_COUNTS.
const OFFSET_COUNTS_PER_LSB: i32 = 4;

/// One-shot zero-offset estimation. Samples are accepted only through the
/// stillness gate; any rejected sample discards all progress, so a commit
/// always comes from one uninterrupted still period.
pub struct CalibrationSession {
    stored: [i8; 3],
    sums: [i32; 3],
    accepted: u32,
    previous: Option<TiltSample>,
    committed: bool,
}

impl CalibrationSession {
    pub fn new(stored: [i8; 3]) -> Self {
        Self {
            stored,
            sums: [0; 3],
            accepted: 0,
            previous: None,
            committed: false,
        }
    }

    pub fn accepted_samples(&self) -> u32 {
        self.accepted
    }

    /// Feeds one raw sample. Returns the combined offsets to commit after
    /// the window fills; at most once per session.
    pub fn feed(&mut self, sample: TiltSample) -> Option<[i8; 3]> {
        if self.committed {
            return None;
        }

        if !self.accepts(sample) {
            self.sums = [0; 3];
            self.accepted = 0;
            self.previous = Some(sample);
            return None;
        }

        self.sums[0] += sample.x as i32;
        self.sums[1] += sample.y as i32;
        // Cancel gravity on the at-rest axis so the sum is pure bias.
        self.sums[2] += sample.z as i32 - GRAVITY_SIGN * AT_REST_COUNTS;
        self.accepted += 1;
        self.previous = Some(sample);

        if self.accepted < CALIBRATION_SAMPLES {
            return None;
        }

        self.committed = true;
        Some(self.combined_offsets())
    }

    fn accepts(&self, sample: TiltSample) -> bool {
        let Some(previous) = self.previous else {
            return false;
        };
        if sample.z as i32 * GRAVITY_SIGN <= AT_REST_COUNTS / 2 {
            return false;
        }
        manhattan(sample, previous) < STILLNESS_TOLERANCE
    }

    fn combined_offsets(&self) -> [i8; 3] {
        let mut offsets = [0i8; 3];
        for (axis, slot) in offsets.iter_mut().enumerate() {
            let average = self.sums[axis] / CALIBRATION_SAMPLES as i32;
            let adjust = average / OFFSET_COUNTS_PER_LSB;
            let combined = self.stored[axis] as i32 - adjust;
            *slot = combined.clamp(i8::MIN as i32, i8::MAX as i32) as i8;
        }
        offsets
    }
}

fn manhattan(a: TiltSample, b: TiltSample) -> i32 {
    (a.x as i32 - b.x as i32).abs()
        + (a.y as i32 - b.y as i32).abs()
        + (a.z as i32 - b.z as i32).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still(x: i16, y: i16, z: i16) -> TiltSample {
        TiltSample { x, y, z }
    }

    fn run_still_window(session: &mut CalibrationSession, sample: TiltSample) -> Option<[i8; 3]> {
        // First sample only primes the previous-sample slot.
        assert!(session.feed(sample).is_none());
        for _ in 0..CALIBRATION_SAMPLES - 1 {
            if let Some(offsets) = session.feed(sample) {
                return Some(offsets);
            }
        }
        session.feed(sample)
    }

    #[test]
    fn commit_happens_after_exactly_32_accepted_samples() {
        let mut session = CalibrationSession::new([0; 3]);
        let sample = still(0, 0, -256);

        assert!(session.feed(sample).is_none());
        for n in 0..CALIBRATION_SAMPLES - 1 {
            assert!(session.feed(sample).is_none(), "early commit at {n}");
        }
        assert_eq!(session.accepted_samples(), CALIBRATION_SAMPLES - 1);
        assert!(session.feed(sample).is_some());
    }

    #[test]
    fn motion_resets_accumulated_progress() {
        let mut session = CalibrationSession::new([0; 3]);
        let sample = still(4, -2, -260);

        assert!(session.feed(sample).is_none());
        for _ in 0..10 {
            assert!(session.feed(sample).is_none());
        }
        assert_eq!(session.accepted_samples(), 10);

        // A jolt larger than the tolerance discards everything.
        assert!(session.feed(still(40, -2, -260)).is_none());
        assert_eq!(session.accepted_samples(), 0);

        // Still usable afterwards: the full window commits from scratch.
        assert!(run_still_window(&mut session, still(40, -2, -260)).is_some());
    }

    #[test]
    fn gravity_gate_rejects_sideways_orientation() {
        let mut session = CalibrationSession::new([0; 3]);
        let sideways = still(250, 0, -40);

        for _ in 0..CALIBRATION_SAMPLES + 2 {
            assert!(session.feed(sideways).is_none());
        }
        assert_eq!(session.accepted_samples(), 0);
    }

    #[test]
    fn committed_offsets_cancel_the_measured_bias() {
        let bias = (22i32, -17i32, 9i32);
        let mut session = CalibrationSession::new([0; 3]);
        let sample = still(bias.0 as i16, bias.1 as i16, (-256 + bias.2) as i16);

        let offsets = run_still_window(&mut session, sample).expect("window should commit");

        // Each offset LSB shifts the output by four counts; the residual
        // after applying it must vanish within rounding.
        for (axis_bias, offset) in [bias.0, bias.1, bias.2].iter().zip(offsets) {
            let residual = axis_bias + offset as i32 * OFFSET_COUNTS_PER_LSB;
            assert!(
                residual.abs() < OFFSET_COUNTS_PER_LSB,
                "residual {residual} for bias {axis_bias}"
            );
        }
    }

    #[test]
    fn commit_combines_with_previously_stored_offsets() {
        let mut session = CalibrationSession::new([10, -10, 3]);
        let offsets =
            run_still_window(&mut session, still(0, 0, -256)).expect("window should commit");
        assert_eq!(offsets, [10, -10, 3]);
    }

    #[test]
    fn session_commits_at_most_once() {
        let mut session = CalibrationSession::new([0; 3]);
        let sample = still(0, 0, -256);
        assert!(run_still_window(&mut session, sample).is_some());

        for _ in 0..CALIBRATION_SAMPLES + 1 {
            assert!(session.feed(sample).is_none());
        }
    }
}
