use super::{
    notes::{is_terminator, note_frequency, Score},
    plan::TonePlan,
};

pub const PRIORITY_IDLE: u8 = 0;

/// Hardware side of the square-wave output. `program` arms the compare
/// interrupt for a note, `silence` forces the pin low and disarms it.
pub trait ToneChannel {
    fn program(&mut self, plan: &TonePlan);
    fn acknowledge(&mut self);
    fn toggle_output(&mut self);
    fn silence(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ScoreCursor {
    score: Score,
    index: usize,
}

/// Observable sequencer state, used by tests to pin down the "rejected
/// request changes nothing" guarantee.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SequencerSnapshot {
    pub active: bool,
    pub priority: u8,
    pub toggles_left: u32,
    pub cursor_index: Option<usize>,
}

/// Monophonic note sequencer. The foreground writes requests under a
/// critical section; the compare-match interrupt drives all playback
/// progress, including advancing to the next score entry. The resume point
/// is exactly the stored cursor plus the toggle countdown.
pub struct Sequencer<C: ToneChannel> {
    channel: C,
    sound_enabled: bool,
    /// Score admitted even while sound is disabled, so the mute toggle can
    /// always voice its own confirmation.
    bypass_score: Option<Score>,
    tick_ms: u32,
    cursor: Option<ScoreCursor>,
    toggles_left: u32,
    priority: u8,
}

impl<C: ToneChannel> Sequencer<C> {
    pub fn new(channel: C, sound_enabled: bool, bypass_score: Option<Score>, tick_ms: u32) -> Self {
        Self {
            channel,
            sound_enabled,
            bypass_score,
            tick_ms,
            cursor: None,
            toggles_left: 0,
            priority: PRIORITY_IDLE,
        }
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    /// A note is in progress and the compare interrupt is armed.
    pub fn is_active(&self) -> bool {
        self.toggles_left > 0
    }

    pub fn snapshot(&self) -> SequencerSnapshot {
        SequencerSnapshot {
            active: self.is_active(),
            priority: self.priority,
            toggles_left: self.toggles_left,
            cursor_index: self.cursor.map(|cursor| cursor.index),
        }
    }

    /// Single note. Dropped silently unless it outranks the sound in
    /// progress; returns whether the request took over the channel.
    pub fn request_tone(&mut self, freq_hz: u32, duration_ms: u32, priority: u8) -> bool {
        if !self.sound_enabled || priority < self.priority {
            return false;
        }
        let Some(plan) = TonePlan::new(freq_hz, duration_ms) else {
            return false;
        };

        self.channel.silence();
        self.cursor = None;
        self.priority = priority;
        self.toggles_left = plan.toggles;
        self.channel.program(&plan);
        true
    }

    pub fn request_score(&mut self, score: Score, priority: u8) -> bool {
        let bypasses_mute = self
            .bypass_score
            .is_some_and(|bypass| core::ptr::eq(bypass.as_ptr(), score.as_ptr()));
        if !(self.sound_enabled || bypasses_mute) || priority < self.priority {
            return false;
        }

        self.channel.silence();
        self.priority = priority;
        self.cursor = Some(ScoreCursor { score, index: 0 });
        self.start_cursor_note();
        true
    }

    /// Runs in interrupt context: bounded work, no blocking calls.
    pub fn on_compare_match(&mut self) {
        self.channel.acknowledge();

        if self.toggles_left == 0 {
            // Spurious interrupt after a silence; keep the channel quiet.
            self.channel.silence();
            return;
        }

        self.toggles_left -= 1;
        if self.toggles_left > 0 {
            self.channel.toggle_output();
            return;
        }

        self.channel.silence();
        match self.cursor.as_mut() {
            Some(cursor) => {
                cursor.index += 1;
                self.start_cursor_note();
            }
            None => self.priority = PRIORITY_IDLE,
        }
    }

    fn start_cursor_note(&mut self) {
        let Some(cursor) = self.cursor else {
            self.enter_idle();
            return;
        };
        // A missing terminator decodes the same as the sentinel.
        let Some(entry) = cursor.score.get(cursor.index).copied() else {
            self.enter_idle();
            return;
        };
        if is_terminator(entry.note) {
            self.enter_idle();
            return;
        }

        let duration_ms = entry.ticks as u32 * self.tick_ms;
        match TonePlan::new(note_frequency(entry.note) as u32, duration_ms) {
            Some(plan) => {
                self.toggles_left = plan.toggles;
                self.channel.program(&plan);
            }
            None => self.enter_idle(),
        }
    }

    fn enter_idle(&mut self) {
        self.channel.silence();
        self.cursor = None;
        self.toggles_left = 0;
        self.priority = PRIORITY_IDLE;
    }
}

#[cfg(test)]
mod tests {
    use super::super::notes::{ScoreNote, SCORE_TERMINATOR};
    use super::*;

    #[derive(Default)]
    struct FakeChannel {
        programs: u32,
        silences: u32,
        toggles: u32,
        last_plan: Option<TonePlan>,
    }

    impl ToneChannel for FakeChannel {
        fn program(&mut self, plan: &TonePlan) {
            self.programs += 1;
            self.last_plan = Some(*plan);
        }

        fn acknowledge(&mut self) {}

        fn toggle_output(&mut self) {
            self.toggles += 1;
        }

        fn silence(&mut self) {
            self.silences += 1;
        }
    }

    static SHORT_SCORE: [ScoreNote; 2] = [ScoreNote { note: 60, ticks: 1 }, SCORE_TERMINATOR];
    static LONG_SCORE: [ScoreNote; 3] = [
        ScoreNote { note: 60, ticks: 2 },
        ScoreNote { note: 67, ticks: 1 },
        SCORE_TERMINATOR,
    ];
    static MUTE_CUE: [ScoreNote; 2] = [ScoreNote { note: 79, ticks: 1 }, SCORE_TERMINATOR];

    fn sequencer() -> Sequencer<FakeChannel> {
        Sequencer::new(FakeChannel::default(), true, Some(&MUTE_CUE), 25)
    }

    fn drain_note(seq: &mut Sequencer<FakeChannel>) {
        let before = seq.snapshot().cursor_index;
        for _ in 0..100_000 {
            seq.on_compare_match();
            if !seq.is_active() || seq.snapshot().cursor_index != before {
                return;
            }
        }
        panic!("note never completed");
    }

    #[test]
    fn lower_priority_request_leaves_state_untouched() {
        let mut seq = sequencer();
        assert!(seq.request_score(&LONG_SCORE, 5));

        let before = seq.snapshot();
        assert!(!seq.request_tone(440, 100, 4));
        assert!(!seq.request_score(&SHORT_SCORE, 4));
        assert_eq!(seq.snapshot(), before);
    }

    #[test]
    fn equal_priority_request_takes_over() {
        let mut seq = sequencer();
        assert!(seq.request_score(&LONG_SCORE, 5));
        assert!(seq.request_tone(440, 100, 5));
        assert_eq!(seq.snapshot().cursor_index, None);
    }

    #[test]
    fn score_completion_returns_to_idle_and_admits_low_priority() {
        let mut seq = sequencer();
        assert!(seq.request_score(&SHORT_SCORE, 5));
        assert!(seq.is_active());

        drain_note(&mut seq);

        let snapshot = seq.snapshot();
        assert!(!snapshot.active);
        assert_eq!(snapshot.priority, PRIORITY_IDLE);
        assert_eq!(snapshot.cursor_index, None);

        assert!(seq.request_tone(440, 20, 1));
    }

    #[test]
    fn interrupt_advances_through_every_score_entry() {
        let mut seq = sequencer();
        assert!(seq.request_score(&LONG_SCORE, 3));
        assert_eq!(seq.snapshot().cursor_index, Some(0));

        drain_note(&mut seq);
        assert_eq!(seq.snapshot().cursor_index, Some(1));
        assert!(seq.is_active());

        drain_note(&mut seq);
        assert!(!seq.is_active());
        assert_eq!(seq.snapshot().priority, PRIORITY_IDLE);
    }

    #[test]
    fn preempting_tone_abandons_the_score_cursor() {
        let mut seq = sequencer();
        assert!(seq.request_score(&LONG_SCORE, 5));
        assert!(seq.request_tone(880, 50, 10));

        let snapshot = seq.snapshot();
        assert_eq!(snapshot.cursor_index, None);
        assert_eq!(snapshot.priority, 10);

        // The abandoned score's sentinel is unreachable; the tone finishes
        // back to idle on its own.
        drain_note(&mut seq);
        assert_eq!(seq.snapshot().priority, PRIORITY_IDLE);
    }

    #[test]
    fn empty_score_decodes_straight_to_idle() {
        static EMPTY: [ScoreNote; 1] = [SCORE_TERMINATOR];
        let mut seq = sequencer();

        assert!(seq.request_score(&EMPTY, 7));
        let snapshot = seq.snapshot();
        assert!(!snapshot.active);
        assert_eq!(snapshot.priority, PRIORITY_IDLE);
        assert_eq!(snapshot.cursor_index, None);
    }

    #[test]
    fn sentinel_idles_the_channel_regardless_of_prior_state() {
        static EMPTY: [ScoreNote; 1] = [SCORE_TERMINATOR];
        let mut seq = sequencer();

        // Mid-playback with a queued score, a sentinel-first score still
        // lands the channel in the idle state.
        assert!(seq.request_score(&LONG_SCORE, 5));
        assert!(seq.is_active());
        assert!(seq.request_score(&EMPTY, 9));

        let snapshot = seq.snapshot();
        assert!(!snapshot.active);
        assert_eq!(snapshot.priority, PRIORITY_IDLE);
        assert_eq!(snapshot.cursor_index, None);
    }

    #[test]
    fn disabled_sound_drops_everything_but_the_mute_cue() {
        let mut seq = sequencer();
        seq.set_sound_enabled(false);

        assert!(!seq.request_tone(440, 50, 9));
        assert!(!seq.request_score(&SHORT_SCORE, 9));
        assert!(seq.request_score(&MUTE_CUE, 9));
        assert!(seq.is_active());
    }

    #[test]
    fn toggle_countdown_matches_the_plan() {
        let mut seq = sequencer();
        assert!(seq.request_tone(440, 100, 2));
        let plan = seq.channel.last_plan.expect("tone should program a plan");
        assert_eq!(plan.toggles, 88);
        assert_eq!(seq.snapshot().toggles_left, 88);

        // 87 interrupts flip the pin; the 88th forces it low instead.
        for _ in 0..87 {
            seq.on_compare_match();
        }
        assert_eq!(seq.channel.toggles, 87);
        assert!(seq.is_active());

        seq.on_compare_match();
        assert!(!seq.is_active());
        assert_eq!(seq.channel.toggles, 87);
    }
}
