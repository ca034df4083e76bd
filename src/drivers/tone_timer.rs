use esp_hal::{
    gpio::Output,
    interrupt::InterruptHandler,
    time::Duration,
    timer::PeriodicTimer,
    Blocking,
};

use crate::firmware::audio::{plan::TonePlan, sequencer::ToneChannel};

/// Square-wave output channel: a hardware alarm timer plus the speaker pin.
/// The alarm fires once per half period; the sequencer flips the pin from
/// the interrupt handler.
pub struct ToneTimer {
    timer: PeriodicTimer<'static, Blocking>,
    pin: Output<'static>,
}

impl ToneTimer {
    pub fn new(
        mut timer: PeriodicTimer<'static, Blocking>,
        pin: Output<'static>,
        handler: InterruptHandler,
    ) -> Self {
        timer.set_interrupt_handler(handler);
        Self { timer, pin }
    }
}

impl ToneChannel for ToneTimer {
    fn program(&mut self, plan: &TonePlan) {
        let _ = self
            .timer
            .start(Duration::from_micros(plan.half_period_micros()));
        self.timer.enable_interrupt(true);
    }

    fn acknowledge(&mut self) {
        self.timer.clear_interrupt();
    }

    fn toggle_output(&mut self) {
        self.pin.toggle();
    }

    fn silence(&mut self) {
        self.timer.enable_interrupt(false);
        let _ = self.timer.cancel();
        self.pin.set_low();
    }
}
