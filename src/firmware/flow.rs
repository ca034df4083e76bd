use statig::{blocking::IntoStateMachineExt as _, prelude::*};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowMode {
    Calibrating,
    Playing,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowCommand {
    CalibrationDone,
    BoardLocked,
    NewGame,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FlowApplyStatus {
    #[default]
    Ignored,
    Applied,
}

#[derive(Default)]
struct DispatchContext {
    status: FlowApplyStatus,
}

/// Top-level mode machine: calibration runs first on an uncalibrated
/// device, then the game owns the device until the board locks.
pub struct ModeFlow {
    machine: statig::blocking::StateMachine<FlowMachine>,
}

impl ModeFlow {
    pub fn new(calibrated: bool) -> Self {
        let mut flow = Self {
            machine: FlowMachine {
                mode: FlowMode::Calibrating,
            }
            .state_machine(),
        };
        if calibrated {
            flow.apply(FlowCommand::CalibrationDone);
        }
        flow
    }

    pub fn mode(&self) -> FlowMode {
        self.machine.inner().mode
    }

    pub fn apply(&mut self, command: FlowCommand) -> FlowApplyStatus {
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&command, &mut context);
        context.status
    }
}

struct FlowMachine {
    mode: FlowMode,
}

#[state_machine(initial = "State::calibrating()")]
impl FlowMachine {
    #[state]
    fn calibrating(
        &mut self,
        context: &mut DispatchContext,
        event: &FlowCommand,
    ) -> Outcome<State> {
        match event {
            FlowCommand::CalibrationDone => {
                self.mode = FlowMode::Playing;
                context.status = FlowApplyStatus::Applied;
                Transition(State::playing())
            }
            _ => Handled,
        }
    }

    #[state]
    fn playing(&mut self, context: &mut DispatchContext, event: &FlowCommand) -> Outcome<State> {
        match event {
            FlowCommand::BoardLocked => {
                self.mode = FlowMode::GameOver;
                context.status = FlowApplyStatus::Applied;
                Transition(State::game_over())
            }
            FlowCommand::NewGame => {
                context.status = FlowApplyStatus::Applied;
                Handled
            }
            FlowCommand::CalibrationDone => Handled,
        }
    }

    #[state]
    fn game_over(&mut self, context: &mut DispatchContext, event: &FlowCommand) -> Outcome<State> {
        match event {
            FlowCommand::NewGame => {
                self.mode = FlowMode::Playing;
                context.status = FlowApplyStatus::Applied;
                Transition(State::playing())
            }
            _ => Handled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncalibrated_device_boots_into_calibration() {
        let flow = ModeFlow::new(false);
        assert_eq!(flow.mode(), FlowMode::Calibrating);
    }

    #[test]
    fn calibrated_device_skips_straight_to_playing() {
        let flow = ModeFlow::new(true);
        assert_eq!(flow.mode(), FlowMode::Playing);
    }

    #[test]
    fn board_lock_is_ignored_while_calibrating() {
        let mut flow = ModeFlow::new(false);
        assert_eq!(flow.apply(FlowCommand::BoardLocked), FlowApplyStatus::Ignored);
        assert_eq!(flow.mode(), FlowMode::Calibrating);
    }

    #[test]
    fn lock_and_restart_cycle() {
        let mut flow = ModeFlow::new(true);
        assert_eq!(flow.apply(FlowCommand::BoardLocked), FlowApplyStatus::Applied);
        assert_eq!(flow.mode(), FlowMode::GameOver);

        assert_eq!(flow.apply(FlowCommand::NewGame), FlowApplyStatus::Applied);
        assert_eq!(flow.mode(), FlowMode::Playing);
    }

    #[test]
    fn calibration_never_restarts_once_left() {
        let mut flow = ModeFlow::new(true);
        assert_eq!(
            flow.apply(FlowCommand::CalibrationDone),
            FlowApplyStatus::Ignored
        );
        assert_eq!(flow.mode(), FlowMode::Playing);
    }
}
