use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Ticker};
use esp_println::println;

use super::super::{
    audio::{self, notes::note_frequency, notes::Score, scores},
    config::{
        APP_EVENTS, BRIGHTNESS_LEVELS, FRAME_PERIOD_MS, MERGE_TONE_BASE_NOTE, MERGE_TONE_MS,
        MOVE_CLICK_MS, MOVE_CLICK_NOTE, SOUND_PRIORITY_CALIBRATED, SOUND_PRIORITY_CONFIG,
        SOUND_PRIORITY_GAME_OVER, SOUND_PRIORITY_MERGE_BASE, SOUND_PRIORITY_MOVE,
        SOUND_PRIORITY_START,
    },
    flow::{FlowCommand, FlowMode, ModeFlow},
    game::{Board, BoardEvent},
    render::Scene,
    storage::UserConfig,
    telemetry,
    tilt::{CalibrationSession, DirectionalIntent, TiltSample, TiltState},
    types::{AppEvent, DeviceContext},
};

struct GameLoopState {
    config: UserConfig,
    flow: ModeFlow,
    tilt: TiltState,
    calibration: Option<CalibrationSession>,
    board: Board,
}

#[embassy_executor::task]
pub(crate) async fn game_task(mut context: DeviceContext, initial_config: UserConfig) {
    let mut state = GameLoopState {
        flow: ModeFlow::new(initial_config.calibrated),
        tilt: TiltState::new(),
        calibration: (!initial_config.calibrated)
            .then(|| CalibrationSession::new(initial_config.offsets)),
        board: Board::new(context.seed),
        config: initial_config,
    };

    if matches!(state.flow.mode(), FlowMode::Playing) {
        request_score_counted(scores::SCORE_GAME_START, SOUND_PRIORITY_START);
    }

    let mut ticker = Ticker::every(Duration::from_millis(FRAME_PERIOD_MS));
    loop {
        match select(ticker.next(), APP_EVENTS.receive()).await {
            Either::First(()) => run_frame(&mut context, &mut state),
            Either::Second(event) => handle_app_event(event, &mut context, &mut state),
        }
    }
}

fn run_frame(context: &mut DeviceContext, state: &mut GameLoopState) {
    telemetry::record_frame();

    let intent = frame_intent(context, state);

    if matches!(state.flow.mode(), FlowMode::Playing | FlowMode::GameOver) {
        let events = state.board.step(intent);
        for event in events.iter() {
            match event {
                BoardEvent::MoveStarted => request_tone_counted(
                    note_frequency(MOVE_CLICK_NOTE),
                    MOVE_CLICK_MS,
                    SOUND_PRIORITY_MOVE,
                ),
                BoardEvent::Merged { tile } => {
                    let note = MERGE_TONE_BASE_NOTE + tile * 2;
                    let priority = SOUND_PRIORITY_MERGE_BASE.saturating_add(*tile);
                    request_tone_counted(note_frequency(note), MERGE_TONE_MS, priority);
                }
                BoardEvent::TileSpawned => {}
                BoardEvent::Locked => {
                    state.flow.apply(FlowCommand::BoardLocked);
                    request_score_counted(scores::SCORE_GAME_OVER, SOUND_PRIORITY_GAME_OVER);
                    telemetry::log_summary();
                }
            }
        }
    }

    let scene = match state.flow.mode() {
        FlowMode::Calibrating => Scene::Calibration { tilt: &state.tilt },
        _ => Scene::Game {
            board: &state.board,
        },
    };
    context.matrix.fill_with(|x, y| scene.pixel(x, y));
    if context.matrix.show().is_err() {
        telemetry::record_matrix_write_failure();
    }
}

/// Reads the sensor and classifies, unless the tone timer is mid-note: the
/// I2C transaction is never scheduled against timing-critical toggling, at
/// the cost of one frame of input latency.
fn frame_intent(context: &mut DeviceContext, state: &mut GameLoopState) -> DirectionalIntent {
    if audio::is_active() {
        telemetry::record_sensor_skip();
        return DirectionalIntent::default();
    }

    let Ok(axes) = context.accel.read_axes() else {
        // No update this frame; last classified state simply persists.
        telemetry::record_sensor_failure();
        return DirectionalIntent::default();
    };
    let sample = TiltSample {
        x: axes[0],
        y: axes[1],
        z: axes[2],
    };

    if state.calibration.is_some() {
        feed_calibration(context, state, sample);
        // Keep the raw tilt fresh for the calibration scene's glow.
        let _ = state.tilt.classify(sample);
        return DirectionalIntent::default();
    }

    state.tilt.classify(sample)
}

fn feed_calibration(context: &mut DeviceContext, state: &mut GameLoopState, sample: TiltSample) {
    let Some(session) = state.calibration.as_mut() else {
        return;
    };

    let accepted_before = session.accepted_samples();
    let Some(offsets) = session.feed(sample) else {
        if session.accepted_samples() < accepted_before {
            telemetry::record_calibration_reset();
        }
        return;
    };

    state.calibration = None;
    if context.accel.write_offsets(offsets).is_err() {
        println!("calibration: offset register write failed");
    }
    state.config.calibrated = true;
    state.config.offsets = offsets;
    context.config_store.save(state.config);
    println!(
        "calibration: committed offsets [{}, {}, {}]",
        offsets[0], offsets[1], offsets[2]
    );

    state.flow.apply(FlowCommand::CalibrationDone);
    state.board.restart();
    request_score_counted(scores::SCORE_CALIBRATED, SOUND_PRIORITY_CALIBRATED);
}

fn handle_app_event(event: AppEvent, context: &mut DeviceContext, state: &mut GameLoopState) {
    match event {
        AppEvent::BrightnessCycle => {
            let position = BRIGHTNESS_LEVELS
                .iter()
                .position(|&level| level == state.config.brightness)
                .unwrap_or(0);
            let next = BRIGHTNESS_LEVELS[(position + 1) % BRIGHTNESS_LEVELS.len()];
            state.config.brightness = next;
            context.matrix.set_brightness(next);
            context.config_store.save(state.config);
        }
        AppEvent::SoundToggle => {
            state.config.sound_enabled = !state.config.sound_enabled;
            audio::set_sound_enabled(state.config.sound_enabled);
            let cue = if state.config.sound_enabled {
                scores::SCORE_SOUND_ON
            } else {
                scores::SCORE_SOUND_OFF
            };
            request_score_counted(cue, SOUND_PRIORITY_CONFIG);
            context.config_store.save(state.config);
        }
        AppEvent::NewGame => {
            if matches!(state.flow.mode(), FlowMode::Calibrating) {
                return;
            }
            state.board.restart();
            state.flow.apply(FlowCommand::NewGame);
            request_score_counted(scores::SCORE_GAME_START, SOUND_PRIORITY_START);
        }
    }
}

fn request_tone_counted(freq_hz: u16, duration_ms: u32, priority: u8) {
    if audio::request_tone(freq_hz as u32, duration_ms, priority) {
        telemetry::record_sound_played();
    } else {
        telemetry::record_sound_dropped();
    }
}

fn request_score_counted(score: Score, priority: u8) {
    if audio::request_score(score, priority) {
        telemetry::record_sound_played();
    } else {
        telemetry::record_sound_dropped();
    }
}
