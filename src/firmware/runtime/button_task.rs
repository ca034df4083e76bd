use embassy_time::{Duration, Instant, Timer};
use esp_hal::gpio::Input;

use super::super::{
    config::{
        APP_EVENTS, BUTTON_DEBOUNCE_MS, BUTTON_HOLD_RESET_MS, BUTTON_LONG_PRESS_MS, BUTTON_POLL_MS,
    },
    types::AppEvent,
};

/// Polls the (active-low) config button. Release duration picks the
/// action: tap cycles brightness, long press toggles sound, holding past
/// two seconds starts a new game.
#[embassy_executor::task]
pub(crate) async fn button_task(button: Input<'static>) {
    let mut pressed_since: Option<Instant> = None;
    loop {
        Timer::after(Duration::from_millis(BUTTON_POLL_MS)).await;

        match (button.is_low(), pressed_since) {
            (true, None) => pressed_since = Some(Instant::now()),
            (false, Some(since)) => {
                pressed_since = None;
                let held_ms = Instant::now().saturating_duration_since(since).as_millis();
                let event = if held_ms >= BUTTON_HOLD_RESET_MS {
                    Some(AppEvent::NewGame)
                } else if held_ms >= BUTTON_LONG_PRESS_MS {
                    Some(AppEvent::SoundToggle)
                } else if held_ms >= BUTTON_DEBOUNCE_MS {
                    Some(AppEvent::BrightnessCycle)
                } else {
                    None
                };
                if let Some(event) = event {
                    APP_EVENTS.send(event).await;
                }
            }
            _ => {}
        }
    }
}
