use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel};

use super::types::AppEvent;

pub(crate) const FRAME_PERIOD_MS: u64 = 50;

pub(crate) const BUTTON_POLL_MS: u64 = 10;
pub(crate) const BUTTON_DEBOUNCE_MS: u64 = 30;
pub(crate) const BUTTON_LONG_PRESS_MS: u64 = 400;
pub(crate) const BUTTON_HOLD_RESET_MS: u64 = 2000;

pub(crate) const BRIGHTNESS_LEVELS: [u8; 4] = [16, 40, 96, 160];

// Routine clicks rank lowest so milestone cues are never drowned out.
// Merge priority climbs with the resulting tile.
pub(crate) const SOUND_PRIORITY_MOVE: u8 = 2;
pub(crate) const SOUND_PRIORITY_MERGE_BASE: u8 = 3;
pub(crate) const SOUND_PRIORITY_START: u8 = 12;
pub(crate) const SOUND_PRIORITY_CALIBRATED: u8 = 12;
pub(crate) const SOUND_PRIORITY_GAME_OVER: u8 = 14;
pub(crate) const SOUND_PRIORITY_CONFIG: u8 = 15;

pub(crate) const MOVE_CLICK_NOTE: u8 = 88; // E7
pub(crate) const MOVE_CLICK_MS: u32 = 20;
pub(crate) const MERGE_TONE_BASE_NOTE: u8 = 52; // E4, climbing two semitones per tile
pub(crate) const MERGE_TONE_MS: u32 = 80;

pub(crate) static APP_EVENTS: Channel<CriticalSectionRawMutex, AppEvent, 4> = Channel::new();
