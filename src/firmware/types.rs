use esp_hal_smartled::SmartLedsAdapter;

use crate::{
    drivers::{
        adxl345::Adxl345,
        pixel_grid::{PixelGrid, PIXEL_COUNT},
    },
    platform::{BusyDelay, HalI2c},
};

use super::storage::ConfigStore;

pub(crate) const MATRIX_RMT_BUFFER_LEN: usize = PIXEL_COUNT * 24 + 1;

pub(crate) type AccelDriver = Adxl345<HalI2c<'static>, BusyDelay>;
pub(crate) type MatrixDriver = PixelGrid<SmartLedsAdapter<'static, MATRIX_RMT_BUFFER_LEN>>;

pub(crate) struct DeviceContext {
    pub(crate) accel: AccelDriver,
    pub(crate) matrix: MatrixDriver,
    pub(crate) config_store: ConfigStore<'static>,
    pub(crate) seed: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AppEvent {
    BrightnessCycle,
    SoundToggle,
    NewGame,
}
