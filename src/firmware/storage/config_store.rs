use embedded_storage::{ReadStorage, Storage};
use esp_storage::FlashStorage;

use super::record::{decode_record, encode_record, UserConfig, RECORD_LEN};

/// Persists the user config record in the last flash sector.
pub struct ConfigStore<'d> {
    flash: FlashStorage<'d>,
    offset: u32,
}

impl<'d> ConfigStore<'d> {
    pub fn new(flash_peripheral: esp_hal::peripherals::FLASH<'d>) -> Self {
        let flash = FlashStorage::new(flash_peripheral).multicore_auto_park();
        let capacity = flash.capacity() as u32;
        let offset = capacity.saturating_sub(FlashStorage::SECTOR_SIZE);
        Self { flash, offset }
    }

    pub fn load(&mut self) -> Option<UserConfig> {
        let mut record = [0u8; RECORD_LEN];
        self.flash.read(self.offset, &mut record).ok()?;
        decode_record(&record)
    }

    /// Idempotent: the sector is only rewritten when the record changed.
    pub fn save(&mut self, config: UserConfig) {
        if self.load() == Some(config) {
            return;
        }
        let record = encode_record(&config);
        let _ = self.flash.write(self.offset, &record);
    }
}
