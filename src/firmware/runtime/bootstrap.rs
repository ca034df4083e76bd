use esp_hal::{
    gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull},
    i2c::master::{Config as I2cConfig, I2c},
    rmt::Rmt,
    time::Rate,
    timer::{timg::TimerGroup, PeriodicTimer},
};
use esp_hal_smartled::{smart_led_buffer, SmartLedsAdapter};
use esp_println::println;
use static_cell::StaticCell;

use crate::{
    drivers::{adxl345::Adxl345, pixel_grid::PixelGrid, tone_timer::ToneTimer},
    platform::{BusyDelay, HalI2c},
};

use super::super::{
    audio,
    storage::{ConfigStore, UserConfig},
    types::DeviceContext,
};
use super::{button_task::button_task, game_task::game_task};

pub fn run() -> ! {
    let peripherals = esp_hal::init(esp_hal::Config::default());
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    println!("tiltmerge boot");

    let i2c = I2c::new(
        peripherals.I2C0,
        I2cConfig::default().with_frequency(Rate::from_khz(400)),
    )
    .expect("i2c init")
    .with_sda(peripherals.GPIO21)
    .with_scl(peripherals.GPIO22);
    let mut accel = Adxl345::new(HalI2c::new(i2c), BusyDelay::new());

    let mut config_store = ConfigStore::new(peripherals.FLASH);
    let config = config_store.load().unwrap_or_else(UserConfig::factory_default);

    let mut seed = 0x1357_9BDF;
    match accel.init() {
        Ok(()) => {
            if let Ok(axes) = accel.read_axes() {
                seed = axes
                    .iter()
                    .fold(0x9E37_79B9u32, |acc, &axis| acc.rotate_left(7) ^ axis as u16 as u32);
            }
            if config.calibrated && accel.write_offsets(config.offsets).is_err() {
                println!("boot: stored offsets not applied");
            }
        }
        Err(_) => println!("boot: accelerometer not responding"),
    }

    let rmt = Rmt::new(peripherals.RMT, Rate::from_mhz(80)).expect("rmt init");
    let strip = SmartLedsAdapter::new(rmt.channel0, peripherals.GPIO27, smart_led_buffer!(16));
    let matrix = PixelGrid::new(strip, config.brightness);

    // The tone timer lives in its own group so audio reprogramming never
    // touches the scheduler's timer.
    let timg1 = TimerGroup::new(peripherals.TIMG1);
    let tone_timer = ToneTimer::new(
        PeriodicTimer::new(timg1.timer0),
        Output::new(peripherals.GPIO25, Level::Low, OutputConfig::default()),
        audio::interrupt_handler(),
    );
    audio::install(tone_timer, config.sound_enabled);

    let button = Input::new(peripherals.GPIO0, InputConfig::default().with_pull(Pull::Up));

    let context = DeviceContext {
        accel,
        matrix,
        config_store,
        seed,
    };

    static EXECUTOR: StaticCell<esp_rtos::embassy::Executor> = StaticCell::new();
    let executor = EXECUTOR.init(esp_rtos::embassy::Executor::new());
    executor.run(|spawner| {
        spawner.must_spawn(button_task(button));
        spawner.must_spawn(game_task(context, config));
    })
}
