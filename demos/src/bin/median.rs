//! # Median Measurement
//! This example takes the median of 7 pings per reading.
//! A median is useful when the sensor sometimes picks up a stray reflection or misses an echo:
//! single outliers, including the `0` of a missed echo, do not move the result.
//!
//! Wiring as in the `single` example.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_time::{Delay, Duration, Instant, Timer};
use srf05::{calculate_speed_of_sound, Now, RangeSampler};
use {defmt_rtt as _, panic_probe as _};

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("Running!");

    let trigger = Output::new(p.PIN_13, Level::Low);
    let echo = Input::new(p.PIN_28, Pull::None);

    struct EmbassyClock;

    impl Now for EmbassyClock {
        fn now_micros(&self) -> u64 {
            Instant::now().as_micros()
        }
    }

    let mut sensor = unwrap!(RangeSampler::new(trigger, echo, (), EmbassyClock, Delay));

    // The temperature and humidity of the environment, if known, can be used to adjust the speed of sound.
    sensor.set_speed_of_sound(calculate_speed_of_sound(22.0, 45.0));
    sensor.set_mode_median(7);
    info!(
        "Mode {} with {} pings at {} m/s",
        sensor.operational_mode(),
        sensor.sample_count(),
        sensor.speed_of_sound()
    );

    loop {
        match sensor.millimeter() {
            Ok(distance) => info!("Median distance: {} mm (at {} ms)", distance, sensor.last_time()),
            Err(e) => info!("Measurement error: {:?}", e),
        }
        Timer::after(Duration::from_millis(200)).await;
    }
}
