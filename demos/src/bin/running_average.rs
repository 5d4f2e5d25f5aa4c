//! # Running Average Measurement
//! This example smooths readings with an exponential running average.
//! Such filtering can be useful to reduce the noise in the measurements, especially when the sensor is mounted
//! on a moving platform where the angle and distance to objects can change rapidly.
//!
//! With `alpha = 0.2` every new ping contributes a fifth of the output. Lower values smooth more but follow
//! real changes more slowly. The first readings start from 0 and climb towards the true distance.
//!
//! The same sensor is then switched to averaging mode, which takes several pings per reading instead.
//!
//! Wiring as in the `single` example.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_time::{Delay, Duration, Instant, Timer};
use srf05::{Config, DistanceUnit, Mode, Now, RangeSampler};
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

    let config = Config {
        mode: Mode::RunningAverage,
        alpha: 0.2,
        ..Default::default()
    };
    let mut sensor = unwrap!(RangeSampler::with_config(
        trigger,
        echo,
        (),
        EmbassyClock,
        Delay,
        config
    ));

    for _ in 0..50 {
        match sensor.distance(DistanceUnit::Centimeters) {
            Ok(distance) => info!("Smoothed distance: {} cm", distance),
            Err(e) => info!("Measurement error: {:?}", e),
        }
        // Here we wait 50ms between measurements
        Timer::after(Duration::from_millis(50)).await;
    }

    sensor.set_mode_average(10);
    loop {
        match sensor.inch() {
            Ok(distance) => info!("Average of 10: {} in", distance),
            Err(e) => info!("Measurement error: {:?}", e),
        }
        Timer::after(Duration::from_millis(500)).await;
    }
}
