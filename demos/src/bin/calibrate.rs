//! # Speed of Sound Calibration
//! Place a flat target exactly `REFERENCE_DISTANCE_M` in front of the sensor and run this example.
//! It fires 16 pings, derives the speed of sound from their mean echo time and applies it.
//! The result is compared against the temperature/humidity estimate.
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

const REFERENCE_DISTANCE_M: f32 = 0.5;
const TEMPERATURE_C: f32 = 21.5;
const HUMIDITY_PERCENT: f32 = 50.0;

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

    let estimate = calculate_speed_of_sound(TEMPERATURE_C, HUMIDITY_PERCENT);
    info!("Estimated speed of sound: {} m/s", estimate);

    match sensor.determine_speed_of_sound(REFERENCE_DISTANCE_M) {
        Ok(sos) if sos > 0.0 => {
            info!("Measured speed of sound: {} m/s", sos);
            sensor.set_speed_of_sound(sos);
        }
        Ok(_) => {
            warn!("No echo from the reference target, using the estimate");
            sensor.set_speed_of_sound(estimate);
        }
        Err(e) => {
            error!("Calibration failed: {:?}", e);
            sensor.set_speed_of_sound(estimate);
        }
    }

    sensor.set_mode_median(5);
    loop {
        match sensor.meter() {
            Ok(distance) => info!("Distance: {} m", distance),
            Err(e) => info!("Error: {:?}", e),
        }
        Timer::after(Duration::from_secs(1)).await;
    }
}
