//! # Single Measurement
//! This example demonstrates how to use the SRF05 sensor to measure distance in a loop, one ping per reading.
//!
//! ## Note
//!
//! Most SRF05 and HC-SR04 modules are rated for 5V. The Raspberry Pi Pico is a 3.3V device.
//! When operating the sensor at 5V with a 3.3V controller like the Pi Pico, the following considerations must be taken into account:
//!
//! - The trigger pin can be directly connected to the controller. 3.3V should be enough to trigger the sensor.
//! - The echo pin must be connected to the controller through a voltage divider to reduce the voltage from 5V to 3.3V.
//!
//! The driver blocks while it waits for the echo, so it stalls the executor for up to 300 ms per ping.
//! Keep it in its own task, or on its own core, if other work has deadlines.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_time::{Delay, Duration, Instant, Timer};
use srf05::{Now, RangeSampler};
use {defmt_rtt as _, panic_probe as _};

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("Running!");

    let trigger = Output::new(p.PIN_13, Level::Low);
    let echo = Input::new(p.PIN_28, Pull::None);

    // Create clock function that returns microseconds
    struct EmbassyClock;

    impl Now for EmbassyClock {
        fn now_micros(&self) -> u64 {
            Instant::now().as_micros()
        }
    }

    let mut sensor = unwrap!(RangeSampler::new(trigger, echo, (), EmbassyClock, Delay));

    loop {
        match sensor.centimeter() {
            Ok(distance) if distance == 0.0 => info!("Nothing in range"),
            Ok(distance) => info!("Distance: {} cm", distance),
            Err(e) => info!("Error: {:?}", e),
        }
        Timer::after(Duration::from_secs(1)).await;
    }
}
