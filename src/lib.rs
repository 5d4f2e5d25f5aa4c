//! # srf05
//!
//! This crate provides a blocking driver for the SRF05 ultrasonic distance sensor and compatibles
//! (HC-SR04, US-015, ...).
//!
//! The driver triggers a ping, times the echo pulse and turns the round-trip time into a distance.
//! Raw echo times can be combined in one of four operational modes:
//!
//! - [`Mode::Single`]: one ping per measurement.
//! - [`Mode::Average`]: the rounded mean of several pings.
//! - [`Mode::Median`]: the median of 3 to 15 pings, robust against single stray echoes.
//! - [`Mode::RunningAverage`]: exponential smoothing across measurements.
//!
//! A measurement blocks until every ping of the active mode has been answered or has timed out.
//! A ping that gets no echo within 300 ms reads as `0`, which callers should treat as
//! "nothing in range" rather than as a distance of zero.
//!
//! ## Features
//!
//! - `defmt`: derives `defmt::Format` for the public types and emits driver log lines through `defmt`.
//!
//! # Example
//!
//! ```rust, ignore
//! #![no_std]
//! #![no_main]
//!
//! use defmt::*;
//! use embassy_executor::Spawner;
//! use embassy_rp::gpio::{Input, Level, Output, Pull};
//! use embassy_time::{Delay, Duration, Instant, Timer};
//! use srf05::{calculate_speed_of_sound, Now, RangeSampler};
//! use {defmt_rtt as _, panic_probe as _};
//!
//! #[embassy_executor::main]
//! async fn main(_spawner: Spawner) {
//!     let p = embassy_rp::init(Default::default());
//!     info!("Running!");
//!
//!     let trigger = Output::new(p.PIN_13, Level::Low);
//!     let echo = Input::new(p.PIN_28, Pull::None);
//!
//!     // Create clock function that returns microseconds
//!     struct EmbassyClock;
//!
//!     impl Now for EmbassyClock {
//!         fn now_micros(&self) -> u64 {
//!             Instant::now().as_micros()
//!         }
//!     }
//!
//!     let mut sensor = RangeSampler::new(trigger, echo, (), EmbassyClock, Delay).unwrap();
//!
//!     // 22 °C and 40 %RH, if known. Otherwise the default of 340 m/s is used.
//!     sensor.set_speed_of_sound(calculate_speed_of_sound(22.0, 40.0));
//!     sensor.set_mode_median(5);
//!
//!     loop {
//!         match sensor.centimeter() {
//!             Ok(distance) => info!("Distance: {} cm", distance),
//!             Err(e) => info!("Error: {:?}", e),
//!         }
//!         Timer::after(Duration::from_secs(1)).await;
//!     }
//! }
//! ```

#![cfg_attr(not(test), no_std)]

mod fmt; // <-- must be first module!

mod acoustics;
mod config;
mod error;
mod filter;
mod sampler;

#[cfg(test)]
mod sim;

pub use acoustics::{calculate_speed_of_sound, speed_of_sound_from_reference, DistanceUnit};
pub use config::{
    Config, Mode, CALIBRATION_SAMPLES, DEFAULT_SPEED_OF_SOUND, DEFAULT_TRIGGER_LENGTH_US,
    ECHO_TIMEOUT_US, MEDIAN_MAX_SAMPLES, MEDIAN_MIN_SAMPLES, SAMPLE_PACING_MS,
};
pub use error::{Error, UnknownMode};
pub use sampler::RangeSampler;

/// Monotonic time source used to time echo pulses and stamp measurements.
pub trait Now {
    // The time elapsed since startup in microseconds
    fn now_micros(&self) -> u64;
}
