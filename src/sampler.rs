use embedded_hal::{
    delay::DelayNs,
    digital::{Error as _, InputPin, OutputPin},
};
use libm::roundf;

use crate::acoustics::{speed_of_sound_from_reference, DistanceUnit};
use crate::config::{
    Config, Mode, CALIBRATION_SAMPLES, DEFAULT_SPEED_OF_SOUND, DEFAULT_TRIGGER_LENGTH_US,
    ECHO_TIMEOUT_US, MEDIAN_MAX_SAMPLES, MEDIAN_MIN_SAMPLES, SAMPLE_PACING_MS,
};
use crate::error::Error;
use crate::filter;
use crate::Now;

/// The SRF05 ultrasonic distance sensor driver.
///
/// # Note
///
/// Every measuring call blocks: up to [`ECHO_TIMEOUT_US`] per ping, times the number of pings
/// of the active mode. A median of 15 unanswered pings takes about 4.5 s.
pub struct RangeSampler<TRIGPIN, ECHOPIN, AUXPIN, CLOCK, DELAY> {
    trigger: TRIGPIN,
    echo: ECHOPIN,
    aux: AUXPIN,
    clock: CLOCK,
    delay: DELAY,
    mode: Mode,
    sample_count: u8,
    alpha: f32,
    running_value: f32,
    speed_of_sound: f32,
    correction_factor: f32,
    trigger_length: u8,
    last_time: u64,
}

impl<TRIGPIN, ECHOPIN, AUXPIN, CLOCK, DELAY> RangeSampler<TRIGPIN, ECHOPIN, AUXPIN, CLOCK, DELAY>
where
    TRIGPIN: OutputPin,
    ECHOPIN: InputPin,
    CLOCK: Now,
    DELAY: DelayNs,
{
    /// Initialize a new sensor in [`Mode::Single`].
    /// Requires trigger pin and an echo pin, measurements are taken on the echo pin.
    /// The auxiliary OUT pin is held but never driven; pass `()` if it is not wired.
    /// Requires a clock that will provide the time in microseconds via the `Now` trait.
    /// Requires a delay that implements DelayNs.
    ///
    /// The trigger pin is driven low before returning.
    pub fn new(
        trigger: TRIGPIN,
        echo: ECHOPIN,
        aux: AUXPIN,
        clock: CLOCK,
        delay: DELAY,
    ) -> Result<Self, Error> {
        let mut sampler = Self {
            trigger,
            echo,
            aux,
            clock,
            delay,
            mode: Mode::Single,
            sample_count: 1,
            alpha: 1.0,
            running_value: 0.0,
            speed_of_sound: DEFAULT_SPEED_OF_SOUND,
            correction_factor: 1.0,
            trigger_length: DEFAULT_TRIGGER_LENGTH_US,
            last_time: 0,
        };
        sampler
            .trigger
            .set_low()
            .map_err(|e| Error::Trigger(e.kind()))?;
        Ok(sampler)
    }

    /// Like [`new`](Self::new), then applies `config` through the regular setters.
    pub fn with_config(
        trigger: TRIGPIN,
        echo: ECHOPIN,
        aux: AUXPIN,
        clock: CLOCK,
        delay: DELAY,
        config: Config,
    ) -> Result<Self, Error> {
        let mut sampler = Self::new(trigger, echo, aux, clock, delay)?;
        match config.mode {
            Mode::Single => sampler.set_mode_single(),
            Mode::Average => sampler.set_mode_average(config.sample_count),
            Mode::Median => sampler.set_mode_median(config.sample_count),
            Mode::RunningAverage => sampler.set_mode_running_average(config.alpha),
        }
        if config.mode != Mode::RunningAverage {
            sampler.set_alpha(config.alpha);
        }
        sampler.set_speed_of_sound(config.speed_of_sound);
        if !sampler.set_correction_factor(config.correction_factor) {
            warn!(
                "ignoring correction factor {}, keeping 1.0",
                config.correction_factor
            );
        }
        sampler.set_trigger_length(config.trigger_length);
        Ok(sampler)
    }

    /// Hand back the pins, the clock and the delay.
    pub fn release(self) -> (TRIGPIN, ECHOPIN, AUXPIN, CLOCK, DELAY) {
        (self.trigger, self.echo, self.aux, self.clock, self.delay)
    }

    /// A snapshot of the current mode and calibration.
    pub fn config(&self) -> Config {
        Config {
            mode: self.mode,
            sample_count: self.sample_count,
            alpha: self.alpha,
            speed_of_sound: self.speed_of_sound,
            correction_factor: self.correction_factor,
            trigger_length: self.trigger_length,
        }
    }

    /// Set the speed of sound in m/s.
    pub fn set_speed_of_sound(&mut self, speed_of_sound: f32) {
        self.speed_of_sound = speed_of_sound;
    }

    /// Speed of sound in m/s used by the distance getters.
    pub fn speed_of_sound(&self) -> f32 {
        self.speed_of_sound
    }

    /// Set the multiplier applied to every raw echo time.
    /// Returns `false` and keeps the old factor unless `factor > 0`.
    pub fn set_correction_factor(&mut self, factor: f32) -> bool {
        if factor.is_nan() || factor <= 0.0 {
            return false;
        }
        self.correction_factor = factor;
        true
    }

    /// Multiplier applied to every raw echo time.
    pub fn correction_factor(&self) -> f32 {
        self.correction_factor
    }

    /// One ping per measurement.
    pub fn set_mode_single(&mut self) {
        self.mode = Mode::Single;
        self.sample_count = 1;
    }

    /// Average `count` pings per measurement. A count of 0 is taken as 1.
    pub fn set_mode_average(&mut self, count: u8) {
        self.mode = Mode::Average;
        self.sample_count = count.max(1);
    }

    /// Take the median of `count` pings per measurement, clamped to 3..=15.
    pub fn set_mode_median(&mut self, count: u8) {
        self.mode = Mode::Median;
        self.sample_count = count.clamp(MEDIAN_MIN_SAMPLES, MEDIAN_MAX_SAMPLES);
    }

    /// Smooth measurements exponentially: `value = (1 - alpha) * value + alpha * ping`.
    ///
    /// `alpha` is stored as given. Values outside `(0, 1]` make the output
    /// overshoot or never converge.
    pub fn set_mode_running_average(&mut self, alpha: f32) {
        self.mode = Mode::RunningAverage;
        self.sample_count = 1;
        self.set_alpha(alpha);
    }

    fn set_alpha(&mut self, alpha: f32) {
        if alpha.is_nan() || alpha <= 0.0 || alpha > 1.0 {
            warn!("running average alpha {} is outside (0, 1]", alpha);
        }
        self.alpha = alpha;
    }

    /// The active operational mode.
    pub fn operational_mode(&self) -> Mode {
        self.mode
    }

    /// Pings per measurement; 1 in single and running-average mode.
    pub fn sample_count(&self) -> u8 {
        self.sample_count
    }

    /// Smoothing weight of the running average.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Set the trigger pulse width in microseconds.
    pub fn set_trigger_length(&mut self, length: u8) {
        self.trigger_length = length;
    }

    /// Trigger pulse width in microseconds.
    pub fn trigger_length(&self) -> u8 {
        self.trigger_length
    }

    /// Milliseconds since startup at the start of the last [`get_time`](Self::get_time).
    pub fn last_time(&self) -> u64 {
        self.last_time
    }

    /// Measure the round-trip echo time in microseconds, combining pings per the active mode.
    ///
    /// `0` means no echo came back in time.
    pub fn get_time(&mut self) -> Result<u32, Error> {
        self.last_time = self.clock.now_micros() / 1000;

        let time = match self.mode {
            Mode::Single => self.read()?,
            Mode::Average => {
                let mut sum: u64 = 0;
                for _ in 0..self.sample_count {
                    sum += u64::from(self.read()?);
                    self.delay.delay_ms(SAMPLE_PACING_MS);
                }
                filter::rounded_mean(sum, self.sample_count)
            }
            Mode::Median => {
                let mut samples = [0u32; MEDIAN_MAX_SAMPLES as usize];
                let count = usize::from(self.sample_count).min(samples.len());
                for sample in samples.iter_mut().take(count) {
                    *sample = self.read()?;
                    self.delay.delay_ms(SAMPLE_PACING_MS);
                }
                filter::median(&mut samples[..count])
            }
            Mode::RunningAverage => {
                let sample = self.read()?;
                self.running_value = filter::smooth(self.running_value, self.alpha, sample);
                self.running_value as u32
            }
        };

        debug!("{} echo time: {} us", self.mode, time);
        Ok(time)
    }

    /// Measure and convert to `unit`.
    pub fn distance(&mut self, unit: DistanceUnit) -> Result<f32, Error> {
        let time = self.get_time()?;
        Ok(unit.convert(self.speed_of_sound, time))
    }

    /// Measure the distance in whole millimeters (truncated).
    pub fn millimeter(&mut self) -> Result<u32, Error> {
        Ok(self.distance(DistanceUnit::Millimeters)? as u32)
    }

    /// Measure the distance in centimeters. Every call fires a new measurement.
    pub fn centimeter(&mut self) -> Result<f32, Error> {
        self.distance(DistanceUnit::Centimeters)
    }

    /// Measure the distance in meters. Every call fires a new measurement.
    pub fn meter(&mut self) -> Result<f32, Error> {
        self.distance(DistanceUnit::Meters)
    }

    /// Measure the distance in inches. Every call fires a new measurement.
    pub fn inch(&mut self) -> Result<f32, Error> {
        self.distance(DistanceUnit::Inches)
    }

    /// Measure the distance in feet. Every call fires a new measurement.
    pub fn feet(&mut self) -> Result<f32, Error> {
        self.distance(DistanceUnit::Feet)
    }

    /// Experimental. Estimate the speed of sound in m/s from 16 pings against a target
    /// `known_distance` meters away.
    ///
    /// The result is not applied; pass it to [`set_speed_of_sound`](Self::set_speed_of_sound).
    /// Returns `0.0` if none of the pings was answered.
    pub fn determine_speed_of_sound(&mut self, known_distance: f32) -> Result<f32, Error> {
        let mut sum: u64 = 0;
        for _ in 0..CALIBRATION_SAMPLES {
            sum += u64::from(self.read()?);
            self.delay.delay_ms(SAMPLE_PACING_MS);
        }
        if sum == 0 {
            warn!("no echo during speed of sound calibration");
        }
        Ok(speed_of_sound_from_reference(
            known_distance,
            CALIBRATION_SAMPLES,
            sum,
        ))
    }

    /// Fire one ping and return its echo time in microseconds, correction applied.
    #[allow(clippy::float_cmp)]
    fn read(&mut self) -> Result<u32, Error> {
        // Send the trigger pulse
        self.trigger
            .set_high()
            .map_err(|e| Error::Trigger(e.kind()))?;
        self.delay.delay_us(u32::from(self.trigger_length));
        self.trigger
            .set_low()
            .map_err(|e| Error::Trigger(e.kind()))?;

        let duration = self.pulse_in()?;
        trace!("raw echo: {} us", duration);

        if self.correction_factor == 1.0 {
            return Ok(duration);
        }
        Ok(roundf(duration as f32 * self.correction_factor) as u32)
    }

    /// Time the next high pulse on the echo pin.
    /// Returns 0 if it has not both started and ended within [`ECHO_TIMEOUT_US`].
    fn pulse_in(&mut self) -> Result<u32, Error> {
        let start = self.clock.now_micros();

        // a pulse already in flight is not ours
        while self.echo_is_high()? {
            if self.timed_out(start) {
                return Ok(0);
            }
        }

        while !self.echo_is_high()? {
            if self.timed_out(start) {
                return Ok(0);
            }
        }
        let rise = self.clock.now_micros();

        while self.echo_is_high()? {
            if self.timed_out(start) {
                return Ok(0);
            }
        }
        let fall = self.clock.now_micros();

        Ok(u32::try_from(fall.saturating_sub(rise)).unwrap_or(u32::MAX))
    }

    fn echo_is_high(&mut self) -> Result<bool, Error> {
        self.echo.is_high().map_err(|e| Error::Echo(e.kind()))
    }

    fn timed_out(&self, start: u64) -> bool {
        self.clock.now_micros().saturating_sub(start) >= ECHO_TIMEOUT_US
    }
}
