use crate::error::UnknownMode;

/// Longest time a single ping waits for its echo, in microseconds.
/// Beyond this the ping reads as `0`.
pub const ECHO_TIMEOUT_US: u64 = 300_000;

/// Pause between consecutive pings of one measurement, so a late echo
/// of the previous ping is not taken for the next one.
pub const SAMPLE_PACING_MS: u32 = 1;

/// Smallest sample count accepted in [`Mode::Median`].
pub const MEDIAN_MIN_SAMPLES: u8 = 3;

/// Largest sample count accepted in [`Mode::Median`].
pub const MEDIAN_MAX_SAMPLES: u8 = 15;

/// Number of pings averaged by `determine_speed_of_sound`.
pub const CALIBRATION_SAMPLES: u16 = 16;

/// Speed of sound in m/s at 15 °C, 0 %RH, sea level.
pub const DEFAULT_SPEED_OF_SOUND: f32 = 340.0;

/// Trigger pulse width in microseconds. The SRF05 needs at least 10 µs.
pub const DEFAULT_TRIGGER_LENGTH_US: u8 = 10;

/// How the pings of one measurement are combined.
#[repr(u8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// One ping, returned as-is.
    #[default]
    Single = 0,
    /// Rounded mean of `sample_count` pings.
    Average = 1,
    /// Median of `sample_count` pings (3..=15).
    Median = 2,
    /// Exponential smoothing with weight `alpha`, one ping per measurement.
    RunningAverage = 3,
}

impl From<Mode> for u8 {
    fn from(mode: Mode) -> Self {
        mode as u8
    }
}

impl TryFrom<u8> for Mode {
    type Error = UnknownMode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Mode::Single),
            1 => Ok(Mode::Average),
            2 => Ok(Mode::Median),
            3 => Ok(Mode::RunningAverage),
            other => Err(UnknownMode(other)),
        }
    }
}

/// The configuration for the sampler.
///
/// Applied through the regular setters by `RangeSampler::with_config`, so sample counts
/// are clamped and a non-positive correction factor is ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub mode: Mode,
    /// Pings per measurement for [`Mode::Average`] and [`Mode::Median`].
    pub sample_count: u8,
    /// Smoothing weight for [`Mode::RunningAverage`].
    pub alpha: f32,
    /// Speed of sound in m/s.
    pub speed_of_sound: f32,
    /// Multiplier applied to every raw echo time.
    pub correction_factor: f32,
    /// Trigger pulse width in microseconds.
    pub trigger_length: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Single,
            sample_count: 1,
            alpha: 1.0,
            speed_of_sound: DEFAULT_SPEED_OF_SOUND,
            correction_factor: 1.0,
            trigger_length: DEFAULT_TRIGGER_LENGTH_US,
        }
    }
}
