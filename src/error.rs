use embedded_hal::digital::ErrorKind;

/// Errors surfaced by a measurement.
///
/// A missing echo is *not* an error: it reads as a duration of `0`.
/// These variants only fire when the HAL reports a pin fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Driving the trigger pin failed.
    #[error("trigger pin fault: {0:?}")]
    Trigger(ErrorKind),

    /// Reading the echo pin failed.
    #[error("echo pin fault: {0:?}")]
    Echo(ErrorKind),
}

/// A numeric mode code that does not name any [`Mode`](crate::Mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("unknown operational mode code {0}")]
pub struct UnknownMode(pub u8);
