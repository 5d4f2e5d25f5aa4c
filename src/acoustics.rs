use libm::sqrtf;

/// The distance unit to use for measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DistanceUnit {
    Millimeters,
    Centimeters,
    Meters,
    Inches,
    Feet,
}

impl DistanceUnit {
    /// Distance covered per m/s of sound speed and µs of round-trip echo time.
    /// Includes the halving for the way back.
    pub const fn factor(self) -> f32 {
        match self {
            DistanceUnit::Millimeters => 0.5e-3,
            DistanceUnit::Centimeters => 0.5e-4,
            DistanceUnit::Meters => 0.5e-6,
            DistanceUnit::Inches => 1.9685e-5,
            DistanceUnit::Feet => 1.64042e-6,
        }
    }

    /// Convert a round-trip echo time into a one-way distance in this unit.
    pub fn convert(self, speed_of_sound: f32, echo_micros: u32) -> f32 {
        speed_of_sound * echo_micros as f32 * self.factor()
    }
}

/// Estimate the speed of sound in m/s from temperature (°C) and relative humidity (%).
///
/// Experimental, empirical approximation. The humidity term only applies at or above 0 °C.
pub fn calculate_speed_of_sound(temperature: f32, humidity: f32) -> f32 {
    let mut sos = 331.45 * sqrtf(1.0 + temperature / 273.16);
    if temperature >= 0.0 && humidity > 0.0 {
        let offset = (temperature + 2.0) * 0.0006255;
        sos += humidity * offset;
    }
    sos
}

/// Derive the speed of sound in m/s from `samples` echo times taken against a target
/// at `distance` meters, given the sum of those echo times in microseconds.
///
/// Returns `0.0` when no echo came back at all.
pub fn speed_of_sound_from_reference(distance: f32, samples: u16, echo_sum_micros: u64) -> f32 {
    if echo_sum_micros == 0 {
        return 0.0;
    }
    (f32::from(samples) * 2e6) * distance / echo_sum_micros as f32
}
