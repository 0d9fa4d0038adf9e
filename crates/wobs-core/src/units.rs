//! Unit conversion utilities
//!
//! Provider values arrive in Celsius and millibar. Conversions never round;
//! rounding belongs to rendering.

/// Kilopascal per millibar
pub const KPA_PER_MB: f64 = 0.1;

/// Millimeter of mercury per millibar
pub const MMHG_PER_MB: f64 = 0.750062;

/// Offset between Celsius and Kelvin
pub const KELVIN_OFFSET: f64 = 273.15;

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + KELVIN_OFFSET
}

pub fn millibar_to_kilopascal(mb: f64) -> f64 {
    mb * KPA_PER_MB
}

pub fn millibar_to_mmhg(mb: f64) -> f64 {
    mb * MMHG_PER_MB
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
