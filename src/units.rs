//! Unit conversions for display.

use std::f32::consts::PI;

/// Radians per second to revolutions per minute.
pub fn rps_to_rpm(rad_per_sec: f32) -> f32 {
    rad_per_sec * (60.0 / (2.0 * PI))
}

/// Meters per second to kilometers per hour.
pub fn mps_to_kph(meters_per_sec: f32) -> f32 {
    meters_per_sec * 3.6
}

/// Kelvin to degrees Celsius.
pub fn kelvin_to_celsius(kelvin: f32) -> f32 {
    kelvin - 273.15
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_speed() {
        assert!((rps_to_rpm(2.0 * PI) - 60.0).abs() < 1e-3);
        assert!((rps_to_rpm(733.0) - 6999.6).abs() < 0.5);
    }

    #[test]
    fn road_speed() {
        assert!((mps_to_kph(27.777_779) - 100.0).abs() < 1e-3);
        assert_eq!(mps_to_kph(0.0), 0.0);
    }

    #[test]
    fn temperature() {
        assert!((kelvin_to_celsius(363.15) - 90.0).abs() < 1e-3);
    }
}
