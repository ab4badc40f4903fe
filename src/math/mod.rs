mod vector;

pub use vector::Vector2;

/// Constant for a very small number, used for comparisons
pub const EPSILON: f64 = 1.0e-9;

/// Returns true if the two floating point values are approximately equal
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    approx::abs_diff_eq!(a, b, epsilon = EPSILON)
}

/// Returns true if the value is approximately zero
#[inline]
pub fn approx_zero(a: f64) -> bool {
    a.abs() < EPSILON
}

/// Clamps a value between a minimum and maximum value
#[inline]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Converts degrees to radians
#[inline]
pub fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Converts radians to degrees
#[inline]
pub fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_keeps_value_inside_range() {
        assert_eq!(clamp(20.0, -15.0, 15.0), 15.0);
        assert_eq!(clamp(-20.0, -15.0, 15.0), -15.0);
        assert_eq!(clamp(3.5, -15.0, 15.0), 3.5);
    }

    #[test]
    fn angle_conversions_round_trip_known_values() {
        assert!(approx_eq(to_degrees(std::f64::consts::PI), 180.0));
        assert!(approx_eq(to_radians(90.0), std::f64::consts::FRAC_PI_2));
        assert!(approx_zero(to_radians(0.0)));
    }
}
