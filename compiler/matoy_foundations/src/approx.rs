//! Approximate floating-point equality.

/// Tests whether two floats are equal within two units in the last place.
///
/// The machine epsilon is scaled to the magnitude of the operands; an
/// absolute floor catches subnormal differences near zero.
pub fn approx_eq(x: f64, y: f64) -> bool {
    (x - y).abs() < f64::EPSILON * (x + y).abs() * 2.0 || (x - y).abs() < f64::MIN_POSITIVE
}
