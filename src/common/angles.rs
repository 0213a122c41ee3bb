//! This module contains common constructs for working with angles

use crate::errors::AirfoilError;
use crate::{Result, Vector2};

pub const ANGLE_TOL: f64 = 1.0e-12;

/// Returns the unit vector pointing at `angle` radians counter-clockwise from the positive x-axis.
pub fn unit_at(angle: f64) -> Vector2 {
    Vector2::new(angle.cos(), angle.sin())
}

/// Returns the signed angle, in radians and in the range [-pi, pi], which rotates the direction
/// of `a` onto the direction of `b`. Counter-clockwise rotations are positive.
///
/// # Arguments
///
/// * `a`: the starting direction, does not need to be normalized
/// * `b`: the ending direction, does not need to be normalized
///
/// returns: f64
///
/// # Examples
///
/// ```
/// use airpar::common::signed_angle;
/// use airpar::Vector2;
/// use approx::assert_relative_eq;
/// use std::f64::consts::FRAC_PI_2;
/// let angle = signed_angle(&Vector2::new(2.0, 0.0), &Vector2::new(0.0, 0.5));
/// assert_relative_eq!(angle, FRAC_PI_2, epsilon = 1.0e-12);
/// ```
pub fn signed_angle(a: &Vector2, b: &Vector2) -> f64 {
    let cross = a.x * b.y - a.y * b.x;
    cross.atan2(a.dot(b))
}

/// Checks that an angle lies in the closed interval `[lo, hi]`, allowing for `ANGLE_TOL` of
/// rounding error at either end so that a value such as `180.0_f64.to_radians()` passes a check
/// against `[-PI, PI]`.
pub fn check_angle_range(name: &'static str, value: f64, lo: f64, hi: f64) -> Result<()> {
    if value >= lo - ANGLE_TOL && value <= hi + ANGLE_TOL {
        Ok(())
    } else {
        Err(AirfoilError::OutOfRange {
            name,
            lo,
            hi,
            value,
        })
    }
}
