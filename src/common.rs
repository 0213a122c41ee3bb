mod angles;
pub mod points;

pub use angles::{check_angle_range, signed_angle, unit_at, ANGLE_TOL};

/// Generate a vec of domain values which are linearly spaced between `start` and `end` and which
/// have a count of `count`. The first value will be `start` and the last value will be `end`.
/// A count of one produces only `start`, and a count of zero produces an empty vec.
///
/// # Arguments
///
/// * `start`: the starting value of the domain, inclusive
/// * `end`: the ending value of the domain, inclusive
/// * `count`: the total number of discrete, evenly spaced values in the domain
///
/// returns: Vec<f64, Global>
///
/// # Examples
///
/// ```
/// use airpar::common::linear_space;
/// let domain = linear_space(0.0, 1.0, 3);
/// assert_eq!(domain, vec![0.0, 0.5, 1.0]);
/// ```
pub fn linear_space(start: f64, end: f64, count: usize) -> Vec<f64> {
    if count < 2 {
        return (0..count).map(|_| start).collect();
    }

    let step = (end - start) / (count - 1) as f64;
    let mut result = (0..count)
        .map(|i| start + i as f64 * step)
        .collect::<Vec<_>>();

    // The accumulated step can drift from `end` by a rounding error, which would break the exact
    // sharing of boundary samples between adjoining Bezier segments.
    result[count - 1] = end;
    result
}
