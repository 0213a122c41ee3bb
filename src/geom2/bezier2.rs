//! Evaluation of single Bezier curves of arbitrary order through the Bernstein polynomial basis.

use crate::common::linear_space;
use crate::errors::AirfoilError;
use crate::{Point2, Result, Vector2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Computes the binomial coefficient `n choose k` as a float. Returns zero when `k > n`.
///
/// # Examples
///
/// ```
/// use airpar::geom2::binomial;
/// assert_eq!(binomial(5, 2), 10.0);
/// assert_eq!(binomial(4, 0), 1.0);
/// assert_eq!(binomial(2, 3), 0.0);
/// ```
pub fn binomial(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

fn bernstein(n: usize, i: usize, t: f64) -> f64 {
    binomial(n, i) * t.powi(i as i32) * (1.0 - t).powi((n - i) as i32)
}

/// A Bezier curve of order `n` defined by `n + 1` control points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BezierCurve2 {
    control_points: Vec<Point2>,
}

impl BezierCurve2 {
    /// Create a new Bezier curve from an ordered list of control points. At least two control
    /// points (a curve of order one) are required.
    pub fn new(control_points: &[Point2]) -> Result<Self> {
        if control_points.len() < 2 {
            return Err(AirfoilError::NotEnoughPoints {
                required: 2,
                actual: control_points.len(),
            });
        }

        Ok(Self {
            control_points: control_points.to_vec(),
        })
    }

    /// The order `n` of the curve, which is one less than the number of control points.
    pub fn order(&self) -> usize {
        self.control_points.len() - 1
    }

    pub fn control_points(&self) -> &[Point2] {
        &self.control_points
    }

    /// Evaluate the position on the curve at parameter `t` in [0, 1].
    pub fn at(&self, t: f64) -> Point2 {
        let n = self.order();
        let coords = self
            .control_points
            .iter()
            .enumerate()
            .fold(Vector2::zeros(), |acc, (i, p)| {
                acc + p.coords * bernstein(n, i, t)
            });
        Point2::from(coords)
    }

    /// Evaluate the first derivative of the curve with respect to `t`.
    pub fn derivative(&self, t: f64) -> Vector2 {
        let n = self.order();
        let p = &self.control_points;
        (0..n).fold(Vector2::zeros(), |acc, i| {
            acc + (p[i + 1] - p[i]) * bernstein(n - 1, i, t)
        }) * n as f64
    }

    /// Evaluate the second derivative of the curve with respect to `t`. A curve of order one
    /// has no second derivative and returns the zero vector.
    pub fn second_derivative(&self, t: f64) -> Vector2 {
        let n = self.order();
        if n < 2 {
            return Vector2::zeros();
        }
        let p = &self.control_points;
        (0..n - 1).fold(Vector2::zeros(), |acc, i| {
            let delta2 = (p[i + 2] - p[i + 1]) - (p[i + 1] - p[i]);
            acc + delta2 * bernstein(n - 2, i, t)
        }) * (n * (n - 1)) as f64
    }

    /// The signed curvature at parameter `t`, positive when the curve turns counter-clockwise.
    /// Returns `None` for curves of order less than two, where the curvature is undefined.
    pub fn curvature_at(&self, t: f64) -> Option<f64> {
        if self.order() < 2 {
            return None;
        }
        Some(signed_curvature(&self.derivative(t), &self.second_derivative(t)))
    }

    /// Sample the curve at `nt` evenly spaced parameter values over [0, 1], computing position,
    /// first and second derivatives, and (for curves of order two or more) the curvature at
    /// each sample.
    pub fn sample(&self, nt: usize) -> BezierSamples {
        let t = linear_space(0.0, 1.0, nt);
        let points = t.iter().map(|&ti| self.at(ti)).collect::<Vec<_>>();
        let d1 = t.iter().map(|&ti| self.derivative(ti)).collect::<Vec<_>>();
        let d2 = t
            .iter()
            .map(|&ti| self.second_derivative(ti))
            .collect::<Vec<_>>();

        let curvature = if self.order() < 2 {
            None
        } else {
            Some(
                d1.iter()
                    .zip(d2.iter())
                    .map(|(a, b)| signed_curvature(a, b))
                    .collect(),
            )
        };

        BezierSamples {
            t,
            points,
            d1,
            d2,
            curvature,
        }
    }
}

fn signed_curvature(d1: &Vector2, d2: &Vector2) -> f64 {
    (d1.x * d2.y - d1.y * d2.x) / d1.norm_squared().powf(1.5)
}

/// The sampled values of a Bezier curve at a set of parameter values. All vectors share the
/// same length and ordering as `t`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BezierSamples {
    pub t: Vec<f64>,
    pub points: Vec<Point2>,
    pub d1: Vec<Vector2>,
    pub d2: Vec<Vector2>,

    /// The signed curvature at each sample, or `None` if the curve's order is below two
    pub curvature: Option<Vec<f64>>,
}

impl BezierSamples {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }
}

/// Sample a set of independent curves with the same sample count. Evaluation of each curve is
/// done in parallel, and the results are returned in the same order as `curves`.
pub fn sample_segments(curves: &[BezierCurve2], nt: usize) -> Vec<BezierSamples> {
    curves.par_iter().map(|c| c.sample(nt)).collect()
}
