mod bezier2;
pub mod polyline2;

pub type Point2 = parry2d_f64::na::Point2<f64>;
pub type Vector2 = parry2d_f64::na::Vector2<f64>;
pub type Iso2 = parry2d_f64::na::Isometry2<f64>;

pub use self::bezier2::{binomial, sample_segments, BezierCurve2, BezierSamples};
