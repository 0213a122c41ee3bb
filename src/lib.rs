//! Parametric construction of smooth two-dimensional airfoil outlines. An outline is built from
//! a chain of anchor points joined by Bezier segments whose support control points are placed to
//! give tangent (G1) and curvature (G2) continuity at every anchor, and which may carry extra
//! free control points. The whole shape is driven by a flat vector of named parameters which can
//! be extracted and overridden, making it suitable for use inside gradient-free optimizers.

pub mod airfoil;
pub mod common;
mod errors;
pub mod geom2;
pub mod param;

pub use airfoil::{Airfoil, AirfoilConfig, AnchorPoint, FreePoint, ShapeDescriptor};
pub use errors::{AirfoilError, SupportSide};
pub use geom2::{BezierCurve2, BezierSamples, Iso2, Point2, Vector2};
pub use param::{ParamSlots, Parameter, Units};

pub type Result<T> = std::result::Result<T, AirfoilError>;
