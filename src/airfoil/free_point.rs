use crate::param::{ParamSlots, Parameter};
use crate::Point2;
use serde::{Deserialize, Serialize};

pub const FREE_POINT_SLOTS: [&str; 2] = ["x", "y"];

/// An extra control point attached to the Bezier segment which starts at
/// `previous_anchor_point`. It adds two degrees of freedom to that segment and raises its order
/// by one, without any continuity obligations of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreePoint {
    pub previous_anchor_point: String,
    pub x: Parameter,
    pub y: Parameter,
}

impl FreePoint {
    pub fn new(previous_anchor_point: &str, x: Parameter, y: Parameter) -> Self {
        Self {
            previous_anchor_point: previous_anchor_point.to_string(),
            x,
            y,
        }
    }

    pub fn xy(&self) -> Point2 {
        Point2::new(self.x.value(), self.y.value())
    }

    pub fn set_length_scale(&mut self, scale: f64) {
        self.x.apply_length_scale(scale);
        self.y.apply_length_scale(scale);
    }
}

impl ParamSlots for FreePoint {
    fn slots(&self) -> Vec<&Parameter> {
        vec![&self.x, &self.y]
    }

    fn slots_mut(&mut self) -> Vec<&mut Parameter> {
        vec![&mut self.x, &mut self.y]
    }
}
