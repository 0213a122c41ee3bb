use crate::errors::AirfoilError;
use crate::param::{ParamSlots, Parameter};
use crate::{Point2, Result};
use serde::{Deserialize, Serialize};

/// Names of the anchors which every airfoil owns: the upper trailing edge, the leading edge, and
/// the lower trailing edge, in chain order.
pub const TE_1: &str = "te_1";
pub const LE: &str = "le";
pub const TE_2: &str = "te_2";

/// Slot names of an anchor point in the order of its flattened parameters.
pub const ANCHOR_SLOTS: [&str; 8] = ["x", "y", "L", "R", "r", "phi", "psi1", "psi2"];

/// A named anchor point inserted into an airfoil's anchor chain immediately after an existing
/// anchor. The outline passes through the anchor with G1 and G2 continuity; its tangent and
/// curvature are set by its own local parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorPoint {
    pub name: String,
    pub previous_anchor_point: String,

    pub x: Parameter,
    pub y: Parameter,

    /// Distance between the two tangent support points on either side of the anchor
    #[serde(rename = "L")]
    pub length: Parameter,

    /// Radius of curvature at the anchor, infinite to leave the curvature unconstrained. A
    /// negative radius bends the outline away from the curvature control arms.
    #[serde(rename = "R")]
    pub radius: Parameter,

    /// Fraction of `length` placed on the incoming side of the anchor
    #[serde(rename = "r")]
    pub ratio: Parameter,

    /// Tangent tilt angle relative to the chordline
    pub phi: Parameter,

    /// Curvature control arm angle on the incoming side
    pub psi1: Parameter,

    /// Curvature control arm angle on the outgoing side
    pub psi2: Parameter,
}

impl AnchorPoint {
    /// Create a new anchor point. Fails if `name` is one of the airfoil's own anchor names.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &str,
        previous_anchor_point: &str,
        x: Parameter,
        y: Parameter,
        length: Parameter,
        radius: Parameter,
        ratio: Parameter,
        phi: Parameter,
        psi1: Parameter,
        psi2: Parameter,
    ) -> Result<Self> {
        let anchor = Self {
            name: name.to_string(),
            previous_anchor_point: previous_anchor_point.to_string(),
            x,
            y,
            length,
            radius,
            ratio,
            phi,
            psi1,
            psi2,
        };
        anchor.check_name()?;
        Ok(anchor)
    }

    pub(crate) fn check_name(&self) -> Result<()> {
        if [TE_1, LE, TE_2].contains(&self.name.as_str()) {
            Err(AirfoilError::ReservedName(self.name.clone()))
        } else {
            Ok(())
        }
    }

    /// The scaled position of the anchor, before any rotation of the airfoil.
    pub fn xy(&self) -> Point2 {
        Point2::new(self.x.value(), self.y.value())
    }

    pub fn set_length_scale(&mut self, scale: f64) {
        for p in self.slots_mut() {
            p.apply_length_scale(scale);
        }
    }
}

impl ParamSlots for AnchorPoint {
    fn slots(&self) -> Vec<&Parameter> {
        vec![
            &self.x,
            &self.y,
            &self.length,
            &self.radius,
            &self.ratio,
            &self.phi,
            &self.psi1,
            &self.psi2,
        ]
    }

    fn slots_mut(&mut self) -> Vec<&mut Parameter> {
        vec![
            &mut self.x,
            &mut self.y,
            &mut self.length,
            &mut self.radius,
            &mut self.ratio,
            &mut self.phi,
            &mut self.psi1,
            &mut self.psi2,
        ]
    }
}
