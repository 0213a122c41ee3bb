use crate::airfoil::{AnchorPoint, FreePoint, ShapeDescriptor};
use crate::Result;
use serde::{Deserialize, Serialize};

fn default_number_coordinates() -> usize {
    100
}

/// A complete, serializable description of an airfoil: the per-segment sample count, the
/// base shape descriptor, and the anchor and free points in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirfoilConfig {
    #[serde(default = "default_number_coordinates")]
    pub number_coordinates: usize,

    #[serde(default)]
    pub descriptor: ShapeDescriptor,

    #[serde(default)]
    pub anchor_points: Vec<AnchorPoint>,

    #[serde(default)]
    pub free_points: Vec<FreePoint>,
}

impl Default for AirfoilConfig {
    fn default() -> Self {
        Self {
            number_coordinates: default_number_coordinates(),
            descriptor: ShapeDescriptor::default(),
            anchor_points: Vec::new(),
            free_points: Vec::new(),
        }
    }
}

impl AirfoilConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
