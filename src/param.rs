//! Named scalar parameters and the flatten/override contract shared by every object which is
//! driven by them.
//!
//! A `Parameter` holds the value it was given along with its bounds, flags, and units. Values
//! of parameters with length units are stored non-dimensionally where the owner requests it,
//! and the effective (dimensional) value is produced on demand from a length scale that is
//! recorded on the parameter. Because the stored value is never multiplied in place, a parameter
//! can't be scaled twice, and flattening followed by overriding is exact.

use crate::errors::AirfoilError;
use crate::Result;
use serde::{Deserialize, Serialize};

/// The physical units of a parameter, which determine how it responds to length scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Units {
    #[default]
    None,
    Length,
    InverseLength,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    /// The value as supplied, before any length scaling is applied
    #[serde(with = "infinite_as_null")]
    value: f64,

    /// Lower and upper bounds, used by optimizers working on the flattened parameter vector
    #[serde(default = "unbounded", with = "bounds_as_nullable")]
    bounds: [f64; 2],

    #[serde(default = "default_true")]
    active: bool,

    /// Linked parameters are derived from other values by the caller and are never part of the
    /// flattened vector
    #[serde(default)]
    linked: bool,

    #[serde(default)]
    units: Units,

    /// A fixed scale given when the parameter was created. When present it takes priority over
    /// the scale applied by the owning object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scale_value: Option<f64>,

    #[serde(skip)]
    length_scale: Option<f64>,
}

fn unbounded() -> [f64; 2] {
    [f64::NEG_INFINITY, f64::INFINITY]
}

fn default_true() -> bool {
    true
}

impl Parameter {
    /// Create a new active, unlinked, unbounded parameter without units.
    pub fn new(value: f64) -> Self {
        Self {
            value,
            bounds: unbounded(),
            active: true,
            linked: false,
            units: Units::None,
            scale_value: None,
            length_scale: None,
        }
    }

    /// Create a new parameter with length units.
    pub fn length(value: f64) -> Self {
        Self::new(value).with_units(Units::Length)
    }

    /// Create a new parameter with inverse length units, such as a curvature.
    pub fn inverse_length(value: f64) -> Self {
        Self::new(value).with_units(Units::InverseLength)
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    pub fn with_bounds(mut self, lo: f64, hi: f64) -> Self {
        self.bounds = [lo, hi];
        self
    }

    /// Fix the length scale of this parameter at creation. Owners will not rescale it.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale_value = Some(scale);
        self
    }

    /// Mark the parameter as inactive. Inactive parameters still participate in the geometry
    /// but are excluded from the flattened vector.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Mark the parameter as linked (derived from other parameters by the caller).
    pub fn linked(mut self) -> Self {
        self.linked = true;
        self
    }

    /// The effective value of the parameter after length scaling.
    pub fn value(&self) -> f64 {
        match (self.units, self.scale()) {
            (Units::Length, Some(s)) => self.value * s,
            (Units::InverseLength, Some(s)) => self.value / s,
            _ => self.value,
        }
    }

    /// The value as stored, before length scaling. This is the value which appears in the
    /// flattened parameter vector.
    pub fn raw(&self) -> f64 {
        self.value
    }

    pub fn set_raw(&mut self, value: f64) {
        self.value = value;
    }

    /// The length scale which is currently applied to the parameter, if any.
    pub fn scale(&self) -> Option<f64> {
        self.scale_value.or(self.length_scale)
    }

    /// Scale the parameter by the owner's length scale dimension. Parameters without units or
    /// with a fixed `scale_value` are unaffected. The scale replaces any previously applied
    /// owner scale, so repeated application never compounds.
    pub fn apply_length_scale(&mut self, scale: f64) {
        if self.units != Units::None && self.scale_value.is_none() {
            self.length_scale = Some(scale);
        }
    }

    pub fn bounds(&self) -> [f64; 2] {
        self.bounds
    }

    pub fn units(&self) -> Units {
        self.units
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// True if the parameter is part of the flattened vector: active and not linked.
    pub fn is_free(&self) -> bool {
        self.active && !self.linked
    }

    /// True if the stored value lies within the parameter's bounds, inclusive.
    pub fn in_bounds(&self) -> bool {
        self.value >= self.bounds[0] && self.value <= self.bounds[1]
    }
}

impl From<f64> for Parameter {
    fn from(value: f64) -> Self {
        Parameter::new(value)
    }
}

/// Implemented by objects driven by a fixed, ordered list of parameter slots. The order of
/// `slots()` and `slots_mut()` must agree, and defines the layout of the flattened vector.
pub trait ParamSlots {
    /// The parameter slots in their canonical order.
    fn slots(&self) -> Vec<&Parameter>;

    /// The parameter slots in their canonical order, mutably.
    fn slots_mut(&mut self) -> Vec<&mut Parameter>;

    /// Called after new values have been assigned by `override_values`, so that the owner can
    /// re-apply unit scaling and re-check any constraints on its values.
    fn refresh(&mut self) -> Result<()> {
        Ok(())
    }

    /// The stored values of all free (active and unlinked) parameters, in slot order.
    fn flatten(&self) -> Vec<f64> {
        self.slots()
            .into_iter()
            .filter(|p| p.is_free())
            .map(|p| p.raw())
            .collect()
    }

    /// The bounds of all free parameters, in the same order as `flatten()`.
    fn free_bounds(&self) -> Vec<[f64; 2]> {
        self.slots()
            .into_iter()
            .filter(|p| p.is_free())
            .map(|p| p.bounds())
            .collect()
    }

    /// The number of free parameters, which is the length of `flatten()`.
    fn n_free(&self) -> usize {
        self.slots().into_iter().filter(|p| p.is_free()).count()
    }

    /// Assign new values to the free parameters positionally, in the same order as
    /// `flatten()`. The number of values must match the number of free parameters exactly.
    fn override_values(&mut self, values: &[f64]) -> Result<()> {
        let expected = self.n_free();
        if values.len() != expected {
            return Err(AirfoilError::LengthMismatch {
                expected,
                actual: values.len(),
            });
        }

        for (p, v) in self
            .slots_mut()
            .into_iter()
            .filter(|p| p.is_free())
            .zip(values)
        {
            p.set_raw(*v);
        }

        self.refresh()
    }
}

/// Serializes positive infinity as `null` and reads `null` back as positive infinity, which is
/// how an unconstrained curvature radius is written in a configuration file. NaN has no
/// representation and fails to serialize.
mod infinite_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, s: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            Err(serde::ser::Error::custom("a parameter value of NaN cannot be serialized"))
        } else if value.is_finite() {
            s.serialize_f64(*value)
        } else if *value < 0.0 {
            s.serialize_str("-inf")
        } else {
            s.serialize_none()
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        match Option::<Repr>::deserialize(d)? {
            None => Ok(f64::INFINITY),
            Some(Repr::Number(v)) => Ok(v),
            Some(Repr::Text(t)) => match t.as_str() {
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                _ => Err(serde::de::Error::custom(format!(
                    "expected a number, null, \"inf\" or \"-inf\", found \"{t}\""
                ))),
            },
        }
    }
}

/// Serializes unbounded ends of a bounds pair as `null`.
mod bounds_as_nullable {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bounds: &[f64; 2], s: S) -> Result<S::Ok, S::Error> {
        let lo = bounds[0].is_finite().then_some(bounds[0]);
        let hi = bounds[1].is_finite().then_some(bounds[1]);
        [lo, hi].serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[f64; 2], D::Error> {
        let [lo, hi] = <[Option<f64>; 2]>::deserialize(d)?;
        Ok([
            lo.unwrap_or(f64::NEG_INFINITY),
            hi.unwrap_or(f64::INFINITY),
        ])
    }
}
