//! The base shape descriptor of an airfoil: the parameters which set the chord, angle of attack,
//! and the geometry of the leading and trailing edges.

use crate::common::check_angle_range;
use crate::param::{ParamSlots, Parameter};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

/// Slot names in the canonical order of the flattened vector.
pub const DESCRIPTOR_SLOTS: [&str; 17] = [
    "c",
    "alf",
    "R_le",
    "L_le",
    "r_le",
    "phi_le",
    "psi1_le",
    "psi2_le",
    "L1_te",
    "L2_te",
    "theta1_te",
    "theta2_te",
    "t_te",
    "r_te",
    "phi_te",
    "dx",
    "dy",
];

/// The fundamental parameters of every airfoil. Angles are in radians. Parameters with length
/// units are non-dimensionalized by the chord when `non_dim_by_chord` is set.
///
/// Construct with struct update syntax over `ShapeDescriptor::default()` and finish with
/// `validated()`, which checks the restricted angle ranges and applies the chord scaling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeDescriptor {
    /// Chord length
    pub c: Parameter,

    /// Angle of attack, the outline is rotated by its negative so that a positive angle pitches
    /// the leading edge up
    pub alf: Parameter,

    /// Leading edge radius of curvature, infinite to leave the curvature unconstrained
    pub radius_le: Parameter,

    /// Distance between the control points immediately before and after the leading edge
    pub length_le: Parameter,

    /// Fraction of `length_le` which lies on the upper (incoming) side of the leading edge
    pub ratio_le: Parameter,

    /// Leading edge tilt, counter-clockwise from the perpendicular to the chordline, [-pi, pi]
    pub phi_le: Parameter,

    /// Upper curvature control arm angle, counter-clockwise from the chordline, [-pi/2, pi/2]
    pub psi1_le: Parameter,

    /// Lower curvature control arm angle, clockwise from the chordline, [-pi/2, pi/2]
    pub psi2_le: Parameter,

    /// Length of the upper trailing edge tangent arm
    pub length1_te: Parameter,

    /// Length of the lower trailing edge tangent arm
    pub length2_te: Parameter,

    /// Upper trailing edge angle, clockwise from the chordline
    pub theta1_te: Parameter,

    /// Lower trailing edge angle, counter-clockwise from the chordline
    pub theta2_te: Parameter,

    /// Blunt trailing edge thickness
    pub t_te: Parameter,

    /// Fraction of `t_te` which lies above the chordline
    pub ratio_te: Parameter,

    /// Blunt trailing edge tilt, counter-clockwise from the perpendicular to the chordline
    pub phi_te: Parameter,

    /// Translation in x applied after the rotation to the angle of attack, in absolute units
    pub dx: Parameter,

    /// Translation in y applied after the rotation to the angle of attack, in absolute units
    pub dy: Parameter,

    pub non_dim_by_chord: bool,
}

impl Default for ShapeDescriptor {
    fn default() -> Self {
        Self {
            c: Parameter::new(1.0),
            alf: Parameter::new(0.0),
            radius_le: Parameter::length(0.1),
            length_le: Parameter::length(0.1),
            ratio_le: Parameter::new(0.5),
            phi_le: Parameter::new(0.0).inactive(),
            psi1_le: Parameter::new(0.0),
            psi2_le: Parameter::new(0.0),
            length1_te: Parameter::length(0.1),
            length2_te: Parameter::length(0.1),
            theta1_te: Parameter::new(10.0_f64.to_radians()),
            theta2_te: Parameter::new(10.0_f64.to_radians()),
            t_te: Parameter::length(0.0).inactive(),
            ratio_te: Parameter::new(0.5).inactive(),
            phi_te: Parameter::new(0.0).inactive(),
            dx: Parameter::new(0.0).inactive(),
            dy: Parameter::new(0.0).inactive(),
            non_dim_by_chord: true,
        }
    }
}

impl ShapeDescriptor {
    /// Validate the restricted angles and apply the chord scaling, consuming the descriptor and
    /// returning it ready for use.
    ///
    /// # Examples
    ///
    /// ```
    /// use airpar::{Parameter, ShapeDescriptor};
    /// let descriptor = ShapeDescriptor {
    ///     c: Parameter::new(2.0),
    ///     ..ShapeDescriptor::default()
    /// }
    /// .validated()
    /// .unwrap();
    /// assert_eq!(descriptor.length_le.value(), 0.2);
    ///
    /// let bad = ShapeDescriptor {
    ///     psi1_le: Parameter::new(2.0),
    ///     ..ShapeDescriptor::default()
    /// };
    /// assert!(bad.validated().is_err());
    /// ```
    pub fn validated(mut self) -> Result<Self> {
        self.refresh()?;
        Ok(self)
    }

    /// Checks the leading edge tilt and the curvature control arm angles against their legal
    /// ranges.
    pub fn validate(&self) -> Result<()> {
        check_angle_range("phi_le", self.phi_le.value(), -PI, PI)?;
        check_angle_range("psi1_le", self.psi1_le.value(), -FRAC_PI_2, FRAC_PI_2)?;
        check_angle_range("psi2_le", self.psi2_le.value(), -FRAC_PI_2, FRAC_PI_2)?;
        Ok(())
    }

    /// The length scale dimension applied to parameters with length units, or `None` when the
    /// descriptor is not non-dimensionalized.
    pub fn length_scale(&self) -> Option<f64> {
        self.non_dim_by_chord.then(|| self.c.value())
    }

    fn apply_scale(&mut self) {
        if let Some(scale) = self.length_scale() {
            for p in self.slots_mut().into_iter().skip(1) {
                p.apply_length_scale(scale);
            }
        }
    }
}

impl ParamSlots for ShapeDescriptor {
    fn slots(&self) -> Vec<&Parameter> {
        vec![
            &self.c,
            &self.alf,
            &self.radius_le,
            &self.length_le,
            &self.ratio_le,
            &self.phi_le,
            &self.psi1_le,
            &self.psi2_le,
            &self.length1_te,
            &self.length2_te,
            &self.theta1_te,
            &self.theta2_te,
            &self.t_te,
            &self.ratio_te,
            &self.phi_te,
            &self.dx,
            &self.dy,
        ]
    }

    fn slots_mut(&mut self) -> Vec<&mut Parameter> {
        vec![
            &mut self.c,
            &mut self.alf,
            &mut self.radius_le,
            &mut self.length_le,
            &mut self.ratio_le,
            &mut self.phi_le,
            &mut self.psi1_le,
            &mut self.psi2_le,
            &mut self.length1_te,
            &mut self.length2_te,
            &mut self.theta1_te,
            &mut self.theta2_te,
            &mut self.t_te,
            &mut self.ratio_te,
            &mut self.phi_te,
            &mut self.dx,
            &mut self.dy,
        ]
    }

    fn refresh(&mut self) -> Result<()> {
        self.apply_scale();
        self.validate()
    }
}
