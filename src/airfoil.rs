//! This module contains the construction of a parametric airfoil outline. The outline is a
//! closed chain of Bezier segments which runs from the upper trailing edge, over the upper
//! surface to the leading edge, and back along the lower surface to the lower trailing edge.
//! Segments meet at anchor points, where the support control points on either side are placed
//! so that the outline is tangent and curvature continuous.
//!
//! Every quantity which shapes the outline is a `Parameter`, and the free parameters of the
//! descriptor, the anchor points, and the free points together form a single flat vector which
//! can be read with `Airfoil::flatten` and written back with `Airfoil::override_parameters`.

mod anchor;
mod chain;
mod config;
mod continuity;
mod descriptor;
mod free_point;

use crate::common::points::transform_points;
use crate::errors::AirfoilError;
use crate::geom2::polyline2::{is_simple, signed_area};
use crate::geom2::{sample_segments, BezierCurve2, BezierSamples};
use crate::param::ParamSlots;
use crate::{Iso2, Point2, Result, Vector2};
use chain::{AnchorChain, AnchorRecord};
use continuity::{
    g1_support, leading_edge_g1, lower_te_support, trailing_edges, upper_te_support,
    CurvatureControl,
};
use tracing::{debug, warn};

pub use anchor::{AnchorPoint, ANCHOR_SLOTS, LE, TE_1, TE_2};
pub use config::AirfoilConfig;
pub use continuity::{g2_support, Surface, DEGENERATE_TOL};
pub use descriptor::{ShapeDescriptor, DESCRIPTOR_SLOTS};
pub use free_point::{FreePoint, FREE_POINT_SLOTS};

/// A parametric airfoil outline.
///
/// The outline is rebuilt lazily: mutators mark it stale, and the accessors which return
/// geometry bring it up to date before answering, which is why they take `&mut self`.
///
/// # Examples
///
/// ```
/// use airpar::{Airfoil, ShapeDescriptor};
/// let mut airfoil = Airfoil::new(50, ShapeDescriptor::default(), vec![], vec![]).unwrap();
/// assert_eq!(airfoil.coords().unwrap().len(), 99);
/// assert!(airfoil.compute_area().unwrap() > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Airfoil {
    nt: usize,
    descriptor: ShapeDescriptor,
    anchor_points: Vec<AnchorPoint>,
    free_points: Vec<FreePoint>,
    chain: AnchorChain,

    /// Rigid transform applied by the user with `rotate` and `translate`, on top of the
    /// descriptor's own angle of attack and offset
    placement: Iso2,

    control_points: Vec<Point2>,
    skeleton: Vec<Point2>,
    segments: Vec<BezierCurve2>,
    coords: Vec<Point2>,
    curvature: Vec<(f64, f64)>,
    needs_update: bool,
}

impl Airfoil {
    /// Create a new airfoil from a base descriptor, anchor points, and free points, sampling
    /// each Bezier segment at `nt` parameter values. Anchor points are inserted in the order
    /// given, so an anchor's predecessor must be a fixed anchor or appear earlier in the list.
    pub fn new(
        nt: usize,
        descriptor: ShapeDescriptor,
        anchor_points: Vec<AnchorPoint>,
        free_points: Vec<FreePoint>,
    ) -> Result<Self> {
        if nt < 2 {
            return Err(AirfoilError::TooFewSamples(nt));
        }
        let descriptor = descriptor.validated()?;
        let chain = base_chain(&descriptor);

        let mut airfoil = Self {
            nt,
            descriptor,
            anchor_points: Vec::new(),
            free_points: Vec::new(),
            chain,
            placement: Iso2::identity(),
            control_points: Vec::new(),
            skeleton: Vec::new(),
            segments: Vec::new(),
            coords: Vec::new(),
            curvature: Vec::new(),
            needs_update: true,
        };

        for anchor in anchor_points {
            airfoil.add_anchor_point(anchor)?;
        }
        for free_point in free_points {
            airfoil.add_free_point(free_point)?;
        }

        airfoil.update()?;
        Ok(airfoil)
    }

    pub fn from_config(config: AirfoilConfig) -> Result<Self> {
        Self::new(
            config.number_coordinates,
            config.descriptor,
            config.anchor_points,
            config.free_points,
        )
    }

    /// The configuration which reproduces this airfoil, less any rigid placement.
    pub fn to_config(&self) -> AirfoilConfig {
        AirfoilConfig {
            number_coordinates: self.nt,
            descriptor: self.descriptor.clone(),
            anchor_points: self.anchor_points.clone(),
            free_points: self.free_points.clone(),
        }
    }

    pub fn descriptor(&self) -> &ShapeDescriptor {
        &self.descriptor
    }

    pub fn anchor_points(&self) -> &[AnchorPoint] {
        &self.anchor_points
    }

    pub fn free_points(&self) -> &[FreePoint] {
        &self.free_points
    }

    /// Insert an anchor point into the chain immediately after its previous anchor point. The
    /// airfoil is left unchanged if the insertion fails.
    pub fn add_anchor_point(&mut self, mut anchor: AnchorPoint) -> Result<()> {
        anchor.check_name()?;
        if let Some(scale) = self.descriptor.length_scale() {
            anchor.set_length_scale(scale);
        }

        debug!(
            name = %anchor.name,
            previous = %anchor.previous_anchor_point,
            "adding anchor point"
        );
        self.anchor_points.push(anchor);
        self.rechain().inspect_err(|_| {
            self.anchor_points.pop();
        })
    }

    /// Attach a free point to the segment leaving its previous anchor point. The airfoil is left
    /// unchanged if the attachment fails.
    pub fn add_free_point(&mut self, mut free_point: FreePoint) -> Result<()> {
        if let Some(scale) = self.descriptor.length_scale() {
            free_point.set_length_scale(scale);
        }

        debug!(previous = %free_point.previous_anchor_point, "adding free point");
        self.free_points.push(free_point);
        self.rechain().inspect_err(|_| {
            self.free_points.pop();
        })
    }

    fn rechain(&mut self) -> Result<()> {
        self.chain = self.build_chain()?;
        self.invalidate();
        Ok(())
    }

    /// Mark the outline as stale, so that the next geometry accessor rebuilds it.
    pub fn invalidate(&mut self) {
        self.needs_update = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.needs_update
    }

    fn owners(&self) -> impl Iterator<Item = &dyn ParamSlots> + '_ {
        std::iter::once(&self.descriptor as &dyn ParamSlots)
            .chain(self.anchor_points.iter().map(|a| a as &dyn ParamSlots))
            .chain(self.free_points.iter().map(|f| f as &dyn ParamSlots))
    }

    /// The stored values of every free parameter: the descriptor first, then each anchor point
    /// and each free point in insertion order.
    pub fn flatten(&self) -> Vec<f64> {
        self.owners().flat_map(|o| o.flatten()).collect()
    }

    /// The bounds of every free parameter, in the same order as `flatten()`.
    pub fn bounds(&self) -> Vec<[f64; 2]> {
        self.owners().flat_map(|o| o.free_bounds()).collect()
    }

    pub fn n_parameters(&self) -> usize {
        self.owners().map(|o| o.n_free()).sum()
    }

    /// Labels for every free parameter, in the same order as `flatten()`. Anchor parameters are
    /// prefixed with the anchor name and free point parameters with their position in the list.
    pub fn parameter_names(&self) -> Vec<String> {
        let mut names = free_names(&self.descriptor, &DESCRIPTOR_SLOTS, None);
        for a in &self.anchor_points {
            names.extend(free_names(a, &ANCHOR_SLOTS, Some(a.name.as_str())));
        }
        for (i, f) in self.free_points.iter().enumerate() {
            let prefix = format!("free_{i}");
            names.extend(free_names(f, &FREE_POINT_SLOTS, Some(prefix.as_str())));
        }
        names
    }

    /// Assign a new value to every free parameter, in the order of `flatten()`, and rebuild the
    /// outline. If the new values are rejected the airfoil is left unchanged.
    pub fn override_parameters(&mut self, values: &[f64]) -> Result<()> {
        let expected = self.n_parameters();
        if values.len() != expected {
            return Err(AirfoilError::LengthMismatch {
                expected,
                actual: values.len(),
            });
        }

        let mut descriptor = self.descriptor.clone();
        let mut anchor_points = self.anchor_points.clone();
        let mut free_points = self.free_points.clone();

        let (head, mut rest) = values.split_at(descriptor.n_free());
        descriptor.override_values(head)?;
        for a in anchor_points.iter_mut() {
            let (head, tail) = rest.split_at(a.n_free());
            a.override_values(head)?;
            rest = tail;
        }
        for f in free_points.iter_mut() {
            let (head, tail) = rest.split_at(f.n_free());
            f.override_values(head)?;
            rest = tail;
        }

        // The chord may have changed
        if let Some(scale) = descriptor.length_scale() {
            anchor_points
                .iter_mut()
                .for_each(|a| a.set_length_scale(scale));
            free_points
                .iter_mut()
                .for_each(|f| f.set_length_scale(scale));
        }

        let previous = (
            std::mem::replace(&mut self.descriptor, descriptor),
            std::mem::replace(&mut self.anchor_points, anchor_points),
            std::mem::replace(&mut self.free_points, free_points),
        );

        if let Err(e) = self.update() {
            (self.descriptor, self.anchor_points, self.free_points) = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Build a fresh anchor chain from the current parameters, with every support point solved
    /// against the final segment orders.
    fn build_chain(&self) -> Result<AnchorChain> {
        let mut chain = base_chain(&self.descriptor);
        for a in &self.anchor_points {
            insert_anchor(&mut chain, a)?;
        }
        for f in &self.free_points {
            chain.attach_free_point(&f.previous_anchor_point, f.xy())?;
        }
        chain.solve_all_curvature()?;
        Ok(chain)
    }

    /// The transform from the airfoil's local frame, with the leading edge at the origin and
    /// the chord along the x-axis, to its final position: rotation by the negative angle of
    /// attack, then the descriptor offset, then the user placement.
    fn transform(&self) -> Iso2 {
        let offset = Vector2::new(self.descriptor.dx.value(), self.descriptor.dy.value());
        self.placement * Iso2::new(offset, -self.descriptor.alf.value())
    }

    /// Rebuild the anchor chain and the sampled outline from the current parameters.
    pub fn update(&mut self) -> Result<()> {
        let chain = self.build_chain()?;
        debug_assert!(chain.is_well_formed());
        let transform = self.transform();
        let control_points = transform_points(&chain.control_polygon(), &transform);
        let skeleton = transform_points(&chain.skeleton(), &transform);

        let orders = chain.segment_orders();
        let mut segments = Vec::with_capacity(orders.len());
        let mut start = 0;
        for (_, n) in &orders {
            let points = control_points.get(start..=start + n).ok_or(
                AirfoilError::NotEnoughPoints {
                    required: start + n + 1,
                    actual: control_points.len(),
                },
            )?;
            segments.push(BezierCurve2::new(points)?);
            start += n;
        }

        let samples = sample_segments(&segments, self.nt);
        let (coords, curvature) = stitch(&samples);

        self.check_bounds();
        debug!(
            anchors = chain.len(),
            segments = segments.len(),
            control_points = control_points.len(),
            coordinates = coords.len(),
            "airfoil updated"
        );

        self.chain = chain;
        self.control_points = control_points;
        self.skeleton = skeleton;
        self.segments = segments;
        self.coords = coords;
        self.curvature = curvature;
        self.needs_update = false;
        Ok(())
    }

    /// True if every free parameter lies within its bounds. Each one that does not is logged.
    fn check_bounds(&self) -> bool {
        let free = self
            .owners()
            .flat_map(|o| o.slots().into_iter().filter(|p| p.is_free()));

        let mut all_in = true;
        for (name, p) in self.parameter_names().iter().zip(free) {
            if !p.in_bounds() {
                let [lo, hi] = p.bounds();
                warn!(
                    parameter = %name,
                    value = p.raw(),
                    lo,
                    hi,
                    "parameter is outside of its bounds"
                );
                all_in = false;
            }
        }
        all_in
    }

    /// True if every free parameter lies within its bounds.
    pub fn parameters_in_bounds(&self) -> bool {
        self.check_bounds()
    }

    fn ensure_updated(&mut self) -> Result<()> {
        if self.needs_update {
            self.update()?;
        }
        Ok(())
    }

    /// Translate the airfoil. The placement is kept across rebuilds from new parameters.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.placement = Iso2::translation(dx, dy) * self.placement;
        self.invalidate();
    }

    /// Rotate the airfoil counter-clockwise about the origin by `angle` radians. The placement
    /// is kept across rebuilds from new parameters.
    pub fn rotate(&mut self, angle: f64) {
        self.placement = Iso2::rotation(angle) * self.placement;
        self.invalidate();
    }

    pub fn placement(&self) -> &Iso2 {
        &self.placement
    }

    /// The sampled outline, from the upper trailing edge around the leading edge to the lower
    /// trailing edge. Samples shared by adjacent segments appear once.
    pub fn coords(&mut self) -> Result<&[Point2]> {
        self.ensure_updated()?;
        Ok(&self.coords)
    }

    /// Pairs of `(x, k)` for every sample of the outline, where `k` is the signed curvature.
    pub fn curvature(&mut self) -> Result<&[(f64, f64)]> {
        self.ensure_updated()?;
        Ok(&self.curvature)
    }

    /// The full control polygon from the upper trailing edge to the lower trailing edge.
    pub fn control_points(&mut self) -> Result<&[Point2]> {
        self.ensure_updated()?;
        Ok(&self.control_points)
    }

    pub fn n_control_points(&mut self) -> Result<usize> {
        Ok(self.control_points()?.len())
    }

    /// The anchor positions alone, in chain order.
    pub fn anchor_skeleton(&mut self) -> Result<&[Point2]> {
        self.ensure_updated()?;
        Ok(&self.skeleton)
    }

    /// The Bezier segments of the outline, in chain order.
    pub fn segments(&mut self) -> Result<&[BezierCurve2]> {
        self.ensure_updated()?;
        Ok(&self.segments)
    }

    /// The order of each segment keyed by the name of the anchor it starts at.
    pub fn segment_orders(&self) -> Vec<(String, usize)> {
        self.chain.segment_orders()
    }

    pub fn anchor_order(&self) -> Vec<String> {
        self.chain.names()
    }

    /// The signed area enclosed by the outline, positive when it runs counter-clockwise.
    pub fn compute_area(&mut self) -> Result<f64> {
        Ok(signed_area(self.coords()?))
    }

    /// Returns true if any two non-adjacent edges of the sampled outline intersect.
    pub fn check_self_intersection(&mut self) -> Result<bool> {
        Ok(!is_simple(self.coords()?))
    }
}

/// The minimal chain of the upper trailing edge, the leading edge at the origin, and the lower
/// trailing edge.
fn base_chain(d: &ShapeDescriptor) -> AnchorChain {
    let (te_1, te_2) = trailing_edges(
        d.c.value(),
        d.t_te.value(),
        d.ratio_te.value(),
        d.phi_te.value(),
    );
    let upper = AnchorRecord::trailing_edge(
        TE_1,
        te_1,
        upper_te_support(&te_1, d.length1_te.value(), d.theta1_te.value()),
        true,
    );
    let lower = AnchorRecord::trailing_edge(
        TE_2,
        te_2,
        lower_te_support(&te_2, d.length2_te.value(), d.theta2_te.value()),
        false,
    );

    let le = Point2::origin();
    let curvature = CurvatureControl::new(
        d.radius_le.value(),
        d.psi1_le.value(),
        d.psi2_le.value(),
    );
    let mut leading = AnchorRecord::interior(LE, le, curvature);
    leading.set_g1(leading_edge_g1(
        &le,
        d.length_le.value(),
        d.ratio_le.value(),
        d.phi_le.value(),
    ));

    AnchorChain::new(upper, leading, lower)
}

fn insert_anchor(chain: &mut AnchorChain, a: &AnchorPoint) -> Result<()> {
    let curvature = CurvatureControl::new(a.radius.value(), a.psi1.value(), a.psi2.value());
    let record = AnchorRecord::interior(&a.name, a.xy(), curvature);
    let index = chain.insert_after(&a.previous_anchor_point, record)?;
    let g1 = g1_support(
        &a.xy(),
        a.length.value(),
        a.ratio.value(),
        a.phi.value(),
        chain.surface(index),
    );
    chain.record_mut(index).set_g1(g1);
    Ok(())
}

fn free_names(owner: &dyn ParamSlots, slots: &[&str], prefix: Option<&str>) -> Vec<String> {
    owner
        .slots()
        .into_iter()
        .zip(slots)
        .filter(|(p, _)| p.is_free())
        .map(|(_, name)| match prefix {
            Some(prefix) => format!("{prefix}.{name}"),
            None => name.to_string(),
        })
        .collect()
}

/// Concatenate the samples of consecutive segments, dropping the first sample of every
/// segment after the first since it repeats the end of the segment before it.
fn stitch(samples: &[BezierSamples]) -> (Vec<Point2>, Vec<(f64, f64)>) {
    let mut coords = Vec::new();
    let mut curvature = Vec::new();
    for (i, s) in samples.iter().enumerate() {
        let skip = usize::from(i > 0);
        coords.extend(s.points.iter().skip(skip).copied());
        if let Some(k) = &s.curvature {
            curvature.extend(
                s.points
                    .iter()
                    .zip(k.iter())
                    .skip(skip)
                    .map(|(p, k)| (p.x, *k)),
            );
        }
    }
    (coords, curvature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::points::{dist, max_deviation};
    use crate::common::signed_angle;
    use crate::param::Parameter;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use test_case::test_case;

    fn deg(v: f64) -> Parameter {
        Parameter::new(v.to_radians())
    }

    fn reference_descriptor() -> ShapeDescriptor {
        ShapeDescriptor {
            c: Parameter::new(5.0),
            alf: deg(5.0),
            radius_le: Parameter::length(0.06),
            length_le: Parameter::length(0.08),
            ratio_le: Parameter::new(0.6),
            phi_le: deg(5.0),
            psi1_le: deg(10.0),
            psi2_le: deg(15.0),
            length1_te: Parameter::length(0.25),
            length2_te: Parameter::length(0.3),
            theta1_te: deg(2.0),
            theta2_te: deg(2.0),
            t_te: Parameter::length(0.0),
            ratio_te: Parameter::new(0.5),
            phi_te: Parameter::new(0.0),
            ..ShapeDescriptor::default()
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn anchor(
        name: &str,
        prev: &str,
        x: f64,
        y: f64,
        length: f64,
        radius: f64,
        ratio: f64,
        psi: f64,
    ) -> AnchorPoint {
        AnchorPoint::new(
            name,
            prev,
            Parameter::length(x),
            Parameter::length(y),
            Parameter::length(length),
            Parameter::length(radius),
            Parameter::new(ratio),
            Parameter::new(0.0),
            deg(psi),
            deg(psi),
        )
        .unwrap()
    }

    fn free(prev: &str, x: f64, y: f64) -> FreePoint {
        FreePoint::new(prev, Parameter::length(x), Parameter::length(y))
    }

    fn reference_airfoil() -> Airfoil {
        Airfoil::new(
            100,
            reference_descriptor(),
            vec![
                anchor("anchor-top", TE_1, 0.55, 0.05, 0.1, -0.3, 0.5, 45.0),
                anchor("anchor-bottom", LE, 0.35, -0.02, 0.13, 0.4, 0.7, 75.0),
            ],
            vec![
                free(LE, 0.15, 0.015),
                free("anchor-bottom", 0.58, 0.0),
                free("anchor-top", 0.3, 0.07),
            ],
        )
        .unwrap()
    }

    fn max_pair_deviation(a: &[(f64, f64)], b: &[(f64, f64)]) -> f64 {
        if a.len() != b.len() {
            return f64::INFINITY;
        }
        a.iter()
            .zip(b)
            .map(|(p, q)| (p.0 - q.0).abs().max((p.1 - q.1).abs()))
            .fold(0.0, f64::max)
    }

    fn orders(airfoil: &Airfoil) -> Vec<usize> {
        airfoil
            .segment_orders()
            .into_iter()
            .map(|(_, n)| n)
            .collect()
    }

    #[test]
    fn test_reference_outline() {
        let mut airfoil = reference_airfoil();
        assert_eq!(
            airfoil.anchor_order(),
            vec![TE_1, "anchor-top", LE, "anchor-bottom", TE_2]
        );
        assert_eq!(orders(&airfoil), vec![4, 6, 6, 5]);
        assert_eq!(airfoil.n_control_points().unwrap(), 22);
        assert_eq!(airfoil.n_parameters(), 37);

        let coords = airfoil.coords().unwrap().to_vec();
        assert_eq!(coords.len(), 397);
        assert_relative_eq!(coords[0], Point2::new(4.98097, -0.43578), epsilon = 1.0e-5);
        assert!(dist(&coords[0], &coords[396]) < 1.0e-12);

        assert!(!airfoil.check_self_intersection().unwrap());
        assert_relative_eq!(airfoil.compute_area().unwrap(), 1.22705, max_relative = 1.0e-3);
    }

    #[test]
    fn test_reference_curvature_at_anchors() {
        let mut airfoil = reference_airfoil();
        let segments = airfoil.segments().unwrap().to_vec();

        // Scaled radii of anchor-top, le and anchor-bottom
        for (i, radius) in [(1, -1.5), (2, 0.3), (3, 2.0)] {
            let incoming = segments[i - 1].curvature_at(1.0).unwrap();
            let outgoing = segments[i].curvature_at(0.0).unwrap();
            assert_relative_eq!(incoming, 1.0 / radius, max_relative = 1.0e-8);
            assert_relative_eq!(outgoing, 1.0 / radius, max_relative = 1.0e-8);
        }
    }

    #[test]
    fn test_default_outline() {
        let mut airfoil = Airfoil::new(100, ShapeDescriptor::default(), vec![], vec![]).unwrap();
        assert_eq!(orders(&airfoil), vec![4, 4]);
        assert_eq!(airfoil.coords().unwrap().len(), 199);
        assert!(!airfoil.check_self_intersection().unwrap());
        assert_relative_eq!(airfoil.compute_area().unwrap(), 0.05077, max_relative = 1.0e-3);
    }

    #[test]
    fn test_round_trip() {
        let mut airfoil = reference_airfoil();
        let before = airfoil.coords().unwrap().to_vec();
        let polygon = airfoil.control_points().unwrap().to_vec();
        let curvature = airfoil.curvature().unwrap().to_vec();
        let values = airfoil.flatten();
        airfoil.override_parameters(&values).unwrap();

        assert_eq!(airfoil.flatten(), values);
        assert!(max_deviation(&before, airfoil.coords().unwrap()) < 1.0e-9);
        assert!(max_deviation(&polygon, airfoil.control_points().unwrap()) < 1.0e-9);
        assert!(max_pair_deviation(&curvature, airfoil.curvature().unwrap()) < 1.0e-9);
    }

    #[test]
    fn test_parameter_names_align_with_flatten() {
        let airfoil = reference_airfoil();
        let names = airfoil.parameter_names();
        assert_eq!(names.len(), airfoil.flatten().len());
        assert_eq!(names[0], "c");
        assert_eq!(names[15], "anchor-top.x");
        assert_eq!(names[36], "free_2.y");
    }

    #[test_case(0)]
    #[test_case(1)]
    #[test_case(3)]
    fn test_free_points_raise_order(k: usize) {
        let points = (0..k)
            .map(|i| free(LE, 0.2 + 0.2 * i as f64, -0.06))
            .collect::<Vec<_>>();
        let mut airfoil = Airfoil::new(30, ShapeDescriptor::default(), vec![], points).unwrap();
        assert_eq!(orders(&airfoil), vec![4, 4 + k]);
        assert_eq!(airfoil.n_control_points().unwrap(), 9 + k);
        assert_eq!(airfoil.coords().unwrap().len(), 59);
    }

    #[test]
    fn test_relaxed_curvature() {
        let mut airfoil = Airfoil::new(
            40,
            ShapeDescriptor::default(),
            vec![anchor("flat", LE, 0.4, -0.05, 0.1, f64::INFINITY, 0.5, 30.0)],
            vec![],
        )
        .unwrap();

        let chain = &airfoil.chain;
        let record = chain.record(chain.index_of("flat").unwrap());
        assert_eq!(record.g2_minus, record.g1_minus);
        assert_eq!(record.g2_plus, record.g1_plus);

        let segments = airfoil.segments().unwrap();
        assert_relative_eq!(segments[1].curvature_at(1.0).unwrap(), 0.0, epsilon = 1.0e-9);
        assert_relative_eq!(segments[2].curvature_at(0.0).unwrap(), 0.0, epsilon = 1.0e-9);
    }

    #[test]
    fn test_tangent_continuity_randomized() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut airfoil = reference_airfoil();
        let base = airfoil.flatten();

        for _ in 0..20 {
            let values = base
                .iter()
                .map(|v| v * (1.0 + rng.random_range(-0.05..0.05)))
                .collect::<Vec<_>>();
            airfoil.override_parameters(&values).unwrap();

            let segments = airfoil.segments().unwrap();
            for pair in segments.windows(2) {
                let angle = signed_angle(&pair[0].derivative(1.0), &pair[1].derivative(0.0));
                assert!(angle.abs() < 1.0e-6, "tangent mismatch of {angle} rad");
            }
        }
    }

    #[test]
    fn test_rotation_inverse() {
        let mut airfoil = reference_airfoil();
        let before = airfoil.coords().unwrap().to_vec();
        let polygon = airfoil.control_points().unwrap().to_vec();
        let curvature = airfoil.curvature().unwrap().to_vec();

        airfoil.rotate(0.7);
        assert!(airfoil.is_dirty());
        let rotated = airfoil.coords().unwrap().to_vec();
        assert!(max_deviation(&before, &rotated) > 1.0e-3);

        airfoil.rotate(-0.7);
        assert!(max_deviation(&before, airfoil.coords().unwrap()) < 1.0e-9);
        assert!(max_deviation(&polygon, airfoil.control_points().unwrap()) < 1.0e-9);
        assert!(max_pair_deviation(&curvature, airfoil.curvature().unwrap()) < 1.0e-9);
    }

    #[test]
    fn test_placement_survives_override() {
        let mut airfoil = reference_airfoil();
        airfoil.translate(1.0, -2.0);
        airfoil.rotate(0.25);
        let placed = airfoil.coords().unwrap().to_vec();

        let values = airfoil.flatten();
        airfoil.override_parameters(&values).unwrap();
        assert!(max_deviation(&placed, airfoil.coords().unwrap()) < 1.0e-9);
    }

    #[test]
    fn test_translate_moves_skeleton() {
        let mut airfoil = Airfoil::new(20, ShapeDescriptor::default(), vec![], vec![]).unwrap();
        airfoil.translate(0.5, 0.25);
        let skeleton = airfoil.anchor_skeleton().unwrap();
        assert_relative_eq!(skeleton[1], Point2::new(0.5, 0.25), epsilon = 1.0e-12);
        assert_relative_eq!(skeleton[0], Point2::new(1.5, 0.25), epsilon = 1.0e-12);
    }

    #[test]
    fn test_angle_of_attack_lifts_leading_edge() {
        let descriptor = ShapeDescriptor {
            alf: deg(10.0),
            ..ShapeDescriptor::default()
        };
        let mut airfoil = Airfoil::new(20, descriptor, vec![], vec![]).unwrap();
        let skeleton = airfoil.anchor_skeleton().unwrap();
        // Rotating by the negative angle drops the trailing edge below the leading edge
        assert!(skeleton[0].y < skeleton[1].y);
    }

    #[test]
    fn test_offset_is_absolute() {
        let descriptor = ShapeDescriptor {
            c: Parameter::new(5.0),
            dx: Parameter::new(0.5),
            dy: Parameter::new(0.25),
            ..ShapeDescriptor::default()
        };
        let mut airfoil = Airfoil::new(20, descriptor, vec![], vec![]).unwrap();
        let skeleton = airfoil.anchor_skeleton().unwrap();
        assert_relative_eq!(skeleton[1], Point2::new(0.5, 0.25), epsilon = 1.0e-12);
        assert_relative_eq!(skeleton[0], Point2::new(5.5, 0.25), epsilon = 1.0e-12);
    }

    #[test]
    fn test_out_of_bounds_parameter_still_builds() {
        let descriptor = ShapeDescriptor {
            ratio_le: Parameter::new(0.5).with_bounds(0.6, 0.9),
            ..ShapeDescriptor::default()
        };
        let mut airfoil = Airfoil::new(20, descriptor, vec![], vec![]).unwrap();
        assert!(!airfoil.parameters_in_bounds());
        assert_eq!(airfoil.coords().unwrap().len(), 39);

        let mut values = airfoil.flatten();
        values[4] = 0.7;
        airfoil.override_parameters(&values).unwrap();
        assert!(airfoil.parameters_in_bounds());
    }

    #[test]
    fn test_override_length_mismatch() {
        let mut airfoil = reference_airfoil();
        let err = airfoil.override_parameters(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            AirfoilError::LengthMismatch {
                expected: 37,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_override_rejected_leaves_airfoil_unchanged() {
        let mut airfoil = reference_airfoil();
        let before = airfoil.flatten();
        let mut values = before.clone();
        values[6] = 3.0; // psi1_le out of range
        assert!(airfoil.override_parameters(&values).is_err());
        assert_eq!(airfoil.flatten(), before);
    }

    #[test]
    fn test_degenerate_curvature() {
        let descriptor = ShapeDescriptor {
            phi_le: Parameter::new(0.3 - std::f64::consts::FRAC_PI_2),
            psi1_le: Parameter::new(0.3),
            ..ShapeDescriptor::default()
        };
        let err = Airfoil::new(20, descriptor, vec![], vec![]).unwrap_err();
        match err {
            AirfoilError::DegenerateCurvature { anchor, side } => {
                assert_eq!(anchor, LE);
                assert_eq!(side, crate::SupportSide::Minus);
            }
            other => panic!("expected a degenerate curvature error, got {other:?}"),
        }
    }

    #[test]
    fn test_nearly_vertical_curvature_arm() {
        let descriptor = ShapeDescriptor {
            psi2_le: Parameter::new(std::f64::consts::FRAC_PI_2 - 1.0e-10),
            ..ShapeDescriptor::default()
        };
        let err = Airfoil::new(20, descriptor, vec![], vec![]).unwrap_err();
        assert!(matches!(
            err,
            AirfoilError::DegenerateCurvature { ref anchor, side: crate::SupportSide::Plus }
                if anchor == LE
        ));
    }

    #[test]
    fn test_missing_predecessor() {
        let result = Airfoil::new(
            20,
            ShapeDescriptor::default(),
            vec![anchor("a", "nowhere", 0.5, 0.05, 0.1, 0.5, 0.5, 10.0)],
            vec![],
        );
        assert!(matches!(result, Err(AirfoilError::MissingAnchor(name)) if name == "nowhere"));
    }

    #[test]
    fn test_free_point_after_last_trailing_edge() {
        let mut airfoil = Airfoil::new(20, ShapeDescriptor::default(), vec![], vec![]).unwrap();
        let err = airfoil.add_free_point(free(TE_2, 0.9, 0.0)).unwrap_err();
        assert!(matches!(err, AirfoilError::InvalidPredecessor(_)));
        assert!(airfoil.free_points().is_empty());
    }

    #[test]
    fn test_free_point_with_missing_predecessor() {
        let mut airfoil = reference_airfoil();
        let n = airfoil.n_parameters();
        let err = airfoil.add_free_point(free("nowhere", 0.4, 0.0)).unwrap_err();
        assert!(matches!(err, AirfoilError::MissingAnchor(name) if name == "nowhere"));
        assert_eq!(airfoil.free_points().len(), 3);
        assert_eq!(airfoil.n_parameters(), n);
    }

    #[test]
    fn test_duplicate_anchor_rejected() {
        let mut airfoil = reference_airfoil();
        let n = airfoil.n_parameters();
        let err = airfoil
            .add_anchor_point(anchor("anchor-top", TE_1, 0.7, 0.04, 0.1, 1.0, 0.5, 10.0))
            .unwrap_err();
        assert!(matches!(err, AirfoilError::DuplicateAnchor(_)));
        assert_eq!(airfoil.n_parameters(), n);
        assert!(!airfoil.is_dirty());
    }

    #[test]
    fn test_too_few_samples() {
        let result = Airfoil::new(1, ShapeDescriptor::default(), vec![], vec![]);
        assert!(matches!(result, Err(AirfoilError::TooFewSamples(1))));
    }

    #[test]
    fn test_config_round_trip() {
        let mut airfoil = reference_airfoil();
        let text = airfoil.to_config().to_json().unwrap();
        let mut back = Airfoil::from_config(AirfoilConfig::from_json(&text).unwrap()).unwrap();
        assert!(max_deviation(airfoil.coords().unwrap(), back.coords().unwrap()) < 1.0e-12);
    }
}
