//! Closed-form placement of the support control points around an anchor. The G1 (tangent)
//! support points sit on a line through the anchor, one on each side. The G2 (curvature) support
//! points are placed on a line through each G1 point at a prescribed arm angle, at the distance
//! which gives the adjoining Bezier segment the requested curvature at its end.
//!
//! For a segment of order `n` whose first three control points are `P0`, `P1`, `P2`, the
//! curvature at the start is
//!
//! ```text
//! k = (1 - 1/n) * cross(P1 - P0, P2 - P1) / |P1 - P0|^3
//! ```
//!
//! which is linear in the offset of `P2` along the arm, and so can be solved directly for `k = 1/R`.

use crate::common::unit_at;
use crate::errors::SupportSide;
use crate::{Point2, Vector2};
use std::f64::consts::{FRAC_PI_2, PI};

/// Relative size, compared to the tangent arm length, below which the curvature solve
/// denominator is considered to vanish.
pub const DEGENERATE_TOL: f64 = 1.0e-9;

/// Which surface of the airfoil an anchor lies on, which sets the direction of traversal
/// through it. Anchors before the leading edge in chain order are on the upper surface, where
/// the outline runs from the trailing edge towards the leading edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Upper,
    Lower,
}

/// The tangent support points `(minus, plus)` of an anchor at `anchor` with tangent arm length
/// `length`, split `ratio` and tilt `phi`.
pub fn g1_support(
    anchor: &Point2,
    length: f64,
    ratio: f64,
    phi: f64,
    surface: Surface,
) -> (Point2, Point2) {
    let dir: Vector2 = match surface {
        Surface::Upper => unit_at(phi),
        Surface::Lower => -unit_at(phi),
    };
    (
        anchor + dir * (ratio * length),
        anchor - dir * ((1.0 - ratio) * length),
    )
}

/// The tangent support points of the leading edge. The tilt is referenced from the
/// perpendicular to the chordline, and the leading edge always traverses as the last point of the
/// upper surface.
pub fn leading_edge_g1(le: &Point2, length: f64, ratio: f64, phi_le: f64) -> (Point2, Point2) {
    g1_support(le, length, ratio, FRAC_PI_2 + phi_le, Surface::Upper)
}

/// The upper and lower trailing edge points for a chord of `c` and a blunt trailing edge of
/// thickness `t_te`, split by `ratio_te` and tilted by `phi_te` from the chord perpendicular.
pub fn trailing_edges(c: f64, t_te: f64, ratio_te: f64, phi_te: f64) -> (Point2, Point2) {
    let chord_end = Point2::new(c, 0.0);
    let dir = unit_at(FRAC_PI_2 + phi_te);
    (
        chord_end + dir * (ratio_te * t_te),
        chord_end - dir * ((1.0 - ratio_te) * t_te),
    )
}

/// The tangent support point leaving the upper trailing edge, with arm length `length` and the
/// upper trailing edge angle `theta` measured clockwise from the chordline.
pub fn upper_te_support(te_1: &Point2, length: f64, theta: f64) -> Point2 {
    te_1 + Vector2::new(-theta.cos(), theta.sin()) * length
}

/// The tangent support point arriving at the lower trailing edge, with arm length `length` and
/// the lower trailing edge angle `theta` measured counter-clockwise from the chordline.
pub fn lower_te_support(te_2: &Point2, length: f64, theta: f64) -> Point2 {
    te_2 + Vector2::new(-theta.cos(), -theta.sin()) * length
}

/// The curvature constraint at an anchor: the requested radius of curvature and the two
/// curvature control arm angles.
#[derive(Debug, Clone, Copy)]
pub struct CurvatureControl {
    pub radius: f64,
    pub psi1: f64,
    pub psi2: f64,
}

impl CurvatureControl {
    pub fn new(radius: f64, psi1: f64, psi2: f64) -> Self {
        Self { radius, psi1, psi2 }
    }

    /// True when the radius is infinite and the curvature is left free.
    pub fn is_relaxed(&self) -> bool {
        self.radius.is_infinite()
    }

    /// The arm angle of the G2 support point on the given side. A negative radius reflects the
    /// arm so that the outline bends away from the tangent line in the other direction.
    pub fn arm_angle(&self, side: SupportSide) -> f64 {
        let theta = match side {
            SupportSide::Minus => self.psi1,
            SupportSide::Plus => -self.psi2,
        };
        if self.radius > 0.0 { theta } else { PI - theta }
    }

    /// Solve for the G2 support point on one side of the anchor, given the adjoining G1 support
    /// point and the order of the Bezier segment on that side. Returns `None` when the solve is
    /// degenerate.
    pub fn support(
        &self,
        anchor: &Point2,
        g1: &Point2,
        order: usize,
        side: SupportSide,
    ) -> Option<Point2> {
        if self.is_relaxed() {
            return Some(*g1);
        }
        g2_support(anchor, g1, self.radius, order, self.arm_angle(side), side)
    }
}

/// Places the curvature (G2) support point for an anchor at `anchor` with its tangent support
/// point at `g1`, so that the segment of order `order` on `side` of the anchor has the signed
/// curvature `1 / radius` at the anchor, in curve traversal order. The point lies on the line
/// through `g1` at angle `theta` from the x-axis.
///
/// An infinite radius places the G2 point on top of the G1 point. Returns `None` if the arm is
/// parallel to the tangent line (the sine of the angle between them is within `DEGENERATE_TOL`
/// of zero), if `order` is below two, or if the result is not finite.
pub fn g2_support(
    anchor: &Point2,
    g1: &Point2,
    radius: f64,
    order: usize,
    theta: f64,
    side: SupportSide,
) -> Option<Point2> {
    if radius.is_infinite() {
        return Some(*g1);
    }
    if order < 2 {
        return None;
    }

    let tangent = g1 - anchor;
    let arm = tangent.norm();
    let dir = unit_at(theta);

    // Equal to arm * sin(angle between tangent and arm)
    let cross = tangent.x * dir.y - tangent.y * dir.x;
    if cross.abs() <= DEGENERATE_TOL * arm || !cross.is_finite() {
        return None;
    }

    let factor = 1.0 - 1.0 / order as f64;
    let distance = arm.powi(3) / (radius * factor * cross);
    let distance = match side {
        SupportSide::Minus => -distance,
        SupportSide::Plus => distance,
    };

    let point = g1 + dir * distance;
    (point.x.is_finite() && point.y.is_finite()).then_some(point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom2::BezierCurve2;
    use approx::assert_relative_eq;
    use test_case::test_case;

    #[test]
    fn test_g1_upper_lower_mirror() {
        let a = Point2::new(1.0, 0.5);
        let (um, up) = g1_support(&a, 0.2, 0.25, 0.0, Surface::Upper);
        let (lm, lp) = g1_support(&a, 0.2, 0.25, 0.0, Surface::Lower);
        assert_relative_eq!(um, Point2::new(1.05, 0.5), epsilon = 1.0e-12);
        assert_relative_eq!(up, Point2::new(0.85, 0.5), epsilon = 1.0e-12);
        assert_relative_eq!(lm, Point2::new(0.95, 0.5), epsilon = 1.0e-12);
        assert_relative_eq!(lp, Point2::new(1.15, 0.5), epsilon = 1.0e-12);
    }

    #[test]
    fn test_leading_edge_g1_vertical() {
        let (m, p) = leading_edge_g1(&Point2::origin(), 0.1, 0.6, 0.0);
        assert_relative_eq!(m, Point2::new(0.0, 0.06), epsilon = 1.0e-12);
        assert_relative_eq!(p, Point2::new(0.0, -0.04), epsilon = 1.0e-12);
    }

    #[test]
    fn test_blunt_trailing_edge() {
        let (te_1, te_2) = trailing_edges(1.0, 0.02, 0.75, 0.0);
        assert_relative_eq!(te_1, Point2::new(1.0, 0.015), epsilon = 1.0e-12);
        assert_relative_eq!(te_2, Point2::new(1.0, -0.005), epsilon = 1.0e-12);
    }

    #[test]
    fn test_relaxed_curvature_is_g1() {
        let g1 = Point2::new(0.3, 0.2);
        let g2 = g2_support(&Point2::origin(), &g1, f64::INFINITY, 4, 0.3, SupportSide::Plus);
        assert_eq!(g2, Some(g1));
    }

    #[test]
    fn test_degenerate_arm() {
        // The arm at 0.3 rad passes through the anchor, so it is parallel to the tangent line
        let g1 = Point2::from(unit_at(0.3) * 0.05);
        let g2 = g2_support(&Point2::origin(), &g1, 0.1, 4, 0.3, SupportSide::Minus);
        assert!(g2.is_none());
    }

    fn curvature_at_anchor(points: &[Point2], t: f64) -> f64 {
        BezierCurve2::new(points).unwrap().curvature_at(t).unwrap()
    }

    #[test_case(0.3, 4, 10.0, 15.0)]
    #[test_case(-1.5, 6, 45.0, 45.0)]
    #[test_case(2.0, 5, 75.0, 75.0)]
    #[test_case(0.05, 9, -20.0, 30.0)]
    fn test_solve_matches_radius(radius: f64, order: usize, psi1: f64, psi2: f64) {
        let anchor = Point2::new(0.4, 0.1);
        let control = CurvatureControl::new(radius, psi1.to_radians(), psi2.to_radians());
        let (g1m, g1p) = g1_support(&anchor, 0.12, 0.4, 0.2, Surface::Upper);

        // Incoming segment end, the remaining control points are arbitrary
        let g2m = control.support(&anchor, &g1m, order, SupportSide::Minus).unwrap();
        let mut incoming = (0..order - 2)
            .map(|i| Point2::new(2.0 + i as f64, 1.0))
            .collect::<Vec<_>>();
        incoming.extend([g2m, g1m, anchor]);
        assert_relative_eq!(
            curvature_at_anchor(&incoming, 1.0),
            1.0 / radius,
            epsilon = 1.0e-8,
            max_relative = 1.0e-8
        );

        // Outgoing segment start
        let g2p = control.support(&anchor, &g1p, order, SupportSide::Plus).unwrap();
        let mut outgoing = vec![anchor, g1p, g2p];
        outgoing.extend((0..order - 2).map(|i| Point2::new(-1.0 - i as f64, -0.5)));
        assert_relative_eq!(
            curvature_at_anchor(&outgoing, 0.0),
            1.0 / radius,
            epsilon = 1.0e-8,
            max_relative = 1.0e-8
        );
    }

    #[test]
    fn test_nearly_vertical_arm_on_vertical_tangent() {
        // Leading edge tangent is vertical, and the arm differs from it by 1e-10 rad
        let (_, g1p) = leading_edge_g1(&Point2::origin(), 0.1, 0.5, 0.0);
        let control = CurvatureControl::new(0.1, 0.0, FRAC_PI_2 - 1.0e-10);
        let g2 = control.support(&Point2::origin(), &g1p, 4, SupportSide::Plus);
        assert!(g2.is_none());
    }

    #[test]
    fn test_negative_radius_reflects_arm() {
        let control = CurvatureControl::new(-1.0, 0.2, 0.3);
        assert_relative_eq!(control.arm_angle(SupportSide::Minus), PI - 0.2);
        assert_relative_eq!(control.arm_angle(SupportSide::Plus), PI + 0.3);
    }
}
