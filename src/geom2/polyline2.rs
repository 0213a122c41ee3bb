//! Simple measurements on closed polylines, such as a sampled airfoil outline: the signed
//! enclosed area and a test for self-intersection.

use crate::Point2;
use crate::common::points::dist;
use itertools::Itertools;

/// The distance below which the first and last vertices of a polyline are considered to be the
/// same point, in which case the polyline is already closed.
pub const CLOSURE_TOL: f64 = 1.0e-12;

/// Returns the vertices of the closed ring formed by `points`, appending the first vertex to the
/// end if the polyline is not already closed.
fn closed_ring(points: &[Point2]) -> Vec<Point2> {
    let mut ring = points.to_vec();
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        if points.len() > 1 && dist(first, last) > CLOSURE_TOL {
            ring.push(*first);
        }
    }
    ring
}

/// Computes the signed area enclosed by the closed polyline through `points` with the shoelace
/// formula. The area is positive when the vertices run counter-clockwise.
///
/// # Examples
///
/// ```
/// use airpar::Point2;
/// use airpar::geom2::polyline2::signed_area;
/// let square = [
///     Point2::new(0.0, 0.0),
///     Point2::new(2.0, 0.0),
///     Point2::new(2.0, 2.0),
///     Point2::new(0.0, 2.0),
/// ];
/// assert_eq!(signed_area(&square), 4.0);
/// ```
pub fn signed_area(points: &[Point2]) -> f64 {
    closed_ring(points)
        .iter()
        .tuple_windows()
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum::<f64>()
        * 0.5
}

fn orientation(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn within_box(a: &Point2, b: &Point2, p: &Point2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Returns true if the closed segments `a0-a1` and `b0-b1` share at least one point, including
/// touching at an endpoint and collinear overlap.
pub fn segments_intersect(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> bool {
    let o1 = orientation(a0, a1, b0);
    let o2 = orientation(a0, a1, b1);
    let o3 = orientation(b0, b1, a0);
    let o4 = orientation(b0, b1, a1);

    if o1 * o2 < 0.0 && o3 * o4 < 0.0 {
        return true;
    }

    (o1 == 0.0 && within_box(a0, a1, b0))
        || (o2 == 0.0 && within_box(a0, a1, b1))
        || (o3 == 0.0 && within_box(b0, b1, a0))
        || (o4 == 0.0 && within_box(b0, b1, a1))
}

/// Returns true if the closed polyline through `points` is simple, meaning that no two of its
/// non-adjacent edges intersect. Zero length edges (repeated vertices) are dropped before the
/// test, so that they do not register as touching their neighbors.
pub fn is_simple(points: &[Point2]) -> bool {
    let mut ring = closed_ring(points);
    ring.dedup_by(|a, b| dist(a, b) <= CLOSURE_TOL);

    let edges = ring.iter().tuple_windows::<(_, _)>().collect::<Vec<_>>();
    let m = edges.len();
    if m < 4 {
        return true;
    }

    for i in 0..m {
        for j in (i + 2)..m {
            // The first and last edges share the ring's closing vertex
            if i == 0 && j == m - 1 {
                continue;
            }
            let (a0, a1) = edges[i];
            let (b0, b1) = edges[j];
            if segments_intersect(a0, a1, b0, b1) {
                return false;
            }
        }
    }

    true
}
