//! The ordered chain of anchors which forms the backbone of the outline. Anchor records live in
//! an arena with stable indices; the chain order is an explicit list of those indices, and a name
//! lookup resolves previous-anchor references.

use crate::airfoil::anchor::{LE, TE_1, TE_2};
use crate::airfoil::continuity::{CurvatureControl, Surface};
use crate::errors::{AirfoilError, SupportSide};
use crate::{Point2, Result};
use std::collections::HashMap;

/// The role an anchor plays in the chain. Trailing edge anchors carry only a single tangent
/// support point and no curvature constraint; all others carry a full set of support points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorKind {
    TrailingEdge,
    Interior,
}

#[derive(Debug, Clone)]
pub struct AnchorRecord {
    pub name: String,
    pub kind: AnchorKind,
    pub position: Point2,
    pub g1_minus: Option<Point2>,
    pub g1_plus: Option<Point2>,
    pub g2_minus: Option<Point2>,
    pub g2_plus: Option<Point2>,
    pub curvature: Option<CurvatureControl>,

    /// Free points of the segment leaving this anchor, in curve order
    pub free_points: Vec<Point2>,
}

impl AnchorRecord {
    /// A trailing edge record with only the tangent support point on the interior side.
    pub fn trailing_edge(name: &str, position: Point2, support: Point2, first: bool) -> Self {
        let (g1_minus, g1_plus) = if first {
            (None, Some(support))
        } else {
            (Some(support), None)
        };
        Self {
            name: name.to_string(),
            kind: AnchorKind::TrailingEdge,
            position,
            g1_minus,
            g1_plus,
            g2_minus: None,
            g2_plus: None,
            curvature: None,
            free_points: Vec::new(),
        }
    }

    /// An interior record whose support points are yet to be computed.
    pub fn interior(name: &str, position: Point2, curvature: CurvatureControl) -> Self {
        Self {
            name: name.to_string(),
            kind: AnchorKind::Interior,
            position,
            g1_minus: None,
            g1_plus: None,
            g2_minus: None,
            g2_plus: None,
            curvature: Some(curvature),
            free_points: Vec::new(),
        }
    }

    pub fn set_g1(&mut self, (minus, plus): (Point2, Point2)) {
        self.g1_minus = Some(minus);
        self.g1_plus = Some(plus);
    }
}

#[derive(Debug, Clone)]
pub struct AnchorChain {
    records: Vec<AnchorRecord>,
    lookup: HashMap<String, usize>,
    order: Vec<usize>,
}

impl AnchorChain {
    /// Create the minimal chain of `te_1`, `le` and `te_2`. The records must carry those names.
    pub fn new(te_1: AnchorRecord, le: AnchorRecord, te_2: AnchorRecord) -> Self {
        let records = vec![te_1, le, te_2];
        let lookup = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.name.clone(), i))
            .collect();
        Self {
            records,
            lookup,
            order: vec![0, 1, 2],
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }

    /// The arena index of a named anchor.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.lookup
            .get(name)
            .copied()
            .ok_or_else(|| AirfoilError::MissingAnchor(name.to_string()))
    }

    /// The position of an arena index within the chain order.
    fn position_of(&self, index: usize) -> usize {
        self.order
            .iter()
            .position(|&i| i == index)
            .unwrap_or(self.order.len())
    }

    pub fn record(&self, index: usize) -> &AnchorRecord {
        &self.records[index]
    }

    pub fn record_mut(&mut self, index: usize) -> &mut AnchorRecord {
        &mut self.records[index]
    }

    /// The anchor records in chain order.
    pub fn ordered(&self) -> impl Iterator<Item = &AnchorRecord> + '_ {
        self.order.iter().map(|&i| self.record(i))
    }

    pub fn names(&self) -> Vec<String> {
        self.ordered().map(|r| r.name.clone()).collect()
    }

    /// Validates that `name` exists and has an outgoing segment, returning its arena index.
    fn predecessor(&self, name: &str) -> Result<usize> {
        if name == TE_2 {
            return Err(AirfoilError::InvalidPredecessor(name.to_string()));
        }
        self.index_of(name)
    }

    /// Insert a record into the chain immediately after the anchor named `previous`, returning
    /// the arena index of the new record.
    pub fn insert_after(&mut self, previous: &str, record: AnchorRecord) -> Result<usize> {
        let prev = self.predecessor(previous)?;
        if self.contains(&record.name) {
            return Err(AirfoilError::DuplicateAnchor(record.name));
        }

        let index = self.records.len();
        let at = self.position_of(prev) + 1;
        self.lookup.insert(record.name.clone(), index);
        self.records.push(record);
        self.order.insert(at, index);
        Ok(index)
    }

    /// Append a free point to the segment leaving the anchor named `previous`.
    pub fn attach_free_point(&mut self, previous: &str, point: Point2) -> Result<()> {
        let prev = self.predecessor(previous)?;
        self.records[prev].free_points.push(point);
        Ok(())
    }

    /// The surface an anchor lies on, by its position relative to the leading edge.
    pub fn surface(&self, index: usize) -> Surface {
        let le = self.lookup.get(LE).map(|&i| self.position_of(i)).unwrap_or(0);
        if self.position_of(index) < le {
            Surface::Upper
        } else {
            Surface::Lower
        }
    }

    /// The Bezier order of the segment starting at chain position `position`. Each segment
    /// carries its two end anchors, one tangent support point at each end, a curvature support
    /// point at each interior end, and its free points.
    fn order_at(&self, position: usize) -> usize {
        let start = &self.records[self.order[position]];
        let end = &self.records[self.order[position + 1]];
        let interior = |r: &AnchorRecord| usize::from(r.kind == AnchorKind::Interior);
        3 + interior(start) + interior(end) + start.free_points.len()
    }

    /// The Bezier order of every segment, keyed by the name of the anchor the segment starts
    /// at, in chain order.
    pub fn segment_orders(&self) -> Vec<(String, usize)> {
        (0..self.order.len() - 1)
            .map(|p| (self.records[self.order[p]].name.clone(), self.order_at(p)))
            .collect()
    }

    /// Solve the curvature support points of the anchor at `index` using the current orders of
    /// its adjoining segments. Trailing edge anchors are left untouched.
    pub fn solve_curvature(&mut self, index: usize) -> Result<()> {
        let position = self.position_of(index);
        if position == 0 || position + 1 >= self.order.len() {
            return Ok(());
        }
        let n_minus = self.order_at(position - 1);
        let n_plus = self.order_at(position);

        let record = &mut self.records[index];
        let (Some(control), Some(g1m), Some(g1p)) =
            (record.curvature, record.g1_minus, record.g1_plus)
        else {
            return Ok(());
        };

        let degenerate = |side| AirfoilError::DegenerateCurvature {
            anchor: record.name.clone(),
            side,
        };

        let g2m = control
            .support(&record.position, &g1m, n_minus, SupportSide::Minus)
            .ok_or_else(|| degenerate(SupportSide::Minus))?;
        let g2p = control
            .support(&record.position, &g1p, n_plus, SupportSide::Plus)
            .ok_or_else(|| degenerate(SupportSide::Plus))?;

        record.g2_minus = Some(g2m);
        record.g2_plus = Some(g2p);
        Ok(())
    }

    /// Re-solve the curvature support points of every interior anchor, for use once the
    /// segment orders are final.
    pub fn solve_all_curvature(&mut self) -> Result<()> {
        for index in self.order.clone() {
            self.solve_curvature(index)?;
        }
        Ok(())
    }

    /// Assemble the full control polygon by walking the chain. The first anchor contributes
    /// itself and its outgoing tangent point; each later anchor contributes its incoming
    /// support points, itself, and its outgoing support points. Free points follow the anchor
    /// whose outgoing segment they belong to.
    pub fn control_polygon(&self) -> Vec<Point2> {
        let mut points = Vec::new();
        for (i, r) in self.ordered().enumerate() {
            if i == 0 {
                points.push(r.position);
                points.extend(r.g1_plus);
            } else {
                points.extend(r.g2_minus);
                points.extend(r.g1_minus);
                points.push(r.position);
                points.extend(r.g1_plus);
                points.extend(r.g2_plus);
            }
            points.extend(r.free_points.iter().copied());
        }
        points
    }

    /// The anchor positions alone, in chain order.
    pub fn skeleton(&self) -> Vec<Point2> {
        self.ordered().map(|r| r.position).collect()
    }

    /// True if the chain starts at `te_1`, contains `le`, and ends at `te_2`.
    pub fn is_well_formed(&self) -> bool {
        let names = self.names();
        names.first().map(String::as_str) == Some(TE_1)
            && names.last().map(String::as_str) == Some(TE_2)
            && self.contains(LE)
    }
}
