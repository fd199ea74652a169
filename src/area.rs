//! Regions with boolean operations
//!
//! An [`Area`] is stored as disjoint horizontal trapezoids produced by a slab
//! sweep: the plane is cut at every vertex and edge crossing, and inside
//! each slab the edges are ordered by x and a winding count per operand
//! decides coverage. Boolean operations re-run the sweep over the edges of
//! both operands with a different combining rule, so every operation returns
//! a new value and leaves its inputs untouched.

use std::collections::HashMap;

use crate::path::Path;
use crate::types::{BoundingBox, Point, WindingRule};

const EPSILON: f64 = 1e-9;
/// Grid used to match outline end points
const SNAP: f64 = 1e6;

/// Slab of coverage between two horizontal lines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trapezoid {
    pub top: f64,
    pub bottom: f64,
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_left: f64,
    pub bottom_right: f64,
}

impl Trapezoid {
    fn left_at(&self, y: f64) -> f64 {
        lerp(self.top_left, self.bottom_left, (y - self.top) / (self.bottom - self.top))
    }

    fn right_at(&self, y: f64) -> f64 {
        lerp(self.top_right, self.bottom_right, (y - self.top) / (self.bottom - self.top))
    }

    pub fn area(&self) -> f64 {
        let widths = (self.top_right - self.top_left) + (self.bottom_right - self.bottom_left);
        widths * (self.bottom - self.top) / 2.0
    }

    fn contains(&self, p: Point) -> bool {
        p.y >= self.top && p.y <= self.bottom && p.x >= self.left_at(p.y) && p.x <= self.right_at(p.y)
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Non-horizontal edge with y0 < y1
#[derive(Debug, Clone, Copy)]
struct Edge {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    winding: i32,
    operand: usize,
}

impl Edge {
    fn new(a: Point, b: Point, operand: usize) -> Option<Self> {
        if a.y == b.y || ![a.x, a.y, b.x, b.y].iter().all(|v| v.is_finite()) {
            return None;
        }
        let (top, bottom, winding) = if a.y < b.y { (a, b, 1) } else { (b, a, -1) };
        Some(Self {
            x0: top.x,
            y0: top.y,
            x1: bottom.x,
            y1: bottom.y,
            winding,
            operand,
        })
    }

    fn x_at(&self, y: f64) -> f64 {
        if y <= self.y0 {
            self.x0
        } else if y >= self.y1 {
            self.x1
        } else {
            lerp(self.x0, self.x1, (y - self.y0) / (self.y1 - self.y0))
        }
    }

    /// y where the two edges cross strictly inside their common y range
    fn crossing_y(&self, other: &Edge) -> Option<f64> {
        let lo = self.y0.max(other.y0);
        let hi = self.y1.min(other.y1);
        if hi <= lo {
            return None;
        }
        let d_lo = self.x_at(lo) - other.x_at(lo);
        let d_hi = self.x_at(hi) - other.x_at(hi);
        if d_lo * d_hi >= 0.0 {
            return None;
        }
        let y = lo + (hi - lo) * d_lo / (d_lo - d_hi);
        (y > lo && y < hi).then_some(y)
    }
}

/// Region of the plane
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Area {
    traps: Vec<Trapezoid>,
}

impl Area {
    pub fn new() -> Self {
        Self::default()
    }

    /// Region enclosed by `path` under `rule`; every sub-path counts as closed
    pub fn from_path(path: &Path, rule: WindingRule) -> Self {
        let mut edges = Vec::new();
        for contour in path.flatten() {
            let pts = &contour.points;
            if pts.len() < 2 {
                continue;
            }
            for i in 0..pts.len() {
                let next = pts[(i + 1) % pts.len()];
                edges.extend(Edge::new(pts[i], next, 0));
            }
        }
        sweep(&edges, &[rule], |inside| inside[0])
    }

    pub fn from_rect(bounds: &BoundingBox) -> Self {
        Self::from_path(&Path::rect(bounds), WindingRule::NonZero)
    }

    /// Union of many rectangles in one sweep. Empty rectangles add nothing.
    pub fn from_rects(rects: &[BoundingBox]) -> Self {
        let mut edges = Vec::with_capacity(rects.len() * 2);
        for r in rects.iter().filter(|r| !r.is_empty()) {
            // same orientation as Path::rect: right side down, left side up
            edges.extend(Edge::new(
                Point::new(r.max_x(), r.y),
                Point::new(r.max_x(), r.max_y()),
                0,
            ));
            edges.extend(Edge::new(
                Point::new(r.x, r.max_y()),
                Point::new(r.x, r.y),
                0,
            ));
        }
        sweep(&edges, &[WindingRule::NonZero], |inside| inside[0])
    }

    /// Points covered by exactly one of the two areas
    pub fn exclusive_or(&self, other: &Area) -> Area {
        self.combine(other, |s| s[0] != s[1])
    }

    pub fn union(&self, other: &Area) -> Area {
        self.combine(other, |s| s[0] || s[1])
    }

    pub fn subtract(&self, other: &Area) -> Area {
        self.combine(other, |s| s[0] && !s[1])
    }

    pub fn intersect(&self, other: &Area) -> Area {
        self.combine(other, |s| s[0] && s[1])
    }

    fn combine(&self, other: &Area, rule: impl Fn(&[bool]) -> bool) -> Area {
        let mut edges = self.edges(0);
        edges.extend(other.edges(1));
        sweep(&edges, &[WindingRule::NonZero, WindingRule::NonZero], rule)
    }

    fn edges(&self, operand: usize) -> Vec<Edge> {
        let mut edges = Vec::with_capacity(self.traps.len() * 2);
        for t in &self.traps {
            edges.extend(Edge::new(
                Point::new(t.top_right, t.top),
                Point::new(t.bottom_right, t.bottom),
                operand,
            ));
            edges.extend(Edge::new(
                Point::new(t.bottom_left, t.bottom),
                Point::new(t.top_left, t.top),
                operand,
            ));
        }
        edges
    }

    pub fn is_empty(&self) -> bool {
        self.traps.is_empty()
    }

    pub fn trapezoids(&self) -> &[Trapezoid] {
        &self.traps
    }

    /// Covered surface
    pub fn measure(&self) -> f64 {
        self.traps.iter().map(Trapezoid::area).sum()
    }

    pub fn contains(&self, p: Point) -> bool {
        self.traps.iter().any(|t| t.contains(p))
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        let first = self.traps.first()?;
        let mut min_x = first.top_left.min(first.bottom_left);
        let mut max_x = first.top_right.max(first.bottom_right);
        let (mut min_y, mut max_y) = (first.top, first.bottom);
        for t in &self.traps[1..] {
            min_x = min_x.min(t.top_left).min(t.bottom_left);
            max_x = max_x.max(t.top_right).max(t.bottom_right);
            min_y = min_y.min(t.top);
            max_y = max_y.max(t.bottom);
        }
        Some(BoundingBox::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    /// Boundary of the area as closed rings, to be filled even-odd
    pub fn to_path(&self) -> Path {
        let segments = cancel_pairs(self.boundary_segments());
        let mut path = Path::new();
        for (ring, closed) in chain(&segments) {
            let ring = simplify(ring, closed);
            path.append(&Path::from_points(&ring, closed));
        }
        path
    }

    fn boundary_segments(&self) -> Vec<(Point, Point)> {
        let mut segments = Vec::new();
        // (intervals ending at y, intervals starting at y)
        let mut rows: HashMap<u64, (f64, Vec<(f64, f64)>, Vec<(f64, f64)>)> = HashMap::new();

        for t in &self.traps {
            segments.push((Point::new(t.top_left, t.top), Point::new(t.bottom_left, t.bottom)));
            segments.push((Point::new(t.top_right, t.top), Point::new(t.bottom_right, t.bottom)));
            rows.entry(t.top.to_bits())
                .or_insert_with(|| (t.top, Vec::new(), Vec::new()))
                .2
                .push((t.top_left, t.top_right));
            rows.entry(t.bottom.to_bits())
                .or_insert_with(|| (t.bottom, Vec::new(), Vec::new()))
                .1
                .push((t.bottom_left, t.bottom_right));
        }

        // A horizontal line is boundary where exactly one side is covered.
        for (y, above, below) in rows.values() {
            let mut events: Vec<(f64, i32, i32)> = Vec::new();
            for &(l, r) in above {
                events.push((l, 1, 0));
                events.push((r, -1, 0));
            }
            for &(l, r) in below {
                events.push((l, 0, 1));
                events.push((r, 0, -1));
            }
            events.sort_by(|a, b| a.0.total_cmp(&b.0));

            let (mut a, mut b) = (0, 0);
            let mut prev_x = f64::NEG_INFINITY;
            for (x, da, db) in events {
                if (a > 0) != (b > 0) && x - prev_x > EPSILON {
                    segments.push((Point::new(prev_x, *y), Point::new(x, *y)));
                }
                a += da;
                b += db;
                prev_x = x;
            }
        }
        segments
    }
}

/// Run the slab sweep over `edges`; `rules[i]` decides coverage of operand
/// `i` and `combine` merges the per-operand coverage.
fn sweep(edges: &[Edge], rules: &[WindingRule], combine: impl Fn(&[bool]) -> bool) -> Area {
    let mut ys: Vec<f64> = edges.iter().flat_map(|e| [e.y0, e.y1]).collect();
    for (i, a) in edges.iter().enumerate() {
        for b in &edges[i + 1..] {
            ys.extend(a.crossing_y(b));
        }
    }
    ys.sort_by(|a, b| a.total_cmp(b));
    ys.dedup();

    let mut traps: Vec<Trapezoid> = Vec::new();
    let mut active: Vec<(f64, &Edge)> = Vec::new();
    let mut counts = vec![0i32; rules.len()];
    let mut inside = vec![false; rules.len()];

    for pair in ys.windows(2) {
        let (top, bottom) = (pair[0], pair[1]);
        if bottom - top <= EPSILON {
            continue;
        }
        let mid = (top + bottom) / 2.0;
        active.clear();
        active.extend(
            edges
                .iter()
                .filter(|e| e.y0 <= top && e.y1 >= bottom)
                .map(|e| (e.x_at(mid), e)),
        );
        active.sort_by(|a, b| a.0.total_cmp(&b.0));
        counts.iter_mut().for_each(|c| *c = 0);
        inside.iter_mut().for_each(|v| *v = false);

        let slab_start = traps.len();
        let mut left: Option<&Edge> = None;
        for &(_, edge) in &active {
            counts[edge.operand] += edge.winding;
            inside[edge.operand] = rules[edge.operand].is_inside(counts[edge.operand]);
            let covered = combine(inside.as_slice());
            match left {
                None if covered => left = Some(edge),
                Some(l) if !covered => {
                    let trap = Trapezoid {
                        top,
                        bottom,
                        top_left: l.x_at(top),
                        top_right: edge.x_at(top),
                        bottom_left: l.x_at(bottom),
                        bottom_right: edge.x_at(bottom),
                    };
                    push_trapezoid(&mut traps, slab_start, trap);
                    left = None;
                }
                _ => {}
            }
        }
    }
    Area { traps }
}

/// Drop zero-width pieces and merge a piece into its left neighbour when
/// they touch along their whole height.
fn push_trapezoid(traps: &mut Vec<Trapezoid>, slab_start: usize, trap: Trapezoid) {
    if trap.top_right - trap.top_left <= EPSILON && trap.bottom_right - trap.bottom_left <= EPSILON {
        return;
    }
    if traps.len() > slab_start {
        if let Some(last) = traps.last_mut() {
            if (last.top_right - trap.top_left).abs() <= EPSILON
                && (last.bottom_right - trap.bottom_left).abs() <= EPSILON
            {
                last.top_right = trap.top_right;
                last.bottom_right = trap.bottom_right;
                return;
            }
        }
    }
    traps.push(trap);
}

fn snap(p: Point) -> (i64, i64) {
    ((p.x * SNAP).round() as i64, (p.y * SNAP).round() as i64)
}

/// Remove segments that appear an even number of times
fn cancel_pairs(segments: Vec<(Point, Point)>) -> Vec<(Point, Point)> {
    let key = |s: &(Point, Point)| {
        let (a, b) = (snap(s.0), snap(s.1));
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    };
    let mut counts: HashMap<((i64, i64), (i64, i64)), usize> = HashMap::new();
    for s in &segments {
        *counts.entry(key(s)).or_insert(0) += 1;
    }
    segments
        .into_iter()
        .filter(|s| {
            let k = key(s);
            if k.0 == k.1 {
                return false;
            }
            match counts.get_mut(&k) {
                Some(n) if *n % 2 == 1 => {
                    // keep exactly one copy of an odd-count segment
                    *n = 0;
                    true
                }
                _ => false,
            }
        })
        .collect()
}

/// Join segments sharing end points into rings
fn chain(segments: &[(Point, Point)]) -> Vec<(Vec<Point>, bool)> {
    let mut by_point: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (i, s) in segments.iter().enumerate() {
        by_point.entry(snap(s.0)).or_default().push(i);
        by_point.entry(snap(s.1)).or_default().push(i);
    }

    let mut used = vec![false; segments.len()];
    let mut rings = Vec::new();
    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let (first, mut current) = segments[start];
        let first_key = snap(first);
        let mut ring = vec![first, current];
        let mut closed = false;
        loop {
            let key = snap(current);
            if key == first_key {
                ring.pop();
                closed = true;
                break;
            }
            let next = by_point
                .get(&key)
                .and_then(|ids| ids.iter().copied().find(|&i| !used[i]));
            let Some(next) = next else { break };
            used[next] = true;
            let (a, b) = segments[next];
            current = if snap(a) == key { b } else { a };
            ring.push(current);
        }
        rings.push((ring, closed));
    }
    rings
}

/// Drop points lying on a straight run
fn simplify(points: Vec<Point>, closed: bool) -> Vec<Point> {
    if points.len() < 3 {
        return points;
    }
    let n = points.len();
    let keep = |i: usize| {
        if !closed && (i == 0 || i == n - 1) {
            return true;
        }
        let prev = points[(i + n - 1) % n];
        let cur = points[i];
        let next = points[(i + 1) % n];
        let (ax, ay) = (cur.x - prev.x, cur.y - prev.y);
        let (bx, by) = (next.x - cur.x, next.y - cur.y);
        let cross = ax * by - ay * bx;
        let dot = ax * bx + ay * by;
        let scale = ax.hypot(ay) * bx.hypot(by);
        !(cross.abs() <= EPSILON * scale.max(1.0) && dot > 0.0)
    };
    (0..n).filter(|&i| keep(i)).map(|i| points[i]).collect()
}
