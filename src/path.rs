//! Path model used for everything handed to the playback context
//!
//! A path is a list of move / line / cubic / close segments. Closed and open
//! point lists are told apart by an explicit close segment, never by the
//! last point repeating the first.

use std::fmt::Write as _;

use crate::geometry::{ArcAngles, ArcClosure};
use crate::types::{BoundingBox, Point};

/// Line segments per cubic when a path is flattened
const FLATTEN_STEPS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    MoveTo(Point),
    LineTo(Point),
    CubicTo(Point, Point, Point),
    Close,
}

/// One flattened sub-path
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contour {
    pub points: Vec<Point>,
    pub closed: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a single sub-path through `points`: the first point is a move,
    /// the rest are lines, and `closed` appends a close segment.
    pub fn from_points(points: &[Point], closed: bool) -> Self {
        let mut path = Path::new();
        let mut iter = points.iter();
        if let Some(first) = iter.next() {
            path.move_to(*first);
            for p in iter {
                path.line_to(*p);
            }
            if closed {
                path.close();
            }
        }
        path
    }

    pub fn rect(bounds: &BoundingBox) -> Self {
        Self::from_points(
            &[
                Point::new(bounds.x, bounds.y),
                Point::new(bounds.max_x(), bounds.y),
                Point::new(bounds.max_x(), bounds.max_y()),
                Point::new(bounds.x, bounds.max_y()),
            ],
            true,
        )
    }

    pub fn line(from: Point, to: Point) -> Self {
        Self::from_points(&[from, to], false)
    }

    /// Ellipse inscribed in `bounds`
    pub fn ellipse(bounds: &BoundingBox) -> Self {
        let mut path = Path::new();
        let (rx, ry) = (bounds.width / 2.0, bounds.height / 2.0);
        path.arc_segments(bounds.center(), rx, ry, 0.0, 360.0, true);
        path.close();
        path
    }

    /// Rectangle with elliptical corners; `arc_width` and `arc_height` are
    /// the full diameters of the corner ellipse.
    pub fn round_rect(bounds: &BoundingBox, arc_width: f64, arc_height: f64) -> Self {
        let rx = arc_width.abs().min(bounds.width) / 2.0;
        let ry = arc_height.abs().min(bounds.height) / 2.0;
        let (x, y, max_x, max_y) = (bounds.x, bounds.y, bounds.max_x(), bounds.max_y());

        let mut path = Path::new();
        path.move_to(Point::new(x + rx, y));
        path.line_to(Point::new(max_x - rx, y));
        path.arc_segments(Point::new(max_x - rx, y + ry), rx, ry, 90.0, -90.0, false);
        path.line_to(Point::new(max_x, max_y - ry));
        path.arc_segments(Point::new(max_x - rx, max_y - ry), rx, ry, 0.0, -90.0, false);
        path.line_to(Point::new(x + rx, max_y));
        path.arc_segments(Point::new(x + rx, max_y - ry), rx, ry, -90.0, -90.0, false);
        path.line_to(Point::new(x, y + ry));
        path.arc_segments(Point::new(x + rx, y + ry), rx, ry, 180.0, -90.0, false);
        path.close();
        path
    }

    /// Elliptical arc inside `bounds` with the given wedge closure
    pub fn arc(bounds: &BoundingBox, angles: ArcAngles, closure: ArcClosure) -> Self {
        let center = bounds.center();
        let mut path = Path::new();
        path.arc_segments(
            center,
            bounds.width / 2.0,
            bounds.height / 2.0,
            angles.start,
            angles.extent,
            true,
        );
        match closure {
            ArcClosure::Open => {}
            ArcClosure::Chord => path.close(),
            ArcClosure::Pie => {
                path.line_to(center);
                path.close();
            }
        }
        path
    }

    pub fn move_to(&mut self, p: Point) {
        self.segments.push(Segment::MoveTo(p));
    }

    pub fn line_to(&mut self, p: Point) {
        self.segments.push(Segment::LineTo(p));
    }

    pub fn cubic_to(&mut self, c1: Point, c2: Point, p: Point) {
        self.segments.push(Segment::CubicTo(c1, c2, p));
    }

    pub fn close(&mut self) {
        self.segments.push(Segment::Close);
    }

    /// Append `other` as separate sub-paths, without a connecting line
    pub fn append(&mut self, other: &Path) {
        self.segments.extend_from_slice(&other.segments);
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether the last sub-path ends in a close segment
    pub fn is_closed(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Close))
    }

    /// Bounds of all on-curve and control points
    pub fn bounds(&self) -> Option<BoundingBox> {
        let mut points = self.segments.iter().flat_map(|s| match *s {
            Segment::MoveTo(p) | Segment::LineTo(p) => vec![p],
            Segment::CubicTo(c1, c2, p) => vec![c1, c2, p],
            Segment::Close => vec![],
        });
        let first = points.next()?;
        let (mut min, mut max) = (first, first);
        for p in points {
            min = Point::new(min.x.min(p.x), min.y.min(p.y));
            max = Point::new(max.x.max(p.x), max.y.max(p.y));
        }
        Some(BoundingBox::new(min.x, min.y, max.x - min.x, max.y - min.y))
    }

    /// Replace curves by line segments, one contour per sub-path
    pub fn flatten(&self) -> Vec<Contour> {
        let mut contours: Vec<Contour> = Vec::new();
        let mut current = Contour::default();
        let mut start = Point::default();

        for segment in &self.segments {
            match *segment {
                Segment::MoveTo(p) => {
                    if !current.points.is_empty() {
                        contours.push(std::mem::take(&mut current));
                    }
                    start = p;
                    current.points.push(p);
                }
                Segment::LineTo(p) => {
                    if current.points.is_empty() {
                        current.points.push(start);
                    }
                    current.points.push(p);
                }
                Segment::CubicTo(c1, c2, p) => {
                    if current.points.is_empty() {
                        current.points.push(start);
                    }
                    let p0 = *current.points.last().unwrap_or(&start);
                    for step in 1..=FLATTEN_STEPS {
                        let t = step as f64 / FLATTEN_STEPS as f64;
                        current.points.push(cubic_point(p0, c1, c2, p, t));
                    }
                }
                Segment::Close => {
                    if !current.points.is_empty() {
                        current.closed = true;
                        contours.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if !current.points.is_empty() {
            contours.push(current);
        }
        contours
    }

    /// SVG path data (`d` attribute)
    pub fn to_svg_data(&self) -> String {
        let mut d = String::new();
        for segment in &self.segments {
            if !d.is_empty() {
                d.push(' ');
            }
            // Writing into a String cannot fail.
            let _ = match *segment {
                Segment::MoveTo(p) => write!(d, "M {} {}", fmt_num(p.x), fmt_num(p.y)),
                Segment::LineTo(p) => write!(d, "L {} {}", fmt_num(p.x), fmt_num(p.y)),
                Segment::CubicTo(c1, c2, p) => write!(
                    d,
                    "C {} {} {} {} {} {}",
                    fmt_num(c1.x),
                    fmt_num(c1.y),
                    fmt_num(c2.x),
                    fmt_num(c2.y),
                    fmt_num(p.x),
                    fmt_num(p.y)
                ),
                Segment::Close => write!(d, "Z"),
            };
        }
        d
    }

    /// Emit cubic segments for an elliptical arc, at most 90 degrees each.
    ///
    /// Angles are in degrees, counter-clockwise with Y up; the arc starts
    /// with a move when `move_first` is set and with a line otherwise.
    fn arc_segments(
        &mut self,
        center: Point,
        rx: f64,
        ry: f64,
        start_deg: f64,
        extent_deg: f64,
        move_first: bool,
    ) {
        let at = |theta: f64| Point::new(center.x + rx * theta.cos(), center.y - ry * theta.sin());
        let tangent = |theta: f64| Point::new(-rx * theta.sin(), -ry * theta.cos());

        let start = start_deg.to_radians();
        let first = at(start);
        if move_first {
            self.move_to(first);
        } else {
            self.line_to(first);
        }

        let count = (extent_deg.abs() / 90.0).ceil().max(1.0) as usize;
        let step = extent_deg.to_radians() / count as f64;
        let k = 4.0 / 3.0 * (step / 4.0).tan();
        for i in 0..count {
            let t0 = start + step * i as f64;
            let t1 = t0 + step;
            let (p0, p1) = (at(t0), at(t1));
            let (d0, d1) = (tangent(t0), tangent(t1));
            self.cubic_to(
                Point::new(p0.x + k * d0.x, p0.y + k * d0.y),
                Point::new(p1.x - k * d1.x, p1.y - k * d1.y),
                p1,
            );
        }
    }
}

fn cubic_point(p0: Point, c1: Point, c2: Point, p1: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    Point::new(
        a * p0.x + b * c1.x + c * c2.x + d * p1.x,
        a * p0.y + b * c1.y + c * c2.y + d * p1.y,
    )
}

/// Format a coordinate with at most three decimals
pub fn fmt_num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{}", rounded)
    }
}
