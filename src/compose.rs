//! Composition of several sub-paths into one shape
//!
//! Closed sub-paths are folded with exclusive-or, so overlapping polygons
//! cancel where they overlap. Open sub-paths are concatenated into a single
//! multi-segment path with no closing segments.

use crate::area::Area;
use crate::path::Path;
use crate::shape::Shape;
use crate::types::WindingRule;

/// Exclusive-or of the regions enclosed by `subpaths`, each read under `rule`
pub fn exclusive_or(subpaths: &[Path], rule: WindingRule) -> Option<Area> {
    subpaths
        .iter()
        .map(|p| Area::from_path(p, rule))
        .reduce(|acc, next| acc.exclusive_or(&next))
}

pub fn concatenate(subpaths: &[Path]) -> Option<Path> {
    subpaths.iter().cloned().reduce(|mut acc, next| {
        acc.append(&next);
        acc
    })
}

/// `None` when there is no sub-path at all
pub fn compose(subpaths: &[Path], rule: WindingRule, closed: bool) -> Option<Shape> {
    if closed {
        exclusive_or(subpaths, rule).map(Shape::Area)
    } else {
        concatenate(subpaths).map(|path| Shape::Path { path, rule })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BoundingBox, Point};

    fn square(x: f64, size: f64) -> Path {
        Path::rect(&BoundingBox::new(x, 0.0, size, size))
    }

    #[test]
    fn test_no_subpaths() {
        assert!(compose(&[], WindingRule::EvenOdd, true).is_none());
        assert!(compose(&[], WindingRule::EvenOdd, false).is_none());
    }

    #[test]
    fn test_identical_closed_subpaths_cancel() {
        let shape = compose(&[square(0.0, 10.0), square(0.0, 10.0)], WindingRule::EvenOdd, true);
        match shape {
            Some(Shape::Area(area)) => assert!(area.is_empty()),
            other => panic!("expected an area, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_closed_subpaths_leave_a_hole() {
        let outer = Path::rect(&BoundingBox::new(0.0, 0.0, 10.0, 10.0));
        let inner = Path::rect(&BoundingBox::new(3.0, 3.0, 4.0, 4.0));
        let area = exclusive_or(&[outer, inner], WindingRule::NonZero).unwrap();
        assert!((area.measure() - 84.0).abs() < 1e-6);
        assert!(!area.contains(Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_degenerate_subpath_still_composes() {
        let point = Path::from_points(&[Point::new(1.0, 1.0)], true);
        let area = exclusive_or(&[point, square(0.0, 4.0)], WindingRule::EvenOdd).unwrap();
        assert!((area.measure() - 16.0).abs() < 1e-6);
    }

    #[test]
    fn test_open_subpaths_concatenate() {
        let a = Path::from_points(&[Point::new(0.0, 0.0), Point::new(1.0, 0.0)], false);
        let b = Path::from_points(&[Point::new(0.0, 2.0), Point::new(1.0, 2.0)], false);
        match compose(&[a, b], WindingRule::NonZero, false) {
            Some(Shape::Path { path, rule }) => {
                assert_eq!(rule, WindingRule::NonZero);
                assert_eq!(path.to_svg_data(), "M 0 0 L 1 0 M 0 2 L 1 2");
            }
            other => panic!("expected a path, got {:?}", other),
        }
    }
}
