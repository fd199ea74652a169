//! Object-table entries created by the metafile and selected by index

use crate::area::Area;
use crate::types::{BoundingBox, ColorRef, PointS};

/// PS_NULL
const PEN_STYLE_NULL: u16 = 0x0005;
/// BS_NULL
const BRUSH_STYLE_NULL: u16 = 0x0001;

#[derive(Debug, Clone, PartialEq)]
pub struct Pen {
    pub style: u16,
    /// only `x` is meaningful
    pub width: PointS,
    pub color: ColorRef,
}

impl Pen {
    pub fn is_null(&self) -> bool {
        self.style & 0x000F == PEN_STYLE_NULL
    }

    /// A zero width pen is one device unit wide
    pub fn stroke_width(&self) -> f64 {
        (self.width.x as f64).abs().max(1.0)
    }
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            style: 0,
            width: PointS::new(1, 0),
            color: ColorRef::black(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    pub style: u16,
    pub color: ColorRef,
    pub hatch: u16,
}

impl Brush {
    pub fn is_null(&self) -> bool {
        self.style == BRUSH_STYLE_NULL
    }
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            style: 0,
            color: ColorRef::white(),
            hatch: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub bounds: BoundingBox,
    pub area: Area,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GdiObject {
    Pen(Pen),
    Brush(Brush),
    Region(Region),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_styles() {
        let pen = Pen {
            style: 0x0005,
            ..Pen::default()
        };
        assert!(pen.is_null());
        assert!(!Pen::default().is_null());
        assert!(Brush {
            style: 1,
            ..Brush::default()
        }
        .is_null());
    }

    #[test]
    fn test_stroke_width_minimum() {
        let pen = Pen {
            width: PointS::new(0, 0),
            ..Pen::default()
        };
        assert_eq!(pen.stroke_width(), 1.0);
        let wide = Pen {
            width: PointS::new(-4, 0),
            ..Pen::default()
        };
        assert_eq!(wide.stroke_width(), 4.0);
    }
}
