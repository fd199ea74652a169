//! Value types shared by the decoder, the geometry helpers and playback

/// Point in logical units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Point exactly as it appears on the wire (two signed 16-bit logical units)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointS {
    pub x: i16,
    pub y: i16,
}

impl PointS {
    pub fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    pub fn to_point(self) -> Point {
        Point::new(self.x as f64, self.y as f64)
    }
}

impl From<PointS> for Point {
    fn from(p: PointS) -> Self {
        p.to_point()
    }
}

/// Rectangle corners as read from the wire, in no particular order or sign.
///
/// The decoded record keeps these so it can be written back byte for byte;
/// drawing always goes through [`RawRect::bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawRect {
    pub left: i16,
    pub top: i16,
    pub right: i16,
    pub bottom: i16,
}

impl RawRect {
    pub fn new(left: i16, top: i16, right: i16, bottom: i16) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Normalize the corners into a box with non-negative extent.
    ///
    /// Corners are inclusive on the wire; the extent is the absolute span
    /// minus one, never below zero.
    pub fn bounds(&self) -> BoundingBox {
        let (left, top, right, bottom) = (
            self.left as i32,
            self.top as i32,
            self.right as i32,
            self.bottom as i32,
        );
        let x = left.min(right);
        let y = top.min(bottom);
        let w = ((left - right).abs() - 1).max(0);
        let h = ((top - bottom).abs() - 1).max(0);
        BoundingBox::new(x as f64, y as f64, w as f64, h as f64)
    }
}

/// Axis-aligned box in logical units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Grow by `dx` on the left and right and by `dy` on the top and bottom
    pub fn expand(&self, dx: f64, dy: f64) -> Self {
        Self::new(
            self.x - dx,
            self.y - dy,
            self.width + 2.0 * dx,
            self.height + 2.0 * dy,
        )
    }

    pub fn union(&self, other: &BoundingBox) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self::new(
            x,
            y,
            self.max_x().max(other.max_x()) - x,
            self.max_y().max(other.max_y()) - y,
        )
    }
}

/// COLORREF: red, green, blue and one reserved byte on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorRef {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    /// Kept as read so encoding reproduces the record body
    pub reserved: u8,
}

impl ColorRef {
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            reserved: 0,
        }
    }

    pub fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub fn white() -> Self {
        Self::rgb(0xFF, 0xFF, 0xFF)
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// Polygon fill mode of the playback context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindingRule {
    /// ALTERNATE
    #[default]
    EvenOdd,
    /// WINDING
    NonZero,
}

impl WindingRule {
    /// Whether a point with the given winding count lies inside
    pub fn is_inside(self, winding: i32) -> bool {
        match self {
            WindingRule::EvenOdd => winding % 2 != 0,
            WindingRule::NonZero => winding != 0,
        }
    }

    pub fn svg_fill_rule(self) -> &'static str {
        match self {
            WindingRule::EvenOdd => "evenodd",
            WindingRule::NonZero => "nonzero",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_any_corner_order() {
        let a = RawRect::new(10, 20, 30, 50).bounds();
        let b = RawRect::new(30, 50, 10, 20).bounds();
        assert_eq!(a, b);
        assert_eq!(a, BoundingBox::new(10.0, 20.0, 19.0, 29.0));
    }

    #[test]
    fn test_bounds_never_negative() {
        let coincident = RawRect::new(5, 5, 5, 5).bounds();
        assert_eq!(coincident.width, 0.0);
        assert_eq!(coincident.height, 0.0);

        let extreme = RawRect::new(i16::MIN, i16::MAX, i16::MAX, i16::MIN).bounds();
        assert_eq!(extreme.x, i16::MIN as f64);
        assert_eq!(extreme.width, 65534.0);
        assert!(extreme.height >= 0.0);
    }

    #[test]
    fn test_expand_and_center() {
        let b = BoundingBox::new(0.0, 0.0, 10.0, 4.0);
        assert_eq!(b.center(), Point::new(5.0, 2.0));
        assert_eq!(b.expand(1.0, 2.0), BoundingBox::new(-1.0, -2.0, 12.0, 8.0));
    }

    #[test]
    fn test_winding_rules() {
        assert!(WindingRule::EvenOdd.is_inside(1));
        assert!(!WindingRule::EvenOdd.is_inside(2));
        assert!(WindingRule::EvenOdd.is_inside(-1));
        assert!(WindingRule::NonZero.is_inside(2));
        assert!(!WindingRule::NonZero.is_inside(0));
    }

    #[test]
    fn test_color_hex() {
        assert_eq!(ColorRef::rgb(0x12, 0xab, 0xff).to_hex(), "#12abff");
    }
}
