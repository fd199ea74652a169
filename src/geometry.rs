//! Wire conventions shared by the record decoders
//!
//! Two rectangle layouts exist on the wire and they are deliberately kept
//! apart: [`read_bounds`] (bottom, right, top, left) for the drawing records
//! and [`read_rect_s`] (left, top, right, bottom) for header and region
//! structures. Single points are stored y first; point arrays x first.
//! Every reader has a writer with the identical field order.

use crate::cursor::{ReadShort, RecordCursor, RecordWriter};
use crate::error::WmfResult;
use crate::types::{ColorRef, Point, PointS, RawRect};

pub const SHORT_SIZE: usize = 2;
pub const POINT_SIZE: usize = 2 * SHORT_SIZE;
pub const RECT_SIZE: usize = 4 * SHORT_SIZE;
pub const COLOR_REF_SIZE: usize = 4;

/// Bounding rectangle stored as bottom, right, top, left
pub fn read_bounds(cursor: &mut RecordCursor<'_>) -> WmfResult<(RawRect, usize)> {
    let bottom = cursor.read_i16()?;
    let right = cursor.read_i16()?;
    let top = cursor.read_i16()?;
    let left = cursor.read_i16()?;
    Ok((RawRect::new(left, top, right, bottom), RECT_SIZE))
}

pub fn write_bounds(writer: &mut RecordWriter, rect: &RawRect) -> WmfResult<usize> {
    writer.write_i16(rect.bottom)?;
    writer.write_i16(rect.right)?;
    writer.write_i16(rect.top)?;
    writer.write_i16(rect.left)?;
    Ok(RECT_SIZE)
}

/// RectS: left, top, right, bottom
pub fn read_rect_s<R: ReadShort>(reader: &mut R) -> WmfResult<(RawRect, usize)> {
    let left = reader.read_short()?;
    let top = reader.read_short()?;
    let right = reader.read_short()?;
    let bottom = reader.read_short()?;
    Ok((RawRect::new(left, top, right, bottom), RECT_SIZE))
}

pub fn write_rect_s(writer: &mut RecordWriter, rect: &RawRect) -> WmfResult<usize> {
    writer.write_i16(rect.left)?;
    writer.write_i16(rect.top)?;
    writer.write_i16(rect.right)?;
    writer.write_i16(rect.bottom)?;
    Ok(RECT_SIZE)
}

/// Single point, y before x
pub fn read_point_s(cursor: &mut RecordCursor<'_>) -> WmfResult<(PointS, usize)> {
    let y = cursor.read_i16()?;
    let x = cursor.read_i16()?;
    Ok((PointS::new(x, y), POINT_SIZE))
}

pub fn write_point_s(writer: &mut RecordWriter, point: PointS) -> WmfResult<usize> {
    writer.write_i16(point.y)?;
    writer.write_i16(point.x)?;
    Ok(POINT_SIZE)
}

/// `count` points, each x before y.
///
/// The format documentation calls these unsigned; they are signed.
pub fn read_point_array(
    cursor: &mut RecordCursor<'_>,
    count: usize,
) -> WmfResult<(Vec<PointS>, usize)> {
    let mut points = Vec::with_capacity(count.min(cursor.remaining() / POINT_SIZE));
    for _ in 0..count {
        let x = cursor.read_i16()?;
        let y = cursor.read_i16()?;
        points.push(PointS::new(x, y));
    }
    Ok((points, count * POINT_SIZE))
}

pub fn write_point_array(writer: &mut RecordWriter, points: &[PointS]) -> WmfResult<usize> {
    for p in points {
        writer.write_i16(p.x)?;
        writer.write_i16(p.y)?;
    }
    Ok(points.len() * POINT_SIZE)
}

pub fn read_color_ref(cursor: &mut RecordCursor<'_>) -> WmfResult<(ColorRef, usize)> {
    let red = cursor.read_u8()?;
    let green = cursor.read_u8()?;
    let blue = cursor.read_u8()?;
    let reserved = cursor.read_u8()?;
    let color = ColorRef {
        red,
        green,
        blue,
        reserved,
    };
    Ok((color, COLOR_REF_SIZE))
}

pub fn write_color_ref(writer: &mut RecordWriter, color: ColorRef) -> WmfResult<usize> {
    writer.write_u8(color.red)?;
    writer.write_u8(color.green)?;
    writer.write_u8(color.blue)?;
    writer.write_u8(color.reserved)?;
    Ok(COLOR_REF_SIZE)
}

/// How the end points of an elliptical arc are joined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcClosure {
    /// arc only
    Open,
    /// straight line between the end points
    Chord,
    /// two radii to the center
    Pie,
}

/// Start angle and sweep of an arc, in degrees, counter-clockwise with Y up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcAngles {
    pub start: f64,
    pub extent: f64,
}

impl ArcAngles {
    /// Reconstruct the arc angles from the radial points of an arc record.
    ///
    /// Logical Y grows downward, so Y is negated before `atan2`. The sweep
    /// lies in (0, 360]: coincident radials give a full ellipse.
    pub fn from_points(start: Point, end: Point, center: Point) -> Self {
        let mut start_angle = angle_of(start, center);
        let end_angle = angle_of(end, center);
        let diff = end_angle - start_angle;
        let extent = if diff > 0.0 { diff } else { diff + 360.0 };
        if start_angle < 0.0 {
            start_angle += 360.0;
        }
        Self {
            start: start_angle,
            extent,
        }
    }

    pub fn end(&self) -> f64 {
        self.start + self.extent
    }
}

fn angle_of(point: Point, center: Point) -> f64 {
    let dx = point.x - center.x;
    let dy = -(point.y - center.y);
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    dy.atan2(dx).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordType;
    use crate::types::BoundingBox;

    fn corners_bytes(values: [i16; 4]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_conventions_read_different_orders() {
        let bytes = corners_bytes([1, 2, 3, 4]);

        let mut a = RecordCursor::new(&bytes, RecordType::Ellipse, 0);
        let (rect_a, size_a) = read_bounds(&mut a).unwrap();
        assert_eq!(rect_a, RawRect::new(4, 3, 2, 1));
        assert_eq!(size_a, 8);
        assert_eq!(a.consumed(), 8);

        let mut b = RecordCursor::new(&bytes, RecordType::CreateRegion, 0);
        let (rect_b, size_b) = read_rect_s(&mut b).unwrap();
        assert_eq!(rect_b, RawRect::new(1, 2, 3, 4));
        assert_eq!(size_b, 8);
    }

    #[test]
    fn test_conventions_normalize_alike() {
        for values in [[10, 20, -5, -40], [-5, -40, 10, 20], [0, 0, 0, 0], [7, -7, -7, 7]] {
            let bytes = corners_bytes(values);
            let mut a = RecordCursor::new(&bytes, RecordType::Ellipse, 0);
            let mut b = RecordCursor::new(&bytes, RecordType::CreateRegion, 0);
            let bounds_a = read_bounds(&mut a).unwrap().0.bounds();
            let bounds_b = read_rect_s(&mut b).unwrap().0.bounds();
            assert!(bounds_a.width >= 0.0 && bounds_a.height >= 0.0);
            assert!(bounds_b.width >= 0.0 && bounds_b.height >= 0.0);
        }
    }

    #[test]
    fn test_bounds_normalization_values() {
        // bottom=50, right=30, top=20, left=10
        let bytes = corners_bytes([50, 30, 20, 10]);
        let mut cursor = RecordCursor::new(&bytes, RecordType::Rectangle, 0);
        let bounds = read_bounds(&mut cursor).unwrap().0.bounds();
        assert_eq!(bounds, BoundingBox::new(10.0, 20.0, 19.0, 29.0));
    }

    #[test]
    fn test_point_is_y_first_and_array_x_first() {
        let bytes = corners_bytes([5, -6, 5, -6]);
        let mut cursor = RecordCursor::new(&bytes, RecordType::MoveTo, 0);
        let (single, _) = read_point_s(&mut cursor).unwrap();
        assert_eq!(single, PointS::new(-6, 5));
        let (array, size) = read_point_array(&mut cursor, 1).unwrap();
        assert_eq!(array, vec![PointS::new(5, -6)]);
        assert_eq!(size, 4);
    }

    #[test]
    fn test_writers_mirror_readers() {
        let rect = RawRect::new(-1, 2, -3, 4);
        let mut writer = RecordWriter::new();
        write_bounds(&mut writer, &rect).unwrap();
        write_rect_s(&mut writer, &rect).unwrap();
        write_point_s(&mut writer, PointS::new(9, -9)).unwrap();
        write_color_ref(&mut writer, ColorRef::rgb(1, 2, 3)).unwrap();
        let bytes = writer.into_bytes();

        let mut cursor = RecordCursor::new(&bytes, RecordType::Arc, 0);
        assert_eq!(read_bounds(&mut cursor).unwrap().0, rect);
        assert_eq!(read_rect_s(&mut cursor).unwrap().0, rect);
        assert_eq!(read_point_s(&mut cursor).unwrap().0, PointS::new(9, -9));
        assert_eq!(read_color_ref(&mut cursor).unwrap().0, ColorRef::rgb(1, 2, 3));
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_color_ref_keeps_reserved_byte() {
        let bytes = [0x11, 0x22, 0x33, 0x7F];
        let mut cursor = RecordCursor::new(&bytes, RecordType::SetPixel, 0);
        let (color, _) = read_color_ref(&mut cursor).unwrap();
        assert_eq!(color.reserved, 0x7F);
        assert_eq!(color.to_hex(), "#112233");

        let mut writer = RecordWriter::new();
        write_color_ref(&mut writer, color).unwrap();
        assert_eq!(writer.into_bytes(), bytes);
    }

    #[test]
    fn test_rect_s_reads_header_bytes() {
        let bytes = corners_bytes([1, 2, 30, 40]);
        let mut header = std::io::Cursor::new(&bytes[..]);
        let (rect, size) = read_rect_s(&mut header).unwrap();
        assert_eq!(rect, RawRect::new(1, 2, 30, 40));
        assert_eq!(size, RECT_SIZE);
        assert!(read_rect_s(&mut header).is_err());
    }

    #[test]
    fn test_quarter_arc_angles() {
        // Y grows downward: the point above the center is at 90 degrees.
        let angles = ArcAngles::from_points(
            Point::new(1.0, 0.0),
            Point::new(0.0, -1.0),
            Point::new(0.0, 0.0),
        );
        assert!((angles.start - 0.0).abs() < 1e-9);
        assert!((angles.end() - 90.0).abs() < 1e-9);
        assert!((angles.extent - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_start_angle_wraps() {
        let angles = ArcAngles::from_points(
            Point::new(0.0, 1.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 0.0),
        );
        assert!((angles.start - 270.0).abs() < 1e-9);
        assert!((angles.extent - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_coincident_radials_sweep_full_ellipse() {
        let p = Point::new(3.0, 4.0);
        let angles = ArcAngles::from_points(p, p, Point::new(0.0, 0.0));
        assert_eq!(angles.extent, 360.0);

        let center = Point::new(2.0, 2.0);
        let degenerate = ArcAngles::from_points(center, center, center);
        assert_eq!(degenerate.start, 0.0);
        assert_eq!(degenerate.extent, 360.0);
        assert!(!degenerate.start.is_nan());
    }
}
