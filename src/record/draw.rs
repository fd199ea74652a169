//! Drawing records: positioning, lines, polygons and the bounded shapes

use crate::area::Area;
use crate::compose::compose;
use crate::context::PlaybackContext;
use crate::cursor::{RecordCursor, RecordWriter};
use crate::error::WmfResult;
use crate::geometry::{
    read_bounds, read_color_ref, read_point_array, read_point_s, write_bounds, write_color_ref,
    write_point_array, write_point_s, ArcAngles, ArcClosure, SHORT_SIZE,
};
use crate::path::Path;
use crate::shape::{FillDrawStyle, Shape};
use crate::types::{BoundingBox, ColorRef, Point, PointS, RawRect};

/// META_MOVETO
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveTo {
    pub point: PointS,
}

impl MoveTo {
    pub fn decode(cursor: &mut RecordCursor<'_>) -> WmfResult<(Self, usize)> {
        let (point, size) = read_point_s(cursor)?;
        Ok((Self { point }, size))
    }

    pub fn encode(&self, writer: &mut RecordWriter) -> WmfResult<usize> {
        write_point_s(writer, self.point)
    }

    pub fn apply(&self, ctx: &mut dyn PlaybackContext) {
        ctx.set_location(self.point.to_point());
    }
}

/// META_LINETO: draws from the current position up to, not including, the point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineTo {
    pub point: PointS,
}

impl LineTo {
    pub fn decode(cursor: &mut RecordCursor<'_>) -> WmfResult<(Self, usize)> {
        let (point, size) = read_point_s(cursor)?;
        Ok((Self { point }, size))
    }

    pub fn encode(&self, writer: &mut RecordWriter) -> WmfResult<usize> {
        write_point_s(writer, self.point)
    }

    pub fn apply(&self, ctx: &mut dyn PlaybackContext, style: FillDrawStyle) {
        let start = ctx.location();
        let end = self.point.to_point();
        style.render(ctx, &Shape::Line(start, end));
        ctx.set_location(end);
    }
}

/// Point count followed by the points, shared by META_POLYGON and META_POLYLINE
#[derive(Debug, Clone, PartialEq)]
pub struct PointList {
    pub points: Vec<PointS>,
}

impl PointList {
    pub fn decode(cursor: &mut RecordCursor<'_>) -> WmfResult<(Self, usize)> {
        let count = cursor.read_u16()? as usize;
        let (points, size) = read_point_array(cursor, count)?;
        Ok((Self { points }, SHORT_SIZE + size))
    }

    pub fn encode(&self, writer: &mut RecordWriter) -> WmfResult<usize> {
        writer.write_u16(self.points.len() as u16)?;
        Ok(SHORT_SIZE + write_point_array(writer, &self.points)?)
    }

    pub fn to_path(&self, closed: bool) -> Path {
        points_to_path(&self.points, closed)
    }

    /// Polygons close the path, polylines leave it open
    pub fn apply(&self, ctx: &mut dyn PlaybackContext, closed: bool, style: FillDrawStyle) {
        let shape = Shape::Path {
            path: self.to_path(closed),
            rule: ctx.winding_rule(),
        };
        style.render(ctx, &shape);
    }
}

/// META_POLYPOLYGON
#[derive(Debug, Clone, PartialEq)]
pub struct PolyPolygon {
    pub polygons: Vec<Vec<PointS>>,
}

impl PolyPolygon {
    pub fn decode(cursor: &mut RecordCursor<'_>) -> WmfResult<(Self, usize)> {
        let count = cursor.read_u16()? as usize;
        let mut size = SHORT_SIZE;

        let mut counts = Vec::with_capacity(count.min(cursor.remaining() / SHORT_SIZE));
        for _ in 0..count {
            counts.push(cursor.read_u16()? as usize);
            size += SHORT_SIZE;
        }

        let mut polygons = Vec::with_capacity(counts.len());
        for n in counts {
            let (points, read) = read_point_array(cursor, n)?;
            size += read;
            polygons.push(points);
        }
        Ok((Self { polygons }, size))
    }

    pub fn encode(&self, writer: &mut RecordWriter) -> WmfResult<usize> {
        writer.write_u16(self.polygons.len() as u16)?;
        let mut size = SHORT_SIZE;
        for polygon in &self.polygons {
            writer.write_u16(polygon.len() as u16)?;
            size += SHORT_SIZE;
        }
        for polygon in &self.polygons {
            size += write_point_array(writer, polygon)?;
        }
        Ok(size)
    }

    /// Every sub-path closed, even the degenerate ones
    pub fn subpaths(&self) -> Vec<Path> {
        self.polygons
            .iter()
            .map(|points| points_to_path(points, true))
            .collect()
    }

    pub fn apply(&self, ctx: &mut dyn PlaybackContext, style: FillDrawStyle) {
        let rule = ctx.winding_rule();
        if let Some(shape) = compose(&self.subpaths(), rule, true) {
            style.render(ctx, &shape);
        }
    }
}

/// META_ELLIPSE
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    pub bounds: RawRect,
}

impl Ellipse {
    pub fn decode(cursor: &mut RecordCursor<'_>) -> WmfResult<(Self, usize)> {
        let (bounds, size) = read_bounds(cursor)?;
        Ok((Self { bounds }, size))
    }

    pub fn encode(&self, writer: &mut RecordWriter) -> WmfResult<usize> {
        write_bounds(writer, &self.bounds)
    }

    pub fn apply(&self, ctx: &mut dyn PlaybackContext, style: FillDrawStyle) {
        style.render(ctx, &Shape::Ellipse(self.bounds.bounds()));
    }
}

/// META_RECTANGLE
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub bounds: RawRect,
}

impl Rectangle {
    pub fn decode(cursor: &mut RecordCursor<'_>) -> WmfResult<(Self, usize)> {
        let (bounds, size) = read_bounds(cursor)?;
        Ok((Self { bounds }, size))
    }

    pub fn encode(&self, writer: &mut RecordWriter) -> WmfResult<usize> {
        write_bounds(writer, &self.bounds)
    }

    pub fn apply(&self, ctx: &mut dyn PlaybackContext, style: FillDrawStyle) {
        style.render(ctx, &Shape::Rect(self.bounds.bounds()));
    }
}

/// META_ROUNDRECT
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundRect {
    /// height of the ellipse used for the corners
    pub height: i16,
    pub width: i16,
    pub bounds: RawRect,
}

impl RoundRect {
    pub fn decode(cursor: &mut RecordCursor<'_>) -> WmfResult<(Self, usize)> {
        let height = cursor.read_i16()?;
        let width = cursor.read_i16()?;
        let (bounds, size) = read_bounds(cursor)?;
        Ok((
            Self {
                height,
                width,
                bounds,
            },
            2 * SHORT_SIZE + size,
        ))
    }

    pub fn encode(&self, writer: &mut RecordWriter) -> WmfResult<usize> {
        writer.write_i16(self.height)?;
        writer.write_i16(self.width)?;
        Ok(2 * SHORT_SIZE + write_bounds(writer, &self.bounds)?)
    }

    pub fn apply(&self, ctx: &mut dyn PlaybackContext, style: FillDrawStyle) {
        let shape = Shape::RoundRect {
            bounds: self.bounds.bounds(),
            arc_width: self.width as f64,
            arc_height: self.height as f64,
        };
        style.render(ctx, &shape);
    }
}

/// Layout shared by META_ARC, META_PIE and META_CHORD.
///
/// The end radial comes first on the wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcRecord {
    pub end: PointS,
    pub start: PointS,
    pub bounds: RawRect,
}

impl ArcRecord {
    pub fn decode(cursor: &mut RecordCursor<'_>) -> WmfResult<(Self, usize)> {
        let (end, end_size) = read_point_s(cursor)?;
        let (start, start_size) = read_point_s(cursor)?;
        let (bounds, bounds_size) = read_bounds(cursor)?;
        Ok((
            Self { end, start, bounds },
            end_size + start_size + bounds_size,
        ))
    }

    pub fn encode(&self, writer: &mut RecordWriter) -> WmfResult<usize> {
        let mut size = write_point_s(writer, self.end)?;
        size += write_point_s(writer, self.start)?;
        size += write_bounds(writer, &self.bounds)?;
        Ok(size)
    }

    pub fn to_shape(&self, closure: ArcClosure) -> Shape {
        let bounds = self.bounds.bounds();
        let angles = ArcAngles::from_points(
            self.start.to_point(),
            self.end.to_point(),
            bounds.center(),
        );
        Shape::Arc {
            bounds,
            angles,
            closure,
        }
    }

    pub fn apply(&self, ctx: &mut dyn PlaybackContext, closure: ArcClosure, style: FillDrawStyle) {
        style.render(ctx, &self.to_shape(closure));
    }
}

/// META_FRAMEREGION
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRegion {
    pub region_index: u16,
    pub brush_index: u16,
    pub height: i16,
    pub width: i16,
}

impl FrameRegion {
    pub fn decode(cursor: &mut RecordCursor<'_>) -> WmfResult<(Self, usize)> {
        let region_index = cursor.read_u16()?;
        let brush_index = cursor.read_u16()?;
        let height = cursor.read_i16()?;
        let width = cursor.read_i16()?;
        Ok((
            Self {
                region_index,
                brush_index,
                height,
                width,
            },
            4 * SHORT_SIZE,
        ))
    }

    pub fn encode(&self, writer: &mut RecordWriter) -> WmfResult<usize> {
        writer.write_u16(self.region_index)?;
        writer.write_u16(self.brush_index)?;
        writer.write_i16(self.height)?;
        writer.write_i16(self.width)?;
        Ok(4 * SHORT_SIZE)
    }

    /// Band of `width` by `height` around the region bounds
    pub fn frame(&self, inner: &BoundingBox) -> Area {
        let outer = inner.expand(self.width as f64, self.height as f64);
        Area::from_rect(&outer).subtract(&Area::from_rect(inner))
    }

    pub fn apply(&self, ctx: &mut dyn PlaybackContext, style: FillDrawStyle) {
        ctx.apply_object_table_entry(self.brush_index);
        ctx.apply_object_table_entry(self.region_index);
        let frame = self.frame(&ctx.region());
        style.render(ctx, &Shape::Area(frame));
    }
}

/// META_SETPIXEL
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetPixel {
    pub color: ColorRef,
    pub point: PointS,
}

impl SetPixel {
    pub fn decode(cursor: &mut RecordCursor<'_>) -> WmfResult<(Self, usize)> {
        let (color, color_size) = read_color_ref(cursor)?;
        let (point, point_size) = read_point_s(cursor)?;
        Ok((Self { color, point }, color_size + point_size))
    }

    pub fn encode(&self, writer: &mut RecordWriter) -> WmfResult<usize> {
        let size = write_color_ref(writer, self.color)?;
        Ok(size + write_point_s(writer, self.point)?)
    }

    /// Paints with the record's own color; the selected brush is untouched
    pub fn apply(&self, ctx: &mut dyn PlaybackContext, style: FillDrawStyle) {
        if !style.fills() {
            return;
        }
        let p = self.point.to_point();
        ctx.fill_with_color(&Shape::Rect(BoundingBox::new(p.x, p.y, 1.0, 1.0)), self.color);
    }
}

fn points_to_path(points: &[PointS], closed: bool) -> Path {
    let points: Vec<Point> = points.iter().map(|p| p.to_point()).collect();
    Path::from_points(&points, closed)
}
