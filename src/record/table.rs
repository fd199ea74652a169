//! Object-table records: creation, selection and deletion of pens, brushes
//! and regions

use crate::area::Area;
use crate::context::PlaybackContext;
use crate::cursor::{RecordCursor, RecordWriter};
use crate::error::{WmfError, WmfResult};
use crate::geometry::{
    read_color_ref, read_rect_s, write_color_ref, write_rect_s, COLOR_REF_SIZE, POINT_SIZE,
    SHORT_SIZE,
};
use crate::object::{Brush, GdiObject, Pen, Region};
use crate::types::{BoundingBox, PointS, RawRect};

/// META_SELECTOBJECT
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectObject {
    pub index: u16,
}

impl SelectObject {
    pub fn decode(cursor: &mut RecordCursor<'_>) -> WmfResult<(Self, usize)> {
        let index = cursor.read_u16()?;
        Ok((Self { index }, SHORT_SIZE))
    }

    pub fn encode(&self, writer: &mut RecordWriter) -> WmfResult<usize> {
        writer.write_u16(self.index)?;
        Ok(SHORT_SIZE)
    }

    /// The index is resolved by the context, never checked here
    pub fn apply(&self, ctx: &mut dyn PlaybackContext) {
        ctx.apply_object_table_entry(self.index);
    }
}

/// META_DELETEOBJECT
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeleteObject {
    pub index: u16,
}

impl DeleteObject {
    pub fn decode(cursor: &mut RecordCursor<'_>) -> WmfResult<(Self, usize)> {
        let index = cursor.read_u16()?;
        Ok((Self { index }, SHORT_SIZE))
    }

    pub fn encode(&self, writer: &mut RecordWriter) -> WmfResult<usize> {
        writer.write_u16(self.index)?;
        Ok(SHORT_SIZE)
    }

    pub fn apply(&self, ctx: &mut dyn PlaybackContext) {
        ctx.delete_object_table_entry(self.index);
    }
}

/// META_CREATEPENINDIRECT
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePenIndirect {
    pub pen: Pen,
}

impl CreatePenIndirect {
    pub fn decode(cursor: &mut RecordCursor<'_>) -> WmfResult<(Self, usize)> {
        let style = cursor.read_u16()?;
        // LogPen stores its width as x then y, unlike single points
        let x = cursor.read_i16()?;
        let y = cursor.read_i16()?;
        let (color, color_size) = read_color_ref(cursor)?;
        let pen = Pen {
            style,
            width: PointS::new(x, y),
            color,
        };
        Ok((Self { pen }, SHORT_SIZE + POINT_SIZE + color_size))
    }

    pub fn encode(&self, writer: &mut RecordWriter) -> WmfResult<usize> {
        writer.write_u16(self.pen.style)?;
        writer.write_i16(self.pen.width.x)?;
        writer.write_i16(self.pen.width.y)?;
        Ok(SHORT_SIZE + POINT_SIZE + write_color_ref(writer, self.pen.color)?)
    }

    pub fn apply(&self, ctx: &mut dyn PlaybackContext) {
        ctx.add_object_table_entry(GdiObject::Pen(self.pen.clone()));
    }
}

/// META_CREATEBRUSHINDIRECT
#[derive(Debug, Clone, PartialEq)]
pub struct CreateBrushIndirect {
    pub brush: Brush,
}

impl CreateBrushIndirect {
    pub fn decode(cursor: &mut RecordCursor<'_>) -> WmfResult<(Self, usize)> {
        let style = cursor.read_u16()?;
        let (color, color_size) = read_color_ref(cursor)?;
        let hatch = cursor.read_u16()?;
        Ok((
            Self {
                brush: Brush {
                    style,
                    color,
                    hatch,
                },
            },
            2 * SHORT_SIZE + color_size,
        ))
    }

    pub fn encode(&self, writer: &mut RecordWriter) -> WmfResult<usize> {
        writer.write_u16(self.brush.style)?;
        write_color_ref(writer, self.brush.color)?;
        writer.write_u16(self.brush.hatch)?;
        Ok(2 * SHORT_SIZE + COLOR_REF_SIZE)
    }

    pub fn apply(&self, ctx: &mut dyn PlaybackContext) {
        ctx.add_object_table_entry(GdiObject::Brush(self.brush.clone()));
    }
}

/// One horizontal band of a region: `lines` are (left, right) spans
/// covering `top..bottom`
#[derive(Debug, Clone, PartialEq)]
pub struct Scan {
    pub top: i16,
    pub bottom: i16,
    pub lines: Vec<(i16, i16)>,
}

impl Scan {
    fn decode(cursor: &mut RecordCursor<'_>) -> WmfResult<(Self, usize)> {
        let offset = cursor.position();
        let count = cursor.read_u16()? as usize;
        if count % 2 != 0 {
            return Err(WmfError::InvalidFormat(format!(
                "scan at offset {} in {:?} has odd coordinate count {}",
                offset,
                cursor.record_type(),
                count
            )));
        }
        let top = cursor.read_i16()?;
        let bottom = cursor.read_i16()?;
        let pairs = count / 2;
        let mut lines = Vec::with_capacity(pairs.min(cursor.remaining() / POINT_SIZE));
        for _ in 0..pairs {
            let left = cursor.read_i16()?;
            let right = cursor.read_i16()?;
            lines.push((left, right));
        }
        let _count2 = cursor.read_u16()?;
        Ok((
            Self { top, bottom, lines },
            4 * SHORT_SIZE + pairs * POINT_SIZE,
        ))
    }

    fn encode(&self, writer: &mut RecordWriter) -> WmfResult<usize> {
        let count = (self.lines.len() * 2) as u16;
        writer.write_u16(count)?;
        writer.write_i16(self.top)?;
        writer.write_i16(self.bottom)?;
        for (left, right) in &self.lines {
            writer.write_i16(*left)?;
            writer.write_i16(*right)?;
        }
        writer.write_u16(count)?;
        Ok(4 * SHORT_SIZE + self.lines.len() * POINT_SIZE)
    }

    fn rects(&self) -> impl Iterator<Item = BoundingBox> + '_ {
        let top = self.top as f64;
        let height = self.bottom as f64 - top;
        self.lines
            .iter()
            .map(move |&(l, r)| BoundingBox::new(l as f64, top, r as f64 - l as f64, height))
    }
}

/// META_CREATEREGION
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRegion {
    pub next_in_chain: u16,
    pub object_type: u16,
    pub object_count: u32,
    pub region_size: i16,
    pub max_scan: i16,
    pub bounds: RawRect,
    pub scans: Vec<Scan>,
}

impl CreateRegion {
    /// Fixed part before the scans
    const HEADER_SIZE: usize = 7 * SHORT_SIZE + 8;

    pub fn decode(cursor: &mut RecordCursor<'_>) -> WmfResult<(Self, usize)> {
        let next_in_chain = cursor.read_u16()?;
        let object_type = cursor.read_u16()?;
        let object_count = cursor.read_u32()?;
        let region_size = cursor.read_i16()?;
        let scan_count = cursor.read_u16()? as usize;
        let max_scan = cursor.read_i16()?;
        let (bounds, _) = read_rect_s(cursor)?;

        let mut size = Self::HEADER_SIZE;
        let mut scans = Vec::new();
        for _ in 0..scan_count {
            let (scan, read) = Scan::decode(cursor)?;
            size += read;
            scans.push(scan);
        }
        Ok((
            Self {
                next_in_chain,
                object_type,
                object_count,
                region_size,
                max_scan,
                bounds,
                scans,
            },
            size,
        ))
    }

    pub fn encode(&self, writer: &mut RecordWriter) -> WmfResult<usize> {
        writer.write_u16(self.next_in_chain)?;
        writer.write_u16(self.object_type)?;
        writer.write_u32(self.object_count)?;
        writer.write_i16(self.region_size)?;
        writer.write_u16(self.scans.len() as u16)?;
        writer.write_i16(self.max_scan)?;
        write_rect_s(writer, &self.bounds)?;
        let mut size = Self::HEADER_SIZE;
        for scan in &self.scans {
            size += scan.encode(writer)?;
        }
        Ok(size)
    }

    /// Union of all scan rectangles
    pub fn to_region(&self) -> Region {
        let rects: Vec<BoundingBox> = self.scans.iter().flat_map(Scan::rects).collect();
        let area = Area::from_rects(&rects);
        Region {
            bounds: self.bounds.bounds(),
            area,
        }
    }

    pub fn apply(&self, ctx: &mut dyn PlaybackContext) {
        ctx.add_object_table_entry(GdiObject::Region(self.to_region()));
    }
}
