//! Records that only change playback state

use log::warn;

use crate::context::PlaybackContext;
use crate::cursor::{RecordCursor, RecordWriter};
use crate::error::WmfResult;
use crate::geometry::{read_point_s, write_point_s, SHORT_SIZE};
use crate::types::{PointS, WindingRule};

const ALTERNATE: u16 = 0x0001;
const WINDING: u16 = 0x0002;

/// META_SETPOLYFILLMODE
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetPolyFillMode {
    pub mode: u16,
    /// Some writers pad the record with an extra word
    pub reserved: Option<u16>,
}

impl SetPolyFillMode {
    pub fn decode(cursor: &mut RecordCursor<'_>) -> WmfResult<(Self, usize)> {
        let mode = cursor.read_u16()?;
        let reserved = if cursor.remaining() >= SHORT_SIZE {
            Some(cursor.read_u16()?)
        } else {
            None
        };
        let size = SHORT_SIZE + reserved.map_or(0, |_| SHORT_SIZE);
        Ok((Self { mode, reserved }, size))
    }

    pub fn encode(&self, writer: &mut RecordWriter) -> WmfResult<usize> {
        writer.write_u16(self.mode)?;
        if let Some(reserved) = self.reserved {
            writer.write_u16(reserved)?;
            return Ok(2 * SHORT_SIZE);
        }
        Ok(SHORT_SIZE)
    }

    pub fn winding_rule(&self) -> Option<WindingRule> {
        match self.mode {
            ALTERNATE => Some(WindingRule::EvenOdd),
            WINDING => Some(WindingRule::NonZero),
            _ => None,
        }
    }

    pub fn apply(&self, ctx: &mut dyn PlaybackContext) {
        match self.winding_rule() {
            Some(rule) => ctx.set_winding_rule(rule),
            None => warn!("ignoring unknown poly fill mode {}", self.mode),
        }
    }
}

/// META_SETWINDOWORG, stored y then x
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetWindowOrg {
    pub origin: PointS,
}

impl SetWindowOrg {
    pub fn decode(cursor: &mut RecordCursor<'_>) -> WmfResult<(Self, usize)> {
        let (origin, size) = read_point_s(cursor)?;
        Ok((Self { origin }, size))
    }

    pub fn encode(&self, writer: &mut RecordWriter) -> WmfResult<usize> {
        write_point_s(writer, self.origin)
    }

    pub fn apply(&self, ctx: &mut dyn PlaybackContext) {
        ctx.set_window_origin(self.origin.to_point());
    }
}

/// META_SETWINDOWEXT, stored height then width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetWindowExt {
    /// `x` is the width, `y` the height
    pub extent: PointS,
}

impl SetWindowExt {
    pub fn decode(cursor: &mut RecordCursor<'_>) -> WmfResult<(Self, usize)> {
        let (extent, size) = read_point_s(cursor)?;
        Ok((Self { extent }, size))
    }

    pub fn encode(&self, writer: &mut RecordWriter) -> WmfResult<usize> {
        write_point_s(writer, self.extent)
    }

    pub fn apply(&self, ctx: &mut dyn PlaybackContext) {
        ctx.set_window_extent(self.extent.x as f64, self.extent.y as f64);
    }
}
