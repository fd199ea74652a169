//! Little-endian byte cursor over a single record body
//!
//! A cursor never reads past the slice it was built over; running out of
//! bytes yields [`WmfError::Truncated`] carrying the record kind and the
//! absolute stream offset of the failed read.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::Cursor;

use crate::error::{WmfError, WmfResult};
use crate::record::RecordType;

/// Sequential reader over one record body (header already stripped)
pub struct RecordCursor<'a> {
    cursor: Cursor<&'a [u8]>,
    record: RecordType,
    base_offset: usize,
}

impl<'a> RecordCursor<'a> {
    /// `base_offset` is where `body` starts in the whole stream
    pub fn new(body: &'a [u8], record: RecordType, base_offset: usize) -> Self {
        Self {
            cursor: Cursor::new(body),
            record,
            base_offset,
        }
    }

    pub fn record_type(&self) -> RecordType {
        self.record
    }

    /// Bytes read so far
    pub fn consumed(&self) -> usize {
        self.cursor.position() as usize
    }

    /// Absolute stream offset of the next read
    pub fn position(&self) -> usize {
        self.base_offset + self.consumed()
    }

    pub fn remaining(&self) -> usize {
        self.cursor.get_ref().len().saturating_sub(self.consumed())
    }

    fn ensure(&self, needed: usize) -> WmfResult<()> {
        let remaining = self.remaining();
        if remaining < needed {
            return Err(WmfError::Truncated {
                record: self.record,
                offset: self.position(),
                needed: needed - remaining,
            });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> WmfResult<u8> {
        self.ensure(1)?;
        Ok(self.cursor.read_u8()?)
    }

    pub fn read_i16(&mut self) -> WmfResult<i16> {
        self.ensure(2)?;
        Ok(self.cursor.read_i16::<LittleEndian>()?)
    }

    pub fn read_u16(&mut self) -> WmfResult<u16> {
        self.ensure(2)?;
        Ok(self.cursor.read_u16::<LittleEndian>()?)
    }

    pub fn read_u32(&mut self) -> WmfResult<u32> {
        self.ensure(4)?;
        Ok(self.cursor.read_u32::<LittleEndian>()?)
    }

    pub fn skip(&mut self, count: usize) -> WmfResult<()> {
        self.ensure(count)?;
        self.cursor.set_position((self.consumed() + count) as u64);
        Ok(())
    }
}

/// Anything that yields little-endian signed 16-bit values; lets the
/// shared field-order readers run over header bytes as well as records
pub trait ReadShort {
    fn read_short(&mut self) -> WmfResult<i16>;
}

impl ReadShort for RecordCursor<'_> {
    fn read_short(&mut self) -> WmfResult<i16> {
        self.read_i16()
    }
}

impl ReadShort for Cursor<&[u8]> {
    fn read_short(&mut self) -> WmfResult<i16> {
        Ok(self.read_i16::<LittleEndian>()?)
    }
}

/// Little-endian writer used to encode records back to their wire form
#[derive(Debug, Default)]
pub struct RecordWriter {
    buf: Vec<u8>,
}

impl RecordWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn write_u8(&mut self, value: u8) -> WmfResult<()> {
        self.buf.write_u8(value)?;
        Ok(())
    }

    pub fn write_i16(&mut self, value: i16) -> WmfResult<()> {
        self.buf.write_i16::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_u16(&mut self, value: u16) -> WmfResult<()> {
        self.buf.write_u16::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> WmfResult<()> {
        self.buf.write_u32::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
