//! WMF format parser and converter

use byteorder::{LittleEndian, ReadBytesExt};
use log::{debug, info, warn};
use std::io::Cursor;

use crate::error::{WmfError, WmfResult};
use crate::geometry::read_rect_s;
use crate::graphics::SvgGraphics;
use crate::player::{PlaybackOptions, Player};
use crate::types::RawRect;

/// Key of the Aldus placeable header
pub const PLACEABLE_KEY: u32 = 0x9AC6_CDD7;
pub const PLACEABLE_HEADER_SIZE: usize = 22;
pub const META_HEADER_SIZE: usize = 18;

const MEMORY_METAFILE: u16 = 0x0001;
const DISK_METAFILE: u16 = 0x0002;

/// Aldus placeable header preceding some metafiles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaceableHeader {
    pub handle: u16,
    /// left, top, right, bottom in logical units
    pub bounds: RawRect,
    pub units_per_inch: u16,
    pub reserved: u32,
    pub checksum: u16,
}

/// META_HEADER
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetaHeader {
    pub file_type: u16,
    pub header_words: u16,
    pub version: u16,
    pub file_size_words: u32,
    pub object_count: u16,
    pub max_record_words: u32,
    pub member_count: u16,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WmfHeader {
    pub placeable: Option<PlaceableHeader>,
    pub meta: MetaHeader,
    /// Stream offset of the first record
    pub records_offset: usize,
}

/// Check if data is WMF format
pub fn is_wmf_format(data: &[u8]) -> bool {
    if data.len() < 4 {
        return false;
    }

    // Placeable WMF header (starts with 0x9AC6CDD7)
    let key = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    if key == PLACEABLE_KEY {
        return true;
    }

    // Standard WMF: file type then a nine-word header size
    let file_type = u16::from_le_bytes([data[0], data[1]]);
    let header_words = u16::from_le_bytes([data[2], data[3]]);
    matches!(file_type, MEMORY_METAFILE | DISK_METAFILE) && header_words == 9
}

fn read_placeable(data: &[u8]) -> WmfResult<PlaceableHeader> {
    let mut cursor = Cursor::new(data);
    cursor.set_position(4);
    let handle = cursor.read_u16::<LittleEndian>()?;
    let (bounds, _) = read_rect_s(&mut cursor)?;
    let units_per_inch = cursor.read_u16::<LittleEndian>()?;
    let reserved = cursor.read_u32::<LittleEndian>()?;
    let checksum = cursor.read_u16::<LittleEndian>()?;

    let computed = data[..20]
        .chunks_exact(2)
        .fold(0u16, |acc, w| acc ^ u16::from_le_bytes([w[0], w[1]]));
    if computed != checksum {
        warn!(
            "placeable header checksum 0x{:04X} does not match computed 0x{:04X}",
            checksum, computed
        );
    }

    Ok(PlaceableHeader {
        handle,
        bounds,
        units_per_inch,
        reserved,
        checksum,
    })
}

fn read_meta_header(data: &[u8]) -> WmfResult<MetaHeader> {
    let mut cursor = Cursor::new(data);
    let header = MetaHeader {
        file_type: cursor.read_u16::<LittleEndian>()?,
        header_words: cursor.read_u16::<LittleEndian>()?,
        version: cursor.read_u16::<LittleEndian>()?,
        file_size_words: cursor.read_u32::<LittleEndian>()?,
        object_count: cursor.read_u16::<LittleEndian>()?,
        max_record_words: cursor.read_u32::<LittleEndian>()?,
        member_count: cursor.read_u16::<LittleEndian>()?,
    };
    if !matches!(header.file_type, MEMORY_METAFILE | DISK_METAFILE) {
        return Err(WmfError::InvalidFormat(format!(
            "unknown metafile type {}",
            header.file_type
        )));
    }
    if (header.header_words as usize) * 2 < META_HEADER_SIZE {
        return Err(WmfError::InvalidFormat(format!(
            "header size of {} words is too small",
            header.header_words
        )));
    }
    Ok(header)
}

/// Parse the optional placeable header and the META_HEADER
pub fn parse_header(data: &[u8]) -> WmfResult<WmfHeader> {
    if !is_wmf_format(data) {
        return Err(WmfError::InvalidFormat("missing WMF signature".to_string()));
    }

    let mut offset = 0;
    let placeable = if u32::from_le_bytes([data[0], data[1], data[2], data[3]]) == PLACEABLE_KEY {
        if data.len() < PLACEABLE_HEADER_SIZE {
            return Err(WmfError::InvalidFormat("truncated placeable header".to_string()));
        }
        offset = PLACEABLE_HEADER_SIZE;
        Some(read_placeable(data)?)
    } else {
        None
    };

    if data.len() < offset + META_HEADER_SIZE {
        return Err(WmfError::InvalidFormat("truncated metafile header".to_string()));
    }
    let meta = read_meta_header(&data[offset..])?;
    let records_offset = offset + meta.header_words as usize * 2;

    let declared = meta.file_size_words as usize * 2;
    if declared != data.len() - offset {
        debug!(
            "metafile declares {} bytes, buffer holds {}",
            declared,
            data.len() - offset
        );
    }
    debug!(
        "WMF header: version 0x{:04X}, {} objects, placeable: {}",
        meta.version,
        meta.object_count,
        placeable.is_some()
    );

    Ok(WmfHeader {
        placeable,
        meta,
        records_offset,
    })
}

/// Parse WMF size from the placeable header, in pixels at `dpi`.
///
/// `None` for metafiles without a placeable header or with an empty box;
/// their size comes from the window set during playback.
pub fn parse_wmf_size(data: &[u8], dpi: f64) -> WmfResult<Option<(f64, f64)>> {
    Ok(placeable_size(&parse_header(data)?, dpi))
}

/// Pixel size of an already parsed header, see [`parse_wmf_size`]
pub fn placeable_size(header: &WmfHeader, dpi: f64) -> Option<(f64, f64)> {
    let placeable = header.placeable?;

    let bounds = placeable.bounds;
    let width_logical = (bounds.right as f64 - bounds.left as f64).abs();
    let height_logical = (bounds.bottom as f64 - bounds.top as f64).abs();
    if width_logical == 0.0 || height_logical == 0.0 {
        return None;
    }

    if placeable.units_per_inch > 0 {
        // 1 logical unit = dpi / units_per_inch pixels
        let logical_to_px = dpi / placeable.units_per_inch as f64;
        let width_px = width_logical * logical_to_px;
        let height_px = height_logical * logical_to_px;
        debug!(
            "placeable bounds {}x{} logical units at {} units/inch: {:.2}x{:.2} px",
            width_logical, height_logical, placeable.units_per_inch, width_px, height_px
        );
        Some((width_px.max(1.0), height_px.max(1.0)))
    } else {
        debug!(
            "placeable bounds {}x{} logical units, no units/inch, using as pixels",
            width_logical, height_logical
        );
        Some((width_logical, height_logical))
    }
}

/// Normalize dimension value
pub(crate) fn normalize_dimension(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 && value < 20000.0 {
        value.ceil() as u32
    } else {
        800
    }
}

/// Convert WMF data to SVG string
pub fn convert_wmf_to_svg(data: &[u8]) -> WmfResult<String> {
    convert_wmf_to_svg_with(data, &PlaybackOptions::default())
}

pub fn convert_wmf_to_svg_with(data: &[u8], options: &PlaybackOptions) -> WmfResult<String> {
    let header = parse_header(data)?;
    let size = placeable_size(&header, options.dpi)
        .map(|(w, h)| (normalize_dimension(w), normalize_dimension(h)));

    let mut graphics = SvgGraphics::new();
    let player = Player::new(options.clone());
    let summary = player.play_parsed(data, &header, &mut graphics, |_| true)?;
    info!(
        "WMF converted: {} records, {} SVG elements",
        summary.played,
        graphics.element_count()
    );
    Ok(graphics.finish(size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{metafile, record, words};

    fn placeable(bounds: [i16; 4], units_per_inch: u16) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&PLACEABLE_KEY.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend(words(&bounds));
        out.extend_from_slice(&units_per_inch.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        let checksum = out
            .chunks_exact(2)
            .fold(0u16, |acc, w| acc ^ u16::from_le_bytes([w[0], w[1]]));
        out.extend_from_slice(&checksum.to_le_bytes());
        out
    }

    #[test]
    fn test_format_detection() {
        assert!(is_wmf_format(&metafile(&[])));
        assert!(is_wmf_format(&placeable([0, 0, 10, 10], 1440)));
        assert!(!is_wmf_format(b"GIF89a"));
        assert!(!is_wmf_format(&[1, 0]));
    }

    #[test]
    fn test_standard_header() {
        let data = metafile(&[record(0x0214, &words(&[0, 0]))]);
        let header = parse_header(&data).unwrap();
        assert!(header.placeable.is_none());
        assert_eq!(header.records_offset, META_HEADER_SIZE);
        assert_eq!(header.meta.version, 0x0300);
        assert_eq!(header.meta.file_size_words as usize * 2, data.len());
        assert_eq!(parse_wmf_size(&data, 96.0).unwrap(), None);
    }

    #[test]
    fn test_placeable_header_and_size() {
        let mut data = placeable([0, 0, 1440, 720], 1440);
        data.extend(metafile(&[]));
        let header = parse_header(&data).unwrap();
        let placeable = header.placeable.unwrap();
        assert_eq!(placeable.bounds, RawRect::new(0, 0, 1440, 720));
        assert_eq!(header.records_offset, PLACEABLE_HEADER_SIZE + META_HEADER_SIZE);
        assert_eq!(parse_wmf_size(&data, 96.0).unwrap(), Some((96.0, 48.0)));
        assert_eq!(placeable_size(&header, 96.0), Some((96.0, 48.0)));
    }

    #[test]
    fn test_placeable_bounds_are_left_top_right_bottom() {
        let mut data = placeable([-10, 5, 90, 55], 0);
        data.extend(metafile(&[]));
        let header = parse_header(&data).unwrap();
        let bounds = header.placeable.unwrap().bounds;
        assert_eq!(bounds, RawRect::new(-10, 5, 90, 55));
        assert_eq!(placeable_size(&header, 96.0), Some((100.0, 50.0)));
    }

    #[test]
    fn test_placeable_size_drives_svg_dimensions() {
        let mut data = placeable([0, 0, 2880, 1440], 1440);
        data.extend(metafile(&[record(0x020C, &words(&[100, 200]))]));
        let svg = convert_wmf_to_svg(&data).unwrap();
        assert!(svg.contains("width=\"192\""));
        assert!(svg.contains("height=\"96\""));
        assert!(svg.contains("viewBox=\"0 0 200 100\""));
    }

    #[test]
    fn test_truncated_header() {
        let data = metafile(&[]);
        assert!(matches!(
            parse_header(&data[..10]),
            Err(WmfError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_normalize_dimension() {
        assert_eq!(normalize_dimension(10.2), 11);
        assert_eq!(normalize_dimension(0.0), 800);
        assert_eq!(normalize_dimension(f64::NAN), 800);
    }

    #[test]
    fn test_convert_draws_shapes() {
        let mut pen = words(&[0, 2, 0]);
        pen.extend_from_slice(&[0, 0, 255, 0]);
        let mut brush = words(&[0]);
        brush.extend_from_slice(&[0, 128, 0, 0]);
        brush.extend(words(&[0]));

        let data = metafile(&[
            record(0x020B, &words(&[0, 0])),
            record(0x020C, &words(&[100, 200])),
            record(0x02FA, &pen),
            record(0x02FC, &brush),
            record(0x012D, &words(&[0])),
            record(0x012D, &words(&[1])),
            record(0x041B, &words(&[51, 51, 10, 10])),
            record(0x0214, &words(&[0, 0])),
            record(0x0213, &words(&[90, 190])),
        ]);

        let svg = convert_wmf_to_svg(&data).unwrap();
        assert!(svg.contains("viewBox=\"0 0 200 100\""));
        assert!(svg.contains("fill=\"#008000\""));
        assert!(svg.contains("stroke=\"#0000ff\""));
        assert!(svg.contains("M 10 10 L 50 10 L 50 50 L 10 50 Z"));
    }

    #[test]
    fn test_convert_rejects_garbage() {
        assert!(matches!(
            convert_wmf_to_svg(b"not a metafile"),
            Err(WmfError::InvalidFormat(_))
        ));
    }
}
