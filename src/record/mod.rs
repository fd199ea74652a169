//! WMF records: function codes, the record sum type and dispatch
//!
//! Each record kind owns exactly the fields of its wire form. Decoding
//! reports the byte count the layout accounts for, which the player checks
//! against the size declared in the record header.

mod draw;
mod state;
mod table;

pub use draw::{
    ArcRecord, Ellipse, FrameRegion, LineTo, MoveTo, PointList, PolyPolygon, RoundRect, Rectangle,
    SetPixel,
};
pub use state::{SetPolyFillMode, SetWindowExt, SetWindowOrg};
pub use table::{CreateBrushIndirect, CreatePenIndirect, CreateRegion, DeleteObject, Scan, SelectObject};

use log::{debug, warn};

use crate::context::PlaybackContext;
use crate::cursor::{RecordCursor, RecordWriter};
use crate::error::WmfResult;
use crate::geometry::ArcClosure;
use crate::shape::FillDrawStyle;

macro_rules! record_types {
    ($($name:ident = $code:literal,)*) => {
        /// Record kinds by their META_* function code
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum RecordType {
            $($name,)*
        }

        impl RecordType {
            pub fn from_function(function: u16) -> Option<Self> {
                match function {
                    $($code => Some(RecordType::$name),)*
                    _ => None,
                }
            }

            pub fn function(self) -> u16 {
                match self {
                    $(RecordType::$name => $code,)*
                }
            }
        }
    };
}

record_types! {
    Eof = 0x0000,
    RealizePalette = 0x0035,
    SetPalEntries = 0x0037,
    SetBkMode = 0x0102,
    SetMapMode = 0x0103,
    SetRop2 = 0x0104,
    SetRelabs = 0x0105,
    SetPolyFillMode = 0x0106,
    SetStretchBltMode = 0x0107,
    SetTextCharExtra = 0x0108,
    RestoreDc = 0x0127,
    InvertRegion = 0x012A,
    PaintRegion = 0x012B,
    SelectClipRegion = 0x012C,
    SelectObject = 0x012D,
    SetTextAlign = 0x012E,
    ResizePalette = 0x0139,
    DibCreatePatternBrush = 0x0142,
    SetLayout = 0x0149,
    DeleteObject = 0x01F0,
    CreatePatternBrush = 0x01F9,
    SetBkColor = 0x0201,
    SetTextColor = 0x0209,
    SetTextJustification = 0x020A,
    SetWindowOrg = 0x020B,
    SetWindowExt = 0x020C,
    SetViewportOrg = 0x020D,
    SetViewportExt = 0x020E,
    OffsetWindowOrg = 0x020F,
    OffsetViewportOrg = 0x0211,
    LineTo = 0x0213,
    MoveTo = 0x0214,
    OffsetClipRgn = 0x0220,
    FillRegion = 0x0228,
    SetMapperFlags = 0x0231,
    SelectPalette = 0x0234,
    CreatePenIndirect = 0x02FA,
    CreateFontIndirect = 0x02FB,
    CreateBrushIndirect = 0x02FC,
    Polygon = 0x0324,
    Polyline = 0x0325,
    ScaleWindowExt = 0x0410,
    ScaleViewportExt = 0x0412,
    ExcludeClipRect = 0x0415,
    IntersectClipRect = 0x0416,
    Ellipse = 0x0418,
    FloodFill = 0x0419,
    Rectangle = 0x041B,
    SetPixel = 0x041F,
    FrameRegion = 0x0429,
    AnimatePalette = 0x0436,
    TextOut = 0x0521,
    PolyPolygon = 0x0538,
    ExtFloodFill = 0x0548,
    RoundRect = 0x061C,
    PatBlt = 0x061D,
    Escape = 0x0626,
    CreateRegion = 0x06FF,
    Arc = 0x0817,
    Pie = 0x081A,
    Chord = 0x0830,
    BitBlt = 0x0922,
    DibBitBlt = 0x0940,
    ExtTextOut = 0x0A32,
    StretchBlt = 0x0B23,
    DibStretchBlt = 0x0B41,
    SetDibToDev = 0x0D33,
    StretchDib = 0x0F43,
    SaveDc = 0x001E,
    CreatePalette = 0x00F7,
}

impl RecordType {
    /// Surface operations a drawing kind performs; `None` for kinds that
    /// do not paint
    pub fn fill_draw_style(self) -> Option<FillDrawStyle> {
        match self {
            RecordType::Polyline | RecordType::Arc | RecordType::LineTo => Some(FillDrawStyle::Draw),
            RecordType::Polygon
            | RecordType::Ellipse
            | RecordType::Rectangle
            | RecordType::RoundRect
            | RecordType::FrameRegion
            | RecordType::SetPixel => Some(FillDrawStyle::Fill),
            RecordType::PolyPolygon | RecordType::Pie | RecordType::Chord => {
                Some(FillDrawStyle::FillDraw)
            }
            _ => None,
        }
    }

    pub fn arc_closure(self) -> Option<ArcClosure> {
        match self {
            RecordType::Arc => Some(ArcClosure::Open),
            RecordType::Chord => Some(ArcClosure::Chord),
            RecordType::Pie => Some(ArcClosure::Pie),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Eof,
    MoveTo(MoveTo),
    LineTo(LineTo),
    Polygon(PointList),
    Polyline(PointList),
    PolyPolygon(PolyPolygon),
    Ellipse(Ellipse),
    Rectangle(Rectangle),
    RoundRect(RoundRect),
    Arc(ArcRecord),
    Pie(ArcRecord),
    Chord(ArcRecord),
    FrameRegion(FrameRegion),
    SetPixel(SetPixel),
    SelectObject(SelectObject),
    DeleteObject(DeleteObject),
    SetPolyFillMode(SetPolyFillMode),
    SetWindowOrg(SetWindowOrg),
    SetWindowExt(SetWindowExt),
    CreatePenIndirect(CreatePenIndirect),
    CreateBrushIndirect(CreateBrushIndirect),
    CreateRegion(CreateRegion),
    /// Known or unknown function this player does not interpret; the body
    /// is skipped
    Unsupported { function: u16, len: usize },
}

impl Record {
    /// Decode one record body.
    ///
    /// `offset` is the stream position of `body`, used in error reports.
    /// Returns the record and the number of bytes its layout accounts for.
    pub fn decode(function: u16, body: &[u8], offset: usize) -> WmfResult<(Record, usize)> {
        let Some(record_type) = RecordType::from_function(function) else {
            warn!("unknown record function 0x{:04X} at offset {}", function, offset);
            return Ok((
                Record::Unsupported {
                    function,
                    len: body.len(),
                },
                body.len(),
            ));
        };

        let mut cursor = RecordCursor::new(body, record_type, offset);
        let c = &mut cursor;
        let decoded = match record_type {
            RecordType::Eof => (Record::Eof, 0),
            RecordType::MoveTo => wrap(MoveTo::decode(c)?, Record::MoveTo),
            RecordType::LineTo => wrap(LineTo::decode(c)?, Record::LineTo),
            RecordType::Polygon => wrap(PointList::decode(c)?, Record::Polygon),
            RecordType::Polyline => wrap(PointList::decode(c)?, Record::Polyline),
            RecordType::PolyPolygon => wrap(PolyPolygon::decode(c)?, Record::PolyPolygon),
            RecordType::Ellipse => wrap(Ellipse::decode(c)?, Record::Ellipse),
            RecordType::Rectangle => wrap(Rectangle::decode(c)?, Record::Rectangle),
            RecordType::RoundRect => wrap(RoundRect::decode(c)?, Record::RoundRect),
            RecordType::Arc => wrap(ArcRecord::decode(c)?, Record::Arc),
            RecordType::Pie => wrap(ArcRecord::decode(c)?, Record::Pie),
            RecordType::Chord => wrap(ArcRecord::decode(c)?, Record::Chord),
            RecordType::FrameRegion => wrap(FrameRegion::decode(c)?, Record::FrameRegion),
            RecordType::SetPixel => wrap(SetPixel::decode(c)?, Record::SetPixel),
            RecordType::SelectObject => wrap(SelectObject::decode(c)?, Record::SelectObject),
            RecordType::DeleteObject => wrap(DeleteObject::decode(c)?, Record::DeleteObject),
            RecordType::SetPolyFillMode => {
                wrap(SetPolyFillMode::decode(c)?, Record::SetPolyFillMode)
            }
            RecordType::SetWindowOrg => wrap(SetWindowOrg::decode(c)?, Record::SetWindowOrg),
            RecordType::SetWindowExt => wrap(SetWindowExt::decode(c)?, Record::SetWindowExt),
            RecordType::CreatePenIndirect => {
                wrap(CreatePenIndirect::decode(c)?, Record::CreatePenIndirect)
            }
            RecordType::CreateBrushIndirect => {
                wrap(CreateBrushIndirect::decode(c)?, Record::CreateBrushIndirect)
            }
            RecordType::CreateRegion => wrap(CreateRegion::decode(c)?, Record::CreateRegion),
            other => {
                debug!("skipping unsupported {:?} record at offset {}", other, offset);
                (
                    Record::Unsupported {
                        function,
                        len: body.len(),
                    },
                    body.len(),
                )
            }
        };
        Ok(decoded)
    }

    /// Wire identity of the record
    pub fn record_type(&self) -> Option<RecordType> {
        let record_type = match self {
            Record::Eof => RecordType::Eof,
            Record::MoveTo(_) => RecordType::MoveTo,
            Record::LineTo(_) => RecordType::LineTo,
            Record::Polygon(_) => RecordType::Polygon,
            Record::Polyline(_) => RecordType::Polyline,
            Record::PolyPolygon(_) => RecordType::PolyPolygon,
            Record::Ellipse(_) => RecordType::Ellipse,
            Record::Rectangle(_) => RecordType::Rectangle,
            Record::RoundRect(_) => RecordType::RoundRect,
            Record::Arc(_) => RecordType::Arc,
            Record::Pie(_) => RecordType::Pie,
            Record::Chord(_) => RecordType::Chord,
            Record::FrameRegion(_) => RecordType::FrameRegion,
            Record::SetPixel(_) => RecordType::SetPixel,
            Record::SelectObject(_) => RecordType::SelectObject,
            Record::DeleteObject(_) => RecordType::DeleteObject,
            Record::SetPolyFillMode(_) => RecordType::SetPolyFillMode,
            Record::SetWindowOrg(_) => RecordType::SetWindowOrg,
            Record::SetWindowExt(_) => RecordType::SetWindowExt,
            Record::CreatePenIndirect(_) => RecordType::CreatePenIndirect,
            Record::CreateBrushIndirect(_) => RecordType::CreateBrushIndirect,
            Record::CreateRegion(_) => RecordType::CreateRegion,
            Record::Unsupported { function, .. } => return RecordType::from_function(*function),
        };
        Some(record_type)
    }

    /// Write the record body back in wire order.
    ///
    /// Unsupported records keep no body and encode to nothing.
    pub fn encode(&self) -> WmfResult<Vec<u8>> {
        let mut writer = RecordWriter::new();
        let w = &mut writer;
        let written = match self {
            Record::Eof | Record::Unsupported { .. } => 0,
            Record::MoveTo(r) => r.encode(w)?,
            Record::LineTo(r) => r.encode(w)?,
            Record::Polygon(r) | Record::Polyline(r) => r.encode(w)?,
            Record::PolyPolygon(r) => r.encode(w)?,
            Record::Ellipse(r) => r.encode(w)?,
            Record::Rectangle(r) => r.encode(w)?,
            Record::RoundRect(r) => r.encode(w)?,
            Record::Arc(r) | Record::Pie(r) | Record::Chord(r) => r.encode(w)?,
            Record::FrameRegion(r) => r.encode(w)?,
            Record::SetPixel(r) => r.encode(w)?,
            Record::SelectObject(r) => r.encode(w)?,
            Record::DeleteObject(r) => r.encode(w)?,
            Record::SetPolyFillMode(r) => r.encode(w)?,
            Record::SetWindowOrg(r) => r.encode(w)?,
            Record::SetWindowExt(r) => r.encode(w)?,
            Record::CreatePenIndirect(r) => r.encode(w)?,
            Record::CreateBrushIndirect(r) => r.encode(w)?,
            Record::CreateRegion(r) => r.encode(w)?,
        };
        debug_assert_eq!(written, writer.len());
        Ok(writer.into_bytes())
    }

    /// Replay the record against `ctx`
    /// Replay the record against `ctx`.
    ///
    /// Painting records take their fill/draw policy and arc closure from
    /// [`RecordType::fill_draw_style`] and [`RecordType::arc_closure`].
    pub fn apply(&self, ctx: &mut dyn PlaybackContext) {
        let kind = self.record_type();
        let style = kind.and_then(RecordType::fill_draw_style);
        match (self, style) {
            (Record::LineTo(r), Some(style)) => r.apply(ctx, style),
            (Record::Polygon(r), Some(style)) => r.apply(ctx, true, style),
            (Record::Polyline(r), Some(style)) => r.apply(ctx, false, style),
            (Record::PolyPolygon(r), Some(style)) => r.apply(ctx, style),
            (Record::Ellipse(r), Some(style)) => r.apply(ctx, style),
            (Record::Rectangle(r), Some(style)) => r.apply(ctx, style),
            (Record::RoundRect(r), Some(style)) => r.apply(ctx, style),
            (Record::Arc(r) | Record::Pie(r) | Record::Chord(r), Some(style)) => {
                if let Some(closure) = kind.and_then(RecordType::arc_closure) {
                    r.apply(ctx, closure, style);
                }
            }
            (Record::FrameRegion(r), Some(style)) => r.apply(ctx, style),
            (Record::SetPixel(r), Some(style)) => r.apply(ctx, style),
            (Record::MoveTo(r), _) => r.apply(ctx),
            (Record::SelectObject(r), _) => r.apply(ctx),
            (Record::DeleteObject(r), _) => r.apply(ctx),
            (Record::SetPolyFillMode(r), _) => r.apply(ctx),
            (Record::SetWindowOrg(r), _) => r.apply(ctx),
            (Record::SetWindowExt(r), _) => r.apply(ctx),
            (Record::CreatePenIndirect(r), _) => r.apply(ctx),
            (Record::CreateBrushIndirect(r), _) => r.apply(ctx),
            (Record::CreateRegion(r), _) => r.apply(ctx),
            _ => {}
        }
    }
}

fn wrap<T>((record, size): (T, usize), variant: fn(T) -> Record) -> (Record, usize) {
    (variant(record), size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WmfError;
    use crate::shape::Shape;
    use crate::testing::{words, Call, RecordingContext};

    #[test]
    fn test_function_codes_round_trip() {
        for code in [0x0000u16, 0x0213, 0x0214, 0x0324, 0x0538, 0x041B, 0x0429, 0x0817, 0x081A, 0x0830] {
            let kind = RecordType::from_function(code).unwrap();
            assert_eq!(kind.function(), code);
        }
        assert_eq!(RecordType::from_function(0x0999), None);
    }

    #[test]
    fn test_rectangle_keeps_its_own_identity() {
        let body = words(&[10, 10, 0, 0]);
        let (record, _) = Record::decode(0x041B, &body, 0).unwrap();
        assert_eq!(record.record_type(), Some(RecordType::Rectangle));
        assert_ne!(record.record_type(), Some(RecordType::FrameRegion));
    }

    #[test]
    fn test_policies_are_per_kind() {
        assert_eq!(RecordType::Polygon.fill_draw_style(), Some(FillDrawStyle::Fill));
        assert_eq!(RecordType::Polyline.fill_draw_style(), Some(FillDrawStyle::Draw));
        assert_eq!(RecordType::Arc.fill_draw_style(), Some(FillDrawStyle::Draw));
        assert_eq!(RecordType::Chord.fill_draw_style(), Some(FillDrawStyle::FillDraw));
        assert_eq!(RecordType::Pie.fill_draw_style(), Some(FillDrawStyle::FillDraw));
        assert_eq!(RecordType::PolyPolygon.fill_draw_style(), Some(FillDrawStyle::FillDraw));
        assert_eq!(RecordType::Ellipse.fill_draw_style(), Some(FillDrawStyle::Fill));
        assert_eq!(RecordType::SelectObject.fill_draw_style(), None);
        assert_eq!(RecordType::Pie.arc_closure(), Some(ArcClosure::Pie));
    }

    #[test]
    fn test_unknown_function_skips_body() {
        let body = [1u8, 2, 3, 4];
        let (record, consumed) = Record::decode(0x7777, &body, 0).unwrap();
        assert_eq!(record, Record::Unsupported { function: 0x7777, len: 4 });
        assert_eq!(consumed, 4);
        assert_eq!(record.record_type(), None);

        let (text, _) = Record::decode(0x0521, &body, 0).unwrap();
        assert_eq!(text.record_type(), Some(RecordType::TextOut));
    }

    #[test]
    fn test_truncated_body_fails_without_value() {
        let body = words(&[1]);
        match Record::decode(0x0214, &body, 40) {
            Err(WmfError::Truncated { record, offset, .. }) => {
                assert_eq!(record, RecordType::MoveTo);
                assert_eq!(offset, 42);
            }
            other => panic!("expected truncation, got {:?}", other),
        }
    }

    #[test]
    fn test_encode_reproduces_body() {
        let bodies: [(u16, Vec<u8>); 6] = [
            (0x0214, words(&[-3, 7])),
            (0x0324, words(&[2, 1, 2, 3, 4])),
            (0x0538, words(&[2, 1, 2, 5, 6, 7, 8, 9, 10])),
            (0x061C, words(&[4, 6, 40, 30, 0, -5])),
            (0x0830, words(&[0, 10, 5, 0, 20, 20, -20, -20])),
            (0x0429, words(&[1, 2, 3, 4])),
        ];
        for (function, body) in bodies {
            let (record, consumed) = Record::decode(function, &body, 0).unwrap();
            assert_eq!(consumed, body.len());
            assert_eq!(record.encode().unwrap(), body);
        }
    }

    #[test]
    fn test_apply_follows_policy_table() {
        let square = [0, 0, 4, 0, 4, 4];
        let mut polygon = vec![3];
        polygon.extend_from_slice(&square);
        let mut poly_polygon = vec![1, 3];
        poly_polygon.extend_from_slice(&square);
        let arc = [0, 10, 5, 0, 20, 20, -20, -20];

        let cases: [(u16, Vec<u8>); 10] = [
            (0x0213, words(&[5, 5])),
            (0x0324, words(&polygon)),
            (0x0325, words(&polygon)),
            (0x0538, words(&poly_polygon)),
            (0x0418, words(&[10, 10, 0, 0])),
            (0x041B, words(&[10, 10, 0, 0])),
            (0x061C, words(&[4, 6, 40, 30, 0, -5])),
            (0x0817, words(&arc)),
            (0x081A, words(&arc)),
            (0x0830, words(&arc)),
        ];
        for (function, body) in cases {
            let (record, _) = Record::decode(function, &body, 0).unwrap();
            let style = record
                .record_type()
                .and_then(RecordType::fill_draw_style)
                .unwrap();
            let mut ctx = RecordingContext::new();
            record.apply(&mut ctx);

            let painted: Vec<&str> = ctx
                .surface_calls()
                .iter()
                .map(|c| match c {
                    Call::Fill(_) => "fill",
                    Call::Draw(_) => "draw",
                    _ => "other",
                })
                .collect();
            let mut expected = Vec::new();
            if style.fills() {
                expected.push("fill");
            }
            if style.draws() {
                expected.push("draw");
            }
            assert_eq!(painted, expected, "function 0x{:04X}", function);
        }
    }

    #[test]
    fn test_apply_takes_closure_from_kind() {
        let body = words(&[0, 10, 5, 0, 20, 20, -20, -20]);
        for (function, closure) in [
            (0x0817, ArcClosure::Open),
            (0x081A, ArcClosure::Pie),
            (0x0830, ArcClosure::Chord),
        ] {
            let (record, _) = Record::decode(function, &body, 0).unwrap();
            let mut ctx = RecordingContext::new();
            record.apply(&mut ctx);
            match ctx.surface_calls()[0] {
                Call::Fill(Shape::Arc { closure: c, .. })
                | Call::Draw(Shape::Arc { closure: c, .. }) => assert_eq!(*c, closure),
                other => panic!("unexpected call {:?}", other),
            }
        }
    }

    #[test]
    fn test_set_pixel_reserved_byte_round_trips() {
        let body = vec![0x11u8, 0x22, 0x33, 0x7F, 5, 0, 7, 0];
        let (record, consumed) = Record::decode(0x041F, &body, 0).unwrap();
        assert_eq!(consumed, body.len());
        assert_eq!(record.encode().unwrap(), body);
    }
}
