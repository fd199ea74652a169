//! Test helpers: a context that records every call and byte builders

use crate::context::PlaybackContext;
use crate::object::GdiObject;
use crate::shape::Shape;
use crate::types::{BoundingBox, ColorRef, Point, WindingRule};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetLocation(Point),
    SetWindingRule(WindingRule),
    Fill(Shape),
    Draw(Shape),
    FillWithColor(Shape, ColorRef),
    ApplyObject(u16),
    AddObject(GdiObject),
    DeleteObject(u16),
    SetWindowOrigin(Point),
    SetWindowExtent(f64, f64),
}

pub struct RecordingContext {
    pub calls: Vec<Call>,
    pub location: Point,
    pub winding: WindingRule,
    pub region: BoundingBox,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            location: Point::default(),
            winding: WindingRule::EvenOdd,
            region: BoundingBox::default(),
        }
    }

    /// Only the surface-mutating calls
    pub fn surface_calls(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Fill(_) | Call::Draw(_) | Call::FillWithColor(..)))
            .collect()
    }
}

impl PlaybackContext for RecordingContext {
    fn location(&self) -> Point {
        self.location
    }

    fn set_location(&mut self, point: Point) {
        self.location = point;
        self.calls.push(Call::SetLocation(point));
    }

    fn winding_rule(&self) -> WindingRule {
        self.winding
    }

    fn set_winding_rule(&mut self, rule: WindingRule) {
        self.winding = rule;
        self.calls.push(Call::SetWindingRule(rule));
    }

    fn region(&self) -> BoundingBox {
        self.region
    }

    fn fill(&mut self, shape: &Shape) {
        self.calls.push(Call::Fill(shape.clone()));
    }

    fn draw(&mut self, shape: &Shape) {
        self.calls.push(Call::Draw(shape.clone()));
    }

    fn fill_with_color(&mut self, shape: &Shape, color: ColorRef) {
        self.calls.push(Call::FillWithColor(shape.clone(), color));
    }

    fn apply_object_table_entry(&mut self, index: u16) {
        self.calls.push(Call::ApplyObject(index));
    }

    fn add_object_table_entry(&mut self, object: GdiObject) {
        self.calls.push(Call::AddObject(object));
    }

    fn delete_object_table_entry(&mut self, index: u16) {
        self.calls.push(Call::DeleteObject(index));
    }

    fn set_window_origin(&mut self, origin: Point) {
        self.calls.push(Call::SetWindowOrigin(origin));
    }

    fn set_window_extent(&mut self, width: f64, height: f64) {
        self.calls.push(Call::SetWindowExtent(width, height));
    }
}

/// Little-endian bytes of a list of 16-bit words
pub fn words(values: &[i16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// One record: size in words, function, body
pub fn record(function: u16, body: &[u8]) -> Vec<u8> {
    let size_words = (6 + body.len() as u32 + 1) / 2;
    let mut out = Vec::new();
    out.extend_from_slice(&size_words.to_le_bytes());
    out.extend_from_slice(&function.to_le_bytes());
    out.extend_from_slice(body);
    if body.len() % 2 == 1 {
        out.push(0);
    }
    out
}

/// Standard 18-byte header followed by `records` and an EOF record
pub fn metafile(records: &[Vec<u8>]) -> Vec<u8> {
    let mut body: Vec<u8> = records.concat();
    body.extend(record(0x0000, &[]));
    let total_words = ((18 + body.len()) / 2) as u32;

    let mut out = Vec::new();
    out.extend_from_slice(&1u16.to_le_bytes()); // memory metafile
    out.extend_from_slice(&9u16.to_le_bytes()); // header size in words
    out.extend_from_slice(&0x0300u16.to_le_bytes());
    out.extend_from_slice(&total_words.to_le_bytes());
    out.extend_from_slice(&8u16.to_le_bytes()); // objects
    out.extend_from_slice(&0u32.to_le_bytes()); // max record
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend(body);
    out
}
