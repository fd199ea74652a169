//! SVG playback context: owns the object table and the selected objects and
//! turns fills and strokes into SVG paths

use log::{debug, warn};

use crate::context::PlaybackContext;
use crate::object::{Brush, GdiObject, Pen, Region};
use crate::shape::Shape;
use crate::svg_writer::{Paint, SvgWriter};
use crate::types::{BoundingBox, ColorRef, Point, WindingRule};
use crate::wmf::normalize_dimension;

pub struct SvgGraphics {
    writer: SvgWriter,
    objects: Vec<Option<GdiObject>>,
    pen: Pen,
    brush: Brush,
    clip: Option<Region>,
    location: Point,
    winding: WindingRule,
    window_origin: Point,
    window_extent: Option<(f64, f64)>,
}

impl Default for SvgGraphics {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgGraphics {
    pub fn new() -> Self {
        Self {
            writer: SvgWriter::new(),
            objects: Vec::new(),
            pen: Pen::default(),
            brush: Brush::default(),
            clip: None,
            location: Point::default(),
            winding: WindingRule::EvenOdd,
            window_origin: Point::default(),
            window_extent: None,
        }
    }

    pub fn pen(&self) -> &Pen {
        &self.pen
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn object(&self, index: u16) -> Option<&GdiObject> {
        self.objects.get(index as usize)?.as_ref()
    }

    /// Elements written so far
    pub fn element_count(&self) -> usize {
        self.writer.len()
    }

    /// Logical window, with negative extents folded into a positive box
    pub fn window(&self) -> Option<BoundingBox> {
        let (width, height) = self.window_extent?;
        let origin = self.window_origin;
        Some(BoundingBox::new(
            origin.x.min(origin.x + width),
            origin.y.min(origin.y + height),
            width.abs(),
            height.abs(),
        ))
    }

    fn paint(&mut self, shape: &Shape, paint: Paint) {
        if shape.is_empty() {
            return;
        }
        let path = shape.to_path();
        if path.is_empty() {
            return;
        }
        self.writer.add_path(&path.to_svg_data(), path.bounds(), &paint);
    }

    /// Render the document.
    ///
    /// The viewBox is the logical window when one was set, otherwise the
    /// content bounds. `size` overrides the pixel size taken from the viewBox.
    pub fn finish(self, size: Option<(u32, u32)>) -> String {
        let view_box = self
            .window()
            .filter(|w| !w.is_empty())
            .or_else(|| self.writer.content_bounds())
            .unwrap_or_else(|| BoundingBox::new(0.0, 0.0, 1.0, 1.0));
        let (width, height) = size.unwrap_or_else(|| {
            (
                normalize_dimension(view_box.width),
                normalize_dimension(view_box.height),
            )
        });
        debug!(
            "SVG viewBox {:?}, {}x{} px, {} elements",
            view_box,
            width,
            height,
            self.writer.len()
        );
        self.writer.finish(view_box, width, height)
    }
}

impl PlaybackContext for SvgGraphics {
    fn location(&self) -> Point {
        self.location
    }

    fn set_location(&mut self, point: Point) {
        self.location = point;
    }

    fn winding_rule(&self) -> WindingRule {
        self.winding
    }

    fn set_winding_rule(&mut self, rule: WindingRule) {
        self.winding = rule;
    }

    fn region(&self) -> BoundingBox {
        match &self.clip {
            Some(region) => region.bounds,
            None => self.window().unwrap_or_default(),
        }
    }

    fn fill(&mut self, shape: &Shape) {
        if self.brush.is_null() {
            return;
        }
        let paint = Paint::fill(self.brush.color.to_hex(), shape.fill_rule().svg_fill_rule());
        self.paint(shape, paint);
    }

    fn draw(&mut self, shape: &Shape) {
        if self.pen.is_null() {
            return;
        }
        let paint = Paint::stroke(self.pen.color.to_hex(), self.pen.stroke_width());
        self.paint(shape, paint);
    }

    fn fill_with_color(&mut self, shape: &Shape, color: ColorRef) {
        match shape {
            Shape::Rect(bounds) => self.writer.add_rect(*bounds, &color.to_hex()),
            _ => {
                let paint = Paint::fill(color.to_hex(), shape.fill_rule().svg_fill_rule());
                self.paint(shape, paint);
            }
        }
    }

    fn apply_object_table_entry(&mut self, index: u16) {
        match self.object(index).cloned() {
            Some(GdiObject::Pen(pen)) => self.pen = pen,
            Some(GdiObject::Brush(brush)) => self.brush = brush,
            Some(GdiObject::Region(region)) => self.clip = Some(region),
            None => warn!("select of undefined object table entry {}", index),
        }
    }

    fn add_object_table_entry(&mut self, object: GdiObject) {
        match self.objects.iter().position(Option::is_none) {
            Some(slot) => {
                debug!("object table slot {} <- {:?}", slot, object);
                self.objects[slot] = Some(object);
            }
            None => {
                debug!("object table slot {} <- {:?}", self.objects.len(), object);
                self.objects.push(Some(object));
            }
        }
    }

    fn delete_object_table_entry(&mut self, index: u16) {
        match self.objects.get_mut(index as usize) {
            Some(slot) if slot.is_some() => *slot = None,
            _ => warn!("delete of undefined object table entry {}", index),
        }
    }

    fn set_window_origin(&mut self, origin: Point) {
        self.window_origin = origin;
    }

    fn set_window_extent(&mut self, width: f64, height: f64) {
        self.window_extent = Some((width, height));
    }
}
