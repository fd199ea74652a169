//! SVG writer for generating SVG output

use svg::node::element::{Element, Path, Rectangle};
use svg::Document;

use crate::path::fmt_num;
use crate::types::BoundingBox;

/// How a path element is painted
#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    pub fill: Option<String>,
    pub fill_rule: &'static str,
    pub stroke: Option<String>,
    pub stroke_width: f64,
}

impl Paint {
    pub fn fill(color: String, fill_rule: &'static str) -> Self {
        Self {
            fill: Some(color),
            fill_rule,
            stroke: None,
            stroke_width: 0.0,
        }
    }

    pub fn stroke(color: String, width: f64) -> Self {
        Self {
            fill: None,
            fill_rule: "nonzero",
            stroke: Some(color),
            stroke_width: width,
        }
    }
}

/// SVG writer for building SVG documents
#[derive(Default)]
pub struct SvgWriter {
    elements: Vec<Element>,
    bounds: Option<BoundingBox>,
}

impl SvgWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Union of everything added so far
    pub fn content_bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }

    fn update_bounds(&mut self, bounds: BoundingBox) {
        self.bounds = Some(match self.bounds {
            Some(current) => current.union(&bounds),
            None => bounds,
        });
    }

    /// Add a filled rectangle
    pub fn add_rect(&mut self, bounds: BoundingBox, fill: &str) {
        self.update_bounds(bounds);
        let rect = Rectangle::new()
            .set("x", fmt_num(bounds.x))
            .set("y", fmt_num(bounds.y))
            .set("width", fmt_num(bounds.width))
            .set("height", fmt_num(bounds.height))
            .set("fill", fill);
        self.elements.push(rect.into());
    }

    /// Add a path to the SVG; `bounds` feeds the automatic viewBox
    pub fn add_path(&mut self, path_data: &str, bounds: Option<BoundingBox>, paint: &Paint) {
        if let Some(bounds) = bounds {
            let grow = paint.stroke.as_ref().map_or(0.0, |_| paint.stroke_width / 2.0);
            self.update_bounds(bounds.expand(grow, grow));
        }

        let mut path = Path::new().set("d", path_data);
        path = match &paint.fill {
            Some(color) => path
                .set("fill", color.as_str())
                .set("fill-rule", paint.fill_rule),
            None => path.set("fill", "none"),
        };
        if let Some(color) = &paint.stroke {
            path = path
                .set("stroke", color.as_str())
                .set("stroke-width", fmt_num(paint.stroke_width));
        }
        self.elements.push(path.into());
    }

    /// Finish and generate SVG string
    pub fn finish(self, view_box: BoundingBox, width: u32, height: u32) -> String {
        let mut document = Document::new()
            .set("width", width)
            .set("height", height)
            .set(
                "viewBox",
                format!(
                    "{} {} {} {}",
                    fmt_num(view_box.x),
                    fmt_num(view_box.y),
                    fmt_num(view_box.width),
                    fmt_num(view_box.height)
                ),
            )
            .set("preserveAspectRatio", "none");

        for element in self.elements {
            document = document.add(element);
        }

        document.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        let svg = SvgWriter::new().finish(BoundingBox::new(0.0, 0.0, 10.0, 5.0), 10, 5);
        assert!(svg.contains("viewBox=\"0 0 10 5\""));
        assert!(!svg.contains("<path"));
    }

    #[test]
    fn test_path_paint_and_bounds() {
        let mut writer = SvgWriter::new();
        writer.add_path(
            "M 0 0 L 10 0 L 10 10 Z",
            Some(BoundingBox::new(0.0, 0.0, 10.0, 10.0)),
            &Paint::stroke("#ff0000".to_string(), 2.0),
        );
        assert_eq!(
            writer.content_bounds(),
            Some(BoundingBox::new(-1.0, -1.0, 12.0, 12.0))
        );
        let svg = writer.finish(BoundingBox::new(0.0, 0.0, 10.0, 10.0), 10, 10);
        assert!(svg.contains("stroke=\"#ff0000\""));
        assert!(svg.contains("fill=\"none\""));
        assert!(svg.contains("stroke-width=\"2\""));
    }

    #[test]
    fn test_filled_path_carries_rule() {
        let mut writer = SvgWriter::new();
        writer.add_path(
            "M 0 0 L 1 0 L 1 1 Z",
            None,
            &Paint::fill("#000000".to_string(), "evenodd"),
        );
        assert_eq!(writer.content_bounds(), None);
        assert_eq!(writer.len(), 1);
        let svg = writer.finish(BoundingBox::new(0.0, 0.0, 1.0, 1.0), 1, 1);
        assert!(svg.contains("fill-rule=\"evenodd\""));
    }
}
