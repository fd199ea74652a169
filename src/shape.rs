//! Shapes handed to the playback context and the fill/draw policy

use crate::area::Area;
use crate::context::PlaybackContext;
use crate::geometry::{ArcAngles, ArcClosure};
use crate::path::Path;
use crate::types::{BoundingBox, Point, WindingRule};

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line(Point, Point),
    Rect(BoundingBox),
    Ellipse(BoundingBox),
    RoundRect {
        bounds: BoundingBox,
        arc_width: f64,
        arc_height: f64,
    },
    Arc {
        bounds: BoundingBox,
        angles: ArcAngles,
        closure: ArcClosure,
    },
    Path {
        path: Path,
        rule: WindingRule,
    },
    Area(Area),
}

impl Shape {
    pub fn to_path(&self) -> Path {
        match self {
            Shape::Line(from, to) => Path::line(*from, *to),
            Shape::Rect(bounds) => Path::rect(bounds),
            Shape::Ellipse(bounds) => Path::ellipse(bounds),
            Shape::RoundRect {
                bounds,
                arc_width,
                arc_height,
            } => Path::round_rect(bounds, *arc_width, *arc_height),
            Shape::Arc {
                bounds,
                angles,
                closure,
            } => Path::arc(bounds, *angles, *closure),
            Shape::Path { path, .. } => path.clone(),
            Shape::Area(area) => area.to_path(),
        }
    }

    /// Fill rule to use for [`Shape::to_path`]
    pub fn fill_rule(&self) -> WindingRule {
        match self {
            Shape::Path { rule, .. } => *rule,
            _ => WindingRule::EvenOdd,
        }
    }

    /// True when there is nothing to paint at all
    pub fn is_empty(&self) -> bool {
        match self {
            Shape::Path { path, .. } => path.is_empty(),
            Shape::Area(area) => area.is_empty(),
            _ => false,
        }
    }
}

/// Which surface operations a record performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillDrawStyle {
    Fill,
    Draw,
    FillDraw,
}

impl FillDrawStyle {
    pub fn fills(self) -> bool {
        matches!(self, FillDrawStyle::Fill | FillDrawStyle::FillDraw)
    }

    pub fn draws(self) -> bool {
        matches!(self, FillDrawStyle::Draw | FillDrawStyle::FillDraw)
    }

    /// Fill before stroke so the outline is not painted over
    pub fn render(self, ctx: &mut dyn PlaybackContext, shape: &Shape) {
        if self.fills() {
            ctx.fill(shape);
        }
        if self.draws() {
            ctx.draw(shape);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, RecordingContext};

    #[test]
    fn test_fill_precedes_draw() {
        let mut ctx = RecordingContext::new();
        let shape = Shape::Rect(BoundingBox::new(0.0, 0.0, 1.0, 1.0));
        FillDrawStyle::FillDraw.render(&mut ctx, &shape);
        assert_eq!(ctx.calls, vec![Call::Fill(shape.clone()), Call::Draw(shape)]);
    }

    #[test]
    fn test_single_operation_styles() {
        let shape = Shape::Line(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        let mut fill = RecordingContext::new();
        FillDrawStyle::Fill.render(&mut fill, &shape);
        assert_eq!(fill.calls, vec![Call::Fill(shape.clone())]);

        let mut draw = RecordingContext::new();
        FillDrawStyle::Draw.render(&mut draw, &shape);
        assert_eq!(draw.calls, vec![Call::Draw(shape)]);
    }

    #[test]
    fn test_area_shapes_fill_even_odd() {
        let shape = Shape::Area(Area::from_rect(&BoundingBox::new(0.0, 0.0, 2.0, 2.0)));
        assert_eq!(shape.fill_rule(), WindingRule::EvenOdd);
        assert!(!shape.is_empty());
        assert!(Shape::Area(Area::new()).is_empty());
    }
}
