//! The drawing context records are played back against
//!
//! Records only ever reach the surface and the object table through this
//! trait. Index resolution belongs to the implementation: an index that was
//! never defined must be rejected or ignored there, records forward it as is.

use crate::object::GdiObject;
use crate::shape::Shape;
use crate::types::{BoundingBox, ColorRef, Point, WindingRule};

pub trait PlaybackContext {
    /// Current pen position
    fn location(&self) -> Point;

    fn set_location(&mut self, point: Point);

    fn winding_rule(&self) -> WindingRule;

    fn set_winding_rule(&mut self, rule: WindingRule);

    /// Bounds of the current clip region
    fn region(&self) -> BoundingBox;

    /// Paint the interior with the selected brush
    fn fill(&mut self, shape: &Shape);

    /// Stroke the outline with the selected pen
    fn draw(&mut self, shape: &Shape);

    /// Paint the interior with `color`, ignoring the selected brush
    fn fill_with_color(&mut self, shape: &Shape, color: ColorRef);

    /// Select the object stored at `index`
    fn apply_object_table_entry(&mut self, index: u16);

    /// Store a new object in the lowest free slot
    fn add_object_table_entry(&mut self, object: GdiObject);

    fn delete_object_table_entry(&mut self, index: u16);

    fn set_window_origin(&mut self, origin: Point);

    fn set_window_extent(&mut self, width: f64, height: f64);
}
