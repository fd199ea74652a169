//! WMF record decoding and playback
//!
//! - Record model: every supported META_* record decodes from and encodes
//!   back to its exact wire layout
//! - Playback: records are applied in stream order against a
//!   [`PlaybackContext`]
//! - SVG backend: [`SvgGraphics`] renders a metafile to an SVG document
//!
//! The Python binding is available behind the `python` feature.

pub mod area;
pub mod compose;
pub mod context;
pub mod cursor;
pub mod error;
pub mod geometry;
pub mod graphics;
pub mod object;
pub mod path;
pub mod player;
pub mod record;
pub mod shape;
pub mod types;
pub mod wmf;
mod svg_writer;

#[cfg(feature = "python")]
mod python;

#[cfg(test)]
mod testing;

pub use context::PlaybackContext;
pub use error::{WmfError, WmfResult};
pub use graphics::SvgGraphics;
pub use player::{play, play_with, PlaybackOptions, PlaybackSummary, Player, SizePolicy};
pub use record::{Record, RecordType};
pub use shape::{FillDrawStyle, Shape};
pub use wmf::{convert_wmf_to_svg, convert_wmf_to_svg_with, is_wmf_format};
