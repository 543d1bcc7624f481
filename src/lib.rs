//! Simulated LED matrix signboards: content scheduling and LED-accurate rendering.
//!
//! The crate turns declarative signboard content (text, clocks, dates,
//! countdowns, rotating "intermediate stops") plus timing rules into a
//! sequence of raster frames that look like a physical LED panel.
//!
//! See [`Signboard`] for the end-to-end pipeline, or use the pieces directly:
//!
//! - [`scheduler::ProgramScheduler`] and [`playlist::Playlist`] decide what is on screen.
//! - [`font`] and [`text`] rasterize bitmap-font text.
//! - [`matrix::LedMatrix`] holds the logical on/off pixels.
//! - [`render`] turns a matrix into a colored [`raster::RasterImage`].
//! - [`encoder::FrameEncoder`] hands finished frames to an image writer.
//!
//! # Glossary
//!
//! - **Logical pixel matrix:** which LED cells are lit, independent of how they look.
//! - **Pitch:** LED center-to-center spacing; controls the dot-to-cell size ratio.
//! - **Stop:** a sub-rotation item (for example a transit stop name) cycling inside one content item.
//! - **Binarization:** reducing an image to lit/unlit with a threshold.
//! - **Aging effect:** seeded, reproducible permanent pixel failure.
#![allow(clippy::module_name_repetitions, reason = "types are named after their domain")]

pub mod bounds;
pub mod color;
pub mod encoder;
mod error;
pub mod font;
pub mod matrix;
pub mod playlist;
pub mod profile;
pub mod program;
pub mod raster;
pub mod render;
pub mod scheduler;
pub mod settings;
pub mod signboard;
pub mod text;
pub mod transition;
pub mod zone;

// Re-export error types and result (used throughout)
pub use crate::error::{Error, Result};
pub use crate::signboard::Signboard;
