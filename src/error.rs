//! Crate-wide error type.

use std::path::PathBuf;

use derive_more::{Debug, Display, Error, From};

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Failures surfaced by loaders and encoders.
///
/// Out-of-range inputs never produce an `Error`; they are clamped or rejected
/// with a flag. Only external resources (files, images, documents) fail here.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Underlying file system failure.
    #[display("I/O error: {_0}")]
    #[from]
    Io(std::io::Error),

    /// A font descriptor or its atlas image was not found.
    #[display("font file not found: {}", path.display())]
    FontNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// A font descriptor line or element could not be parsed.
    #[display("font parse error at line {line}: {message}")]
    FontParse {
        /// 1-based line number (0 when the position is unknown).
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// The same codepoint appeared twice in one font descriptor.
    #[display("duplicate glyph for codepoint {id}")]
    DuplicateGlyph {
        /// Offending codepoint.
        id: u32,
    },

    /// A font failed validation (no atlas, no glyphs).
    #[display("invalid font: {message}")]
    InvalidFont {
        /// Why the font was rejected.
        message: String,
    },

    /// The tag-based font document is not well-formed XML.
    #[display("XML error: {_0}")]
    #[from]
    Xml(quick_xml::Error),

    /// An XML attribute could not be read.
    #[display("XML attribute error: {_0}")]
    #[from]
    XmlAttribute(quick_xml::events::attributes::AttrError),

    /// The atlas or art image could not be decoded.
    #[display("PNG decode error: {_0}")]
    #[from]
    PngDecode(png::DecodingError),

    /// A preview image could not be encoded.
    #[display("PNG encode error: {_0}")]
    #[from]
    PngEncode(png::EncodingError),

    /// The decoded image uses a layout the raster type cannot hold.
    #[display("unsupported image: {message}")]
    UnsupportedImage {
        /// Description of the unsupported layout.
        message: String,
    },

    /// The profile document is not valid JSON for the profile schema.
    #[display("profile JSON error: {_0}")]
    #[from]
    Json(serde_json::Error),

    /// An animation was requested with no frames or a zero frame rate.
    #[display("animation needs at least one frame and a positive frame rate")]
    EmptyAnimation,
}
