//! Bitmap fonts: glyph metrics plus a PNG atlas.
//!
//! Fonts come from two places:
//!
//! - Descriptor files in either encoding handled by [`bmfont`] (key-value text or
//!   XML), loaded with [`load_font`] together with the atlas PNG they name.
//! - [`BuiltinFont`], which rasterizes an embedded-graphics mono font into an
//!   atlas so the crate can draw text without any external files.

pub mod bmfont;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use embedded_graphics::{
    Drawable,
    mono_font::{
        MonoFont, MonoTextStyle,
        ascii::{
            FONT_4X6, FONT_5X7, FONT_5X8, FONT_6X9, FONT_6X10, FONT_6X12, FONT_6X13,
            FONT_6X13_BOLD, FONT_7X13, FONT_7X13_BOLD, FONT_7X14, FONT_7X14_BOLD, FONT_8X13,
            FONT_8X13_BOLD, FONT_9X15, FONT_9X15_BOLD, FONT_9X18, FONT_9X18_BOLD, FONT_10X20,
        },
    },
    pixelcolor::{Rgb888, RgbColor},
    prelude::Point,
    text::{Baseline, Text},
};

use crate::encoder::write_png;
use crate::raster::RasterImage;
use crate::{Error, Result};

pub use bmfont::FontEncoding;

/// Placement and metrics of one character inside the atlas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Glyph {
    /// Unicode codepoint.
    pub id: u32,
    /// Left edge in the atlas.
    pub x: u32,
    /// Top edge in the atlas.
    pub y: u32,
    /// Width in the atlas.
    pub width: u32,
    /// Height in the atlas.
    pub height: u32,
    /// Horizontal draw offset from the pen position.
    pub x_offset: i32,
    /// Vertical draw offset from the top of the line.
    pub y_offset: i32,
    /// Pen advance after drawing.
    pub x_advance: i32,
}

/// A bitmap font: descriptor metrics and, once loaded, its atlas image.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitmapFont {
    /// Face name.
    pub name: String,
    /// Distance between baselines of consecutive lines.
    pub line_height: u32,
    /// Distance from the top of the line to the baseline.
    pub base: u32,
    /// Decoded atlas, `None` until loaded.
    pub atlas: Option<RasterImage>,
    /// Atlas file name as written in the descriptor.
    pub atlas_file: Option<String>,
    /// Glyphs keyed by codepoint.
    pub glyphs: BTreeMap<u32, Glyph>,
}

impl BitmapFont {
    /// Rasterize a built-in mono font into a ready-to-use bitmap font.
    #[must_use]
    pub fn builtin(font: BuiltinFont) -> Self {
        font.rasterize()
    }

    /// Glyph for `ch`, if the font has one.
    #[must_use]
    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&u32::from(ch))
    }

    /// Cut the glyph's pixels out of the atlas.
    ///
    /// Returns `None` when there is no atlas. Parts of the glyph rectangle outside
    /// the atlas read as transparent.
    #[must_use]
    pub fn glyph_image(&self, glyph: &Glyph) -> Option<RasterImage> {
        let atlas = self.atlas.as_ref()?;
        let mut image = RasterImage::new(glyph.width, glyph.height);
        for y_index in 0..glyph.height {
            for x_index in 0..glyph.width {
                if let Some(pixel) = atlas.pixel(glyph.x + x_index, glyph.y + y_index) {
                    image.set_pixel(x_index, y_index, pixel);
                }
            }
        }
        Some(image)
    }

    /// Parse a descriptor in either encoding. The atlas is not loaded.
    ///
    /// # Errors
    ///
    /// See [`bmfont::parse_text`] and [`bmfont::parse_xml`].
    pub fn parse(descriptor: &str) -> Result<Self> {
        match FontEncoding::detect(descriptor) {
            FontEncoding::Text => bmfont::parse_text(descriptor),
            FontEncoding::Xml => bmfont::parse_xml(descriptor),
        }
    }

    /// Serialize the descriptor in `encoding`.
    #[must_use]
    pub fn to_descriptor(&self, encoding: FontEncoding) -> String {
        match encoding {
            FontEncoding::Text => bmfont::write_text(self),
            FontEncoding::Xml => bmfont::write_xml(self),
        }
    }
}

/// Read a font descriptor and its atlas.
///
/// XML descriptors are recognized by a leading `<`; anything else is parsed as
/// the key-value text format. The atlas path from the `page` entry is resolved
/// relative to the descriptor's directory.
///
/// # Errors
///
/// Returns [`Error::FontNotFound`] when the descriptor or its atlas is missing,
/// a parse error for malformed descriptors, and [`Error::PngDecode`] for a bad
/// atlas.
pub fn load_font(path: impl AsRef<Path>) -> Result<BitmapFont> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::FontNotFound {
            path: path.to_path_buf(),
        });
    }
    let descriptor = fs::read_to_string(path)?;
    let mut font = BitmapFont::parse(&descriptor)?;

    if let Some(atlas_file) = font.atlas_file.as_deref() {
        let atlas_path = path
            .parent()
            .map_or_else(|| Path::new(atlas_file).to_path_buf(), |dir| dir.join(atlas_file));
        if !atlas_path.is_file() {
            return Err(Error::FontNotFound { path: atlas_path });
        }
        font.atlas = Some(RasterImage::load_png(&atlas_path)?);
    }

    log::info!(
        "loaded font {:?}: {} glyphs, line height {}",
        font.name,
        font.glyphs.len(),
        font.line_height
    );
    Ok(font)
}

/// Write a font descriptor in `encoding` and, if present, its atlas PNG next to it.
///
/// The atlas is written under `atlas_file`, or `<stem>_0.png` when the font has
/// no atlas file name yet.
///
/// # Errors
///
/// Returns [`Error::Io`] or [`Error::PngEncode`] when writing fails, and
/// [`Error::InvalidFont`] when the text encoding is asked to carry a `"` in the
/// face name or atlas file.
pub fn save_font(font: &BitmapFont, path: impl AsRef<Path>, encoding: FontEncoding) -> Result<()> {
    let path = path.as_ref();
    if encoding == FontEncoding::Text {
        let quoted = std::iter::once(font.name.as_str())
            .chain(font.atlas_file.as_deref())
            .find(|value| value.contains('"'));
        if let Some(value) = quoted {
            return Err(Error::InvalidFont {
                message: format!("text descriptors cannot quote {value:?}, use XML"),
            });
        }
    }
    let mut font = font.clone();
    if font.atlas.is_some() && font.atlas_file.is_none() {
        let stem = path
            .file_stem()
            .map_or_else(|| "font".to_owned(), |stem| stem.to_string_lossy().into_owned());
        font.atlas_file = Some(format!("{stem}_0.png"));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, font.to_descriptor(encoding))?;
    if let (Some(atlas), Some(atlas_file)) = (font.atlas.as_ref(), font.atlas_file.as_deref()) {
        let atlas_path = path
            .parent()
            .map_or_else(|| Path::new(atlas_file).to_path_buf(), |dir| dir.join(atlas_file));
        write_png(atlas, &atlas_path)?;
    }
    Ok(())
}

/// Check that a font can actually draw text.
///
/// # Errors
///
/// Returns [`Error::InvalidFont`] when the atlas is missing or there are no glyphs.
pub fn validate_font(font: &BitmapFont) -> Result<()> {
    if font.atlas.is_none() {
        return Err(Error::InvalidFont {
            message: format!("font {:?} has no atlas image", font.name),
        });
    }
    if font.glyphs.is_empty() {
        return Err(Error::InvalidFont {
            message: format!("font {:?} has no glyphs", font.name),
        });
    }
    Ok(())
}

/// Fonts compiled into the crate, backed by embedded-graphics mono fonts.
///
/// Each variant covers printable ASCII (`0x20..=0x7E`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[allow(missing_docs, reason = "variant names state the cell size")]
pub enum BuiltinFont {
    Font4x6,
    Font5x7,
    Font5x8,
    Font6x9,
    Font6x10,
    Font6x12,
    Font6x13,
    Font6x13Bold,
    Font7x13,
    Font7x13Bold,
    #[default]
    Font7x14,
    Font7x14Bold,
    Font8x13,
    Font8x13Bold,
    Font9x15,
    Font9x15Bold,
    Font9x18,
    Font9x18Bold,
    Font10x20,
}

impl BuiltinFont {
    /// Return the `MonoFont` for this variant.
    #[must_use]
    pub const fn to_font(self) -> MonoFont<'static> {
        match self {
            Self::Font4x6 => FONT_4X6,
            Self::Font5x7 => FONT_5X7,
            Self::Font5x8 => FONT_5X8,
            Self::Font6x9 => FONT_6X9,
            Self::Font6x10 => FONT_6X10,
            Self::Font6x12 => FONT_6X12,
            Self::Font6x13 => FONT_6X13,
            Self::Font6x13Bold => FONT_6X13_BOLD,
            Self::Font7x13 => FONT_7X13,
            Self::Font7x13Bold => FONT_7X13_BOLD,
            Self::Font7x14 => FONT_7X14,
            Self::Font7x14Bold => FONT_7X14_BOLD,
            Self::Font8x13 => FONT_8X13,
            Self::Font8x13Bold => FONT_8X13_BOLD,
            Self::Font9x15 => FONT_9X15,
            Self::Font9x15Bold => FONT_9X15_BOLD,
            Self::Font9x18 => FONT_9X18,
            Self::Font9x18Bold => FONT_9X18_BOLD,
            Self::Font10x20 => FONT_10X20,
        }
    }

    fn rasterize(self) -> BitmapFont {
        const FIRST: u8 = 0x20;
        const LAST: u8 = 0x7E;
        const COLUMNS: u32 = 16;

        let mono = self.to_font();
        let cell_width = mono.character_size.width;
        let cell_height = mono.character_size.height;
        let count = u32::from(LAST - FIRST) + 1;
        let rows = count.div_ceil(COLUMNS);
        let mut atlas = RasterImage::new(cell_width * COLUMNS, cell_height * rows);
        let style = MonoTextStyle::new(&mono, Rgb888::WHITE);

        let mut glyphs = BTreeMap::new();
        for (slot, code) in (FIRST..=LAST).enumerate() {
            let slot = slot as u32;
            let x = (slot % COLUMNS) * cell_width;
            let y = (slot / COLUMNS) * cell_height;
            let mut buffer = [0u8; 4];
            let text = char::from(code).encode_utf8(&mut buffer);
            let position = Point::new(x as i32, y as i32);
            Text::with_baseline(text, position, style, Baseline::Top)
                .draw(&mut atlas)
                .unwrap_or_default();
            glyphs.insert(
                u32::from(code),
                Glyph {
                    id: u32::from(code),
                    x,
                    y,
                    width: cell_width,
                    height: cell_height,
                    x_offset: 0,
                    y_offset: 0,
                    x_advance: (cell_width + mono.character_spacing) as i32,
                },
            );
        }

        BitmapFont {
            name: format!("{self:?}"),
            line_height: cell_height,
            base: mono.baseline,
            atlas: Some(atlas),
            atlas_file: None,
            glyphs,
        }
    }
}
