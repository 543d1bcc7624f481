//! Text layout on bitmap fonts: lines, colored segments, multi-line blocks,
//! alignment, and background/stroke styling.

use serde::{Deserialize, Serialize};

use crate::bounds::clamp_stroke_width;
use crate::color::{BLACK, RGB8, luma_milli};
use crate::font::BitmapFont;
use crate::raster::{RasterImage, opaque};

/// Horizontal placement inside a container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HorizontalAlign {
    /// Flush left.
    #[default]
    Left,
    /// Centered; odd leftovers go to the right.
    Center,
    /// Flush right.
    Right,
}

/// Vertical placement inside a container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerticalAlign {
    /// Flush top.
    Top,
    /// Centered; odd leftovers go to the bottom.
    #[default]
    Middle,
    /// Flush bottom.
    Bottom,
}

/// Left offset of `content` inside `container`.
///
/// Center uses truncating integer division, so content wider than the
/// container gets a negative offset rounded toward zero.
#[must_use]
pub const fn horizontal_position(align: HorizontalAlign, container: i32, content: i32) -> i32 {
    match align {
        HorizontalAlign::Left => 0,
        HorizontalAlign::Center => (container - content) / 2,
        HorizontalAlign::Right => container - content,
    }
}

/// Top offset of `content` inside `container`.
#[must_use]
pub const fn vertical_position(align: VerticalAlign, container: i32, content: i32) -> i32 {
    match align {
        VerticalAlign::Top => 0,
        VerticalAlign::Middle => (container - content) / 2,
        VerticalAlign::Bottom => container - content,
    }
}

/// `(x, y)` of a `content` box aligned inside a `container` box, both `(width, height)`.
#[must_use]
pub const fn align_2d(
    horizontal: HorizontalAlign,
    vertical: VerticalAlign,
    container: (i32, i32),
    content: (i32, i32),
) -> (i32, i32) {
    (
        horizontal_position(horizontal, container.0, content.0),
        vertical_position(vertical, container.1, content.1),
    )
}

/// A run of text drawn in one color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextSegment {
    /// Characters of the run.
    pub text: String,
    /// Color of the run.
    pub color: RGB8,
}

impl TextSegment {
    /// Create a segment.
    #[must_use]
    pub fn new(text: impl Into<String>, color: RGB8) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }
}

/// Spacing and alignment for multi-line text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextLayout {
    /// Extra pixels between glyphs (may be negative).
    pub letter_spacing: i32,
    /// Extra pixels between lines.
    pub line_spacing: u32,
    /// Alignment of each line inside the widest line.
    pub align: HorizontalAlign,
}

/// Result of [`render_multiline`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultilineText {
    /// The full block, never cropped.
    pub image: RasterImage,
    /// Number of lines after splitting.
    pub line_count: usize,
    /// Set when the block is taller than the display.
    pub warning: Option<String>,
}

/// Render one line of text.
///
/// Glyphs are placed by their advance plus `letter_spacing`. Characters the
/// font has no glyph for are skipped. Text with no drawable glyphs yields a
/// `1 × line_height` transparent placeholder.
#[must_use]
pub fn render_line(font: &BitmapFont, text: &str, color: RGB8, letter_spacing: i32) -> RasterImage {
    layout_run(font, text.chars().map(|ch| (ch, color)), letter_spacing)
}

/// Render colored runs as a single line.
///
/// The result has exactly the width of rendering the concatenated text with
/// [`render_line`].
#[must_use]
pub fn render_segments(font: &BitmapFont, segments: &[TextSegment], letter_spacing: i32) -> RasterImage {
    layout_run(
        font,
        segments
            .iter()
            .flat_map(|segment| segment.text.chars().map(|ch| (ch, segment.color))),
        letter_spacing,
    )
}

/// Split text into lines on `\r\n`, `\n` or `\r`, each counting as one boundary.
#[must_use]
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    let mut index = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'\r' => {
                lines.push(&text[start..index]);
                index += if bytes.get(index + 1) == Some(&b'\n') { 2 } else { 1 };
                start = index;
            }
            b'\n' => {
                lines.push(&text[start..index]);
                index += 1;
                start = index;
            }
            _ => index += 1,
        }
    }
    lines.push(&text[start..]);
    lines
}

/// Render a block of lines.
///
/// With `L` lines, line height `H` and line spacing `S`, the block is
/// `L×H + (L−1)×S` tall and as wide as its widest line. Each line is aligned
/// inside that width. A block taller than `display_height` is still returned
/// in full, with a warning.
#[must_use]
pub fn render_multiline(
    font: &BitmapFont,
    text: &str,
    color: RGB8,
    layout: &TextLayout,
    display_height: u32,
) -> MultilineText {
    let lines: Vec<RasterImage> = split_lines(text)
        .into_iter()
        .map(|line| render_line(font, line, color, layout.letter_spacing))
        .collect();
    let line_count = lines.len();
    let line_height = font.line_height.max(1);
    let height = line_count as u32 * line_height + (line_count as u32 - 1) * layout.line_spacing;
    let width = lines.iter().map(RasterImage::width).max().unwrap_or(1);

    let mut image = RasterImage::new(width, height);
    for (index, line) in lines.iter().enumerate() {
        let x = horizontal_position(layout.align, width as i32, line.width() as i32);
        let y = index as u32 * (line_height + layout.line_spacing);
        image.blit(line, x, y as i32);
    }

    let warning = (height > display_height).then(|| {
        log::warn!("text block of {line_count} lines is {height}px tall, display is {display_height}px");
        format!(
            "text needs {height} pixels but the display is {display_height} pixels tall; \
             {line_count} lines will not all be visible"
        )
    });
    MultilineText {
        image,
        line_count,
        warning,
    }
}

/// Background and outline options for rendered text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    /// Fill uncovered pixels with `background_color`.
    pub has_background: bool,
    /// Fill color.
    #[serde(with = "crate::color::hex")]
    pub background_color: RGB8,
    /// Outline glyphs with `stroke_color`.
    pub has_stroke: bool,
    /// Outline width, 1–3 pixels.
    pub stroke_width: u32,
    /// Outline color.
    #[serde(with = "crate::color::hex")]
    pub stroke_color: RGB8,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            has_background: false,
            background_color: BLACK,
            has_stroke: false,
            stroke_width: 1,
            stroke_color: BLACK,
        }
    }
}

impl TextStyle {
    /// Set the outline width, clamped to 1–3.
    pub fn set_stroke_width(&mut self, width: u32) {
        self.stroke_width = clamp_stroke_width(width);
    }
}

/// Apply background and stroke to rendered text.
///
/// A stroke grows the image by `2 × stroke_width` in each dimension (the width
/// is clamped again here) and outlines every opaque pixel. Without a stroke the
/// size is unchanged. The background fills whatever the text and stroke leave
/// uncovered.
#[must_use]
pub fn apply_text_style(image: &RasterImage, style: &TextStyle) -> RasterImage {
    let stroke = if style.has_stroke {
        clamp_stroke_width(style.stroke_width)
    } else {
        0
    };
    let mut styled = RasterImage::new(image.width() + 2 * stroke, image.height() + 2 * stroke);
    if style.has_background {
        styled.fill(opaque(style.background_color));
    }

    if stroke > 0 {
        let reach = stroke as i32;
        let stroke_pixel = opaque(style.stroke_color);
        for (y_index, row) in image.rows().enumerate() {
            for (x_index, pixel) in row.iter().enumerate() {
                if pixel[3] < 128 {
                    continue;
                }
                let center_x = x_index as i32 + reach;
                let center_y = y_index as i32 + reach;
                for delta_y in -reach..=reach {
                    for delta_x in -reach..=reach {
                        styled.set_pixel_signed(center_x + delta_x, center_y + delta_y, stroke_pixel);
                    }
                }
            }
        }
    }

    styled.blit(image, stroke as i32, stroke as i32);
    styled
}

fn layout_run(
    font: &BitmapFont,
    chars: impl Iterator<Item = (char, RGB8)>,
    letter_spacing: i32,
) -> RasterImage {
    let line_height = font.line_height.max(1);
    let placed: Vec<_> = chars
        .filter_map(|(ch, color)| font.glyph(ch).map(|glyph| (*glyph, color)))
        .collect();
    if placed.is_empty() {
        return RasterImage::new(1, line_height);
    }

    let mut pen = 0i32;
    let mut right = 0i32;
    let mut positions = Vec::with_capacity(placed.len());
    for (index, (glyph, _)) in placed.iter().enumerate() {
        if index > 0 {
            pen += letter_spacing;
        }
        positions.push(pen);
        right = right.max(pen + glyph.x_offset + glyph.width as i32);
        pen += glyph.x_advance;
    }
    let width = right.max(pen).max(1) as u32;

    let mut image = RasterImage::new(width, line_height);
    for ((glyph, color), pen) in placed.iter().zip(positions) {
        let Some(glyph_image) = font.glyph_image(glyph) else {
            continue;
        };
        for (y_index, row) in glyph_image.rows().enumerate() {
            for (x_index, pixel) in row.iter().enumerate() {
                let coverage = coverage(*pixel);
                if coverage == 0 {
                    continue;
                }
                image.set_pixel_signed(
                    pen + glyph.x_offset + x_index as i32,
                    glyph.y_offset + y_index as i32,
                    [color.r, color.g, color.b, coverage],
                );
            }
        }
    }
    image
}

/// Glyph coverage of an atlas pixel: works for white-on-transparent and
/// white-on-black atlases alike.
fn coverage(pixel: [u8; 4]) -> u8 {
    let brightness = (luma_milli(pixel[0], pixel[1], pixel[2]) / 1000) as u8;
    brightness.min(pixel[3])
}
