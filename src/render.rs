//! LED matrix rendering pipeline: logical matrix to colored raster.
//!
//! Every function here is pure: it reads its inputs, allocates a fresh
//! [`RasterImage`], and never mutates the matrix, image, or settings it was given.

use embedded_graphics::{
    Drawable,
    pixelcolor::{Rgb888, RgbColor},
    prelude::{Point, Primitive, Size},
    primitives::{Circle, PrimitiveStyle, Rectangle},
};

use crate::color::{BLACK, RGB8, WHITE, scale_brightness};
use crate::matrix::{LedMatrix, passes_threshold, threshold_cutoff};
use crate::raster::{RasterImage, Rgba, opaque};
use crate::settings::{DisplaySettings, PixelShape};

/// Output value for a pixel that passes the binarization threshold.
pub const LIT_SENTINEL: Rgba = opaque(WHITE);
/// Output value for a pixel that fails the binarization threshold.
pub const UNLIT_SENTINEL: Rgba = opaque(BLACK);

/// Dot diameter in output pixels: `max(1, round(pixel_size × pitch_ratio))`.
#[must_use]
pub fn dot_diameter(settings: &DisplaySettings) -> u32 {
    let pixel_size = settings.pixel_size.max(1);
    let diameter = (pixel_size as f32 * settings.pitch_ratio()).round() as u32;
    diameter.clamp(1, pixel_size)
}

/// The color a lit cell is drawn with, before inversion.
///
/// Single-hue modes ignore `content_color`. Brightness 0 yields the background
/// color so a fully dimmed panel is indistinguishable from an empty one.
#[must_use]
pub fn lit_color(settings: &DisplaySettings, content_color: RGB8) -> RGB8 {
    if settings.brightness == 0 {
        return settings.background_color();
    }
    let base = settings.color_mode.hue().unwrap_or(content_color);
    scale_brightness(base, settings.brightness)
}

/// Render a logical matrix as a panel of LED dots.
///
/// The output is `(width × pixel_size) × (height × pixel_size)`. Each cell gets
/// one dot (circle or square, per [`PixelShape`]) centered in its cell on a
/// background derived from `background_darkness`. With `invert_colors`, unlit
/// cells receive the LED color and lit cells the background.
#[must_use]
pub fn render_matrix(matrix: &LedMatrix, settings: &DisplaySettings) -> RasterImage {
    let cell_size = settings.pixel_size.max(1);
    let width = matrix.width() as u32 * cell_size;
    let height = matrix.height() as u32 * cell_size;
    let background = settings.background_color();
    let mut image = RasterImage::filled(width, height, opaque(background));

    let mask = dot_mask(settings);
    // Single-hue panels share one foreground color; compute it once.
    let uniform_lit = settings
        .color_mode
        .hue()
        .map(|_| lit_color(settings, WHITE));

    for y_index in 0..matrix.height() {
        for x_index in 0..matrix.width() {
            let lit = matrix.is_lit(x_index, y_index) != settings.invert_colors;
            let color = if lit {
                uniform_lit.unwrap_or_else(|| lit_color(settings, matrix.color(x_index, y_index)))
            } else {
                background
            };
            if color == background {
                continue;
            }
            stamp(
                &mut image,
                &mask,
                x_index as u32 * cell_size,
                y_index as u32 * cell_size,
                opaque(color),
            );
        }
    }
    image
}

/// Binarize an image: every output pixel is [`LIT_SENTINEL`] or [`UNLIT_SENTINEL`].
///
/// `threshold_percent` (0–100, larger values clamp to 100) maps to the byte
/// cutoff `round(percent × 2.55)`. Pixels under 50% alpha are unlit; otherwise a
/// pixel is lit when its luma `0.299R + 0.587G + 0.114B` reaches the cutoff.
/// Raising the threshold never lights more pixels.
#[must_use]
pub fn apply_threshold(image: &RasterImage, threshold_percent: u8) -> RasterImage {
    let cutoff = threshold_cutoff(threshold_percent);
    let pixels = image
        .pixels()
        .iter()
        .map(|pixel| {
            if passes_threshold(*pixel, cutoff) {
                LIT_SENTINEL
            } else {
                UNLIT_SENTINEL
            }
        })
        .collect();
    RasterImage::from_pixels(image.width(), image.height(), pixels)
        .unwrap_or_else(|| RasterImage::new(image.width(), image.height()))
}

/// Scale to `target_height`, preserving aspect ratio (nearest neighbour).
///
/// The width is `round(width × target_height / height)`, at least 1. An empty
/// source or zero target yields an empty image of the requested height.
#[must_use]
pub fn scale_to_height(image: &RasterImage, target_height: u32) -> RasterImage {
    if image.width() == 0 || image.height() == 0 || target_height == 0 {
        return RasterImage::new(0, target_height);
    }
    let scale = f64::from(target_height) / f64::from(image.height());
    let target_width = ((f64::from(image.width()) * scale).round() as u32).max(1);
    let mut scaled = RasterImage::new(target_width, target_height);
    for y_index in 0..target_height {
        let source_y = (u64::from(y_index) * u64::from(image.height()) / u64::from(target_height))
            as u32;
        for x_index in 0..target_width {
            let source_x = (u64::from(x_index) * u64::from(image.width())
                / u64::from(target_width)) as u32;
            if let Some(pixel) = image.pixel(source_x, source_y) {
                scaled.set_pixel(x_index, y_index, pixel);
            }
        }
    }
    scaled
}

/// One cell with the dot drawn in white on transparent.
fn dot_mask(settings: &DisplaySettings) -> RasterImage {
    let cell_size = settings.pixel_size.max(1);
    let diameter = dot_diameter(settings);
    let offset = ((cell_size - diameter) / 2) as i32;
    let top_left = Point::new(offset, offset);
    let style = PrimitiveStyle::with_fill(Rgb888::WHITE);
    let mut mask = RasterImage::new(cell_size, cell_size);
    match settings.pixel_shape {
        PixelShape::Round => Circle::new(top_left, diameter)
            .into_styled(style)
            .draw(&mut mask)
            .unwrap_or_default(),
        PixelShape::Square => Rectangle::new(top_left, Size::new(diameter, diameter))
            .into_styled(style)
            .draw(&mut mask)
            .unwrap_or_default(),
    }
    // A 1-pixel circle can rasterize to nothing; keep at least the center lit.
    if mask.pixels().iter().all(|pixel| pixel[3] == 0) {
        mask.set_pixel(cell_size / 2, cell_size / 2, opaque(WHITE));
    }
    mask
}

fn stamp(image: &mut RasterImage, mask: &RasterImage, x: u32, y: u32, color: Rgba) {
    for (mask_y, row) in mask.rows().enumerate() {
        for (mask_x, pixel) in row.iter().enumerate() {
            if pixel[3] != 0 {
                image.set_pixel(x + mask_x as u32, y + mask_y as u32, color);
            }
        }
    }
}
