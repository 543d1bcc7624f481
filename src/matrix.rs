//! The logical LED matrix: which cells are lit, and with what content color.

use core::convert::Infallible;
use core::ops::{Index, IndexMut};

use embedded_graphics::{
    draw_target::DrawTarget,
    pixelcolor::{Rgb888, RgbColor},
    prelude::{OriginDimensions, Pixel, Point, Size},
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::bounds::AGING_PERCENT;
use crate::color::{RGB8, WHITE, luma_milli, rgb888_to_rgb8};
use crate::raster::{RasterImage, Rgba};

/// A 2D grid of LED cells, lit or unlit, each carrying a content color.
///
/// The lit flag is what single-hue panels use. Full-color panels additionally
/// read the per-cell color. Coordinates are screen-style: `(0, 0)` is the
/// top-left corner, `x` grows to the right and `y` grows downward.
///
/// `LedMatrix` implements the [`embedded-graphics`](https://docs.rs/embedded-graphics)
/// [`DrawTarget`]: drawing a non-black color lights the cell with that color,
/// drawing black turns it off.
///
/// ```
/// use embedded_graphics::{pixelcolor::Rgb888, prelude::*, primitives::{PrimitiveStyle, Rectangle}};
/// use tabela_kit::matrix::LedMatrix;
///
/// let mut matrix = LedMatrix::new(12, 8);
/// Rectangle::new(Point::zero(), matrix.size())
///     .into_styled(PrimitiveStyle::with_stroke(Rgb888::RED, 1))
///     .draw(&mut matrix)
///     .expect("drawing into a matrix cannot fail");
/// assert!(matrix[(0, 0)]);
/// assert!(!matrix[(5, 4)]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedMatrix {
    width: usize,
    height: usize,
    lit: Vec<bool>,
    colors: Vec<RGB8>,
}

impl LedMatrix {
    /// Create an all-unlit matrix.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        let len = width * height;
        Self {
            width,
            height,
            lit: vec![false; len],
            colors: vec![WHITE; len],
        }
    }

    /// Build a matrix from rows of booleans. Short rows are padded with unlit cells.
    #[must_use]
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|row| row.as_ref().len()).max().unwrap_or(0);
        let mut matrix = Self::new(width, height);
        for (y_index, row) in rows.iter().enumerate() {
            for (x_index, lit) in row.as_ref().iter().enumerate() {
                matrix.set(x_index, y_index, *lit);
            }
        }
        matrix
    }

    /// Binarize an image and keep each lit cell's source color.
    ///
    /// Uses the same rule as [`crate::render::apply_threshold`].
    #[must_use]
    pub fn from_threshold_image(image: &RasterImage, threshold_percent: u8) -> Self {
        let cutoff = threshold_cutoff(threshold_percent);
        let mut matrix = Self::new(image.width() as usize, image.height() as usize);
        for (y_index, row) in image.rows().enumerate() {
            for (x_index, pixel) in row.iter().enumerate() {
                if passes_threshold(*pixel, cutoff) {
                    matrix.set_color(x_index, y_index, RGB8::new(pixel[0], pixel[1], pixel[2]));
                }
            }
        }
        matrix
    }

    /// Matrix width in cells (columns).
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Matrix height in cells (rows).
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.width * self.height
    }

    /// `true` when the matrix has no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `(x, y)` is lit. Out-of-range cells read as unlit.
    #[must_use]
    pub fn is_lit(&self, x_index: usize, y_index: usize) -> bool {
        self.offset(x_index, y_index)
            .and_then(|index| self.lit.get(index).copied())
            .unwrap_or(false)
    }

    /// Content color of `(x, y)`. Out-of-range cells read as white.
    #[must_use]
    pub fn color(&self, x_index: usize, y_index: usize) -> RGB8 {
        self.offset(x_index, y_index)
            .and_then(|index| self.colors.get(index).copied())
            .unwrap_or(WHITE)
    }

    /// Light or clear `(x, y)`. Out-of-range writes are ignored.
    pub fn set(&mut self, x_index: usize, y_index: usize, lit: bool) {
        if let Some(slot) = self
            .offset(x_index, y_index)
            .and_then(|index| self.lit.get_mut(index))
        {
            *slot = lit;
        }
    }

    /// Light `(x, y)` with a content color. Out-of-range writes are ignored.
    pub fn set_color(&mut self, x_index: usize, y_index: usize, color: RGB8) {
        if let Some(index) = self.offset(x_index, y_index) {
            if let Some(slot) = self.lit.get_mut(index) {
                *slot = true;
            }
            if let Some(slot) = self.colors.get_mut(index) {
                *slot = color;
            }
        }
    }

    /// Number of lit cells.
    #[must_use]
    pub fn lit_count(&self) -> usize {
        self.lit.iter().filter(|lit| **lit).count()
    }

    /// Turn every cell off.
    pub fn clear(&mut self) {
        self.lit.fill(false);
    }

    /// Copy the lit cells of `source` onto this matrix at `(x, y)`, clipping.
    ///
    /// Unlit source cells leave the destination untouched.
    pub fn overlay(&mut self, source: &Self, x: i32, y: i32) {
        for y_index in 0..source.height {
            for x_index in 0..source.width {
                if source.is_lit(x_index, y_index) {
                    self.set_signed(
                        x + x_index as i32,
                        y + y_index as i32,
                        source.color(x_index, y_index),
                    );
                }
            }
        }
    }

    /// Light cells for every opaque pixel of a text raster placed at `(x, y)`.
    ///
    /// Cells are clipped to the rectangle `clip` given as `(x, y, width, height)`.
    pub fn blit_raster(&mut self, image: &RasterImage, x: i32, y: i32, clip: (i32, i32, i32, i32)) {
        let (clip_x, clip_y, clip_width, clip_height) = clip;
        for (row_index, row) in image.rows().enumerate() {
            let target_y = y + row_index as i32;
            if target_y < clip_y || target_y >= clip_y + clip_height {
                continue;
            }
            for (column_index, pixel) in row.iter().enumerate() {
                let target_x = x + column_index as i32;
                if target_x < clip_x || target_x >= clip_x + clip_width || pixel[3] < 128 {
                    continue;
                }
                self.set_signed(target_x, target_y, RGB8::new(pixel[0], pixel[1], pixel[2]));
            }
        }
    }

    /// A copy of the `width × height` region starting at `(x, y)`; cells outside read as unlit.
    #[must_use]
    pub fn crop(&self, x: i32, y: i32, width: usize, height: usize) -> Self {
        let mut cropped = Self::new(width, height);
        for y_index in 0..height {
            for x_index in 0..width {
                let source_x = x + x_index as i32;
                let source_y = y + y_index as i32;
                if let (Ok(source_x), Ok(source_y)) =
                    (usize::try_from(source_x), usize::try_from(source_y))
                {
                    if self.is_lit(source_x, source_y) {
                        cropped.set_color(x_index, y_index, self.color(source_x, source_y));
                    }
                }
            }
        }
        cropped
    }

    fn set_signed(&mut self, x: i32, y: i32, color: RGB8) {
        if let (Ok(x_index), Ok(y_index)) = (usize::try_from(x), usize::try_from(y)) {
            self.set_color(x_index, y_index, color);
        }
    }

    fn offset(&self, x_index: usize, y_index: usize) -> Option<usize> {
        (x_index < self.width && y_index < self.height).then(|| y_index * self.width + x_index)
    }
}

impl Index<(usize, usize)> for LedMatrix {
    type Output = bool;

    fn index(&self, (x_index, y_index): (usize, usize)) -> &Self::Output {
        assert!(x_index < self.width, "x_index must be within width");
        assert!(y_index < self.height, "y_index must be within height");
        &self.lit[y_index * self.width + x_index]
    }
}

impl IndexMut<(usize, usize)> for LedMatrix {
    fn index_mut(&mut self, (x_index, y_index): (usize, usize)) -> &mut Self::Output {
        assert!(x_index < self.width, "x_index must be within width");
        assert!(y_index < self.height, "y_index must be within height");
        &mut self.lit[y_index * self.width + x_index]
    }
}

impl OriginDimensions for LedMatrix {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for LedMatrix {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            if color == Rgb888::BLACK {
                if let (Ok(x_index), Ok(y_index)) = (usize::try_from(x), usize::try_from(y)) {
                    self.set(x_index, y_index, false);
                }
            } else {
                self.set_signed(x, y, rgb888_to_rgb8(color));
            }
        }
        Ok(())
    }
}

/// Byte cutoff for a threshold percentage: `round(percent × 2.55)`, halves up.
#[must_use]
pub fn threshold_cutoff(threshold_percent: u8) -> u8 {
    ((u16::from(threshold_percent.min(100)) * 255 + 50) / 100) as u8
}

/// The binarization rule: alpha of at least 50% and luma at or above `cutoff`.
#[must_use]
pub fn passes_threshold(pixel: Rgba, cutoff: u8) -> bool {
    pixel[3] >= 128 && luma_milli(pixel[0], pixel[1], pixel[2]) >= u32::from(cutoff) * 1000
}

/// Simulate permanently failed LEDs, reproducibly.
///
/// Marks `round(cells × percent / 100)` distinct cells unlit, chosen by a
/// generator seeded only from `seed`. The same `(dimensions, percent, seed)`
/// always picks the same cells.
///
/// `percent` outside `(0, 5]` is a no-op: 5% is a hard ceiling, so asking for
/// 6% ages nothing rather than aging 5%.
#[must_use]
pub fn apply_aging_effect(matrix: &LedMatrix, percent: f32, seed: u64) -> LedMatrix {
    let mut aged = matrix.clone();
    if percent.is_nan() || percent <= 0.0 || percent > *AGING_PERCENT.end() {
        return aged;
    }
    let total = matrix.len();
    let failed = ((total as f32) * percent / 100.0).round() as usize;
    let failed = failed.min(total);
    if failed == 0 {
        return aged;
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for index in rand::seq::index::sample(&mut rng, total, failed) {
        if let Some(slot) = aged.lit.get_mut(index) {
            *slot = false;
        }
    }
    aged
}
