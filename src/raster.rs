//! Owned RGBA raster images: the output of every render call.

use core::convert::Infallible;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use embedded_graphics::{
    draw_target::DrawTarget,
    pixelcolor::{Rgb888, RgbColor},
    prelude::{OriginDimensions, Pixel, Size},
};
use png::{ColorType, Decoder, Transformations};

use crate::color::RGB8;
use crate::{Error, Result};

/// One RGBA pixel, non-premultiplied.
pub type Rgba = [u8; 4];

/// Fully transparent black.
pub const TRANSPARENT: Rgba = [0, 0, 0, 0];

/// Opaque RGBA from an [`RGB8`].
#[must_use]
pub const fn opaque(color: RGB8) -> Rgba {
    [color.r, color.g, color.b, 255]
}

/// A row-major RGBA image.
///
/// Images are plain owned buffers: render functions allocate a fresh one and
/// never mutate their inputs. Drawing through [`embedded-graphics`] writes opaque
/// pixels and silently clips anything outside the image.
///
/// [`embedded-graphics`]: https://docs.rs/embedded-graphics
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl RasterImage {
    /// Create a transparent image.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, TRANSPARENT)
    }

    /// Create an image with every pixel set to `pixel`.
    #[must_use]
    pub fn filled(width: u32, height: u32, pixel: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![pixel; (width as usize) * (height as usize)],
        }
    }

    /// Wrap an existing pixel buffer. Returns `None` if the length does not match.
    #[must_use]
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgba>) -> Option<Self> {
        ((width as usize) * (height as usize) == pixels.len()).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// All pixels in row-major order.
    #[must_use]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the image.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        self.offset(x, y).and_then(|index| self.pixels.get(index).copied())
    }

    /// Set the pixel at `(x, y)`; writes outside the image are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: Rgba) {
        if let Some(slot) = self.offset(x, y).and_then(|index| self.pixels.get_mut(index)) {
            *slot = pixel;
        }
    }

    /// Set the pixel at signed coordinates; writes outside the image are ignored.
    pub fn set_pixel_signed(&mut self, x: i32, y: i32, pixel: Rgba) {
        if let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) {
            self.set_pixel(x, y, pixel);
        }
    }

    /// Fill the whole image with `pixel`.
    pub fn fill(&mut self, pixel: Rgba) {
        self.pixels.fill(pixel);
    }

    /// Copy `source` onto this image with its top-left at `(x, y)`.
    ///
    /// Only pixels with alpha of at least 128 are copied; the rest of the
    /// destination shows through.
    pub fn blit(&mut self, source: &Self, x: i32, y: i32) {
        for (source_y, row) in source.rows().enumerate() {
            for (source_x, pixel) in row.iter().enumerate() {
                if pixel[3] >= 128 {
                    self.set_pixel_signed(x + source_x as i32, y + source_y as i32, *pixel);
                }
            }
        }
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Rgba]> {
        self.pixels.chunks(self.width.max(1) as usize)
    }

    /// Flatten to `RGBA` bytes.
    #[must_use]
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }

    /// Flatten to `RGB` bytes, dropping alpha.
    #[must_use]
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|pixel| [pixel[0], pixel[1], pixel[2]])
            .collect()
    }

    /// Decode a PNG file into an RGBA image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be opened, [`Error::PngDecode`]
    /// if it is not a valid PNG.
    pub fn load_png(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::decode_png(BufReader::new(file))
    }

    /// Decode PNG bytes from any reader into an RGBA image.
    ///
    /// Palette, low-bit-depth and 16-bit images are normalized to 8-bit RGBA.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PngDecode`] for malformed data.
    pub fn decode_png(reader: impl std::io::Read) -> Result<Self> {
        let mut decoder = Decoder::new(reader);
        decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
        let mut png_reader = decoder.read_info()?;
        let mut buffer = vec![0u8; png_reader.output_buffer_size()];
        let info = png_reader.next_frame(&mut buffer)?;
        let bytes = buffer.get(..info.buffer_size()).unwrap_or(&buffer);

        let pixels: Vec<Rgba> = match info.color_type {
            ColorType::Rgba => bytes
                .chunks_exact(4)
                .map(|chunk| [chunk[0], chunk[1], chunk[2], chunk[3]])
                .collect(),
            ColorType::Rgb => bytes
                .chunks_exact(3)
                .map(|chunk| [chunk[0], chunk[1], chunk[2], 255])
                .collect(),
            ColorType::GrayscaleAlpha => bytes
                .chunks_exact(2)
                .map(|chunk| [chunk[0], chunk[0], chunk[0], chunk[1]])
                .collect(),
            ColorType::Grayscale => bytes.iter().map(|gray| [*gray, *gray, *gray, 255]).collect(),
            ColorType::Indexed => {
                return Err(Error::UnsupportedImage {
                    message: "indexed PNG was not expanded".to_owned(),
                });
            }
        };

        Self::from_pixels(info.width, info.height, pixels).ok_or_else(|| Error::UnsupportedImage {
            message: format!(
                "PNG data does not cover {}x{} pixels",
                info.width, info.height
            ),
        })
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| (y as usize) * (self.width as usize) + (x as usize))
    }
}

impl OriginDimensions for RasterImage {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for RasterImage {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            self.set_pixel_signed(coord.x, coord.y, [color.r(), color.g(), color.b(), 255]);
        }
        Ok(())
    }
}
