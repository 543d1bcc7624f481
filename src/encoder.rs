//! Hand finished frames to an image writer.
//!
//! [`FrameEncoder`] is the boundary between the renderer and whatever stores
//! its output. [`PngEncoder`] covers previews: single frames as PNG and
//! animations as looping APNG.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use png::{BitDepth, ColorType, Encoder};

use crate::raster::RasterImage;
use crate::{Error, Result};

/// Writes rendered frames somewhere.
pub trait FrameEncoder {
    /// Write one still image.
    ///
    /// # Errors
    ///
    /// Implementations report I/O and encoding failures.
    fn write_image(&self, image: &RasterImage, path: &Path) -> Result<()>;

    /// Write an animation played at `fps` frames per second.
    ///
    /// # Errors
    ///
    /// Implementations report I/O and encoding failures, and
    /// [`Error::EmptyAnimation`] for no frames or a zero frame rate.
    fn write_animation(&self, frames: &[RasterImage], fps: u16, path: &Path) -> Result<()>;
}

/// PNG stills and looping APNG animations, 8-bit RGBA.
#[derive(Clone, Copy, Debug, Default)]
pub struct PngEncoder;

impl FrameEncoder for PngEncoder {
    fn write_image(&self, image: &RasterImage, path: &Path) -> Result<()> {
        write_png(image, path)
    }

    fn write_animation(&self, frames: &[RasterImage], fps: u16, path: &Path) -> Result<()> {
        write_apng(frames, fps, path)
    }
}

/// Write one image as an RGBA PNG file, creating parent directories.
///
/// # Errors
///
/// Returns [`Error::Io`] or [`Error::PngEncode`].
pub fn write_png(image: &RasterImage, path: &Path) -> Result<()> {
    let file = create_output(path)?;
    encode_png(image, BufWriter::new(file))?;
    log::info!("wrote PNG to {}", path.display());
    Ok(())
}

/// Encode one image as an RGBA PNG into `writer`.
///
/// # Errors
///
/// Returns [`Error::PngEncode`].
pub fn encode_png<W: Write>(image: &RasterImage, writer: W) -> Result<()> {
    let (width, height) = png_size(image);
    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&padded_rgba(image))?;
    png_writer.finish()?;
    Ok(())
}

/// Write frames as a looping APNG file, creating parent directories.
///
/// Every frame is shown for `1 / fps` seconds.
///
/// # Errors
///
/// Returns [`Error::EmptyAnimation`] for no frames or `fps == 0`,
/// [`Error::UnsupportedImage`] when frame sizes differ, and [`Error::Io`] or
/// [`Error::PngEncode`] when writing fails.
pub fn write_apng(frames: &[RasterImage], fps: u16, path: &Path) -> Result<()> {
    let Some(first) = frames.first() else {
        return Err(Error::EmptyAnimation);
    };
    if fps == 0 {
        return Err(Error::EmptyAnimation);
    }
    let (width, height) = (first.width(), first.height());
    if let Some(mismatch) = frames
        .iter()
        .find(|frame| frame.width() != width || frame.height() != height)
    {
        return Err(Error::UnsupportedImage {
            message: format!(
                "animation frames must share one size: {width}x{height} vs {}x{}",
                mismatch.width(),
                mismatch.height()
            ),
        });
    }
    let frame_count = u32::try_from(frames.len()).map_err(|_| Error::UnsupportedImage {
        message: format!("{} frames exceed the APNG frame limit", frames.len()),
    })?;

    let file = create_output(path)?;
    let (png_width, png_height) = png_size(first);
    let mut encoder = Encoder::new(BufWriter::new(file), png_width, png_height);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_animated(frame_count, 0)?;
    let mut writer = encoder.write_header()?;
    for frame in frames {
        writer.set_frame_delay(1, fps)?;
        writer.write_image_data(&padded_rgba(frame))?;
    }
    writer.finish()?;
    log::info!("wrote {frame_count}-frame APNG to {}", path.display());
    Ok(())
}

fn create_output(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(File::create(path)?)
}

/// PNG cannot store zero-sized images; empty rasters become one transparent pixel.
fn png_size(image: &RasterImage) -> (u32, u32) {
    if image.width() == 0 || image.height() == 0 {
        (1, 1)
    } else {
        (image.width(), image.height())
    }
}

fn padded_rgba(image: &RasterImage) -> Vec<u8> {
    if image.width() == 0 || image.height() == 0 {
        vec![0; 4]
    } else {
        image.to_rgba_bytes()
    }
}
