//! Transition frames between two logical matrices.

use crate::matrix::LedMatrix;
use crate::program::TransitionKind;

/// 4×4 ordered-dither thresholds used by the dissolve.
const BAYER_4X4: [[u8; 4]; 4] = [[0, 8, 2, 10], [12, 4, 14, 6], [3, 11, 1, 9], [15, 7, 13, 5]];

/// Compose the frame `progress` (0.0–1.0) of the way from `from` to `to`.
///
/// The result has the size of `to`; `from` is read with the same coordinates
/// and cells outside it read as unlit. Progress 0 is `from`, progress 1 is `to`.
#[must_use]
pub fn compose(from: &LedMatrix, to: &LedMatrix, kind: TransitionKind, progress: f32) -> LedMatrix {
    let progress = if progress.is_nan() { 1.0 } else { progress.clamp(0.0, 1.0) };
    let width = to.width();
    let height = to.height();
    let shift_x = (width as f32 * progress).round() as usize;
    let shift_y = (height as f32 * progress).round() as usize;

    let mut frame = LedMatrix::new(width, height);
    for y_index in 0..height {
        for x_index in 0..width {
            let (source, source_x, source_y) = match kind {
                TransitionKind::None => {
                    if progress < 1.0 {
                        (from, x_index, y_index)
                    } else {
                        (to, x_index, y_index)
                    }
                }
                TransitionKind::Fade => {
                    let threshold = f32::from(BAYER_4X4[y_index % 4][x_index % 4]) + 0.5;
                    if threshold < progress * 16.0 {
                        (to, x_index, y_index)
                    } else {
                        (from, x_index, y_index)
                    }
                }
                TransitionKind::SlideLeft => {
                    if x_index + shift_x < width {
                        (from, x_index + shift_x, y_index)
                    } else {
                        (to, x_index + shift_x - width, y_index)
                    }
                }
                TransitionKind::SlideRight => {
                    if x_index >= shift_x {
                        (from, x_index - shift_x, y_index)
                    } else {
                        (to, x_index + width - shift_x, y_index)
                    }
                }
                TransitionKind::SlideUp => {
                    if y_index + shift_y < height {
                        (from, x_index, y_index + shift_y)
                    } else {
                        (to, x_index, y_index + shift_y - height)
                    }
                }
                TransitionKind::SlideDown => {
                    if y_index >= shift_y {
                        (from, x_index, y_index - shift_y)
                    } else {
                        (to, x_index, y_index + height - shift_y)
                    }
                }
                TransitionKind::Wipe => {
                    if x_index < shift_x {
                        (to, x_index, y_index)
                    } else {
                        (from, x_index, y_index)
                    }
                }
            };
            if source.is_lit(source_x, source_y) {
                frame.set_color(x_index, y_index, source.color(source_x, source_y));
            }
        }
    }
    frame
}
