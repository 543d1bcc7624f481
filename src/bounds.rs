//! Validation and clamping for geometry and timing inputs.
//!
//! Out-of-range values are never an error. Resolutions are rejected in favour
//! of the caller's last accepted value; every other bounded quantity is clamped.

use core::ops::RangeInclusive;

/// Smallest accepted panel resolution (pixels).
pub const MIN_RESOLUTION: u32 = 1;
/// Largest accepted panel resolution (pixels).
pub const MAX_RESOLUTION: u32 = 512;

/// Program display time, seconds.
pub const PROGRAM_DURATION_SECONDS: RangeInclusive<u32> = 1..=60;
/// Program transition time, milliseconds.
pub const TRANSITION_DURATION_MS: RangeInclusive<u32> = 200..=1000;
/// Time each intermediate stop is shown, seconds.
pub const STOP_DURATION_SECONDS: RangeInclusive<f32> = 0.5..=10.0;
/// Stop change animation time, milliseconds.
pub const STOP_ANIMATION_MS: RangeInclusive<u32> = 100..=500;
/// Text stroke width, pixels.
pub const STROKE_WIDTH: RangeInclusive<u32> = 1..=3;
/// Simulated failed-pixel share, percent.
pub const AGING_PERCENT: RangeInclusive<f32> = 0.0..=5.0;
/// Custom dot-to-cell ratio.
pub const PITCH_RATIO: RangeInclusive<f32> = 0.3..=0.95;
/// Percent-valued settings (brightness, darkness, threshold).
pub const PERCENT: RangeInclusive<u8> = 0..=100;

/// Outcome of [`validate_resolution`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolutionCheck {
    /// `true` when the input was inside `[MIN_RESOLUTION, MAX_RESOLUTION]`.
    pub is_valid: bool,
    /// The value to use: the input when valid, otherwise the last accepted value.
    pub value: u32,
    /// `true` when `value` differs from what the caller typed.
    pub was_corrected: bool,
    /// Human-readable reason when the input was rejected.
    pub error_message: Option<String>,
}

/// Outcome of [`validate_dimensions`]; each axis is checked independently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DimensionsCheck {
    /// Width result.
    pub width: ResolutionCheck,
    /// Height result.
    pub height: ResolutionCheck,
}

impl DimensionsCheck {
    /// Both axes accepted as typed.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.width.is_valid && self.height.is_valid
    }

    /// The `(width, height)` pair to use.
    #[must_use]
    pub const fn value(&self) -> (u32, u32) {
        (self.width.value, self.height.value)
    }
}

/// Validate one resolution value, keeping `last_valid` when `value` is out of range.
///
/// ```
/// use tabela_kit::bounds::validate_resolution;
///
/// let check = validate_resolution(513, 128);
/// assert!(!check.is_valid);
/// assert_eq!(check.value, 128);
/// assert!(check.was_corrected);
/// ```
#[must_use]
pub fn validate_resolution(value: i64, last_valid: u32) -> ResolutionCheck {
    let range = i64::from(MIN_RESOLUTION)..=i64::from(MAX_RESOLUTION);
    if range.contains(&value) {
        return ResolutionCheck {
            is_valid: true,
            value: value as u32,
            was_corrected: false,
            error_message: None,
        };
    }
    log::debug!("rejected resolution {value}, keeping {last_valid}");
    ResolutionCheck {
        is_valid: false,
        value: last_valid,
        was_corrected: true,
        error_message: Some(format!(
            "resolution must be between {MIN_RESOLUTION} and {MAX_RESOLUTION}, got {value}"
        )),
    }
}

/// Validate a width/height pair; each axis falls back to its own last value.
#[must_use]
pub fn validate_dimensions(
    width: i64,
    height: i64,
    last_width: u32,
    last_height: u32,
) -> DimensionsCheck {
    DimensionsCheck {
        width: validate_resolution(width, last_width),
        height: validate_resolution(height, last_height),
    }
}

/// Clamp a program duration into [`PROGRAM_DURATION_SECONDS`].
#[must_use]
pub fn clamp_program_duration(seconds: u32) -> u32 {
    clamp_range(seconds, &PROGRAM_DURATION_SECONDS)
}

/// Clamp a program transition duration into [`TRANSITION_DURATION_MS`].
#[must_use]
pub fn clamp_transition_duration(ms: u32) -> u32 {
    clamp_range(ms, &TRANSITION_DURATION_MS)
}

/// Clamp a stop duration into [`STOP_DURATION_SECONDS`]. `NaN` becomes the minimum.
#[must_use]
pub fn clamp_stop_duration(seconds: f32) -> f32 {
    clamp_f32(seconds, &STOP_DURATION_SECONDS)
}

/// Clamp a stop animation duration into [`STOP_ANIMATION_MS`].
#[must_use]
pub fn clamp_stop_animation(ms: u32) -> u32 {
    clamp_range(ms, &STOP_ANIMATION_MS)
}

/// Clamp a stroke width into [`STROKE_WIDTH`].
#[must_use]
pub fn clamp_stroke_width(width: u32) -> u32 {
    clamp_range(width, &STROKE_WIDTH)
}

/// Clamp an aging percentage into [`AGING_PERCENT`].
///
/// Settings use this when storing a value. The aging effect itself treats
/// anything above the ceiling as "off", not as 5%.
#[must_use]
pub fn clamp_aging_percent(percent: f32) -> f32 {
    clamp_f32(percent, &AGING_PERCENT)
}

/// Clamp a custom pitch ratio into [`PITCH_RATIO`].
#[must_use]
pub fn clamp_pitch_ratio(ratio: f32) -> f32 {
    clamp_f32(ratio, &PITCH_RATIO)
}

/// Clamp a percent-valued setting into `0..=100`.
#[must_use]
pub fn clamp_percent(percent: u8) -> u8 {
    clamp_range(percent, &PERCENT)
}

fn clamp_range<T: Ord + Copy>(value: T, range: &RangeInclusive<T>) -> T {
    value.clamp(*range.start(), *range.end())
}

fn clamp_f32(value: f32, range: &RangeInclusive<f32>) -> f32 {
    if value.is_nan() {
        return *range.start();
    }
    value.clamp(*range.start(), *range.end())
}
