//! Physical panel settings: size, pitch, LED color, brightness and pixel look.

use serde::{Deserialize, Serialize};

use crate::bounds::{clamp_aging_percent, clamp_percent, clamp_pitch_ratio, validate_dimensions};
use crate::color::{AMBER, GREEN, RED, RGB8};

/// LED center-to-center spacing category.
///
/// Tighter pitches pack more LEDs per panel unit (a larger resolution
/// multiplier) and leave less visible gap between dots (a larger ratio).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pitch {
    /// 2.5 mm.
    P2_5,
    /// 3 mm.
    P3,
    /// 4 mm.
    P4,
    /// 5 mm.
    P5,
    /// 6 mm.
    P6,
    /// 8 mm.
    P8,
    /// 10 mm.
    #[default]
    P10,
    /// Caller-supplied ratio, see [`DisplaySettings::custom_pitch_ratio`].
    Custom,
}

impl Pitch {
    /// Every preset from tightest to loosest, followed by `Custom`.
    pub const ALL: [Self; 8] = [
        Self::P2_5,
        Self::P3,
        Self::P4,
        Self::P5,
        Self::P6,
        Self::P8,
        Self::P10,
        Self::Custom,
    ];

    /// Dot diameter as a fraction of the cell, or `None` for `Custom`.
    #[must_use]
    pub const fn preset_ratio(self) -> Option<f32> {
        match self {
            Self::P2_5 => Some(0.90),
            Self::P3 => Some(0.85),
            Self::P4 => Some(0.80),
            Self::P5 => Some(0.75),
            Self::P6 => Some(0.70),
            Self::P8 => Some(0.60),
            Self::P10 => Some(0.50),
            Self::Custom => None,
        }
    }

    /// Logical LEDs per panel pixel along each axis.
    #[must_use]
    pub const fn resolution_multiplier(self) -> u32 {
        match self {
            Self::P2_5 => 4,
            Self::P3 => 3,
            Self::P4 | Self::P5 | Self::P6 => 2,
            Self::P8 | Self::P10 | Self::Custom => 1,
        }
    }
}

/// Which color the lit LEDs emit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedColorMode {
    /// Single-hue amber, `(255, 176, 0)`.
    #[default]
    Amber,
    /// Single-hue red, `(255, 0, 0)`.
    Red,
    /// Single-hue green, `(0, 255, 0)`.
    Green,
    /// Multi-channel: each cell shows its content color.
    FullColor,
}

impl LedColorMode {
    /// The fixed hue, or `None` for [`Self::FullColor`].
    #[must_use]
    pub const fn hue(self) -> Option<RGB8> {
        match self {
            Self::Amber => Some(AMBER),
            Self::Red => Some(RED),
            Self::Green => Some(GREEN),
            Self::FullColor => None,
        }
    }
}

/// Shape each LED dot is drawn with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelShape {
    /// Circular dots.
    #[default]
    Round,
    /// Square dots.
    Square,
}

/// Everything the renderer needs to know about the physical panel.
///
/// The logical resolution is derived: [`width`](Self::width) and
/// [`height`](Self::height) multiply the panel size by the pitch multiplier on
/// every call and are never stored, so they cannot drift out of sync.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplaySettings {
    /// Panel width before the pitch multiplier.
    pub panel_width: u32,
    /// Panel height before the pitch multiplier.
    pub panel_height: u32,
    /// Pitch preset.
    pub pitch: Pitch,
    /// Dot ratio used when `pitch` is [`Pitch::Custom`], clamped to `[0.3, 0.95]`.
    pub custom_pitch_ratio: f32,
    /// LED color.
    pub color_mode: LedColorMode,
    /// 0–100.
    pub brightness: u8,
    /// 0–100; 100 is a black background.
    pub background_darkness: u8,
    /// Output pixels per LED cell edge.
    pub pixel_size: u32,
    /// Dot shape.
    pub pixel_shape: PixelShape,
    /// Swap which logical state gets the LED color.
    pub invert_colors: bool,
    /// Simulated failed LEDs, 0–5 percent.
    pub aging_percent: f32,
    /// Extra pixels between glyphs.
    pub letter_spacing: i32,
    /// Extra pixels between text lines.
    pub line_spacing: u32,
    /// Binarization threshold for imported art, 0–100.
    pub threshold_percent: u8,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            panel_width: 96,
            panel_height: 16,
            pitch: Pitch::P10,
            custom_pitch_ratio: 0.75,
            color_mode: LedColorMode::Amber,
            brightness: 100,
            background_darkness: 100,
            pixel_size: 8,
            pixel_shape: PixelShape::Round,
            invert_colors: false,
            aging_percent: 0.0,
            letter_spacing: 0,
            line_spacing: 0,
            threshold_percent: 50,
        }
    }
}

impl DisplaySettings {
    /// Logical width in LEDs: `panel_width × multiplier`.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.panel_width.saturating_mul(self.pitch.resolution_multiplier())
    }

    /// Logical height in LEDs: `panel_height × multiplier`.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.panel_height.saturating_mul(self.pitch.resolution_multiplier())
    }

    /// Change the panel size; the derived resolution follows automatically.
    pub const fn set_panel_size(&mut self, panel_width: u32, panel_height: u32) {
        self.panel_width = panel_width;
        self.panel_height = panel_height;
    }

    /// Change the pitch; the derived resolution follows automatically.
    pub const fn set_pitch(&mut self, pitch: Pitch) {
        self.pitch = pitch;
    }

    /// Dot diameter as a fraction of the cell edge.
    #[must_use]
    pub fn pitch_ratio(&self) -> f32 {
        self.pitch
            .preset_ratio()
            .unwrap_or_else(|| clamp_pitch_ratio(self.custom_pitch_ratio))
    }

    /// Gap and unlit-cell color derived from `background_darkness`.
    ///
    /// Darkness 100 is black; darkness 0 is a dark gray of level 64.
    #[must_use]
    pub fn background_color(&self) -> RGB8 {
        let lightness = 100 - u16::from(clamp_percent(self.background_darkness));
        let level = (lightness * 64 / 100) as u8;
        RGB8::new(level, level, level)
    }

    /// Bring every bounded field back into range.
    ///
    /// Used after deserializing a profile so that hand-edited documents cannot
    /// push the renderer outside its supported domain.
    pub fn normalize(&mut self) {
        let defaults = Self::default();
        let dimensions = validate_dimensions(
            i64::from(self.panel_width),
            i64::from(self.panel_height),
            defaults.panel_width,
            defaults.panel_height,
        );
        if !dimensions.is_valid() {
            log::warn!(
                "panel size {}x{} out of range, using {:?}",
                self.panel_width,
                self.panel_height,
                dimensions.value()
            );
        }
        (self.panel_width, self.panel_height) = dimensions.value();
        self.custom_pitch_ratio = clamp_pitch_ratio(self.custom_pitch_ratio);
        self.brightness = clamp_percent(self.brightness);
        self.background_darkness = clamp_percent(self.background_darkness);
        self.threshold_percent = clamp_percent(self.threshold_percent);
        self.aging_percent = clamp_aging_percent(self.aging_percent);
        self.pixel_size = self.pixel_size.max(1);
    }
}
