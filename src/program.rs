//! Programs, content items and intermediate-stop settings.
//!
//! Setters clamp into the ranges from [`crate::bounds`]; [`TabelaProgram::normalize`]
//! does the same for values that arrived through deserialization.

use serde::{Deserialize, Serialize};

use crate::bounds::{
    clamp_program_duration, clamp_stop_animation, clamp_stop_duration, clamp_stroke_width,
    clamp_transition_duration,
};
use crate::color::{AMBER, RGB8};
use crate::text::{HorizontalAlign, TextStyle, VerticalAlign};

/// Animation played when the display switches programs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionKind {
    /// Cut.
    #[default]
    None,
    /// Dissolve from the old content to the new.
    Fade,
    /// New content pushes in from the right.
    SlideLeft,
    /// New content pushes in from the left.
    SlideRight,
    /// New content pushes in from the bottom.
    SlideUp,
    /// New content pushes in from the top.
    SlideDown,
    /// New content is revealed left to right.
    Wipe,
}

/// Animation played when an item moves to its next stop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StopAnimation {
    /// Cut.
    #[default]
    None,
    /// Dissolve.
    Fade,
    /// Next stop pushes in from the bottom.
    SlideUp,
    /// Next stop pushes in from the right.
    SlideLeft,
}

impl StopAnimation {
    /// The program transition that draws this animation.
    #[must_use]
    pub const fn as_transition(self) -> TransitionKind {
        match self {
            Self::None => TransitionKind::None,
            Self::Fade => TransitionKind::Fade,
            Self::SlideUp => TransitionKind::SlideUp,
            Self::SlideLeft => TransitionKind::SlideLeft,
        }
    }
}

/// Rotation of short texts ("stops") inside a single item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntermediateStopSettings {
    /// Rotate at all.
    pub is_enabled: bool,
    /// Texts to rotate through.
    pub stops: Vec<String>,
    /// Seconds per stop, 0.5–10.
    pub duration_seconds: f32,
    /// Split the program duration evenly across the stops instead.
    pub auto_calculate_duration: bool,
    /// Animation between stops.
    pub animation: StopAnimation,
    /// Animation length, 100–500 ms.
    pub animation_duration_ms: u32,
}

impl Default for IntermediateStopSettings {
    fn default() -> Self {
        Self {
            is_enabled: false,
            stops: Vec::new(),
            duration_seconds: 2.0,
            auto_calculate_duration: false,
            animation: StopAnimation::None,
            animation_duration_ms: 300,
        }
    }
}

impl IntermediateStopSettings {
    /// Enabled and non-empty.
    #[must_use]
    pub fn has_intermediate_stops(&self) -> bool {
        self.is_enabled && !self.stops.is_empty()
    }

    /// Seconds each stop stays on screen within a program of `program_duration_seconds`.
    ///
    /// With auto-calculation the program time is split evenly across the stops;
    /// otherwise the configured duration applies.
    #[must_use]
    pub fn effective_duration(&self, program_duration_seconds: u32) -> f32 {
        if self.auto_calculate_duration && !self.stops.is_empty() {
            program_duration_seconds as f32 / self.stops.len() as f32
        } else {
            self.duration_seconds
        }
    }

    /// Set seconds per stop, clamped to 0.5–10.
    pub fn set_duration_seconds(&mut self, seconds: f32) {
        self.duration_seconds = clamp_stop_duration(seconds);
    }

    /// Set the animation length, clamped to 100–500 ms.
    pub fn set_animation_duration_ms(&mut self, ms: u32) {
        self.animation_duration_ms = clamp_stop_animation(ms);
    }

    /// Clamp every bounded field.
    pub fn normalize(&mut self) {
        self.duration_seconds = clamp_stop_duration(self.duration_seconds);
        self.animation_duration_ms = clamp_stop_animation(self.animation_duration_ms);
    }
}

/// Content source of an item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum ItemKind {
    /// The item's `text`, or its current stop.
    #[default]
    Text,
    /// `HH:MM` local time.
    Clock,
    /// `DD.MM.YYYY`.
    Date,
    /// Time left until a moment, `H:MM:SS`.
    Countdown {
        /// Target as a Unix timestamp.
        target_unix_seconds: i64,
    },
}

/// One piece of content inside a program.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TabelaItem {
    /// Unique within the program; keys the stop clock.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Content source.
    pub kind: ItemKind,
    /// Text for [`ItemKind::Text`] items without stops.
    pub text: String,
    /// Text color (used by full-color panels).
    #[serde(with = "crate::color::hex")]
    pub color: RGB8,
    /// Left edge in logical pixels.
    pub x: i32,
    /// Top edge in logical pixels.
    pub y: i32,
    /// Width in logical pixels; 0 extends to the right edge.
    pub width: u32,
    /// Height in logical pixels; 0 extends to the bottom edge.
    pub height: u32,
    /// Zone whose span replaces `x`/`width`.
    pub zone: Option<usize>,
    /// Horizontal alignment inside the item box.
    pub h_align: HorizontalAlign,
    /// Vertical alignment inside the item box.
    pub v_align: VerticalAlign,
    /// Background and stroke.
    pub style: TextStyle,
    /// Intermediate stops.
    pub stops: IntermediateStopSettings,
}

impl Default for TabelaItem {
    fn default() -> Self {
        Self {
            id: 1,
            name: String::new(),
            kind: ItemKind::Text,
            text: String::new(),
            color: AMBER,
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            zone: None,
            h_align: HorizontalAlign::Center,
            v_align: VerticalAlign::Middle,
            style: TextStyle::default(),
            stops: IntermediateStopSettings::default(),
        }
    }
}

impl TabelaItem {
    /// A text item filling the display.
    #[must_use]
    pub fn text(id: u32, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            ..Self::default()
        }
    }
}

/// A timed screen of content items.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TabelaProgram {
    /// Unique within a profile.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Seconds on screen, 1–60.
    pub duration_seconds: u32,
    /// Animation when this program comes on screen.
    pub transition: TransitionKind,
    /// Animation length, 200–1000 ms.
    pub transition_duration_ms: u32,
    /// Items drawn in order; later items draw over earlier ones.
    pub items: Vec<TabelaItem>,
}

impl Default for TabelaProgram {
    fn default() -> Self {
        Self {
            id: 1,
            name: "Program 1".to_owned(),
            duration_seconds: 10,
            transition: TransitionKind::None,
            transition_duration_ms: 500,
            items: Vec::new(),
        }
    }
}

impl TabelaProgram {
    /// Program with default timing and no items.
    #[must_use]
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set seconds on screen, clamped to 1–60.
    pub fn set_duration_seconds(&mut self, seconds: u32) {
        self.duration_seconds = clamp_program_duration(seconds);
    }

    /// Set the transition length, clamped to 200–1000 ms.
    pub fn set_transition_duration_ms(&mut self, ms: u32) {
        self.transition_duration_ms = clamp_transition_duration(ms);
    }

    /// Item with `id`.
    #[must_use]
    pub fn item(&self, id: u32) -> Option<&TabelaItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Clamp every bounded field, including those of nested items.
    pub fn normalize(&mut self) {
        self.duration_seconds = clamp_program_duration(self.duration_seconds);
        self.transition_duration_ms = clamp_transition_duration(self.transition_duration_ms);
        for item in &mut self.items {
            item.style.stroke_width = clamp_stroke_width(item.style.stroke_width);
            item.stops.normalize();
        }
    }
}
