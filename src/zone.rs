//! Horizontal zones that split the panel into side-by-side content areas.

use serde::{Deserialize, Serialize};

use crate::text::HorizontalAlign;

const TOTAL_PERCENT: f32 = 100.0;

/// What a zone shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneContent {
    /// Static or scrolling text.
    #[default]
    Text,
    /// Current time.
    Clock,
    /// Current date.
    Date,
    /// Time remaining to a target.
    Countdown,
}

/// Marquee direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScrollDirection {
    /// Content enters on the right and leaves on the left.
    #[default]
    Left,
    /// Content enters on the left and leaves on the right.
    Right,
}

/// Marquee scrolling for content wider than its zone.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrollSettings {
    /// Scroll at all.
    pub enabled: bool,
    /// Travel direction.
    pub direction: ScrollDirection,
    /// Pixels per second.
    pub speed: f32,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            direction: ScrollDirection::Left,
            speed: 20.0,
        }
    }
}

impl ScrollSettings {
    /// Left edge of the content, relative to the viewport, after `elapsed_seconds`.
    ///
    /// The content starts fully outside the viewport on the entry side, crosses
    /// it, leaves completely, and repeats. Returns `None` when scrolling is
    /// disabled or the speed is not positive.
    #[must_use]
    pub fn offset_at(&self, elapsed_seconds: f32, content_width: u32, viewport_width: u32) -> Option<i32> {
        if !self.enabled || !is_positive(self.speed) {
            return None;
        }
        let cycle = i64::from(content_width) + i64::from(viewport_width);
        if cycle == 0 {
            return Some(0);
        }
        let traveled = ((f64::from(elapsed_seconds.max(0.0)) * f64::from(self.speed)).floor() as i64)
            .rem_euclid(cycle);
        let offset = match self.direction {
            ScrollDirection::Left => i64::from(viewport_width) - traveled,
            ScrollDirection::Right => traveled - i64::from(content_width),
        };
        Some(offset as i32)
    }
}

/// One horizontal slice of the panel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Zone {
    /// Position from the left, `0..N`.
    pub index: usize,
    /// Share of the panel width; all zones sum to 100.
    pub width_percent: f32,
    /// Content kind.
    pub content: ZoneContent,
    /// Text for [`ZoneContent::Text`].
    pub text: String,
    /// Placement of content narrower than the zone.
    pub alignment: HorizontalAlign,
    /// Marquee settings for content wider than the zone.
    pub scroll: ScrollSettings,
}

impl Default for Zone {
    fn default() -> Self {
        Self {
            index: 0,
            width_percent: TOTAL_PERCENT,
            content: ZoneContent::Text,
            text: String::new(),
            alignment: HorizontalAlign::Center,
            scroll: ScrollSettings::default(),
        }
    }
}

/// An ordered set of zones whose widths always add up to 100%.
///
/// After every mutation indices run `0..N` and no width is zero or negative.
/// Rejected mutations return `false` and leave the layout untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Zone>", into = "Vec<Zone>")]
pub struct ZoneLayout {
    zones: Vec<Zone>,
}

impl Default for ZoneLayout {
    fn default() -> Self {
        Self {
            zones: vec![Zone::default()],
        }
    }
}

impl From<Vec<Zone>> for ZoneLayout {
    fn from(mut zones: Vec<Zone>) -> Self {
        if zones.is_empty() {
            return Self::default();
        }
        let fallback = TOTAL_PERCENT / zones.len() as f32;
        for zone in &mut zones {
            if !is_positive(zone.width_percent) {
                zone.width_percent = fallback;
            }
        }
        let mut layout = Self { zones };
        layout.normalize();
        layout
    }
}

impl From<ZoneLayout> for Vec<Zone> {
    fn from(layout: ZoneLayout) -> Self {
        layout.zones
    }
}

impl ZoneLayout {
    /// Zones from left to right.
    #[must_use]
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Zone at `index`.
    #[must_use]
    pub fn zone(&self, index: usize) -> Option<&Zone> {
        self.zones.get(index)
    }

    /// Mutable zone at `index`. Width changes must go through [`Self::set_zone_width`].
    pub fn zone_mut(&mut self, index: usize) -> Option<&mut Zone> {
        self.zones.get_mut(index)
    }

    /// Number of zones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Always `false` for a layout built through this API.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Append a zone on the right, then rescale all widths to sum to 100.
    pub fn add_zone(&mut self, width_percent: f32, content: ZoneContent) -> bool {
        if !is_positive(width_percent) {
            return false;
        }
        self.zones.push(Zone {
            width_percent,
            content,
            ..Zone::default()
        });
        self.normalize();
        true
    }

    /// Remove a zone. The last remaining zone cannot be removed.
    pub fn remove_zone(&mut self, index: usize) -> bool {
        if index >= self.zones.len() || self.zones.len() == 1 {
            return false;
        }
        self.zones.remove(index);
        self.normalize();
        true
    }

    /// Give one zone `width_percent` and share the rest among the others proportionally.
    ///
    /// With several zones the width must be below 100 so every other zone keeps
    /// a positive share. A single zone always spans 100%.
    pub fn set_zone_width(&mut self, index: usize, width_percent: f32) -> bool {
        if index >= self.zones.len() || !is_positive(width_percent) {
            return false;
        }
        if self.zones.len() == 1 {
            self.zones[0].width_percent = TOTAL_PERCENT;
            return true;
        }
        if width_percent >= TOTAL_PERCENT {
            return false;
        }

        let others: f32 = self
            .zones
            .iter()
            .enumerate()
            .filter(|(position, _)| *position != index)
            .map(|(_, zone)| zone.width_percent)
            .sum();
        let remaining = TOTAL_PERCENT - width_percent;
        for (position, zone) in self.zones.iter_mut().enumerate() {
            if position == index {
                zone.width_percent = width_percent;
            } else {
                zone.width_percent = zone.width_percent * remaining / others;
            }
        }
        self.fix_residual();
        true
    }

    /// `(x, width)` of each zone on a panel `total_width` pixels wide.
    ///
    /// Edges are rounded from cumulative percentages, so spans tile the panel
    /// exactly with no gaps or overlaps.
    #[must_use]
    pub fn zone_pixel_spans(&self, total_width: u32) -> Vec<(u32, u32)> {
        let mut spans = Vec::with_capacity(self.zones.len());
        let mut cumulative = 0.0f64;
        let mut start = 0u32;
        for (position, zone) in self.zones.iter().enumerate() {
            cumulative += f64::from(zone.width_percent);
            let end = if position + 1 == self.zones.len() {
                total_width
            } else {
                ((cumulative / f64::from(TOTAL_PERCENT)) * f64::from(total_width))
                    .round()
                    .clamp(f64::from(start), f64::from(total_width)) as u32
            };
            spans.push((start, end - start));
            start = end;
        }
        spans
    }

    fn normalize(&mut self) {
        for (index, zone) in self.zones.iter_mut().enumerate() {
            zone.index = index;
        }
        let total: f32 = self.zones.iter().map(|zone| zone.width_percent).sum();
        if total > 0.0 {
            for zone in &mut self.zones {
                zone.width_percent = zone.width_percent * TOTAL_PERCENT / total;
            }
        }
        self.fix_residual();
    }

    /// Put floating-point drift on the last zone so the sum is exactly 100.
    fn fix_residual(&mut self) {
        let Some((last, rest)) = self.zones.split_last_mut() else {
            return;
        };
        let rest_total: f32 = rest.iter().map(|zone| zone.width_percent).sum();
        let residual = TOTAL_PERCENT - rest_total;
        if residual > 0.0 {
            last.width_percent = residual;
        }
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
