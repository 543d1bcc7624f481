//! The signboard compositor: scheduler, text and renderer wired into frames.

use time::{Duration, OffsetDateTime};

use crate::Result;
use crate::color::WHITE;
use crate::font::{BitmapFont, validate_font};
use crate::matrix::{LedMatrix, apply_aging_effect};
use crate::playlist::Playlist;
use crate::profile::{DisplayMode, Profile};
use crate::program::{ItemKind, TabelaItem, TabelaProgram, TransitionKind};
use crate::raster::RasterImage;
use crate::render::render_matrix;
use crate::scheduler::ProgramScheduler;
use crate::text::{
    HorizontalAlign, TextLayout, VerticalAlign, align_2d, apply_text_style, render_multiline,
};
use crate::transition::compose;

/// Aging seed used until [`Signboard::set_aging_seed`] is called.
pub const DEFAULT_AGING_SEED: u64 = 0x7AB3_1A00;

const PLAYLIST_TRANSITION_SECONDS: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
struct PlaylistTransition {
    from_index: usize,
    kind: TransitionKind,
    elapsed_seconds: f32,
}

/// Rectangle of the logical matrix an item draws into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ItemBox {
    x: i32,
    y: i32,
    width: usize,
    height: usize,
}

/// A running signboard.
///
/// Feed it time with [`on_tick`](Self::on_tick) and ask for frames with
/// [`render_frame`](Self::render_frame). Clock, date and countdown items are
/// formatted from the `now` passed to the render calls, so output is fully
/// reproducible for a given profile, font, seed and time.
#[derive(Clone, Debug)]
pub struct Signboard {
    profile: Profile,
    scheduler: ProgramScheduler,
    playlist: Playlist,
    font: BitmapFont,
    aging_seed: u64,
    playlist_transition: Option<PlaylistTransition>,
}

impl Signboard {
    /// Build a playing signboard for `profile`, drawing text with `font`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidFont`] when the font cannot draw text.
    pub fn new(mut profile: Profile, font: BitmapFont) -> Result<Self> {
        validate_font(&font)?;
        profile.normalize();
        let mut scheduler = ProgramScheduler::new(profile.programs.clone(), true);
        scheduler.play();
        let playlist = profile.playlist.clone();
        Ok(Self {
            profile,
            scheduler,
            playlist,
            font,
            aging_seed: DEFAULT_AGING_SEED,
            playlist_transition: None,
        })
    }

    /// The profile being shown.
    #[must_use]
    pub const fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Program playback state.
    #[must_use]
    pub const fn scheduler(&self) -> &ProgramScheduler {
        &self.scheduler
    }

    /// Program playback control.
    pub const fn scheduler_mut(&mut self) -> &mut ProgramScheduler {
        &mut self.scheduler
    }

    /// Playlist playback state.
    #[must_use]
    pub const fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    /// Seed for the aging effect.
    #[must_use]
    pub const fn aging_seed(&self) -> u64 {
        self.aging_seed
    }

    /// Choose which LEDs fail when aging is enabled.
    pub const fn set_aging_seed(&mut self, seed: u64) {
        self.aging_seed = seed;
    }

    /// Advance whichever content source the profile's mode selects.
    pub fn on_tick(&mut self, dt_seconds: f32) {
        match self.profile.mode {
            DisplayMode::Programs => self.scheduler.on_tick(dt_seconds),
            DisplayMode::Playlist => self.tick_playlist(dt_seconds),
        }
    }

    /// The logical matrix on screen at `now`, aging included.
    #[must_use]
    pub fn render_matrix(&self, now: OffsetDateTime) -> LedMatrix {
        let matrix = match self.profile.mode {
            DisplayMode::Programs => self.program_frame(now),
            DisplayMode::Playlist => self.playlist_frame(),
        };
        apply_aging_effect(
            &matrix,
            self.profile.display_settings.aging_percent,
            self.aging_seed,
        )
    }

    /// The rendered panel image at `now`.
    #[must_use]
    pub fn render_frame(&self, now: OffsetDateTime) -> RasterImage {
        render_matrix(&self.render_matrix(now), &self.profile.display_settings)
    }

    /// Render `frame_count` frames at `fps`, ticking between them.
    ///
    /// Frame `i` is rendered at `start + i / fps` seconds.
    pub fn record(&mut self, frame_count: usize, fps: u16, start: OffsetDateTime) -> Vec<RasterImage> {
        let fps = fps.max(1);
        let step = 1.0 / f32::from(fps);
        let mut frames = Vec::with_capacity(frame_count);
        for index in 0..frame_count {
            let offset = Duration::seconds_f64(index as f64 / f64::from(fps));
            frames.push(self.render_frame(start + offset));
            self.on_tick(step);
        }
        log::debug!("recorded {frame_count} frames at {fps} fps");
        frames
    }

    fn panel_size(&self) -> (usize, usize) {
        let settings = &self.profile.display_settings;
        (settings.width() as usize, settings.height() as usize)
    }

    fn program_frame(&self, now: OffsetDateTime) -> LedMatrix {
        let programs = self.scheduler.programs();
        let current = self.scheduler.current_program_index();
        let Some(program) = programs.get(current) else {
            let (width, height) = self.panel_size();
            return LedMatrix::new(width, height);
        };
        let incoming = self.program_matrix(program, now);
        match self.scheduler.active_transition() {
            Some(transition) => {
                let outgoing = programs
                    .get(transition.from_index)
                    .map_or_else(|| incoming.clone(), |from| self.program_matrix(from, now));
                compose(&outgoing, &incoming, transition.kind, transition.progress())
            }
            None => incoming,
        }
    }

    fn program_matrix(&self, program: &TabelaProgram, now: OffsetDateTime) -> LedMatrix {
        let (width, height) = self.panel_size();
        let mut matrix = LedMatrix::new(width, height);
        let is_current = self
            .scheduler
            .current_program()
            .is_some_and(|current| current.id == program.id);
        for item in &program.items {
            let item_box = self.item_box(item);
            let stop_index = self.scheduler.stop_index_in(program.id, item.id);
            let mut content = self.item_matrix(item, item_box, stop_index, now);
            if is_current {
                if let Some(stop) = self.scheduler.stop_transition(item.id) {
                    let outgoing = self.item_matrix(item, item_box, stop.from_index, now);
                    content = compose(
                        &outgoing,
                        &content,
                        stop.animation.as_transition(),
                        stop.progress,
                    );
                }
            }
            matrix.overlay(&content, item_box.x, item_box.y);
        }
        matrix
    }

    fn item_box(&self, item: &TabelaItem) -> ItemBox {
        let (panel_width, panel_height) = self.panel_size();
        let zone_span = item.zone.and_then(|index| {
            self.profile
                .zones
                .zone_pixel_spans(panel_width as u32)
                .get(index)
                .copied()
        });
        let (x, width) = match zone_span {
            Some((start, span)) => (start as i32, span as usize),
            None => {
                let remaining = (panel_width as i32 - item.x).max(0) as usize;
                let width = if item.width == 0 {
                    remaining
                } else {
                    item.width as usize
                };
                (item.x, width)
            }
        };
        let remaining = (panel_height as i32 - item.y).max(0) as usize;
        let height = if item.height == 0 {
            remaining
        } else {
            item.height as usize
        };
        ItemBox {
            x,
            y: item.y,
            width,
            height,
        }
    }

    /// Item content drawn into a matrix the size of its box.
    fn item_matrix(
        &self,
        item: &TabelaItem,
        item_box: ItemBox,
        stop_index: usize,
        now: OffsetDateTime,
    ) -> LedMatrix {
        let mut matrix = LedMatrix::new(item_box.width, item_box.height);
        let text = item_text(item, stop_index, now);
        if text.is_empty() && !item.style.has_background {
            return matrix;
        }
        let settings = &self.profile.display_settings;
        let layout = TextLayout {
            letter_spacing: settings.letter_spacing,
            line_spacing: settings.line_spacing,
            align: item.h_align,
        };
        let block = render_multiline(&self.font, &text, item.color, &layout, item_box.height as u32);
        let image = apply_text_style(&block.image, &item.style);

        let container = (item_box.width as i32, item_box.height as i32);
        let content = (image.width() as i32, image.height() as i32);
        let (mut x, y) = align_2d(item.h_align, item.v_align, container, content);

        let scroll = item
            .zone
            .and_then(|index| self.profile.zones.zone(index))
            .map(|zone| zone.scroll);
        if let Some(scroll) = scroll {
            if content.0 > container.0 {
                if let Some(offset) = scroll.offset_at(
                    self.scheduler.program_elapsed_time(),
                    image.width(),
                    item_box.width as u32,
                ) {
                    x = offset;
                }
            }
        }

        matrix.blit_raster(&image, x, y, (0, 0, container.0, container.1));
        matrix
    }

    fn tick_playlist(&mut self, dt_seconds: f32) {
        let dt = if dt_seconds.is_finite() { dt_seconds.max(0.0) } else { 0.0 };
        if let Some(transition) = self.playlist_transition.as_mut() {
            transition.elapsed_seconds += dt;
            if transition.elapsed_seconds >= PLAYLIST_TRANSITION_SECONDS {
                self.playlist_transition = None;
            }
        }
        let from_index = self.playlist.current_index();
        if self.playlist.on_tick(dt) {
            let kind = self
                .playlist
                .current()
                .map_or(TransitionKind::None, |item| item.transition);
            self.playlist_transition = (kind != TransitionKind::None
                && from_index != self.playlist.current_index())
            .then_some(PlaylistTransition {
                from_index,
                kind,
                elapsed_seconds: 0.0,
            });
        }
    }

    fn playlist_frame(&self) -> LedMatrix {
        let incoming = self.playlist_matrix(self.playlist.current_index());
        match self.playlist_transition {
            Some(transition) => {
                let outgoing = self.playlist_matrix(transition.from_index);
                compose(
                    &outgoing,
                    &incoming,
                    transition.kind,
                    transition.elapsed_seconds / PLAYLIST_TRANSITION_SECONDS,
                )
            }
            None => incoming,
        }
    }

    fn playlist_matrix(&self, index: usize) -> LedMatrix {
        let (width, height) = self.panel_size();
        let mut matrix = LedMatrix::new(width, height);
        let Some(item) = self.playlist.items().get(index) else {
            return matrix;
        };
        let settings = &self.profile.display_settings;
        let layout = TextLayout {
            letter_spacing: settings.letter_spacing,
            line_spacing: settings.line_spacing,
            align: HorizontalAlign::Center,
        };
        let block = render_multiline(&self.font, &item.text, WHITE, &layout, height as u32);
        let container = (width as i32, height as i32);
        let content = (block.image.width() as i32, block.image.height() as i32);
        let (x, y) = align_2d(HorizontalAlign::Center, VerticalAlign::Middle, container, content);
        matrix.blit_raster(&block.image, x, y, (0, 0, container.0, container.1));
        matrix
    }
}

/// Text an item shows at `now` with stop `stop_index` selected.
#[must_use]
pub fn item_text(item: &TabelaItem, stop_index: usize, now: OffsetDateTime) -> String {
    match item.kind {
        ItemKind::Text => {
            if item.stops.has_intermediate_stops() {
                let stops = &item.stops.stops;
                stops[stop_index % stops.len()].clone()
            } else {
                item.text.clone()
            }
        }
        ItemKind::Clock => format_clock(now),
        ItemKind::Date => format_date(now),
        ItemKind::Countdown {
            target_unix_seconds,
        } => format_countdown(target_unix_seconds - now.unix_timestamp()),
    }
}

/// `HH:MM`.
#[must_use]
pub fn format_clock(now: OffsetDateTime) -> String {
    format!("{:02}:{:02}", now.hour(), now.minute())
}

/// `DD.MM.YYYY`.
#[must_use]
pub fn format_date(now: OffsetDateTime) -> String {
    format!("{:02}.{:02}.{:04}", now.day(), u8::from(now.month()), now.year())
}

/// `H:MM:SS` of the remaining seconds; zero once the target has passed.
#[must_use]
pub fn format_countdown(remaining_seconds: i64) -> String {
    let remaining = remaining_seconds.max(0);
    format!(
        "{}:{:02}:{:02}",
        remaining / 3600,
        (remaining / 60) % 60,
        remaining % 60
    )
}
