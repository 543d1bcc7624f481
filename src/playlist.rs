//! A simple timed rotation of text items.

use serde::{Deserialize, Serialize};

use crate::program::TransitionKind;

/// One entry of a [`Playlist`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaylistItem {
    /// Text shown while the item is current.
    pub text: String,
    /// Display time in seconds, as supplied by the caller.
    pub duration_seconds: f32,
    /// Transition into this item.
    pub transition: TransitionKind,
    /// 1-based position, maintained by the playlist.
    pub order: usize,
}

impl Default for PlaylistItem {
    fn default() -> Self {
        Self {
            text: String::new(),
            duration_seconds: 5.0,
            transition: TransitionKind::None,
            order: 0,
        }
    }
}

impl PlaylistItem {
    /// Item with the default transition.
    #[must_use]
    pub fn new(text: impl Into<String>, duration_seconds: f32) -> Self {
        Self {
            text: text.into(),
            duration_seconds,
            ..Self::default()
        }
    }
}

/// Ordered items with a current position.
///
/// With looping, `next`/`previous` wrap around; without, they stop at the ends.
/// Every mutation renumbers `order` to `1..=N`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<PlaylistItem>", into = "Vec<PlaylistItem>")]
pub struct Playlist {
    items: Vec<PlaylistItem>,
    current_index: usize,
    is_looping: bool,
    elapsed_seconds: f32,
}

impl Default for Playlist {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_index: 0,
            is_looping: true,
            elapsed_seconds: 0.0,
        }
    }
}

impl From<Vec<PlaylistItem>> for Playlist {
    fn from(items: Vec<PlaylistItem>) -> Self {
        let mut playlist = Self {
            items,
            ..Self::default()
        };
        playlist.renumber();
        playlist
    }
}

impl From<Playlist> for Vec<PlaylistItem> {
    fn from(playlist: Playlist) -> Self {
        playlist.items
    }
}

impl Playlist {
    /// Empty looping playlist.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Items in play order.
    #[must_use]
    pub fn items(&self) -> &[PlaylistItem] {
        &self.items
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` when there are no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of the current item.
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    /// The current item, `None` when empty.
    #[must_use]
    pub fn current(&self) -> Option<&PlaylistItem> {
        self.items.get(self.current_index)
    }

    /// Whether `next`/`previous` wrap.
    #[must_use]
    pub const fn is_looping(&self) -> bool {
        self.is_looping
    }

    /// Turn wrapping on or off.
    pub const fn set_looping(&mut self, is_looping: bool) {
        self.is_looping = is_looping;
    }

    /// Append an item.
    pub fn add_item(&mut self, item: PlaylistItem) {
        self.items.push(item);
        self.renumber();
    }

    /// Remove the item at `index`.
    pub fn remove_item(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        self.items.remove(index);
        if self.current_index > index || self.current_index >= self.items.len() {
            self.current_index = self.current_index.saturating_sub(1);
        }
        self.renumber();
        true
    }

    /// Move the item at `from` so it ends up at `to`; the current item stays current.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        if from >= self.items.len() || to >= self.items.len() {
            return false;
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        let current = self.current_index;
        self.current_index = if current == from {
            to
        } else if from < current && current <= to {
            current - 1
        } else if to <= current && current < from {
            current + 1
        } else {
            current
        };
        self.renumber();
        true
    }

    /// Jump to `index`, restarting its display time.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        self.current_index = index;
        self.elapsed_seconds = 0.0;
        true
    }

    /// Advance one item. Returns `false` when already at the end without looping
    /// or when empty.
    pub fn next(&mut self) -> bool {
        let count = self.items.len();
        if count == 0 {
            return false;
        }
        self.elapsed_seconds = 0.0;
        if self.current_index + 1 < count {
            self.current_index += 1;
            true
        } else if self.is_looping {
            self.current_index = 0;
            true
        } else {
            false
        }
    }

    /// Step back one item. Returns `false` when already at the start without
    /// looping or when empty.
    pub fn previous(&mut self) -> bool {
        let count = self.items.len();
        if count == 0 {
            return false;
        }
        self.elapsed_seconds = 0.0;
        if self.current_index > 0 {
            self.current_index -= 1;
            true
        } else if self.is_looping {
            self.current_index = count - 1;
            true
        } else {
            false
        }
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
        self.current_index = 0;
        self.elapsed_seconds = 0.0;
    }

    /// Advance time; moves to the next item once the current one's duration is
    /// used up. Surplus time is discarded. Returns `true` when the item changed.
    pub fn on_tick(&mut self, dt_seconds: f32) -> bool {
        let Some(duration) = self.current().map(|item| item.duration_seconds) else {
            return false;
        };
        self.elapsed_seconds += dt_seconds.max(0.0);
        if self.elapsed_seconds < duration {
            return false;
        }
        self.elapsed_seconds = 0.0;
        let moved = self.next();
        if moved {
            log::debug!("playlist advanced to item {}", self.current_index);
        }
        moved
    }

    fn renumber(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.order = index + 1;
        }
    }
}
