//! The profile document: display settings plus all content, stored as camelCase JSON.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::playlist::Playlist;
use crate::program::TabelaProgram;
use crate::settings::DisplaySettings;
use crate::zone::ZoneLayout;

/// Which content source drives the display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayMode {
    /// Scheduled programs.
    #[default]
    Programs,
    /// The simple playlist.
    Playlist,
}

/// A complete signboard configuration.
///
/// A profile always holds at least one program, and program ids are unique.
/// Loading enforces both and clamps every bounded value, so documents from
/// older versions or edited by hand come out usable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    /// Profile name.
    pub name: String,
    /// Panel settings.
    pub display_settings: DisplaySettings,
    /// Programs in play order.
    pub programs: Vec<TabelaProgram>,
    /// Horizontal zones.
    pub zones: ZoneLayout,
    /// Items for [`DisplayMode::Playlist`].
    pub playlist: Playlist,
    /// Free-form values kept for callers, round-tripped untouched.
    pub slots: BTreeMap<String, serde_json::Value>,
    /// Active content source.
    pub mode: DisplayMode,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Default".to_owned(),
            display_settings: DisplaySettings::default(),
            programs: vec![TabelaProgram::default()],
            zones: ZoneLayout::default(),
            playlist: Playlist::default(),
            slots: BTreeMap::new(),
            mode: DisplayMode::Programs,
        }
    }
}

impl Profile {
    /// Parse and normalize a profile document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] when the document does not match the schema.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut profile: Self = serde_json::from_str(json)?;
        profile.normalize();
        Ok(profile)
    }

    /// Read, parse and normalize a profile file.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] or [`crate::Error::Json`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        let profile = Self::from_json_str(&json)?;
        log::info!(
            "loaded profile {:?} from {}: {} programs",
            profile.name,
            path.as_ref().display(),
            profile.programs.len()
        );
        Ok(profile)
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the profile as pretty-printed JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] or [`crate::Error::Json`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Restore the profile invariants and clamp bounded values.
    ///
    /// An empty program list gains the default program (`id = 1`,
    /// `"Program 1"`). Repeated program ids are replaced with fresh ones.
    pub fn normalize(&mut self) {
        self.display_settings.normalize();
        if self.programs.is_empty() {
            log::debug!("profile {:?} has no programs, adding the default", self.name);
            self.programs.push(TabelaProgram::default());
        }
        let mut seen = BTreeSet::new();
        let mut next_id = self.programs.iter().map(|program| program.id).max().unwrap_or(0);
        for program in &mut self.programs {
            if !seen.insert(program.id) {
                next_id += 1;
                program.id = next_id;
                seen.insert(next_id);
            }
            program.normalize();
        }
    }

    /// Program with `id`.
    #[must_use]
    pub fn program(&self, id: u32) -> Option<&TabelaProgram> {
        self.programs.iter().find(|program| program.id == id)
    }

    /// Mutable program with `id`.
    pub fn program_mut(&mut self, id: u32) -> Option<&mut TabelaProgram> {
        self.programs.iter_mut().find(|program| program.id == id)
    }

    /// Append a new program with the next free id and return that id.
    pub fn add_program(&mut self, name: impl Into<String>) -> u32 {
        let id = self.programs.iter().map(|program| program.id).max().unwrap_or(0) + 1;
        self.programs.push(TabelaProgram::new(id, name));
        id
    }

    /// Remove the program with `id`. The last program cannot be removed.
    pub fn remove_program(&mut self, id: u32) -> bool {
        if self.programs.len() <= 1 {
            return false;
        }
        let Some(position) = self.programs.iter().position(|program| program.id == id) else {
            return false;
        };
        self.programs.remove(position);
        true
    }
}
