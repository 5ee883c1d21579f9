use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("roster has no entries")]
    Empty,

    #[error("roster has {names} names but {images} image paths")]
    LengthMismatch { names: usize, images: usize },
}

//
// ─── ROSTER ENTRY ─────────────────────────────────────────────────────────────
//

/// One creature: its display name and the wiki-relative path of its image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RosterEntry {
    name: String,
    image_path: String,
}

impl RosterEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, image_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_path: image_path.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn image_path(&self) -> &str {
        &self.image_path
    }
}

//
// ─── ROSTER ───────────────────────────────────────────────────────────────────
//

/// Ordered, read-only list of creatures scraped once per launch.
///
/// A roster is never empty, so any index below `len()` is a valid pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    /// # Errors
    ///
    /// Returns `RosterError::Empty` when `entries` is empty.
    pub fn new(entries: Vec<RosterEntry>) -> Result<Self, RosterError> {
        if entries.is_empty() {
            return Err(RosterError::Empty);
        }
        Ok(Self { entries })
    }

    /// Builds a roster from two index-aligned sequences.
    ///
    /// # Errors
    ///
    /// Returns `RosterError::LengthMismatch` when the sequences differ in length
    /// and `RosterError::Empty` when both are empty.
    pub fn from_parallel(names: Vec<String>, images: Vec<String>) -> Result<Self, RosterError> {
        if names.len() != images.len() {
            return Err(RosterError::LengthMismatch {
                names: names.len(),
                images: images.len(),
            });
        }
        let entries = names
            .into_iter()
            .zip(images)
            .map(|(name, image_path)| RosterEntry { name, image_path })
            .collect();
        Self::new(entries)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&RosterEntry> {
        self.entries.get(index)
    }

    #[must_use]
    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(RosterEntry::name)
    }

    pub fn image_paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(RosterEntry::image_path)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
