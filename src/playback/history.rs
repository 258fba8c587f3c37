//! Play history and favorites.

use super::song::Song;

/// Maximum number of history entries kept.
pub const HISTORY_LIMIT: usize = 50;

/// Recently played songs, newest first, unique under [`Song::is_same_song`].
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<Song>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted entries, re-applying dedupe and the cap.
    pub fn from_entries(entries: Vec<Song>) -> Self {
        let mut kept: Vec<Song> = Vec::with_capacity(entries.len().min(HISTORY_LIMIT));
        for song in entries {
            if !kept.iter().any(|s| s.is_same_song(&song)) {
                kept.push(song);
            }
        }
        kept.truncate(HISTORY_LIMIT);
        Self { entries: kept }
    }

    pub fn entries(&self) -> &[Song] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Put `song` at the front, dropping older entries with the same identity.
    pub fn insert(&mut self, song: Song) {
        self.entries.retain(|s| !s.is_same_song(&song));
        self.entries.insert(0, song);
        self.entries.truncate(HISTORY_LIMIT);
    }

    /// Remove every entry matching `song`. Returns whether anything was removed.
    pub fn remove(&mut self, song: &Song) -> bool {
        let before = self.entries.len();
        self.entries.retain(|s| !s.is_same_song(song));
        self.entries.len() != before
    }

}

/// Songs the user marked, in marking order.
#[derive(Debug, Clone, Default)]
pub struct Favorites {
    entries: Vec<Song>,
}

impl Favorites {
    pub fn from_entries(entries: Vec<Song>) -> Self {
        let mut favorites = Self::default();
        for song in entries {
            if !favorites.contains(&song) {
                favorites.entries.push(song);
            }
        }
        favorites
    }

    pub fn entries(&self) -> &[Song] {
        &self.entries
    }

    pub fn contains(&self, song: &Song) -> bool {
        self.entries.iter().any(|s| s.is_same_song(song))
    }

    /// Mark or unmark a song. Returns `true` when it is a favorite afterwards.
    pub fn toggle(&mut self, song: Song) -> bool {
        if self.contains(&song) {
            self.entries.retain(|s| !s.is_same_song(&song));
            false
        } else {
            self.entries.push(song);
            true
        }
    }
}
