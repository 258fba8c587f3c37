//! Play queue management.
//!
//! The queue holds songs in insertion order, unique under
//! [`Song::is_same_song`]. It has no cursor of its own: neighbours are looked
//! up relative to whatever song is current.

use super::song::Song;

/// Ordered, identity-unique list of queued songs.
#[derive(Debug, Clone, Default)]
pub struct PlayQueue {
    items: Vec<Song>,
}

impl PlayQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if queue is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get queue length.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Get all items.
    pub fn items(&self) -> &[Song] {
        &self.items
    }

    fn position_of(&self, song: &Song) -> Option<usize> {
        self.items.iter().position(|s| s.is_same_song(song))
    }

    pub fn contains(&self, song: &Song) -> bool {
        self.position_of(song).is_some()
    }

    /// Append a song, dropping any earlier entry with the same identity.
    pub fn add(&mut self, song: Song) {
        self.items.retain(|s| !s.is_same_song(&song));
        self.items.push(song);
    }

    /// Remove every entry matching `song`. Returns whether anything was removed.
    pub fn remove(&mut self, song: &Song) -> bool {
        let before = self.items.len();
        self.items.retain(|s| !s.is_same_song(song));
        self.items.len() != before
    }

    /// Add the song if absent, remove it if present.
    /// Returns `true` when the song is queued afterwards.
    pub fn toggle(&mut self, song: Song) -> bool {
        if self.remove(&song) {
            false
        } else {
            self.add(song);
            true
        }
    }

    /// Swap in an updated record at the position of the matching entry.
    pub fn replace_by_identity(&mut self, song: &Song) -> bool {
        match self.position_of(song) {
            Some(index) => {
                self.items[index] = song.clone();
                true
            }
            None => false,
        }
    }

    /// Entry after `current`, or `None` at the end of the queue or when
    /// `current` is not queued.
    pub fn next_after(&self, current: &Song) -> Option<&Song> {
        let index = self.position_of(current)?;
        self.items.get(index + 1)
    }

    /// Entry before `current`, or `None` at the start of the queue or when
    /// `current` is not queued.
    pub fn previous_before(&self, current: &Song) -> Option<&Song> {
        let index = self.position_of(current)?;
        index.checked_sub(1).and_then(|i| self.items.get(i))
    }

    /// Clear the queue.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl From<Vec<Song>> for PlayQueue {
    fn from(songs: Vec<Song>) -> Self {
        let mut queue = Self::new();
        for song in songs {
            queue.add(song);
        }
        queue
    }
}
