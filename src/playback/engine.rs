//! Playback resolution engine.
//!
//! Turns a song record into a playable one: fetch its detail through the
//! gateway, enrich it with cover art and lyrics, validate the audio URL and
//! commit the result to the player state.
//!
//! At most one resolution is in flight per engine. Each attempt owns a
//! [`CancellationToken`] and a generation number. Starting a new attempt
//! cancels the previous token, and an attempt that finishes after its
//! generation stopped being current is dropped without touching state.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::history::{Favorites, History};
use super::lyrics::parse_lyric;
use super::manager::{FetchError, ManagerApi};
use super::notifier::{Notifier, OnceFlag, RESUME_NOTICE};
use super::queue::PlayQueue;
use super::request_url;
use super::song::{Lyrics, Song};
use super::storage::{CURRENT_SONG_KEY, FAVORITES_KEY, HISTORY_KEY, Storage};
use crate::error::{Error, Result};
use crate::platform::domain::value_to_string;
use crate::platform::{NormalizedSong, PlatformKey};

/// How long a detail request may take before it is abandoned.
pub const RESOLVE_TIMEOUT: Duration = Duration::from_secs(10);

/// Bitrate requested when nothing else is configured, in kbps.
pub const DEFAULT_QUALITY: u32 = 320;

const TIMEOUT_MESSAGE: &str = "Request timed out, playback failed";
const SECURITY_MESSAGE: &str = "Audio failed to load, please try another song";
const GENERIC_MESSAGE: &str = "Playback failed, please try another song";
const DETAIL_FAILED_MESSAGE: &str = "Failed to get song details";

/// User-facing failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Timed out or cancelled
    Interrupted,
    /// Blocked by a TLS or cross-origin policy
    Security,
    Other,
}

/// Why a resolution ended in `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("request timed out after {}s", RESOLVE_TIMEOUT.as_secs())]
    Timeout,

    #[error("resolution cancelled")]
    Cancelled,

    #[error("blocked by security policy: {0}")]
    Security(String),

    #[error("invalid audio URL: {0:?}")]
    InvalidAudioUrl(String),

    /// The gateway answered with a failure envelope
    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Network(String),
}

impl ResolutionError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Timeout | Self::Cancelled => ErrorClass::Interrupted,
            Self::Security(_) => ErrorClass::Security,
            Self::Upstream(m) | Self::Network(m) if m.contains("CORS") => ErrorClass::Security,
            _ => ErrorClass::Other,
        }
    }

    /// Notice shown to the user. Each class gets its own wording; other
    /// failures keep the underlying message.
    pub fn user_message(&self) -> String {
        match self.class() {
            ErrorClass::Interrupted => TIMEOUT_MESSAGE.to_string(),
            ErrorClass::Security => SECURITY_MESSAGE.to_string(),
            ErrorClass::Other => match self {
                Self::InvalidAudioUrl(_) => "Invalid audio URL".to_string(),
                Self::Upstream(m) | Self::Network(m) if !m.is_empty() => m.clone(),
                _ => GENERIC_MESSAGE.to_string(),
            },
        }
    }
}

impl From<FetchError> for ResolutionError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Network(m) => Self::Network(m),
            FetchError::Security(m) => Self::Security(m),
            FetchError::Decode(m) => Self::Upstream(m),
        }
    }
}

/// Result of a play request that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayOutcome {
    /// The song is now current
    Ready(Song),
    /// A newer request took over; nothing was changed
    Superseded,
}

/// Everything the player shows.
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub current: Option<Song>,
    pub playing: bool,
    /// A resolution is in flight
    pub loading: bool,
    pub search_term: String,
    /// Songs from the last search
    pub results: Vec<Song>,
    pub quality: u32,
    pub history: History,
    pub queue: PlayQueue,
    pub favorites: Favorites,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            current: None,
            playing: false,
            loading: false,
            search_term: String::new(),
            results: Vec::new(),
            quality: DEFAULT_QUALITY,
            history: History::new(),
            queue: PlayQueue::new(),
            favorites: Favorites::default(),
        }
    }
}

struct Inner {
    state: PlayerState,
    generation: u64,
    in_flight: Option<CancellationToken>,
}

impl Inner {
    /// Cancel whatever is in flight and start a new generation.
    fn supersede(&mut self) -> u64 {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }
        self.generation += 1;
        self.generation
    }
}

struct Attempt {
    generation: u64,
    token: CancellationToken,
}

/// Resolves and plays songs, and owns queue, history and favorites.
pub struct PlaybackEngine {
    manager: Arc<dyn ManagerApi>,
    notifier: Arc<dyn Notifier>,
    storage: Option<Arc<dyn Storage>>,
    default_platform: PlatformKey,
    resume_notice: &'static OnceFlag,
    inner: Mutex<Inner>,
}

impl PlaybackEngine {
    pub fn new(manager: Arc<dyn ManagerApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            manager,
            notifier,
            storage: None,
            default_platform: PlatformKey::default(),
            resume_notice: &RESUME_NOTICE,
            inner: Mutex::new(Inner {
                state: PlayerState::default(),
                generation: 0,
                in_flight: None,
            }),
        }
    }

    /// Persist current song, history and favorites to `storage`.
    pub fn with_storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Provider for searches and for songs that carry no request URL.
    pub fn with_default_platform(mut self, platform: PlatformKey) -> Self {
        self.default_platform = platform;
        self
    }

    pub fn with_quality(self, quality: u32) -> Self {
        self.inner.lock().state.quality = quality;
        self
    }

    /// Flag guarding the "last played" notice. Defaults to the process-wide one.
    #[cfg(test)]
    pub fn with_resume_notice(mut self, flag: &'static OnceFlag) -> Self {
        self.resume_notice = flag;
        self
    }

    // ============ Search ============

    /// Search the gateway and turn the hits into playable candidates.
    ///
    /// A blank term is a no-op.
    pub async fn search(&self, term: &str, platform: Option<PlatformKey>) -> Result<Vec<Song>> {
        if term.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.inner.lock().state.search_term = term.to_string();

        let platform = platform.unwrap_or(self.default_platform);
        let url = request_url::search_url(platform, term);

        let outcome = match tokio::time::timeout(RESOLVE_TIMEOUT, self.manager.fetch(&url)).await {
            Err(_) => Err("request timed out".to_string()),
            Ok(Err(e)) => Err(e.to_string()),
            Ok(Ok(envelope)) if envelope.success => {
                let data = envelope.data.unwrap_or_else(|| Value::Array(Vec::new()));
                serde_json::from_value::<Vec<NormalizedSong>>(data).map_err(|e| e.to_string())
            }
            Ok(Ok(envelope)) => Err(envelope.error.unwrap_or_else(|| "Search failed".to_string())),
        };

        match outcome {
            Ok(hits) => {
                let songs: Vec<Song> = hits
                    .iter()
                    .enumerate()
                    .map(|(i, hit)| Song::from_search_result(hit, i, term))
                    .collect();
                tracing::info!("Search {:?} on {} returned {} songs", term, platform, songs.len());
                self.inner.lock().state.results = songs.clone();
                Ok(songs)
            }
            Err(message) => {
                tracing::error!("Search {:?} on {} failed: {}", term, platform, message);
                self.notifier.error("Search failed");
                Err(Error::Search(message))
            }
        }
    }

    // ============ Playback ============

    /// Resolve `song` and make it current.
    ///
    /// A song that already carries an audio URL is played as-is unless
    /// `retry` is set. `quality` defaults to the engine's current setting.
    /// Failures are reported through the notifier before being returned.
    pub async fn play(
        &self,
        song: Song,
        index: Option<usize>,
        quality: Option<u32>,
        retry: bool,
    ) -> std::result::Result<PlayOutcome, ResolutionError> {
        if !retry && song.playable_url().is_some() {
            {
                let mut inner = self.inner.lock();
                inner.supersede();
                inner.state.loading = false;
                inner.state.current = Some(song.clone());
                inner.state.playing = true;
            }
            self.persist_current();
            return Ok(PlayOutcome::Ready(song));
        }

        let (attempt, quality, search_term) = {
            let mut inner = self.inner.lock();
            let generation = inner.supersede();
            let token = CancellationToken::new();
            inner.in_flight = Some(token.clone());
            inner.state.loading = true;

            let quality = quality.unwrap_or(inner.state.quality);
            let search_term = song
                .search_term
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| inner.state.search_term.clone());
            (Attempt { generation, token }, quality, search_term)
        };

        let result = self
            .resolve(&song, index, quality, &search_term, &attempt.token)
            .await;
        self.commit(attempt, result, retry)
    }

    /// Play the queue entry after the current song.
    pub async fn play_next(&self) -> std::result::Result<Option<PlayOutcome>, ResolutionError> {
        let next = {
            let inner = self.inner.lock();
            let state = &inner.state;
            state
                .current
                .as_ref()
                .and_then(|current| state.queue.next_after(current))
                .cloned()
        };
        self.play_queued(next).await
    }

    /// Play the queue entry before the current song.
    pub async fn play_previous(&self) -> std::result::Result<Option<PlayOutcome>, ResolutionError> {
        let previous = {
            let inner = self.inner.lock();
            let state = &inner.state;
            state
                .current
                .as_ref()
                .and_then(|current| state.queue.previous_before(current))
                .cloned()
        };
        self.play_queued(previous).await
    }

    async fn play_queued(
        &self,
        song: Option<Song>,
    ) -> std::result::Result<Option<PlayOutcome>, ResolutionError> {
        match song {
            Some(song) => {
                let index = song.search_index;
                self.play(song, index, None, false).await.map(Some)
            }
            None => Ok(None),
        }
    }

    /// The audio output finished the current track: advance unless a
    /// resolution is already running.
    pub async fn handle_track_ended(
        &self,
    ) -> std::result::Result<Option<PlayOutcome>, ResolutionError> {
        {
            let mut inner = self.inner.lock();
            if inner.state.loading {
                return Ok(None);
            }
            inner.state.playing = false;
        }
        self.play_next().await
    }

    async fn resolve(
        &self,
        song: &Song,
        index: Option<usize>,
        quality: u32,
        search_term: &str,
        token: &CancellationToken,
    ) -> std::result::Result<Song, ResolutionError> {
        let request_url = request_url::resolve(
            song.request_url.as_deref(),
            search_term,
            &song.name,
            &song.singer,
            self.default_platform,
        );
        tracing::debug!(url = %request_url, "Resolving {}", song.label());

        let envelope = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(ResolutionError::Cancelled),
            _ = tokio::time::sleep(RESOLVE_TIMEOUT) => {
                token.cancel();
                return Err(ResolutionError::Timeout);
            }
            result = self.manager.fetch(&request_url) => result?,
        };

        if !envelope.success {
            return Err(ResolutionError::Upstream(
                envelope
                    .error
                    .unwrap_or_else(|| DETAIL_FAILED_MESSAGE.to_string()),
            ));
        }

        let data = envelope.data.unwrap_or(Value::Null);
        let mut updated = song.clone();
        merge_detail(&mut updated, &data);
        if updated.search_term.as_deref().is_none_or(str::is_empty) && !search_term.is_empty() {
            updated.search_term = Some(search_term.to_string());
        }
        updated.search_index = song.search_index.or(index);
        updated.request_url = Some(request_url);
        updated.quality = Some(quality);

        let Some(url) = updated.playable_url().map(str::to_string) else {
            return Err(ResolutionError::InvalidAudioUrl(String::new()));
        };

        tokio::select! {
            biased;
            _ = token.cancelled() => return Err(ResolutionError::Cancelled),
            _ = self.enrich(&mut updated) => {}
        }

        if url::Url::parse(&url).is_err() {
            return Err(ResolutionError::InvalidAudioUrl(url));
        }
        Ok(updated)
    }

    /// Best-effort cover and lyric lookups. Failures leave the record as is.
    async fn enrich(&self, song: &mut Song) {
        let picture_url = song
            .cover_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| request_url::picture_url(song.platform, id));
        let lyric_url = song
            .lyric_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| request_url::lyric_url(song.platform, id));

        let (picture, lyric) = futures::join!(
            self.fetch_optional("cover", picture_url.as_deref()),
            self.fetch_optional("lyric", lyric_url.as_deref()),
        );

        if let Some(cover) = picture
            .as_ref()
            .and_then(|data| data.get("url"))
            .and_then(value_to_string)
            .filter(|u| !u.is_empty())
        {
            song.cover = Some(cover);
        }

        if let Some(lyrics) = lyric.as_ref().and_then(lyrics_from_payload) {
            song.lyrics = lyrics;
        }
    }

    async fn fetch_optional(&self, what: &str, url: Option<&str>) -> Option<Value> {
        let url = url?;
        match self.manager.fetch(url).await {
            Ok(envelope) if envelope.success => envelope.data,
            Ok(envelope) => {
                tracing::debug!("No {} from {}: {:?}", what, url, envelope.error);
                None
            }
            Err(e) => {
                tracing::debug!("Failed to fetch {} from {}: {}", what, url, e);
                None
            }
        }
    }

    fn commit(
        &self,
        attempt: Attempt,
        result: std::result::Result<Song, ResolutionError>,
        retry: bool,
    ) -> std::result::Result<PlayOutcome, ResolutionError> {
        let mut inner = self.inner.lock();
        if inner.generation != attempt.generation {
            tracing::debug!(
                "Dropping superseded resolution (generation {}, now {})",
                attempt.generation,
                inner.generation
            );
            return Ok(PlayOutcome::Superseded);
        }
        inner.in_flight = None;
        inner.state.loading = false;

        match result {
            Ok(mut song) => {
                song.played_at = Some(Utc::now());

                let state = &mut inner.state;
                state.queue.replace_by_identity(&song);
                state.history.insert(song.clone());
                state.current = Some(song.clone());
                // A retry refreshes the record without starting playback
                state.playing = if retry { state.playing } else { true };
                drop(inner);

                tracing::info!("Now playing {}", song.label());
                self.persist_current();
                self.persist_history();
                self.persist_favorites();
                Ok(PlayOutcome::Ready(song))
            }
            Err(e) => {
                inner.state.playing = false;
                drop(inner);

                tracing::warn!("Playback failed: {}", e);
                self.notifier.error(&e.user_message());
                Err(e)
            }
        }
    }

    // ============ Queue, history, favorites ============

    pub fn set_quality(&self, quality: u32) {
        self.inner.lock().state.quality = quality;
    }

    pub fn set_playing(&self, playing: bool) {
        self.inner.lock().state.playing = playing;
    }

    /// Add the song to the queue, or take it out. Returns `true` when queued.
    pub fn toggle_queue(&self, song: Song) -> bool {
        self.inner.lock().state.queue.toggle(song)
    }

    pub fn clear_queue(&self) {
        self.inner.lock().state.queue.clear();
    }

    pub fn remove_from_history(&self, song: &Song) -> bool {
        let removed = self.inner.lock().state.history.remove(song);
        if removed {
            self.persist_history();
        }
        removed
    }

    /// Mark or unmark a song. Returns `true` when it is a favorite afterwards.
    pub fn toggle_favorite(&self, song: Song) -> bool {
        let marked = self.inner.lock().state.favorites.toggle(song);
        self.persist_favorites();
        marked
    }

    pub fn is_favorite(&self, song: &Song) -> bool {
        self.inner.lock().state.favorites.contains(song)
    }

    /// Copy of the current player state.
    pub fn snapshot(&self) -> PlayerState {
        self.inner.lock().state.clone()
    }

    // ============ Persistence ============

    /// Load history, favorites and the last played song from storage.
    ///
    /// The "last played" notice fires at most once per process, however
    /// often this runs.
    pub fn restore(&self) {
        let Some(storage) = self.storage.as_deref() else {
            return;
        };

        let history: Vec<Song> = load(storage, HISTORY_KEY).unwrap_or_default();
        let favorites: Vec<Song> = load(storage, FAVORITES_KEY).unwrap_or_default();
        let current: Option<Song> = load(storage, CURRENT_SONG_KEY);

        {
            let mut inner = self.inner.lock();
            inner.state.history = History::from_entries(history);
            inner.state.favorites = Favorites::from_entries(favorites);
            if current.is_some() {
                inner.state.current = current.clone();
                inner.state.playing = false;
            }
        }

        if let Some(song) = current
            && self.resume_notice.fire()
        {
            self.notifier
                .info(&format!("Last played: {} - {}", song.name, song.singer));
        }
    }

    fn persist_current(&self) {
        let value = serde_json::to_value(&self.inner.lock().state.current);
        self.write(CURRENT_SONG_KEY, value);
    }

    fn persist_history(&self) {
        let value = serde_json::to_value(self.inner.lock().state.history.entries());
        self.write(HISTORY_KEY, value);
    }

    fn persist_favorites(&self) {
        let value = serde_json::to_value(self.inner.lock().state.favorites.entries());
        self.write(FAVORITES_KEY, value);
    }

    /// Storage failures are logged, never surfaced to playback.
    fn write(&self, key: &str, value: serde_json::Result<Value>) {
        let Some(storage) = self.storage.as_deref() else {
            return;
        };
        let result = value.map_err(Error::from).and_then(|v| {
            if v.is_null() {
                storage.remove(key)
            } else {
                storage.set(key, &v)
            }
        });
        if let Err(e) = result {
            tracing::warn!("Failed to persist {}: {}", key, e);
        }
    }
}

fn load<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    match storage.get(key) {
        Ok(Some(value)) => match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Ignoring unreadable {}: {}", key, e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!("Failed to load {}: {}", key, e);
            None
        }
    }
}

/// Fold a detail payload into the record. Fields the payload lacks keep
/// their previous value; `url` always comes from the payload.
fn merge_detail(song: &mut Song, data: &Value) {
    let field = |name: &str| {
        data.get(name)
            .and_then(value_to_string)
            .filter(|s| !s.is_empty())
    };

    if let Some(id) = field("id") {
        song.id = Some(id);
    }
    song.url = field("url");
    if let Some(cover) = field("cover") {
        song.cover = Some(cover);
    }
    if let Some(cover_id) = field("coverId") {
        song.cover_id = Some(cover_id);
    }
    if let Some(lyric_id) = field("lyricId") {
        song.lyric_id = Some(lyric_id);
    }
    if let Some(lyrics) = data
        .get("lyric")
        .or_else(|| data.get("lyrics"))
        .and_then(lyrics_from_field)
    {
        song.lyrics = lyrics;
    }
    song.details = (!data.is_null()).then(|| data.clone());
}

/// LRC text is parsed; structured data passes through; blanks are unusable.
fn lyrics_from_field(value: &Value) -> Option<Lyrics> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(Lyrics::Cues(parse_lyric(s))),
        other => Some(Lyrics::Raw(other.clone())),
    }
}

/// Lyric lookups return `{lyric, tlyric}`, with the translation as fallback,
/// or a provider-specific structure that is kept whole.
fn lyrics_from_payload(data: &Value) -> Option<Lyrics> {
    if data.get("lyric").is_some() || data.get("tlyric").is_some() {
        ["lyric", "tlyric"]
            .iter()
            .filter_map(|key| data.get(*key))
            .find_map(lyrics_from_field)
    } else {
        lyrics_from_field(data)
    }
}
