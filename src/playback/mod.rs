//! Playback resolution, queue and history.
//!
//! # Architecture
//!
//! - **Records** (`song.rs`, `lyrics.rs`) - The song record and its timed lyrics
//! - **Collections** (`queue.rs`, `history.rs`) - Identity-unique lists
//! - **Seams** (`manager.rs`, `notifier.rs`, `storage.rs`) - Gateway access,
//!   user notices and persisted state, each behind a trait
//! - **Engine** (`engine.rs`) - The resolution state machine that ties them together

pub mod engine;
pub mod history;
pub mod lyrics;
pub mod manager;
pub mod notifier;
pub mod queue;
pub mod request_url;
pub mod song;
pub mod storage;

pub use engine::{PlayOutcome, PlaybackEngine, PlayerState, ResolutionError};
pub use manager::{HttpManager, LocalManager, ManagerApi};
pub use notifier::{ConsoleNotifier, Notifier, TracingNotifier};
pub use song::{Lyrics, Song};
pub use storage::{JsonFileStore, MemoryStore, Storage};
