//! XF Netease API Data Transfer Objects
//!
//! Three endpoints under one host: `/search`, `/music` and `/lyrics`.
//! Lyrics are passed through untouched, so there is no lyric DTO.

use serde::{Deserialize, Serialize};

use crate::platform::domain::string_or_number;

/// Search response wrapper (`data.songs`)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    pub data: SearchData,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchData {
    pub songs: Vec<Song>,
}

/// Song entry in search results
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Song {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Artists pre-joined by the API
    #[serde(default)]
    pub artistsname: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    /// Duration in milliseconds
    #[serde(default)]
    pub duration: Option<u64>,
}

/// Music response wrapper
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MusicResponse {
    pub data: Option<Music>,
}

/// Track with stream URL
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Music {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub artistsname: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    /// Album art URL
    #[serde(default)]
    pub picurl: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub duration: Option<u64>,
    /// Paywall marker; the API uses both booleans and numbers here
    #[serde(default)]
    pub pay: Option<serde_json::Value>,
}
