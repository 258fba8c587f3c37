//! Cenguigui (Douyin music) API Data Transfer Objects
//!
//! Search and detail share one endpoint: a search returns a numbered list,
//! and a detail request repeats the search term with `n` selecting the hit.

use serde::{Deserialize, Serialize};

use crate::platform::domain::string_or_number;

/// Search response wrapper
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub data: Vec<SearchItem>,
}

/// One numbered search hit
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchItem {
    /// 1-based position, also the selector for the detail request
    #[serde(default, deserialize_with = "string_or_number")]
    pub n: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub singer: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
}

/// Detail response wrapper
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DetailResponse {
    pub data: Option<DetailItem>,
}

/// Selected track with stream URL and inline lyrics
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DetailItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub singer: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// LRC text
    #[serde(default)]
    pub lrc: Option<String>,
}
