//! Internal domain models shared by every platform adapter.
//!
//! These types are OUR types - they don't change when an upstream API changes.
//! Each provider's raw payload gets converted into these shapes by its adapter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// The fixed set of upstream music sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKey {
    #[default]
    Gdstudio,
    Cenguigui,
    Xfabe,
}

impl PlatformKey {
    /// All providers, in registration order.
    pub const ALL: [PlatformKey; 3] = [Self::Gdstudio, Self::Cenguigui, Self::Xfabe];

    /// Wire name used in gateway query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gdstudio => "gdstudio",
            Self::Cenguigui => "cenguigui",
            Self::Xfabe => "xfabe",
        }
    }

    /// Provider name used in error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Gdstudio => "Gdstudio",
            Self::Cenguigui => "Cenguigui",
            Self::Xfabe => "Xfabe",
        }
    }
}

impl fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformKey {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownPlatform(s.to_string()))
    }
}

/// Returned when a platform key is not one of the registered providers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown platform: {0}")]
pub struct UnknownPlatform(pub String);

/// A single search hit, normalized across providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSong {
    pub id: String,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub album: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyric_id: Option<String>,
    /// Track length as reported upstream (xfabe only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    pub source: PlatformKey,
    /// Provider-side position used to re-select the hit (cenguigui only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

/// Playable detail for one track.
///
/// Providers fill in different subsets; only `url` is guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackDetail {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    /// Inline LRC text, for providers that bundle lyrics with the detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyric: Option<String>,
    /// Bitrate in kbps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<u32>,
    /// Stream size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    /// Whether the track sits behind a paywall upstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay: Option<serde_json::Value>,
    pub source: PlatformKey,
}

/// Lyric text split into original and translated tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LyricText {
    pub lyric: String,
    pub tlyric: String,
    pub source: PlatformKey,
}

/// Lyric data as returned by a provider.
///
/// Some providers hand back their own structure, which is passed through
/// untouched for the client to interpret.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LyricPayload {
    Text(LyricText),
    Raw(serde_json::Value),
}

/// Cover art location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Picture {
    pub url: String,
    pub source: PlatformKey,
}

/// Options for a search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub limit: u32,
    pub page: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { limit: 10, page: 1 }
    }
}

/// Options for a detail request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailOptions {
    /// Requested bitrate in kbps
    pub quality: u32,
    /// Position of the hit in a previous search (cenguigui)
    pub index: Option<u32>,
}

impl Default for DetailOptions {
    fn default() -> Self {
        Self {
            quality: 320,
            index: None,
        }
    }
}

/// Options for a cover art request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PictureOptions {
    /// Edge length in pixels
    pub size: u32,
}

impl Default for PictureOptions {
    fn default() -> Self {
        Self { size: 500 }
    }
}

/// Adapter operation, used to tag failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Search,
    Detail,
    Lyric,
    Picture,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Search => "search",
            Self::Detail => "get detail",
            Self::Lyric => "get lyric",
            Self::Picture => "get picture",
        })
    }
}

/// Errors raised by a platform adapter.
///
/// Every variant names the provider and the operation so the gateway can
/// report a uniform cause without losing provenance.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlatformError {
    #[error("{} {} failed: {}", .platform.display_name(), .operation, .message)]
    Request {
        platform: PlatformKey,
        operation: Operation,
        message: String,
    },

    #[error("{} does not support {}", .platform.display_name(), .operation)]
    Unsupported {
        platform: PlatformKey,
        operation: Operation,
    },
}

impl PlatformError {
    pub fn request(platform: PlatformKey, operation: Operation, message: impl Into<String>) -> Self {
        Self::Request {
            platform,
            operation,
            message: message.into(),
        }
    }

    pub fn unsupported(platform: PlatformKey, operation: Operation) -> Self {
        Self::Unsupported {
            platform,
            operation,
        }
    }
}

/// Deserialize an identifier that upstreams send either as a number or a string.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| value_to_string(&v)))
}

/// Render a scalar JSON value as a string; `null`, arrays and objects yield `None`.
pub(crate) fn value_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
