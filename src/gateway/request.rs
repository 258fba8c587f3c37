//! Query-string parsing and validation for `/api/manager`.

use crate::platform::{DetailOptions, PictureOptions, PlatformKey, SearchOptions};

/// Raw query parameters, exactly as received.
#[derive(Debug, Clone, Default)]
pub struct ManagerQuery {
    pub action: Option<String>,
    pub platform: Option<String>,
    pub term: Option<String>,
    /// `pic` or `lyric`, only meaningful for `action=detail`
    pub kind: Option<String>,
    pub limit: Option<String>,
    pub page: Option<String>,
    pub quality: Option<String>,
    pub index: Option<String>,
    pub size: Option<String>,
}

impl ManagerQuery {
    /// Build from decoded key/value pairs; unknown keys are ignored and the
    /// first occurrence of a key wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "action" => &mut query.action,
                "platform" => &mut query.platform,
                "term" => &mut query.term,
                "type" => &mut query.kind,
                "limit" => &mut query.limit,
                "page" => &mut query.page,
                "quality" => &mut query.quality,
                "index" => &mut query.index,
                "size" => &mut query.size,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        query
    }

    /// Parse a raw `application/x-www-form-urlencoded` query string.
    pub fn from_query_string(query: &str) -> Self {
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()))
    }

    /// Parse the query string of a gateway URL (absolute or path-only).
    pub fn from_url(request_url: &str) -> Result<Self, url::ParseError> {
        let base = url::Url::parse("http://localhost/")?;
        let url = base.join(request_url)?;
        Ok(Self::from_pairs(url.query_pairs()))
    }
}

/// Which adapter operation a validated request maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOp {
    Search(SearchOptions),
    Detail(DetailOptions),
    Lyric,
    Picture(PictureOptions),
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayRequest {
    pub platform: PlatformKey,
    pub term: String,
    pub op: RequestOp,
}

/// Client mistakes, reported as HTTP 400.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid action parameter, must be \"search\" or \"detail\"")]
    InvalidAction,

    #[error("Invalid platform parameter")]
    InvalidPlatform,

    #[error("Invalid term parameter")]
    InvalidTerm,
}

impl TryFrom<&ManagerQuery> for GatewayRequest {
    type Error = ValidationError;

    /// Checks run in a fixed order: action, then platform, then term.
    fn try_from(query: &ManagerQuery) -> Result<Self, Self::Error> {
        let is_search = match query.action.as_deref() {
            Some("search") => true,
            Some("detail") => false,
            _ => return Err(ValidationError::InvalidAction),
        };

        let platform = query
            .platform
            .as_deref()
            .and_then(|p| p.parse::<PlatformKey>().ok())
            .ok_or(ValidationError::InvalidPlatform)?;

        let term = query
            .term
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or(ValidationError::InvalidTerm)?
            .to_string();

        let op = if is_search {
            RequestOp::Search(SearchOptions {
                limit: number_or(&query.limit, 10),
                page: number_or(&query.page, 1),
            })
        } else {
            match query.kind.as_deref() {
                Some("pic") => RequestOp::Picture(PictureOptions {
                    size: number_or(&query.size, 500),
                }),
                Some("lyric") => RequestOp::Lyric,
                _ => RequestOp::Detail(DetailOptions {
                    quality: number_or(&query.quality, 320),
                    index: query.index.as_deref().and_then(|i| i.trim().parse().ok()),
                }),
            }
        };

        Ok(Self { platform, term, op })
    }
}

fn number_or(value: &Option<String>, default: u32) -> u32 {
    value
        .as_deref()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
