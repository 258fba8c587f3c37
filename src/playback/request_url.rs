//! Gateway request URLs as stored on song records.
//!
//! Songs remember the detail URL they were resolved from. Records written by
//! older clients point at retired endpoints; those are rewritten into the
//! current `/api/manager` shape before use.

use crate::platform::PlatformKey;

/// Path of the gateway endpoint.
pub const MANAGER_PATH: &str = "/api/manager";

/// Path fragments that identify retired endpoints.
const LEGACY_FRAGMENTS: [&str; 3] = ["/api/sby", "wydg", "qqdg"];

fn manager_url(action: &str, platform: &str, term: &str) -> String {
    format!(
        "{}?action={}&platform={}&term={}",
        MANAGER_PATH,
        action,
        platform,
        urlencoding::encode(term)
    )
}

/// Detail URL for a track.
pub fn detail_url(platform: PlatformKey, term: &str) -> String {
    manager_url("detail", platform.as_str(), term)
}

/// Search URL for a free-text term.
pub fn search_url(platform: PlatformKey, term: &str) -> String {
    manager_url("search", platform.as_str(), term)
}

/// Cover art URL for a picture ID.
pub fn picture_url(platform: PlatformKey, cover_id: &str) -> String {
    format!("{}&type=pic", detail_url(platform, cover_id))
}

/// Lyric URL for a lyric ID.
pub fn lyric_url(platform: PlatformKey, lyric_id: &str) -> String {
    format!("{}&type=lyric", detail_url(platform, lyric_id))
}

/// Whether a stored URL points at a retired endpoint.
pub fn is_legacy(request_url: &str) -> bool {
    LEGACY_FRAGMENTS.iter().any(|f| request_url.contains(f))
}

/// Rewrite a legacy URL into the current shape, keeping its `term` and
/// `platform` query values. Missing values fall back to `fallback_term` and
/// `default_platform`.
pub fn rewrite_legacy(
    request_url: &str,
    fallback_term: &str,
    default_platform: PlatformKey,
) -> String {
    let parsed = url::Url::parse("http://localhost/")
        .and_then(|base| base.join(request_url))
        .ok();

    let param = |name: &str| {
        parsed.as_ref().and_then(|url| {
            url.query_pairs()
                .find(|(key, value)| key == name && !value.is_empty())
                .map(|(_, value)| value.into_owned())
        })
    };

    let term = param("term").unwrap_or_else(|| fallback_term.to_string());
    let platform = param("platform").unwrap_or_else(|| default_platform.as_str().to_string());
    manager_url("detail", &platform, &term)
}

/// Pick the detail URL to resolve a song with.
///
/// - no stored URL: build one from `search_term`, or `"{name} {singer}"`
/// - legacy URL: rewrite it
/// - current URL: use it unmodified
pub fn resolve(
    request_url: Option<&str>,
    search_term: &str,
    name: &str,
    singer: &str,
    default_platform: PlatformKey,
) -> String {
    let fallback_term = || format!("{} {}", name, singer);

    match request_url.filter(|u| !u.is_empty()) {
        None => {
            let term = if search_term.is_empty() {
                fallback_term()
            } else {
                search_term.to_string()
            };
            detail_url(default_platform, &term)
        }
        Some(url) if is_legacy(url) => rewrite_legacy(url, &fallback_term(), default_platform),
        Some(url) => url.to_string(),
    }
}
