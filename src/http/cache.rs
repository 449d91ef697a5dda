//! HTTP cache validator module
//!
//! `ETag` / `Last-Modified` generation from file metadata and conditional
//! request evaluation. Validators come from metadata so files never need
//! to be read in full just to answer a revalidation.

use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// IMF-fixdate layout, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Generate a weak `ETag` from file size and modification time
///
/// # Returns
/// Weak `ETag` string, e.g., `W/"1f4-5e3c1a2b"`
pub fn generate_etag(len: u64, modified: Option<SystemTime>) -> String {
    let secs = modified.map_or(0, |m| DateTime::<Utc>::from(m).timestamp());
    format!("W/\"{len:x}-{secs:x}\"")
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Uses weak comparison: the `W/` prefix is ignored on both sides.
///
/// Supports:
/// - Single `ETag`: `"abc123"`
/// - Multiple `ETags`: `"abc123", "def456"`
/// - Wildcard: `*`
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    let etag = strip_weak(etag);
    if_none_match.is_some_and(|client_etag| {
        client_etag
            .split(',')
            .map(str::trim)
            .any(|e| e == "*" || strip_weak(e) == etag)
    })
}

fn strip_weak(etag: &str) -> &str {
    etag.strip_prefix("W/").unwrap_or(etag)
}

/// Format a timestamp for `Last-Modified`
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(HTTP_DATE_FORMAT).to_string()
}

/// Parse an `If-Modified-Since` value; `None` if it isn't a valid HTTP date
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Decide whether a conditional GET/HEAD should get 304 Not Modified
///
/// `If-None-Match` takes precedence; `If-Modified-Since` is only consulted
/// when it's absent, compared at one-second precision.
pub fn is_not_modified(
    if_none_match: Option<&str>,
    if_modified_since: Option<&str>,
    etag: &str,
    modified: Option<SystemTime>,
) -> bool {
    if if_none_match.is_some() {
        return check_etag_match(if_none_match, etag);
    }

    let (Some(since), Some(modified)) = (if_modified_since.and_then(parse_http_date), modified)
    else {
        return false;
    };

    DateTime::<Utc>::from(modified).timestamp() <= since.timestamp()
}
