//! Request path translation
//!
//! Maps a URL path onto a filesystem path below the served root. `..`
//! segments are resolved lexically and can never climb above the root.

use std::path::{Path, PathBuf};

/// A request path mapped onto the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub fs_path: PathBuf,
    /// Whether the request path ended in `/`
    pub trailing_slash: bool,
}

/// Translate a request path (without query) into a path under `root`
///
/// Returns `None` when a decoded segment can't name a file here: it holds a
/// NUL byte or a platform separator other than `/` (`\` on Windows). On
/// unix a backslash is an ordinary file name character.
pub fn translate_path(root: &Path, request_path: &str) -> Option<ResolvedPath> {
    // Query/fragment are normally stripped by the URI parser already
    let raw = request_path
        .split(|c: char| c == '?' || c == '#')
        .next()
        .unwrap_or_default();
    let trailing_slash = raw.trim_end().ends_with('/');
    let decoded = percent_decode(raw);

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s if s.contains(|c: char| c == '\0' || (c != '/' && std::path::is_separator(c))) => {
                return None;
            }
            s => segments.push(s),
        }
    }

    let mut fs_path = root.to_path_buf();
    fs_path.extend(segments);

    Some(ResolvedPath {
        fs_path,
        trailing_slash,
    })
}

/// Decode `%XX` escapes; invalid escapes are kept literally
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Percent-encode a link target, leaving unreserved characters and `/` intact
pub fn percent_encode_href(input: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(input.len());

    for &b in input.as_bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~' | b'/') {
            out.push(char::from(b));
        } else {
            out.push('%');
            out.push(char::from(HEX[usize::from(b >> 4)]));
            out.push(char::from(HEX[usize::from(b & 0x0f)]));
        }
    }

    out
}

const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
