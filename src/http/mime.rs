//! MIME type detection module
//!
//! Maps file extensions to Content-Type values. The table starts from the
//! common web defaults and carries extra entries for adaptive-streaming
//! media (DASH manifests and segments, HLS playlists).

use std::collections::HashMap;
use std::path::Path;

/// Fallback for unknown or missing extensions
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Common web types, keyed by lower-case extension
const STANDARD_TYPES: &[(&str, &str)] = &[
    // Text
    ("html", "text/html; charset=utf-8"),
    ("htm", "text/html; charset=utf-8"),
    ("css", "text/css"),
    ("txt", "text/plain; charset=utf-8"),
    ("md", "text/plain; charset=utf-8"),
    ("csv", "text/csv"),
    ("xml", "application/xml"),
    // JavaScript/WASM
    ("js", "application/javascript"),
    ("mjs", "application/javascript"),
    ("json", "application/json"),
    ("map", "application/json"),
    ("wasm", "application/wasm"),
    // Images
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("webp", "image/webp"),
    // 3D models
    ("glb", "model/gltf-binary"),
    ("gltf", "model/gltf+json"),
    // Video
    ("mp4", "video/mp4"),
    ("m4v", "video/mp4"),
    ("webm", "video/webm"),
    ("ogg", "video/ogg"),
    ("ogv", "video/ogg"),
    ("mov", "video/quicktime"),
    ("avi", "video/x-msvideo"),
    ("ts", "video/mp2t"),
    // Audio
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("flac", "audio/flac"),
    ("m4a", "audio/mp4"),
    ("aac", "audio/aac"),
    // Fonts
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("ttf", "font/ttf"),
    ("otf", "font/otf"),
    ("eot", "application/vnd.ms-fontobject"),
    // Documents
    ("pdf", "application/pdf"),
    ("zip", "application/zip"),
    ("gz", "application/gzip"),
    ("gzip", "application/gzip"),
    ("tar", "application/x-tar"),
];

/// Adaptive-streaming entries layered over the standard table
const STREAMING_TYPES: &[(&str, &str)] = &[
    ("mpd", "application/dash+xml"),
    ("m4s", "video/iso.segment"),
    ("m3u8", "application/vnd.apple.mpegurl"),
];

/// Read-only extension → Content-Type table
#[derive(Debug, Clone)]
pub struct MimeTable {
    types: HashMap<&'static str, &'static str>,
}

impl MimeTable {
    /// Table with only the standard web types
    pub fn standard() -> Self {
        Self {
            types: STANDARD_TYPES.iter().copied().collect(),
        }
    }

    /// Add or replace an entry (extension without the leading dot)
    #[must_use]
    pub fn with(mut self, extension: &'static str, content_type: &'static str) -> Self {
        self.types.insert(extension, content_type);
        self
    }

    /// Get Content-Type for a file extension
    ///
    /// Exact match first, then the lower-cased extension.
    pub fn get_content_type(&self, extension: Option<&str>) -> &'static str {
        let Some(ext) = extension else {
            return DEFAULT_CONTENT_TYPE;
        };
        if let Some(&content_type) = self.types.get(ext) {
            return content_type;
        }
        self.types
            .get(ext.to_ascii_lowercase().as_str())
            .copied()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
    }

    /// Get Content-Type for a resolved file path
    pub fn content_type_for(&self, path: &Path) -> &'static str {
        self.get_content_type(path.extension().and_then(|e| e.to_str()))
    }
}

impl Default for MimeTable {
    /// Standard types plus the streaming overrides
    fn default() -> Self {
        STREAMING_TYPES
            .iter()
            .fold(Self::standard(), |table, &(ext, content_type)| {
                table.with(ext, content_type)
            })
    }
}
