//! Directory listing page

use super::resolve::percent_encode_href;
use std::fmt::Write as _;
use std::io;
use std::path::Path;
use tokio::fs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub is_symlink: bool,
}

/// Read `dir` and render its listing page
///
/// `display_path` is the decoded request path shown in the title.
pub async fn render_directory(dir: &Path, display_path: &str) -> io::Result<String> {
    let mut read_dir = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = read_dir.next_entry().await? {
        let file_type = entry.file_type().await?;
        let is_symlink = file_type.is_symlink();
        // Symlinks are listed by what they point to
        let is_dir = if is_symlink {
            fs::metadata(entry.path())
                .await
                .is_ok_and(|m| m.is_dir())
        } else {
            file_type.is_dir()
        };

        entries.push(ListingEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_symlink,
        });
    }

    entries.sort_by_cached_key(|e| e.name.to_lowercase());
    Ok(render_listing(display_path, &entries))
}

/// Render listing HTML for already-sorted entries
pub fn render_listing(display_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!("Directory listing for {}", escape_html(display_path));
    let mut html = String::with_capacity(256 + entries.len() * 64);

    html.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{title}</title>\n</head>\n<body>");
    let _ = writeln!(html, "<h1>{title}</h1>\n<hr>\n<ul>");

    for entry in entries {
        let mut link = entry.name.clone();
        let mut display = entry.name.clone();
        if entry.is_dir {
            link.push('/');
            display.push('/');
        }
        if entry.is_symlink {
            display = format!("{}@", entry.name);
        }
        let _ = writeln!(
            html,
            "<li><a href=\"{}\">{}</a></li>",
            escape_html(&percent_encode_href(&link)),
            escape_html(&display)
        );
    }

    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}

/// Escape text for inclusion in HTML content or a quoted attribute
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_dir: bool, is_symlink: bool) -> ListingEntry {
        ListingEntry {
            name: name.to_string(),
            is_dir,
            is_symlink,
        }
    }

    #[test]
    fn test_render_listing_entries() {
        let html = render_listing(
            "/media/",
            &[
                entry("segments", true, false),
                entry("stream.mpd", false, false),
                entry("linked", true, true),
            ],
        );
        assert!(html.contains("<title>Directory listing for /media/</title>"));
        assert!(html.contains("<li><a href=\"segments/\">segments/</a></li>"));
        assert!(html.contains("<li><a href=\"stream.mpd\">stream.mpd</a></li>"));
        assert!(html.contains("<li><a href=\"linked/\">linked@</a></li>"));
    }

    #[test]
    fn test_names_are_escaped_and_encoded() {
        let html = render_listing("/<x>/", &[entry("a <b>&c.txt", false, false)]);
        assert!(html.contains("Directory listing for /&lt;x&gt;/"));
        assert!(html.contains("href=\"a%20%3Cb%3E%26c.txt\""));
        assert!(html.contains(">a &lt;b&gt;&amp;c.txt<"));
    }

    #[tokio::test]
    async fn test_render_directory_sorts_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), b"b").unwrap();
        std::fs::write(dir.path().join("A.txt"), b"a").unwrap();
        std::fs::create_dir(dir.path().join("c")).unwrap();

        let html = render_directory(dir.path(), "/").await.unwrap();
        let a = html.find(">A.txt<").unwrap();
        let b = html.find(">b.txt<").unwrap();
        let c = html.find(">c/<").unwrap();
        assert!(a < b && b < c);
    }

    #[tokio::test]
    async fn test_render_directory_missing_dir_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(render_directory(&dir.path().join("nope"), "/nope/")
            .await
            .is_err());
    }
}
