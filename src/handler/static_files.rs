//! Static file serving module
//!
//! Resolves request paths under the root and serves files, index files,
//! and directory listings.

use crate::handler::listing;
use crate::handler::resolve::{self, percent_decode};
use crate::handler::router::{FileServer, RequestContext};
use crate::http::range::{self, RangeOutcome};
use crate::http::response::{
    build_file_response, build_html_response, build_partial_response, FileHeaders,
};
use crate::http::{self, body, cache, FileBody, ServeBody};
use crate::logger;
use hyper::Response;
use std::fs::Metadata;
use std::io::SeekFrom;
use std::path::Path;
use tokio::fs::{self, File};
use tokio::io::AsyncSeekExt;

/// Serve a GET/HEAD request path
pub async fn serve_path(server: &FileServer, ctx: &RequestContext<'_>) -> Response<ServeBody> {
    let Some(resolved) = resolve::translate_path(server.root(), ctx.path) else {
        return http::build_404_response();
    };

    // File not found is common (404), no need to log
    let Ok(metadata) = fs::metadata(&resolved.fs_path).await else {
        return http::build_404_response();
    };

    if metadata.is_dir() {
        if !resolved.trailing_slash {
            return redirect_to_directory(ctx);
        }
        return serve_directory(server, ctx, &resolved.fs_path).await;
    }

    // A file can't be addressed as a directory
    if resolved.trailing_slash {
        return http::build_404_response();
    }

    serve_file(server, ctx, &resolved.fs_path, &metadata).await
}

/// Redirect `/dir` to `/dir/`, keeping the query string
fn redirect_to_directory(ctx: &RequestContext<'_>) -> Response<ServeBody> {
    let location = match ctx.query {
        Some(query) => format!("{}/?{query}", ctx.path),
        None => format!("{}/", ctx.path),
    };
    http::build_301_response(&location)
}

/// Serve an index file if present, otherwise a listing
async fn serve_directory(
    server: &FileServer,
    ctx: &RequestContext<'_>,
    dir: &Path,
) -> Response<ServeBody> {
    for index_file in server.index_files() {
        let index_path = dir.join(index_file);
        if let Ok(metadata) = fs::metadata(&index_path).await {
            if metadata.is_file() {
                return serve_file(server, ctx, &index_path, &metadata).await;
            }
        }
    }

    match listing::render_directory(dir, &percent_decode(ctx.path)).await {
        Ok(html) => build_html_response(html, ctx.is_head),
        Err(e) => {
            logger::log_warning(&format!(
                "Failed to list directory '{}': {e}",
                dir.display()
            ));
            http::build_404_listing_response()
        }
    }
}

/// Serve a regular file with validators and Range support
async fn serve_file(
    server: &FileServer,
    ctx: &RequestContext<'_>,
    path: &Path,
    metadata: &Metadata,
) -> Response<ServeBody> {
    let total_size = metadata.len();
    let modified = metadata.modified().ok();
    let etag = cache::generate_etag(total_size, modified);
    let last_modified = modified.map(cache::format_http_date);

    if cache::is_not_modified(ctx.if_none_match, ctx.if_modified_since, &etag, modified) {
        return http::build_304_response(&etag, last_modified.as_deref());
    }

    let headers = FileHeaders {
        content_type: server.mime().content_type_for(path),
        etag: &etag,
        last_modified: last_modified.as_deref(),
    };

    match range::evaluate_range(ctx.range_header, total_size) {
        RangeOutcome::Partial(slice) => {
            let data = match open_body(path, slice.start, slice.length(), ctx.is_head).await {
                Ok(data) => data,
                Err(e) => return read_failure(path, &e),
            };
            build_partial_response(data, &headers, slice.start, slice.end, total_size)
        }
        RangeOutcome::Unsatisfiable => http::build_416_response(total_size),
        RangeOutcome::Full => {
            let data = match open_body(path, 0, total_size, ctx.is_head).await {
                Ok(data) => data,
                Err(e) => return read_failure(path, &e),
            };
            build_file_response(data, &headers, total_size)
        }
    }
}

/// Open the file and position a streaming body at `start`
///
/// HEAD still opens the file so unreadable files fail the same way as GET.
async fn open_body(
    path: &Path,
    start: u64,
    length: u64,
    is_head: bool,
) -> std::io::Result<ServeBody> {
    let mut file = File::open(path).await?;
    if is_head {
        return Ok(body::empty());
    }
    if start > 0 {
        file.seek(SeekFrom::Start(start)).await?;
    }
    Ok(FileBody::new(file, length).into_serve_body())
}

fn read_failure(path: &Path, error: &std::io::Error) -> Response<ServeBody> {
    logger::log_error(&format!(
        "Failed to read file '{}': {error}",
        path.display()
    ));
    http::build_500_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MimeTable;
    use http_body_util::BodyExt;
    use hyper::Request;

    struct Fixture {
        _dir: tempfile::TempDir,
        server: FileServer,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("hello.txt"), b"hello world").unwrap();
        std::fs::create_dir_all(root.join("media/segments")).unwrap();
        std::fs::write(root.join("media/stream.mpd"), b"<MPD/>").unwrap();
        std::fs::write(root.join("media/segments/1.m4s"), b"segment-one").unwrap();
        std::fs::create_dir(root.join("site")).unwrap();
        std::fs::write(root.join("site/index.html"), b"<h1>home</h1>").unwrap();

        let server = FileServer::new(
            root,
            vec!["index.html".to_string(), "index.htm".to_string()],
            MimeTable::default(),
        )
        .unwrap();
        Fixture { _dir: dir, server }
    }

    async fn get(server: &FileServer, uri: &str, headers: &[(&str, &str)]) -> Response<ServeBody> {
        let mut builder = Request::builder().method("GET").uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        server.handle(builder.body(()).unwrap()).await
    }

    async fn text(response: Response<ServeBody>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_serves_file_with_headers() {
        let fx = fixture();
        let response = get(&fx.server, "/hello.txt", &[]).await;
        assert_eq!(response.status(), 200);
        let headers = response.headers();
        assert_eq!(headers["content-type"], "text/plain; charset=utf-8");
        assert_eq!(headers["content-length"], "11");
        assert_eq!(headers["accept-ranges"], "bytes");
        assert!(headers.contains_key("etag"));
        assert!(headers.contains_key("last-modified"));
        assert_eq!(text(response).await, "hello world");
    }

    #[tokio::test]
    async fn test_head_has_length_but_no_body() {
        let fx = fixture();
        let request = Request::builder()
            .method("HEAD")
            .uri("/media/stream.mpd")
            .body(())
            .unwrap();
        let response = fx.server.handle(request).await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["content-length"], "6");
        assert_eq!(response.headers()["content-type"], "application/dash+xml");
        assert!(text(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_directory_redirects_without_slash() {
        let fx = fixture();
        let response = get(&fx.server, "/media?x=1", &[]).await;
        assert_eq!(response.status(), 301);
        assert_eq!(response.headers()["location"], "/media/?x=1");
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn test_directory_serves_index_file() {
        let fx = fixture();
        let response = get(&fx.server, "/site/", &[]).await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["content-type"], "text/html; charset=utf-8");
        assert_eq!(text(response).await, "<h1>home</h1>");
    }

    #[tokio::test]
    async fn test_directory_listing_without_index() {
        let fx = fixture();
        let response = get(&fx.server, "/media/", &[]).await;
        assert_eq!(response.status(), 200);
        let html = text(response).await;
        assert!(html.contains("Directory listing for /media/"));
        assert!(html.contains("<a href=\"segments/\">segments/</a>"));
        assert!(html.contains("<a href=\"stream.mpd\">stream.mpd</a>"));
    }

    #[tokio::test]
    async fn test_file_with_trailing_slash_is_404() {
        let fx = fixture();
        let response = get(&fx.server, "/hello.txt/", &[]).await;
        assert_eq!(response.status(), 404);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_backslash_segment_is_not_dropped() {
        let fx = fixture();
        let response = get(&fx.server, "/x%5Cy/hello.txt", &[]).await;
        assert_eq!(response.status(), 404);

        std::fs::create_dir(fx.server.root().join("x\\y")).unwrap();
        std::fs::write(fx.server.root().join("x\\y/hello.txt"), b"inner").unwrap();
        let response = get(&fx.server, "/x%5Cy/hello.txt", &[]).await;
        assert_eq!(text(response).await, "inner");
    }

    #[tokio::test]
    async fn test_nul_in_path_is_404() {
        let fx = fixture();
        let response = get(&fx.server, "/hello.txt%00", &[]).await;
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn test_percent_encoded_path() {
        let fx = fixture();
        let response = get(&fx.server, "/media/segments/%31.m4s", &[]).await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["content-type"], "video/iso.segment");
        assert_eq!(text(response).await, "segment-one");
    }

    #[tokio::test]
    async fn test_range_request() {
        let fx = fixture();
        let response = get(&fx.server, "/hello.txt", &[("range", "bytes=6-")]).await;
        assert_eq!(response.status(), 206);
        assert_eq!(response.headers()["content-range"], "bytes 6-10/11");
        assert_eq!(response.headers()["content-length"], "5");
        assert_eq!(text(response).await, "world");

        let response = get(&fx.server, "/hello.txt", &[("range", "bytes=-5")]).await;
        assert_eq!(text(response).await, "world");
    }

    #[tokio::test]
    async fn test_unsatisfiable_range() {
        let fx = fixture();
        let response = get(&fx.server, "/hello.txt", &[("range", "bytes=100-")]).await;
        assert_eq!(response.status(), 416);
        assert_eq!(response.headers()["content-range"], "bytes */11");
        assert_eq!(response.headers()["cache-control"], "no-cache");
    }

    #[tokio::test]
    async fn test_conditional_requests() {
        let fx = fixture();
        let first = get(&fx.server, "/hello.txt", &[]).await;
        let etag = first.headers()["etag"].to_str().unwrap().to_string();
        let last_modified = first.headers()["last-modified"].to_str().unwrap().to_string();

        let response = get(&fx.server, "/hello.txt", &[("if-none-match", etag.as_str())]).await;
        assert_eq!(response.status(), 304);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert!(text(response).await.is_empty());

        let response = get(&fx.server, "/hello.txt", &[("if-modified-since", last_modified.as_str())]).await;
        assert_eq!(response.status(), 304);

        let response = get(
            &fx.server,
            "/hello.txt",
            &[("if-modified-since", "Sun, 06 Nov 1994 08:49:37 GMT")],
        )
        .await;
        assert_eq!(response.status(), 200);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unreadable_file_is_500() {
        use std::os::unix::fs::PermissionsExt;

        let fx = fixture();
        let path = fx.server.root().join("locked.bin");
        std::fs::write(&path, b"nope").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores permission bits; nothing to check there
        if std::fs::File::open(&path).is_ok() {
            return;
        }

        let response = get(&fx.server, "/locked.bin", &[]).await;
        assert_eq!(response.status(), 500);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }
}
