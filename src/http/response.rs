//! HTTP response building module
//!
//! Builders for each status the file server produces. None of them set the
//! CORS headers; those are added by [`super::cors::apply_cors_headers`]
//! once the handler has picked a response.

use super::body::{self, ServeBody};
use hyper::header::{
    ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, ETAG, LAST_MODIFIED, LOCATION,
};
use hyper::{Method, Response};

/// Validators and type shared by 200/206/304 file responses
#[derive(Debug, Clone)]
pub struct FileHeaders<'a> {
    pub content_type: &'a str,
    pub etag: &'a str,
    pub last_modified: Option<&'a str>,
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response() -> Response<ServeBody> {
    Response::builder()
        .status(200)
        .body(body::empty())
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(body::empty())
        })
}

/// Build 200 response for a whole file
pub fn build_file_response(
    data: ServeBody,
    headers: &FileHeaders<'_>,
    content_length: u64,
) -> Response<ServeBody> {
    let mut builder = Response::builder()
        .status(200)
        .header(CONTENT_TYPE, headers.content_type)
        .header(CONTENT_LENGTH, content_length)
        .header(ACCEPT_RANGES, "bytes")
        .header(ETAG, headers.etag);
    if let Some(last_modified) = headers.last_modified {
        builder = builder.header(LAST_MODIFIED, last_modified);
    }

    builder.body(data).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(body::empty())
    })
}

/// Build 206 Partial Content response
pub fn build_partial_response(
    data: ServeBody,
    headers: &FileHeaders<'_>,
    start: u64,
    end: u64,
    total_size: u64,
) -> Response<ServeBody> {
    let content_length = end - start + 1;
    let mut builder = Response::builder()
        .status(206)
        .header(CONTENT_TYPE, headers.content_type)
        .header(CONTENT_LENGTH, content_length)
        .header(CONTENT_RANGE, format!("bytes {start}-{end}/{total_size}"))
        .header(ACCEPT_RANGES, "bytes")
        .header(ETAG, headers.etag);
    if let Some(last_modified) = headers.last_modified {
        builder = builder.header(LAST_MODIFIED, last_modified);
    }

    builder.body(data).unwrap_or_else(|e| {
        log_build_error("206", &e);
        Response::new(body::empty())
    })
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str, last_modified: Option<&str>) -> Response<ServeBody> {
    let mut builder = Response::builder().status(304).header(ETAG, etag);
    if let Some(last_modified) = last_modified {
        builder = builder.header(LAST_MODIFIED, last_modified);
    }

    builder.body(body::empty()).unwrap_or_else(|e| {
        log_build_error("304", &e);
        Response::new(body::empty())
    })
}

/// Build generic HTML response (directory listings)
pub fn build_html_response(content: String, is_head: bool) -> Response<ServeBody> {
    let content_length = content.len();
    let data = if is_head {
        body::empty()
    } else {
        body::full(content)
    };

    Response::builder()
        .status(200)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .header(CONTENT_LENGTH, content_length)
        .body(data)
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(body::empty())
        })
}

/// Build 301 redirect response (directory without trailing slash)
pub fn build_301_response(location: &str) -> Response<ServeBody> {
    Response::builder()
        .status(301)
        .header(LOCATION, location)
        .header(CONTENT_LENGTH, 0)
        .body(body::empty())
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(body::empty())
        })
}

/// Build 400 response for a request head that doesn't parse
pub fn build_400_response() -> Response<ServeBody> {
    build_text_response(400, "400 Bad Request")
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<ServeBody> {
    build_text_response(404, "404 Not Found")
}

/// Build 404 response for a directory that can't be read
pub fn build_404_listing_response() -> Response<ServeBody> {
    build_text_response(404, "No permission to list directory")
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(file_size: u64) -> Response<ServeBody> {
    Response::builder()
        .status(416)
        .header(CONTENT_TYPE, "text/plain")
        .header(CONTENT_RANGE, format!("bytes */{file_size}"))
        .body(body::full("Range Not Satisfiable"))
        .unwrap_or_else(|e| {
            log_build_error("416", &e);
            Response::new(body::full("Range Not Satisfiable"))
        })
}

/// Build 431 response for an oversized request head
pub fn build_431_response() -> Response<ServeBody> {
    build_text_response(431, "431 Request Header Fields Too Large")
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response<ServeBody> {
    build_text_response(500, "500 Internal Server Error")
}

/// Build 501 Not Implemented response for unsupported methods
pub fn build_501_response(method: &Method) -> Response<ServeBody> {
    build_text_response(
        501,
        &format!("501 Not Implemented: unsupported method ({method})"),
    )
}

fn build_text_response(status: u16, message: &str) -> Response<ServeBody> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(CONTENT_LENGTH, message.len())
        .body(body::full(message.to_owned()))
        .unwrap_or_else(|e| {
            log_build_error(&status.to_string(), &e);
            Response::new(body::full(message.to_owned()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
