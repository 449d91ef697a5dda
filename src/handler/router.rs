//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method dispatch, then CORS
//! decoration of whatever response the chosen branch produced.

use crate::handler::static_files;
use crate::http::{self, MimeTable, ServeBody};
use crate::logger;
use hyper::http::request::Parts;
use hyper::{Method, Request, Response};
use std::io;
use std::path::{Path, PathBuf};

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_none_match: Option<&'a str>,
    pub if_modified_since: Option<&'a str>,
    pub range_header: Option<&'a str>,
}

impl<'a> RequestContext<'a> {
    fn from_parts(parts: &'a Parts) -> Self {
        let header = |name: &str| parts.headers.get(name).and_then(|v| v.to_str().ok());
        Self {
            path: parts.uri.path(),
            query: parts.uri.query(),
            is_head: parts.method == Method::HEAD,
            if_none_match: header("if-none-match"),
            if_modified_since: header("if-modified-since"),
            range_header: header("range"),
        }
    }
}

/// Serves files below a fixed root directory
#[derive(Debug, Clone)]
pub struct FileServer {
    root: PathBuf,
    index_files: Vec<String>,
    mime: MimeTable,
}

impl FileServer {
    /// Create a handler for `root`, which is canonicalized once here
    pub fn new(root: &Path, index_files: Vec<String>, mime: MimeTable) -> io::Result<Self> {
        Ok(Self {
            root: root.canonicalize()?,
            index_files,
            mime,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index_files(&self) -> &[String] {
        &self.index_files
    }

    pub const fn mime(&self) -> &MimeTable {
        &self.mime
    }

    /// Handle one request; every response leaves with the CORS headers
    pub async fn handle<B>(&self, req: Request<B>) -> Response<ServeBody> {
        let (parts, body) = req.into_parts();
        drop(body);

        let response = self.dispatch(&parts).await;
        http::apply_cors_headers(response)
    }

    async fn dispatch(&self, parts: &Parts) -> Response<ServeBody> {
        match parts.method {
            Method::GET | Method::HEAD => {
                let ctx = RequestContext::from_parts(parts);
                static_files::serve_path(self, &ctx).await
            }
            Method::OPTIONS => http::build_options_response(),
            _ => {
                logger::log_warning(&format!("Unsupported method: {}", parts.method));
                http::build_501_response(&parts.method)
            }
        }
    }
}
