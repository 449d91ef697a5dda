//! Access log format module
//!
//! One Common Log Format line per request:
//! `host - - [time] "METHOD target HTTP/x.y" status size`

use chrono::{DateTime, Local};
use std::fmt;

/// What the access log records about one request
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: DateTime<Local>,
    /// Method, target (path plus query) and protocol, as received
    pub request_line: String,
    pub status: u16,
    /// Body size in bytes; `None` is logged as `-`
    pub body_bytes: Option<u64>,
}

impl AccessLogEntry {
    /// Start an entry stamped with the current local time
    ///
    /// Status and size are filled in once the response exists.
    pub fn new(remote_addr: String, method: &str, target: &str, http_version: &str) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            request_line: format!("{method} {target} HTTP/{http_version}"),
            status: 0,
            body_bytes: None,
        }
    }
}

impl fmt::Display for AccessLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - - [{}] \"{}\" {} ",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.request_line,
            self.status,
        )?;
        match self.body_bytes {
            Some(bytes) => write!(f, "{bytes}"),
            None => f.write_str("-"),
        }
    }
}
