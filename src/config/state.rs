// Application state module
// Immutable state shared by every connection task

use std::io;

use super::types::Config;
use crate::handler::FileServer;
use crate::http::MimeTable;

/// Application state
pub struct AppState {
    pub files: FileServer,
    pub access_log: bool,
}

impl AppState {
    /// Build state from startup configuration
    ///
    /// Fails if the root directory cannot be canonicalized.
    pub fn new(config: &Config) -> io::Result<Self> {
        let files = FileServer::new(
            &config.files.root,
            config.files.index_files.clone(),
            MimeTable::default(),
        )?;

        Ok(Self {
            files,
            access_log: config.logging.access_log,
        })
    }
}
