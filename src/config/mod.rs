// Configuration module entry point
// Builds the startup configuration and the state shared by connections

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::Config;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8888;
pub const DEFAULT_ROOT: &str = ".";

impl Config {
    /// Load configuration from positional arguments: `[DIR] [PORT]`
    ///
    /// Missing arguments fall back to the defaults; extra ones are ignored.
    pub fn from_args<I>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();

        let mut builder = config::Config::builder()
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("files.root", DEFAULT_ROOT)?
            .set_default("files.index_files", vec!["index.html", "index.htm"])?
            .set_default("logging.access_log", true)?;

        if let Some(root) = args.next() {
            builder = builder.set_override("files.root", root)?;
        }
        if let Some(port) = args.next() {
            let port: u16 = port.parse().map_err(|e| {
                config::ConfigError::Message(format!("Invalid port '{port}': {e}"))
            })?;
            builder = builder.set_override("server.port", i64::from(port))?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Check that the root exists and is a directory
    pub fn validate(&self) -> Result<(), String> {
        let root = &self.files.root;
        match std::fs::metadata(root) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(format!("Not a directory: {}", root.display())),
            Err(e) => Err(format!("Cannot serve '{}': {e}", root.display())),
        }
    }
}
