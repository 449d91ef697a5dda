//! Request handler module
//!
//! Method dispatch and static file serving below the configured root.

pub mod listing;
pub mod resolve;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::FileServer;
