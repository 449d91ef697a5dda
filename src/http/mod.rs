//! HTTP protocol layer module
//!
//! Protocol helpers shared by the file handler: MIME lookup, CORS
//! decoration, response builders, range and cache validation, and the
//! streaming file body.

pub mod body;
pub mod cache;
pub mod cors;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use body::{FileBody, ServeBody};
pub use cors::apply_cors_headers;
pub use mime::MimeTable;
pub use response::{
    build_301_response, build_304_response, build_400_response, build_404_listing_response,
    build_404_response, build_416_response, build_431_response, build_500_response,
    build_501_response, build_options_response,
};
