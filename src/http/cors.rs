//! CORS header injection
//!
//! Decorates every outgoing response with permissive CORS headers and
//! `Cache-Control: no-cache`, appended after whatever the handler set.

use hyper::header::{
    HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL,
};
use hyper::Response;

/// Injected headers, in wire order
pub const CORS_HEADERS: [(HeaderName, &str); 4] = [
    (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS"),
    (ACCESS_CONTROL_ALLOW_HEADERS, "*"),
    (CACHE_CONTROL, "no-cache"),
];

/// Append the CORS and cache-control headers to a finished response
///
/// Handlers never set these names themselves, so each insert lands after
/// the handler's headers in insertion order.
pub fn apply_cors_headers<B>(mut response: Response<B>) -> Response<B> {
    let headers = response.headers_mut();
    for (name, value) in CORS_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::CONTENT_TYPE;

    #[test]
    fn test_headers_added_with_exact_values() {
        let response = apply_cors_headers(Response::new(()));
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-allow-methods"], "GET, OPTIONS");
        assert_eq!(headers["access-control-allow-headers"], "*");
        assert_eq!(headers["cache-control"], "no-cache");
    }

    #[test]
    fn test_headers_follow_handler_headers() {
        let response = Response::builder()
            .status(404)
            .header(CONTENT_TYPE, "text/plain")
            .body(())
            .unwrap();
        let response = apply_cors_headers(response);

        let names: Vec<&str> = response.headers().keys().map(HeaderName::as_str).collect();
        assert_eq!(
            names,
            [
                "content-type",
                "access-control-allow-origin",
                "access-control-allow-methods",
                "access-control-allow-headers",
                "cache-control",
            ]
        );
        assert_eq!(response.status(), 404);
    }

    #[test]
    fn test_existing_cache_control_is_replaced() {
        let response = Response::builder()
            .header(CACHE_CONTROL, "public, max-age=3600")
            .body(())
            .unwrap();
        let response = apply_cors_headers(response);
        let values: Vec<_> = response.headers().get_all(CACHE_CONTROL).iter().collect();
        assert_eq!(values, ["no-cache"]);
    }
}
