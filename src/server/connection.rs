// Connection handling module
// Each accepted TCP connection is served by its own task

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use hyper::body::{Body, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Version};
use hyper_util::rt::TokioIo;

use super::request_head::{read_request_head, write_rejection, HeadStatus, Rewind};
use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};

/// Hand an accepted connection to a new task.
///
/// The task is detached: it is not tracked or joined, and a failure on
/// one connection never reaches the accept loop or other connections.
///
/// The request head is read and checked here first. A head hyper would
/// reject gets a 400/431 from this server, CORS headers included. One
/// request is served per connection so every request goes through this
/// check.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
) {
    let state = Arc::clone(state);

    tokio::spawn(async move {
        let mut stream = stream;
        let mut head = Vec::with_capacity(1024);

        let rejection = match read_request_head(&mut stream, &mut head).await {
            Ok(HeadStatus::Complete) => None,
            Ok(HeadStatus::Malformed) => Some(http::build_400_response()),
            Ok(HeadStatus::TooLarge) => Some(http::build_431_response()),
            Ok(HeadStatus::Closed) => return,
            Err(err) => {
                logger::log_connection_error(&err);
                return;
            }
        };

        if let Some(response) = rejection {
            logger::log_warning(&format!(
                "Rejected request from {peer_addr}: {}",
                response.status()
            ));
            let response = http::apply_cors_headers(response);
            if let Err(err) = write_rejection(&mut stream, response).await {
                logger::log_connection_error(&err);
            }
            return;
        }

        let io = TokioIo::new(Rewind::new(head, stream));

        let service = service_fn(move |req: Request<Incoming>| {
            let state = Arc::clone(&state);
            async move {
                let entry = state
                    .access_log
                    .then(|| access_entry(&req, peer_addr));

                let response = state.files.handle(req).await;

                if let Some(mut entry) = entry {
                    entry.status = response.status().as_u16();
                    entry.body_bytes = response.body().size_hint().exact().filter(|&n| n > 0);
                    logger::log_access(&entry);
                }
                Ok::<_, Infallible>(response)
            }
        });

        // Client disconnects surface here and only end this task
        if let Err(err) = http1::Builder::new()
            .keep_alive(false)
            .serve_connection(io, service)
            .await
        {
            logger::log_connection_error(&err);
        }
    });
}

fn access_entry(req: &Request<Incoming>, peer_addr: SocketAddr) -> AccessLogEntry {
    let target = req
        .uri()
        .path_and_query()
        .map_or("/", |pq| pq.as_str());
    let version = match req.version() {
        Version::HTTP_10 => "1.0",
        _ => "1.1",
    };
    AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().as_str(),
        target,
        version,
    )
}
