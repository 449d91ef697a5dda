// Server loop module
// Accepts connections until the shutdown future resolves

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config;
use crate::logger;

/// Pause after a failed accept (e.g. out of file descriptors)
pub const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Accept connections and spawn one task per connection
///
/// Accept errors are logged and the loop keeps going after a short pause.
/// When `shutdown` resolves the loop returns; connection tasks already
/// spawned are left to the runtime.
pub async fn start_server_loop<F>(
    listener: TcpListener,
    state: Arc<config::AppState>,
    shutdown: F,
) where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => accept_failed(&e).await,
                }
            }

            () = &mut shutdown => break,
        }
    }
}

/// Log an accept error and back off so a persistent error doesn't spin
async fn accept_failed(error: &io::Error) {
    logger::log_error(&format!("Failed to accept connection: {error}"));
    tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
}
