// Signal handling module
//
// Supported signals:
// - SIGINT:  Stop accepting and exit (Ctrl+C)
// - SIGTERM: Stop accepting and exit
//
// In-flight connections are not drained.

use std::io;

/// Registered shutdown signals
///
/// Registration happens up front so a failure is a startup error rather
/// than a panic inside a background task.
pub struct ShutdownSignal {
    #[cfg(unix)]
    sigint: tokio::signal::unix::Signal,
    #[cfg(unix)]
    sigterm: tokio::signal::unix::Signal,
}

impl ShutdownSignal {
    /// Register handlers (Unix: SIGINT + SIGTERM). Needs a tokio runtime.
    #[cfg(unix)]
    pub fn register() -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            sigint: signal(SignalKind::interrupt())?,
            sigterm: signal(SignalKind::terminate())?,
        })
    }

    /// Windows fallback - only handles Ctrl+C
    #[cfg(not(unix))]
    #[allow(clippy::unnecessary_wraps)]
    pub fn register() -> io::Result<Self> {
        Ok(Self {})
    }

    /// Wait for the first signal and return its name
    #[cfg(unix)]
    pub async fn recv(mut self) -> &'static str {
        tokio::select! {
            _ = self.sigint.recv() => "SIGINT",
            _ = self.sigterm.recv() => "SIGTERM",
        }
    }

    #[cfg(not(unix))]
    pub async fn recv(self) -> &'static str {
        if let Err(e) = tokio::signal::ctrl_c().await {
            crate::logger::log_error(&format!("Failed to listen for Ctrl+C: {e}"));
            // Without a working signal source, keep serving forever
            std::future::pending::<()>().await;
        }
        "Ctrl+C"
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_succeeds() {
        assert!(ShutdownSignal::register().is_ok());
    }
}
