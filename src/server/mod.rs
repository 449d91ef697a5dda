// Server module entry point
// Listener setup, the accept loop, per-connection tasks, request head
// checks and shutdown signals

pub mod connection;
pub mod listener;
pub mod request_head;
pub mod signal;

// `loop` is a keyword, so the file is mounted as server_loop
#[path = "loop.rs"]
pub mod server_loop;

// Re-export commonly used items
pub use listener::create_reusable_listener;
pub use server_loop::start_server_loop;
pub use signal::ShutdownSignal;
