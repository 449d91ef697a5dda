use std::sync::Arc;

mod config;
mod handler;
mod http;
mod logger;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::from_args(std::env::args().skip(1))?;
    cfg.validate()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(async_main(cfg));

    // Don't wait for in-flight connections on exit
    runtime.shutdown_background();
    result
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let state = Arc::new(config::AppState::new(&cfg)?);

    let listener = server::create_reusable_listener(addr)
        .map_err(|e| format!("Failed to bind {addr}: {e}"))?;
    let shutdown = server::ShutdownSignal::register()?;

    logger::log_server_start(&cfg.files.root, &addr);

    server::start_server_loop(listener, state, async move {
        let signal = shutdown.recv().await;
        logger::log_shutdown(signal);
    })
    .await;

    Ok(())
}
