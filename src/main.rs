use std::sync::Arc;

mod api;
mod config;
mod logger;
mod server;
mod session;
mod store;

use server::{create_reusable_listener, start_server_loop, start_signal_handler};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg.logging)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = create_reusable_listener(addr)?;

    let state = Arc::new(config::AppState::new(&cfg));
    start_signal_handler(Arc::clone(&state.shutdown_signal))?;

    logger::log_server_start(&addr, &cfg);
    logger::log_info(&format!("Document: {}", state.store.path().display()));
    start_server_loop(listener, state).await;

    logger::log_info("Server stopped");
    Ok(())
}
