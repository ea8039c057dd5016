// Server loop module
// Accepts connections until a shutdown signal arrives

use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::handle_connection;
use crate::config::AppState;
use crate::logger;

/// Accept and dispatch connections until `state.shutdown_signal` fires.
///
/// The listener is dropped on return; connections already in flight keep
/// running on their own tasks until the runtime stops.
pub async fn start_server_loop(listener: TcpListener, state: Arc<AppState>) {
    let shutdown = Arc::clone(&state.shutdown_signal);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => handle_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = shutdown.notified() => {
                logger::log_info("Accept loop stopped");
                break;
            }
        }
    }

    drop(listener);
}
