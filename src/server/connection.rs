// Connection handling module
// Serves one accepted TCP connection in its own task

use std::sync::Arc;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;

use crate::api;
use crate::config::AppState;
use crate::logger;

/// Spawn a task serving HTTP/1.1 on `stream` until the client hangs up.
///
/// Connections are unbounded: every accepted socket gets its own task.
pub fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: &Arc<AppState>,
) {
    logger::log_debug(&format!("[Connection] Accepted from: {peer_addr}"));

    let state = Arc::clone(state);
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.keep_alive(state.config.server.keep_alive);

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| api::handle_api(req, Arc::clone(&state), peer_addr)),
        );

        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }
    });
}
