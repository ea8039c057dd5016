// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)
// - SIGUSR1: Reopen log files

use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Start signal handlers (Unix only)
///
/// Spawns a background task that fires `shutdown` once on SIGTERM or
/// SIGINT and reopens log files on SIGUSR1.
///
/// | Signal  | Action             |
/// |---------|--------------------|
/// | SIGTERM | Graceful stop      |
/// | SIGINT  | Graceful stop      |
/// | SIGUSR1 | Reopen log files   |
#[cfg(unix)]
pub fn start_signal_handler(shutdown: Arc<Notify>) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigusr1 = signal(SignalKind::user_defined1())?;

    logger::log_debug(&format!(
        "[SIGNAL] Handlers registered (pid {})",
        std::process::id()
    ));

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    logger::log_shutdown("SIGTERM");
                    shutdown.notify_one();
                    break;
                }

                _ = sigint.recv() => {
                    logger::log_shutdown("SIGINT");
                    shutdown.notify_one();
                    break;
                }

                _ = sigusr1.recv() => {
                    logger::reopen();
                }
            }
        }
    });

    Ok(())
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(shutdown: Arc<Notify>) -> std::io::Result<()> {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            logger::log_shutdown("Ctrl+C");
            shutdown.notify_one();
        }
    });

    Ok(())
}
