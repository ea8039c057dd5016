// Configuration module entry point
// Loads service settings and owns the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, LoggingConfig};

/// Settings file looked up in the working directory (any extension the
/// `config` crate understands).
pub const DEFAULT_CONFIG_NAME: &str = "mock_server";

impl Config {
    /// Load configuration from the default settings file and environment.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_NAME)
    }

    /// Load configuration from specified file path (without extension).
    /// The file is optional; `MOCK_*` environment variables override it
    /// (`MOCK_SERVER__PORT=9000`).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("MOCK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.keep_alive", true)?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("store.path", "config/settings.json")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("does-not-exist/mock_server").unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8080);
        assert!(cfg.server.keep_alive);
        assert_eq!(cfg.store.path, "config/settings.json");
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.logging.access_log_format, "common");
        assert!(cfg.logging.access_log_file.is_none());
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::load_from("does-not-exist/mock_server").unwrap();
        let addr = cfg.get_socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
        assert!(addr.ip().is_unspecified());
    }
}
