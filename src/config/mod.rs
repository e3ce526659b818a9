// Configuration module entry point
// Loads layered configuration and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{Config, StorageBackend, StorageConfig};

/// Environment variable that overrides `server.port`
pub const PORT_ENV: &str = "SERVING_PORT";

/// Default listening port when neither file nor environment sets one
pub const DEFAULT_PORT: u16 = 8000;

impl Config {
    /// Load configuration from specified file path (extension optional)
    ///
    /// Sources, lowest precedence first: built-in defaults, the config file,
    /// `WIKI_*` environment variables, then `SERVING_PORT`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::load_with(config_path, std::env::var(PORT_ENV).ok())
    }

    /// Same as [`Config::load_from`] with the port override passed in explicitly
    pub fn load_with(
        config_path: &str,
        port_override: Option<String>,
    ) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("WIKI")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("storage.backend", "file")?
            .set_default("storage.data_dir", "data")?
            .set_default("wiki.front_page", "FrontPage")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "flatwiki")?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_override_option("server.port", port_override)?
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
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let cfg = Config::load_with("does-not-exist", None).expect("load");
        assert_eq!(cfg.server.port, DEFAULT_PORT);
        assert_eq!(cfg.storage.backend, StorageBackend::File);
        assert_eq!(cfg.storage.data_dir, "data");
        assert_eq!(cfg.wiki.front_page, "FrontPage");
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert!(cfg.performance.max_connections.is_none());
    }

    #[test]
    fn test_port_override() {
        let cfg = Config::load_with("does-not-exist", Some("9123".to_string())).expect("load");
        assert_eq!(cfg.server.port, 9123);
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 9123);
    }

    #[test]
    fn test_invalid_port_override_fails() {
        assert!(Config::load_with("does-not-exist", Some("not-a-port".to_string())).is_err());
    }

    #[test]
    fn test_file_values_and_override_precedence() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("wiki.toml");
        std::fs::write(
            &path,
            "[server]\nhost = \"127.0.0.1\"\nport = 8088\n\n[storage]\nbackend = \"memory\"\ndata_dir = \"pages\"\n",
        )
        .expect("write config");
        let path = path.to_str().expect("utf8 path");

        let cfg = Config::load_with(path, None).expect("load");
        assert_eq!(cfg.server.port, 8088);
        assert_eq!(cfg.storage.backend, StorageBackend::Memory);
        assert_eq!(cfg.storage.data_dir, "pages");
        assert_eq!(cfg.get_socket_addr().unwrap().to_string(), "127.0.0.1:8088");

        let cfg = Config::load_with(path, Some("8099".to_string())).expect("load");
        assert_eq!(cfg.server.port, 8099);
    }
}
