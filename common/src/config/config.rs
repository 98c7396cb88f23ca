use anyhow::{Context, Result};
use serde::Deserialize;

/// Layered application configuration: a TOML file overridden by `APP_`-prefixed
/// environment variables (`APP_SERVER__PORT=8080`, `APP_DATABASE__DB_NAME=...`).
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    pub database: Option<DatabaseConfig>,
    pub server: Option<ServerConfig>,
    pub sys: Option<SysConfig>,
    pub session: Option<SessionConfig>,
}

impl AppConfig {
    pub fn new(file: &str) -> Result<Self> {
        Self::load(file, env_source())
    }

    fn load(file: &str, env: ::config::Environment) -> Result<Self> {
        let config = ::config::Config::builder()
            .add_source(::config::File::with_name(file).required(true))
            .add_source(env)
            .build()
            .with_context(|| format!("failed to build configuration from {file}"))?;
        config.try_deserialize::<AppConfig>().context("failed to deserialize configuration")
    }

    pub fn get_database(&self) -> DatabaseConfig {
        self.database.clone().unwrap_or_default()
    }
    pub fn get_server(&self) -> ServerConfig {
        self.server.clone().unwrap_or_default()
    }
    pub fn get_sys(&self) -> SysConfig {
        self.sys.clone().unwrap_or_default()
    }
    pub fn get_session(&self) -> SessionConfig {
        self.session.clone().unwrap_or_default()
    }
}

// `__` splits section from key so keys like `db_name` stay intact
fn env_source() -> ::config::Environment {
    ::config::Environment::with_prefix("APP").prefix_separator("_").separator("__")
}

pub const MEMORY_DATABASE_URL: &str = "memory://";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `mongodb://...` or `memory://` for the in-process store
    pub url: String,
    pub db_name: String,
}

impl DatabaseConfig {
    pub fn is_memory(&self) -> bool {
        self.url.starts_with(MEMORY_DATABASE_URL)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { url: MEMORY_DATABASE_URL.to_string(), db_name: "love_connect".to_string() }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 5001 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SysConfig {
    pub log_level: String,
    // salt mixed into password digests
    pub md5_key: String,
    pub reconcile_on_start: bool,
}

impl Default for SysConfig {
    fn default() -> Self {
        Self { log_level: "info".to_string(), md5_key: String::new(), reconcile_on_start: false }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    pub ttl_secs: u64,
    pub cookie_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { ttl_secs: 7 * 24 * 60 * 60, cookie_name: "session_token".to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_sections_from_file() {
        let file = write_config(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8088

            [database]
            url = "mongodb://localhost:27017"
            db_name = "lc_test"

            [sys]
            log_level = "debug"
            md5_key = "pepper"
            reconcile_on_start = true
            "#,
        );
        let cfg = AppConfig::new(file.path().to_str().unwrap()).unwrap();

        assert_eq!(cfg.get_server().port, 8088);
        assert_eq!(cfg.get_server().host, "127.0.0.1");
        assert_eq!(cfg.get_database().db_name, "lc_test");
        assert!(!cfg.get_database().is_memory());
        assert!(cfg.get_sys().reconcile_on_start);
        assert_eq!(cfg.get_sys().md5_key, "pepper");
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let file = write_config(
            r#"
            [session]
            ttl_secs = 60
            "#,
        );
        let cfg = AppConfig::new(file.path().to_str().unwrap()).unwrap();

        assert_eq!(cfg.get_session().ttl_secs, 60);
        assert_eq!(cfg.get_session().cookie_name, "session_token");
        assert!(cfg.get_database().is_memory());
        assert_eq!(cfg.get_server().port, 5001);
        assert_eq!(cfg.get_sys().log_level, "info");
    }

    #[test]
    fn environment_overrides_file_values() {
        let file = write_config(
            r#"
            [server]
            port = 5001

            [database]
            db_name = "from_file"
            "#,
        );
        let mut vars = ::config::Map::new();
        vars.insert("APP_SERVER__PORT".to_string(), "9999".to_string());
        vars.insert("APP_DATABASE__DB_NAME".to_string(), "from_env".to_string());
        // single underscore does not address a section key
        vars.insert("APP_SYS_LOG_LEVEL".to_string(), "trace".to_string());

        let cfg = AppConfig::load(file.path().to_str().unwrap(), env_source().source(Some(vars))).unwrap();

        assert_eq!(cfg.get_server().port, 9999);
        assert_eq!(cfg.get_database().db_name, "from_env");
        assert_eq!(cfg.get_sys().log_level, "info");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(AppConfig::new("/definitely/not/here.toml").is_err());
    }
}
