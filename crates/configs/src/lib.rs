use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;
use tracing::warn;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 10000;
pub const DEFAULT_DATA_FILE: &str = "file.json";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4) }
    }
}

/// Location of the JSON array backing the record store.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_data_file")]
    pub data_file: String,
    /// Seed the file with `[]` at startup when it does not exist yet.
    #[serde(default = "default_create_if_missing")]
    pub create_if_missing: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { data_file: default_data_file(), create_if_missing: default_create_if_missing() }
    }
}

fn default_host() -> String { DEFAULT_HOST.to_string() }
fn default_port() -> u16 { DEFAULT_PORT }
fn default_data_file() -> String { DEFAULT_DATA_FILE.to_string() }
fn default_create_if_missing() -> bool { true }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Config file first; when it is missing or invalid, build from env vars
    /// (`SERVER_HOST`, `SERVER_PORT`, `DATA_FILE`) over the defaults.
    pub fn load_or_env() -> Result<Self> {
        match Self::load_and_validate() {
            Ok(cfg) => Ok(cfg),
            Err(e) => {
                warn!(error = %e, "config file not usable; falling back to env vars and defaults");
                let mut cfg = Self::from_env();
                cfg.normalize_and_validate()?;
                Ok(cfg)
            }
        }
    }

    pub fn from_env() -> Self {
        let mut cfg = AppConfig::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        if let Ok(file) = std::env::var("DATA_FILE") {
            cfg.store.data_file = file;
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.store.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = DEFAULT_HOST.to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StoreConfig {
    pub fn validate(&self) -> Result<()> {
        if self.data_file.trim().is_empty() {
            return Err(anyhow!("store.data_file is empty; set it in config.toml or via DATA_FILE"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn defaults_when_sections_absent() -> Result<()> {
        let cfg = load_from_str("")?;
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 10000);
        assert_eq!(cfg.store.data_file, "file.json");
        assert!(cfg.store.create_if_missing);
        Ok(())
    }

    #[test]
    fn parses_partial_sections() -> Result<()> {
        let cfg = load_from_str(
            r#"
            [server]
            port = 3000

            [store]
            data_file = "data/records.json"
            create_if_missing = false
            "#,
        )?;
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.server.bind_addr(), "127.0.0.1:3000");
        assert_eq!(cfg.store.data_file, "data/records.json");
        assert!(!cfg.store.create_if_missing);
        Ok(())
    }

    #[test]
    fn normalize_fixes_host_and_threads() -> Result<()> {
        let mut cfg = load_from_str("[server]\nhost = \"  \"\nport = 8080\nworker_threads = 0\n")?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.worker_threads, Some(4));
        Ok(())
    }

    #[test]
    fn rejects_zero_port_and_empty_data_file() -> Result<()> {
        let mut cfg = load_from_str("[server]\nport = 0\n")?;
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = load_from_str("[store]\ndata_file = \"\"\n")?;
        assert!(cfg.normalize_and_validate().is_err());
        Ok(())
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(load_from_str("[server\nport = 1").is_err());
    }

    // env vars are process-wide; tests touching them run one at a time
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ENV_KEYS: [&str; 4] = ["CONFIG_PATH", "SERVER_HOST", "SERVER_PORT", "DATA_FILE"];

    fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        for k in ENV_KEYS {
            std::env::remove_var(k);
        }
        std::env::set_var("CONFIG_PATH", "/nonexistent/config-for-tests.toml");
        for (k, v) in vars {
            std::env::set_var(k, v);
        }
        let out = f();
        for k in ENV_KEYS {
            std::env::remove_var(k);
        }
        out
    }

    #[test]
    fn env_values_override_defaults() -> Result<()> {
        let cfg = with_env(
            &[("SERVER_HOST", "0.0.0.0"), ("SERVER_PORT", "4321"), ("DATA_FILE", "data/records.json")],
            AppConfig::load_or_env,
        )?;
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 4321);
        assert_eq!(cfg.store.data_file, "data/records.json");
        assert!(cfg.store.create_if_missing);
        Ok(())
    }

    #[test]
    fn no_file_and_no_env_gives_defaults() -> Result<()> {
        let cfg = with_env(&[], AppConfig::load_or_env)?;
        assert_eq!(cfg.server.bind_addr(), "127.0.0.1:10000");
        assert_eq!(cfg.store.data_file, "file.json");
        Ok(())
    }

    #[test]
    fn unparsable_port_is_ignored() -> Result<()> {
        let cfg = with_env(&[("SERVER_PORT", "not-a-port")], AppConfig::load_or_env)?;
        assert_eq!(cfg.server.port, DEFAULT_PORT);
        Ok(())
    }

    #[test]
    fn rejected_config_file_falls_back_to_env() -> Result<()> {
        let path = std::env::temp_dir().join(format!("configs_zero_port_{}.toml", std::process::id()));
        std::fs::write(&path, "[server]\nport = 0\n")?;
        let path_str = path.to_string_lossy().into_owned();

        let cfg = with_env(&[("CONFIG_PATH", path_str.as_str()), ("SERVER_PORT", "7000")], AppConfig::load_or_env)?;
        assert_eq!(cfg.server.port, 7000);

        let _ = std::fs::remove_file(&path);
        Ok(())
    }

    #[test]
    fn zero_port_from_env_is_rejected() {
        let res = with_env(&[("SERVER_PORT", "0")], AppConfig::load_or_env);
        assert!(res.is_err());
    }

    #[test]
    fn empty_data_file_from_env_is_rejected() {
        let res = with_env(&[("DATA_FILE", " ")], AppConfig::load_or_env);
        assert!(res.is_err());
    }
}
