use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    /// Port of the staged JSON API.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Port of the form-based editor.
    #[serde(default = "default_form_port")]
    pub form_port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            form_port: default_form_port(),
            worker_threads: Some(4),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Where the staged API persists saved files.
    #[serde(default = "default_storage_dir")]
    pub dir: PathBuf,
    /// Directory the form editor reads and writes directly.
    #[serde(default = "default_form_dir")]
    pub form_dir: PathBuf,
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            form_dir: default_form_dir(),
            frontend_dir: default_frontend_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout_secs: default_fetch_timeout() }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8000 }
fn default_form_port() -> u16 { 5000 }
fn default_storage_dir() -> PathBuf { PathBuf::from("storage") }
fn default_form_dir() -> PathBuf { PathBuf::from("files") }
fn default_frontend_dir() -> PathBuf { PathBuf::from("frontend") }
fn default_fetch_timeout() -> u64 { 10 }

/// Read a config file; `Ok(None)` only when the file does not exist.
pub fn load_optional_from(path: &Path) -> Result<Option<AppConfig>> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse(&content).map(Some),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(anyhow!("cannot read {}: {e}", path.display())),
    }
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load from `CONFIG_PATH` (default `config.toml`), falling back to the
    /// environment only when that file is absent. A present but invalid
    /// file is an error.
    pub fn load() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match load_optional_from(path)? {
            Some(mut cfg) => {
                cfg.normalize_and_validate()
                    .map_err(|e| anyhow!("{}: {e}", path.display()))?;
                Ok(cfg)
            }
            None => Self::from_env(),
        }
    }

    /// Build a config purely from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let mut cfg = AppConfig::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = env_parse::<u16>("SERVER_PORT") {
            cfg.server.port = port;
        }
        if let Some(port) = env_parse::<u16>("FORM_SERVER_PORT") {
            cfg.server.form_port = port;
        }
        cfg.server.worker_threads = env_parse::<usize>("TOKIO_WORKER_THREADS").or(cfg.server.worker_threads);
        if let Ok(dir) = std::env::var("STORAGE_DIR") {
            cfg.storage.dir = dir.into();
        }
        if let Ok(dir) = std::env::var("FORM_FILES_DIR") {
            cfg.storage.form_dir = dir.into();
        }
        if let Some(secs) = env_parse::<u64>("FETCH_TIMEOUT_SECS") {
            cfg.fetch.timeout_secs = secs;
        }
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        if self.fetch.timeout_secs == 0 {
            return Err(anyhow!("fetch.timeout_secs must be a positive number of seconds"));
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 || self.form_port == 0 {
            return Err(anyhow!("server.port and server.form_port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        if self.dir.as_os_str().is_empty() || self.form_dir.as_os_str().is_empty() {
            return Err(anyhow!("storage.dir and storage.form_dir must not be empty"));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() -> Result<()> {
        let mut cfg = parse("")?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.server.form_port, 5000);
        assert_eq!(cfg.storage.dir, PathBuf::from("storage"));
        assert_eq!(cfg.fetch.timeout_secs, 10);
        Ok(())
    }

    #[test]
    fn partial_sections_are_filled() -> Result<()> {
        let mut cfg = parse(
            r#"
            [server]
            port = 9100
            worker_threads = 0

            [storage]
            dir = "/var/lib/editor"
            "#,
        )?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.storage.dir, PathBuf::from("/var/lib/editor"));
        assert_eq!(cfg.storage.form_dir, PathBuf::from("files"));
        Ok(())
    }

    #[test]
    fn missing_file_falls_back_but_invalid_file_fails() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let missing = tmp.path().join("absent.toml");
        assert!(load_optional_from(&missing)?.is_none());
        assert!(AppConfig::load_from(&missing).is_ok());

        let zero_port = tmp.path().join("zero_port.toml");
        std::fs::write(&zero_port, "[server]\nport = 0\n")?;
        assert!(AppConfig::load_from(&zero_port).is_err());

        let garbage = tmp.path().join("garbage.toml");
        std::fs::write(&garbage, "[server\nport = ")?;
        assert!(AppConfig::load_from(&garbage).is_err());

        let good = tmp.path().join("good.toml");
        std::fs::write(&good, "[server]\nport = 9001\n")?;
        assert_eq!(AppConfig::load_from(&good)?.server.port, 9001);
        Ok(())
    }

    #[test]
    fn rejects_zero_port_and_timeout() -> Result<()> {
        let mut cfg = parse("[server]\nport = 0\n")?;
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = parse("[fetch]\ntimeout_secs = 0\n")?;
        assert!(cfg.normalize_and_validate().is_err());
        Ok(())
    }
}
