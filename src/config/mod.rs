use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TICK_SECS: u64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// How often the timeline clock advances.
    pub tick_interval_secs: u64,
    /// Load the demo dataset into an empty store on startup.
    pub seed_demo_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        let database_url = crate::paths::data_dir()
            .map(|dir| format!("sqlite:{}", dir.join("eventos.db").display()))
            .unwrap_or_else(|_| "sqlite:eventos.db".to_string());
        Self {
            database_url,
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            tick_interval_secs: DEFAULT_TICK_SECS,
            seed_demo_data: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(file_config) = Self::from_conf_file()? {
            config.apply_file(file_config);
        }

        config.apply_env(|key| std::env::var(key).ok())?;

        let root = crate::paths::install_root()?;
        config.normalize_database_url(&root)?;
        config.validate()?;
        Ok(config)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }

    fn from_conf_file() -> Result<Option<FileConfig>> {
        let path = crate::paths::conf_dir()?.join("config.json");
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let file_config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(Some(file_config))
    }

    fn apply_file(&mut self, file_config: FileConfig) {
        if let Some(database_url) = file_config.database_url {
            self.database_url = database_url;
        }
        if let Some(host) = file_config.host {
            self.host = host;
        }
        if let Some(port) = file_config.port {
            self.port = port;
        }
        if let Some(secs) = file_config.tick_interval_secs {
            self.tick_interval_secs = secs;
        }
        if let Some(seed) = file_config.seed_demo_data {
            self.seed_demo_data = seed;
        }
    }

    fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db_url) = lookup("DATABASE_URL") {
            self.database_url = db_url;
        }

        if let Some(host) = lookup("HOST") {
            self.host = host;
        }

        if let Some(port) = lookup("PORT") {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {}", port))?;
        }

        if let Some(secs) = lookup("EVENTOS_TICK_SECS") {
            self.tick_interval_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("EVENTOS_TICK_SECS is not a number: {}", secs))?;
        }

        if let Some(seed) = lookup("EVENTOS_SEED") {
            self.seed_demo_data = matches!(
                seed.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        Ok(())
    }

    fn normalize_database_url(&mut self, root: &Path) -> Result<()> {
        let Some(path_str) = self.database_url.strip_prefix("sqlite:") else {
            return Ok(());
        };

        if path_str.starts_with(':') {
            // sqlite::memory:
            return Ok(());
        }

        let path = Path::new(path_str);
        if path.is_absolute() {
            return Ok(());
        }

        if path
            .components()
            .any(|component| matches!(component, std::path::Component::ParentDir))
        {
            anyhow::bail!("SQLite database path cannot contain '..'");
        }

        let absolute = root.join(path);
        self.database_url = format!("sqlite:{}", absolute.display());
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.tick_interval_secs == 0 {
            anyhow::bail!("tick_interval_secs must be greater than zero");
        }
        if self.host.trim().is_empty() {
            anyhow::bail!("host cannot be empty");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    database_url: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    tick_interval_secs: Option<u64>,
    seed_demo_data: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn base() -> Config {
        Config {
            database_url: "sqlite:eventos.db".to_string(),
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            tick_interval_secs: DEFAULT_TICK_SECS,
            seed_demo_data: true,
        }
    }

    #[test]
    fn file_values_override_defaults() {
        let mut config = base();
        let file: FileConfig =
            serde_json::from_str(r#"{"port": 9000, "seed_demo_data": false}"#).unwrap();
        config.apply_file(file);

        assert_eq!(config.port, 9000);
        assert!(!config.seed_demo_data);
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn env_values_override_file_values() {
        let mut config = base();
        config.apply_file(serde_json::from_str(r#"{"host": "0.0.0.0"}"#).unwrap());

        let env: HashMap<&str, &str> = [
            ("HOST", "10.0.0.5"),
            ("PORT", "not-a-port"),
            ("EVENTOS_TICK_SECS", "5"),
            ("EVENTOS_SEED", "off"),
        ]
        .into_iter()
        .collect();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.host, "10.0.0.5");
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.tick_interval(), Duration::from_secs(5));
        assert!(!config.seed_demo_data);
    }

    #[test]
    fn rejects_non_numeric_tick_interval() {
        let mut config = base();
        let result = config.apply_env(|key| {
            (key == "EVENTOS_TICK_SECS").then(|| "soon".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn rejects_malformed_port() {
        for bad in ["http", "70000", "-1"] {
            let mut config = base();
            let result = config.apply_env(|key| (key == "PORT").then(|| bad.to_string()));
            assert!(result.is_err(), "PORT={} was accepted", bad);
            assert_eq!(config.port, DEFAULT_PORT);
        }
    }

    #[test]
    fn relative_database_path_resolves_under_root() {
        let mut config = base();
        config.database_url = "sqlite:data/eventos.db".to_string();
        config
            .normalize_database_url(&PathBuf::from("/opt/eventos"))
            .unwrap();
        assert_eq!(config.database_url, "sqlite:/opt/eventos/data/eventos.db");
    }

    #[test]
    fn database_path_cannot_escape_root() {
        let mut config = base();
        config.database_url = "sqlite:../eventos.db".to_string();
        assert!(
            config
                .normalize_database_url(&PathBuf::from("/opt/eventos"))
                .is_err()
        );
    }

    #[test]
    fn zero_tick_interval_is_invalid() {
        let mut config = base();
        config.tick_interval_secs = 0;
        assert!(config.validate().is_err());
    }
}
