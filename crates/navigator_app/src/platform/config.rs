//! RON configuration file: backends, logging and tick rate.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use navigator_core::{ClientConfig, ClientsConfig};
use navigator_engine::SonarrSettings;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const LOCAL_CONFIG: &str = "navigator.ron";
const USER_CONFIG: &str = ".config/navigator/config.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("no config file found (looked in {0:?})")]
    NotFound(Vec<PathBuf>),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sonarr: Vec<BackendConfig>,
    pub logging: LoggingConfig,
    /// Spinner tick interval.
    pub tick_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sonarr: Vec::new(),
            logging: LoggingConfig::default(),
            tick_ms: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BackendConfig {
    pub name: String,
    pub host: String,
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub default_quality_profile: Option<String>,
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: PathBuf::from("navigator.log"),
        }
    }
}

/// Picks the config file: the explicit path if given, else the first of
/// `./navigator.ron` and `$HOME/.config/navigator/config.ron` that exists.
pub fn locate(
    explicit: Option<PathBuf>,
    cwd: &Path,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    let mut candidates: Vec<PathBuf> = std::iter::once(cwd.join(LOCAL_CONFIG))
        .chain(home.map(|home| home.join(USER_CONFIG)))
        .collect();
    match candidates.iter().position(|path| path.is_file()) {
        Some(index) => Ok(candidates.swap_remove(index)),
        None => Err(ConfigError::NotFound(candidates)),
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sonarr.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one sonarr backend is required".to_string(),
            ));
        }
        let mut names = HashSet::new();
        for backend in &self.sonarr {
            if backend.name.trim().is_empty() {
                return Err(ConfigError::Invalid("backend name is empty".to_string()));
            }
            if !names.insert(backend.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "backend name {:?} is used twice",
                    backend.name
                )));
            }
            let url = Url::parse(&backend.host).map_err(|err| {
                ConfigError::Invalid(format!("host of {:?}: {err}", backend.name))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigError::Invalid(format!(
                    "host of {:?} must be http or https",
                    backend.name
                )));
            }
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::Invalid("tick_ms must be positive".to_string()));
        }
        Ok(())
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// The part of the config the state machine sees, in backend order.
    pub fn clients(&self) -> ClientsConfig {
        ClientsConfig {
            clients: self
                .sonarr
                .iter()
                .map(|backend| ClientConfig {
                    name: backend.name.clone(),
                    default_quality_profile: backend.default_quality_profile.clone(),
                })
                .collect(),
        }
    }

    pub fn backend_settings(&self) -> Vec<SonarrSettings> {
        self.sonarr
            .iter()
            .map(|backend| {
                let mut settings = SonarrSettings::new(
                    backend.name.clone(),
                    backend.host.clone(),
                    backend.api_key.clone(),
                );
                settings.request_timeout = Duration::from_secs(backend.timeout_secs);
                settings
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"(
        sonarr: [
            (
                name: "home",
                host: "http://localhost:8989",
                api_key: "abc",
                default_quality_profile: Some("HD-1080p"),
            ),
            (name: "cabin", host: "https://cabin.example/sonarr", api_key: "def", timeout_secs: 5),
        ],
        logging: (level: "debug"),
    )"#;

    #[test]
    fn parses_backends_with_defaults() {
        let config = AppConfig::parse(SAMPLE).expect("valid config");
        assert_eq!(config.sonarr.len(), 2);
        assert_eq!(config.sonarr[0].timeout_secs, 30);
        assert_eq!(config.sonarr[1].timeout_secs, 5);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, PathBuf::from("navigator.log"));
        assert_eq!(config.tick_ms, 100);

        let clients = config.clients();
        assert_eq!(clients.clients[0].name, "home");
        assert_eq!(
            clients.clients[0].default_quality_profile.as_deref(),
            Some("HD-1080p")
        );
        let settings = config.backend_settings();
        assert_eq!(settings[1].request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn missing_backends_are_invalid() {
        let err = AppConfig::parse("(logging: (level: \"warn\"))").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
    }

    #[test]
    fn bad_host_is_invalid() {
        let text = r#"(sonarr: [(name: "x", host: "localhost 8989", api_key: "k")])"#;
        assert!(matches!(
            AppConfig::parse(text),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn duplicate_names_are_invalid() {
        let text = r#"(sonarr: [
            (name: "x", host: "http://a", api_key: "k"),
            (name: "x", host: "http://b", api_key: "k"),
        ])"#;
        assert!(matches!(
            AppConfig::parse(text),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn syntax_errors_are_parse_errors() {
        assert!(matches!(
            AppConfig::parse("(sonarr: ["),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("navigator.ron");
        fs::write(&path, SAMPLE).expect("write config");

        let config = AppConfig::load(&path).expect("load");
        assert_eq!(config.sonarr[1].name, "cabin");

        let missing = AppConfig::load(&dir.path().join("nope.ron")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }

    #[test]
    fn locate_prefers_explicit_then_cwd_then_home() {
        let cwd = TempDir::new().expect("cwd");
        let home = TempDir::new().expect("home");

        let explicit = PathBuf::from("/somewhere/else.ron");
        assert_eq!(
            locate(Some(explicit.clone()), cwd.path(), Some(home.path())).unwrap(),
            explicit
        );

        let err = locate(None, cwd.path(), Some(home.path())).unwrap_err();
        let ConfigError::NotFound(looked) = &err else {
            panic!("expected NotFound, got {err}");
        };
        assert_eq!(looked.len(), 2);

        let user = home.path().join(USER_CONFIG);
        fs::create_dir_all(user.parent().unwrap()).unwrap();
        fs::write(&user, SAMPLE).unwrap();
        assert_eq!(locate(None, cwd.path(), Some(home.path())).unwrap(), user);

        let local = cwd.path().join(LOCAL_CONFIG);
        fs::write(&local, SAMPLE).unwrap();
        assert_eq!(locate(None, cwd.path(), Some(home.path())).unwrap(), local);
    }
}
