//! Configuration management for `trk`.
//!
//! Configuration is loaded from YAML files with support for:
//! - User config (`$XDG_CONFIG_HOME/tracker/config.yaml`, else `~/.config/tracker/config.yaml`)
//! - Workspace config (`<data dir>/config.yaml`)
//! - Environment variable overrides (`TRACKER_DATA_DIR`, `TRACKER_STATE_KEY`, `TRACKER_ACTOR`)
//! - Command-line overrides (`--data-dir`, `--actor`)
//!
//! Later layers win. The workspace file lives inside the data directory, so a
//! `data_dir` key in it is ignored.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracker_lib::{DEFAULT_STATE_KEY, Result, TrackerError};

use crate::logging::LogFormat;

pub const DEFAULT_DATA_DIR: &str = ".tracker";
pub const CONFIG_FILE_NAME: &str = "config.yaml";

pub const ENV_DATA_DIR: &str = "TRACKER_DATA_DIR";
pub const ENV_STATE_KEY: &str = "TRACKER_STATE_KEY";
pub const ENV_ACTOR: &str = "TRACKER_ACTOR";

/// One configuration file; every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    pub data_dir: Option<PathBuf>,
    pub state_key: Option<String>,
    pub actor: Option<String>,
    pub log_format: Option<LogFormat>,
}

impl ConfigLayer {
    fn apply_to(self, config: &mut Config, allow_data_dir: bool) {
        if allow_data_dir {
            if let Some(dir) = self.data_dir {
                config.data_dir = dir;
            }
        }
        if let Some(key) = non_blank(self.state_key) {
            config.state_key = key;
        }
        if let Some(actor) = non_blank(self.actor) {
            config.actor = Some(actor);
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
    }
}

/// Overrides taken from global command-line flags.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub data_dir: Option<PathBuf>,
    pub actor: Option<String>,
}

/// Effective configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub data_dir: PathBuf,
    pub state_key: String,
    /// Default reporter / comment author.
    pub actor: Option<String>,
    pub log_format: LogFormat,
    /// Files that contributed, in load order.
    pub sources: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            state_key: DEFAULT_STATE_KEY.to_string(),
            actor: None,
            log_format: LogFormat::default(),
            sources: Vec::new(),
        }
    }
}

impl Config {
    /// Path of the file backing the state slot.
    #[must_use]
    pub fn state_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.state_key))
    }

    #[must_use]
    pub fn workspace_config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE_NAME)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// User config path from an environment lookup.
pub fn user_config_path_with<F>(lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    let base = lookup("XDG_CONFIG_HOME")
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            lookup("HOME")
                .filter(|s| !s.trim().is_empty())
                .map(|home| PathBuf::from(home).join(".config"))
        })?;
    Some(base.join("tracker").join(CONFIG_FILE_NAME))
}

#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    user_config_path_with(|key| std::env::var(key).ok())
}

/// Read one YAML layer; a missing file is `Ok(None)`.
///
/// # Errors
///
/// Returns `Config` if the file exists but cannot be read or parsed.
pub fn load_layer(path: &Path) -> Result<Option<ConfigLayer>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path)
        .map_err(|e| TrackerError::Config(format!("failed to read {}: {e}", path.display())))?;
    let only_comments = contents.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    });
    if only_comments {
        return Ok(Some(ConfigLayer::default()));
    }
    serde_yaml::from_str(&contents)
        .map(Some)
        .map_err(|e| TrackerError::Config(format!("failed to parse {}: {e}", path.display())))
}

/// Apply environment overrides through `lookup`.
pub fn apply_env_overrides_with<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(dir) = non_blank(lookup(ENV_DATA_DIR)) {
        config.data_dir = PathBuf::from(dir);
    }
    if let Some(key) = non_blank(lookup(ENV_STATE_KEY)) {
        config.state_key = key;
    }
    if let Some(actor) = non_blank(lookup(ENV_ACTOR)) {
        config.actor = Some(actor);
    }
}

pub fn apply_cli_overrides(config: &mut Config, cli: &CliOverrides) {
    if let Some(dir) = cli.data_dir.as_ref() {
        config.data_dir.clone_from(dir);
    }
    if let Some(actor) = non_blank(cli.actor.clone()) {
        config.actor = Some(actor);
    }
}

/// Load the effective configuration using the process environment.
///
/// # Errors
///
/// Returns `Config` if a config file is unreadable or malformed.
pub fn load(cli: &CliOverrides) -> Result<Config> {
    load_with(cli, |key| std::env::var(key).ok())
}

/// Load the effective configuration using `lookup` for environment variables.
///
/// # Errors
///
/// Returns `Config` if a config file is unreadable or malformed.
pub fn load_with<F>(cli: &CliOverrides, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = Config::default();

    if let Some(path) = user_config_path_with(&lookup) {
        if let Some(layer) = load_layer(&path)? {
            layer.apply_to(&mut config, true);
            config.sources.push(path);
        }
    }

    // The data dir must be settled before the workspace layer can be found.
    apply_env_overrides_with(&mut config, &lookup);
    apply_cli_overrides(&mut config, cli);
    config.data_dir = normalize_dir(&config.data_dir);

    let workspace_path = config.workspace_config_path();
    if let Some(layer) = load_layer(&workspace_path)? {
        if layer.data_dir.is_some() {
            tracing::warn!(path = %workspace_path.display(), "data_dir in workspace config is ignored");
        }
        layer.apply_to(&mut config, false);
        config.sources.push(workspace_path);
    }

    // Environment and flags still beat the workspace file.
    let data_dir = config.data_dir.clone();
    apply_env_overrides_with(&mut config, &lookup);
    apply_cli_overrides(&mut config, cli);
    config.data_dir = data_dir;

    tracing::debug!(data_dir = %config.data_dir.display(), state_key = %config.state_key, "configuration loaded");
    Ok(config)
}

/// Make `dir` absolute and canonical where possible.
fn normalize_dir(dir: &Path) -> PathBuf {
    let absolute = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir().map_or_else(|_| dir.to_path_buf(), |cwd| cwd.join(dir))
    };
    dunce::canonicalize(&absolute).unwrap_or(absolute)
}

/// Starter workspace config written by `trk init`.
pub const WORKSPACE_TEMPLATE: &str = r"# Tracker workspace configuration
# state_key: tracker-state
# actor: u_alex
# log_format: text
";

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_files() {
        let home = tempfile::tempdir().unwrap();
        let data = home.path().join("data");
        let config = load_with(
            &CliOverrides::default(),
            env(&[
                ("HOME", home.path().to_str().unwrap()),
                (ENV_DATA_DIR, data.to_str().unwrap()),
            ]),
        )
        .unwrap();
        assert_eq!(config.state_key, DEFAULT_STATE_KEY);
        assert_eq!(config.actor, None);
        assert!(config.sources.is_empty());
        assert!(config.data_dir.is_absolute());
    }

    #[test]
    fn user_path_prefers_xdg() {
        let path = user_config_path_with(env(&[("XDG_CONFIG_HOME", "/x"), ("HOME", "/h")])).unwrap();
        assert_eq!(path, PathBuf::from("/x/tracker/config.yaml"));
        let path = user_config_path_with(env(&[("HOME", "/h")])).unwrap();
        assert_eq!(path, PathBuf::from("/h/.config/tracker/config.yaml"));
        assert!(user_config_path_with(env(&[])).is_none());
    }

    #[test]
    fn layers_apply_in_order() {
        let xdg = tempfile::tempdir().unwrap();
        let data = tempfile::tempdir().unwrap();
        fs::create_dir_all(xdg.path().join("tracker")).unwrap();
        fs::write(
            xdg.path().join("tracker").join(CONFIG_FILE_NAME),
            "actor: u_alex\nstate_key: user-state\n",
        )
        .unwrap();
        fs::write(
            data.path().join(CONFIG_FILE_NAME),
            "actor: u_jordan\nlog_format: json\ndata_dir: /elsewhere\n",
        )
        .unwrap();

        let lookup = env(&[
            ("XDG_CONFIG_HOME", xdg.path().to_str().unwrap()),
            (ENV_DATA_DIR, data.path().to_str().unwrap()),
        ]);
        let config = load_with(&CliOverrides::default(), &lookup).unwrap();
        assert_eq!(config.actor.as_deref(), Some("u_jordan"));
        assert_eq!(config.state_key, "user-state");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.data_dir, dunce::canonicalize(data.path()).unwrap());
        assert_eq!(config.sources.len(), 2);

        let cli = CliOverrides {
            actor: Some("u_sam".into()),
            ..Default::default()
        };
        let config = load_with(&cli, &lookup).unwrap();
        assert_eq!(config.actor.as_deref(), Some("u_sam"));
    }

    #[test]
    fn env_beats_workspace_file() {
        let data = tempfile::tempdir().unwrap();
        fs::write(data.path().join(CONFIG_FILE_NAME), "actor: u_jordan\n").unwrap();
        let config = load_with(
            &CliOverrides::default(),
            env(&[
                (ENV_DATA_DIR, data.path().to_str().unwrap()),
                (ENV_ACTOR, "u_alex"),
                (ENV_STATE_KEY, "  "),
            ]),
        )
        .unwrap();
        assert_eq!(config.actor.as_deref(), Some("u_alex"));
        assert_eq!(config.state_key, DEFAULT_STATE_KEY);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let data = tempfile::tempdir().unwrap();
        fs::write(data.path().join(CONFIG_FILE_NAME), "colour: [unterminated\n").unwrap();
        let err = load_with(
            &CliOverrides::default(),
            env(&[(ENV_DATA_DIR, data.path().to_str().unwrap())]),
        )
        .unwrap_err();
        assert!(matches!(err, TrackerError::Config(_)));
    }

    #[test]
    fn template_loads_as_empty_layer() {
        let data = tempfile::tempdir().unwrap();
        let path = data.path().join(CONFIG_FILE_NAME);
        fs::write(&path, WORKSPACE_TEMPLATE).unwrap();
        assert_eq!(load_layer(&path).unwrap(), Some(ConfigLayer::default()));
    }
}
