use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::field::{AutoCommands, DEFAULT_AUTO_COMMANDS, DEFAULT_AUTO_OPERATOR_NAMES};
use crate::focus::DEFAULT_BLUR_DEBOUNCE_MS;
use crate::palette::{default_groups, PaletteGroup};

pub const MIN_BLUR_DEBOUNCE_MS: u64 = 50;
pub const MAX_BLUR_DEBOUNCE_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Delay between a field losing focus and the palette hiding.
    pub blur_debounce_ms: u64,
    pub auto_commands: Vec<String>,
    pub auto_operator_names: Vec<String>,
    pub palette: Vec<PaletteGroup>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            blur_debounce_ms: DEFAULT_BLUR_DEBOUNCE_MS,
            auto_commands: DEFAULT_AUTO_COMMANDS.iter().map(|s| s.to_string()).collect(),
            auto_operator_names: DEFAULT_AUTO_OPERATOR_NAMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            palette: default_groups(),
        }
    }
}

impl Config {
    pub fn from_yaml(content: &str) -> Result<Self, String> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str::<Config>(content)
            .map(Config::validated)
            .map_err(|e| format!("Invalid config: {}", e))
    }

    /// Clamp the debounce window and drop empty palette groups.
    pub fn validated(mut self) -> Self {
        self.blur_debounce_ms = self
            .blur_debounce_ms
            .clamp(MIN_BLUR_DEBOUNCE_MS, MAX_BLUR_DEBOUNCE_MS);
        self.palette.retain(|g| !g.items.is_empty());
        if self.palette.is_empty() {
            self.palette = default_groups();
        }
        self
    }

    pub fn blur_debounce(&self) -> Duration {
        Duration::from_millis(self.blur_debounce_ms)
    }

    pub fn auto_commands(&self) -> AutoCommands {
        AutoCommands::new(self.auto_commands.clone(), self.auto_operator_names.clone())
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "termassign")
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join("config.yaml"))
}

/// Directory for the log file.
pub fn data_dir() -> PathBuf {
    project_dirs()
        .map(|d| d.data_local_dir().to_path_buf())
        .unwrap_or_else(std::env::temp_dir)
}

/// Load the configuration.
///
/// An explicit path must exist and parse. Without one, the default location
/// is used when present and defaults otherwise.
pub fn load(explicit: Option<&Path>) -> Result<Config, String> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.is_file() => p,
            _ => return Ok(Config::default()),
        },
    };

    let content = std::fs::read_to_string(&path)
        .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
    let config = Config::from_yaml(&content)
        .map_err(|e| format!("{} ({})", e, path.display()))?;
    tracing::debug!(path = %path.display(), "config loaded");
    Ok(config)
}
