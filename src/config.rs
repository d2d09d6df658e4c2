//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--all`, `--no-mouse`, `--log-file`, etc.)
//! 2. `--config <file>`
//! 3. `$DPFM_CONFIG` environment variable (path to config file)
//! 4. Project-local `.dpfm.toml` in the current working directory
//! 5. Global `~/.config/dpfm/config.toml`
//! 6. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::nav::pane::PaneOptions;
use crate::nav::sort::{SortConfig, SortField, SortOrder};

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Starting directory of the left pane (overridden by CLI positional arg).
    pub left_path: Option<String>,
    /// Starting directory of the right pane.
    pub right_path: Option<String>,
    /// Show hidden files by default.
    pub show_hidden: Option<bool>,
    /// Enable mouse capture.
    pub mouse: Option<bool>,
}

/// Initial sort applied to both panes.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SortSection {
    /// "name", "size" or "date".
    pub field: Option<String>,
    /// "asc" or "desc".
    pub order: Option<String>,
}

/// Log output settings. Logging is off unless a file is set.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LogConfig {
    /// "error", "warn", "info", "debug" or "trace".
    pub level: Option<String>,
    pub file: Option<String>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub sort: SortSection,
    pub log: LogConfig,
}

/// Default log level when a log file is configured.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path — that is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("DPFM_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".dpfm.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("dpfm").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning printed to stderr).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!(
                "Warning: failed to parse config file {}: {}",
                path.display(),
                e
            );
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self` — `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                left_path: other
                    .general
                    .left_path
                    .clone()
                    .or(self.general.left_path),
                right_path: other
                    .general
                    .right_path
                    .clone()
                    .or(self.general.right_path),
                show_hidden: other.general.show_hidden.or(self.general.show_hidden),
                mouse: other.general.mouse.or(self.general.mouse),
            },
            sort: SortSection {
                field: other.sort.field.clone().or(self.sort.field),
                order: other.sort.order.clone().or(self.sort.order),
            },
            log: LogConfig {
                level: other.log.level.clone().or(self.log.level),
                file: other.log.file.clone().or(self.log.file),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Walk in reverse so that highest-priority (env var) overwrites lower.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    pub fn show_hidden(&self) -> bool {
        self.general.show_hidden.unwrap_or(false)
    }

    pub fn mouse_enabled(&self) -> bool {
        self.general.mouse.unwrap_or(false)
    }

    pub fn left_path(&self) -> Option<PathBuf> {
        self.general.left_path.as_deref().map(expand_home)
    }

    pub fn right_path(&self) -> Option<PathBuf> {
        self.general.right_path.as_deref().map(expand_home)
    }

    pub fn sort(&self) -> SortConfig {
        SortConfig::new(
            SortField::from_config(self.sort.field.as_deref().unwrap_or("name")),
            SortOrder::from_config(self.sort.order.as_deref().unwrap_or("asc")),
        )
    }

    pub fn pane_options(&self) -> PaneOptions {
        PaneOptions {
            show_hidden: self.show_hidden(),
            sort: self.sort(),
        }
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_file(&self) -> Option<PathBuf> {
        self.log.file.as_deref().map(expand_home)
    }
}

/// Expand a leading `~/` in a configured path.
fn expand_home(raw: &str) -> PathBuf {
    match (raw.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(raw),
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
