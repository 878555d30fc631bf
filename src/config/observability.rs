//! `[logging]` section: filter level and the optional JSON log file

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{self, RollingFileAppender};

/// Levels accepted in the `level` key, most verbose first
const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

const DEFAULT_LEVEL: &str = "info";

/// How often the log file is cut
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    /// One file for the life of the install
    Never,
}

impl LogRotation {
    /// Case-insensitive; anything unrecognised means daily
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "hourly" => Self::Hourly,
            "never" => Self::Never,
            _ => Self::Daily,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }

    /// Appender writing `<dir>/<prefix>[.<period>]`
    pub fn appender(self, dir: &Path, prefix: &str) -> RollingFileAppender {
        match self {
            Self::Hourly => rolling::hourly(dir, prefix),
            Self::Daily => rolling::daily(dir, prefix),
            Self::Never => rolling::never(dir, prefix),
        }
    }
}

/// Resolved logging settings
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// One of trace, debug, info, warn, error
    pub level: String,
    /// Also write JSON lines to disk. Off unless asked for.
    pub file_enabled: bool,
    pub file_dir: PathBuf,
    pub file_rotation: LogRotation,
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.to_string(),
            file_enabled: false,
            file_dir: default_log_dir(),
            file_rotation: LogRotation::Daily,
            file_prefix: "lana-admin".to_string(),
        }
    }
}

/// `~/.local/share/lana-admin/logs` or the platform equivalent; `./logs`
/// when no data directory is known
fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join("lana-admin").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Accept a known level in any case; anything else means info
fn normalize_level(raw: &str) -> String {
    let level = raw.trim().to_ascii_lowercase();
    if LEVELS.contains(&level.as_str()) {
        level
    } else {
        DEFAULT_LEVEL.to_string()
    }
}

/// `[logging]` as written in config.toml
#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<String>,
    pub file_rotation: Option<String>,
    pub file_prefix: Option<String>,
}

impl LoggingConfig {
    pub fn from_file(file: Option<FileLogging>) -> Self {
        let Some(file) = file else {
            return Self::default();
        };
        let defaults = Self::default();

        Self {
            level: file
                .level
                .as_deref()
                .map_or(defaults.level, normalize_level),
            file_enabled: file.file_enabled.unwrap_or(defaults.file_enabled),
            file_dir: file
                .file_dir
                .filter(|d| !d.trim().is_empty())
                .map_or(defaults.file_dir, PathBuf::from),
            file_rotation: file
                .file_rotation
                .as_deref()
                .map_or(defaults.file_rotation, LogRotation::parse),
            file_prefix: file
                .file_prefix
                .filter(|p| !p.trim().is_empty())
                .unwrap_or(defaults.file_prefix),
        }
    }

    /// Filter used when RUST_LOG is unset; scoped to this crate so
    /// reqwest and hyper stay quiet
    pub fn filter_directive(&self) -> String {
        format!("lana_admin={}", self.level)
    }

    /// File appender when file logging is on
    pub fn appender(&self) -> Option<RollingFileAppender> {
        self.file_enabled
            .then(|| self.file_rotation.appender(&self.file_dir, &self.file_prefix))
    }
}
