//! API, export and UI configuration

use serde::Deserialize;
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// API Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Where and how to reach the admin GraphQL API
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// GraphQL endpoint URL
    pub url: String,
    /// Bearer token issued by the identity provider (env var preferred)
    pub token: Option<String>,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Rows requested per list page
    pub page_size: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:4455/admin/graphql".to_string(),
            token: None,
            timeout_secs: 30,
            page_size: 50,
        }
    }
}

/// API settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileApi {
    pub url: Option<String>,
    /// Token from config file (env var takes precedence)
    pub token: Option<String>,
    pub timeout_secs: Option<u64>,
    pub page_size: Option<u32>,
}

impl ApiConfig {
    /// Create from file config with defaults
    /// Note: url and token overrides come from env vars
    pub fn from_file(
        file: Option<FileApi>,
        url_override: Option<String>,
        token_override: Option<String>,
    ) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            url: url_override.or(file.url).unwrap_or(defaults.url),
            token: token_override.or(file.token).filter(|t| !t.is_empty()),
            timeout_secs: file.timeout_secs.unwrap_or(defaults.timeout_secs),
            page_size: file
                .page_size
                .filter(|n| *n > 0)
                .unwrap_or(defaults.page_size),
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Export Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// CSV export polling
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Status poll period in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: crate::export::POLL_INTERVAL.as_millis() as u64,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileExport {
    pub poll_interval_ms: Option<u64>,
}

impl ExportConfig {
    pub fn from_file(file: Option<FileExport>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            poll_interval_ms: file
                .poll_interval_ms
                .filter(|ms| *ms > 0)
                .unwrap_or(defaults.poll_interval_ms),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// UI Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Terminal UI settings
#[derive(Debug, Clone)]
pub struct UiConfig {
    /// Colour scheme: "dark" or "light"
    pub theme: String,
    /// Use theme's background colour (true) or terminal default (false)
    pub use_theme_background: bool,
    /// Capture mouse clicks for row selection
    pub mouse: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            use_theme_background: false,
            mouse: true,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileUi {
    pub theme: Option<String>,
    pub use_theme_background: Option<bool>,
    pub mouse: Option<bool>,
}

impl UiConfig {
    pub fn from_file(file: Option<FileUi>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            theme: file.theme.unwrap_or(defaults.theme),
            use_theme_background: file
                .use_theme_background
                .unwrap_or(defaults.use_theme_background),
            mouse: file.mouse.unwrap_or(defaults.mouse),
        }
    }
}
