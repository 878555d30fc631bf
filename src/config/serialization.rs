//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Token line: commented out unless one was set in the file
    fn token_to_toml(&self) -> String {
        match &self.api.token {
            Some(token) => format!("token = \"{}\"\n", token),
            None => "# token = \"...\"  # Prefer the LANA_ADMIN_TOKEN env var\n".to_string(),
        }
    }

    /// Serialize the config as a commented TOML document
    pub fn to_toml(&self) -> String {
        format!(
            r#"# lana-admin configuration

# ─────────────────────────────────────────────────────────────────────────────
# ADMIN API
# ─────────────────────────────────────────────────────────────────────────────
# URL and token can also be set via LANA_ADMIN_API_URL / LANA_ADMIN_TOKEN.
[api]
url = "{api_url}"
{api_token}timeout_secs = {api_timeout}
page_size = {api_page_size}

# CSV export status polling
[export]
poll_interval_ms = {export_poll}

# Terminal UI
[ui]
theme = "{ui_theme}"  # dark, light
use_theme_background = {ui_bg}
mouse = {ui_mouse}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
# File logging (in addition to TUI buffer or stderr)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            api_url = self.api.url,
            api_token = self.token_to_toml(),
            api_timeout = self.api.timeout_secs,
            api_page_size = self.api.page_size,
            export_poll = self.export.poll_interval_ms,
            ui_theme = self.ui.theme,
            ui_bg = self.ui.use_theme_background,
            ui_mouse = self.ui.mouse,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display(),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }
}
