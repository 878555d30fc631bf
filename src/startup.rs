// Startup module - displays banner and module status
//
// Printed before the TUI takes the screen (or in headless mode), then
// mirrored into the log buffer so it shows up in the logs panel.

use crate::config::{Config, VERSION};

/// ANSI color codes for terminal output
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const MAGENTA: &str = "\x1b[35m";
}

/// One line of the status list
pub struct ModuleStatus {
    pub name: &'static str,
    pub enabled: bool,
    pub description: String,
}

/// Print the startup banner and module status
pub fn print_startup(config: &Config, session_cached: bool) {
    use colors::*;

    println!();
    println!("  {BOLD}{CYAN}lana-admin{RESET} {DIM}v{VERSION}{RESET}");
    println!("  {DIM}Terminal console for the core-banking admin API{RESET}");
    println!();

    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("  {DIM}Config:{RESET} {GREEN}✓{RESET} {}", path.display());
        } else {
            println!("  {DIM}Config:{RESET} {DIM}(using defaults){RESET}");
        }
    }
    println!();

    println!("  {DIM}Loading modules...{RESET}");
    for module in module_status(config, session_cached) {
        print_module_status(&module);
    }
    println!();

    println!(
        "  {MAGENTA}▸{RESET} Admin API at {BOLD}{}{RESET}",
        config.api.url
    );
    if !config.api.has_token() {
        println!(
            "  {YELLOW}▸{RESET} {YELLOW}No token set{RESET} {DIM}(export {}){RESET}",
            crate::config::env::TOKEN
        );
    }
    println!();
}

/// Status of each moving part, derived from config
fn module_status(config: &Config, session_cached: bool) -> Vec<ModuleStatus> {
    let mut modules = vec![
        ModuleStatus {
            name: "api",
            enabled: true,
            description: format!("GraphQL client ({}s timeout)", config.api.timeout_secs),
        },
        ModuleStatus {
            name: "token",
            enabled: config.api.has_token(),
            description: "Bearer token".to_string(),
        },
        ModuleStatus {
            name: "session",
            enabled: session_cached,
            description: "Cached login".to_string(),
        },
        ModuleStatus {
            name: "tui",
            enabled: config.enable_tui,
            description: "Terminal interface".to_string(),
        },
    ];

    if config.logging.file_enabled {
        modules.push(ModuleStatus {
            name: "file-logs",
            enabled: true,
            description: format!("JSON logs in {}", config.logging.file_dir.display()),
        });
    }

    modules
}

fn print_module_status(module: &ModuleStatus) {
    use colors::*;

    let (icon, style) = if module.enabled {
        (format!("{GREEN}✓{RESET}"), "")
    } else {
        (format!("{DIM}○{RESET}"), DIM)
    };

    println!(
        "    {icon} {style}{:<12}{RESET} {DIM}{}{RESET}",
        module.name, module.description
    );
}

/// Mirror the startup status into the log buffer
pub fn log_startup(config: &Config, session_cached: bool) {
    tracing::info!("═══════════════════════════════════");
    tracing::info!("  lana-admin v{}", VERSION);
    tracing::info!("═══════════════════════════════════");

    for module in module_status(config, session_cached) {
        let icon = if module.enabled { "✓" } else { "○" };
        tracing::info!("  {} {} - {}", icon, module.name, module.description);
    }

    tracing::info!("▸ Admin API at {}", config.api.url);
    if !config.api.has_token() {
        tracing::warn!("No token set; requests will be rejected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_logs_listed_only_when_enabled() {
        let mut config = Config::default();
        assert!(!module_status(&config, false)
            .iter()
            .any(|m| m.name == "file-logs"));

        config.logging.file_enabled = true;
        assert!(module_status(&config, false)
            .iter()
            .any(|m| m.name == "file-logs"));
    }

    #[test]
    fn token_and_session_reflect_inputs() {
        let mut config = Config::default();
        config.api.token = Some("t".to_string());
        let modules = module_status(&config, true);
        let enabled = |name: &str| modules.iter().find(|m| m.name == name).map(|m| m.enabled);
        assert_eq!(enabled("token"), Some(true));
        assert_eq!(enabled("session"), Some(true));
    }
}
