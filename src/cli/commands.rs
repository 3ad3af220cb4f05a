//! Subcommand handlers for config actions.

use std::fmt::Write as _;
use std::io;
use std::path::Path;

use super::args::ConfigAction;
use crate::config::{Config, DEFAULT_CONFIG_TOML};

/// Handle config subcommand actions.
///
/// Prints to stdout and exits the process with status 1 on failure.
pub fn handle_config_action(action: ConfigAction, config: &Config, config_path: &Path) {
    match action {
        ConfigAction::Show => {
            print!("{}", describe_config(config, config_path));
        }
        ConfigAction::Init => {
            if config_path.exists() {
                eprintln!("Config file already exists: {}", config_path.display());
                eprintln!("Use 'ascii-art config show' to view current settings.");
                std::process::exit(1);
            }

            if let Err(e) = write_default_config(config_path) {
                eprintln!("Error writing config file: {}", e);
                std::process::exit(1);
            }

            println!("Created config file: {}", config_path.display());
        }
    }
}

/// Human-readable summary of the effective configuration.
pub fn describe_config(config: &Config, config_path: &Path) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "Current configuration:");
    let _ = writeln!(text, "  Resolution: {}", config.render.resolution);
    let _ = writeln!(text, "  Charset: {}", config.render.charset);
    let _ = writeln!(text, "  Output: {}", config.output.kind.name());
    let _ = writeln!(text, "  HTML file: {}", config.output.html_path.display());
    let _ = writeln!(text, "  HTML font: {}", config.output.font);
    let _ = writeln!(text, "  Cache keying: {}", config.cache.keying.name());
    let _ = writeln!(text);

    let state = if config_path.exists() {
        "exists"
    } else {
        "not found"
    };
    let _ = writeln!(text, "Config file: {} ({})", config_path.display(), state);
    text
}

/// Write the default config template, creating parent directories.
///
/// # Errors
/// `AlreadyExists` if the file is present, or any I/O error from writing.
pub fn write_default_config(config_path: &Path) -> io::Result<()> {
    if config_path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", config_path.display()),
        ));
    }
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(config_path, DEFAULT_CONFIG_TOML)
}
