use clap::Parser;
use std::io;
use std::path::Path;

use ascii_art::algorithm::AsciiArtEngine;
use ascii_art::cli::{handle_config_action, Args, Command};
use ascii_art::config::{self, Config};
use ascii_art::matching::{BitmapFont, CharacterSet, CharsetCache};
use ascii_art::output::HtmlOutput;
use ascii_art::raster::{Image, ResolutionCache};
use ascii_art::shell::Shell;

fn main() {
    let args = Args::parse();

    // --config must exist and parse; the default location falls back to defaults
    let config_path = args.config.clone().unwrap_or_else(config::default_path);
    let cfg = match load_config(&config_path, args.config.is_some()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(Command::Config { action }) = args.command {
        handle_config_action(action, &cfg, &config_path);
        return;
    }

    // Merge settings: CLI args > config file > built-in defaults
    let resolution = args.resolution.unwrap_or(cfg.render.resolution);
    let charset = CharacterSet::from(args.charset.as_deref().unwrap_or(&cfg.render.charset));
    let output = args.output.unwrap_or(cfg.output.kind);
    let html = HtmlOutput::new(cfg.output.html_path.clone(), cfg.output.font.clone());

    let image = match Image::open(&args.image) {
        Ok(img) => img,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let engine = AsciiArtEngine::with_caches(
        ResolutionCache::with_keying(cfg.cache.keying),
        CharsetCache::<BitmapFont>::default(),
    );
    let mut shell = Shell::new(engine, image, charset, resolution, io::stdout())
        .with_output(output, html);

    if let Err(e) = shell.run(io::stdin().lock()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: &Path, explicit: bool) -> Result<Config, config::ConfigError> {
    if explicit && !path.exists() {
        return Err(config::ConfigError::IoError {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "file not found"),
        });
    }
    match Config::load(Some(path)) {
        Ok(c) => Ok(c),
        Err(e) if !explicit => {
            eprintln!("Warning: Failed to load config file: {}", e);
            eprintln!("Using default settings.\n");
            Ok(Config::default())
        }
        Err(e) => Err(e),
    }
}
