use serde::{Deserialize, Serialize};
use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

use crate::display::frame::{LCD_COLS, LCD_ROWS};

pub const DEFAULT_TICK_MS: u64 = 700;
pub const DEFAULT_STATE_FILE: &str = "brewery-state.yaml";
pub const DEFAULT_PARAMETERS_FILE: &str = "lcd-parameters.yaml";

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub log_level: Option<String>,          // e.g., "info" | "debug"
    pub tick_ms: Option<u64>,               // scheduler period
    pub state_file: Option<PathBuf>,        // host snapshot, YAML or JSON
    pub parameters_file: Option<PathBuf>,   // LCD_* parameters
    pub display: Option<DisplaySettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DisplaySettings {
    pub driver: Option<DriverKind>,
    pub rows: Option<usize>,
    pub cols: Option<usize>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    /// framed grid on stdout
    #[default]
    Console,
    /// headless, nothing is shown
    Mock,
}

impl Config {
    pub fn tick_ms(&self) -> u64 {
        self.tick_ms.unwrap_or(DEFAULT_TICK_MS)
    }

    pub fn state_file(&self) -> PathBuf {
        self.state_file.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE))
    }

    pub fn parameters_file(&self) -> PathBuf {
        self.parameters_file.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_PARAMETERS_FILE))
    }

    pub fn driver(&self) -> DriverKind {
        self.display.as_ref().and_then(|d| d.driver).unwrap_or_default()
    }
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "BrewLCD", version, about = "Brewery telemetry on a 20x4 character LCD")]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// Enable debug log level
    #[arg(long, short = 'v', alias = "verbose", action = ArgAction::SetTrue)]
    pub debug: bool,
    #[arg(long)]
    pub log_level: Option<String>,
    #[arg(long)]
    pub tick_ms: Option<u64>,
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub state_file: Option<PathBuf>,
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub parameters_file: Option<PathBuf>,
    #[arg(long, value_enum)]
    pub driver: Option<DriverKind>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<Config, ConfigError> {
    let cli = Cli::parse();
    let cfg = resolve(&cli, find_config_file())?;

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        let s = serde_yaml::to_string(&cfg)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok(cfg)
}

/// Layer defaults, YAML and CLI. `found` is the search result used when
/// no explicit --config is given.
pub fn resolve(cli: &Cli, found: Option<PathBuf>) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = found {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;
    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/brewlcd/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/brewlcd/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/brewlcd.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["brewlcd.yaml", "config.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    if src.log_level.is_some()       { dst.log_level = src.log_level; }
    if src.tick_ms.is_some()         { dst.tick_ms = src.tick_ms; }
    if src.state_file.is_some()      { dst.state_file = src.state_file; }
    if src.parameters_file.is_some() { dst.parameters_file = src.parameters_file; }
    match (&mut dst.display, src.display) {
        (None, Some(c)) => dst.display = Some(c),
        (Some(d), Some(s)) => merge_display(d, s),
        _ => {}
    }
}

fn merge_display(dst: &mut DisplaySettings, src: DisplaySettings) {
    if src.driver.is_some() { dst.driver = src.driver; }
    if src.rows.is_some()   { dst.rows = src.rows; }
    if src.cols.is_some()   { dst.cols = src.cols; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some()       { cfg.log_level = cli.log_level.clone(); }
    if cli.debug                     { cfg.log_level = Some("debug".to_string()); }
    if cli.tick_ms.is_some()         { cfg.tick_ms = cli.tick_ms; }
    if cli.state_file.is_some()      { cfg.state_file = cli.state_file.clone(); }
    if cli.parameters_file.is_some() { cfg.parameters_file = cli.parameters_file.clone(); }
    if cli.driver.is_some() {
        cfg.display.get_or_insert_with(DisplaySettings::default).driver = cli.driver;
    }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(ms) = cfg.tick_ms {
        if !(100..=10_000).contains(&ms) {
            return Err(ConfigError::Validation("tick_ms must be 100..=10000".into()));
        }
    }
    if let Some(level) = cfg.log_level.as_deref() {
        match level {
            "error" | "warn" | "info" | "debug" | "trace" | "off" => {}
            _ => return Err(ConfigError::Validation(format!("unknown log_level '{}'", level))),
        }
    }
    if let Some(display) = cfg.display.as_ref() {
        let rows = display.rows.unwrap_or(LCD_ROWS);
        let cols = display.cols.unwrap_or(LCD_COLS);
        if rows != LCD_ROWS || cols != LCD_COLS {
            return Err(ConfigError::Validation(format!(
                "only {}x{} modules are supported, got {}x{}",
                LCD_COLS, LCD_ROWS, cols, rows
            )));
        }
    }
    Ok(())
}
