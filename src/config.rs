use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use std::{fs, path::{Path, PathBuf}};
use std::time::Duration;
use thiserror::Error;

use crate::constants::*;

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

/// Top-level app configuration. Every field is optional so files and CLI can layer.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, Default)]
pub struct Config {
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    pub url: Option<String>,           // index endpoint
    pub connect_timeout_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
    pub min_delay_secs: Option<i64>,
    pub max_delay_secs: Option<i64>,
    pub retry_delay_secs: Option<i64>,
    /// strip geometry & look
    pub strip: Option<StripConfig>,
    /// toggle button wiring
    pub button: Option<ButtonConfig>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, Default)]
pub struct StripConfig {
    pub driver: Option<DriverKind>,
    pub spi_bus: Option<String>,       // e.g. "/dev/spidev0.0"
    pub spi_speed_hz: Option<u32>,
    pub num_pixels: Option<usize>,
    pub hue_start: Option<f32>,        // degrees
    pub hue_range: Option<f32>,        // degrees
    pub max_brightness: Option<f32>,   // 0.0-1.0
    pub max_value: Option<f32>,
    pub clear_on_exit: Option<bool>,
    pub intro_sweep: Option<bool>,
    pub frame_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, Default)]
pub struct ButtonConfig {
    pub enabled: Option<bool>,
    pub pin: Option<u8>,               // BCM numbering
    pub debounce_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    Apa102,
    Console,  // terminal emulator, no hardware
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "fngshim", version, about = "Fear & Greed index on an LED strip")]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(short = 'c', long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// Enable debug log level
    #[arg(short = 'v', long, alias = "verbose", action = ArgAction::SetTrue)]
    pub debug: bool,
    #[arg(long)]
    pub log_level: Option<String>,
    /// Index endpoint
    #[arg(long, value_hint = ValueHint::Url)]
    pub url: Option<String>,
    #[arg(short = 'd', long, value_enum)]
    pub driver: Option<DriverKind>,
    #[arg(long)]
    pub spi_bus: Option<String>,
    #[arg(short = 'n', long)]
    pub num_pixels: Option<usize>,
    #[arg(long)]
    pub max_brightness: Option<f32>,
    #[arg(long)]
    pub button_pin: Option<u8>,
    /// run without the toggle button
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_button: bool,
    /// skip the power-up sweep
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_intro: bool,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Poll scheduling bounds, resolved from config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayPolicy {
    pub min_secs: i64,
    pub max_secs: i64,
    pub retry_secs: i64,
}

impl Default for DelayPolicy {
    fn default() -> Self {
        Self {
            min_secs: MIN_DELAY_SECS,
            max_secs: MAX_DELAY_SECS,
            retry_secs: RETRY_DELAY_SECS,
        }
    }
}

impl DelayPolicy {
    /// Clamp a server supplied delay into [min, max]; negative hints land on min
    pub fn clamp(&self, raw_secs: i64) -> Duration {
        Duration::from_secs(raw_secs.clamp(self.min_secs, self.max_secs) as u64)
    }

    /// Delay after a failed fetch
    pub fn retry(&self) -> Duration {
        self.clamp(self.retry_secs)
    }
}

impl Config {
    pub fn url(&self) -> String {
        self.url.clone().unwrap_or_else(|| FNG_URL.to_string())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms.unwrap_or(CONNECT_TIMEOUT_MS))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.unwrap_or(REQUEST_TIMEOUT_MS))
    }

    pub fn delay_policy(&self) -> DelayPolicy {
        DelayPolicy {
            min_secs: self.min_delay_secs.unwrap_or(MIN_DELAY_SECS),
            max_secs: self.max_delay_secs.unwrap_or(MAX_DELAY_SECS),
            retry_secs: self.retry_delay_secs.unwrap_or(RETRY_DELAY_SECS),
        }
    }

    pub fn strip(&self) -> StripConfig {
        self.strip.clone().unwrap_or_default()
    }

    pub fn button(&self) -> ButtonConfig {
        self.button.clone().unwrap_or_default()
    }
}

impl StripConfig {
    pub fn driver(&self) -> DriverKind { self.driver.unwrap_or(DriverKind::Apa102) }
    pub fn spi_bus(&self) -> String { self.spi_bus.clone().unwrap_or_else(|| SPI_BUS.to_string()) }
    pub fn spi_speed_hz(&self) -> u32 { self.spi_speed_hz.unwrap_or(SPI_SPEED_HZ) }
    pub fn num_pixels(&self) -> usize { self.num_pixels.unwrap_or(NUM_PIXELS) }
    pub fn hue_start(&self) -> f32 { self.hue_start.unwrap_or(HUE_START) }
    pub fn hue_range(&self) -> f32 { self.hue_range.unwrap_or(HUE_RANGE) }
    pub fn max_brightness(&self) -> f32 { self.max_brightness.unwrap_or(MAX_BRIGHTNESS) }
    pub fn max_value(&self) -> f32 { self.max_value.unwrap_or(MAX_VALUE) }
    pub fn clear_on_exit(&self) -> bool { self.clear_on_exit.unwrap_or(true) }
    pub fn intro_sweep(&self) -> bool { self.intro_sweep.unwrap_or(true) }
    pub fn frame_delay(&self) -> Duration { Duration::from_millis(self.frame_delay_ms.unwrap_or(0)) }
}

impl ButtonConfig {
    pub fn enabled(&self) -> bool { self.enabled.unwrap_or(true) }
    pub fn pin(&self) -> u8 { self.pin.unwrap_or(BUTTON_PIN) }
    pub fn debounce(&self) -> Duration { Duration::from_millis(self.debounce_ms.unwrap_or(BUTTON_DEBOUNCE_MS)) }
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<Config, ConfigError> {
    let cli = Cli::parse();
    let cfg = load_with(&cli)?;

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        let s = serde_yaml::to_string(&cfg)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok(cfg)
}

/// Layer defaults, file and CLI for an already parsed command line.
pub fn load_with(cli: &Cli) -> Result<Config, ConfigError> {
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
    } else if let Some(p) = find_config_file() {
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
    // XDG-style: ~/.config/fngshim/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/fngshim/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/fngshim.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["fngshim.yaml", "config.yaml", "config/fngshim.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    parse_yaml(&s)
}

pub fn parse_yaml(s: &str) -> Result<Config, ConfigError> {
    let cfg: Config = serde_yaml::from_str(s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    // top-level
    if src.log_level.is_some()          { dst.log_level = src.log_level; }
    if src.url.is_some()                { dst.url = src.url; }
    if src.connect_timeout_ms.is_some() { dst.connect_timeout_ms = src.connect_timeout_ms; }
    if src.request_timeout_ms.is_some() { dst.request_timeout_ms = src.request_timeout_ms; }
    if src.min_delay_secs.is_some()     { dst.min_delay_secs = src.min_delay_secs; }
    if src.max_delay_secs.is_some()     { dst.max_delay_secs = src.max_delay_secs; }
    if src.retry_delay_secs.is_some()   { dst.retry_delay_secs = src.retry_delay_secs; }
    // strip
    match (&mut dst.strip, src.strip) {
        (None, Some(c)) => dst.strip = Some(c),
        (Some(d), Some(s)) => merge_strip(d, s),
        _ => {}
    }
    // button
    match (&mut dst.button, src.button) {
        (None, Some(c)) => dst.button = Some(c),
        (Some(d), Some(s)) => merge_button(d, s),
        _ => {}
    }
}

fn merge_strip(dst: &mut StripConfig, src: StripConfig) {
    if src.driver.is_some()         { dst.driver = src.driver; }
    if src.spi_bus.is_some()        { dst.spi_bus = src.spi_bus; }
    if src.spi_speed_hz.is_some()   { dst.spi_speed_hz = src.spi_speed_hz; }
    if src.num_pixels.is_some()     { dst.num_pixels = src.num_pixels; }
    if src.hue_start.is_some()      { dst.hue_start = src.hue_start; }
    if src.hue_range.is_some()      { dst.hue_range = src.hue_range; }
    if src.max_brightness.is_some() { dst.max_brightness = src.max_brightness; }
    if src.max_value.is_some()      { dst.max_value = src.max_value; }
    if src.clear_on_exit.is_some()  { dst.clear_on_exit = src.clear_on_exit; }
    if src.intro_sweep.is_some()    { dst.intro_sweep = src.intro_sweep; }
    if src.frame_delay_ms.is_some() { dst.frame_delay_ms = src.frame_delay_ms; }
}

fn merge_button(dst: &mut ButtonConfig, src: ButtonConfig) {
    if src.enabled.is_some()     { dst.enabled = src.enabled; }
    if src.pin.is_some()         { dst.pin = src.pin; }
    if src.debounce_ms.is_some() { dst.debounce_ms = src.debounce_ms; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some() { cfg.log_level = cli.log_level.clone(); }
    if cli.debug               { cfg.log_level = Some("debug".to_string()); }
    if cli.url.is_some()       { cfg.url = cli.url.clone(); }

    let any_strip = cli.driver.is_some()
        || cli.spi_bus.is_some()
        || cli.num_pixels.is_some()
        || cli.max_brightness.is_some()
        || cli.no_intro;
    if any_strip && cfg.strip.is_none() {
        cfg.strip = Some(StripConfig::default());
    }
    if let Some(strip) = cfg.strip.as_mut() {
        if cli.driver.is_some()         { strip.driver = cli.driver; }
        if cli.spi_bus.is_some()        { strip.spi_bus = cli.spi_bus.clone(); }
        if cli.num_pixels.is_some()     { strip.num_pixels = cli.num_pixels; }
        if cli.max_brightness.is_some() { strip.max_brightness = cli.max_brightness; }
        if cli.no_intro                 { strip.intro_sweep = Some(false); }
    }

    if (cli.button_pin.is_some() || cli.no_button) && cfg.button.is_none() {
        cfg.button = Some(ButtonConfig::default());
    }
    if let Some(button) = cfg.button.as_mut() {
        if cli.button_pin.is_some() { button.pin = cli.button_pin; }
        if cli.no_button            { button.enabled = Some(false); }
    }
}

/// Put any invariants here (required fields, ranges, etc.)
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    let delays = cfg.delay_policy();
    if delays.min_secs < 0 {
        return Err(ConfigError::Validation("min_delay_secs must be >= 0".into()));
    }
    if delays.min_secs > delays.max_secs {
        return Err(ConfigError::Validation("min_delay_secs must not exceed max_delay_secs".into()));
    }
    if delays.retry_secs <= 0 {
        return Err(ConfigError::Validation("retry_delay_secs must be > 0".into()));
    }
    if let Some(strip) = cfg.strip.as_ref() {
        if strip.num_pixels() == 0 {
            return Err(ConfigError::Validation("strip num_pixels must be > 0".into()));
        }
        if !(0.0..=1.0).contains(&strip.max_brightness()) {
            return Err(ConfigError::Validation("strip max_brightness must be 0.0..=1.0".into()));
        }
        let max_value = strip.max_value();
        if !max_value.is_finite() || max_value <= 0.0 || max_value > MAX_VALUE_LIMIT {
            return Err(ConfigError::Validation(format!(
                "strip max_value must be > 0 and <= {}",
                MAX_VALUE_LIMIT
            )));
        }
        if !strip.hue_start().is_finite() || !strip.hue_range().is_finite() {
            return Err(ConfigError::Validation("strip hue_start/hue_range must be finite".into()));
        }
    }
    Ok(())
}
