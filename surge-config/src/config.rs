//! Simple configuration persistence for SURGE
//!
//! Stores override multipliers, gesture timings and the speed bar options in
//! a `key=value` text file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use surge_core::{GestureKey, SpeedConfig};
use tracing::warn;

use crate::speed_menu::{format_speed, SpeedMenu};

/// Highest multiplier accepted for an override
const MAX_MULTIPLIER: f64 = 16.0;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    /// Controller multipliers and timings
    pub speed: SpeedConfig,
    /// Speed bar options
    pub menu: SpeedMenu,
    /// Theme name, if one was picked
    pub theme: Option<String>,
}

impl Config {
    /// Load config from the default location
    ///
    /// Returns default config if file doesn't exist or can't be parsed.
    pub fn load() -> Self {
        let path = Self::config_path();
        Self::load_from(&path).unwrap_or_default()
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Save config to the default location
    pub fn save(&self) -> io::Result<()> {
        let path = Self::config_path();
        self.save_to(&path)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = self.serialize();
        fs::write(path, content)
    }

    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("surge")
            .join("config.txt")
    }

    /// Controller settings
    pub fn speed_config(&self) -> SpeedConfig {
        self.speed.clone()
    }

    /// Parse config from simple key=value format
    fn parse(content: &str) -> Self {
        let mut config = Self::default();
        let mut visible: Option<Vec<f64>> = None;
        let mut custom: Vec<f64> = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();
            let speed = &mut config.speed;

            match key {
                "primary_multiplier" => {
                    set(&mut speed.primary_multiplier, parse_multiplier(key, value))
                }
                "secondary_multiplier" => {
                    set(&mut speed.secondary_multiplier, parse_multiplier(key, value))
                }
                "seek_multiplier" => set(&mut speed.seek_multiplier, parse_multiplier(key, value)),
                "long_press_ms" => set(&mut speed.long_press_delay, parse_millis(key, value)),
                "seek_step_secs" => set(&mut speed.seek_step, parse_seconds(key, value)),
                "watchdog_poll_ms" => {
                    set(&mut speed.watchdog.poll_interval, parse_millis(key, value))
                }
                "watchdog_timeout_ms" => set(&mut speed.watchdog.timeout, parse_millis(key, value)),
                "pointer_recheck_ms" => {
                    set(&mut speed.watchdog.pointer_recheck, parse_millis(key, value))
                }
                "watch_primary" => {
                    if let Some(on) = parse_bool(key, value) {
                        speed.watched_key = on.then_some(GestureKey::PrimaryModifier);
                    }
                }
                "visible_speeds" => visible = Some(parse_list(key, value)),
                "custom_speeds" => custom = parse_list(key, value),
                "theme" => {
                    if !value.is_empty() {
                        config.theme = Some(value.to_string());
                    }
                }
                _ => {} // Ignore unknown keys
            }
        }

        let visible = visible.unwrap_or_else(|| config.menu.visible().to_vec());
        config.menu = SpeedMenu::from_parts(&visible, &custom);
        config
    }

    /// Serialize config to simple key=value format
    fn serialize(&self) -> String {
        let speed = &self.speed;
        let mut lines = vec![
            "# SURGE Configuration".to_string(),
            format!("primary_multiplier={}", format_speed(speed.primary_multiplier)),
            format!("secondary_multiplier={}", format_speed(speed.secondary_multiplier)),
            format!("seek_multiplier={}", format_speed(speed.seek_multiplier)),
            format!("long_press_ms={}", speed.long_press_delay.as_millis()),
            format!("seek_step_secs={}", speed.seek_step.as_secs_f64()),
            format!("watchdog_poll_ms={}", speed.watchdog.poll_interval.as_millis()),
            format!("watchdog_timeout_ms={}", speed.watchdog.timeout.as_millis()),
            format!("pointer_recheck_ms={}", speed.watchdog.pointer_recheck.as_millis()),
            format!("watch_primary={}", speed.watched_key.is_some()),
            format!("visible_speeds={}", join(self.menu.visible())),
            format!("custom_speeds={}", join(self.menu.custom())),
        ];

        if let Some(ref theme) = self.theme {
            lines.push(format!("theme={}", theme));
        }

        lines.join("\n")
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn join(speeds: &[f64]) -> String {
    speeds
        .iter()
        .map(|&s| format_speed(s))
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_multiplier(key: &str, value: &str) -> Option<f64> {
    match value.parse::<f64>() {
        Ok(m) if m > 0.0 && m <= MAX_MULTIPLIER => Some(m),
        _ => {
            warn!(key, value, "invalid multiplier, keeping default");
            None
        }
    }
}

fn parse_millis(key: &str, value: &str) -> Option<Duration> {
    match value.parse::<u64>() {
        Ok(ms) if ms > 0 => Some(Duration::from_millis(ms)),
        _ => {
            warn!(key, value, "invalid duration, keeping default");
            None
        }
    }
}

fn parse_seconds(key: &str, value: &str) -> Option<Duration> {
    let parsed = value
        .parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .filter(|step| !step.is_zero());
    match parsed {
        Some(step) => Some(step),
        None => {
            warn!(key, value, "invalid duration, keeping default");
            None
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Option<bool> {
    match value {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => {
            warn!(key, value, "invalid flag, keeping default");
            None
        }
    }
}

fn parse_list(key: &str, value: &str) -> Vec<f64> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse::<f64>() {
            Ok(speed) => Some(speed),
            Err(_) => {
                warn!(key, entry = s, "invalid speed in list, skipped");
                None
            }
        })
        .collect()
}
