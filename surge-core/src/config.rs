//! Timing and multiplier settings for the controller

use std::time::Duration;

use crate::key::GestureKey;

/// Watchdog timings for the unreliable-release key
#[derive(Debug, Clone, PartialEq)]
pub struct WatchdogConfig {
    /// Poll interval while the key is believed down
    pub poll_interval: Duration,
    /// Stuck time after which the override is force-restored
    pub timeout: Duration,
    /// Delay before re-checking after a pointer press
    pub pointer_recheck: Duration,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            timeout: Duration::from_secs(5),
            pointer_recheck: Duration::from_millis(100),
        }
    }
}

/// Controller settings
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedConfig {
    pub primary_multiplier: f64,
    pub secondary_multiplier: f64,
    pub seek_multiplier: f64,
    /// Hold time before a seek press becomes an override
    pub long_press_delay: Duration,
    /// Skip distance for a short seek tap
    pub seek_step: Duration,
    /// Key whose release is watched by the watchdog, if any
    pub watched_key: Option<GestureKey>,
    pub watchdog: WatchdogConfig,
}

impl SpeedConfig {
    /// Override multiplier applied while `key` is held
    pub fn multiplier(&self, key: GestureKey) -> f64 {
        match key {
            GestureKey::PrimaryModifier => self.primary_multiplier,
            GestureKey::SecondaryModifier => self.secondary_multiplier,
            GestureKey::Seek => self.seek_multiplier,
        }
    }
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            primary_multiplier: 2.0,
            secondary_multiplier: 2.0,
            seek_multiplier: 3.0,
            long_press_delay: Duration::from_millis(200),
            seek_step: Duration::from_secs(5),
            watched_key: Some(GestureKey::PrimaryModifier),
            watchdog: WatchdogConfig::default(),
        }
    }
}
