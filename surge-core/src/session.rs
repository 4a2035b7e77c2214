//! Override session record

use std::time::Instant;

use crate::key::GestureKey;

/// A live speed override, or a seek press still waiting on its debounce
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideSession {
    pub key: GestureKey,
    /// Rate in effect before the override; captured once, never rewritten
    pub baseline_rate: f64,
    /// Multiplier the override writes
    pub applied_rate: f64,
    pub started_at: Instant,
    /// False while a debounced press is still a tap candidate
    pub confirmed: bool,
}

impl OverrideSession {
    /// Session for an immediate key, already applied
    pub fn active(key: GestureKey, baseline_rate: f64, applied_rate: f64, started_at: Instant) -> Self {
        Self {
            key,
            baseline_rate,
            applied_rate,
            started_at,
            confirmed: true,
        }
    }

    /// Candidate session for a debounced key; nothing written yet
    pub fn candidate(key: GestureKey, baseline_rate: f64, applied_rate: f64, started_at: Instant) -> Self {
        Self {
            confirmed: false,
            ..Self::active(key, baseline_rate, applied_rate, started_at)
        }
    }

    /// Promote a candidate once its long-press delay has elapsed
    pub fn confirm(mut self) -> Self {
        self.confirmed = true;
        self
    }
}
