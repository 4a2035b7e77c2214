//! Per-key gesture classification and the long-press arm timer
//!
//! Modifier keys trigger immediately. The seek key is suppressed on key-down
//! and only becomes an override once it has been held past the long-press
//! delay; a release before that is a short tap and the suppressed native
//! action is replayed instead.

use std::time::{Duration, Instant};

use crate::config::SpeedConfig;
use crate::key::{GestureKey, GestureKind, KeyEvent};

/// How the tracker sees a raw key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Aimed at an editable element; starts or arms nothing
    Ignored,
    /// Not a gesture key
    Unbound,
    Gesture { key: GestureKey, kind: GestureKind },
}

/// Action replayed on behalf of a suppressed native key effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// Skip forward by the given step
    SkipForward(Duration),
}

/// Two-phase gesture result returned to the host event layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyResponse {
    /// Whether the host should prevent the default action and stop propagation
    pub suppress_default: bool,
    /// Action already performed in place of the suppressed default
    pub deferred: Option<DeferredAction>,
}

impl KeyResponse {
    pub fn pass() -> Self {
        Self::default()
    }

    pub fn suppress() -> Self {
        Self {
            suppress_default: true,
            deferred: None,
        }
    }

    pub fn tap(action: DeferredAction) -> Self {
        Self {
            suppress_default: true,
            deferred: Some(action),
        }
    }
}

/// Single-shot timer armed on a debounced key-down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ArmTimer {
    key: GestureKey,
    fires_at: Instant,
}

/// Classifies key events and owns the long-press timer
#[derive(Debug)]
pub struct KeyGestureTracker {
    long_press_delay: Duration,
    seek_step: Duration,
    timer: Option<ArmTimer>,
}

impl KeyGestureTracker {
    pub fn new(config: &SpeedConfig) -> Self {
        Self {
            long_press_delay: config.long_press_delay,
            seek_step: config.seek_step,
            timer: None,
        }
    }

    /// Classify an event. Editable targets are checked first.
    pub fn classify(&self, event: &KeyEvent) -> Classification {
        if event.is_editable() {
            return Classification::Ignored;
        }
        match event.key {
            Some(key) => Classification::Gesture {
                key,
                kind: key.kind(),
            },
            None => Classification::Unbound,
        }
    }

    /// Arm the long-press timer for `key`, replacing any earlier one
    pub fn arm(&mut self, key: GestureKey, now: Instant) {
        self.timer = Some(ArmTimer {
            key,
            fires_at: now + self.long_press_delay,
        });
    }

    /// Cancel the timer. Returns whether one was armed.
    pub fn cancel(&mut self) -> bool {
        self.timer.take().is_some()
    }

    pub fn is_armed(&self, key: GestureKey) -> bool {
        self.timer.is_some_and(|t| t.key == key)
    }

    /// Take the timer if it is due at `now`
    pub fn fire_due(&mut self, now: Instant) -> Option<GestureKey> {
        match self.timer {
            Some(timer) if timer.fires_at <= now => {
                self.timer = None;
                Some(timer.key)
            }
            _ => None,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.timer.map(|t| t.fires_at)
    }

    /// Native effect to replay when a debounced press turns out to be a tap
    pub fn short_tap(&self) -> DeferredAction {
        DeferredAction::SkipForward(self.seek_step)
    }
}
