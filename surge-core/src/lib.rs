//! Playback speed override engine for SURGE
//!
//! Turns key gestures into temporary playback-rate overrides and guarantees
//! the rate always returns to its baseline:
//! - Tracker: immediate vs long-press classification, editable-target filter
//! - Watchdog: recovery for the modifier key whose release can be dropped
//! - Controller: the state machine tying both to the media and overlay

mod config;
mod controller;
mod error;
mod key;
mod rate;
mod session;
mod tracker;
mod watchdog;

pub use config::{SpeedConfig, WatchdogConfig};
pub use controller::{SpeedController, SpeedState};
pub use error::SpeedError;
pub use key::{EventTarget, GestureKey, GestureKind, KeyEvent};
pub use rate::{rates_match, OverlayNotifier, RateSource, RestoreOutcome};
pub use session::OverrideSession;
pub use tracker::{Classification, DeferredAction, KeyGestureTracker, KeyResponse};
pub use watchdog::{ControlKeyWatchdog, RecoveryTrigger, WatchdogTicket};
