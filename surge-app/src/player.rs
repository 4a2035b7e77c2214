//! Simulated media element and overlay state
//!
//! The media element stands in for a real player: it advances its position
//! at the current rate, can be ejected and reloaded, and records rate changes
//! for the host's rate-change observer.

use std::time::Duration;

use surge_core::{rates_match, OverlayNotifier, RateSource};
use surge_tui::PlayerView;

#[derive(Debug, Clone)]
struct MediaElement {
    position_secs: f64,
    rate: f64,
    playing: bool,
}

/// Media element with a fixed-length track
#[derive(Debug)]
pub struct SimulatedMedia {
    title: String,
    duration_secs: f64,
    element: Option<MediaElement>,
    /// Last rate written since the observer drained it
    rate_change: Option<f64>,
}

impl SimulatedMedia {
    pub fn new(title: impl Into<String>, duration: Duration) -> Self {
        Self {
            title: title.into(),
            duration_secs: duration.as_secs_f64(),
            element: Some(MediaElement {
                position_secs: 0.0,
                rate: 1.0,
                playing: true,
            }),
            rate_change: None,
        }
    }

    /// Ten-minute demo track
    pub fn demo() -> Self {
        Self::new("demo-reel.mp4", Duration::from_secs(600))
    }

    pub fn is_loaded(&self) -> bool {
        self.element.is_some()
    }

    /// Move the playhead by `elapsed` wall time at the current rate
    pub fn advance(&mut self, elapsed: Duration) {
        let duration = self.duration_secs;
        if let Some(element) = self.element.as_mut().filter(|e| e.playing) {
            element.position_secs += elapsed.as_secs_f64() * element.rate;
            if element.position_secs >= duration {
                element.position_secs = duration;
                element.playing = false;
            }
        }
    }

    /// Returns whether the element is now playing
    pub fn toggle_play(&mut self) -> Option<bool> {
        let duration = self.duration_secs;
        let element = self.element.as_mut()?;
        if !element.playing && element.position_secs >= duration {
            element.position_secs = 0.0;
        }
        element.playing = !element.playing;
        Some(element.playing)
    }

    /// Seek relative to the playhead, clamped to the track
    pub fn skip(&mut self, secs: f64) {
        let duration = self.duration_secs;
        if let Some(element) = self.element.as_mut() {
            element.position_secs = (element.position_secs + secs).clamp(0.0, duration);
        }
    }

    /// Remove the media element. Returns false if there was none.
    pub fn eject(&mut self) -> bool {
        self.element.take().is_some()
    }

    /// Insert a fresh media element at 1x. Returns false if one was present.
    pub fn load(&mut self) -> bool {
        if self.element.is_some() {
            return false;
        }
        self.element = Some(MediaElement {
            position_secs: 0.0,
            rate: 1.0,
            playing: true,
        });
        self.rate_change = Some(1.0);
        true
    }

    /// Drain the pending rate-change notification
    pub fn take_rate_change(&mut self) -> Option<f64> {
        self.rate_change.take()
    }

    pub fn view(&self) -> PlayerView {
        match &self.element {
            Some(element) => PlayerView {
                loaded: true,
                title: self.title.clone(),
                playing: element.playing,
                position_secs: element.position_secs,
                duration_secs: self.duration_secs,
                rate: element.rate,
            },
            None => PlayerView::default(),
        }
    }
}

impl RateSource for SimulatedMedia {
    fn current_rate(&self) -> Option<f64> {
        self.element.as_ref().map(|e| e.rate)
    }

    fn set_rate(&mut self, rate: f64) {
        if let Some(element) = self.element.as_mut() {
            if !rates_match(element.rate, rate) {
                self.rate_change = Some(rate);
            }
            element.rate = rate;
        }
    }

    fn perform_short_tap(&mut self, step: Duration) {
        self.skip(step.as_secs_f64());
    }
}

/// Overlay badge and highlight-refresh requests from the controller
#[derive(Debug, Default)]
pub struct OverlayState {
    visible: Option<f64>,
    refresh_requested: bool,
}

impl OverlayState {
    /// Multiplier currently on screen
    pub fn visible(&self) -> Option<f64> {
        self.visible
    }

    /// Drain a pending highlight refresh
    pub fn take_refresh(&mut self) -> bool {
        std::mem::take(&mut self.refresh_requested)
    }
}

impl OverlayNotifier for OverlayState {
    fn show(&mut self, multiplier: f64) {
        self.visible = Some(multiplier);
    }

    fn hide(&mut self) {
        self.visible = None;
    }

    fn refresh_highlight(&mut self) {
        self.refresh_requested = true;
    }
}
