//! Speed override state machine
//!
//! `SpeedController` owns the gesture tracker, the watchdog and the injected
//! collaborators. It is the single source of truth for which multiplier is
//! active and why, and the only writer of the rate source during an override.
//!
//! Time is driven by the host: handlers take `now`, and the host calls
//! [`SpeedController::tick`] whenever [`SpeedController::next_deadline`] has
//! passed. A return to [`SpeedState::Idle`] always leaves no deadline behind.

use std::mem;
use std::time::Instant;

use tracing::{debug, info, trace, warn};

use crate::config::SpeedConfig;
use crate::error::SpeedError;
use crate::key::{GestureKey, GestureKind, KeyEvent};
use crate::rate::{OverlayNotifier, RateSource, RestoreOutcome};
use crate::session::OverrideSession;
use crate::tracker::{Classification, DeferredAction, KeyGestureTracker, KeyResponse};
use crate::watchdog::{ControlKeyWatchdog, RecoveryTrigger};

/// Controller state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SpeedState {
    #[default]
    Idle,
    /// Debounced key held, arm timer running, nothing written yet
    PendingLongPress(OverrideSession),
    /// Override applied
    Active(OverrideSession),
}

impl SpeedState {
    pub fn is_idle(&self) -> bool {
        matches!(self, SpeedState::Idle)
    }

    /// Key owning the current session
    pub fn key(&self) -> Option<GestureKey> {
        self.session().map(|s| s.key)
    }

    pub fn session(&self) -> Option<&OverrideSession> {
        match self {
            SpeedState::Idle => None,
            SpeedState::PendingLongPress(s) | SpeedState::Active(s) => Some(s),
        }
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndReason {
    Released(GestureKey),
    Recovered(RecoveryTrigger),
}

pub struct SpeedController<R, N> {
    config: SpeedConfig,
    media: R,
    notifier: N,
    tracker: KeyGestureTracker,
    watchdog: ControlKeyWatchdog,
    state: SpeedState,
}

impl<R: RateSource, N: OverlayNotifier> SpeedController<R, N> {
    pub fn new(config: SpeedConfig, media: R, notifier: N) -> Self {
        let tracker = KeyGestureTracker::new(&config);
        let watchdog = ControlKeyWatchdog::new(config.watched_key, config.watchdog.clone());
        Self {
            config,
            media,
            notifier,
            tracker,
            watchdog,
            state: SpeedState::Idle,
        }
    }

    pub fn config(&self) -> &SpeedConfig {
        &self.config
    }

    pub fn state(&self) -> &SpeedState {
        &self.state
    }

    /// Live session, pending or active
    pub fn session(&self) -> Option<&OverrideSession> {
        self.state.session()
    }

    /// True while an override is applied. Rate-change observers should not
    /// treat rate changes as user selections while this holds.
    pub fn is_overriding(&self) -> bool {
        matches!(self.state, SpeedState::Active(_))
    }

    pub fn watchdog(&self) -> &ControlKeyWatchdog {
        &self.watchdog
    }

    pub fn media(&self) -> &R {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut R {
        &mut self.media
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Earliest instant at which [`tick`](Self::tick) has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.tracker.deadline(), self.watchdog.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Handle a key-down. Register with capture priority so this runs before
    /// the page's own handlers.
    ///
    /// The modifier cross-check runs first, so keystrokes typed into an
    /// editable target still recover a stuck modifier.
    pub fn key_down(&mut self, event: &KeyEvent, now: Instant) -> KeyResponse {
        self.cross_check(event);
        let (key, kind) = match self.tracker.classify(event) {
            Classification::Ignored | Classification::Unbound => return KeyResponse::pass(),
            Classification::Gesture { key, kind } => (key, kind),
        };

        match kind {
            GestureKind::Immediate => self.press_immediate(key, now),
            GestureKind::Debounced => self.press_debounced(key, now),
        }
    }

    /// Handle a key-up.
    ///
    /// The live key's own release ends its session even when it lands on an
    /// editable target; it just never counts as a short tap there.
    pub fn key_up(&mut self, event: &KeyEvent, _now: Instant) -> KeyResponse {
        self.cross_check(event);
        let key = match self.tracker.classify(event) {
            Classification::Gesture { key, .. } => key,
            Classification::Ignored => {
                return match event.key.filter(|&k| self.state.key() == Some(k)) {
                    Some(key) => self.release_in_editable(key),
                    None => KeyResponse::pass(),
                };
            }
            Classification::Unbound => return KeyResponse::pass(),
        };

        match (self.state.key(), self.is_overriding()) {
            (Some(live), false) if live == key => {
                self.tracker.cancel();
                self.state = SpeedState::Idle;
                let action = self.tracker.short_tap();
                debug!(key = ?key, "released before long-press delay, short tap");
                self.run_deferred(action);
                KeyResponse::tap(action)
            }
            (Some(live), true) if live == key => {
                if let Err(err) = self.end_session(EndReason::Released(key)) {
                    trace!(%err, "key-up");
                }
                KeyResponse::suppress()
            }
            _ => {
                let err = SpeedError::StaleSession { key: Some(key) };
                trace!(%err, "key-up ignored");
                KeyResponse::suppress()
            }
        }
    }

    /// Window lost focus. Ends any live session.
    pub fn focus_lost(&mut self) {
        if let Some(trigger) = self.watchdog.check_focus_lost() {
            self.recover(trigger);
            return;
        }
        if !self.state.is_idle() {
            debug!(key = ?self.state.key(), "focus lost during session");
            if let Err(err) = self.end_session(EndReason::Recovered(RecoveryTrigger::FocusLost)) {
                trace!(%err, "focus loss");
            }
        }
    }

    /// Pointer pressed anywhere on the page
    pub fn pointer_down(&mut self, now: Instant) {
        let current = self.media.current_rate();
        self.watchdog.pointer_down(now, current);
    }

    /// Run scheduled work due at `now`: the long-press timer, watchdog polls
    /// and pointer rechecks
    pub fn tick(&mut self, now: Instant) {
        if let Some(key) = self.tracker.fire_due(now) {
            self.confirm_long_press(key);
        }

        let current = self.media.current_rate();
        if let Some(trigger) = self.watchdog.poll(now, current) {
            self.recover(trigger);
        }
    }

    /// Set the rate directly, as from a speed button.
    ///
    /// A live session keeps its baseline; the rate guard then leaves this
    /// value in place when the session ends.
    pub fn select_rate(&mut self, rate: f64) {
        if self.is_overriding() {
            debug!(rate, "manual rate change during override");
        }
        self.media.set_rate(rate);
        self.notifier.refresh_highlight();
    }

    fn press_immediate(&mut self, key: GestureKey, now: Instant) -> KeyResponse {
        if !self.state.is_idle() {
            if self.state.key() == Some(key) {
                trace!(key = ?key, "repeat key-down");
            } else {
                debug!(key = ?key, live = ?self.state.key(), "key-down ignored, another session is live");
            }
            return KeyResponse::suppress();
        }

        let Some(baseline) = self.media.current_rate() else {
            debug!(key = ?key, error = %SpeedError::MediaUnavailable, "key-down");
            return KeyResponse::pass();
        };

        let applied = self.config.multiplier(key);
        self.media.set_rate(applied);
        if self.watchdog.watches(key) {
            self.watchdog.arm(baseline, applied, now);
        }
        self.notifier.show(applied);
        self.notifier.refresh_highlight();
        info!(key = ?key, baseline, applied, "override started");

        self.state = SpeedState::Active(OverrideSession::active(key, baseline, applied, now));
        KeyResponse::suppress()
    }

    fn press_debounced(&mut self, key: GestureKey, now: Instant) -> KeyResponse {
        // Native action stays suppressed; a tap replays it on key-up
        if !self.state.is_idle() || self.tracker.is_armed(key) {
            trace!(key = ?key, live = ?self.state.key(), "debounced key-down ignored");
            return KeyResponse::suppress();
        }

        let Some(baseline) = self.media.current_rate() else {
            debug!(key = ?key, error = %SpeedError::MediaUnavailable, "key-down");
            return KeyResponse::suppress();
        };

        self.tracker.arm(key, now);
        let applied = self.config.multiplier(key);
        self.state =
            SpeedState::PendingLongPress(OverrideSession::candidate(key, baseline, applied, now));
        trace!(key = ?key, baseline, "long-press armed");
        KeyResponse::suppress()
    }

    fn confirm_long_press(&mut self, key: GestureKey) {
        match mem::take(&mut self.state) {
            SpeedState::PendingLongPress(candidate) if candidate.key == key => {
                if self.media.current_rate().is_none() {
                    debug!(key = ?key, error = %SpeedError::MediaUnavailable, "long-press dropped");
                    return;
                }
                let session = candidate.confirm();
                self.media.set_rate(session.applied_rate);
                if self.watchdog.watches(key) {
                    self.watchdog
                        .arm(session.baseline_rate, session.applied_rate, session.started_at);
                }
                self.notifier.show(session.applied_rate);
                self.notifier.refresh_highlight();
                info!(
                    key = ?key,
                    baseline = session.baseline_rate,
                    applied = session.applied_rate,
                    "long-press override started"
                );
                self.state = SpeedState::Active(session);
            }
            other => {
                trace!(key = ?key, "long-press timer fired for a finished press");
                self.state = other;
            }
        }
    }

    /// Cross-check the watchdog ticket against a key event's modifier flag
    fn cross_check(&mut self, event: &KeyEvent) {
        if let Some(trigger) = self.watchdog.check_key_event(event) {
            self.recover(trigger);
        }
    }

    fn recover(&mut self, trigger: RecoveryTrigger) {
        if let Err(err) = self.force_restore_if_stuck(trigger) {
            trace!(%err, %trigger, "recovery was a no-op");
        }
    }

    /// Single entry point for every recovery trigger.
    ///
    /// Writes the baseline only if the rate is still at the override value,
    /// then tears the session down through the regular restore path.
    fn force_restore_if_stuck(&mut self, trigger: RecoveryTrigger) -> Result<(), SpeedError> {
        let watched_live = matches!(
            &self.state,
            SpeedState::Active(s) if self.watchdog.watches(s.key)
        );
        if watched_live {
            if let Some(key) = self.state.key() {
                let err = SpeedError::InconsistentKeyState { key, trigger };
                warn!(%err, "forcing restore");
            }
            return self.end_session(EndReason::Recovered(trigger));
        }
        Err(SpeedError::StaleSession {
            key: self.state.key(),
        })
    }

    /// Leave the current state for `Idle`, clearing every timer, and restore
    /// the baseline through the rate guard
    fn end_session(&mut self, reason: EndReason) -> Result<(), SpeedError> {
        let state = mem::take(&mut self.state);
        self.tracker.cancel();
        self.watchdog.disarm();

        let session = match state {
            SpeedState::Idle => return Err(SpeedError::StaleSession { key: None }),
            SpeedState::PendingLongPress(candidate) => {
                debug!(key = ?candidate.key, ?reason, "pending long-press cancelled");
                return Ok(());
            }
            SpeedState::Active(session) => session,
        };

        match self
            .media
            .restore_if_at(session.applied_rate, session.baseline_rate)
        {
            RestoreOutcome::Restored => {
                info!(key = ?session.key, ?reason, baseline = session.baseline_rate, "override restored");
            }
            RestoreOutcome::LeftManual(rate) => {
                info!(key = ?session.key, ?reason, rate, "rate changed during override, left as is");
            }
            RestoreOutcome::MediaUnavailable => {
                debug!(key = ?session.key, ?reason, error = %SpeedError::MediaUnavailable, "restore");
            }
        }
        self.notifier.hide();
        self.notifier.refresh_highlight();
        Ok(())
    }

    fn release_in_editable(&mut self, key: GestureKey) -> KeyResponse {
        debug!(key = ?key, "released inside an editable target");
        if let Err(err) = self.end_session(EndReason::Released(key)) {
            trace!(%err, "key-up");
        }
        KeyResponse::suppress()
    }

    fn run_deferred(&mut self, action: DeferredAction) {
        match action {
            DeferredAction::SkipForward(step) => self.media.perform_short_tap(step),
        }
    }
}
