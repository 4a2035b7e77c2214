//! Safety net for the modifier key whose release event can be dropped
//!
//! While the key is believed down the watchdog polls the media rate. A rate
//! stuck at the override value past the timeout, a key event reporting the
//! modifier as released, a focus loss, or a pointer press followed by a stuck
//! recheck all produce a [`RecoveryTrigger`]. The controller routes every
//! trigger through one rate-guarded restore.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::config::WatchdogConfig;
use crate::key::{GestureKey, KeyEvent};
use crate::rate::rates_match;

/// Signal that the watched key was released without a key-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryTrigger {
    /// Rate stayed at the override value past the timeout ceiling
    PollTimeout,
    /// Another key event reported the modifier as released
    ModifierMismatch,
    FocusLost,
    /// Rate still stuck after the delayed pointer-press recheck
    PointerRecheck,
}

impl fmt::Display for RecoveryTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecoveryTrigger::PollTimeout => "poll timeout",
            RecoveryTrigger::ModifierMismatch => "modifier flag",
            RecoveryTrigger::FocusLost => "focus loss",
            RecoveryTrigger::PointerRecheck => "pointer recheck",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PollHandle {
    next_at: Instant,
    /// Accumulated time the rate was observed at the override value
    stuck_for: Duration,
}

/// Watchdog view of the watched key; mirrors the session but is independent of it
#[derive(Debug, Clone, PartialEq)]
pub struct WatchdogTicket {
    pub believed_down: bool,
    pub baseline_rate: f64,
    pub override_rate: f64,
    poll: Option<PollHandle>,
}

impl WatchdogTicket {
    pub fn is_polling(&self) -> bool {
        self.poll.is_some()
    }

    fn is_stuck(&self, current: Option<f64>) -> bool {
        current.is_some_and(|rate| rates_match(rate, self.override_rate))
    }
}

#[derive(Debug)]
pub struct ControlKeyWatchdog {
    watched: Option<GestureKey>,
    config: WatchdogConfig,
    ticket: Option<WatchdogTicket>,
    recheck_at: Option<Instant>,
}

impl ControlKeyWatchdog {
    pub fn new(watched: Option<GestureKey>, config: WatchdogConfig) -> Self {
        Self {
            watched,
            config,
            ticket: None,
            recheck_at: None,
        }
    }

    /// Whether `key` is the unreliable-release key
    pub fn watches(&self, key: GestureKey) -> bool {
        self.watched == Some(key)
    }

    pub fn ticket(&self) -> Option<&WatchdogTicket> {
        self.ticket.as_ref()
    }

    pub fn believed_down(&self) -> bool {
        self.ticket.as_ref().is_some_and(|t| t.believed_down)
    }

    /// Start watching after the watched key went down and the override was applied
    pub fn arm(&mut self, baseline_rate: f64, override_rate: f64, now: Instant) {
        self.ticket = Some(WatchdogTicket {
            believed_down: true,
            baseline_rate,
            override_rate,
            poll: Some(PollHandle {
                next_at: now + self.config.poll_interval,
                stuck_for: Duration::ZERO,
            }),
        });
        self.recheck_at = None;
    }

    /// Clear `believed_down` and cancel all scheduled work. Idempotent.
    pub fn disarm(&mut self) {
        if let Some(ticket) = self.ticket.as_mut() {
            ticket.believed_down = false;
            ticket.poll = None;
        }
        self.recheck_at = None;
    }

    /// Cross-check a key event's modifier flag against the ticket
    pub fn check_key_event(&self, event: &KeyEvent) -> Option<RecoveryTrigger> {
        if !self.believed_down() || event.modifier_down {
            return None;
        }
        match (event.key, self.watched) {
            (Some(key), Some(watched)) if key == watched => None,
            _ => Some(RecoveryTrigger::ModifierMismatch),
        }
    }

    pub fn check_focus_lost(&self) -> Option<RecoveryTrigger> {
        self.believed_down().then_some(RecoveryTrigger::FocusLost)
    }

    /// Schedule a delayed recheck if the rate is at the override value.
    ///
    /// The delay tolerates modifier+click combos where the key really is held.
    pub fn pointer_down(&mut self, now: Instant, current: Option<f64>) {
        let stuck = self
            .ticket
            .as_ref()
            .is_some_and(|t| t.believed_down && t.is_stuck(current));
        if stuck {
            self.recheck_at = Some(now + self.config.pointer_recheck);
        }
    }

    /// Run any poll ticks and rechecks due at `now`
    pub fn poll(&mut self, now: Instant, current: Option<f64>) -> Option<RecoveryTrigger> {
        let interval = self.config.poll_interval;
        let timeout = self.config.timeout;

        let Some(ticket) = self.ticket.as_mut() else {
            self.recheck_at = None;
            return None;
        };

        if !ticket.believed_down {
            ticket.poll = None;
            self.recheck_at = None;
            return None;
        }

        if let Some(at) = self.recheck_at {
            if at <= now {
                self.recheck_at = None;
                if ticket.is_stuck(current) {
                    return Some(RecoveryTrigger::PointerRecheck);
                }
            }
        }

        let stuck = ticket.is_stuck(current);
        if let Some(poll) = ticket.poll.as_mut() {
            while poll.next_at <= now {
                poll.next_at += interval;
                if !stuck {
                    continue;
                }
                poll.stuck_for += interval;
                if poll.stuck_for.as_millis() % 1000 == 0 {
                    trace!(stuck_ms = poll.stuck_for.as_millis() as u64, "watched key still held");
                }
                if poll.stuck_for >= timeout {
                    return Some(RecoveryTrigger::PollTimeout);
                }
            }
        }

        None
    }

    /// Earliest instant at which [`poll`](Self::poll) has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        let poll_at = self
            .ticket
            .as_ref()
            .filter(|t| t.believed_down)
            .and_then(|t| t.poll.map(|p| p.next_at));
        match (poll_at, self.recheck_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn armed(now: Instant) -> ControlKeyWatchdog {
        let mut dog = ControlKeyWatchdog::new(Some(GestureKey::PrimaryModifier), WatchdogConfig::default());
        dog.arm(1.0, 2.0, now);
        dog
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_poll_times_out_when_stuck() {
        let start = Instant::now();
        let mut dog = armed(start);

        assert_eq!(dog.poll(start + ms(4900), Some(2.0)), None);
        assert_eq!(dog.poll(start + ms(5000), Some(2.0)), Some(RecoveryTrigger::PollTimeout));
    }

    #[test]
    fn test_poll_does_not_accumulate_when_rate_changed() {
        let start = Instant::now();
        let mut dog = armed(start);

        assert_eq!(dog.poll(start + ms(10_000), Some(1.5)), None);
        assert!(dog.believed_down());
        assert_eq!(dog.next_deadline(), Some(start + ms(10_100)));
    }

    #[test]
    fn test_poll_without_media_does_not_accumulate() {
        let start = Instant::now();
        let mut dog = armed(start);
        assert_eq!(dog.poll(start + ms(6000), None), None);
        // Stuck time starts counting from here
        assert_eq!(dog.poll(start + ms(10_900), Some(2.0)), None);
        assert_eq!(dog.poll(start + ms(11_000), Some(2.0)), Some(RecoveryTrigger::PollTimeout));
    }

    #[test]
    fn test_modifier_mismatch() {
        let dog = armed(Instant::now());
        assert_eq!(dog.check_key_event(&KeyEvent::other()), Some(RecoveryTrigger::ModifierMismatch));
        assert_eq!(dog.check_key_event(&KeyEvent::other().with_modifier(true)), None);
        // The watched key's own events go through the regular path
        let own = KeyEvent::gesture(GestureKey::PrimaryModifier).with_modifier(false);
        assert_eq!(dog.check_key_event(&own), None);
    }

    #[test]
    fn test_pointer_recheck() {
        let start = Instant::now();
        let mut dog = armed(start);

        dog.pointer_down(start + ms(1000), Some(2.0));
        // The poll tick is still the earliest deadline
        assert_eq!(dog.next_deadline(), Some(start + ms(100)));
        assert_eq!(dog.poll(start + ms(1050), Some(2.0)), None);
        assert_eq!(dog.poll(start + ms(1100), Some(2.0)), Some(RecoveryTrigger::PointerRecheck));
    }

    #[test]
    fn test_pointer_down_ignored_when_not_stuck() {
        let start = Instant::now();
        let mut dog = armed(start);
        dog.pointer_down(start, Some(1.0));
        assert_eq!(dog.poll(start + ms(100), Some(2.0)), None);
    }

    #[test]
    fn test_disarm_clears_all_deadlines() {
        let start = Instant::now();
        let mut dog = armed(start);
        dog.pointer_down(start, Some(2.0));
        dog.disarm();
        dog.disarm();

        assert!(!dog.believed_down());
        assert_eq!(dog.next_deadline(), None);
        assert_eq!(dog.check_focus_lost(), None);
        assert_eq!(dog.poll(start + ms(60_000), Some(2.0)), None);
        assert!(!dog.ticket().is_some_and(|t| t.is_polling()));
    }
}
