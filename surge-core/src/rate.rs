//! Collaborator seams: the media rate handle and the on-screen notifier

use std::time::Duration;

/// Tolerance used when comparing playback multipliers
const RATE_EPSILON: f64 = 1e-6;

/// Compare two playback multipliers
pub fn rates_match(a: f64, b: f64) -> bool {
    (a - b).abs() < RATE_EPSILON
}

/// Handle to the currently playing media
pub trait RateSource {
    /// Current playback multiplier, `None` when no media is available
    fn current_rate(&self) -> Option<f64>;

    /// Set the playback multiplier. No-op when no media is available.
    fn set_rate(&mut self, rate: f64);

    /// The seek key's native effect, replayed on a short tap
    fn perform_short_tap(&mut self, step: Duration);

    /// Write `baseline` back, but only while the rate still sits at `expected`.
    ///
    /// Anything else means the rate was changed by someone other than the
    /// override and is left alone.
    fn restore_if_at(&mut self, expected: f64, baseline: f64) -> RestoreOutcome {
        match self.current_rate() {
            None => RestoreOutcome::MediaUnavailable,
            Some(rate) if rates_match(rate, expected) => {
                self.set_rate(baseline);
                RestoreOutcome::Restored
            }
            Some(rate) => RestoreOutcome::LeftManual(rate),
        }
    }
}

/// Result of a rate-guarded restore
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RestoreOutcome {
    /// Baseline written back
    Restored,
    /// Rate had been changed away from the override, nothing written
    LeftManual(f64),
    MediaUnavailable,
}

/// Transient on-screen notification plus the UI highlight hook
pub trait OverlayNotifier {
    /// Show the active multiplier
    fn show(&mut self, multiplier: f64);

    fn hide(&mut self);

    /// Ask the UI to re-sync its selected speed with the current rate
    fn refresh_highlight(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Media {
        rate: Option<f64>,
        writes: usize,
    }

    impl RateSource for Media {
        fn current_rate(&self) -> Option<f64> {
            self.rate
        }

        fn set_rate(&mut self, rate: f64) {
            if self.rate.is_some() {
                self.rate = Some(rate);
                self.writes += 1;
            }
        }

        fn perform_short_tap(&mut self, _step: Duration) {}
    }

    #[test]
    fn test_restore_only_at_expected_rate() {
        let mut media = Media { rate: Some(2.0), writes: 0 };
        assert_eq!(media.restore_if_at(2.0, 1.0), RestoreOutcome::Restored);
        assert_eq!(media.rate, Some(1.0));

        // Second restore sees baseline, not the override
        assert_eq!(media.restore_if_at(2.0, 1.0), RestoreOutcome::LeftManual(1.0));
        assert_eq!(media.writes, 1);
    }

    #[test]
    fn test_restore_without_media() {
        let mut media = Media { rate: None, writes: 0 };
        assert_eq!(media.restore_if_at(2.0, 1.0), RestoreOutcome::MediaUnavailable);
        assert_eq!(media.writes, 0);
    }

    #[test]
    fn test_rates_match() {
        assert!(rates_match(1.25, 1.25));
        assert!(rates_match(0.1 + 0.2, 0.3));
        assert!(!rates_match(1.0, 1.05));
    }
}
