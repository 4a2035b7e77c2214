//! Speed options offered on the speed bar
//!
//! Presets are always available and cannot be deleted. Custom speeds can be
//! added and removed. Any speed can be shown or hidden on the bar.

use thiserror::Error;

use surge_core::rates_match;

/// Built-in speeds
pub const PRESET_SPEEDS: [f64; 10] = [0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0, 2.5, 3.0, 4.0];

/// Speeds shown on the bar out of the box
pub const DEFAULT_VISIBLE: [f64; 8] = [0.5, 1.0, 1.25, 1.5, 1.75, 2.0, 2.5, 3.0];

pub const MIN_CUSTOM_SPEED: f64 = 0.25;
pub const MAX_CUSTOM_SPEED: f64 = 4.0;
/// Custom speeds snap to this step
pub const CUSTOM_SPEED_STEP: f64 = 0.05;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MenuError {
    #[error("Speed {0}x already exists")]
    Duplicate(f64),
    #[error("Speed {0}x is outside {min}-{max}", min = MIN_CUSTOM_SPEED, max = MAX_CUSTOM_SPEED)]
    OutOfRange(f64),
    #[error("Preset speed {0}x cannot be removed")]
    Preset(f64),
    #[error("No speed {0}x")]
    Unknown(f64),
}

/// Display a speed without trailing zeros (1 / 1.25 / 0.5)
pub fn format_speed(speed: f64) -> String {
    format!("{}", (speed * 100.0).round() / 100.0)
}

fn snap(speed: f64) -> f64 {
    let snapped = (speed / CUSTOM_SPEED_STEP).round() * CUSTOM_SPEED_STEP;
    (snapped * 100.0).round() / 100.0
}

fn contains(list: &[f64], speed: f64) -> bool {
    list.iter().any(|&s| rates_match(s, speed))
}

fn sort(list: &mut [f64]) {
    list.sort_by(|a, b| a.total_cmp(b));
}

/// Visible and custom speed lists, kept sorted
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedMenu {
    visible: Vec<f64>,
    custom: Vec<f64>,
}

impl SpeedMenu {
    pub fn new() -> Self {
        Self {
            visible: DEFAULT_VISIBLE.to_vec(),
            custom: Vec::new(),
        }
    }

    /// Rebuild from stored lists, dropping anything invalid
    pub fn from_parts(visible: &[f64], custom: &[f64]) -> Self {
        let mut menu = Self {
            visible: Vec::new(),
            custom: Vec::new(),
        };
        for &speed in custom {
            if (MIN_CUSTOM_SPEED..=MAX_CUSTOM_SPEED).contains(&speed)
                && !contains(&PRESET_SPEEDS, speed)
                && !contains(&menu.custom, speed)
            {
                menu.custom.push(snap(speed));
            }
        }
        for &speed in visible {
            if menu.is_known(speed) && !contains(&menu.visible, speed) {
                menu.visible.push(speed);
            }
        }
        sort(&mut menu.custom);
        sort(&mut menu.visible);
        menu
    }

    pub fn visible(&self) -> &[f64] {
        &self.visible
    }

    pub fn custom(&self) -> &[f64] {
        &self.custom
    }

    /// Presets and custom speeds, sorted
    pub fn all(&self) -> Vec<f64> {
        let mut all: Vec<f64> = PRESET_SPEEDS.iter().chain(&self.custom).copied().collect();
        sort(&mut all);
        all
    }

    pub fn is_preset(&self, speed: f64) -> bool {
        contains(&PRESET_SPEEDS, speed)
    }

    pub fn is_visible(&self, speed: f64) -> bool {
        contains(&self.visible, speed)
    }

    fn is_known(&self, speed: f64) -> bool {
        self.is_preset(speed) || contains(&self.custom, speed)
    }

    /// Add a custom speed; it is also made visible. Returns the snapped value.
    pub fn add_custom(&mut self, speed: f64) -> Result<f64, MenuError> {
        if !(MIN_CUSTOM_SPEED..=MAX_CUSTOM_SPEED).contains(&speed) {
            return Err(MenuError::OutOfRange(speed));
        }
        let speed = snap(speed);
        if self.is_known(speed) {
            return Err(MenuError::Duplicate(speed));
        }

        self.custom.push(speed);
        sort(&mut self.custom);
        self.visible.push(speed);
        sort(&mut self.visible);
        Ok(speed)
    }

    /// Remove a custom speed from both lists
    pub fn remove_custom(&mut self, speed: f64) -> Result<(), MenuError> {
        if self.is_preset(speed) {
            return Err(MenuError::Preset(speed));
        }
        if !contains(&self.custom, speed) {
            return Err(MenuError::Unknown(speed));
        }
        self.custom.retain(|&s| !rates_match(s, speed));
        self.visible.retain(|&s| !rates_match(s, speed));
        Ok(())
    }

    /// Show or hide a speed on the bar. Returns whether it is now visible.
    pub fn toggle_visible(&mut self, speed: f64) -> Result<bool, MenuError> {
        if !self.is_known(speed) {
            return Err(MenuError::Unknown(speed));
        }
        if self.is_visible(speed) {
            self.visible.retain(|&s| !rates_match(s, speed));
            Ok(false)
        } else {
            let speed = self
                .all()
                .into_iter()
                .find(|&s| rates_match(s, speed))
                .unwrap_or(speed);
            self.visible.push(speed);
            sort(&mut self.visible);
            Ok(true)
        }
    }

    /// Index of the visible option matching `rate`, for highlighting
    pub fn highlighted(&self, rate: f64) -> Option<usize> {
        self.visible.iter().position(|&s| rates_match(s, rate))
    }

    /// Next visible speed above (`up`) or below the current rate
    pub fn step_from(&self, rate: f64, up: bool) -> Option<f64> {
        if up {
            self.visible
                .iter()
                .copied()
                .find(|&s| s > rate && !rates_match(s, rate))
        } else {
            self.visible
                .iter()
                .rev()
                .copied()
                .find(|&s| s < rate && !rates_match(s, rate))
        }
    }
}

impl Default for SpeedMenu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let menu = SpeedMenu::new();
        assert_eq!(menu.visible(), &DEFAULT_VISIBLE);
        assert!(menu.custom().is_empty());
        assert_eq!(menu.all(), PRESET_SPEEDS.to_vec());
    }

    #[test]
    fn test_add_custom_snaps_and_sorts() {
        let mut menu = SpeedMenu::new();
        assert_eq!(menu.add_custom(1.33), Ok(1.35));
        assert_eq!(menu.add_custom(0.3), Ok(0.3));
        assert_eq!(menu.custom(), &[0.3, 1.35]);
        assert!(menu.is_visible(1.35));
        assert_eq!(menu.visible()[0], 0.3);
    }

    #[test]
    fn test_add_rejects_duplicates_and_range() {
        let mut menu = SpeedMenu::new();
        assert_eq!(menu.add_custom(1.5), Err(MenuError::Duplicate(1.5)));
        assert_eq!(menu.add_custom(0.1), Err(MenuError::OutOfRange(0.1)));
        assert_eq!(
            MenuError::OutOfRange(0.1).to_string(),
            "Speed 0.1x is outside 0.25-4"
        );
        assert_eq!(menu.add_custom(4.5), Err(MenuError::OutOfRange(4.5)));
        menu.add_custom(2.2).unwrap();
        assert_eq!(menu.add_custom(2.21), Err(MenuError::Duplicate(2.2)));
    }

    #[test]
    fn test_remove_custom() {
        let mut menu = SpeedMenu::new();
        menu.add_custom(2.2).unwrap();
        assert_eq!(menu.remove_custom(2.0), Err(MenuError::Preset(2.0)));
        assert_eq!(menu.remove_custom(2.3), Err(MenuError::Unknown(2.3)));
        assert_eq!(menu.remove_custom(2.2), Ok(()));
        assert!(!menu.is_visible(2.2));
        assert!(menu.custom().is_empty());
    }

    #[test]
    fn test_toggle_visible() {
        let mut menu = SpeedMenu::new();
        assert_eq!(menu.toggle_visible(4.0), Ok(true));
        assert_eq!(menu.visible().last(), Some(&4.0));
        assert_eq!(menu.toggle_visible(0.5), Ok(false));
        assert!(!menu.is_visible(0.5));
        assert_eq!(menu.toggle_visible(3.3), Err(MenuError::Unknown(3.3)));
    }

    #[test]
    fn test_highlight_and_step() {
        let menu = SpeedMenu::new();
        assert_eq!(menu.highlighted(1.25), Some(2));
        assert_eq!(menu.highlighted(1.1), None);

        assert_eq!(menu.step_from(1.0, true), Some(1.25));
        assert_eq!(menu.step_from(1.1, true), Some(1.25));
        assert_eq!(menu.step_from(1.0, false), Some(0.5));
        assert_eq!(menu.step_from(3.0, true), None);
        assert_eq!(menu.step_from(0.5, false), None);
    }

    #[test]
    fn test_from_parts_drops_invalid() {
        let menu = SpeedMenu::from_parts(&[2.0, 9.0, 1.35, 2.0, 0.5], &[1.35, 1.5, 7.0]);
        assert_eq!(menu.custom(), &[1.35]);
        assert_eq!(menu.visible(), &[0.5, 1.35, 2.0]);
    }

    #[test]
    fn test_format_speed() {
        assert_eq!(format_speed(1.0), "1");
        assert_eq!(format_speed(1.25), "1.25");
        assert_eq!(format_speed(0.5), "0.5");
        assert_eq!(format_speed(1.35000000001), "1.35");
    }
}
