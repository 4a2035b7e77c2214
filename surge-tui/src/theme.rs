//! Colour palettes for SURGE

use ratatui::style::{Color, Modifier, Style};

/// Theme configuration for the UI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    /// Primary foreground color (text, borders)
    pub fg: Color,
    /// Dimmed foreground (secondary text)
    pub fg_dim: Color,
    /// Background color
    pub bg: Color,
    /// Highlight color (current speed, active elements)
    pub highlight: Color,
    /// Accent color (progress, success messages)
    pub accent: Color,
    pub warning: Color,
    pub danger: Color,
    /// Speed overlay color
    pub overlay: Color,
}

impl Theme {
    /// Look up a palette by name or alias
    pub fn by_name(name: &str) -> Option<Theme> {
        let name = name.to_lowercase();
        PALETTES
            .iter()
            .find(|(aliases, theme)| theme.name == name || aliases.contains(&name.as_str()))
            .map(|(_, theme)| theme.clone())
    }

    /// Names accepted by `:theme`
    pub fn names() -> impl Iterator<Item = &'static str> {
        PALETTES.iter().map(|(_, theme)| theme.name)
    }

    /// Get style for normal text
    pub fn normal(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Get style for dimmed text
    pub fn dim(&self) -> Style {
        Style::default().fg(self.fg_dim).bg(self.bg)
    }

    /// Get style for highlighted/selected items
    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.bg)
            .bg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for borders
    pub fn border(&self) -> Style {
        Style::default().fg(self.fg_dim)
    }

    /// Get style for active borders
    pub fn border_active(&self) -> Style {
        Style::default().fg(self.highlight)
    }

    /// Get title style
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Progress bar style, played vs remaining
    pub fn progress_style(&self, played: bool) -> Style {
        if played {
            Style::default().fg(self.accent)
        } else {
            Style::default().fg(self.fg_dim)
        }
    }

    /// Speed overlay text
    pub fn overlay_style(&self) -> Style {
        Style::default()
            .fg(self.bg)
            .bg(self.overlay)
            .add_modifier(Modifier::BOLD)
    }

    /// Rate readout; stands out while it differs from 1x
    pub fn rate_style(&self, rate: f64) -> Style {
        if (rate - 1.0).abs() < 1e-6 {
            self.normal()
        } else {
            Style::default()
                .fg(self.overlay)
                .add_modifier(Modifier::BOLD)
        }
    }
}

/// Oscilloscope trace: teal on slate
pub const SCOPE: Theme = Theme {
    name: "scope",
    fg: Color::Rgb(94, 234, 212),
    fg_dim: Color::Rgb(45, 110, 104),
    bg: Color::Rgb(8, 16, 20),
    highlight: Color::Rgb(204, 251, 241),
    accent: Color::Rgb(56, 189, 248),
    warning: Color::Rgb(250, 204, 21),
    danger: Color::Rgb(248, 113, 113),
    overlay: Color::Rgb(251, 146, 60), // fast-forward badge
};

/// Cassette deck: warm orange on brown
pub const TAPE: Theme = Theme {
    name: "tape",
    fg: Color::Rgb(234, 170, 110),
    fg_dim: Color::Rgb(120, 84, 56),
    bg: Color::Rgb(20, 12, 8),
    highlight: Color::Rgb(253, 224, 180),
    accent: Color::Rgb(214, 120, 64),
    warning: Color::Rgb(240, 210, 90),
    danger: Color::Rgb(220, 70, 60),
    overlay: Color::Rgb(255, 240, 200),
};

/// Tracking-noise blue with magenta highlights
pub const VHS: Theme = Theme {
    name: "vhs",
    fg: Color::Rgb(147, 170, 255),
    fg_dim: Color::Rgb(72, 84, 140),
    bg: Color::Rgb(6, 6, 24),
    highlight: Color::Rgb(236, 110, 200),
    accent: Color::Rgb(120, 230, 255),
    warning: Color::Rgb(255, 220, 120),
    danger: Color::Rgb(255, 80, 110),
    overlay: Color::Rgb(255, 255, 255),
};

const PALETTES: [(&[&str], Theme); 3] = [
    (&["teal", "trace"], SCOPE),
    (&["cassette", "orange"], TAPE),
    (&["blue", "tracking"], VHS),
];

impl Default for Theme {
    fn default() -> Self {
        SCOPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name() {
        assert_eq!(Theme::by_name("Tape").map(|t| t.name), Some("tape"));
        assert_eq!(Theme::by_name("tracking").map(|t| t.name), Some("vhs"));
        assert_eq!(Theme::by_name("scope"), Some(SCOPE));
        assert_eq!(Theme::by_name("plaid"), None);
        assert_eq!(Theme::names().collect::<Vec<_>>(), vec!["scope", "tape", "vhs"]);
    }

    #[test]
    fn test_overlay_stands_out() {
        for name in Theme::names() {
            let theme = Theme::by_name(name).unwrap_or_default();
            assert_ne!(theme.overlay, theme.bg, "{name}");
            assert_eq!(theme.rate_style(1.0), theme.normal(), "{name}");
            assert_ne!(theme.rate_style(2.0), theme.normal(), "{name}");
        }
    }
}
