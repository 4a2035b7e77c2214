//! Application state management (Elm architecture)

use crate::theme::Theme;
use surge_config::{format_speed, SpeedMenu};
use surge_input::Mode;

/// Snapshot of the media element for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerView {
    /// False once the media element is ejected
    pub loaded: bool,
    pub title: String,
    pub playing: bool,
    pub position_secs: f64,
    pub duration_secs: f64,
    pub rate: f64,
}

impl Default for PlayerView {
    fn default() -> Self {
        Self {
            loaded: false,
            title: String::new(),
            playing: false,
            position_secs: 0.0,
            duration_secs: 0.0,
            rate: 1.0,
        }
    }
}

impl PlayerView {
    /// Playback progress (0.0 - 1.0)
    pub fn progress(&self) -> f64 {
        if self.duration_secs <= 0.0 {
            return 0.0;
        }
        (self.position_secs / self.duration_secs).clamp(0.0, 1.0)
    }
}

/// Message type for colored status messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageType {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// Application state
pub struct AppState {
    pub player: PlayerView,

    // Speed bar
    pub menu: SpeedMenu,
    /// Visible option matching the current rate
    pub highlighted: Option<usize>,
    /// Multiplier shown by the speed overlay
    pub overlay: Option<f64>,

    // UI state
    pub mode: Mode,
    pub command_buffer: String,
    pub message: Option<String>,
    pub message_type: MessageType,
    pub show_help: bool,

    // Theme
    pub theme: Theme,

    pub frame_count: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            player: PlayerView::default(),
            menu: SpeedMenu::default(),
            highlighted: None,
            overlay: None,
            mode: Mode::Normal,
            command_buffer: String::new(),
            message: None,
            message_type: MessageType::Info,
            show_help: false,
            theme: Theme::default(),
            frame_count: 0,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set current mode
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        if mode != Mode::Command {
            self.command_buffer.clear();
        }
    }

    /// Toggle help display
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Re-derive the highlighted speed option from the player rate
    pub fn refresh_highlight(&mut self) {
        self.highlighted = self.menu.highlighted(self.player.rate);
    }

    /// Set theme by name
    pub fn set_theme(&mut self, name: &str) -> bool {
        match Theme::by_name(name) {
            Some(theme) => {
                self.theme = theme;
                self.set_success(format!("Theme set to: {}", self.theme.name));
                true
            }
            None => {
                let names: Vec<_> = Theme::names().collect();
                self.set_error(format!("Unknown theme: {}. Use {}", name, names.join("/")));
                false
            }
        }
    }

    /// Label for the speed overlay
    pub fn overlay_text(&self) -> Option<String> {
        self.overlay.map(|m| format!("{}x ▶▶", format_speed(m)))
    }

    /// Clear any displayed message
    pub fn clear_message(&mut self) {
        self.message = None;
        self.message_type = MessageType::Info;
    }

    /// Set a message to display (info level)
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.message_type = MessageType::Info;
    }

    /// Set a success message
    pub fn set_success(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.message_type = MessageType::Success;
    }

    /// Set a warning message (yellow)
    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.message_type = MessageType::Warning;
    }

    /// Set an error message (red)
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.message_type = MessageType::Error;
    }
}

/// Main application wrapper
pub struct App {
    pub state: AppState,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_highlight_follows_rate() {
        let mut state = AppState::new();
        state.player.rate = 1.25;
        state.refresh_highlight();
        assert_eq!(state.highlighted, Some(2));

        state.player.rate = 1.1;
        state.refresh_highlight();
        assert_eq!(state.highlighted, None);
    }

    #[test]
    fn test_overlay_text() {
        let mut state = AppState::new();
        assert_eq!(state.overlay_text(), None);
        state.overlay = Some(2.0);
        assert_eq!(state.overlay_text().as_deref(), Some("2x ▶▶"));
        state.overlay = Some(2.5);
        assert_eq!(state.overlay_text().as_deref(), Some("2.5x ▶▶"));
    }

    #[test]
    fn test_set_theme() {
        let mut state = AppState::new();
        assert!(state.set_theme("cassette"));
        assert_eq!(state.theme.name, "tape");
        assert_eq!(state.message_type, MessageType::Success);

        assert!(!state.set_theme("plaid"));
        assert_eq!(state.theme.name, "tape");
        assert_eq!(
            state.message.as_deref(),
            Some("Unknown theme: plaid. Use scope/tape/vhs")
        );
        assert_eq!(state.message_type, MessageType::Error);
    }

    #[test]
    fn test_progress() {
        let mut player = PlayerView::default();
        assert_eq!(player.progress(), 0.0);
        player.duration_secs = 200.0;
        player.position_secs = 50.0;
        assert_eq!(player.progress(), 0.25);
        player.position_secs = 500.0;
        assert_eq!(player.progress(), 1.0);
    }

    #[test]
    fn test_set_mode_clears_buffer() {
        let mut state = AppState::new();
        state.set_mode(Mode::Command);
        state.command_buffer.push_str("speed 2");
        state.set_mode(Mode::Normal);
        assert!(state.command_buffer.is_empty());
    }
}
