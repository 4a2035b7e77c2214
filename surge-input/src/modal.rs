//! Modal state machine for vim-style input handling

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::commands::{parse_command_line, Command, StepDirection};

/// Input modes (vim-style)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Command,
    Help,
}

impl Mode {
    /// Get display name for the mode
    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Command => "COMMAND",
            Mode::Help => "HELP",
        }
    }
}

/// Handles keyboard input and converts to commands
pub struct InputHandler {
    mode: Mode,
    command_buffer: String,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            mode: Mode::Normal,
            command_buffer: String::new(),
        }
    }

    /// Get current mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// True while the command line has focus
    pub fn is_editing(&self) -> bool {
        self.mode == Mode::Command
    }

    /// Get current command buffer (for display)
    pub fn command_buffer(&self) -> &str {
        &self.command_buffer
    }

    /// Handle a key event and return a command if applicable.
    /// Releases never produce commands.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        match self.mode {
            Mode::Normal => self.handle_normal_mode(key),
            Mode::Command => self.handle_command_mode(key),
            Mode::Help => self.handle_help_mode(key),
        }
    }

    fn handle_normal_mode(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            // Mode switching
            KeyCode::Char(':') => {
                self.mode = Mode::Command;
                self.command_buffer.clear();
                Some(Command::EnterCommandMode)
            }
            KeyCode::Char('?') => {
                self.mode = Mode::Help;
                Some(Command::ToggleHelp)
            }

            // Playback
            KeyCode::Char(' ') => Some(Command::TogglePlay),
            KeyCode::Left => Some(Command::SkipBack),

            // Speed bar
            KeyCode::Char('[') => Some(Command::StepSpeed(StepDirection::Down)),
            KeyCode::Char(']') => Some(Command::StepSpeed(StepDirection::Up)),
            KeyCode::Char(c @ '1'..='9') => {
                Some(Command::SelectVisible((c as usize) - ('1' as usize)))
            }

            // Quit
            KeyCode::Char('q') => Some(Command::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Command::Quit)
            }

            KeyCode::Esc => Some(Command::Cancel),

            _ => None,
        }
    }

    fn handle_command_mode(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Enter => {
                let cmd = parse_command_line(&self.command_buffer);
                self.mode = Mode::Normal;
                let buffer = std::mem::take(&mut self.command_buffer);
                cmd.or(Some(Command::ExecuteCommand(buffer)))
            }
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.command_buffer.clear();
                Some(Command::EnterNormalMode)
            }
            KeyCode::Backspace => {
                self.command_buffer.pop();
                if self.command_buffer.is_empty() {
                    self.mode = Mode::Normal;
                    Some(Command::EnterNormalMode)
                } else {
                    None
                }
            }
            KeyCode::Char(c) => {
                self.command_buffer.push(c);
                None
            }
            _ => None,
        }
    }

    fn handle_help_mode(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
                self.mode = Mode::Normal;
                Some(Command::ToggleHelp)
            }
            _ => None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_line(input: &mut InputHandler, line: &str) -> Option<Command> {
        input.handle_key(press(KeyCode::Char(':')));
        for c in line.chars() {
            input.handle_key(press(KeyCode::Char(c)));
        }
        input.handle_key(press(KeyCode::Enter))
    }

    #[test]
    fn test_command_line() {
        let mut input = InputHandler::new();
        assert_eq!(
            input.handle_key(press(KeyCode::Char(':'))),
            Some(Command::EnterCommandMode)
        );
        assert!(input.is_editing());
        input.handle_key(press(KeyCode::Char('q')));
        assert_eq!(input.command_buffer(), "q");
        assert_eq!(input.handle_key(press(KeyCode::Enter)), Some(Command::Quit));
        assert_eq!(input.mode(), Mode::Normal);
    }

    #[test]
    fn test_command_line_speed_and_unknown() {
        let mut input = InputHandler::new();
        assert_eq!(type_line(&mut input, "speed 1.75"), Some(Command::SelectSpeed(1.75)));
        assert_eq!(
            type_line(&mut input, "warp 9"),
            Some(Command::ExecuteCommand("warp 9".to_string()))
        );
    }

    #[test]
    fn test_escape_and_backspace_leave_command_mode() {
        let mut input = InputHandler::new();
        input.handle_key(press(KeyCode::Char(':')));
        input.handle_key(press(KeyCode::Char('a')));
        assert_eq!(input.handle_key(press(KeyCode::Esc)), Some(Command::EnterNormalMode));
        assert!(!input.is_editing());

        input.handle_key(press(KeyCode::Char(':')));
        input.handle_key(press(KeyCode::Char('a')));
        assert_eq!(
            input.handle_key(press(KeyCode::Backspace)),
            Some(Command::EnterNormalMode)
        );
        assert_eq!(input.mode(), Mode::Normal);
    }

    #[test]
    fn test_normal_mode_keys() {
        let mut input = InputHandler::new();
        assert_eq!(
            input.handle_key(press(KeyCode::Char(']'))),
            Some(Command::StepSpeed(StepDirection::Up))
        );
        assert_eq!(
            input.handle_key(press(KeyCode::Char('['))),
            Some(Command::StepSpeed(StepDirection::Down))
        );
        assert_eq!(
            input.handle_key(press(KeyCode::Char('3'))),
            Some(Command::SelectVisible(2))
        );
        assert_eq!(input.handle_key(press(KeyCode::Char(' '))), Some(Command::TogglePlay));
        assert_eq!(input.handle_key(press(KeyCode::Char('q'))), Some(Command::Quit));
    }

    #[test]
    fn test_help_mode() {
        let mut input = InputHandler::new();
        assert_eq!(input.handle_key(press(KeyCode::Char('?'))), Some(Command::ToggleHelp));
        assert_eq!(input.mode(), Mode::Help);
        assert_eq!(input.handle_key(press(KeyCode::Char(']'))), None);
        assert_eq!(input.handle_key(press(KeyCode::Esc)), Some(Command::ToggleHelp));
        assert_eq!(input.mode(), Mode::Normal);
    }

    #[test]
    fn test_release_is_ignored() {
        let mut input = InputHandler::new();
        let release = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(input.handle_key(release), None);
    }
}
