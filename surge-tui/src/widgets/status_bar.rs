//! Status bar widget - mode indicator and command line

use crate::app::MessageType;
use crate::theme::Theme;
use surge_input::Mode;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Widget for displaying the status bar with mode and command input
pub struct StatusBarWidget<'a> {
    mode: Mode,
    command_buffer: &'a str,
    message: Option<&'a str>,
    message_type: MessageType,
    theme: &'a Theme,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(mode: Mode, command_buffer: &'a str, theme: &'a Theme) -> Self {
        Self {
            mode,
            command_buffer,
            message: None,
            message_type: MessageType::Info,
            theme,
        }
    }

    pub fn message(mut self, msg: Option<&'a str>, msg_type: MessageType) -> Self {
        self.message = msg;
        self.message_type = msg_type;
        self
    }

    fn mode_string(&self) -> (&'static str, Style) {
        let style = match self.mode {
            Mode::Normal | Mode::Help => self.theme.highlight(),
            Mode::Command => Style::from(self.theme.accent),
        };
        (self.mode.display_name(), style)
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        let chunks = Layout::horizontal([
            Constraint::Length(10), // Mode indicator
            Constraint::Min(20),    // Command/message area
            Constraint::Length(24), // Help hint
        ])
        .split(area);

        // Mode indicator
        let (mode_text, mode_style) = self.mode_string();
        let mode_line = Line::from(vec![
            Span::raw("["),
            Span::styled(mode_text, mode_style),
            Span::raw("]"),
        ]);
        Paragraph::new(mode_line).render(chunks[0], buf);

        // Command/message area
        let content = if self.mode == Mode::Command {
            Line::from(vec![
                Span::styled(":", Style::from(self.theme.accent)),
                Span::styled(self.command_buffer, self.theme.normal()),
                Span::styled("█", self.theme.highlight()), // Cursor
            ])
        } else if let Some(msg) = self.message {
            let msg_style = match self.message_type {
                MessageType::Info => self.theme.dim(),
                MessageType::Success => Style::from(self.theme.accent),
                MessageType::Warning => Style::default().fg(self.theme.warning),
                MessageType::Error => Style::default().fg(self.theme.danger),
            };
            Line::from(Span::styled(msg, msg_style))
        } else {
            Line::from(Span::styled(
                "Hold Ctrl, z or → to speed up. ? for help",
                self.theme.dim(),
            ))
        };
        Paragraph::new(content).render(chunks[1], buf);

        // Help hint
        let help = match self.mode {
            Mode::Normal => "[/]:speed  :cmd  ?:help",
            Mode::Command => "Enter:run  Esc:cancel",
            Mode::Help => "Esc:close help",
        };
        let help_line = Line::from(Span::styled(help, self.theme.dim()));
        Paragraph::new(help_line).render(chunks[2], buf);
    }
}

/// Help overlay widget
pub struct HelpWidget<'a> {
    theme: &'a Theme,
}

impl<'a> HelpWidget<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    fn help_lines() -> Vec<&'static str> {
        vec![
            "╔══════════════════════════════════════════════════╗",
            "║           SURGE - hold-to-speed player           ║",
            "╠══════════════════════════════════════════════════╣",
            "║ HOLD TO SPEED UP                                 ║",
            "║   Ctrl          Hold: primary multiplier         ║",
            "║   z             Hold: secondary multiplier       ║",
            "║   →             Tap: skip forward                ║",
            "║                 Hold: seek multiplier            ║",
            "║   Release restores the speed you had before.     ║",
            "╠──────────────────────────────────────────────────╣",
            "║ PLAYBACK                                         ║",
            "║   Space         Play / pause                     ║",
            "║   ←             Skip back                        ║",
            "║   [ / ]         Previous / next visible speed    ║",
            "║   1-9           Pick a speed from the bar        ║",
            "╠──────────────────────────────────────────────────╣",
            "║ COMMANDS (:)                                     ║",
            "║   :speed <x>    Set the playback speed           ║",
            "║   :add <x>      Add a custom speed (0.25-4)      ║",
            "║   :remove <x>   Remove a custom speed            ║",
            "║   :toggle <x>   Show / hide a speed on the bar   ║",
            "║   :eject        Remove the media element         ║",
            "║   :load         Load the media element again     ║",
            "║   :theme <name> scope / tape / vhs               ║",
            "║   :q            Quit                             ║",
            "╠══════════════════════════════════════════════════╣",
            "║          Press Esc or ? to close help            ║",
            "╚══════════════════════════════════════════════════╝",
        ]
    }
}

impl Widget for HelpWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Clear background
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                buf[(x, y)].set_char(' ').set_style(self.theme.normal());
            }
        }

        let help_text = Self::help_lines();
        let start_x = area.x + area.width.saturating_sub(52) / 2;

        for (i, line) in help_text.iter().take(area.height as usize).enumerate() {
            let y = area.y + i as u16;

            for (j, ch) in line.chars().enumerate() {
                let x = start_x + j as u16;
                if x >= area.x + area.width {
                    break;
                }

                let style = if matches!(ch, '║' | '╔' | '╗' | '╚' | '╝' | '═' | '╠' | '╣' | '─') {
                    self.theme.border()
                } else {
                    self.theme.normal()
                };

                buf[(x, y)].set_char(ch).set_style(style);
            }
        }
    }
}
