//! Player widget - title, transport state, progress and rate

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::app::PlayerView;
use crate::theme::Theme;
use surge_config::format_speed;

/// Widget for displaying the media element
pub struct PlayerWidget<'a> {
    player: &'a PlayerView,
    theme: &'a Theme,
    overriding: bool,
}

impl<'a> PlayerWidget<'a> {
    pub fn new(player: &'a PlayerView, theme: &'a Theme) -> Self {
        Self {
            player,
            theme,
            overriding: false,
        }
    }

    /// Highlight the border while a speed override is held
    pub fn overriding(mut self, overriding: bool) -> Self {
        self.overriding = overriding;
        self
    }

    /// Format seconds as m:ss
    pub fn format_time(secs: f64) -> String {
        let total = secs.max(0.0) as u64;
        format!("{}:{:02}", total / 60, total % 60)
    }

    fn transport(&self) -> (&'static str, Style) {
        if !self.player.loaded {
            ("■ NO MEDIA", Style::default().fg(self.theme.danger))
        } else if self.player.playing {
            ("▶ PLAYING", Style::from(self.theme.accent))
        } else {
            ("❚❚ PAUSED", self.theme.dim())
        }
    }
}

impl Widget for PlayerWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.overriding {
            self.theme.border_active()
        } else {
            self.theme.border()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(Span::styled(" PLAYER ", self.theme.title()));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 10 || inner.height < 1 {
            return;
        }

        // Row 0: transport state, title and rate
        let (transport, transport_style) = self.transport();
        let title = if self.player.loaded {
            self.player.title.as_str()
        } else {
            "-"
        };
        let header = Line::from(vec![
            Span::styled(transport, transport_style),
            Span::raw("  "),
            Span::styled(title, self.theme.normal()),
            Span::raw("  "),
            Span::styled(
                format!("{}x", format_speed(self.player.rate)),
                self.theme.rate_style(self.player.rate),
            ),
        ]);
        Paragraph::new(header).render(Rect::new(inner.x, inner.y, inner.width, 1), buf);

        if inner.height < 3 {
            return;
        }

        // Row 2: progress bar with times
        let elapsed = Self::format_time(self.player.position_secs);
        let total = Self::format_time(self.player.duration_secs);
        let label_width = (elapsed.len() + total.len() + 2) as u16;
        let bar_width = inner.width.saturating_sub(label_width) as usize;
        let filled = (self.player.progress() * bar_width as f64).round() as usize;

        let y = inner.y + 2;
        let mut x = inner.x;
        for ch in elapsed.chars() {
            buf[(x, y)].set_char(ch).set_style(self.theme.normal());
            x += 1;
        }
        x += 1;
        for i in 0..bar_width {
            let (ch, style) = if i < filled {
                ('━', self.theme.progress_style(true))
            } else {
                ('─', self.theme.progress_style(false))
            };
            buf[(x, y)].set_char(ch).set_style(style);
            x += 1;
        }
        x += 1;
        for ch in total.chars() {
            if x >= inner.x + inner.width {
                break;
            }
            buf[(x, y)].set_char(ch).set_style(self.theme.dim());
            x += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(PlayerWidget::format_time(0.0), "0:00");
        assert_eq!(PlayerWidget::format_time(65.4), "1:05");
        assert_eq!(PlayerWidget::format_time(3599.0), "59:59");
        assert_eq!(PlayerWidget::format_time(-3.0), "0:00");
    }

    #[test]
    fn test_render_shows_rate() {
        let player = PlayerView {
            loaded: true,
            title: "demo".to_string(),
            playing: true,
            position_secs: 30.0,
            duration_secs: 120.0,
            rate: 2.0,
        };
        let theme = Theme::default();
        let area = Rect::new(0, 0, 40, 5);
        let mut buf = Buffer::empty(area);
        PlayerWidget::new(&player, &theme).render(area, &mut buf);

        let row: String = (0..area.width).map(|x| buf[(x, 1)].symbol()).collect();
        assert!(row.contains("PLAYING"));
        assert!(row.contains("2x"));
    }
}
