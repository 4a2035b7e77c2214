//! Speed bar widget - the visible speed options with the current one highlighted

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::theme::Theme;
use surge_config::{format_speed, SpeedMenu};

/// Widget for displaying the speed options
pub struct SpeedBarWidget<'a> {
    menu: &'a SpeedMenu,
    highlighted: Option<usize>,
    theme: &'a Theme,
}

impl<'a> SpeedBarWidget<'a> {
    pub fn new(menu: &'a SpeedMenu, theme: &'a Theme) -> Self {
        Self {
            menu,
            highlighted: None,
            theme,
        }
    }

    pub fn highlighted(mut self, index: Option<usize>) -> Self {
        self.highlighted = index;
        self
    }

    /// Option label; custom speeds carry a marker
    pub fn label(menu: &SpeedMenu, speed: f64) -> String {
        if menu.is_preset(speed) {
            format!(" {}x ", format_speed(speed))
        } else {
            format!(" {}x* ", format_speed(speed))
        }
    }
}

impl Widget for SpeedBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border())
            .title(Span::styled(" SPEED ", self.theme.title()));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 1 {
            return;
        }

        let mut spans = Vec::with_capacity(self.menu.visible().len() * 2);
        for (i, &speed) in self.menu.visible().iter().enumerate() {
            let style = if self.highlighted == Some(i) {
                self.theme.highlight()
            } else {
                self.theme.normal()
            };
            if i > 0 {
                spans.push(Span::styled("│", self.theme.dim()));
            }
            spans.push(Span::styled(Self::label(self.menu, speed), style));
        }
        if spans.is_empty() {
            spans.push(Span::styled("no speeds visible (:toggle <x>)", self.theme.dim()));
        }

        Paragraph::new(Line::from(spans)).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_marks_custom() {
        let mut menu = SpeedMenu::new();
        menu.add_custom(1.35).unwrap();
        assert_eq!(SpeedBarWidget::label(&menu, 1.25), " 1.25x ");
        assert_eq!(SpeedBarWidget::label(&menu, 1.35), " 1.35x* ");
    }

    #[test]
    fn test_render_highlights_current() {
        let menu = SpeedMenu::new();
        let theme = Theme::default();
        let area = Rect::new(0, 0, 80, 3);
        let mut buf = Buffer::empty(area);
        SpeedBarWidget::new(&menu, &theme)
            .highlighted(Some(0))
            .render(area, &mut buf);

        // First option " 0.5x " starts right after the border
        assert_eq!(buf[(2, 1)].symbol(), "0");
        assert_eq!(buf[(2, 1)].style().bg, Some(theme.highlight));
        assert_ne!(buf[(10, 1)].style().bg, Some(theme.highlight));
    }
}
