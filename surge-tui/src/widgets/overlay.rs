//! Speed overlay - centered badge shown while an override is held

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block, Borders, Clear, Widget},
};

use crate::theme::Theme;

/// Centered badge showing the override multiplier
pub struct OverlayWidget<'a> {
    text: &'a str,
    theme: &'a Theme,
}

impl<'a> OverlayWidget<'a> {
    pub fn new(text: &'a str, theme: &'a Theme) -> Self {
        Self { text, theme }
    }

    /// Area of `width` x `height` centered in `area`, clipped to it
    pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
        let width = width.min(area.width);
        let height = height.min(area.height);
        Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        )
    }
}

impl Widget for OverlayWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text_width = self.text.chars().count() as u16;
        let badge = Self::centered(area, text_width + 4, 3);

        Clear.render(badge, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_active());
        let inner = block.inner(badge);
        block.render(badge, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        // Padded fill so the badge reads as a solid block
        let y = inner.y;
        for x in inner.x..inner.x + inner.width {
            buf[(x, y)].set_char(' ').set_style(self.theme.overlay_style());
        }
        let start = inner.x + inner.width.saturating_sub(text_width) / 2;
        for (i, ch) in self.text.chars().enumerate() {
            let x = start + i as u16;
            if x >= inner.x + inner.width {
                break;
            }
            buf[(x, y)].set_char(ch).set_style(self.theme.overlay_style());
        }
    }
}
