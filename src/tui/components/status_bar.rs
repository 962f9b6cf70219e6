//! # StatusBar Component
//!
//! Bottom line showing pagination progress and the latest status message.
//!
//! Stateless: every field is a prop copied from core state each frame.
//!
//! ```text
//!  12/40 items | page 2 | loading | dark | Page 2 loaded
//! ```
//!
//! Text is cut to the terminal width by display columns, so wide glyphs in
//! status messages never spill past the edge.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::theme::ThemeColors;
use crate::tui::component::Component;
use crate::tui::components::rgb;

pub struct StatusBar {
    pub shown: usize,
    pub total_items: usize,
    pub current_page: u32,
    pub is_loading: bool,
    pub has_error: bool,
    pub theme_label: &'static str,
    pub status_message: String,
    pub colors: ThemeColors,
}

impl StatusBar {
    fn text(&self) -> String {
        let mut parts = vec![
            format!("{}/{} items", self.shown, self.total_items),
            format!("page {}", self.current_page),
        ];
        if self.is_loading {
            parts.push("loading".to_string());
        }
        parts.push(self.theme_label.to_string());
        if !self.status_message.is_empty() {
            parts.push(self.status_message.clone());
        }
        format!(" {}", parts.join(" | "))
    }
}

impl Component for StatusBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let fg = if self.has_error {
            self.colors.error
        } else {
            self.colors.text_secondary
        };
        let style = Style::default().fg(rgb(fg)).bg(rgb(self.colors.surface));
        let text = truncate_to_width(&self.text(), usize::from(area.width));
        frame.render_widget(Span::styled(text, style), area);
    }
}

/// Cuts `text` to at most `width` display columns, ending in `…` when cut.
pub(crate) fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let budget = width - 1;
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}
