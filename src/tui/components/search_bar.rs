//! # SearchBar Component
//!
//! Single-line query input at the top of the screen.
//!
//! The buffer is internal state. Every edit emits `SearchEvent::QueryChanged`
//! with the full text; the parent forwards it to the core, which debounces
//! the actual search. Escape is handled by the parent since its meaning
//! depends on whether there is anything to clear.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::core::theme::ThemeColors;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::rgb;
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    QueryChanged(String),
}

pub struct SearchBar {
    /// Text buffer (Internal State)
    buffer: String,
    /// Whether a debounced search is still pending (Prop)
    pub is_searching: bool,
    /// Number of matches for the applied query (Prop)
    pub match_count: Option<usize>,
    /// Palette of the current theme (Prop)
    pub colors: ThemeColors,
}

impl SearchBar {
    pub fn new(colors: ThemeColors) -> Self {
        Self {
            buffer: String::new(),
            is_searching: false,
            match_count: None,
            colors,
        }
    }

    pub fn query(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    fn title(&self) -> String {
        match (self.is_searching, self.match_count) {
            (true, _) => "Search (searching...)".to_string(),
            (false, Some(count)) if !self.query().is_empty() => format!("Search ({count} matches)"),
            _ => "Search".to_string(),
        }
    }
}

impl EventHandler for SearchBar {
    type Event = SearchEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<SearchEvent> {
        match event {
            TuiEvent::InputChar(c) => self.buffer.push(*c),
            TuiEvent::Paste(text) => {
                // Single-line input
                self.buffer.extend(text.chars().filter(|c| !c.is_control()));
            }
            TuiEvent::Backspace => {
                self.buffer.pop()?;
            }
            _ => return None,
        }
        Some(SearchEvent::QueryChanged(self.buffer.clone()))
    }
}

impl Component for SearchBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = Style::default().fg(rgb(self.colors.primary));
        let line = if self.buffer.is_empty() {
            Line::from(Span::styled(
                "Type to filter...",
                Style::default()
                    .fg(rgb(self.colors.text_secondary))
                    .add_modifier(Modifier::ITALIC),
            ))
        } else {
            Line::from(Span::styled(
                self.buffer.as_str(),
                Style::default().fg(rgb(self.colors.text)),
            ))
        };

        let input = Paragraph::new(line).block(
            Block::bordered()
                .title(self.title())
                .border_style(border_style)
                .title_style(border_style),
        );
        frame.render_widget(input, area);

        let cursor_x = area.x + 1 + unicode_width::UnicodeWidthStr::width(self.buffer.as_str()) as u16;
        if cursor_x < area.right().saturating_sub(1) {
            frame.set_cursor_position((cursor_x, area.y + 1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::theme::Theme;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn bar() -> SearchBar {
        SearchBar::new(Theme::light().colors)
    }

    fn rendered(bar: &mut SearchBar) -> String {
        let backend = TestBackend::new(40, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| bar.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_typing_emits_full_query() {
        let mut bar = bar();
        assert_eq!(bar.handle_event(&TuiEvent::InputChar('a')), Some(SearchEvent::QueryChanged("a".into())));
        assert_eq!(bar.handle_event(&TuiEvent::InputChar('n')), Some(SearchEvent::QueryChanged("an".into())));
        assert_eq!(bar.query(), "an");
    }

    #[test]
    fn test_backspace_on_empty_emits_nothing() {
        let mut bar = bar();
        assert_eq!(bar.handle_event(&TuiEvent::Backspace), None);

        bar.handle_event(&TuiEvent::InputChar('x'));
        assert_eq!(bar.handle_event(&TuiEvent::Backspace), Some(SearchEvent::QueryChanged(String::new())));
    }

    #[test]
    fn test_paste_drops_newlines() {
        let mut bar = bar();
        bar.handle_event(&TuiEvent::Paste("ban\nana".into()));
        assert_eq!(bar.query(), "banana");
    }

    #[test]
    fn test_navigation_is_not_consumed() {
        let mut bar = bar();
        assert_eq!(bar.handle_event(&TuiEvent::CursorDown), None);
    }

    #[test]
    fn test_render_placeholder_and_count() {
        let mut bar = bar();
        assert!(rendered(&mut bar).contains("Type to filter"));

        bar.handle_event(&TuiEvent::InputChar('a'));
        bar.match_count = Some(4);
        let text = rendered(&mut bar);
        assert!(text.contains("Search (4 matches)"));
        assert!(!text.contains("Type to filter"));

        bar.is_searching = true;
        assert!(rendered(&mut bar).contains("searching..."));
    }
}
