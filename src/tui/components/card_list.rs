//! # CardList Component
//!
//! Scrollable list of themed cards, one per visible item.
//!
//! ## Persistent State + Transient Wrapper
//!
//! - `CardListState` lives in `TuiState` across frames (selection, scroll offset).
//! - `CardList<'a>` is rebuilt every frame from borrowed props and draws into
//!   the state it is handed.
//!
//! Each card is `CARD_HEIGHT` rows: a frame plus a title and subtitle line.
//! Its colors come from [`appearance`], so the card variant and theme decide
//! what the frame looks like. Matched ranges of a field are drawn as styled
//! spans over the raw field text.

use std::borrow::Cow;
use std::ops::Range;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::core::card::{CardAppearance, CardConfig, appearance};
use crate::core::dataset::Item;
use crate::core::search::{Annotated, Searchable};
use crate::core::theme::{HexColor, Theme};
use crate::tui::component::Component;
use crate::tui::components::rgb;

pub const CARD_HEIGHT: u16 = 4;

/// How close to the end the selection may get before more items are requested.
pub const LOAD_MORE_THRESHOLD: usize = 3;

// ============================================================================
// Persistent State
// ============================================================================

#[derive(Debug, Default)]
pub struct CardListState {
    pub selected: usize,
    pub offset: usize,
    /// Cards that fit on screen, measured at the last render
    page_len: usize,
}

impl CardListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Moves down one card. Returns false when already on the last one.
    pub fn select_next(&mut self, len: usize) -> bool {
        if self.selected + 1 >= len {
            return false;
        }
        self.selected += 1;
        true
    }

    pub fn page_up(&mut self) {
        self.selected = self.selected.saturating_sub(self.page_len.max(1));
    }

    pub fn page_down(&mut self, len: usize) {
        self.selected = (self.selected + self.page_len.max(1)).min(len.saturating_sub(1));
    }

    /// Keeps the selection inside a list that may have shrunk.
    pub fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
        self.offset = self.offset.min(self.selected);
    }

    /// True when the selection is within `LOAD_MORE_THRESHOLD` of the end.
    pub fn near_end(&self, len: usize) -> bool {
        self.selected + LOAD_MORE_THRESHOLD >= len
    }

    fn scroll_into_view(&mut self, page_len: usize) {
        self.page_len = page_len;
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if page_len > 0 && self.selected >= self.offset + page_len {
            self.offset = self.selected + 1 - page_len;
        }
    }
}

// ============================================================================
// Transient Component
// ============================================================================

/// What the last line of the list says about pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListFooter {
    None,
    Loading,
    Error(String),
    End,
    NoMatches,
}

pub struct CardList<'a> {
    pub cards: Vec<Annotated<'a, Item>>,
    pub template: &'a CardConfig,
    pub theme: &'a Theme,
    pub title_field: &'a str,
    pub subtitle_field: &'a str,
    pub footer: ListFooter,
    pub state: &'a mut CardListState,
}

impl Component for CardList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let colors = &self.theme.colors;
        frame.render_widget(
            Block::new().style(Style::default().bg(rgb(colors.background))),
            area,
        );

        let footer_height = u16::from(self.footer != ListFooter::None);
        let list_height = area.height.saturating_sub(footer_height);
        let page_len = usize::from((list_height / CARD_HEIGHT).max(1));

        self.state.clamp(self.cards.len());
        self.state.scroll_into_view(page_len);

        for (row, index) in (self.state.offset..self.cards.len()).take(page_len).enumerate() {
            let y = area.y + row as u16 * CARD_HEIGHT;
            if y + CARD_HEIGHT > area.y + list_height {
                break;
            }
            let card_area = Rect::new(area.x, y, area.width, CARD_HEIGHT);
            self.render_card(frame, card_area, index);
        }

        if footer_height > 0 {
            let footer_area = Rect::new(area.x, area.bottom() - 1, area.width, 1);
            frame.render_widget(self.footer_line(), footer_area);
        }
    }
}

impl CardList<'_> {
    fn render_card(&self, frame: &mut Frame, area: Rect, index: usize) {
        let card = &self.cards[index];
        let colors = &self.theme.colors;
        let look = appearance(self.template, self.theme);
        let selected = index == self.state.selected;

        let background = look.effective_background(colors.background);
        let (title_bg, subtitle_bg, text_color) = match look.gradient {
            Some(gradient) => (gradient.from, gradient.to, colors.background),
            None => (background, background, colors.text),
        };

        let mut block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(rgb(frame_color(&look, colors.background))))
            .style(Style::default().bg(rgb(background)));
        if selected {
            block = block
                .border_type(BorderType::Thick)
                .border_style(
                    Style::default()
                        .fg(rgb(colors.primary))
                        .add_modifier(Modifier::BOLD),
                );
        }

        let title_style = Style::default()
            .fg(rgb(text_color))
            .bg(rgb(title_bg))
            .add_modifier(Modifier::BOLD);
        let subtitle_style = Style::default()
            .fg(rgb(if look.gradient.is_some() { text_color } else { colors.text_secondary }))
            .bg(rgb(subtitle_bg));

        let title = card
            .item
            .field_text(self.title_field)
            .unwrap_or_else(|| fallback_title(card.item));
        let subtitle = card.item.field_text(self.subtitle_field).unwrap_or_default();

        let lines = vec![
            self.styled_line(&title, card.ranges(self.title_field), title_style),
            self.styled_line(&subtitle, card.ranges(self.subtitle_field), subtitle_style),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn styled_line<'t>(&self, text: &'t str, ranges: &[Range<usize>], base: Style) -> Line<'t> {
        if ranges.is_empty() {
            return Line::from(Span::styled(text, base));
        }
        let highlight = base
            .fg(rgb(self.theme.colors.warning))
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        Line::from(ranged_spans(text, ranges, base, highlight))
    }

    fn footer_line(&self) -> Line<'static> {
        let colors = &self.theme.colors;
        let (text, color) = match &self.footer {
            ListFooter::None => (String::new(), colors.text),
            ListFooter::Loading => ("Loading more...".to_string(), colors.info),
            ListFooter::Error(message) => (format!("Error: {message} (Down to retry)"), colors.error),
            ListFooter::End => ("No more items".to_string(), colors.text_secondary),
            ListFooter::NoMatches => ("No matches".to_string(), colors.text_secondary),
        };
        Line::from(Span::styled(
            text,
            Style::default().fg(rgb(color)).bg(rgb(colors.background)),
        ))
    }
}

/// Border color for an unselected card. Shadows darken with elevation.
fn frame_color(look: &CardAppearance, backdrop: HexColor) -> HexColor {
    match (look.border, look.shadow) {
        (Some(border), _) => border.color,
        (None, Some(shadow)) => shadow
            .color
            .blend(backdrop, shadow.opacity * f32::from(shadow.radius)),
        (None, None) => look.effective_background(backdrop),
    }
}

/// Title for items without the title field, e.g. bare numbers in the array.
fn fallback_title(item: &Item) -> Cow<'static, str> {
    if item.is_object() {
        Cow::Borrowed("(untitled)")
    } else {
        Cow::Owned(item.to_string())
    }
}

/// Splits `text` at the match `ranges`, styling the matched parts with `highlight`.
/// Ranges that do not fit `text` are skipped.
pub(crate) fn ranged_spans<'t>(
    text: &'t str,
    ranges: &[Range<usize>],
    base: Style,
    highlight: Style,
) -> Vec<Span<'t>> {
    let mut spans = Vec::new();
    let mut cursor = 0;
    for range in ranges {
        let (Some(before), Some(matched)) = (text.get(cursor..range.start), text.get(range.clone())) else {
            continue;
        };
        if !before.is_empty() {
            spans.push(Span::styled(before, base));
        }
        spans.push(Span::styled(matched, highlight));
        cursor = range.end;
    }
    if cursor < text.len() {
        spans.push(Span::styled(&text[cursor..], base));
    }
    spans
}
