//! # Application State
//!
//! Core state for Unilist. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── paginator: Paginator<Item>     // accumulated pages + fetch status
//! ├── search: SearchEngine<Item>     // query over the loaded items
//! ├── themes: ThemeManager           // current theme + subscribers
//! ├── card: CardConfig               // card template (variant, elevation)
//! ├── title_field: String            // item field shown as card title
//! ├── subtitle_field: String         // item field shown as card subtitle
//! └── status_message: String         // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use std::sync::Arc;

use log::{info, warn};

use crate::core::card::CardConfig;
use crate::core::config::ResolvedConfig;
use crate::core::dataset::Item;
use crate::core::pagination::{PageSource, Paginator};
use crate::core::search::{SearchEngine, SearchOptions};
use crate::core::theme::{Theme, ThemeManager};

pub struct App {
    pub paginator: Paginator<Item>,
    pub search: SearchEngine<Item>,
    pub themes: ThemeManager,
    pub card: CardConfig,
    pub title_field: String,
    pub subtitle_field: String,
    pub status_message: String,
}

impl App {
    pub fn new(
        source: Arc<dyn PageSource<Item>>,
        page_size: usize,
        search_options: SearchOptions,
    ) -> Self {
        let paginator = Paginator::new(page_size, Vec::new())
            .with_source(source)
            .with_error_observer(|err| warn!("Page fetch failed: {}", err));

        let mut themes = ThemeManager::new(Theme::default());
        themes.subscribe(|theme| info!("Theme switched to {}", theme.kind.label()));

        Self {
            paginator,
            search: SearchEngine::new(Vec::new(), search_options),
            themes,
            card: CardConfig::default(),
            title_field: crate::core::config::DEFAULT_TITLE_FIELD.to_string(),
            subtitle_field: crate::core::config::DEFAULT_SUBTITLE_FIELD.to_string(),
            status_message: String::from("Welcome to Unilist!"),
        }
    }

    pub fn from_config(source: Arc<dyn PageSource<Item>>, config: &ResolvedConfig) -> Self {
        let mut app = Self::new(source, config.page_size, config.search.clone());

        app.themes.set_theme_type(config.theme, config.scheme);
        if !config.custom_colors.is_empty() {
            app.themes.set_custom_colors(&config.custom_colors);
        }
        app.card = CardConfig {
            variant: config.card_variant,
            elevation: config.elevation,
            ..CardConfig::default()
        };
        app.title_field = config.title_field.clone();
        app.subtitle_field = config.subtitle_field.clone();
        app
    }

    /// True while a non-empty query is in effect. Pagination pauses meanwhile.
    pub fn search_active(&self) -> bool {
        !self.search.query().trim().is_empty()
    }

    /// Points the search engine at the current page contents.
    pub(crate) fn sync_search_source(&mut self) {
        self.search.set_source(self.paginator.items().to_vec());
    }

    /// Hands the search engine the items appended from `start` onward.
    pub(crate) fn extend_search_source(&mut self, start: usize) {
        let fresh = self.paginator.items().get(start..).unwrap_or_default();
        self.search.extend_source(fresh.iter().cloned());
    }
}
