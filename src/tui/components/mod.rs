//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `StatusBar`: Bottom line with page progress and status message
//!
//! ### Stateful Components
//!
//! - `SearchBar`: Owns its text buffer and emits query changes
//! - `CardList`: Transient wrapper over the persistent `CardListState`
//!   (selection + scroll offset)
//!
//! Components receive external data as props, never by reaching into `App`.
//! That keeps dependencies explicit and each component testable against a
//! `TestBackend` on its own.
//!
//! ```text
//! components/
//! ├── mod.rs          (this file)
//! ├── search_bar.rs   (query input)
//! ├── card_list.rs    (themed cards + pagination footer)
//! └── status_bar.rs   (bottom status line)
//! ```

use ratatui::style::Color;

use crate::core::theme::HexColor;

pub mod card_list;
pub mod search_bar;
pub mod status_bar;

pub use card_list::{CardList, CardListState, ListFooter};
pub use search_bar::{SearchBar, SearchEvent};
pub use status_bar::StatusBar;

pub(crate) fn rgb(color: HexColor) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}
