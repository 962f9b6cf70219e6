//! # Core Application Logic
//!
//! This module contains Unilist's engines and business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌──────────────────────────────┐
//!                    │            CORE              │
//!                    │                              │
//!                    │  • Paginator (pages + state) │
//!                    │  • SearchEngine (filtering)  │
//!                    │  • ThemeManager / cards      │
//!                    │  • State + Action + update() │
//!                    │                              │
//!                    │  No terminal. No rendering.  │
//!                    └──────────────┬───────────────┘
//!                                   │
//!                          ┌────────┴────────┐
//!                          ▼                 ▼
//!                   ┌────────────┐    ┌────────────┐
//!                   │    TUI     │    │   tests/   │
//!                   │  Adapter   │    │ (public    │
//!                   │ (ratatui)  │    │  API)      │
//!                   └────────────┘    └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`pagination`]: `Paginator`, `PageSource` and the fetch state machine
//! - [`search`]: `SearchEngine`, match/highlight helpers, debounce tickets
//! - [`debounce`]: timer that delivers an action after input goes quiet
//! - [`theme`]: colors, theme types, `ThemeManager` with subscriptions
//! - [`card`]: card variants and their computed appearance
//! - [`config`]: TOML config, env and CLI overrides
//! - [`dataset`]: loading the JSON item array
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer

pub mod action;
pub mod card;
pub mod config;
pub mod dataset;
pub mod debounce;
pub mod pagination;
pub mod search;
pub mod state;
pub mod theme;
