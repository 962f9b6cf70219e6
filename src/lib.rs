//! Unilist library exports: the paginated list engines, search, theming,
//! and the terminal front end built on them.

pub mod core;
pub mod tui;

#[cfg(test)]
pub mod test_support;
