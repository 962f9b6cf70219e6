//! # Actions
//!
//! Everything that can happen in Unilist becomes an `Action`.
//! User scrolls to the end? That's `Action::LoadMore`.
//! A page arrives? That's `Action::PageLoaded { .. }`.
//!
//! The `update()` function takes the current state and an action,
//! mutates the state and returns an `Effect` describing the I/O the caller
//! should start. No side effects here. Fetches and timers happen elsewhere
//! and come back as more actions.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::debug;

use crate::core::dataset::Item;
use crate::core::pagination::{FetchError, PageRequest};
use crate::core::search::PendingSearch;
use crate::core::state::App;
use crate::core::theme::ThemeType;

#[derive(Debug)]
pub enum Action {
    LoadMore,
    Refresh,
    Reset,
    SetData(Vec<Item>),
    PageLoaded {
        request: PageRequest,
        result: Result<Vec<Item>, FetchError>,
    },
    QueryChanged(String),
    /// The debounce for a query elapsed.
    SearchDue(PendingSearch),
    ClearSearch,
    ToggleTheme,
    Quit,
}

/// I/O requested by `update()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    FetchPage(PageRequest),
    ScheduleSearch(PendingSearch),
    CancelSearch,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::LoadMore => {
            if app.search_active() {
                debug!("Ignoring LoadMore while a search is active");
                return Effect::None;
            }
            // Nothing loaded yet (startup, after Reset): page 1 comes from a refresh
            if app.paginator.items().is_empty() && app.paginator.state().has_more {
                return update(app, Action::Refresh);
            }
            match app.paginator.begin_load_more() {
                Some(request) => {
                    app.status_message = format!("Loading page {}...", request.page);
                    Effect::FetchPage(request)
                }
                None => Effect::None,
            }
        }
        Action::Refresh => match app.paginator.begin_refresh() {
            Some(request) => {
                app.status_message = String::from("Refreshing...");
                Effect::FetchPage(request)
            }
            None => Effect::None,
        },
        Action::Reset => {
            app.paginator.reset();
            app.sync_search_source();
            app.status_message = String::from("Reset");
            Effect::None
        }
        Action::SetData(items) => {
            app.paginator.set_data(items);
            app.sync_search_source();
            Effect::None
        }
        Action::PageLoaded { request, result } => {
            let appended = app.paginator.complete(request, result);
            let state = app.paginator.state();
            app.status_message = match &state.last_error {
                Some(err) => format!("Error: {}", err.message()),
                None if !state.has_more => format!("All {} items loaded", state.total_items),
                None => format!("Page {} loaded", state.current_page),
            };
            match appended {
                Some(start) => app.extend_search_source(start),
                None => app.sync_search_source(),
            }
            Effect::None
        }
        Action::QueryChanged(query) => Effect::ScheduleSearch(app.search.set_query(query)),
        Action::SearchDue(ticket) => {
            if app.search.apply(ticket) && app.search_active() {
                app.status_message = format!("{} matches", app.search.result_count());
            }
            Effect::None
        }
        Action::ClearSearch => {
            app.search.clear_search();
            Effect::CancelSearch
        }
        Action::ToggleTheme => {
            let next = match app.themes.theme().kind {
                ThemeType::Dark => ThemeType::Light,
                _ => ThemeType::Dark,
            };
            let scheme = app.themes.scheme();
            app.themes.set_theme_type(next, scheme);
            app.status_message = format!("Theme: {}", next.label());
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pagination::FetchKind;
    use crate::test_support::{json_items, test_app};

    fn fetch(app: &mut App, action: Action) -> PageRequest {
        match update(app, action) {
            Effect::FetchPage(request) => request,
            other => panic!("expected FetchPage, got {:?}", other),
        }
    }

    fn deliver(app: &mut App, request: PageRequest, items: Vec<Item>) {
        let effect = update(
            app,
            Action::PageLoaded {
                request,
                result: Ok(items),
            },
        );
        assert_eq!(effect, Effect::None);
    }

    #[test]
    fn test_refresh_then_load_more_requests_pages_in_order() {
        let mut app = test_app();

        let first = fetch(&mut app, Action::Refresh);
        assert_eq!(first, PageRequest { page: 1, kind: FetchKind::Replace });
        // Busy: a second request is swallowed
        assert_eq!(update(&mut app, Action::LoadMore), Effect::None);
        deliver(&mut app, first, json_items(0, 3));
        assert_eq!(app.status_message, "Page 1 loaded");

        let second = fetch(&mut app, Action::LoadMore);
        assert_eq!(second.page, 2);
        assert_eq!(app.status_message, "Loading page 2...");
        deliver(&mut app, second, json_items(3, 1));

        assert_eq!(app.paginator.items().len(), 4);
        assert_eq!(app.status_message, "All 4 items loaded");
        assert_eq!(update(&mut app, Action::LoadMore), Effect::None);
    }

    #[test]
    fn test_loaded_pages_feed_the_search_source() {
        let mut app = test_app();
        let request = fetch(&mut app, Action::Refresh);
        deliver(&mut app, request, json_items(0, 3));

        assert_eq!(app.search.source().len(), 3);
        assert_eq!(app.search.visible_results().len(), 3);
    }

    #[test]
    fn test_failed_page_shows_error_status() {
        let mut app = test_app();
        let request = fetch(&mut app, Action::Refresh);
        update(
            &mut app,
            Action::PageLoaded {
                request,
                result: Err(FetchError::new("offline")),
            },
        );

        assert_eq!(app.status_message, "Error: offline");
        assert!(app.paginator.state().last_error.is_some());
        assert!(!app.paginator.state().is_loading);
    }

    #[test]
    fn test_query_schedules_and_due_applies() {
        let mut app = test_app();
        let request = fetch(&mut app, Action::Refresh);
        deliver(&mut app, request, json_items(0, 3));

        let Effect::ScheduleSearch(ticket) = update(&mut app, Action::QueryChanged("item 1".into())) else {
            panic!("expected ScheduleSearch");
        };
        assert!(app.search.is_searching());

        update(&mut app, Action::SearchDue(ticket));
        assert!(!app.search.is_searching());
        assert_eq!(app.search.result_count(), 1);
        assert_eq!(app.status_message, "1 matches");
    }

    #[test]
    fn test_load_more_is_suspended_during_search() {
        let mut app = test_app();
        let request = fetch(&mut app, Action::Refresh);
        deliver(&mut app, request, json_items(0, 3));

        update(&mut app, Action::QueryChanged("item".into()));
        assert_eq!(update(&mut app, Action::LoadMore), Effect::None);
        assert!(!app.paginator.state().is_loading);

        assert_eq!(update(&mut app, Action::ClearSearch), Effect::CancelSearch);
        assert!(matches!(update(&mut app, Action::LoadMore), Effect::FetchPage(_)));
    }

    #[test]
    fn test_stale_search_due_is_ignored() {
        let mut app = test_app();
        let Effect::ScheduleSearch(old) = update(&mut app, Action::QueryChanged("a".into())) else {
            panic!("expected ScheduleSearch");
        };
        update(&mut app, Action::QueryChanged("ab".into()));

        update(&mut app, Action::SearchDue(old));
        assert!(app.search.is_searching());
    }

    #[test]
    fn test_reset_and_set_data() {
        let mut app = test_app();
        update(&mut app, Action::SetData(json_items(0, 2)));
        assert_eq!(app.paginator.items().len(), 2);
        assert!(!app.paginator.state().has_more);
        assert_eq!(app.search.source().len(), 2);

        update(&mut app, Action::Reset);
        assert!(app.paginator.items().is_empty());
        assert!(app.paginator.state().has_more);
        assert!(app.search.source().is_empty());
    }

    #[test]
    fn test_load_more_after_reset_fetches_first_page() {
        let mut app = test_app();
        let request = fetch(&mut app, Action::Refresh);
        deliver(&mut app, request, json_items(0, 3));
        let request = fetch(&mut app, Action::LoadMore);
        deliver(&mut app, request, json_items(3, 3));

        update(&mut app, Action::Reset);
        let state = app.paginator.state();
        assert!(!state.is_loading && state.has_more && state.last_error.is_none());

        // The list view tops up with LoadMore as soon as it sees an empty list
        let request = fetch(&mut app, Action::LoadMore);
        assert_eq!(request, PageRequest { page: 1, kind: FetchKind::Replace });
        deliver(&mut app, request, json_items(0, 3));
        assert_eq!(app.paginator.items()[0]["title"], "Item 0");
        assert_eq!(app.search.source().len(), 3);

        let next = fetch(&mut app, Action::LoadMore);
        assert_eq!(next, PageRequest { page: 2, kind: FetchKind::Append });
    }

    #[test]
    fn test_appended_pages_extend_search_source() {
        let mut app = test_app();
        let request = fetch(&mut app, Action::Refresh);
        deliver(&mut app, request, json_items(0, 3));
        let request = fetch(&mut app, Action::LoadMore);
        deliver(&mut app, request, json_items(3, 3));

        let titles: Vec<_> = app.search.source().iter().map(|item| item["title"].clone()).collect();
        assert_eq!(titles.len(), 6);
        assert_eq!(titles[5], "Item 5");
        assert_eq!(app.search.source(), app.paginator.items());
    }

    #[test]
    fn test_blank_query_does_not_pause_paging() {
        let mut app = test_app();
        let request = fetch(&mut app, Action::Refresh);
        deliver(&mut app, request, json_items(0, 3));

        update(&mut app, Action::QueryChanged("   ".into()));
        assert!(!app.search_active());
        assert!(matches!(update(&mut app, Action::LoadMore), Effect::FetchPage(_)));
    }

    #[test]
    fn test_toggle_theme_flips_between_light_and_dark() {
        let mut app = test_app();
        update(&mut app, Action::ToggleTheme);
        assert_eq!(app.themes.theme().kind, ThemeType::Dark);
        update(&mut app, Action::ToggleTheme);
        assert_eq!(app.themes.theme().kind, ThemeType::Light);
        assert_eq!(app.status_message, "Theme: light");
    }

    #[test]
    fn test_quit() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
