use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{CardList, ListFooter, StatusBar};

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(3), Min(0), Length(1)]);
    let [search_area, list_area, status_area] = layout.areas(frame.area());

    let theme = app.themes.theme();
    let cards = app.search.visible_annotated();
    let shown = cards.len();

    tui.search_bar.colors = theme.colors;
    tui.search_bar.is_searching = app.search.is_searching();
    tui.search_bar.match_count = app.search_active().then(|| app.search.result_count());
    tui.search_bar.render(frame, search_area);

    let mut list = CardList {
        cards,
        template: &app.card,
        theme,
        title_field: &app.title_field,
        subtitle_field: &app.subtitle_field,
        footer: footer(app, shown),
        state: &mut tui.card_list,
    };
    list.render(frame, list_area);

    let state = app.paginator.state();
    let mut status = StatusBar {
        shown,
        total_items: state.total_items,
        current_page: state.current_page,
        is_loading: state.is_loading,
        has_error: state.last_error.is_some(),
        theme_label: theme.kind.label(),
        status_message: app.status_message.clone(),
        colors: theme.colors,
    };
    status.render(frame, status_area);
}

fn footer(app: &App, shown: usize) -> ListFooter {
    let state = app.paginator.state();
    if app.search_active() {
        return if shown == 0 && !app.search.is_searching() {
            ListFooter::NoMatches
        } else {
            ListFooter::None
        };
    }

    match &state.last_error {
        _ if state.is_loading => ListFooter::Loading,
        Some(err) => ListFooter::Error(err.message().to_string()),
        None if !state.has_more => ListFooter::End,
        None => ListFooter::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, Effect, update};
    use crate::core::pagination::FetchError;
    use crate::test_support::{json_items, test_app};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(app: &App, tui: &mut TuiState) -> String {
        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn loaded_app() -> App {
        let mut app = test_app();
        let Effect::FetchPage(request) = update(&mut app, Action::Refresh) else {
            panic!("expected FetchPage");
        };
        update(&mut app, Action::PageLoaded { request, result: Ok(json_items(0, 3)) });
        app
    }

    #[test]
    fn test_draw_ui() {
        let app = loaded_app();
        let mut tui = TuiState::new(&app);
        let text = draw(&app, &mut tui);

        assert!(text.contains("Search"));
        assert!(text.contains("Item 0"));
        assert!(text.contains("3/3 items"));
        assert!(text.contains("Page 1 loaded"));
    }

    #[test]
    fn test_footer_states() {
        let mut app = loaded_app();
        assert_eq!(footer(&app, 3), ListFooter::None);

        let Effect::FetchPage(request) = update(&mut app, Action::LoadMore) else {
            panic!("expected FetchPage");
        };
        assert_eq!(footer(&app, 3), ListFooter::Loading);

        update(
            &mut app,
            Action::PageLoaded {
                request,
                result: Err(FetchError::new("offline")),
            },
        );
        assert_eq!(footer(&app, 3), ListFooter::Error("offline".to_string()));
    }

    #[test]
    fn test_footer_no_matches_after_search() {
        let mut app = loaded_app();
        let Effect::ScheduleSearch(ticket) = update(&mut app, Action::QueryChanged("zzz".into())) else {
            panic!("expected ScheduleSearch");
        };
        // Pending: old results stay up without a verdict
        assert_eq!(footer(&app, 3), ListFooter::None);

        update(&mut app, Action::SearchDue(ticket));
        assert_eq!(footer(&app, 0), ListFooter::NoMatches);

        let mut tui = TuiState::new(&app);
        assert!(draw(&app, &mut tui).contains("No matches"));
    }
}
