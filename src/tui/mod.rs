//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Effects
//!
//! `update()` never performs I/O. When it returns an `Effect`, `dispatch`
//! carries it out here:
//!
//! - `FetchPage` spawns a tokio task that calls the page source and sends
//!   `Action::PageLoaded` back over the action channel.
//! - `ScheduleSearch` (re)starts the debouncer, which sends
//!   `Action::SearchDue` once the user stops typing.
//! - `CancelSearch` drops the pending debounce timer.
//!
//! ## Redraw Strategy
//!
//! The loop redraws only after an event or an action. While a fetch or a
//! search is pending it polls every ~80ms so results show up promptly;
//! otherwise it sleeps up to 250ms between polls.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::time::Duration;

use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::core::action::{Action, Effect, update};
use crate::core::debounce::Debouncer;
use crate::core::pagination::{FetchError, PageRequest};
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{CardListState, SearchBar, SearchEvent};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub(crate) search_bar: SearchBar,
    pub(crate) card_list: CardListState,
}

impl TuiState {
    pub fn new(app: &App) -> Self {
        Self {
            search_bar: SearchBar::new(app.themes.theme().colors),
            card_list: CardListState::new(),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableBracketedPaste)?;
        info!("Terminal modes enabled (bracketed paste)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableBracketedPaste);
    }
}

pub fn run(mut app: App) -> std::io::Result<()> {
    let mut tui = TuiState::new(&app);
    let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
    let mut debouncer = Debouncer::new(app.search.options().debounce);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Nothing is loaded yet, so fetch page 1
    dispatch(&mut app, Action::Refresh, &tx, &mut debouncer);

    let mut needs_redraw = true;
    let mut should_quit = false;

    while !should_quit {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let busy = app.paginator.state().is_loading || app.search.is_searching();
        let timeout = if busy {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(250)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if handle_event(&mut app, &mut tui, event, &tx, &mut debouncer) {
                should_quit = true;
                break;
            }
        }

        // Handle background task actions (page fetches, debounced searches)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if dispatch(&mut app, action, &tx, &mut debouncer) {
                should_quit = true;
            }
        }

        // Infinite scroll: top up once the selection nears the end. A failed
        // page waits for an explicit retry instead of looping.
        let shown = visible_len(&app);
        tui.card_list.clamp(shown);
        let state = app.paginator.state();
        let can_top_up = !state.is_loading && state.has_more && state.last_error.is_none();
        if can_top_up && !app.search_active() && tui.card_list.near_end(shown) {
            dispatch(&mut app, Action::LoadMore, &tx, &mut debouncer);
        }
    }

    info!("Shutting down");
    ratatui::restore();
    Ok(())
}

/// Applies one terminal event. Returns true when the app should quit.
fn handle_event(
    app: &mut App,
    tui: &mut TuiState,
    event: TuiEvent,
    tx: &UnboundedSender<Action>,
    debouncer: &mut Debouncer,
) -> bool {
    match event {
        TuiEvent::Resize => false,
        TuiEvent::ForceQuit => dispatch(app, Action::Quit, tx, debouncer),
        TuiEvent::Escape if tui.search_bar.is_empty() => dispatch(app, Action::Quit, tx, debouncer),
        TuiEvent::Escape => {
            tui.search_bar.clear();
            tui.card_list.select_first();
            dispatch(app, Action::ClearSearch, tx, debouncer)
        }
        TuiEvent::Refresh => {
            tui.card_list.select_first();
            dispatch(app, Action::Refresh, tx, debouncer)
        }
        TuiEvent::Reset => {
            tui.search_bar.clear();
            tui.card_list.select_first();
            dispatch(app, Action::ClearSearch, tx, debouncer);
            dispatch(app, Action::Reset, tx, debouncer)
        }
        TuiEvent::ToggleTheme => dispatch(app, Action::ToggleTheme, tx, debouncer),
        TuiEvent::CursorUp => {
            tui.card_list.select_prev();
            false
        }
        TuiEvent::CursorDown => {
            let at_end = !tui.card_list.select_next(visible_len(app));
            // Down on the last card retries a failed page
            if at_end && app.paginator.state().last_error.is_some() {
                return dispatch(app, Action::LoadMore, tx, debouncer);
            }
            false
        }
        TuiEvent::PageUp => {
            tui.card_list.page_up();
            false
        }
        TuiEvent::PageDown => {
            tui.card_list.page_down(visible_len(app));
            false
        }
        TuiEvent::InputChar(_) | TuiEvent::Backspace | TuiEvent::Paste(_) => {
            match tui.search_bar.handle_event(&event) {
                Some(SearchEvent::QueryChanged(query)) => {
                    tui.card_list.select_first();
                    dispatch(app, Action::QueryChanged(query), tx, debouncer)
                }
                None => false,
            }
        }
    }
}

/// Runs `update` and carries out the effect. Returns true on quit.
fn dispatch(
    app: &mut App,
    action: Action,
    tx: &UnboundedSender<Action>,
    debouncer: &mut Debouncer,
) -> bool {
    match update(app, action) {
        Effect::None => {}
        Effect::FetchPage(request) => spawn_fetch(app, request, tx.clone()),
        Effect::ScheduleSearch(ticket) => debouncer.schedule(tx, Action::SearchDue(ticket)),
        Effect::CancelSearch => {
            debouncer.cancel();
        }
        Effect::Quit => return true,
    }
    false
}

fn visible_len(app: &App) -> usize {
    if app.search_active() {
        app.search.result_count()
    } else {
        app.paginator.items().len()
    }
}

fn spawn_fetch(app: &App, request: PageRequest, tx: UnboundedSender<Action>) {
    let Some(source) = app.paginator.source() else {
        warn!("No page source configured, dropping request for page {}", request.page);
        let _ = tx.send(Action::PageLoaded {
            request,
            result: Err(FetchError::new("no page source configured")),
        });
        return;
    };

    info!("Spawning fetch for page {} ({:?})", request.page, request.kind);
    tokio::spawn(async move {
        let result = source.fetch_page(request.page).await;
        if tx.send(Action::PageLoaded { request, result }).is_err() {
            warn!("Failed to deliver page {}: receiver dropped", request.page);
        }
    });
}
