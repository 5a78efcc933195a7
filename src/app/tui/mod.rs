mod actions;
mod render;
mod session;

use std::io;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::SetTitle;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::{ListState, TableState};

use crate::db::KeyValueStore;
use crate::omdb::MovieGateway;

use super::browser::{Browser, Completion, FetchRequest, execute};

pub(crate) use self::actions::{KeyOutcome, handle_key};
use self::actions::{clamp_selections, status_info};
use self::render::draw_tui;
use self::session::TerminalSession;

const APP_TITLE: &str = "popcorn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Search,
    Results,
    Watched,
}

impl Focus {
    pub(crate) fn next(self) -> Self {
        match self {
            Self::Search => Self::Results,
            Self::Results => Self::Watched,
            Self::Watched => Self::Search,
        }
    }

    pub(crate) fn previous(self) -> Self {
        match self {
            Self::Search => Self::Watched,
            Self::Results => Self::Search,
            Self::Watched => Self::Results,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct PendingDelete {
    pub(crate) id: String,
    pub(crate) title: String,
}

pub(crate) struct UiState {
    pub(crate) focus: Focus,
    pub(crate) results: ListState,
    pub(crate) watched: TableState,
    pub(crate) status: String,
    pub(crate) pending_delete: Option<PendingDelete>,
    pub(crate) list_open: bool,
    pub(crate) side_open: bool,
}

impl UiState {
    pub(crate) fn new() -> Self {
        Self {
            focus: Focus::Search,
            results: ListState::default(),
            watched: TableState::default(),
            status: status_info("Type to search. Tab switches panes, q quits."),
            pending_delete: None,
            list_open: true,
            side_open: true,
        }
    }
}

pub(crate) fn run_tui<S: KeyValueStore>(
    browser: &mut Browser<S>,
    gateway: Arc<dyn MovieGateway>,
    initial_query: &str,
) -> Result<()> {
    let mut session = TerminalSession::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
        .context("failed to initialize terminal backend")?;
    terminal.clear()?;

    let outcome = with_teardown(browser, |browser| {
        event_loop(&mut terminal, browser, &gateway, initial_query)
    });

    let _ = crossterm::execute!(io::stdout(), SetTitle(APP_TITLE));
    terminal.show_cursor()?;
    session.leave()?;
    outcome
}

/// Runs `body`, then tears the browser down whether or not it failed.
pub(crate) fn with_teardown<S: KeyValueStore, T>(
    browser: &mut Browser<S>,
    body: impl FnOnce(&mut Browser<S>) -> Result<T>,
) -> Result<T> {
    let outcome = body(browser);
    browser.teardown();
    if let Err(err) = &outcome {
        tracing::error!(error = %err, "browser loop failed");
    }
    outcome
}

fn event_loop<S: KeyValueStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    browser: &mut Browser<S>,
    gateway: &Arc<dyn MovieGateway>,
    initial_query: &str,
) -> Result<()> {
    let (completion_tx, completion_rx) = mpsc::channel::<Completion>();
    let mut ui = UiState::new();
    let mut title = String::new();
    if let Some(request) = browser.set_query(initial_query) {
        dispatch(gateway, &completion_tx, request);
    }

    loop {
        while let Ok(completion) = completion_rx.try_recv() {
            let is_search = matches!(completion, Completion::Search(_));
            if browser.apply(completion) && is_search {
                ui.results.select(Some(0));
            }
        }
        clamp_selections(browser, &mut ui);

        let next_title = window_title(browser);
        if next_title != title {
            crossterm::execute!(io::stdout(), SetTitle(&next_title))
                .context("failed to set terminal title")?;
            title = next_title;
        }
        terminal.draw(|frame| draw_tui(frame, browser, &mut ui))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match handle_key(browser, &mut ui, key) {
            KeyOutcome::Continue => {}
            KeyOutcome::Fetch(request) => dispatch(gateway, &completion_tx, request),
            KeyOutcome::Quit => return Ok(()),
        }
    }
}

/// `Movie | <title>` while a loaded detail is open, the app name otherwise.
pub(crate) fn window_title<S: KeyValueStore>(browser: &Browser<S>) -> String {
    match browser.detail_view() {
        Some(view) => format!("Movie | {}", view.detail.title),
        None => APP_TITLE.to_string(),
    }
}

fn dispatch(
    gateway: &Arc<dyn MovieGateway>,
    completion_tx: &mpsc::Sender<Completion>,
    request: FetchRequest,
) {
    let gateway = Arc::clone(gateway);
    let tx = completion_tx.clone();
    std::thread::spawn(move || {
        let completion = execute(gateway.as_ref(), request);
        let _ = tx.send(completion);
    });
}
