use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::db::KeyValueStore;

use super::super::browser::{Browser, CommitOutcome, FetchRequest};
use super::super::format::{rating_from_digit, truncate};
use super::super::selection::Selection;
use super::{Focus, PendingDelete, UiState};

#[derive(Debug)]
pub(crate) enum KeyOutcome {
    Continue,
    Fetch(FetchRequest),
    Quit,
}

pub(super) fn status_info(msg: &str) -> String {
    format!("INFO: {msg}")
}

pub(super) fn status_error(msg: &str) -> String {
    format!("ERROR: {msg}")
}

pub(crate) fn handle_key<S: KeyValueStore>(
    browser: &mut Browser<S>,
    ui: &mut UiState,
    key: KeyEvent,
) -> KeyOutcome {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyOutcome::Quit;
    }

    if let Some(dialog) = ui.pending_delete.clone() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                ui.pending_delete = None;
                ui.status = match browser.remove_watched(&dialog.id) {
                    Ok(true) => status_info(&format!("Removed from watched list: {}", dialog.title)),
                    Ok(false) => status_error("Delete failed: entry no longer exists."),
                    Err(err) => status_error(&format!("Delete failed: {err:#}")),
                };
            }
            KeyCode::Esc | KeyCode::Char('n') => {
                ui.pending_delete = None;
                ui.status = status_info("Delete canceled.");
            }
            _ => {}
        }
        return KeyOutcome::Continue;
    }

    match ui.focus {
        Focus::Search => handle_search_key(browser, ui, key),
        Focus::Results | Focus::Watched => handle_command_key(browser, ui, key),
    }
}

fn handle_search_key<S: KeyValueStore>(
    browser: &mut Browser<S>,
    ui: &mut UiState,
    key: KeyEvent,
) -> KeyOutcome {
    match key.code {
        KeyCode::Char(ch) => {
            let mut query = browser.search().query().to_string();
            query.push(ch);
            change_query(browser, query)
        }
        KeyCode::Backspace => {
            let mut query = browser.search().query().to_string();
            if query.pop().is_none() {
                return KeyOutcome::Continue;
            }
            change_query(browser, query)
        }
        KeyCode::Esc => {
            if close_detail(browser, ui) {
                return KeyOutcome::Continue;
            }
            ui.focus = Focus::Results;
            KeyOutcome::Continue
        }
        KeyCode::Enter | KeyCode::Down | KeyCode::Tab => {
            ui.focus = Focus::Results;
            KeyOutcome::Continue
        }
        KeyCode::BackTab => {
            ui.focus = ui.focus.previous();
            KeyOutcome::Continue
        }
        _ => KeyOutcome::Continue,
    }
}

fn handle_command_key<S: KeyValueStore>(
    browser: &mut Browser<S>,
    ui: &mut UiState,
    key: KeyEvent,
) -> KeyOutcome {
    match key.code {
        KeyCode::Char('q') => return KeyOutcome::Quit,
        KeyCode::Char('/') => {
            ui.focus = Focus::Search;
            return change_query(browser, String::new());
        }
        KeyCode::Tab => ui.focus = ui.focus.next(),
        KeyCode::BackTab => ui.focus = ui.focus.previous(),
        KeyCode::Esc => {
            close_detail(browser, ui);
        }
        KeyCode::Up | KeyCode::Char('k') => move_cursor(browser, ui, -1),
        KeyCode::Down | KeyCode::Char('j') => move_cursor(browser, ui, 1),
        KeyCode::Char('-') => match ui.focus {
            Focus::Results => ui.list_open = !ui.list_open,
            Focus::Watched => ui.side_open = !ui.side_open,
            Focus::Search => {}
        },
        KeyCode::Enter if ui.focus == Focus::Results => {
            let Some(id) = ui
                .results
                .selected()
                .and_then(|idx| browser.search().results().get(idx))
                .map(|item| item.id.clone())
            else {
                return KeyOutcome::Continue;
            };
            return match browser.select(&id) {
                Some(request) => KeyOutcome::Fetch(request),
                None => {
                    ui.status = status_info("Closed details.");
                    KeyOutcome::Continue
                }
            };
        }
        KeyCode::Char(ch @ '0'..='9') => rate(browser, ui, ch),
        KeyCode::Char('a') => commit(browser, ui),
        KeyCode::Char('d') if ui.focus == Focus::Watched => request_delete(browser, ui),
        _ => {}
    }
    KeyOutcome::Continue
}

fn change_query<S: KeyValueStore>(browser: &mut Browser<S>, query: String) -> KeyOutcome {
    match browser.set_query(query) {
        Some(request) => KeyOutcome::Fetch(request),
        None => KeyOutcome::Continue,
    }
}

fn close_detail<S: KeyValueStore>(browser: &mut Browser<S>, ui: &mut UiState) -> bool {
    if !browser.close() {
        return false;
    }
    ui.status = status_info("Closed details.");
    true
}

fn move_cursor<S: KeyValueStore>(browser: &Browser<S>, ui: &mut UiState, delta: isize) {
    match ui.focus {
        Focus::Results => {
            let len = browser.search().results().len();
            let next = step(ui.results.selected(), len, delta);
            ui.results.select(next);
        }
        Focus::Watched => {
            let len = browser.watched().all().len();
            let next = step(ui.watched.selected(), len, delta);
            ui.watched.select(next);
        }
        Focus::Search => {}
    }
}

fn step(current: Option<usize>, len: usize, delta: isize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let current = current.unwrap_or(0);
    Some(current.saturating_add_signed(delta).min(len - 1))
}

fn rate<S: KeyValueStore>(browser: &mut Browser<S>, ui: &mut UiState, ch: char) {
    let Some(view) = browser.detail_view() else {
        ui.status = status_error("Open a movie to rate it.");
        return;
    };
    if let Some(previous) = view.watched_user_rating {
        ui.status = status_info(&format!("Already rated {previous}/10."));
        return;
    }
    let Some(rating) = rating_from_digit(ch) else {
        return;
    };
    browser.set_pending_rating(rating);
    ui.status = status_info(&format!("Rating set to {rating}/10. Press a to add."));
}

fn commit<S: KeyValueStore>(browser: &mut Browser<S>, ui: &mut UiState) {
    ui.status = match browser.commit_watched() {
        Ok(CommitOutcome::Added { title }) => {
            ui.focus = Focus::Results;
            status_info(&format!("Added to watched list: {title}"))
        }
        Ok(CommitOutcome::AlreadyWatched) => status_info("Already on your watched list."),
        Ok(CommitOutcome::NeedsRating) => status_error("Rate the movie first (1-9, 0 for 10)."),
        Ok(CommitOutcome::NotReady) => status_error("Open a movie's details first."),
        Err(err) => status_error(&format!("Could not save watched list: {err:#}")),
    };
}

fn request_delete<S: KeyValueStore>(browser: &Browser<S>, ui: &mut UiState) {
    if !matches!(browser.selection(), Selection::Unselected) {
        ui.status = status_error("Close the details first (Esc).");
        return;
    }
    let Some(entry) = ui
        .watched
        .selected()
        .and_then(|idx| browser.watched().all().get(idx))
    else {
        ui.status = status_error("Delete failed: no entry selected.");
        return;
    };
    ui.pending_delete = Some(PendingDelete {
        id: entry.id.clone(),
        title: truncate(&entry.title, 56),
    });
    ui.status = status_info("Confirm delete: y/Enter to delete, n/Esc to cancel.");
}

/// Keeps both cursors inside their lists after results or the watched list change.
pub(super) fn clamp_selections<S: KeyValueStore>(browser: &Browser<S>, ui: &mut UiState) {
    let results = browser.search().results().len();
    ui.results.select(clamp(ui.results.selected(), results));
    let watched = browser.watched().all().len();
    ui.watched.select(clamp(ui.watched.selected(), watched));
}

fn clamp(selected: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(selected.unwrap_or(0).min(len - 1))
}
