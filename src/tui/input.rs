// Keyboard input handling.
//
// Translates crossterm key events into local ViewState mutations (selection,
// filtering) or into a UserCommand for the event loop (export, quit).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{UserCommand, ViewState};

/// Rows moved by PgUp/PgDn.
const PAGE_SIZE: usize = 10;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the event loop has to act; `None` when
/// the key was handled by mutating `ViewState`.
pub fn handle_key(key_event: KeyEvent, state: &mut ViewState) -> Option<UserCommand> {
    // Windows reports both press and release.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if state.filter_mode {
        return handle_filter_mode(key_event, state);
    }

    match key_event.code {
        KeyCode::Up | KeyCode::Char('k') => {
            state.select_prev(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.select_next(1);
            None
        }
        KeyCode::PageUp => {
            state.select_prev(PAGE_SIZE);
            None
        }
        KeyCode::PageDown => {
            state.select_next(PAGE_SIZE);
            None
        }
        KeyCode::Home => {
            state.select_first();
            None
        }
        KeyCode::End => {
            state.select_last();
            None
        }

        KeyCode::Char('/') => {
            state.filter_mode = true;
            state.status = None;
            None
        }

        KeyCode::Char('e') => Some(UserCommand::Export),

        // An applied filter is cleared before Esc quits.
        KeyCode::Esc => {
            if state.filter_text.is_empty() {
                Some(UserCommand::Quit)
            } else {
                state.update_filter(String::clear);
                None
            }
        }
        KeyCode::Char('q') => Some(UserCommand::Quit),

        _ => None,
    }
}

/// Keys while the filter input is active: printable characters edit the
/// filter, Enter keeps it, Esc clears it.
fn handle_filter_mode(key_event: KeyEvent, state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            state.filter_mode = false;
            state.update_filter(String::clear);
            None
        }
        KeyCode::Enter => {
            state.filter_mode = false;
            None
        }
        KeyCode::Backspace => {
            state.update_filter(|f| {
                f.pop();
            });
            None
        }
        KeyCode::Up => {
            state.select_prev(1);
            None
        }
        KeyCode::Down => {
            state.select_next(1);
            None
        }
        KeyCode::Char(c) => {
            state.update_filter(|f| f.push(c));
            None
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
