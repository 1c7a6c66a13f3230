use crossterm::event::{Event, KeyCode, KeyEvent};

use super::keybindings::{Action, KeyBindings, NavBinder};

pub enum InputResult {
    Continue,
    Quit,
    Action(Action),
    Char(char),
    Backspace,
    /// Enter pressed while editing the search text.
    Submit,
    /// Esc pressed while editing; the edit is dropped.
    CancelSearch,
}

pub fn handle_input(
    event: Event,
    searching: bool,
    bindings: &KeyBindings,
    binder: &NavBinder,
) -> InputResult {
    match event {
        Event::Key(key_event) => handle_key(key_event, searching, bindings, binder),
        _ => InputResult::Continue,
    }
}

fn handle_key(
    key: KeyEvent,
    searching: bool,
    bindings: &KeyBindings,
    binder: &NavBinder,
) -> InputResult {
    // While the search input has focus every printable key is text.
    if searching {
        return handle_search_input(key);
    }

    // Navigation keys are only live while the list view is mounted.
    if let Some(action) = binder.resolve(&key) {
        return InputResult::Action(action);
    }

    if let Some(action) = bindings.get(&key) {
        if action == Action::Quit {
            return InputResult::Quit;
        }
        return InputResult::Action(action);
    }

    InputResult::Continue
}

fn handle_search_input(key: KeyEvent) -> InputResult {
    match key.code {
        KeyCode::Char(c) => InputResult::Char(c),
        KeyCode::Backspace => InputResult::Backspace,
        KeyCode::Enter => InputResult::Submit,
        KeyCode::Esc => InputResult::CancelSearch,
        _ => InputResult::Continue,
    }
}
