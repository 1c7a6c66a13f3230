use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use crate::config::UiConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Selection intents, resolved against current list state at press time
    NextMessage,
    PrevMessage,
    Deselect,

    // List actions
    Search,
    Refresh,
    NextLabel,
    Quit,
}

/// Ambient key map: everything except the two message-navigation keys,
/// which live in [`NavBinder`] because their lifetime is tied to the view.
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, Action>,
}

impl KeyBindings {
    pub fn new() -> Self {
        let mut map = HashMap::new();

        map.insert(key('/'), Action::Search);
        map.insert(key('r'), Action::Refresh);
        map.insert(key('q'), Action::Quit);
        map.insert(key_code(KeyCode::Tab), Action::NextLabel);
        map.insert(key_code(KeyCode::Esc), Action::Deselect);

        Self { bindings: map }
    }

    pub fn get(&self, event: &KeyEvent) -> Option<Action> {
        self.bindings.get(event).copied()
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry for the next/previous message keys. The keys only do anything
/// between `bind` and `unbind`, and a press is resolved against list state
/// at press time, never at bind time.
pub struct NavBinder {
    next_key: KeyEvent,
    prev_key: KeyEvent,
    bound: bool,
}

impl NavBinder {
    pub fn new(ui: &UiConfig) -> Self {
        Self {
            next_key: key(ui.next_message_key),
            prev_key: key(ui.prev_message_key),
            bound: false,
        }
    }

    /// Activate the navigation keys. Called when the list view mounts.
    pub fn bind(&mut self) {
        self.bound = true;
    }

    /// Release the navigation keys. Presses resolve to nothing afterwards.
    pub fn unbind(&mut self) {
        self.bound = false;
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn resolve(&self, event: &KeyEvent) -> Option<Action> {
        if !self.bound {
            return None;
        }
        if *event == self.next_key {
            Some(Action::NextMessage)
        } else if *event == self.prev_key {
            Some(Action::PrevMessage)
        } else {
            None
        }
    }
}

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

fn key_code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambient_bindings() {
        let bindings = KeyBindings::new();

        assert_eq!(bindings.get(&key('/')), Some(Action::Search));
        assert_eq!(bindings.get(&key('q')), Some(Action::Quit));
        assert_eq!(
            bindings.get(&key_code(KeyCode::Tab)),
            Some(Action::NextLabel)
        );
        assert_eq!(bindings.get(&key('x')), None);
    }

    #[test]
    fn test_binder_only_resolves_while_bound() {
        let mut binder = NavBinder::new(&UiConfig::default());

        assert_eq!(binder.resolve(&key('j')), None);

        binder.bind();
        assert!(binder.is_bound());
        assert_eq!(binder.resolve(&key('j')), Some(Action::NextMessage));
        assert_eq!(binder.resolve(&key('k')), Some(Action::PrevMessage));
        assert_eq!(binder.resolve(&key('x')), None);

        binder.unbind();
        assert_eq!(binder.resolve(&key('j')), None);
    }

    #[test]
    fn test_binder_honors_configured_keys() {
        let ui = UiConfig {
            next_message_key: 'n',
            prev_message_key: 'p',
            ..UiConfig::default()
        };
        let mut binder = NavBinder::new(&ui);
        binder.bind();

        assert_eq!(binder.resolve(&key('n')), Some(Action::NextMessage));
        assert_eq!(binder.resolve(&key('p')), Some(Action::PrevMessage));
        assert_eq!(binder.resolve(&key('j')), None);
    }
}
