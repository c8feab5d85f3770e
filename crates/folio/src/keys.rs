//! Keyboard shortcuts for the interactive session.

use console::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Toggle,
    Light,
    Dark,
    FollowSystem,
    Quit,
}

/// Maps a key press to an action.
///
/// `t` toggles, as does `†`, which is what Option+T types on macOS layouts.
pub fn action_for_key(key: &Key) -> Option<Action> {
    match key {
        Key::Char('t') | Key::Char('T') | Key::Char('†') => Some(Action::Toggle),
        Key::Char('l') | Key::Char('L') => Some(Action::Light),
        Key::Char('d') | Key::Char('D') => Some(Action::Dark),
        Key::Char('s') | Key::Char('S') => Some(Action::FollowSystem),
        Key::Char('q') | Key::Char('Q') | Key::Escape => Some(Action::Quit),
        _ => None,
    }
}

pub const HELP: &str = "t toggle  l light  d dark  s follow system  q quit";
