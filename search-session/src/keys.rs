use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;

/// Input understood by [`crate::SearchSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKey {
    Char(char),
    Backspace,
    Enter,
    Up,
    Down,
    Escape,
    /// Recall the next older committed query.
    HistoryPrev,
    /// Recall the next newer committed query, then the draft.
    HistoryNext,
    AcceptSuggestion,
}

impl SessionKey {
    /// Maps a terminal key event; releases and unbound chords yield `None`.
    pub fn from_key_event(event: &KeyEvent) -> Option<Self> {
        if event.kind == KeyEventKind::Release {
            return None;
        }
        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
        let alt = event.modifiers.contains(KeyModifiers::ALT);
        match (event.code, ctrl) {
            (KeyCode::Up, _) | (KeyCode::Char('p'), true) => Some(SessionKey::Up),
            (KeyCode::Down, _) | (KeyCode::Char('n'), true) => Some(SessionKey::Down),
            (KeyCode::PageUp, _) => Some(SessionKey::HistoryPrev),
            (KeyCode::PageDown, _) => Some(SessionKey::HistoryNext),
            (KeyCode::Tab, _) => Some(SessionKey::AcceptSuggestion),
            (KeyCode::Enter, _) => Some(SessionKey::Enter),
            (KeyCode::Esc, _) => Some(SessionKey::Escape),
            (KeyCode::Backspace, _) => Some(SessionKey::Backspace),
            (KeyCode::Char(ch), false) if !alt => Some(SessionKey::Char(ch)),
            _ => None,
        }
    }
}
