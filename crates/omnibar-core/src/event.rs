use crossterm::event::{Event, KeyEvent, KeyEventKind};

/// Terminal events delivered to [`Model::on_event`](crate::Model::on_event).
///
/// A reduced view of [`crossterm::event::Event`]: mouse input is not
/// reported, and key releases are dropped during conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    /// A key press (or auto-repeat).
    Key(KeyEvent),
    /// Terminal resized to (columns, rows).
    Resize(u16, u16),
    /// Terminal window gained focus.
    FocusGained,
    /// Terminal window lost focus.
    FocusLost,
    /// Bracketed paste content.
    Paste(String),
}

impl TerminalEvent {
    /// Convert a crossterm event, dropping the ones the runtime does not
    /// deliver (mouse input and key releases).
    pub fn from_crossterm(event: Event) -> Option<Self> {
        match event {
            Event::Key(k) if k.kind != KeyEventKind::Release => Some(TerminalEvent::Key(k)),
            Event::Key(_) | Event::Mouse(_) => None,
            Event::Resize(w, h) => Some(TerminalEvent::Resize(w, h)),
            Event::FocusGained => Some(TerminalEvent::FocusGained),
            Event::FocusLost => Some(TerminalEvent::FocusLost),
            Event::Paste(s) => Some(TerminalEvent::Paste(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    fn key(kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn key_releases_are_dropped() {
        assert!(matches!(
            TerminalEvent::from_crossterm(Event::Key(key(KeyEventKind::Press))),
            Some(TerminalEvent::Key(_))
        ));
        assert_eq!(
            TerminalEvent::from_crossterm(Event::Key(key(KeyEventKind::Release))),
            None
        );
        assert!(TerminalEvent::from_crossterm(Event::Key(key(KeyEventKind::Repeat))).is_some());
    }

    #[test]
    fn focus_and_paste_pass_through() {
        assert_eq!(
            TerminalEvent::from_crossterm(Event::FocusLost),
            Some(TerminalEvent::FocusLost)
        );
        assert_eq!(
            TerminalEvent::from_crossterm(Event::Paste("x".into())),
            Some(TerminalEvent::Paste("x".into()))
        );
    }
}
