use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

/// What a terminal event asks the game to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Space or a tap (mouse press).
    Jump,
    /// The start / try-again button.
    Start,
    Quit,
    Resize { cols: u16, rows: u16 },
}

/// Map one event to at most one action. Key repeats and releases are
/// dropped so a held key flaps once.
pub fn map_event(event: &Event) -> Option<Action> {
    match event {
        Event::Key(key) => map_key(key),
        Event::Mouse(mouse) => map_mouse(mouse),
        Event::Resize(cols, rows) => Some(Action::Resize {
            cols: *cols,
            rows: *rows,
        }),
        _ => None,
    }
}

fn map_key(key: &KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(' ') => Some(Action::Jump),
        KeyCode::Enter => Some(Action::Start),
        _ => None,
    }
}

fn map_mouse(mouse: &MouseEvent) -> Option<Action> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Action::Jump),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    fn mouse(kind: MouseEventKind) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_space_jumps_once() {
        assert_eq!(
            map_event(&key(KeyCode::Char(' '), KeyEventKind::Press)),
            Some(Action::Jump)
        );
        assert_eq!(map_event(&key(KeyCode::Char(' '), KeyEventKind::Repeat)), None);
        assert_eq!(map_event(&key(KeyCode::Char(' '), KeyEventKind::Release)), None);
    }

    #[test]
    fn test_tap_jumps() {
        assert_eq!(
            map_event(&mouse(MouseEventKind::Down(MouseButton::Left))),
            Some(Action::Jump)
        );
        assert_eq!(map_event(&mouse(MouseEventKind::Up(MouseButton::Left))), None);
        assert_eq!(map_event(&mouse(MouseEventKind::Moved)), None);
    }

    #[test]
    fn test_controls() {
        assert_eq!(
            map_event(&key(KeyCode::Enter, KeyEventKind::Press)),
            Some(Action::Start)
        );
        assert_eq!(
            map_event(&key(KeyCode::Esc, KeyEventKind::Press)),
            Some(Action::Quit)
        );
        assert_eq!(
            map_event(&key(KeyCode::Char('q'), KeyEventKind::Press)),
            Some(Action::Quit)
        );
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(map_event(&ctrl_c), Some(Action::Quit));
        assert_eq!(map_event(&key(KeyCode::Up, KeyEventKind::Press)), None);
        assert_eq!(
            map_event(&Event::Resize(80, 24)),
            Some(Action::Resize { cols: 80, rows: 24 })
        );
    }
}
