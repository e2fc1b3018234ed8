use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    Cancel,
    NextField,
    PrevField,
    Submit,
    Save,
    AddRow,
    RemoveRow,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    NextPage,
    PrevPage,
    Input(char),
    None,
}

/// Maps a key press to an action. Plain characters always arrive as
/// [`AppAction::Input`]; the screen decides whether they are text or a
/// shortcut.
pub fn map_key(key: KeyEvent) -> AppAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => AppAction::Quit,
            KeyCode::Char('s') => AppAction::Save,
            KeyCode::Char('a') => AppAction::AddRow,
            KeyCode::Char('d') => AppAction::RemoveRow,
            _ => AppAction::None,
        };
    }

    match key.code {
        KeyCode::Esc => AppAction::Cancel,
        KeyCode::Tab => AppAction::NextField,
        KeyCode::BackTab => AppAction::PrevField,
        KeyCode::Enter => AppAction::Submit,
        KeyCode::Backspace => AppAction::Backspace,
        KeyCode::Up => AppAction::Up,
        KeyCode::Down => AppAction::Down,
        KeyCode::Left => AppAction::Left,
        KeyCode::Right => AppAction::Right,
        KeyCode::PageDown => AppAction::NextPage,
        KeyCode::PageUp => AppAction::PrevPage,
        KeyCode::Char(ch) => AppAction::Input(ch),
        _ => AppAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    #[test]
    fn control_chords_map_to_commands() {
        assert_eq!(map_key(ctrl('c')), AppAction::Quit);
        assert_eq!(map_key(ctrl('s')), AppAction::Save);
        assert_eq!(map_key(ctrl('a')), AppAction::AddRow);
        assert_eq!(map_key(ctrl('d')), AppAction::RemoveRow);
        assert_eq!(map_key(ctrl('x')), AppAction::None);
    }

    #[test]
    fn plain_letters_stay_text() {
        assert_eq!(map_key(key(KeyCode::Char('q'))), AppAction::Input('q'));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::SHIFT)),
            AppAction::Input('Q')
        );
    }

    #[test]
    fn navigation_keys() {
        assert_eq!(map_key(key(KeyCode::BackTab)), AppAction::PrevField);
        assert_eq!(map_key(key(KeyCode::PageDown)), AppAction::NextPage);
        assert_eq!(map_key(key(KeyCode::PageUp)), AppAction::PrevPage);
        assert_eq!(map_key(key(KeyCode::Esc)), AppAction::Cancel);
    }
}
