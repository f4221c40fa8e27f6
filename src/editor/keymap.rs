use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditCommand {
    Insert(String),
    Newline,
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    KillToLineStart,
    HistoryPrevious,
    HistoryNext,
    Undo,
    Redo,
    Complete,
    Submit,
    Interrupt,
    EndOfInput,
}

/// Ctrl-D only ends input on an empty buffer; otherwise it deletes forward.
pub fn command_for_key(key: KeyEvent, buffer_empty: bool) -> Option<EditCommand> {
    let control = key.modifiers.contains(KeyModifiers::CONTROL);
    let command = match key.code {
        KeyCode::Char('c') if control => EditCommand::Interrupt,
        KeyCode::Char('d') if control => {
            if buffer_empty {
                EditCommand::EndOfInput
            } else {
                EditCommand::Delete
            }
        }
        KeyCode::Char('j') if control => EditCommand::Newline,
        KeyCode::Char('a') if control => EditCommand::Home,
        KeyCode::Char('e') if control => EditCommand::End,
        KeyCode::Char('u') if control => EditCommand::KillToLineStart,
        KeyCode::Char('z') if control => EditCommand::Undo,
        KeyCode::Char('y') if control => EditCommand::Redo,
        KeyCode::Enter
            if key.modifiers.contains(KeyModifiers::SHIFT)
                || key.modifiers.contains(KeyModifiers::ALT) =>
        {
            EditCommand::Newline
        }
        KeyCode::Enter => EditCommand::Submit,
        KeyCode::Tab => EditCommand::Complete,
        KeyCode::Backspace => EditCommand::Backspace,
        KeyCode::Delete => EditCommand::Delete,
        KeyCode::Left => EditCommand::Left,
        KeyCode::Right => EditCommand::Right,
        KeyCode::Home => EditCommand::Home,
        KeyCode::End => EditCommand::End,
        KeyCode::Up => EditCommand::HistoryPrevious,
        KeyCode::Down => EditCommand::HistoryNext,
        KeyCode::Char(ch) if !control && !key.modifiers.contains(KeyModifiers::ALT) => {
            EditCommand::Insert(ch.to_string())
        }
        _ => return None,
    };
    Some(command)
}
