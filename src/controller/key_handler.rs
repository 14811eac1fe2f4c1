use crate::controller::command_types::{Command, Mode};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub struct KeyHandler;

impl KeyHandler {
    pub fn parse_key(mode: &Mode, key_event: &KeyEvent) -> Option<Command> {
        let key = key_event.code;
        let modifiers = key_event.modifiers;

        match mode {
            Mode::Edit => Self::parse_edit_mode_key(key, modifiers),
            Mode::Find => Self::parse_find_mode_key(key, modifiers),
            Mode::Prompt(_) => Self::parse_prompt_key(key, modifiers),
        }
    }

    fn parse_edit_mode_key(key: KeyCode, modifiers: KeyModifiers) -> Option<Command> {
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);
        let alt = modifiers.contains(KeyModifiers::ALT);

        match key {
            // Control bindings first (more specific)
            KeyCode::Char('q') if ctrl => Some(Command::Quit),
            KeyCode::Char('z') if ctrl => Some(Command::Undo),
            KeyCode::Char('y') if ctrl => Some(Command::Redo),
            KeyCode::Char('f') if ctrl => Some(Command::StartFind),
            KeyCode::Char('g') if ctrl => Some(Command::NextMatch),
            KeyCode::Char('r') if ctrl => Some(Command::PreviousMatch),
            KeyCode::Char('n') if ctrl => Some(Command::NewDocument),
            KeyCode::Char('o') if ctrl => Some(Command::OpenFile),
            KeyCode::Char('s') if ctrl => Some(Command::Save),
            KeyCode::Char('w') if ctrl => Some(Command::CloseBuffer),
            KeyCode::Char('t') if ctrl => Some(Command::ToggleLineNumbers),
            KeyCode::Char('l') if ctrl => Some(Command::Redraw),
            KeyCode::Char('s') if alt => Some(Command::SaveAs),
            KeyCode::PageDown if ctrl => Some(Command::NextBuffer),
            KeyCode::PageUp if ctrl => Some(Command::PreviousBuffer),
            KeyCode::Left if ctrl => Some(Command::MoveWordLeft),
            KeyCode::Right if ctrl => Some(Command::MoveWordRight),
            KeyCode::Home if ctrl => Some(Command::MoveDocumentStart),
            KeyCode::End if ctrl => Some(Command::MoveDocumentEnd),
            KeyCode::F(3) if modifiers.contains(KeyModifiers::SHIFT) => {
                Some(Command::PreviousMatch)
            }
            KeyCode::F(3) => Some(Command::NextMatch),

            // Unbound control/alt chords are ignored rather than typed
            KeyCode::Char(_) if ctrl || alt => None,
            KeyCode::Char(c) => Some(Command::InsertChar(c)),
            KeyCode::Enter => Some(Command::InsertNewline),
            KeyCode::Tab => Some(Command::InsertTab),
            KeyCode::Backspace => Some(Command::DeleteBackward),
            KeyCode::Delete => Some(Command::DeleteForward),

            KeyCode::Left => Some(Command::MoveLeft),
            KeyCode::Right => Some(Command::MoveRight),
            KeyCode::Up => Some(Command::MoveUp),
            KeyCode::Down => Some(Command::MoveDown),
            KeyCode::Home => Some(Command::MoveLineStart),
            KeyCode::End => Some(Command::MoveLineEnd),
            KeyCode::PageUp => Some(Command::MovePageUp),
            KeyCode::PageDown => Some(Command::MovePageDown),
            _ => None,
        }
    }

    fn parse_find_mode_key(key: KeyCode, modifiers: KeyModifiers) -> Option<Command> {
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);
        let shift = modifiers.contains(KeyModifiers::SHIFT);

        match key {
            KeyCode::Char('g') if ctrl => Some(Command::NextMatch),
            KeyCode::Char('r') if ctrl => Some(Command::PreviousMatch),
            KeyCode::Char('q') if ctrl => Some(Command::Quit),
            KeyCode::Enter | KeyCode::F(3) if shift => Some(Command::PreviousMatch),
            KeyCode::Enter | KeyCode::Down | KeyCode::F(3) => Some(Command::NextMatch),
            KeyCode::Up => Some(Command::PreviousMatch),
            KeyCode::Esc => Some(Command::PromptCancel),
            _ => Self::parse_prompt_key(key, modifiers),
        }
    }

    fn parse_prompt_key(key: KeyCode, modifiers: KeyModifiers) -> Option<Command> {
        match key {
            KeyCode::Char(_) if modifiers.contains(KeyModifiers::CONTROL) => None,
            KeyCode::Char(c) => Some(Command::PromptChar(c)),
            KeyCode::Backspace => Some(Command::PromptBackspace),
            KeyCode::Enter => Some(Command::PromptAccept),
            KeyCode::Esc => Some(Command::PromptCancel),
            _ => None,
        }
    }
}
