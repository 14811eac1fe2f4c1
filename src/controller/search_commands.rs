use crate::controller::command_types::{Command, Mode};
use crate::controller::key_handler::KeyHandler;
use crate::controller::shared_state::{
    ModeController, ModeTransition, PendingConfirm, SharedEditorState,
};
use crate::document_model::SearchState;
use crossterm::event::KeyEvent;
use log::debug;

pub const FIND_PROMPT: &str = "Find: ";

/// Search command handlers - controller logic for search operations
pub struct SearchCommands;

impl SearchCommands {
    /// Runs `pattern` over the current document and jumps to the first match.
    pub fn update_pattern(shared: &mut SharedEditorState, pattern: &str) {
        let buffer = shared.buffer_manager.current_mut();
        let text = buffer.document.get_full_text();
        shared.search_state.set_pattern(pattern, &text);
        if let Some(offset) = shared.search_state.current() {
            buffer.cursor = offset;
        }
        debug!(
            "find {pattern:?}: {} matches",
            shared.search_state.match_count()
        );
        shared.status_message = Self::describe(&shared.search_state);
    }

    /// Execute next search (Enter, Ctrl+G)
    pub fn next(shared: &mut SharedEditorState) {
        match shared.search_state.next() {
            Some(offset) => {
                shared.buffer_manager.current_mut().cursor = offset;
                shared.status_message = Self::describe(&shared.search_state);
            }
            None => shared.status_message = Self::not_found(&shared.search_state),
        }
    }

    /// Execute previous search (Shift+Enter, Ctrl+R)
    pub fn previous(shared: &mut SharedEditorState) {
        match shared.search_state.previous() {
            Some(offset) => {
                shared.buffer_manager.current_mut().cursor = offset;
                shared.status_message = Self::describe(&shared.search_state);
            }
            None => shared.status_message = Self::not_found(&shared.search_state),
        }
    }

    /// Find bar text: the pattern plus the selected match out of the total.
    pub fn describe(search_state: &SearchState) -> String {
        match search_state.current_match {
            Some(index) => format!(
                "{FIND_PROMPT}{}  [{}/{}]",
                search_state.pattern,
                index + 1,
                search_state.match_count()
            ),
            None if search_state.pattern.is_empty() => FIND_PROMPT.to_string(),
            None => format!("{FIND_PROMPT}{}  [no matches]", search_state.pattern),
        }
    }

    fn not_found(search_state: &SearchState) -> String {
        if search_state.pattern.is_empty() {
            "No search pattern".to_string()
        } else {
            format!("Pattern not found: {}", search_state.pattern)
        }
    }
}

/// Find bar: edits the pattern live and walks through matches.
pub struct FindController;

impl FindController {
    pub fn new() -> Self {
        Self
    }

    /// Opens the find bar on the existing pattern.
    pub fn begin(&mut self, shared: &mut SharedEditorState) {
        let pattern = shared.search_state.pattern.clone();
        Self::update(shared, &pattern);
    }

    fn update(shared: &mut SharedEditorState, pattern: &str) {
        SearchCommands::update_pattern(shared, pattern);
    }
}

impl Default for FindController {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeController for FindController {
    fn handle_key(
        &mut self,
        key_event: KeyEvent,
        shared: &mut SharedEditorState,
    ) -> ModeTransition {
        let Some(command) = KeyHandler::parse_key(&Mode::Find, &key_event) else {
            return ModeTransition::Stay;
        };

        shared.cancel_other_confirm(&command);

        match command {
            Command::PromptChar(c) => {
                let mut pattern = shared.search_state.pattern.clone();
                pattern.push(c);
                Self::update(shared, &pattern);
            }
            Command::PromptBackspace => {
                let mut pattern = shared.search_state.pattern.clone();
                pattern.pop();
                Self::update(shared, &pattern);
            }
            Command::NextMatch => SearchCommands::next(shared),
            Command::PreviousMatch => SearchCommands::previous(shared),
            Command::PromptCancel => {
                shared.status_message.clear();
                return ModeTransition::ToMode(Mode::Edit);
            }
            Command::Quit => {
                let unsaved = shared.any_modified();
                if shared.confirm(PendingConfirm::Quit, unsaved) {
                    return ModeTransition::Quit;
                }
            }
            _ => {}
        }
        ModeTransition::Stay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::BufferManager;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn shared_with(text: &str) -> SharedEditorState {
        let mut manager = BufferManager::new();
        manager.current_document_mut().replace_full_text(text);
        SharedEditorState::new(manager)
    }

    fn press(controller: &mut FindController, shared: &mut SharedEditorState, code: KeyCode) {
        controller.handle_key(KeyEvent::new(code, KeyModifiers::NONE), shared);
    }

    #[test]
    fn test_live_pattern_moves_cursor() {
        let mut shared = shared_with("one two one");
        let mut find = FindController::new();
        find.begin(&mut shared);
        assert_eq!(shared.status_message, "Find: ");

        for c in "one".chars() {
            press(&mut find, &mut shared, KeyCode::Char(c));
        }
        assert_eq!(shared.search_state.matches, vec![0, 8]);
        assert_eq!(shared.buffer_manager.current().cursor, 0);
        assert_eq!(shared.status_message, "Find: one  [1/2]");

        press(&mut find, &mut shared, KeyCode::Enter);
        assert_eq!(shared.buffer_manager.current().cursor, 8);
        press(&mut find, &mut shared, KeyCode::Enter);
        assert_eq!(shared.buffer_manager.current().cursor, 0);
        press(&mut find, &mut shared, KeyCode::Up);
        assert_eq!(shared.buffer_manager.current().cursor, 8);
        assert_eq!(shared.status_message, "Find: one  [2/2]");
    }

    #[test]
    fn test_no_matches() {
        let mut shared = shared_with("abc");
        let mut find = FindController::new();
        press(&mut find, &mut shared, KeyCode::Char('z'));
        assert_eq!(shared.status_message, "Find: z  [no matches]");

        SearchCommands::next(&mut shared);
        assert_eq!(shared.status_message, "Pattern not found: z");

        press(&mut find, &mut shared, KeyCode::Backspace);
        SearchCommands::next(&mut shared);
        assert_eq!(shared.status_message, "No search pattern");
    }

    #[test]
    fn test_escape_returns_to_edit_mode() {
        let mut shared = shared_with("abc");
        let mut find = FindController::new();
        let transition = find.handle_key(
            KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
            &mut shared,
        );
        assert_eq!(transition, ModeTransition::ToMode(Mode::Edit));
    }
}
