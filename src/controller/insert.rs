use crate::controller::command_types::{Command, Mode, PromptKind};
use crate::controller::key_handler::KeyHandler;
use crate::controller::search_commands::SearchCommands;
use crate::controller::shared_state::{
    ModeController, ModeTransition, PendingConfirm, SharedEditorState,
};
use crate::document_model::{BracketKind, first_difference};
use crossterm::event::KeyEvent;
use log::{info, warn};

/// Handles every key while the document has focus.
pub struct InsertController;

impl InsertController {
    pub fn new() -> Self {
        Self
    }

    /// Inserts at the cursor and moves the cursor `advance` bytes forward.
    fn insert_text(shared: &mut SharedEditorState, text: &str, advance: usize) {
        let buffer = shared.buffer_manager.current_mut();
        match buffer.document.edit_insert(buffer.cursor, text) {
            Ok(()) => buffer.cursor += advance,
            Err(err) => {
                warn!("insert failed: {err}");
                shared.status_message = format!("Error: {err}");
                return;
            }
        }
        Self::after_edit(shared);
    }

    fn insert_char(shared: &mut SharedEditorState, c: char) {
        let typed = c.to_string();
        match BracketKind::closing_for(c).filter(|_| shared.auto_pairs) {
            Some(close) => {
                let pair = format!("{c}{close}");
                Self::insert_text(shared, &pair, typed.len());
            }
            None => Self::insert_text(shared, &typed, typed.len()),
        }
    }

    fn delete_backward(shared: &mut SharedEditorState) {
        let buffer = shared.buffer_manager.current_mut();
        let Some(c) = buffer.document.char_before(buffer.cursor) else {
            return;
        };
        let start = buffer.cursor - c.len_utf8();
        if let Err(err) = buffer.document.edit_delete(start, c.len_utf8()) {
            shared.status_message = format!("Error: {err}");
            return;
        }
        buffer.cursor = start;
        Self::after_edit(shared);
    }

    fn delete_forward(shared: &mut SharedEditorState) {
        let buffer = shared.buffer_manager.current_mut();
        let Some(c) = buffer.document.char_at(buffer.cursor) else {
            return;
        };
        if let Err(err) = buffer.document.edit_delete(buffer.cursor, c.len_utf8()) {
            shared.status_message = format!("Error: {err}");
            return;
        }
        Self::after_edit(shared);
    }

    fn after_edit(shared: &mut SharedEditorState) {
        shared.refresh_search();
        shared.status_message.clear();
    }

    fn undo(shared: &mut SharedEditorState) {
        let buffer = shared.buffer_manager.current_mut();
        let before = buffer.document.get_full_text();
        match buffer.document.undo() {
            Some(text) => {
                buffer.cursor = first_difference(&before, &text);
                shared.refresh_search();
                shared.status_message = "Undo".to_string();
            }
            None => shared.status_message = "Already at oldest change".to_string(),
        }
    }

    fn redo(shared: &mut SharedEditorState) {
        let buffer = shared.buffer_manager.current_mut();
        let before = buffer.document.get_full_text();
        match buffer.document.redo() {
            Some(text) => {
                buffer.cursor = first_difference(&before, &text);
                shared.refresh_search();
                shared.status_message = "Redo".to_string();
            }
            None => shared.status_message = "Already at newest change".to_string(),
        }
    }

    fn move_cursor(shared: &mut SharedEditorState, command: &Command) {
        let page = shared.view.page_height() as isize;
        let buffer = shared.buffer_manager.current_mut();
        let doc = &mut buffer.document;
        let cursor = buffer.cursor;
        buffer.cursor = match command {
            Command::MoveLeft => doc.move_left(cursor),
            Command::MoveRight => doc.move_right(cursor),
            Command::MoveWordLeft => doc.move_word_backward(cursor),
            Command::MoveWordRight => doc.move_word_forward(cursor),
            Command::MoveUp => doc.move_vertical(cursor, -1),
            Command::MoveDown => doc.move_vertical(cursor, 1),
            Command::MovePageUp => doc.move_vertical(cursor, -page),
            Command::MovePageDown => doc.move_vertical(cursor, page),
            Command::MoveLineStart => doc.move_line_start(cursor),
            Command::MoveLineEnd => doc.move_line_end(cursor),
            Command::MoveDocumentStart => 0,
            Command::MoveDocumentEnd => doc.move_document_end(),
            _ => cursor,
        };
    }

    fn new_document(shared: &mut SharedEditorState) {
        let buffer = shared.buffer_manager.current_mut();
        buffer.document.reset();
        buffer.cursor = 0;
        shared.view.reset_scroll();
        shared.refresh_search();
        shared.status_message = "New document".to_string();
    }

    fn save(shared: &mut SharedEditorState) -> ModeTransition {
        let doc = shared.buffer_manager.current_document_mut();
        if doc.filename.is_none() {
            return ModeTransition::ToMode(Mode::Prompt(PromptKind::SaveAs));
        }
        shared.status_message = match doc.save() {
            Ok(bytes) => format!("\"{}\" {bytes}B written", doc.display_name()),
            Err(err) => format!("Error: {err}"),
        };
        ModeTransition::Stay
    }

    fn switch_buffer(shared: &mut SharedEditorState, forward: bool) {
        if forward {
            shared.buffer_manager.next_buffer();
        } else {
            shared.buffer_manager.previous_buffer();
        }
        shared.view.reset_scroll();
        shared.refresh_search();
        shared.status_message = format!(
            "Buffer {}/{}: \"{}\"",
            shared.buffer_manager.current_buffer_index() + 1,
            shared.buffer_manager.buffer_count(),
            shared.buffer_manager.current_document().display_name()
        );
    }

    fn close_buffer(shared: &mut SharedEditorState) {
        let unsaved = shared.current_modified();
        if !shared.confirm(PendingConfirm::Close, unsaved) {
            return;
        }
        let id = shared.buffer_manager.current().id;
        let name = shared.buffer_manager.current_document().display_name().to_string();
        shared.buffer_manager.close(id);
        shared.view.reset_scroll();
        shared.refresh_search();
        shared.status_message = format!("Closed \"{name}\"");
    }
}

impl Default for InsertController {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeController for InsertController {
    fn handle_key(
        &mut self,
        key_event: KeyEvent,
        shared: &mut SharedEditorState,
    ) -> ModeTransition {
        let Some(command) = KeyHandler::parse_key(&Mode::Edit, &key_event) else {
            return ModeTransition::Stay;
        };

        shared.cancel_other_confirm(&command);

        match command {
            Command::InsertChar(c) => Self::insert_char(shared, c),
            Command::InsertNewline => Self::insert_text(shared, "\n", 1),
            Command::InsertTab => Self::insert_text(shared, "\t", 1),
            Command::DeleteBackward => Self::delete_backward(shared),
            Command::DeleteForward => Self::delete_forward(shared),

            Command::Undo => Self::undo(shared),
            Command::Redo => Self::redo(shared),

            Command::StartFind => return ModeTransition::ToMode(Mode::Find),
            Command::NextMatch => SearchCommands::next(shared),
            Command::PreviousMatch => SearchCommands::previous(shared),

            Command::NewDocument => {
                let unsaved = shared.current_modified();
                if shared.confirm(PendingConfirm::New, unsaved) {
                    Self::new_document(shared);
                }
            }
            Command::OpenFile => {
                let unsaved = shared.current_modified();
                if shared.confirm(PendingConfirm::Open, unsaved) {
                    return ModeTransition::ToMode(Mode::Prompt(PromptKind::Open));
                }
            }
            Command::Save => return Self::save(shared),
            Command::SaveAs => return ModeTransition::ToMode(Mode::Prompt(PromptKind::SaveAs)),
            Command::NextBuffer => Self::switch_buffer(shared, true),
            Command::PreviousBuffer => Self::switch_buffer(shared, false),
            Command::CloseBuffer => Self::close_buffer(shared),

            Command::ToggleLineNumbers => {
                let show = !shared.view.line_numbers_shown();
                shared.view.set_line_numbers(show);
            }
            Command::Redraw => shared.view.force_redraw(),

            Command::Quit => {
                let unsaved = shared.any_modified();
                if shared.confirm(PendingConfirm::Quit, unsaved) {
                    info!("quitting");
                    return ModeTransition::Quit;
                }
            }

            ref movement @ (Command::MoveLeft
            | Command::MoveRight
            | Command::MoveWordLeft
            | Command::MoveWordRight
            | Command::MoveUp
            | Command::MoveDown
            | Command::MoveLineStart
            | Command::MoveLineEnd
            | Command::MoveDocumentStart
            | Command::MoveDocumentEnd
            | Command::MovePageUp
            | Command::MovePageDown) => Self::move_cursor(shared, movement),

            Command::PromptChar(_)
            | Command::PromptBackspace
            | Command::PromptAccept
            | Command::PromptCancel => {}
        }
        ModeTransition::Stay
    }
}
