use crate::controller::command_types::{Command, Mode, PromptKind};
use crate::controller::key_handler::KeyHandler;
use crate::controller::shared_state::{ModeController, ModeTransition, SharedEditorState};
use crossterm::event::KeyEvent;
use std::path::PathBuf;

/// One-line path entry for Open and Save As.
pub struct PromptController {
    kind: PromptKind,
    pub input: String,
}

impl PromptController {
    pub fn new() -> Self {
        Self {
            kind: PromptKind::Open,
            input: String::new(),
        }
    }

    /// Starts a prompt. Save As is prefilled with the current file name.
    pub fn begin(&mut self, kind: PromptKind, shared: &SharedEditorState) {
        self.kind = kind;
        self.input = match kind {
            PromptKind::Open => String::new(),
            PromptKind::SaveAs => shared
                .buffer_manager
                .current_document()
                .filename
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        };
    }

    pub fn label(&self) -> &'static str {
        match self.kind {
            PromptKind::Open => "Open file: ",
            PromptKind::SaveAs => "Save as: ",
        }
    }

    pub fn status_line(&self) -> String {
        format!("{}{}", self.label(), self.input)
    }

    fn accept(&mut self, shared: &mut SharedEditorState) {
        let input = self.input.trim();
        if input.is_empty() {
            shared.status_message = "No file name".to_string();
            return;
        }
        let path = PathBuf::from(input);

        match self.kind {
            PromptKind::Open => {
                let buffer = shared.buffer_manager.current_mut();
                match buffer.document.load(&path) {
                    Ok(bytes) => {
                        buffer.cursor = 0;
                        shared.status_message =
                            format!("\"{}\" {bytes}B read", buffer.document.display_name());
                        shared.view.reset_scroll();
                        shared.refresh_search();
                    }
                    // The current document is left untouched.
                    Err(err) => shared.status_message = format!("Error: {err}"),
                }
            }
            PromptKind::SaveAs => {
                let doc = shared.buffer_manager.current_document_mut();
                shared.status_message = match doc.save_as(path) {
                    Ok(bytes) => format!("\"{}\" {bytes}B written", doc.display_name()),
                    Err(err) => format!("Error: {err}"),
                };
            }
        }
    }
}

impl Default for PromptController {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeController for PromptController {
    fn handle_key(
        &mut self,
        key_event: KeyEvent,
        shared: &mut SharedEditorState,
    ) -> ModeTransition {
        let Some(command) = KeyHandler::parse_key(&Mode::Prompt(self.kind), &key_event) else {
            return ModeTransition::Stay;
        };

        match command {
            Command::PromptChar(c) => self.input.push(c),
            Command::PromptBackspace => {
                self.input.pop();
            }
            Command::PromptAccept => {
                self.accept(shared);
                self.input.clear();
                return ModeTransition::ToMode(Mode::Edit);
            }
            Command::PromptCancel => {
                self.input.clear();
                shared.status_message.clear();
                return ModeTransition::ToMode(Mode::Edit);
            }
            _ => {}
        }
        ModeTransition::Stay
    }
}
