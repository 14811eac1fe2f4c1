use crate::controller::command_types::{Command, Mode};
use crate::document_model::SearchState;
use crate::view::{BufferManager, View};
use crossterm::event::KeyEvent;

/// Actions that discard unsaved work: the first press only warns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingConfirm {
    Quit,
    Close,
    New,
    Open,
}

impl PendingConfirm {
    pub fn for_command(command: &Command) -> Option<Self> {
        match command {
            Command::Quit => Some(Self::Quit),
            Command::CloseBuffer => Some(Self::Close),
            Command::NewDocument => Some(Self::New),
            Command::OpenFile => Some(Self::Open),
            _ => None,
        }
    }

    fn warning(self) -> &'static str {
        match self {
            Self::Quit => "Unsaved changes: press Ctrl+Q again to quit",
            Self::Close => "Unsaved changes: press Ctrl+W again to close",
            Self::New => "Unsaved changes: press Ctrl+N again to discard them",
            Self::Open => "Unsaved changes: press Ctrl+O again to open another file",
        }
    }
}

/// Shared state that all mode controllers need access to
pub struct SharedEditorState {
    pub buffer_manager: BufferManager,
    pub view: View,
    pub search_state: SearchState,
    pub status_message: String,
    pub auto_pairs: bool,
    pub pending_confirm: Option<PendingConfirm>,
}

impl SharedEditorState {
    pub fn new(buffer_manager: BufferManager) -> Self {
        Self {
            buffer_manager,
            view: View::new(),
            search_state: SearchState::default(),
            status_message: String::new(),
            auto_pairs: true,
            pending_confirm: None,
        }
    }

    /// Re-runs the active search after the current document changed.
    pub fn refresh_search(&mut self) {
        if self.search_state.pattern.is_empty() {
            return;
        }
        let text = self.buffer_manager.current_document().get_full_text();
        self.search_state.refresh(&text);
    }

    /// Drops a pending confirmation unless `command` repeats it.
    pub fn cancel_other_confirm(&mut self, command: &Command) {
        if PendingConfirm::for_command(command) != self.pending_confirm {
            self.pending_confirm = None;
        }
    }

    /// Returns true once `action` may go ahead. With unsaved changes the
    /// first request only sets a warning.
    pub fn confirm(&mut self, action: PendingConfirm, unsaved: bool) -> bool {
        if !unsaved || self.pending_confirm == Some(action) {
            self.pending_confirm = None;
            return true;
        }
        self.pending_confirm = Some(action);
        self.status_message = action.warning().to_string();
        false
    }

    pub fn current_modified(&self) -> bool {
        self.buffer_manager.current_document().is_modified()
    }

    pub fn any_modified(&self) -> bool {
        self.buffer_manager
            .iter()
            .any(|buffer| buffer.document.is_modified())
    }
}

/// Result of handling a key event in a mode controller
#[derive(Debug, PartialEq)]
pub enum ModeTransition {
    Stay,
    ToMode(Mode),
    Quit,
}

/// Trait that all mode controllers must implement
pub trait ModeController {
    fn handle_key(&mut self, key_event: KeyEvent, shared: &mut SharedEditorState)
    -> ModeTransition;
}
