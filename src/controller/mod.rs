//! Controller subsystem - Handles all user input and command execution
//!
//! Each mode has its own controller; `EditorController` owns the terminal
//! session and routes key events to whichever mode has focus.

pub mod command_types;
pub mod editor;
pub mod insert;
pub mod key_handler;
pub mod prompt;
pub mod search_commands;
pub mod shared_state;

// Re-export public interface
pub use command_types::{Command, Mode, PromptKind};
pub use editor::EditorController;
pub use shared_state::{ModeController, ModeTransition, SharedEditorState};
