//! Document model subsystem - piece table, search, undo history and brackets
//!
//! Everything here is independent of the terminal: the controller and view
//! call into these types and never the other way around.

pub mod brackets;
pub mod document;
pub mod movement;
pub mod piece_table;
pub mod search_state;
pub mod undo;

// Re-export main types for convenience
pub use brackets::{BracketKind, BracketMatch, PALETTE_LEVELS};
pub use document::{Document, DocumentError};
pub use movement::{first_difference, floor_char_boundary};
pub use piece_table::{BufferKind, EditError, PieceTable, Span};
pub use search_state::{SearchOptions, SearchState, kmp_search};
pub use undo::{DEFAULT_MAX_SNAPSHOTS, UndoHistory};
