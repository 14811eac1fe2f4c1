//! View subsystem - Independent rendering and display management
//!
//! This module provides a clean abstraction layer for all visual rendering,
//! completely independent of document internals through the ViewModel trait.

pub mod buffer_manager;
pub mod renderer;
pub mod view_model;

// Re-export public interface
pub use buffer_manager::{Buffer, BufferManager, DocumentId};
pub use renderer::{BRACKET_PALETTE, RenderParams, View};
pub use view_model::{BracketHighlight, DocumentViewModel, ViewModel};
