//! Configuration subsystem - Editor settings and preferences
//!
//! This module handles loading configuration from .pieceeditrc files; command
//! line flags are layered on top by the binary.

pub mod rc;

// Re-export public interface
pub use rc::{RcConfig, RcLoader};
