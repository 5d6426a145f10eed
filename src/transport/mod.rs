//! Output helpers for generated datasets.

/// JSON Lines file writer.
pub mod fs;
