//! Filesystem primitives for persisting merge output.
//!
//! - [`backup`] — numbered backup chains and their retention window
//! - [`safe_write`] — [`SafeWriter`], the only code that replaces destination files
//! - [`fs`] — directory creation and temporary-file placement helpers
pub mod backup;
pub mod fs;
pub mod safe_write;

pub use backup::{BackupChain, Rotation};
pub use safe_write::{SafeWriter, WriteOutcome};
