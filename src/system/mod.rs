//! # System Interaction Layer
//!
//! The boundary between the grammar engine and the filesystem.
//!
//! ## Modules
//!
//! - **`reader`**: Locates, reads and parses command config files. Formats are
//!   chosen by file extension from a closed registry of `ConfigReader`s.

pub mod reader;
