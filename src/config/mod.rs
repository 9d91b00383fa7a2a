//! Configuration types.
//!
//! This module provides:
//! - `OpenOptions`: Options for a single `open`/`read` call
//! - `ReaderConfig`: Serializable configuration that builds `OpenOptions`

mod options;
mod reader;

pub use options::{DataPredicate, OpenOptions};
pub use reader::ReaderConfig;
