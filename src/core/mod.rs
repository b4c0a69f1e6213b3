//! Core module - shared types, errors, paths and filesystem helpers

pub mod archive;
mod error;
pub mod http;
pub mod paths;
pub mod privilege;
pub mod safe_ops;
pub mod testing;
mod types;

pub use archive::{extract_auto_strip, extract_tar_gz_strip, extract_zip_strip};
pub use error::{JvError, Result, format_error_with_suggestion};
pub use privilege::{is_privileged, is_root};
pub use types::*;
