//! Utility functions for common operations.
//!
//! - **Text processing**: HTML to plain text conversion and terminal
//!   control-character removal for text taken from remote feeds, and
//!   width-aware truncation for list rows
//! - **URL validation**: scheme checks for feed sources and browser links
//! - **Task helpers**: panic capture for spawned background work

mod task;
mod text;
mod url_validator;

pub use task::catch_task_panic;
pub use text::{html_to_text, strip_control_chars, truncate_to_width};
pub use url_validator::{validate_source_url, validate_url_for_open, UrlValidationError};
