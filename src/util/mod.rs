//! Utility functions shared by the catalog client and the UI.
//!
//! - **Text**: terminal-safe sanitizing and width-aware truncation
//! - **URLs**: validation before handing a poster URL to the system browser
//! - **Tasks**: panic capture for spawned background work

mod task;
mod text;
mod url_check;

pub use task::catch_task_panic;
pub use text::{display_width, strip_control_chars, truncate_to_width};
pub use url_check::{validate_url_for_open, UrlCheckError};
