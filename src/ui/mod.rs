//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling per screen
//! - `events` - Background task event processing
//! - `render` - Screen rendering dispatch
//! - `landing` - Hero, trending list and footer
//! - `login` - Sign-in form
//! - `home` - Feed tabs, genre bar and the infinite list
//! - `status` - Status bar widget
//! - `help` - Keybinding overlay

mod events;
mod help;
mod home;
mod input;
mod landing;
mod login;
mod loop_runner;
mod render;
mod status;

pub use events::handle_app_event;
pub use input::handle_input;
pub use loop_runner::{run, Action};
