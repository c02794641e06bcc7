//! Terminal user interface.
//!
//! - `loop_runner` - main event loop and terminal management
//! - `input` - keyboard dispatch to the modal or the focused list
//! - `events` - refresh completion handling
//! - `render` - layout and the panes it draws

mod entries;
mod events;
mod feeds;
mod helpers;
mod input;
mod loop_runner;
mod modal;
mod render;
mod status;

pub use events::handle_app_event;
pub use input::handle_key;
pub use loop_runner::{run, Action};
