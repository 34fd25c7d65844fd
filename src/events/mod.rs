//! Event handling for the application.
//!
//! This module turns terminal input into application events and maps keys
//! to list view actions.

mod handler;
mod keys;

use crossterm::event::KeyEvent;

pub use handler::EventHandler;
pub use keys::{
    get_context_hints, get_keybindings_grouped, map_list_key, KeyAction, KeyContext, Keybinding,
};

/// Events consumed by [`crate::app::App::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// Nothing happened within the tick rate.
    Tick,
    /// Leave the application.
    Quit,
}
