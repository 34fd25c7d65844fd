//! View state for the catalog screens.

pub mod form;
pub mod list;

pub use form::{EntityForm, FormAction, FormField};
pub use list::{Command, ListMsg, ListState};
