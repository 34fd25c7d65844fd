//! User interface rendering.
//!
//! Every function here reads state and draws it; none of them change state.

mod dialog;
mod help;
mod help_bar;
mod input;
mod table;

pub use dialog::{centered_rect, render_alert, render_form};
pub use help::render_help;
pub use help_bar::render_context_help;
pub use input::TextInput;
pub use table::{pagination_label, render_list};
