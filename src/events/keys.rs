//! Key binding definitions.
//!
//! The list view keys are mapped here so the help panel, the hint bar and
//! the key handler all read from the same table.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Where a key binding applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyContext {
    /// Bindings available everywhere.
    Global,
    /// The record table.
    List,
    /// Typing into the filter box.
    Filter,
    /// The add/edit dialog.
    Form,
    /// The blocking alert dialog.
    Alert,
}

impl KeyContext {
    /// Section title in the help panel.
    pub fn display(&self) -> &'static str {
        match self {
            KeyContext::Global => "Global",
            KeyContext::List => "Table",
            KeyContext::Filter => "Filter",
            KeyContext::Form => "Add / Edit",
            KeyContext::Alert => "Alert",
        }
    }
}

/// One entry in the help panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybinding {
    /// Key label.
    pub key: &'static str,
    /// What the key does.
    pub description: &'static str,
    /// Where it applies.
    pub context: KeyContext,
}

impl Keybinding {
    const fn new(key: &'static str, description: &'static str, context: KeyContext) -> Self {
        Self {
            key,
            description,
            context,
        }
    }
}

/// Actions the record table responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    ToggleHelp,
    NextResource,
    Refresh,
    MoveDown,
    MoveUp,
    PrevPage,
    NextPage,
    GrowPage,
    ShrinkPage,
    ToggleSelected,
    ToggleSelectAll,
    StartFilter,
    ClearFilter,
    CycleSort,
    OpenCreate,
    OpenEdit,
    DeleteRow,
    DeleteSelected,
}

/// Map a key pressed on the record table to an action.
pub fn map_list_key(key: KeyEvent) -> Option<KeyAction> {
    // Shifted letters arrive as uppercase with or without the SHIFT flag.
    let modifiers = key.modifiers.difference(KeyModifiers::SHIFT);
    if !modifiers.is_empty() {
        return None;
    }

    let action = match key.code {
        KeyCode::Char('q') => KeyAction::Quit,
        KeyCode::Char('?') => KeyAction::ToggleHelp,
        KeyCode::Tab => KeyAction::NextResource,
        KeyCode::Char('r') => KeyAction::Refresh,
        KeyCode::Char('j') | KeyCode::Down => KeyAction::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => KeyAction::MoveUp,
        KeyCode::Char('h') | KeyCode::Left => KeyAction::PrevPage,
        KeyCode::Char('l') | KeyCode::Right => KeyAction::NextPage,
        KeyCode::Char('+') | KeyCode::Char('=') => KeyAction::GrowPage,
        KeyCode::Char('-') => KeyAction::ShrinkPage,
        KeyCode::Char(' ') => KeyAction::ToggleSelected,
        KeyCode::Char('a') => KeyAction::ToggleSelectAll,
        KeyCode::Char('/') => KeyAction::StartFilter,
        KeyCode::Esc => KeyAction::ClearFilter,
        KeyCode::Char('s') => KeyAction::CycleSort,
        KeyCode::Char('n') => KeyAction::OpenCreate,
        KeyCode::Char('e') | KeyCode::Enter => KeyAction::OpenEdit,
        KeyCode::Char('d') => KeyAction::DeleteRow,
        KeyCode::Char('D') => KeyAction::DeleteSelected,
        _ => return None,
    };
    Some(action)
}

const KEYBINDINGS: &[Keybinding] = &[
    Keybinding::new("q / Ctrl+C", "Quit", KeyContext::Global),
    Keybinding::new("?", "Toggle this help", KeyContext::Global),
    Keybinding::new("Tab", "Switch between categories and products", KeyContext::Global),
    Keybinding::new("r", "Reload from the backend", KeyContext::Global),
    Keybinding::new("j / ↓", "Move down", KeyContext::List),
    Keybinding::new("k / ↑", "Move up", KeyContext::List),
    Keybinding::new("h / ←", "Previous page", KeyContext::List),
    Keybinding::new("l / →", "Next page", KeyContext::List),
    Keybinding::new("+ / -", "More or fewer rows per page", KeyContext::List),
    Keybinding::new("Space", "Select row", KeyContext::List),
    Keybinding::new("a", "Select all / clear selection", KeyContext::List),
    Keybinding::new("/", "Filter by name", KeyContext::List),
    Keybinding::new("Esc", "Clear the filter", KeyContext::List),
    Keybinding::new("s", "Cycle sort column and direction", KeyContext::List),
    Keybinding::new("n", "Add a record", KeyContext::List),
    Keybinding::new("e / Enter", "Edit the highlighted record", KeyContext::List),
    Keybinding::new("d", "Delete the highlighted record", KeyContext::List),
    Keybinding::new("D", "Delete the selected records", KeyContext::List),
    Keybinding::new("Enter / Esc", "Stop editing the filter", KeyContext::Filter),
    Keybinding::new("Tab / Shift+Tab", "Next / previous field", KeyContext::Form),
    Keybinding::new("Enter / Ctrl+S", "Save", KeyContext::Form),
    Keybinding::new("Esc", "Cancel", KeyContext::Form),
    Keybinding::new("Enter / Esc", "Dismiss", KeyContext::Alert),
];

/// All bindings grouped by context, in display order.
pub fn get_keybindings_grouped() -> Vec<(KeyContext, Vec<Keybinding>)> {
    let mut groups: Vec<(KeyContext, Vec<Keybinding>)> = Vec::new();
    for binding in KEYBINDINGS {
        match groups.iter_mut().find(|(ctx, _)| *ctx == binding.context) {
            Some((_, bindings)) => bindings.push(binding.clone()),
            None => groups.push((binding.context, vec![binding.clone()])),
        }
    }
    groups
}

/// The short hint line shown in the footer for a context.
pub fn get_context_hints(context: KeyContext) -> &'static str {
    match context {
        KeyContext::Global | KeyContext::List => {
            "[j/k] move  [space] select  [/] filter  [s] sort  [n] new  [e] edit  [d] delete  [D] delete selected  [h/l] page  [Tab] switch  [?] help  [q] quit"
        }
        KeyContext::Filter => "[type] filter by name  [Enter/Esc] done",
        KeyContext::Form => "[Tab] next field  [Enter] save  [Esc] cancel",
        KeyContext::Alert => "[Enter/Esc] dismiss",
    }
}
