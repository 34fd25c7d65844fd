//! Single-line text input used by the filter bar and the entity form.
//!
//! The cursor is a character index, so multi-byte input edits correctly.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Position, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// A text input widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    /// The current input value.
    value: String,
    /// Cursor position, in characters.
    cursor: usize,
}

impl TextInput {
    /// Create a new empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new input with an initial value and the cursor at the end.
    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    /// Get the current value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the value and move the cursor to the end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.chars().count();
    }

    /// Get the cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Byte offset of a character index.
    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    /// Handle keyboard input.
    ///
    /// Returns true if the value was modified.
    pub fn handle_input(&mut self, key: KeyEvent) -> bool {
        let len = self.value.chars().count();
        match (key.code, key.modifiers) {
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                let changed = !self.value.is_empty();
                self.value.clear();
                self.cursor = 0;
                changed
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                let at = self.byte_index(self.cursor);
                self.value.insert(at, c);
                self.cursor += 1;
                true
            }
            (KeyCode::Backspace, _) if self.cursor > 0 => {
                self.cursor -= 1;
                let at = self.byte_index(self.cursor);
                self.value.remove(at);
                true
            }
            (KeyCode::Delete, _) if self.cursor < len => {
                let at = self.byte_index(self.cursor);
                self.value.remove(at);
                true
            }
            (KeyCode::Left, _) => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            (KeyCode::Right, _) => {
                self.cursor = (self.cursor + 1).min(len);
                false
            }
            (KeyCode::Home, _) => {
                self.cursor = 0;
                false
            }
            (KeyCode::End, _) => {
                self.cursor = len;
                false
            }
            _ => false,
        }
    }

    /// Render the input inside a titled border.
    pub fn render(&self, frame: &mut Frame, area: Rect, label: &str, focused: bool, locked: bool) {
        let border_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let text_style = if locked {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        let input = Paragraph::new(self.value.as_str()).style(text_style).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(label.to_string()),
        );
        frame.render_widget(input, area);

        if focused && !locked {
            let cursor_x = area.x + 1 + self.cursor as u16;
            if cursor_x < area.x + area.width.saturating_sub(1) {
                frame.set_cursor_position(Position::new(cursor_x, area.y + 1));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_appends() {
        let mut input = TextInput::new();
        assert!(input.handle_input(key(KeyCode::Char('b'))));
        assert!(input.handle_input(key(KeyCode::Char('a'))));
        assert_eq!(input.value(), "ba");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_shift_characters_are_inserted() {
        let mut input = TextInput::new();
        input.handle_input(KeyEvent::new(KeyCode::Char('B'), KeyModifiers::SHIFT));
        assert_eq!(input.value(), "B");
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut input = TextInput::with_value("bags");
        assert!(input.handle_input(key(KeyCode::Backspace)));
        assert_eq!(input.value(), "bag");

        input.handle_input(key(KeyCode::Home));
        assert!(input.handle_input(key(KeyCode::Delete)));
        assert_eq!(input.value(), "ag");

        input.handle_input(key(KeyCode::Home));
        assert!(!input.handle_input(key(KeyCode::Backspace)));
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = TextInput::with_value("café");
        input.handle_input(key(KeyCode::Left));
        input.handle_input(key(KeyCode::Char('x')));
        assert_eq!(input.value(), "cafxé");
        input.handle_input(key(KeyCode::End));
        input.handle_input(key(KeyCode::Backspace));
        assert_eq!(input.value(), "cafx");
    }

    #[test]
    fn test_cursor_bounds() {
        let mut input = TextInput::with_value("ab");
        input.handle_input(key(KeyCode::Right));
        assert_eq!(input.cursor(), 2);
        input.handle_input(key(KeyCode::Home));
        input.handle_input(key(KeyCode::Left));
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_ctrl_u_clears() {
        let mut input = TextInput::with_value("hats");
        assert!(input.handle_input(KeyEvent::new(
            KeyCode::Char('u'),
            KeyModifiers::CONTROL
        )));
        assert!(input.value().is_empty());
        assert_eq!(input.cursor(), 0);
    }
}
