//! Add/edit dialog state for catalog records.

use std::marker::PhantomData;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::types::{Entity, EntityId, FormFieldSpec, FormValues};
use crate::ui::TextInput;

/// Actions that can be returned from the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    /// Confirm the dialog.
    Submit,
    /// Close the dialog without saving.
    Cancel,
}

/// One input of the form.
#[derive(Debug, Clone)]
pub struct FormField {
    /// What the field holds.
    pub spec: FormFieldSpec,
    /// The text being edited.
    pub input: TextInput,
    /// Read-only fields are shown but cannot be focused.
    pub locked: bool,
}

/// State of the add/edit dialog for an entity type.
#[derive(Debug, Clone)]
pub struct EntityForm<E> {
    fields: Vec<FormField>,
    focused: usize,
    /// The record being edited, or `None` when adding.
    editing: Option<EntityId>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> EntityForm<E> {
    /// A form for a new, blank record.
    pub fn blank() -> Self {
        let fields = E::form_fields()
            .iter()
            .map(|spec| FormField {
                spec: *spec,
                input: TextInput::new(),
                locked: false,
            })
            .collect();
        Self::with_fields(fields, None)
    }

    /// A form pre-filled with `record`. Fields locked on edit are read-only.
    pub fn for_edit(record: &E) -> Self {
        let values = record.form_values();
        let fields = E::form_fields()
            .iter()
            .map(|spec| FormField {
                spec: *spec,
                input: TextInput::with_value(values.get(spec.key)),
                locked: spec.locked_on_edit,
            })
            .collect();
        Self::with_fields(fields, Some(record.id().clone()))
    }

    fn with_fields(fields: Vec<FormField>, editing: Option<EntityId>) -> Self {
        let focused = fields.iter().position(|f| !f.locked).unwrap_or(0);
        Self {
            fields,
            focused,
            editing,
            _entity: PhantomData,
        }
    }

    /// Dialog title.
    pub fn title(&self) -> String {
        match self.editing {
            Some(_) => format!("Edit {}", E::RESOURCE.noun()),
            None => format!("Add New {}", E::RESOURCE.noun()),
        }
    }

    /// The ID of the record being edited.
    pub fn editing(&self) -> Option<&EntityId> {
        self.editing.as_ref()
    }

    /// All fields, in display order.
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Index of the focused field.
    pub fn focused(&self) -> usize {
        self.focused
    }

    /// Current text of a field.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.spec.key == key)
            .map(|f| f.input.value())
    }

    /// Overwrite the text of an unlocked field. Returns false if there is none.
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) -> bool {
        match self
            .fields
            .iter_mut()
            .find(|f| f.spec.key == key && !f.locked)
        {
            Some(field) => {
                field.input.set_value(value);
                true
            }
            None => false,
        }
    }

    /// Raw values of every field.
    pub fn values(&self) -> FormValues {
        let mut values = FormValues::new();
        for field in &self.fields {
            values.insert(field.spec.key, field.input.value());
        }
        values
    }

    /// Validate the input and build the record to send.
    ///
    /// When editing, the record keeps the ID it was opened with.
    pub fn build(&self) -> Result<E, String> {
        let mut record = E::from_form(&self.values())?;
        if let Some(id) = &self.editing {
            record.set_id(id.clone());
        }
        Ok(record)
    }

    /// Move focus to the next editable field, wrapping around.
    pub fn focus_next(&mut self) {
        self.step_focus(1);
    }

    /// Move focus to the previous editable field, wrapping around.
    pub fn focus_prev(&mut self) {
        self.step_focus(self.fields.len().saturating_sub(1));
    }

    fn step_focus(&mut self, step: usize) {
        let len = self.fields.len();
        if len == 0 {
            return;
        }
        let mut next = self.focused;
        for _ in 0..len {
            next = (next + step) % len;
            if !self.fields[next].locked {
                self.focused = next;
                return;
            }
        }
    }

    /// Handle keyboard input.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<FormAction> {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => Some(FormAction::Cancel),
            (KeyCode::Enter, _) | (KeyCode::Char('s'), KeyModifiers::CONTROL) => {
                Some(FormAction::Submit)
            }
            (KeyCode::Tab, _) | (KeyCode::Down, _) => {
                self.focus_next();
                None
            }
            (KeyCode::BackTab, _) | (KeyCode::Up, _) => {
                self.focus_prev();
                None
            }
            _ => {
                if let Some(field) = self.fields.get_mut(self.focused) {
                    if !field.locked {
                        field.input.handle_input(key);
                    }
                }
                None
            }
        }
    }
}
