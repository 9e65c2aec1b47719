//! Form field value objects

use crate::document::{Entry, FieldSpec};
use crate::i18n::t;
use serde_json::Value;

/// Type-safe field values
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Toggle(bool),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

/// A single form field with its configuration and current value
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    /// JSON key the value is written to
    pub name: String,
    pub label: String,
    pub placeholder: String,
    pub value: FieldValue,
    pub is_multiline: bool,
    pub is_required: bool,
}

impl FormField {
    /// Create a text field from its schema entry and initial value
    pub fn text(spec: &FieldSpec, value: &str) -> Self {
        Self {
            name: spec.name.to_string(),
            label: t(spec.label_key).to_string(),
            placeholder: spec.placeholder.to_string(),
            value: FieldValue::Text(value.to_string()),
            is_multiline: spec.is_multiline,
            is_required: spec.is_required,
        }
    }

    /// Create a checkbox field
    pub fn toggle(name: &str, label_key: &str, checked: bool) -> Self {
        Self {
            name: name.to_string(),
            label: t(label_key).to_string(),
            placeholder: String::new(),
            value: FieldValue::Toggle(checked),
            is_multiline: false,
            is_required: false,
        }
    }

    /// The field of `entry` described by `spec`
    pub fn for_entry(spec: &FieldSpec, entry: &Entry) -> Self {
        Self::text(spec, entry.text(spec.name))
    }

    /// Get the text value (empty for checkboxes)
    pub fn as_text(&self) -> &str {
        match &self.value {
            FieldValue::Text(s) => s,
            FieldValue::Toggle(_) => "",
        }
    }

    pub fn is_checked(&self) -> bool {
        matches!(self.value, FieldValue::Toggle(true))
    }

    /// Push a character to the field value. Newlines only land in multi-line fields.
    pub fn push_char(&mut self, c: char) {
        match &mut self.value {
            FieldValue::Text(s) => {
                if c != '\n' || self.is_multiline {
                    s.push(c);
                }
            }
            FieldValue::Toggle(checked) => {
                if c == ' ' {
                    *checked = !*checked;
                }
            }
        }
    }

    /// Remove the last character from the field value
    pub fn pop_char(&mut self) {
        match &mut self.value {
            FieldValue::Text(s) => {
                s.pop();
            }
            FieldValue::Toggle(_) => {}
        }
    }

    pub fn toggle_checked(&mut self) {
        if let FieldValue::Toggle(checked) = &mut self.value {
            *checked = !*checked;
        }
    }

    /// The value as written into the document
    pub fn to_json(&self) -> Value {
        match &self.value {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Toggle(b) => Value::Bool(*b),
        }
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match &self.value {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Toggle(true) => "[x]".to_string(),
            FieldValue::Toggle(false) => "[ ]".to_string(),
        }
    }
}
