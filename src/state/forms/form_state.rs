//! Add-item form state

use super::field::FormField;
use crate::document::{Entry, FieldPath, Identified, Section};
use crate::error::PathError;
use serde_json::Value;

/// Open/closed state of a collapsible form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disclosure {
    #[default]
    Closed,
    Open,
}

impl Disclosure {
    pub fn toggle(&mut self) {
        *self = match self {
            Self::Closed => Self::Open,
            Self::Open => Self::Closed,
        };
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Closed => "▸",
            Self::Open => "▾",
        }
    }
}

/// The draft entry of a section and the form it is edited in
#[derive(Debug, Clone, PartialEq)]
pub struct AddItemForm {
    section: Section,
    disclosure: Disclosure,
    draft: Entry,
}

impl AddItemForm {
    pub fn new(section: Section, id: String) -> Self {
        Self {
            section,
            disclosure: Disclosure::Closed,
            draft: Entry::blank(section, id),
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn disclosure(&self) -> Disclosure {
        self.disclosure
    }

    pub fn is_open(&self) -> bool {
        self.disclosure == Disclosure::Open
    }

    pub fn toggle(&mut self) {
        self.disclosure.toggle();
    }

    pub fn draft(&self) -> &Entry {
        &self.draft
    }

    pub fn field(&self, index: usize) -> Option<FormField> {
        self.section
            .field(index)
            .map(|spec| FormField::for_entry(spec, &self.draft))
    }

    /// Write `value` into the draft. `path` is relative to the entry.
    pub fn edit(&mut self, path: &FieldPath, value: Value) -> Result<(), PathError> {
        self.draft = self.draft.with_value(path, value)?;
        Ok(())
    }

    /// Hand out the draft when every required field is filled in.
    /// The form then starts over with a blank draft carrying a fresh id and
    /// closes unless the section keeps it open for quick entry.
    pub fn submit(&mut self, next_id: impl FnOnce() -> String) -> Option<Entry> {
        let missing = self.draft.missing_required();
        if !missing.is_empty() {
            tracing::debug!(
                "Ignoring {} submit, missing {}",
                self.section.key(),
                missing.join(", ")
            );
            return None;
        }

        let entry = std::mem::replace(&mut self.draft, Entry::blank(self.section, next_id()));
        if !self.section.keeps_form_open_after_add() {
            self.disclosure = Disclosure::Closed;
        }
        Some(entry)
    }

    /// Throw the draft away and start from a closed form
    pub fn discard(&mut self, id: String) {
        if self.draft.summary().is_empty() {
            tracing::debug!("Discarding empty {} draft", self.section.key());
        } else {
            tracing::debug!(
                "Discarding {} draft {}",
                self.section.key(),
                self.draft.id()
            );
        }
        self.draft = Entry::blank(self.section, id);
        self.disclosure = Disclosure::Closed;
    }
}
