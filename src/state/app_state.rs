//! Application state definitions

use super::forms::AddItemForm;
use crate::document::{Document, Identified, Section};
use std::collections::{HashSet, VecDeque};

/// Which pane receives key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Sidebar,
    Section,
}

/// A focusable row inside a section tab, in top-to-bottom order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionCursor {
    /// `config.<section>.enable` checkbox
    #[default]
    Enable,
    /// `config.<section>.heading` text field
    Heading,
    /// Header of the add-item form (opens/closes it)
    AddHeader,
    AddField(usize),
    AddSubmit,
    /// Row of a committed entry
    Item(usize),
    /// `enable` checkbox of an expanded entry
    ItemEnable(usize),
    /// Field of an expanded entry
    ItemField(usize, usize),
}

impl SectionCursor {
    /// Index of the entry this row belongs to
    pub fn item_index(&self) -> Option<usize> {
        match self {
            Self::Item(i) | Self::ItemEnable(i) | Self::ItemField(i, _) => Some(*i),
            _ => None,
        }
    }
}

/// Per-tab UI state
#[derive(Debug, Clone)]
pub struct SectionState {
    pub section: Section,
    pub cursor: SectionCursor,
    pub add_form: AddItemForm,
    /// Identifiers of expanded entries
    pub expanded: HashSet<String>,
}

impl SectionState {
    pub fn new(section: Section, draft_id: String) -> Self {
        Self {
            section,
            cursor: SectionCursor::default(),
            add_form: AddItemForm::new(section, draft_id),
            expanded: HashSet::new(),
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Flip an entry between its summary row and its full form
    pub fn toggle_expanded(&mut self, id: &str) {
        if !self.expanded.remove(id) {
            self.expanded.insert(id.to_string());
        }
    }

    /// Every focusable row of the tab for the given document
    pub fn stops(&self, document: &Document) -> Vec<SectionCursor> {
        let mut stops = vec![
            SectionCursor::Enable,
            SectionCursor::Heading,
            SectionCursor::AddHeader,
        ];
        if self.add_form.is_open() {
            stops.extend((0..self.section.fields().len()).map(SectionCursor::AddField));
            stops.push(SectionCursor::AddSubmit);
        }
        for (index, entry) in document.entries(self.section).iter().enumerate() {
            stops.push(SectionCursor::Item(index));
            if !self.section.is_single_field() && self.is_expanded(entry.id()) {
                stops.push(SectionCursor::ItemEnable(index));
                stops.extend(
                    (0..self.section.fields().len()).map(|f| SectionCursor::ItemField(index, f)),
                );
            }
        }
        stops
    }

    /// Move the cursor `delta` rows, stopping at the first and last row
    pub fn move_cursor(&mut self, delta: isize, document: &Document) {
        self.snap_cursor(document);
        let stops = self.stops(document);
        let current = stops.iter().position(|s| *s == self.cursor).unwrap_or(0);
        let target = current
            .saturating_add_signed(delta)
            .min(stops.len().saturating_sub(1));
        if let Some(stop) = stops.get(target) {
            self.cursor = *stop;
        }
    }

    /// Put the cursor back on an existing row after the document or the
    /// form layout changed underneath it
    pub fn snap_cursor(&mut self, document: &Document) {
        let stops = self.stops(document);
        if stops.contains(&self.cursor) {
            return;
        }
        let len = document.len(self.section);
        self.cursor = match self.cursor {
            SectionCursor::AddField(_) | SectionCursor::AddSubmit => SectionCursor::AddHeader,
            SectionCursor::Item(i) | SectionCursor::ItemEnable(i) | SectionCursor::ItemField(i, _) => {
                if len == 0 {
                    SectionCursor::AddHeader
                } else {
                    SectionCursor::Item(i.min(len - 1))
                }
            }
            other => other,
        };
    }

    /// Forget expansion state of entries that no longer exist
    pub fn prune_expanded(&mut self, document: &Document) {
        let ids: HashSet<&str> = document.ids(self.section).into_iter().collect();
        self.expanded.retain(|id| ids.contains(id.as_str()));
    }
}

/// Main application state
#[derive(Debug, Clone)]
pub struct AppState {
    // Navigation
    pub current_section: Section,
    pub focus: Focus,
    pub sidebar_index: usize,

    // Per-tab state, indexed by `Section::index`
    sections: Vec<SectionState>,

    // Feedback
    pub error_queue: VecDeque<String>,
    pub status_message: Option<String>,
    /// Changes not written to storage yet
    pub dirty: bool,
}

impl AppState {
    pub fn new(mut next_id: impl FnMut() -> String) -> Self {
        Self {
            current_section: Section::default(),
            focus: Focus::default(),
            sidebar_index: 0,
            sections: Section::ALL
                .into_iter()
                .map(|s| SectionState::new(s, next_id()))
                .collect(),
            error_queue: VecDeque::new(),
            status_message: None,
            dirty: false,
        }
    }

    pub fn section(&self, section: Section) -> &SectionState {
        &self.sections[section.index()]
    }

    pub fn section_mut(&mut self, section: Section) -> &mut SectionState {
        &mut self.sections[section.index()]
    }

    pub fn current(&self) -> &SectionState {
        self.section(self.current_section)
    }

    pub fn current_mut(&mut self) -> &mut SectionState {
        let section = self.current_section;
        self.section_mut(section)
    }

    /// Move sidebar selection down
    pub fn move_sidebar_down(&mut self) {
        if self.sidebar_index + 1 < Section::ALL.len() {
            self.sidebar_index += 1;
        }
    }

    /// Move sidebar selection up
    pub fn move_sidebar_up(&mut self) {
        self.sidebar_index = self.sidebar_index.saturating_sub(1);
    }

    pub fn push_error(&mut self, message: String) {
        tracing::warn!("{message}");
        self.error_queue.push_back(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.error_queue.is_empty()
    }

    pub fn current_error(&self) -> Option<&str> {
        self.error_queue.front().map(String::as_str)
    }

    pub fn dismiss_error(&mut self) {
        self.error_queue.pop_front();
    }
}
