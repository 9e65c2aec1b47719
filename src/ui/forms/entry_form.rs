//! Entry form: every field of an entry, laid out from its section schema.
//! The same rendering serves the add-item draft and expanded entries.

use super::field_renderer::field_lines;
use crate::document::Entry;
use crate::state::FormField;
use ratatui::text::Line;

/// Rendered form lines plus the offset of the active field's first line
pub struct FormLines {
    pub lines: Vec<Line<'static>>,
    pub active_line: Option<usize>,
}

pub fn entry_form_lines(entry: &Entry, active_field: Option<usize>, indent: usize) -> FormLines {
    let mut lines = Vec::new();
    let mut active_line = None;

    for (index, spec) in entry.section().fields().iter().enumerate() {
        let field = FormField::for_entry(spec, entry);
        let is_active = active_field == Some(index);
        if is_active {
            active_line = Some(lines.len());
        }
        lines.extend(field_lines(&field, is_active, indent));
    }

    FormLines { lines, active_line }
}
