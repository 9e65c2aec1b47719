//! Section tab: enable toggle, heading, add-item form and the entry list

use super::forms::{entry_form_lines, field_lines, inline_field_line};
use super::widgets::render_scrollable_lines;
use crate::app::App;
use crate::document::{Document, Entry, FieldSpec, Identified, Section};
use crate::i18n::t;
use crate::state::transition::{ItemTransition, ReorderDirection};
use crate::state::{Focus, FormField, SectionCursor, SectionState, TransitionTracker};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
    Frame,
};
use std::time::Instant;

/// Lines of a tab and where the cursor row starts
struct TabLines {
    lines: Vec<Line<'static>>,
    cursor_line: usize,
}

impl TabLines {
    fn new() -> Self {
        Self {
            lines: Vec::new(),
            cursor_line: 0,
        }
    }

    fn push(&mut self, line: Line<'static>, is_cursor: bool) {
        if is_cursor {
            self.cursor_line = self.lines.len();
        }
        self.lines.push(line);
    }

    fn extend(&mut self, lines: Vec<Line<'static>>, cursor_offset: Option<usize>) {
        if let Some(offset) = cursor_offset {
            self.cursor_line = self.lines.len() + offset;
        }
        self.lines.extend(lines);
    }

    fn blank(&mut self) {
        self.lines.push(Line::from(""));
    }
}

/// Draw the current section tab
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let section = app.state.current_section;
    let tab = app.state.current();
    let document = app.store.document();
    let is_focused = app.state.focus == Focus::Section;

    let content = tab_lines(document, tab, &app.transitions, is_focused, Instant::now());

    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .title(format!(" {} ", document.section_config(section).heading))
        .borders(Borders::ALL)
        .border_style(border_style);

    render_scrollable_lines(frame, area, content.lines, content.cursor_line, block);
}

fn tab_lines(
    document: &Document,
    tab: &SectionState,
    transitions: &TransitionTracker,
    is_focused: bool,
    now: Instant,
) -> TabLines {
    let section = tab.section;
    let config = document.section_config(section);
    let cursor = if is_focused { Some(tab.cursor) } else { None };
    let mut out = TabLines::new();

    let enable = FormField::toggle("enable", "section.enable.label", config.enable);
    let at_enable = cursor == Some(SectionCursor::Enable);
    out.extend(field_lines(&enable, at_enable, 0), at_enable.then_some(0));

    let heading = FormField::text(&FieldSpec::HEADING, &config.heading);
    let at_heading = cursor == Some(SectionCursor::Heading);
    out.extend(field_lines(&heading, at_heading, 0), at_heading.then_some(0));
    out.blank();

    add_form_lines(&mut out, tab, cursor);
    out.blank();

    for (index, entry) in document.entries(section).iter().enumerate() {
        item_lines(&mut out, tab, entry, index, cursor, transitions.state_of(section, entry.id(), now));
    }
    if document.len(section) == 0 {
        out.push(
            Line::from(Span::styled(
                "  No entries yet",
                Style::default().fg(Color::DarkGray),
            )),
            false,
        );
    }

    out
}

fn add_form_lines(out: &mut TabLines, tab: &SectionState, cursor: Option<SectionCursor>) {
    let form = &tab.add_form;
    let at_header = cursor == Some(SectionCursor::AddHeader);
    let header_style = if at_header {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };
    out.push(
        Line::from(vec![
            Span::styled(if at_header { "› " } else { "  " }, Style::default().fg(Color::Cyan)),
            Span::styled(
                format!("{} {}", form.disclosure().symbol(), t("section.add.title")),
                header_style,
            ),
        ]),
        at_header,
    );

    if !form.is_open() {
        return;
    }

    let active_field = match cursor {
        Some(SectionCursor::AddField(i)) => Some(i),
        _ => None,
    };
    let rendered = entry_form_lines(form.draft(), active_field, 2);
    out.extend(rendered.lines, rendered.active_line);

    let at_submit = cursor == Some(SectionCursor::AddSubmit);
    let submit_style = if at_submit {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else if form.draft().is_complete() {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    out.push(
        Line::from(vec![
            Span::raw("    "),
            Span::styled(format!("[ {} ]", t("item.add")), submit_style),
        ]),
        at_submit,
    );
}

fn item_lines(
    out: &mut TabLines,
    tab: &SectionState,
    entry: &Entry,
    index: usize,
    cursor: Option<SectionCursor>,
    transition: ItemTransition,
) {
    let section = tab.section;
    let at_row = cursor == Some(SectionCursor::Item(index));
    let marker = Span::styled(
        if at_row { "› " } else { "  " },
        Style::default().fg(Color::Cyan),
    );

    let row = if section.is_single_field() {
        let spec = &section.fields()[0];
        let field = FormField::for_entry(spec, entry);
        let mut line = inline_field_line(&field, at_row, marker);
        line.spans.insert(1, Span::raw("• "));
        line
    } else {
        let expanded = tab.is_expanded(entry.id());
        let symbol = if expanded { "▾" } else { "▸" };
        let summary = if entry.summary().is_empty() {
            "(untitled)".to_string()
        } else {
            entry.summary().to_string()
        };
        let style = if at_row {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let mut spans = vec![marker, Span::styled(format!("{symbol} {summary}"), style)];
        if let Entry::Education(e) = entry {
            if !e.enable {
                spans.push(Span::styled("  (hidden)", Style::default().fg(Color::DarkGray)));
            }
        }
        Line::from(spans)
    };
    out.push(animate(row, transition), at_row);

    if section.is_single_field() || !tab.is_expanded(entry.id()) {
        return;
    }

    if let Entry::Education(e) = entry {
        let at_enable = cursor == Some(SectionCursor::ItemEnable(index));
        let enable = FormField::toggle("enable", "item.enable", e.enable);
        out.extend(field_lines(&enable, at_enable, 2), at_enable.then_some(0));
    }

    let active_field = match cursor {
        Some(SectionCursor::ItemField(i, f)) if i == index => Some(f),
        _ => None,
    };
    let rendered = entry_form_lines(entry, active_field, 2);
    out.extend(rendered.lines, rendered.active_line);
    out.blank();
}

/// Apply the animation state of an entry to its row
fn animate(line: Line<'static>, transition: ItemTransition) -> Line<'static> {
    match transition {
        ItemTransition::Idle => line,
        ItemTransition::AnimatingOut { progress } => {
            // Slide the row out to the right while it fades
            let shift = (progress * 24.0).round() as usize;
            let mut spans = vec![Span::raw(" ".repeat(shift))];
            spans.extend(line.spans.into_iter().map(|s| {
                s.style(
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::CROSSED_OUT),
                )
            }));
            Line::from(spans)
        }
        ItemTransition::AnimatingReorder {
            direction,
            progress,
        } => {
            let arrow = match direction {
                ReorderDirection::Up => "↑",
                ReorderDirection::Down => "↓",
            };
            let color = if progress < 0.5 {
                Color::Yellow
            } else {
                Color::LightYellow
            };
            let mut spans = line.spans;
            spans.push(Span::styled(format!(" {arrow}"), Style::default().fg(color)));
            Line::from(spans)
        }
    }
}

/// Sections a tab exists for, in sidebar order
pub fn tab_titles(document: &Document) -> Vec<(Section, String)> {
    Section::ALL
        .into_iter()
        .map(|s| {
            let heading = &document.section_config(s).heading;
            let title = if heading.is_empty() {
                s.default_heading().to_string()
            } else {
                heading.clone()
            };
            (s, title)
        })
        .collect()
}
