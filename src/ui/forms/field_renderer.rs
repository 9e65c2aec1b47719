//! Field rendering utilities for forms

use crate::state::{FieldValue, FormField};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

const CURSOR: &str = "▌";

fn label_style(is_active: bool) -> Style {
    if is_active {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    }
}

/// Lines of a form field: checkbox on one line, text fields as a label line
/// followed by the value
pub fn field_lines(field: &FormField, is_active: bool, indent: usize) -> Vec<Line<'static>> {
    let pad = " ".repeat(indent);
    let marker = if is_active { "› " } else { "  " };

    if let FieldValue::Toggle(_) = field.value {
        let box_style = if field.is_checked() {
            label_style(is_active)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        return vec![Line::from(vec![
            Span::raw(pad),
            Span::styled(marker, Style::default().fg(Color::Cyan)),
            Span::styled(field.display_value(), box_style),
            Span::raw(" "),
            Span::styled(field.label.clone(), label_style(is_active)),
        ])];
    }

    let required = if field.is_required { " *" } else { "" };
    let mut lines = vec![Line::from(vec![
        Span::raw(pad.clone()),
        Span::styled(marker, Style::default().fg(Color::Cyan)),
        Span::styled(format!("{}{required}", field.label), label_style(is_active)),
    ])];

    let value_pad = format!("{pad}    ");
    let value = field.as_text();
    let value_style = if is_active {
        Style::default().fg(Color::White)
    } else {
        Style::default()
    };

    let mut value_lines: Vec<Line<'static>> = if value.is_empty() {
        let hint = if field.placeholder.is_empty() {
            "(empty)".to_string()
        } else {
            field.placeholder.clone()
        };
        let hint = if is_active { String::new() } else { hint };
        vec![Line::from(vec![
            Span::raw(value_pad.clone()),
            Span::styled(hint, Style::default().fg(Color::DarkGray)),
        ])]
    } else {
        value
            .split('\n')
            .map(|l| {
                Line::from(vec![
                    Span::raw(value_pad.clone()),
                    Span::styled(l.to_string(), value_style),
                ])
            })
            .collect()
    };

    if is_active {
        if let Some(last) = value_lines.last_mut() {
            last.spans
                .push(Span::styled(CURSOR, Style::default().fg(Color::Cyan)));
        }
    }

    lines.extend(value_lines);
    lines
}

/// A single-line editable value, used for rows that are their own field
pub fn inline_field_line(field: &FormField, is_active: bool, prefix: Span<'static>) -> Line<'static> {
    let mut spans = vec![prefix];
    let value = field.as_text();
    if value.is_empty() && !is_active {
        spans.push(Span::styled(
            "(empty)",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::styled(value.to_string(), label_style(is_active)));
    }
    if is_active {
        spans.push(Span::styled(CURSOR, Style::default().fg(Color::Cyan)));
    }
    Line::from(spans)
}
