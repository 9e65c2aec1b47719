//! Sidebar button component

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Button height in rows (top border + content + bottom border)
pub const BUTTON_HEIGHT: u16 = 3;

fn button_styles(is_selected: bool, is_enabled: bool) -> (Style, Style) {
    let border = if is_selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let text = match (is_selected, is_enabled) {
        (true, _) => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        (false, false) => Style::default().fg(Color::DarkGray),
        (false, true) => Style::default(),
    };
    (border, text)
}

/// Render a sidebar button with its number key and label.
/// Disabled buttons stay selectable but are dimmed and marked hidden.
pub fn render_sidebar_button(
    frame: &mut Frame,
    area: Rect,
    key: &str,
    label: &str,
    is_selected: bool,
    is_enabled: bool,
) {
    let (border_style, text_style) = button_styles(is_selected, is_enabled);

    let mut spans = vec![
        Span::styled(format!(" {key} "), Style::default().fg(Color::DarkGray)),
        Span::styled(label.to_string(), text_style),
    ];
    if !is_enabled {
        spans.push(Span::styled(" ⊘", Style::default().fg(Color::DarkGray)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_button_is_cyan_bold() {
        let (border, text) = button_styles(true, false);
        assert_eq!(border.fg, Some(Color::Cyan));
        assert!(text.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_disabled_button_is_dimmed() {
        let (_, text) = button_styles(false, false);
        assert_eq!(text.fg, Some(Color::DarkGray));
        let (_, text) = button_styles(false, true);
        assert_eq!(text.fg, None);
    }
}
