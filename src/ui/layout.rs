//! Layout components (sidebar, status bar)

use super::components::{render_sidebar_button, BUTTON_HEIGHT};
use super::section_tab::tab_titles;
use crate::app::App;
use crate::platform::{COPY_SHORTCUT, SAVE_SHORTCUT};
use crate::state::{Focus, SectionCursor};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Create the main layout with sidebar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(20), // Sidebar
            Constraint::Min(0),     // Main content
        ])
        .split(area);

    // Reserve bottom line for status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(chunks[1]);

    let sidebar_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Sidebar content
            Constraint::Length(1), // Status bar continuation
        ])
        .split(chunks[0]);

    (sidebar_chunks[0], main_chunks[0])
}

/// Draw the sidebar with one boxed button per section tab
pub fn draw_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let titles = tab_titles(app.store.document());

    let mut constraints = vec![Constraint::Length(1)]; // Top padding
    constraints.extend(titles.iter().map(|_| Constraint::Length(BUTTON_HEIGHT)));
    constraints.push(Constraint::Min(0)); // Bottom padding

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let in_sidebar = app.state.focus == Focus::Sidebar;
    for (idx, (section, title)) in titles.iter().enumerate() {
        let is_selected = if in_sidebar {
            app.state.sidebar_index == idx
        } else {
            app.state.current_section == *section
        };
        let is_enabled = app.store.document().section_config(*section).enable;

        render_sidebar_button(
            frame,
            chunks[idx + 1],
            &(idx + 1).to_string(),
            title,
            is_selected,
            is_enabled,
        );
    }
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![];

    // Unsaved changes marker
    let dirty = if app.state.dirty {
        Span::styled(" ● ", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(" ○ ", Style::default().fg(Color::Green))
    };
    spans.push(dirty);

    let hints = get_hints(app);
    spans.push(Span::styled(hints, Style::default().fg(Color::Gray)));

    // Status message
    if let Some(msg) = &app.state.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Green)));
    }

    spans.push(Span::raw(" | "));
    spans.push(Span::styled(
        app.storage_location(),
        Style::default().fg(Color::Blue),
    ));

    let quit_hint = " ^C:quit ";

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    // Render quit hint on the right
    let quit_area = Rect {
        x: area.width.saturating_sub(quit_hint.len() as u16),
        y: area.height.saturating_sub(1),
        width: quit_hint.len() as u16,
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Get keyboard hints for the focused pane and row
fn get_hints(app: &App) -> String {
    match app.state.focus {
        Focus::Sidebar => format!("j/k:nav  Enter:open  1-2:jump  {SAVE_SHORTCUT}:save  ^R:reload  q:quit"),
        Focus::Section => match app.state.current().cursor {
            SectionCursor::Enable | SectionCursor::ItemEnable(_) => {
                "Space:toggle  ↑/↓:move  Esc:back".to_string()
            }
            SectionCursor::AddHeader => "Enter:open/close  ↑/↓:move  Esc:back".to_string(),
            SectionCursor::AddField(_) | SectionCursor::AddSubmit => {
                "type to edit  Enter:add  Tab:next  Esc:back".to_string()
            }
            SectionCursor::Item(_) | SectionCursor::ItemField(_, _) => format!(
                "Enter:expand  ^↑/^↓:reorder  Del:remove  {COPY_SHORTCUT}:copy  {SAVE_SHORTCUT}:save"
            ),
            SectionCursor::Heading => format!("type to edit  ↑/↓:move  {SAVE_SHORTCUT}:save"),
        },
    }
}
