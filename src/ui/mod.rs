//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;
mod section_tab;
mod widgets;

use crate::app::App;
use components::render_error_dialog;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Draw the main layout with sidebar
    let (sidebar_area, main_area) = layout::create_layout(area);

    layout::draw_sidebar(frame, sidebar_area, app);
    section_tab::draw(frame, main_area, app);

    // Draw status bar
    layout::draw_status_bar(frame, app);

    // Modal error dialog on top of everything
    if let Some(error) = app.state.current_error() {
        render_error_dialog(frame, error);
    }
}
