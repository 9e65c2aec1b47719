//! Reusable UI widget helpers

use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Paragraph, Wrap},
    Frame,
};

/// First visible line that keeps `cursor_line` (and the line after it, if
/// any) inside a viewport of `height` lines
pub fn scroll_offset(cursor_line: usize, total: usize, height: usize) -> usize {
    if height == 0 || total <= height {
        return 0;
    }
    let bottom = (cursor_line + 2).min(total);
    bottom.saturating_sub(height).min(total - height)
}

/// Render lines in a block, scrolled so the cursor line stays visible
pub fn render_scrollable_lines(
    frame: &mut Frame,
    area: Rect,
    lines: Vec<Line<'static>>,
    cursor_line: usize,
    block: Block,
) {
    let inner_height = block.inner(area).height as usize;
    let offset = scroll_offset(cursor_line, lines.len(), inner_height);
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((offset.min(u16::MAX as usize) as u16, 0));
    frame.render_widget(paragraph, area);
}
