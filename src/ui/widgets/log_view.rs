// src/ui/widgets/log_view.rs

use crate::app::App;
use ratatui::{
    prelude::*,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation},
};

/// Renders the log view panel.
///
/// Shows the tail of the log file with the timestamp dimmed. Long lines can be
/// scrolled horizontally once a result is on screen.
pub fn render_log_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .title("Logs (scroll with ← → after a scan)")
        .borders(Borders::ALL);
    
    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    // Calculate the maximum width of the log content to configure the scrollbar correctly.
    let max_width = app.log_content.iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);

    // Update the scrollbar's state with the total content length.
    app.log_horizontal_scroll_state = app.log_horizontal_scroll_state.content_length(max_width);

    let log_lines: Vec<Line> = app.log_content.iter().map(|line| style_log_line(line)).collect();

    let log_paragraph = Paragraph::new(log_lines)
        .scroll((0, app.log_horizontal_scroll as u16));
        
    frame.render_widget(log_paragraph, inner_area);

    let scrollbar = Scrollbar::new(ScrollbarOrientation::HorizontalBottom)
        .thumb_symbol("■");

    let scrollbar_area = Rect {
        x: inner_area.x,
        y: inner_area.y + inner_area.height.saturating_sub(1),
        width: inner_area.width,
        height: 1,
    };
    
    frame.render_stateful_widget(
        scrollbar,
        scrollbar_area,
        &mut app.log_horizontal_scroll_state,
    );
}

/// Splits "DATE TIME REST" into a dimmed timestamp and the message.
///
/// Lines that don't match are rendered unstyled.
fn style_log_line(line: &str) -> Line<'_> {
    let mut parts = line.splitn(3, ' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(date), Some(time), Some(rest)) => Line::from(vec![
            Span::styled(format!("{} {}", date, time), Style::default().fg(Color::DarkGray)),
            Span::raw(format!(" {}", rest)),
        ]),
        _ => Line::from(line),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_is_split_off() {
        let line = style_log_line("2050-01-01 09:00:00  INFO Scan triggered.");
        assert_eq!(line.spans.len(), 2);
        assert_eq!(line.spans[0].content, "2050-01-01 09:00:00");
        assert_eq!(line.spans[1].content, "  INFO Scan triggered.");
    }

    #[test]
    fn short_lines_are_left_alone() {
        let line = style_log_line("oops");
        assert_eq!(line.spans.len(), 1);
    }
}
