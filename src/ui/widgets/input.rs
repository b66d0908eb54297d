// src/ui/widgets/input.rs
use crate::app::{App, AppState, Screen};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Tabs},
};

/// Renders the screen tabs together with the current selector value.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let selected = match app.screen {
        Screen::Moderation => 0,
        Screen::CheckIn => 1,
    };
    let option = match app.screen {
        Screen::Moderation => app.content_kind.to_string(),
        Screen::CheckIn => app.checkin_method.to_string(),
    };
    let tabs = Tabs::new(vec![Screen::Moderation.to_string(), Screen::CheckIn.to_string()])
        .select(selected)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Horizon 2050 · ◀ {option} ▶")),
        )
        .highlight_style(Style::default().fg(Color::Cyan).bold());
    frame.render_widget(tabs, area);
}

/// Renders the input box widget.
pub fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.screen {
        Screen::Moderation => "Content (not inspected)",
        Screen::CheckIn => "Subject ID (blank = default)",
    };
    let input_block = Block::default().borders(Borders::ALL).title(title);
    let input_paragraph = Paragraph::new(app.input.as_str())
        .block(input_block)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(input_paragraph, area);

    // Show the cursor only when in the Idle state.
    if app.state == AppState::Idle && !app.show_disclaimer {
        frame.set_cursor_position(Position::new(cursor_x(area, app.input.chars().count()), area.y + 1));
    }
}

/// Column for the input cursor, kept inside the box borders.
fn cursor_x(area: Rect, input_len: usize) -> u16 {
    let max_offset = area.width.saturating_sub(2);
    let offset = u16::try_from(input_len).unwrap_or(u16::MAX).min(max_offset);
    area.x.saturating_add(offset).saturating_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_follows_input() {
        let area = Rect::new(4, 0, 30, 3);
        assert_eq!(cursor_x(area, 0), 5);
        assert_eq!(cursor_x(area, 10), 15);
    }

    #[test]
    fn cursor_stays_inside_box_on_long_input() {
        let area = Rect::new(4, 0, 30, 3);
        assert_eq!(cursor_x(area, 500), 4 + 28 + 1);
        assert_eq!(cursor_x(area, 100_000), 4 + 28 + 1);
    }
}
