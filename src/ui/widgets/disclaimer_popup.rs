// src/ui/widgets/disclaimer_popup.rs

use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Renders the startup notice popup on top of the existing UI.
///
/// The notice makes clear that every verdict, score and check-in shown is
/// generated from random draws. `Clear` wipes the popup area first so the
/// background UI does not bleed through.
///
/// # Arguments
/// * `frame` - A mutable reference to the `Frame` used for rendering the TUI.
/// * `area` - The `Rect` representing the total area available for rendering.
pub fn render_disclaimer_popup(frame: &mut Frame, area: Rect) {
    let disclaimer_text = Text::from(vec![
        Line::from("SIMULATION NOTICE".bold().yellow()),
        Line::from(""),
        Line::from("Horizon 2050 is a demonstration. No content is analysed, no biometric sensor is read and no real location is requested."),
        Line::from(""),
        Line::from("Moderation verdicts are drawn from a fixed table of probabilities. Check-in locations, match scores and geofence results are simulated."),
        Line::from(""),
        Line::from("Do not use these results to make decisions about real people or real content."),
        Line::from(""),
        Line::from("Press ".bold() + "Enter".bold().yellow() + " to Acknowledge and Continue".bold()),
    ]);

    let block = Block::default()
        .title("Notice")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let popup_area = centered_rect(70, 60, area);

    let popup = Paragraph::new(disclaimer_text)
        .block(block)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);

    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup, popup_area);
}

/// Computes a rectangle of the given percentage size centered within `r`.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popup_is_centered_inside_parent() {
        let parent = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(70, 60, parent);
        assert_eq!(popup.width, 70);
        assert_eq!(popup.height, 30);
        assert_eq!(popup.x, 15);
        assert_eq!(popup.y, 10);
    }
}
