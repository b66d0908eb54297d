// src/ui/widgets/summary.rs

use crate::app::{App, Screen};
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph},
};

/// Maps a 0-100 score to a rating label and its color.
fn rating(score: u8) -> (&'static str, Color) {
    match score {
        90..=100 => ("Excellent", Color::Green),
        75..=89 => ("Good", Color::Cyan),
        50..=74 => ("Needs Review", Color::Yellow),
        _ => ("Poor", Color::Red),
    }
}

/// Renders the summary widget, a high-level overview of the latest result.
///
/// Shows the safety score (moderation) or the session compliance rate (check-in)
/// with an animated gauge, the pass/fail counters and a few session statistics.
/// Nothing is drawn until a scan has finished.
///
/// # Arguments
/// * `frame` - The `Frame` used for rendering the UI.
/// * `app` - The application state.
/// * `area` - The `Rect` defining the drawable area for this widget.
pub fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let summary_container = Block::default().borders(Borders::ALL).title("Summary");
    frame.render_widget(summary_container, area);

    let summary_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Score & Rating section
            Constraint::Length(1), // Gauge chart
            Constraint::Length(2), // Spacer
            Constraint::Length(4), // Checks section
            Constraint::Length(1), // Spacer
            Constraint::Min(0),    // Session section
        ])
        .split(area);

    if !app.result_visible() {
        return;
    }

    // --- Score & Rating Section ---
    let heading = match app.screen {
        Screen::Moderation => "Safety Score",
        Screen::CheckIn => "Compliance Rate",
    };
    let (rating_text, rating_color) = rating(app.summary.score);
    let score_line = Line::from(format!("{}/100 ({})", app.summary.score, rating_text))
        .style(Style::default().fg(rating_color));
    let score_text = Text::from(vec![Line::from(heading.bold()), score_line]);
    frame.render_widget(Paragraph::new(score_text).alignment(Alignment::Center), summary_chunks[0]);

    // --- Gauge Chart (Animated) ---
    let score_gauge = Gauge::default()
        .percent(app.displayed_score as u16)
        .label("")
        .style(Style::default().fg(rating(app.displayed_score).1));
    frame.render_widget(score_gauge, summary_chunks[1]);

    // --- Checks Section ---
    let checks_block = Block::default().title("CHECKS".bold());
    let checks_text = Text::from(vec![
        Line::from(vec![
            Span::raw("Passed:  "),
            Span::styled(
                format!("{}/{}", app.summary.checks_passed, app.summary.checks_total),
                Style::default().fg(Color::Green),
            ),
        ]),
        Line::from(vec![
            Span::raw("Flagged: "),
            Span::styled(app.summary.flagged.to_string(), Style::default().fg(Color::Red)),
        ]),
    ]);
    frame.render_widget(Paragraph::new(checks_text).block(checks_block), summary_chunks[3]);

    // --- Session Section ---
    let session_block = Block::default().title("SESSION".bold());
    let mut session_lines = Vec::new();
    match app.screen {
        Screen::Moderation => {
            if let Some(verdict) = &app.verdict {
                session_lines.push(Line::from(format!("Kind: {}", verdict.content_kind)));
                session_lines.push(Line::from(format!("Confidence: {:.1}%", verdict.confidence)));
                session_lines.push(Line::from(format!(
                    "Generated: {}",
                    verdict.generated_at.format("%H:%M:%S UTC")
                )));
            }
        }
        Screen::CheckIn => {
            session_lines.push(Line::from(format!("Check-ins: {}", app.checkin_log.len())));
            session_lines.push(Line::from(format!("Compliant: {}", app.checkin_log.compliant_count())));
            if let Some(latest) = app.checkin_log.latest() {
                let count = app.checkin_log.for_subject(&latest.subject_id).count();
                session_lines.push(Line::from(format!("{}: {} this session", latest.subject_id, count)));
            }
        }
    }
    session_lines.push(Line::from(""));
    session_lines.push(Line::from("Synthetic demo data".dark_gray().italic()));
    frame.render_widget(Paragraph::new(session_lines).block(session_block), summary_chunks[5]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bands() {
        assert_eq!(rating(100).0, "Excellent");
        assert_eq!(rating(80).0, "Good");
        assert_eq!(rating(50).0, "Needs Review");
        assert_eq!(rating(12).0, "Poor");
    }
}
