// src/ui/widgets/analysis_view.rs

use crate::app::{App, AppState, SPINNER_CHARS, Screen};
use crate::core::knowledge_base;
use crate::core::models::{CheckInRecord, LocationSource, Severity, Verdict};
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap},
};

pub fn render_analysis_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let title = match app.screen {
        Screen::Moderation => "Moderation Verdict (Navigate with ↑ ↓)",
        Screen::CheckIn => "Check-in (Navigate with ↑ ↓)",
    };
    let main_block = Block::default().borders(Borders::ALL).title(title);

    match app.state {
        AppState::Idle => {
            let hint = match app.screen {
                Screen::Moderation => "Type some content, pick a kind with ← →, press Enter to scan.",
                Screen::CheckIn => "Enter a subject ID, pick a method with ← →, press Enter to check in.",
            };
            let p = Paragraph::new(hint).alignment(Alignment::Center).wrap(Wrap { trim: true });
            frame.render_widget(p.block(main_block), area);
            return;
        }
        AppState::Scanning => {
            render_scanning(frame, app, main_block, area);
            return;
        }
        AppState::Finished if !app.result_visible() => {
            render_scanning(frame, app, main_block, area);
            return;
        }
        AppState::Finished => {}
    }

    let inner_area = main_block.inner(area);
    frame.render_widget(main_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Percentage(40), Constraint::Min(0)])
        .split(inner_area);

    match app.screen {
        Screen::Moderation => {
            // Clone so the list state can be borrowed mutably below.
            if let Some(verdict) = app.verdict.clone() {
                render_verdict(frame, app, &verdict, &chunks);
            }
        }
        Screen::CheckIn => render_check_ins(frame, app, &chunks),
    }
}

fn render_scanning(frame: &mut Frame, app: &App, block: Block, area: Rect) {
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Length(1), Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .horizontal_margin(4)
        .split(inner);

    let label = match app.screen {
        Screen::Moderation => "Analysing content... Please wait.",
        Screen::CheckIn => "Verifying identity and location... Please wait.",
    };
    let spinner_char = SPINNER_CHARS[app.spinner_frame];
    let status = Paragraph::new(Line::from(vec![
        Span::styled(format!("{} ", spinner_char), Style::default().fg(Color::Cyan)),
        Span::raw(label),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(status, rows[1]);

    let gauge = Gauge::default()
        .percent(app.progress.percent() as u16)
        .gauge_style(Style::default().fg(Color::Cyan));
    frame.render_widget(gauge, rows[3]);
}

fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Critical => Style::default().fg(Color::Red),
        Severity::Warning => Style::default().fg(Color::Yellow),
        Severity::Info => Style::default().fg(Color::Cyan),
    }
}

fn render_verdict(frame: &mut Frame, app: &mut App, verdict: &Verdict, chunks: &[Rect]) {
    let (status, status_style) = if verdict.allowed {
        ("✓ APPROVED", Style::default().fg(Color::Green).bold())
    } else {
        ("✗ BLOCKED", Style::default().fg(Color::Red).bold())
    };
    let reasons = if verdict.reasons.is_empty() {
        "No policy violations detected.".to_string()
    } else {
        verdict.reasons.join("; ")
    };
    let header = Text::from(vec![
        Line::from(vec![
            Span::styled(status, status_style),
            Span::raw(format!("  {} content · confidence {:.1}%", verdict.content_kind, verdict.confidence)),
        ]),
        Line::from(reasons),
    ]);
    frame.render_widget(Paragraph::new(header).wrap(Wrap { trim: true }), chunks[0]);

    let items: Vec<ListItem> = verdict
        .category_flags
        .iter()
        .map(|(category, tripped)| {
            let title = knowledge_base::get_category_detail(*category).map_or("Unknown Category", |d| d.title);
            let (icon, style) = if *tripped {
                let severity = knowledge_base::get_category_detail(*category).map_or(Severity::Info, |d| d.severity);
                ("✗ ", severity_style(severity))
            } else {
                ("✓ ", Style::default().fg(Color::Green))
            };
            ListItem::new(Line::from(vec![Span::styled(icon, style), Span::styled(title, style)]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::TOP).title("Category Checks"))
        .highlight_style(Style::new().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
    frame.render_stateful_widget(list, chunks[1], &mut app.analysis_list_state);

    let detail_block = Block::default().borders(Borders::TOP).title("Details");
    let selected = app
        .analysis_list_state
        .selected()
        .and_then(|i| verdict.category_flags.keys().nth(i))
        .and_then(|c| knowledge_base::get_category_detail(*c));

    let text = match selected {
        Some(detail) => Text::from(vec![
            Line::from(""),
            Line::from("WHAT IT IS:".yellow().bold()),
            Line::from(detail.description),
            Line::from(""),
            Line::from("TRIP PROBABILITY:".yellow().bold()),
            Line::from(format!(
                "{:.1}% per scan",
                app.config.moderation.probability_for(detail.category) * 100.0
            )),
        ]),
        None if verdict.allowed => Text::from(vec![
            Line::from(""),
            Line::from("✓ CONTENT CLEARED".bold().fg(Color::Green)),
            Line::from(""),
            Line::from("Every simulated check passed. Select a category above for details."),
        ]),
        None => Text::from("Select a category above to see details."),
    };
    frame.render_widget(
        Paragraph::new(text).wrap(Wrap { trim: true }).alignment(Alignment::Center).block(detail_block),
        chunks[2],
    );
}

fn check_line(label: &str, ok: bool) -> Line<'static> {
    let (icon, style) = if ok {
        ("✓ ", Style::default().fg(Color::Green))
    } else {
        ("✗ ", Style::default().fg(Color::Red))
    };
    Line::from(vec![Span::styled(icon, style), Span::raw(label.to_string())])
}

fn render_check_ins(frame: &mut Frame, app: &mut App, chunks: &[Rect]) {
    let Some(latest) = app.checkin_log.latest().cloned() else {
        return;
    };

    let (status, status_style) = if latest.compliance.is_compliant() {
        ("✓ CHECKED IN", Style::default().fg(Color::Green).bold())
    } else {
        ("⚠ CHECKED IN WITH ISSUES", Style::default().fg(Color::Yellow).bold())
    };
    let header = Text::from(vec![
        Line::from(vec![
            Span::styled(status, status_style),
            Span::raw(format!("  {} via {}", latest.subject_id, latest.method)),
        ]),
        Line::from(format!(
            "{} · {}",
            latest.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            latest.compliance.geofence.as_deref().unwrap_or("no geofence configured")
        )),
    ]);
    frame.render_widget(Paragraph::new(header), chunks[0]);

    let items: Vec<ListItem> = app
        .checkin_log
        .records()
        .iter()
        .map(|r| {
            let style = if r.compliance.is_compliant() {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Yellow)
            };
            ListItem::new(Line::from(vec![
                Span::styled(r.timestamp.format("%H:%M:%S ").to_string(), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{} ({})", r.subject_id, r.method), style),
            ]))
        })
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::TOP).title("History"))
        .highlight_style(Style::new().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
    frame.render_stateful_widget(list, chunks[1], &mut app.analysis_list_state);

    let shown = app
        .analysis_list_state
        .selected()
        .and_then(|i| app.checkin_log.records().get(i))
        .unwrap_or(&latest);
    let detail = Paragraph::new(check_in_details(shown))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::TOP).title("Details"));
    frame.render_widget(detail, chunks[2]);
}

fn check_in_details(record: &CheckInRecord) -> Text<'static> {
    let c = &record.compliance;
    let mut lines = vec![
        check_line(
            &format!("Inside geofence ({:.0} m from center)", c.distance_m),
            c.within_geofence,
        ),
        check_line("Identity verified", c.identity_verified),
        check_line("Within scheduled hours", c.on_schedule),
        Line::from(""),
    ];

    let location = &record.location;
    let source = match location.source {
        LocationSource::Device => Span::styled("device", Style::default().fg(Color::Green)),
        LocationSource::Fallback => Span::styled("fallback (permission denied)", Style::default().fg(Color::Yellow)),
    };
    lines.push(Line::from(vec![
        Span::raw(format!(
            "Location {:.5}, {:.5} ±{:.0} m, source: ",
            location.coordinates.latitude, location.coordinates.longitude, location.accuracy_m
        )),
        source,
    ]));
    if let Some(score) = c.biometric_score {
        lines.push(Line::from(format!("Biometric match score: {score}/100")));
    }
    if let Some(code) = &record.join_code {
        lines.push(Line::from(vec![Span::raw("Join code: "), Span::styled(code.clone(), Style::default().fg(Color::Cyan).bold())]));
    }
    Text::from(lines)
}
