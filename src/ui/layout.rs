// src/ui/layout.rs

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Defines the areas of the application's user interface.
///
/// Holding the `Rect`s in one struct lets every widget look up its area
/// without re-computing the layout.
pub struct AppLayout {
    pub tabs: Rect,
    pub input: Rect,
    pub report: Rect,
    pub summary: Rect,
    pub footer: Rect,
    pub log_panel: Rect,
}

/// Creates the complete application layout.
///
/// Three vertical bands: a header (screen tabs next to the input box), the main
/// content, and a one-line footer. The content band is split horizontally into
/// the report and the summary, plus the log panel when it is visible.
///
/// # Arguments
/// * `frame_size` - The `Rect` representing the total size of the terminal frame.
/// * `show_logs` - Whether to reserve a column for the log panel.
pub fn create_layout(frame_size: Rect, show_logs: bool) -> AppLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame_size);

    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(44), Constraint::Min(0)])
        .split(main_chunks[0]);

    let content_constraints = if show_logs {
        vec![Constraint::Percentage(45), Constraint::Percentage(20), Constraint::Percentage(35)]
    } else {
        vec![Constraint::Percentage(70), Constraint::Percentage(30)]
    };

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(content_constraints)
        .split(main_chunks[1]);

    AppLayout {
        tabs: header_chunks[0],
        input: header_chunks[1],
        report: content_chunks[0],
        summary: content_chunks[1],
        log_panel: if show_logs { content_chunks[2] } else { Rect::default() },
        footer: main_chunks[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_panel_only_when_requested() {
        let area = Rect::new(0, 0, 120, 40);
        assert_eq!(create_layout(area, false).log_panel, Rect::default());
        let with_logs = create_layout(area, true);
        assert!(with_logs.log_panel.width > 0);
        assert_eq!(with_logs.footer.height, 1);
    }
}
