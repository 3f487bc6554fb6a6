//! Connection table view.
//!
//! Shows the fixed-width table produced by the core formatter, with the
//! header and separator colored, or the inline error of a failed tick.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, Paragraph};
use tcpwatch_common::types::Report;
use tcpwatch_core::report::{format_header, format_row, format_separator};

use crate::app::App;

/// Builds the styled text for a report.
#[must_use]
pub fn report_text(report: Option<&Report>) -> Text<'static> {
    match report {
        None => Text::from(Line::styled(
            "Reading connections...",
            Style::default().fg(Color::DarkGray),
        )),
        Some(Report::Error { message, .. }) => Text::from(Line::styled(
            message.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Some(Report::Table { connections, .. }) => {
            let mut lines = Vec::with_capacity(connections.len() + 2);
            lines.push(Line::styled(
                format_header(),
                Style::default().fg(Color::Yellow),
            ));
            lines.push(Line::styled(
                format_separator(),
                Style::default().fg(Color::Green),
            ));
            lines.extend(connections.iter().map(|conn| Line::raw(format_row(conn))));
            Text::from(lines)
        }
    }
}

/// Renders the table inside `block`.
pub fn render_table(frame: &mut Frame, area: Rect, app: &App, block: Block<'_>) {
    let paragraph = Paragraph::new(report_text(app.report.as_ref()))
        .block(block)
        .scroll((app.scroll, 0));
    frame.render_widget(paragraph, area);
}
