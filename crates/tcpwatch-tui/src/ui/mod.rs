//! Screen layout: a bordered table view above a one-line key legend.

pub mod table;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};
use tcpwatch_common::constants::APP_TITLE;

use crate::app::App;

const KEY_LEGEND: &str = " q quit | Up/Down scroll | PgUp/PgDn page | Home/End jump";

/// Describes when the shown report was taken and how it refreshes.
#[must_use]
pub fn status_text(app: &App) -> String {
    let Some(report) = &app.report else {
        return "waiting for first refresh".into();
    };
    let at = report.taken_at().format("%H:%M:%S");
    if app.live && !app.refresh_stopped {
        format!("refreshed {at}, every {}s", app.interval_secs)
    } else {
        format!("snapshot {at}")
    }
}

/// Renders the whole screen.
pub fn draw(frame: &mut Frame, app: &App) {
    let [main, footer] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

    let block = Block::bordered()
        .title(format!(" {APP_TITLE} "))
        .title_bottom(Line::from(format!(" {} ", status_text(app))).right_aligned());
    table::render_table(frame, main, app, block);

    frame.render_widget(
        Paragraph::new(KEY_LEGEND).style(Style::default().fg(Color::DarkGray)),
        footer,
    );
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use chrono::Local;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use tcpwatch_common::config::MonitorConfig;
    use tcpwatch_common::types::{ProcessInfo, Report, TcpConnection, TcpState};

    use super::*;

    fn render(app: &App) -> (String, ratatui::buffer::Buffer) {
        let mut terminal = Terminal::new(TestBackend::new(110, 8)).unwrap();
        let _ = terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut screen = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                screen.push_str(buffer[(x, y)].symbol());
            }
            screen.push('\n');
        }
        (screen, buffer)
    }

    #[test]
    fn empty_app_shows_placeholder_and_title() {
        let app = App::new(&MonitorConfig::default());
        let (screen, _) = render(&app);
        assert!(screen.contains("TCP Monitor"));
        assert!(screen.contains("Reading connections..."));
        assert!(screen.contains("waiting for first refresh"));
        assert!(screen.contains("q quit"));
    }

    #[test]
    fn table_report_renders_owned_row() {
        let mut conn = TcpConnection::new(
            Ipv4Addr::LOCALHOST,
            8080,
            Ipv4Addr::UNSPECIFIED,
            0,
            TcpState::Listen,
        );
        conn.set_owner(&ProcessInfo::new(100, "demo"));
        let mut app = App::new(&MonitorConfig::default());
        app.apply_report(Report::Table {
            connections: vec![conn],
            taken_at: Local::now(),
        });

        let (screen, buffer) = render(&app);
        assert!(screen.contains("Local Address"));
        assert!(screen.contains("127.0.0.1            8080"));
        assert!(screen.contains("LISTEN       100      demo"));
        assert!(screen.contains("every 2s"));
        assert_eq!(buffer[(1, 1)].fg, Color::Yellow);
        assert_eq!(buffer[(1, 2)].fg, Color::Green);
    }

    #[test]
    fn error_report_is_red() {
        let mut app = App::new(&MonitorConfig::default());
        app.apply_report(Report::Error {
            message: "Error reading TCP connections: denied".into(),
            taken_at: Local::now(),
        });

        let (screen, buffer) = render(&app);
        assert!(screen.contains("Error reading TCP connections: denied"));
        assert_eq!(buffer[(1, 1)].fg, Color::Red);
    }

    #[test]
    fn single_shot_status_says_snapshot() {
        let config = MonitorConfig {
            live: false,
            ..MonitorConfig::default()
        };
        let mut app = App::new(&config);
        app.apply_report(Report::Table {
            connections: Vec::new(),
            taken_at: Local::now(),
        });
        assert!(status_text(&app).starts_with("snapshot "));
    }
}
