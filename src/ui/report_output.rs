use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::SubmissionState;
use crate::ui::{get_orange_accent, get_orange_color};

const TAB_WIDTH: usize = 8;
const SPINNER: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

pub struct ReportOutputView<'a> {
    pub submission: &'a SubmissionState,
    pub tick: usize,
    pub scroll: u16,
}

pub fn render_report_output(frame: &mut Frame, area: Rect, view: &ReportOutputView<'_>) {
    let lines: Vec<Line> = match view.submission {
        SubmissionState::Idle => vec![Line::from(Span::styled(
            "Fill in the company details and generate a report.",
            Style::default().fg(Color::DarkGray),
        ))],
        SubmissionState::Loading => vec![Line::from(Span::styled(
            format!(
                "{} Generating report...",
                SPINNER[view.tick % SPINNER.len()]
            ),
            Style::default().fg(Color::Yellow),
        ))],
        SubmissionState::Success(report) => report
            .lines()
            .map(|line| Line::from(Span::styled(expand_tabs(line), Style::default().fg(Color::White))))
            .collect(),
        SubmissionState::Failed(message) => vec![
            Line::from(Span::styled(
                "Report request failed:",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(message.clone(), Style::default().fg(Color::Red))),
        ],
    };

    let output = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(get_orange_accent()))
                .title("Report Output")
                .title_style(
                    Style::default()
                        .fg(get_orange_color())
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .wrap(Wrap { trim: false })
        .scroll((view.scroll, 0));
    frame.render_widget(output, area);
}

/// Tabs render zero-width in ratatui; replace them with spaces up to the next stop.
fn expand_tabs(line: &str) -> String {
    let mut expanded = String::with_capacity(line.len());
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let width = TAB_WIDTH - column % TAB_WIDTH;
            expanded.extend(std::iter::repeat_n(' ', width));
            column += width;
        } else {
            expanded.push(c);
            column += 1;
        }
    }
    expanded
}
