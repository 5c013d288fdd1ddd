mod report_form;
mod report_output;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Color,
};

pub use report_form::{ReportFormView, render_report_form};
pub use report_output::{ReportOutputView, render_report_output};

pub fn get_orange_color() -> Color {
    Color::Rgb(255, 140, 0)
}

pub fn get_orange_accent() -> Color {
    Color::Rgb(205, 102, 0)
}

/// Form on the left, report output on the right.
pub fn split_screen(frame: &Frame) -> [Rect; 2] {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(frame.area());

    [chunks[0], chunks[1]]
}
