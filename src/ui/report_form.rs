use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::{FormField, FormItem, ReportForm};
use crate::ui::{get_orange_accent, get_orange_color};

const FIELD_WIDTH: usize = 40;

pub struct ReportFormView<'a> {
    pub form: &'a ReportForm,
    pub can_submit: bool,
}

pub fn render_report_form(frame: &mut Frame, area: Rect, view: &ReportFormView<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(12),
            Constraint::Length(2),
        ])
        .split(area);

    let title = Paragraph::new("🛡  Threat Intelligence Report Generator")
        .style(
            Style::default()
                .fg(get_orange_color())
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(get_orange_accent())),
        )
        .centered();
    frame.render_widget(title, chunks[0]);

    let form = view.form;
    let mut lines = vec![Line::from("")];

    for index in 0..form.total_items() {
        let item = form.item_at(index);
        let selected = index == form.current_field;

        match item {
            FormItem::Domain(domain_index) => {
                let mut spans = field_spans(
                    &format!("Domain/Website #{}", domain_index + 1),
                    &form.domains()[domain_index],
                    false,
                    selected,
                    form.editing,
                );
                if selected && form.can_remove_domain() {
                    spans.push(Span::styled(
                        "  [Ctrl+D remove]",
                        Style::default().fg(Color::Red),
                    ));
                }
                lines.push(Line::from(spans));
            }
            FormItem::AddDomain => {
                lines.push(Line::from(Span::styled(
                    "  ＋ Add another domain",
                    button_style(selected, Color::Cyan, true),
                )));
                lines.push(Line::from(""));
            }
            FormItem::Field(field) => {
                if field == FormField::GeminiApiKey {
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        "(Optional) Gemini API key for enhanced OSINT data gathering:",
                        Style::default().fg(Color::DarkGray),
                    )));
                } else if field == FormField::OpenAiApiKey {
                    lines.push(Line::from(Span::styled(
                        "(Optional) OpenAI API key as fallback:",
                        Style::default().fg(Color::DarkGray),
                    )));
                }
                lines.push(Line::from(field_spans(
                    field.label(),
                    form.field(field),
                    field.is_secret(),
                    selected,
                    form.editing,
                )));
            }
            FormItem::Submit => {
                lines.push(Line::from(""));
                let label = if view.can_submit {
                    "  ▶  Generate Threat Intelligence Report"
                } else {
                    "  ▷  Generate Threat Intelligence Report (fill required fields)"
                };
                lines.push(Line::from(Span::styled(
                    label,
                    button_style(selected, Color::Green, view.can_submit),
                )));
            }
        }
    }

    let form_widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(get_orange_accent()))
                .title("Company Information")
                .title_style(
                    Style::default()
                        .fg(get_orange_color())
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(form_widget, chunks[1]);

    let help_text = if form.editing {
        "Type to edit, Enter/Esc to finish, Ctrl+S to submit"
    } else {
        "↑↓ navigate, Enter edit, Ctrl+S submit, PgUp/PgDn scroll, q quit"
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::DarkGray))
        .centered();
    frame.render_widget(help, chunks[2]);
}

fn field_spans(
    label: &str,
    value: &str,
    secret: bool,
    selected: bool,
    editing: bool,
) -> Vec<Span<'static>> {
    let style = if selected {
        Style::default()
            .fg(get_orange_color())
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let shown = if secret {
        mask_secret(value)
    } else {
        value.to_string()
    };
    let cursor = if selected && editing { "▏" } else { "" };
    let padding = FIELD_WIDTH.saturating_sub(shown.chars().count() + cursor.chars().count());

    vec![
        Span::styled(if selected { "  ▶ " } else { "    " }, style),
        Span::styled(format!("{}: ", label), style),
        Span::styled(format!("{}{}{}", shown, cursor, "_".repeat(padding)), style),
    ]
}

fn button_style(selected: bool, color: Color, enabled: bool) -> Style {
    if !enabled {
        Style::default().fg(Color::DarkGray)
    } else if selected {
        Style::default()
            .fg(Color::Black)
            .bg(color)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(color)
    }
}

/// Keeps the first and last four characters of long keys, stars otherwise.
pub(crate) fn mask_secret(value: &str) -> String {
    let count = value.chars().count();
    if count > 8 {
        let head: String = value.chars().take(4).collect();
        let tail: String = value.chars().skip(count - 4).collect();
        format!("{}...{}", head, tail)
    } else {
        "*".repeat(count)
    }
}
