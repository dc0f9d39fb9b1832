//! Sign-in form.

use crate::app::App;
use crate::login::Field;
use crate::util::truncate_to_width;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::help::centered_rect;
use super::render::SPINNER;

/// Mask character for the password field.
const MASK: char = '\u{2022}';

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let form_area = centered_rect(60, 70, area);
    if form_area.width < 20 || form_area.height < 12 {
        return;
    }
    f.render_widget(Clear, form_area);

    let field_width = form_area.width.saturating_sub(6) as usize;
    let form = &app.login;

    let input_line = |text: String, field: Field| {
        let focused = form.focus() == field;
        let (style, cursor) = if focused {
            (app.style("form_input_focused"), "_")
        } else {
            (app.style("form_input"), "")
        };
        // Keep the tail visible while typing past the field width.
        let shown = if text.chars().count() >= field_width {
            let skip = text.chars().count() + 1 - field_width;
            text.chars().skip(skip).collect::<String>()
        } else {
            text
        };
        Line::from(Span::styled(format!(" > {}{}", shown, cursor), style))
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(" Email address", app.style("form_label"))),
        input_line(form.email().to_string(), Field::Email),
        Line::from(""),
        Line::from(Span::styled(" Password", app.style("form_label"))),
        input_line(MASK.to_string().repeat(form.password_len()), Field::Password),
        Line::from(""),
    ];

    let button = if form.is_submitting() {
        format!("{} Signing in...", SPINNER[app.spinner_frame % SPINNER.len()])
    } else {
        "[ Log in ]".to_string()
    };
    lines.push(Line::from(Span::styled(button, app.style("form_button"))).alignment(Alignment::Center));

    if let Some(error) = form.error() {
        lines.push(Line::from(""));
        let msg = error.to_string();
        lines.push(
            Line::from(Span::styled(
                truncate_to_width(&msg, field_width).into_owned(),
                app.style("form_error"),
            ))
            .alignment(Alignment::Center),
        );
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.style("panel_border_focused"))
            .title(Span::styled(" Log in to your account ", app.style("section_title"))),
    );
    f.render_widget(paragraph, form_area);
}
