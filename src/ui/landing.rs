//! Landing screen: brand header, hero, trending list and footer.

use crate::app::App;
use crate::landing::LandingStatus;
use chrono::{Datelike, Local};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::render::{catalog_row, SPINNER};

const HERO_TITLE: &str = "Discover, Rate, and Review Your Favorite Movies & Shows";
const HERO_TAGLINE: &str =
    "Join the MovieRec community and share your passion for cinema and television";

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(5),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let brand = Paragraph::new(Line::from(vec![
        Span::styled(" MovieRec", app.style("brand")),
        Span::styled("   l: log in", app.style("footer")),
    ]));
    f.render_widget(brand, chunks[0]);

    let hero = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(HERO_TITLE, app.style("hero_title"))),
        Line::from(Span::styled(HERO_TAGLINE, app.style("hero_tagline"))),
        Line::from(""),
        Line::from(Span::styled("Press l to get started", app.style("form_button"))),
    ])
    .alignment(Alignment::Center);
    f.render_widget(hero, chunks[1]);

    render_featured(f, app, chunks[2]);

    let footer = Paragraph::new(format!(
        "\u{a9} {} MovieRec. All rights reserved.",
        Local::now().year()
    ))
    .style(app.style("footer"))
    .alignment(Alignment::Center);
    f.render_widget(footer, chunks[3]);
}

/// "Featured This Week": the trending list, or its loading or failure line.
fn render_featured(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border_focused"))
        .title(Span::styled(" Featured This Week ", app.style("section_title")));

    let placeholder = match app.landing.status() {
        LandingStatus::Idle => Some(Span::styled("", app.style("list_loading"))),
        LandingStatus::Loading => Some(Span::styled(
            format!("{} Loading trending titles...", SPINNER[app.spinner_frame % SPINNER.len()]),
            app.style("list_loading"),
        )),
        LandingStatus::Failed(msg) => Some(Span::styled(
            format!("Could not load trending titles: {}", msg),
            app.style("list_error"),
        )),
        LandingStatus::Loaded if app.landing.items().is_empty() => Some(Span::styled(
            "Nothing is trending right now",
            app.style("list_loading"),
        )),
        LandingStatus::Loaded => None,
    };

    if let Some(line) = placeholder {
        let paragraph = Paragraph::new(Line::from(line))
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let width = area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .landing
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| ListItem::new(catalog_row(app, item, width, i == app.landing_selected)))
        .collect();

    let mut state = ListState::default().with_selected(Some(app.landing_selected));
    f.render_stateful_widget(List::new(items).block(block), area, &mut state);
}
