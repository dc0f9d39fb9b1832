//! Home feed: content tabs, genre bar and the infinite list.

use crate::app::App;
use crate::catalog::{ContentType, Genre};
use chrono::{Datelike, Local};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs},
    Frame,
};

use super::render::{catalog_row, SPINNER};

/// Draw the home screen and record the list height used for bottom detection.
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(" MovieRec", app.style("brand")),
        Span::styled("   L: log out", app.style("footer")),
    ]));
    f.render_widget(header, chunks[0]);

    let welcome = Paragraph::new(Line::from(Span::styled(
        " Welcome back, Movie Lover!",
        app.style("hero_title"),
    )));
    f.render_widget(welcome, chunks[1]);

    let selection = app.feed.state().selection();
    let tabs = Tabs::new(ContentType::ALL.iter().map(|t| t.label()))
        .select(selection.content_type as usize)
        .style(app.style("tab_inactive"))
        .highlight_style(app.style("tab_active"))
        .divider("|");
    f.render_widget(tabs, chunks[2]);

    let mut genre_spans = vec![Span::raw(" ")];
    for genre in Genre::ALL {
        let style = if genre == selection.genre {
            app.style("genre_active")
        } else {
            app.style("genre_inactive")
        };
        genre_spans.push(Span::styled(format!(" {} ", genre.label()), style));
        genre_spans.push(Span::raw(" "));
    }
    f.render_widget(Paragraph::new(Line::from(genre_spans)), chunks[3]);

    render_list(f, app, chunks[4]);
    render_load_line(f, app, chunks[5]);

    let footer = Paragraph::new(format!(
        "\u{a9} {} MovieRec. All rights reserved.",
        Local::now().year()
    ))
    .style(app.style("footer"))
    .alignment(Alignment::Center);
    f.render_widget(footer, chunks[6]);
}

fn render_list(f: &mut Frame, app: &mut App, area: Rect) {
    app.home_list_height = area.height.saturating_sub(2) as usize;
    app.follow_home_selection();

    let selection = app.feed.state().selection();
    let title = format!(
        " {} {} ({}) ",
        selection.genre.label(),
        selection.content_type.label(),
        app.feed.state().items().len()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border_focused"))
        .title(Span::styled(title, app.style("section_title")));

    let width = area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .feed
        .state()
        .items()
        .iter()
        .enumerate()
        .skip(app.home_offset)
        .take(app.home_list_height)
        .map(|(i, item)| ListItem::new(catalog_row(app, item, width, i == app.home_selected)))
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

/// "Loading more..." while a page is in flight, the error after a failure.
fn render_load_line(f: &mut Frame, app: &App, area: Rect) {
    let state = app.feed.state();
    let line = if state.is_loading() {
        Span::styled(
            format!("{} Loading more...", SPINNER[app.spinner_frame % SPINNER.len()]),
            app.style("list_loading"),
        )
    } else if let Some(error) = state.last_error() {
        Span::styled(error.to_string(), app.style("list_error"))
    } else {
        Span::raw("")
    };
    f.render_widget(
        Paragraph::new(Line::from(line)).alignment(Alignment::Center),
        area,
    );
}
