//! Render dispatch for the TUI.

use crate::app::{App, Screen};
use crate::catalog::CatalogItem;
use crate::util::{display_width, strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{help, home, landing, login, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 16;

/// Loading animation frames, advanced by the tick handler.
pub(super) const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// One list row: "★ 4.3  Title  Genre".
///
/// Titles come from a remote API, so control characters are stripped before
/// truncating to the row width.
pub(super) fn catalog_row(
    app: &App,
    item: &CatalogItem,
    width: usize,
    selected: bool,
) -> Line<'static> {
    let rating = format!("\u{2605} {:.1}  ", item.rating);
    let genre = if item.genre.is_empty() {
        String::new()
    } else {
        format!("  {}", item.genre)
    };
    let title_width = width.saturating_sub(display_width(&rating) + display_width(&genre));
    let title = strip_control_chars(&item.title);
    let title = truncate_to_width(&title, title_width).into_owned();
    let padding = " ".repeat(title_width.saturating_sub(display_width(&title)));

    let title_style = if selected {
        app.style("item_selected")
    } else {
        app.style("item_title")
    };
    let genre_style = if item.poster_url().is_none() {
        app.style("item_placeholder")
    } else {
        app.style("item_genre")
    };

    Line::from(vec![
        Span::styled(rating, app.style("item_rating")),
        Span::styled(title + &padding, title_style),
        Span::styled(genre, genre_style),
    ])
}

/// Draw the current screen, the status bar, and the help overlay if open.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    match app.screen {
        Screen::Landing => landing::render(f, app, chunks[0]),
        Screen::Login => login::render(f, app, chunks[0]),
        Screen::Home => home::render(f, app, chunks[0]),
    }
    status::render(f, app, chunks[1]);

    if app.show_help {
        help::render(f, app);
    }
}
