use crate::app::{App, Screen};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else {
        match app.screen {
            Screen::Landing => {
                Cow::Borrowed("[l]og in [j/k]move [o]pen poster [r]eload [t]heme [?]help [q]uit")
            }
            Screen::Login => Cow::Borrowed("[Tab]switch field [Enter]sign in [Esc]back"),
            Screen::Home => Cow::Owned(format!(
                "[Tab]movies/tv [h/l]genre [j/k]move [r]etry [L]og out [?]help [q]uit | {}",
                app.feed.source_name()
            )),
        }
    };

    let paragraph = Paragraph::new(text).style(app.style("status_bar"));
    f.render_widget(paragraph, area);
}
