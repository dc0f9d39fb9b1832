//! Input handling for the TUI.
//!
//! Keys are resolved through the keybinding registry for the current
//! screen, then dispatched to that screen's handler.

use crate::app::{App, AppEvent, Screen};
use crate::catalog::Genre;
use crate::keybindings::{Action as KbAction, Context as KbContext};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::Action;

fn screen_context(screen: Screen) -> KbContext {
    match screen {
        Screen::Landing => KbContext::Landing,
        Screen::Login => KbContext::Login,
        Screen::Home => KbContext::Home,
    }
}

/// Main input dispatch function.
pub fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    // Shift is already folded into the character (and into BackTab).
    let modifiers = match code {
        KeyCode::Char(_) | KeyCode::BackTab => modifiers.difference(KeyModifiers::SHIFT),
        _ => modifiers,
    };

    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(Action::Quit);
    }

    if app.show_help {
        return Ok(handle_help_input(app, code));
    }

    match app.screen {
        Screen::Landing => handle_landing_input(app, code, modifiers, event_tx),
        Screen::Login => handle_login_input(app, code, modifiers, event_tx),
        Screen::Home => handle_home_input(app, code, modifiers, event_tx),
    }
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// Actions available on every screen except while typing into the form.
fn handle_global(app: &mut App, action: KbAction) -> Option<Action> {
    match action {
        KbAction::Quit => Some(Action::Quit),
        KbAction::ShowHelp => {
            app.show_help = true;
            app.help_scroll_offset = 0;
            Some(Action::Continue)
        }
        KbAction::CycleTheme => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
            Some(Action::Continue)
        }
        KbAction::OpenPoster => {
            app.open_selected_poster();
            Some(Action::Continue)
        }
        _ => None,
    }
}

fn handle_landing_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    let Some(action) = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Landing)
    else {
        return Ok(Action::Continue);
    };
    if let Some(result) = handle_global(app, action) {
        return Ok(result);
    }

    match action {
        KbAction::NavDown => app.move_landing_selection(1),
        KbAction::NavUp => app.move_landing_selection(-1),
        KbAction::GoToLogin => app.go_to_login(),
        KbAction::Reload => {
            if !app.request_trending(event_tx) {
                app.set_status("Already loading");
            }
        }
        _ => {}
    }
    Ok(Action::Continue)
}

/// Login screen: bound keys act, everything else is typed into the form.
fn handle_login_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    match app
        .keybindings
        .context_action(code, modifiers, screen_context(app.screen))
    {
        Some(KbAction::SubmitLogin) => {
            if let Err(e) = app.submit_login(event_tx) {
                tracing::debug!(error = %e, "Login rejected");
            }
        }
        Some(KbAction::SwitchField) => app.login.switch_field(),
        Some(KbAction::CancelLogin) => app.cancel_login(),
        Some(other) => {
            if let Some(result) = handle_global(app, other) {
                return Ok(result);
            }
        }
        None => match code {
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                app.login.insert_char(c)
            }
            KeyCode::Backspace => app.login.backspace(),
            _ => {}
        },
    }
    Ok(Action::Continue)
}

fn handle_home_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    let Some(action) = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Home)
    else {
        return Ok(Action::Continue);
    };
    if let Some(result) = handle_global(app, action) {
        return Ok(result);
    }

    let page = app.home_list_height.max(1) as isize;
    let genre = app.feed.state().selection().genre;

    match action {
        KbAction::NavDown => app.move_home_selection(1, event_tx),
        KbAction::NavUp => app.move_home_selection(-1, event_tx),
        KbAction::PageDown => app.move_home_selection(page, event_tx),
        KbAction::PageUp => app.move_home_selection(-page, event_tx),
        KbAction::JumpTop => app.move_home_selection(isize::MIN, event_tx),
        KbAction::JumpBottom => app.move_home_selection(isize::MAX, event_tx),
        KbAction::ToggleContentType => app.toggle_content_type(event_tx),
        KbAction::NextGenre => app.select_genre(genre.next(), event_tx),
        KbAction::PrevGenre => app.select_genre(genre.prev(), event_tx),
        KbAction::PickGenre(index) => {
            if let Some(&picked) = Genre::ALL.get(index) {
                app.select_genre(picked, event_tx);
            }
        }
        KbAction::Retry => {
            if !app.feed.retry(event_tx) {
                app.set_status("Nothing to retry");
            }
        }
        KbAction::Logout => app.logout(),
        _ => {}
    }
    Ok(Action::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests_support::test_app;
    use crate::catalog::ContentType;
    use crate::login::LoginError;

    fn press(app: &mut App, code: KeyCode, tx: &mpsc::Sender<AppEvent>) -> Action {
        handle_input(app, code, KeyModifiers::NONE, tx).unwrap()
    }

    fn type_text(app: &mut App, text: &str, tx: &mpsc::Sender<AppEvent>) {
        for c in text.chars() {
            press(app, KeyCode::Char(c), tx);
        }
    }

    #[tokio::test]
    async fn ctrl_c_quits_from_any_screen() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app();
        app.go_to_login();
        let action = handle_input(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL, &tx).unwrap();
        assert_eq!(action, Action::Quit);
    }

    #[tokio::test]
    async fn login_keys_are_typed_not_dispatched() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app();
        press(&mut app, KeyCode::Char('l'), &tx);
        assert_eq!(app.screen, Screen::Login);

        // 'q' and 't' are global bindings elsewhere, text here.
        type_text(&mut app, "qt@x", &tx);
        assert_eq!(app.login.email(), "qt@x");
        assert_eq!(press(&mut app, KeyCode::Char('q'), &tx), Action::Continue);

        press(&mut app, KeyCode::Backspace, &tx);
        assert_eq!(app.login.email(), "qt@x");
    }

    #[tokio::test]
    async fn shift_tab_switches_field() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app();
        app.go_to_login();
        handle_input(&mut app, KeyCode::BackTab, KeyModifiers::SHIFT, &tx).unwrap();
        type_text(&mut app, "pw", &tx);
        assert_eq!(app.login.password_len(), 2);
        assert_eq!(app.login.email(), "");
    }

    #[tokio::test]
    async fn enter_on_empty_form_shows_error() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app();
        app.go_to_login();
        press(&mut app, KeyCode::Enter, &tx);
        assert_eq!(app.login.error(), Some(LoginError::MissingFields));
        assert_eq!(app.screen, Screen::Login);
    }

    #[tokio::test]
    async fn esc_leaves_login() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app();
        app.go_to_login();
        type_text(&mut app, "abc", &tx);
        press(&mut app, KeyCode::Esc, &tx);
        assert_eq!(app.screen, Screen::Landing);
        assert_eq!(app.login.email(), "");
    }

    #[tokio::test]
    async fn help_overlay_captures_keys() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app();
        press(&mut app, KeyCode::Char('?'), &tx);
        assert!(app.show_help);

        // 'l' would go to login without the overlay.
        press(&mut app, KeyCode::Char('l'), &tx);
        assert_eq!(app.screen, Screen::Landing);
        press(&mut app, KeyCode::Char('j'), &tx);
        assert_eq!(app.help_scroll_offset, 1);

        assert_eq!(press(&mut app, KeyCode::Char('q'), &tx), Action::Continue);
        assert!(!app.show_help);
        assert_eq!(app.help_scroll_offset, 0);
    }

    #[tokio::test]
    async fn home_keys_change_selection() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app();
        app.screen = Screen::Home;

        press(&mut app, KeyCode::Char('3'), &tx);
        assert_eq!(app.feed.state().selection().genre, Genre::Drama);

        press(&mut app, KeyCode::Char('l'), &tx);
        assert_eq!(app.feed.state().selection().genre, Genre::SciFi);

        press(&mut app, KeyCode::Left, &tx);
        press(&mut app, KeyCode::Left, &tx);
        assert_eq!(app.feed.state().selection().genre, Genre::Comedy);

        // Out-of-range digits are unbound; wrapping goes through prev().
        press(&mut app, KeyCode::Char('1'), &tx);
        press(&mut app, KeyCode::Char('h'), &tx);
        assert_eq!(app.feed.state().selection().genre, Genre::Thriller);

        press(&mut app, KeyCode::Tab, &tx);
        assert_eq!(app.content_type(), ContentType::Show);
        assert_eq!(app.feed.state().selection().genre, Genre::Thriller);
        assert!(app.feed.state().is_loading());
    }

    #[tokio::test]
    async fn shifted_l_logs_out() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app();
        app.screen = Screen::Home;
        handle_input(&mut app, KeyCode::Char('L'), KeyModifiers::SHIFT, &tx).unwrap();
        assert_eq!(app.screen, Screen::Landing);
    }

    #[tokio::test]
    async fn retry_without_error_reports_status() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app();
        app.screen = Screen::Home;
        press(&mut app, KeyCode::Char('r'), &tx);
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "Nothing to retry");
    }
}
