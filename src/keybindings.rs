//! Keybinding registry: maps keys to actions per screen, with config overrides.
use crate::catalog::Genre;
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    PageDown,
    PageUp,
    JumpTop,
    JumpBottom,
    ToggleContentType,
    NextGenre,
    PrevGenre,
    /// Pick a genre by zero-based index.
    PickGenre(usize),
    Retry,
    Reload,
    OpenPoster,
    GoToLogin,
    Logout,
    SubmitLogin,
    SwitchField,
    CancelLogin,
    CycleTheme,
    ShowHelp,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::NavDown => "Move down",
            Self::NavUp => "Move up",
            Self::PageDown => "Page down",
            Self::PageUp => "Page up",
            Self::JumpTop => "Jump to top",
            Self::JumpBottom => "Jump to bottom",
            Self::ToggleContentType => "Switch Movies / TV Shows",
            Self::NextGenre => "Next genre",
            Self::PrevGenre => "Previous genre",
            Self::PickGenre(i) => match Genre::ALL.get(i) {
                Some(Genre::Action) => "Genre: Action",
                Some(Genre::Comedy) => "Genre: Comedy",
                Some(Genre::Drama) => "Genre: Drama",
                Some(Genre::SciFi) => "Genre: Sci-Fi",
                Some(Genre::Thriller) => "Genre: Thriller",
                None => "Pick genre",
            },
            Self::Retry => "Retry failed page",
            Self::Reload => "Reload trending",
            Self::OpenPoster => "Open poster in browser",
            Self::GoToLogin => "Log in",
            Self::Logout => "Log out",
            Self::SubmitLogin => "Sign in",
            Self::SwitchField => "Switch field",
            Self::CancelLogin => "Back to landing",
            Self::CycleTheme => "Cycle theme",
            Self::ShowHelp => "Show help",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context: the screen whose bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    Landing,
    Login,
    Home,
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ch(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "j", "/"
/// - Named keys: "Enter", "Esc", "Tab", "Up", "Down", "PageDown", "Home"
/// - Modifier combos: "Ctrl+d"
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeySpec::ctrl(c)),
            _ => None,
        };
    }

    let named = match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "pagedown" | "pgdn" => Some(KeyCode::PageDown),
        "pageup" | "pgup" => Some(KeyCode::PageUp),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "backspace" => Some(KeyCode::Backspace),
        "space" => Some(KeyCode::Char(' ')),
        _ => None,
    };
    if let Some(code) = named {
        return Some(KeySpec::plain(code));
    }

    if let Some(n) = s
        .strip_prefix(['F', 'f'])
        .and_then(|rest| rest.parse::<u8>().ok())
    {
        return (1..=12).contains(&n).then(|| KeySpec::plain(KeyCode::F(n)));
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeySpec::ch(c)),
        _ => None,
    }
}

/// Format a KeySpec for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings with default bindings and config overrides.
///
/// The same key can map to different actions on different screens.
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings in registration order, for the help screen.
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn register_defaults(&mut self) {
        use Context::{Global, Home, Landing, Login};

        // === Global ===
        self.bind(Global, KeySpec::ch('q'), Action::Quit);
        self.bind(Global, KeySpec::ch('?'), Action::ShowHelp);
        self.bind(Global, KeySpec::ch('t'), Action::CycleTheme);
        self.bind(Global, KeySpec::ch('j'), Action::NavDown);
        self.bind(Global, KeySpec::plain(KeyCode::Down), Action::NavDown);
        self.bind(Global, KeySpec::ch('k'), Action::NavUp);
        self.bind(Global, KeySpec::plain(KeyCode::Up), Action::NavUp);
        self.bind(Global, KeySpec::ch('o'), Action::OpenPoster);

        // === Landing ===
        self.bind(Landing, KeySpec::ch('l'), Action::GoToLogin);
        self.bind(Landing, KeySpec::plain(KeyCode::Enter), Action::GoToLogin);
        self.bind(Landing, KeySpec::ch('r'), Action::Reload);

        // === Login === (plain characters are text input here)
        self.bind(Login, KeySpec::plain(KeyCode::Enter), Action::SubmitLogin);
        self.bind(Login, KeySpec::plain(KeyCode::Tab), Action::SwitchField);
        self.bind(Login, KeySpec::plain(KeyCode::BackTab), Action::SwitchField);
        self.bind(Login, KeySpec::plain(KeyCode::Esc), Action::CancelLogin);

        // === Home ===
        self.bind(Home, KeySpec::plain(KeyCode::Tab), Action::ToggleContentType);
        self.bind(Home, KeySpec::ch('l'), Action::NextGenre);
        self.bind(Home, KeySpec::plain(KeyCode::Right), Action::NextGenre);
        self.bind(Home, KeySpec::ch('h'), Action::PrevGenre);
        self.bind(Home, KeySpec::plain(KeyCode::Left), Action::PrevGenre);
        for (i, digit) in ['1', '2', '3', '4', '5'].into_iter().enumerate() {
            self.bind(Home, KeySpec::ch(digit), Action::PickGenre(i));
        }
        self.bind(Home, KeySpec::plain(KeyCode::PageDown), Action::PageDown);
        self.bind(Home, KeySpec::ctrl('d'), Action::PageDown);
        self.bind(Home, KeySpec::plain(KeyCode::PageUp), Action::PageUp);
        self.bind(Home, KeySpec::ctrl('u'), Action::PageUp);
        self.bind(Home, KeySpec::ch('g'), Action::JumpTop);
        self.bind(Home, KeySpec::plain(KeyCode::Home), Action::JumpTop);
        self.bind(Home, KeySpec::ch('G'), Action::JumpBottom);
        self.bind(Home, KeySpec::plain(KeyCode::End), Action::JumpBottom);
        self.bind(Home, KeySpec::ch('r'), Action::Retry);
        self.bind(Home, KeySpec::ch('L'), Action::Logout);
    }

    /// Apply user overrides from the config `[keybindings]` table.
    ///
    /// Keys in the map are action names (e.g. "quit", "next_genre"), values
    /// are key strings (e.g. "q", "Ctrl+d", "F5"). The new key replaces every
    /// existing binding of that action, on the same screens.
    ///
    /// Returns warnings for unrecognized action names or unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };

            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = Vec::new();
            for (ctx, _, a) in &self.bindings {
                if *a == action && !contexts.contains(ctx) {
                    contexts.push(*ctx);
                }
            }

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(action = %action_name, key = %key_str, "Applied keybinding override");
        }

        warnings
    }

    /// Action for a key on a screen, falling back to Global bindings.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        let key = KeySpec::new(code, modifiers);
        self.lookup
            .get(&(context, key))
            .or_else(|| self.lookup.get(&(Context::Global, key)))
            .copied()
    }

    /// Action bound on exactly `context`, without the Global fallback.
    ///
    /// Used by the login screen, where unbound characters are typed text.
    pub fn context_action(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        self.lookup
            .get(&(context, KeySpec::new(code, modifiers)))
            .copied()
    }

    /// All bindings as (context, key label, action, description).
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an action name from config.
fn parse_action_name(name: &str) -> Option<Action> {
    let name = name.to_lowercase();
    if let Some(n) = name.strip_prefix("genre_") {
        let idx = n.parse::<usize>().ok()?.checked_sub(1)?;
        return (idx < Genre::ALL.len()).then_some(Action::PickGenre(idx));
    }
    match name.as_str() {
        "quit" => Some(Action::Quit),
        "nav_down" | "down" => Some(Action::NavDown),
        "nav_up" | "up" => Some(Action::NavUp),
        "page_down" | "pagedown" => Some(Action::PageDown),
        "page_up" | "pageup" => Some(Action::PageUp),
        "jump_top" | "top" => Some(Action::JumpTop),
        "jump_bottom" | "bottom" => Some(Action::JumpBottom),
        "toggle_content_type" | "content_type" => Some(Action::ToggleContentType),
        "next_genre" => Some(Action::NextGenre),
        "prev_genre" | "previous_genre" => Some(Action::PrevGenre),
        "retry" => Some(Action::Retry),
        "reload" => Some(Action::Reload),
        "open_poster" | "open" => Some(Action::OpenPoster),
        "login" | "go_to_login" => Some(Action::GoToLogin),
        "logout" => Some(Action::Logout),
        "submit_login" | "submit" => Some(Action::SubmitLogin),
        "switch_field" => Some(Action::SwitchField),
        "cancel_login" | "cancel" => Some(Action::CancelLogin),
        "cycle_theme" | "theme" => Some(Action::CycleTheme),
        "show_help" | "help" => Some(Action::ShowHelp),
        _ => None,
    }
}
