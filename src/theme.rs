//! Theme system for the TUI.
//!
//! Screens ask for styles by semantic role (`"item_selected"`,
//! `"form_error"`, ...) and never name colors directly. [`ThemeVariant`]
//! picks a palette and [`StyleMap`] resolves role names against it.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

/// Teal accent used for brand text and focus.
const TEAL: Color = Color::Rgb(20, 184, 166);
const DEEP_TEAL: Color = Color::Rgb(15, 118, 110);

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

/// Every styled element of the UI, one field per role.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Landing --
    pub brand: Style,
    pub hero_title: Style,
    pub hero_tagline: Style,
    pub section_title: Style,
    pub footer: Style,

    // -- Item lists --
    pub item_title: Style,
    pub item_selected: Style,
    pub item_rating: Style,
    pub item_genre: Style,
    pub list_loading: Style,
    pub list_error: Style,

    // -- Home filters --
    pub tab_active: Style,
    pub tab_inactive: Style,
    pub genre_active: Style,
    pub genre_inactive: Style,

    // -- Login form --
    pub form_label: Style,
    pub form_input: Style,
    pub form_input_focused: Style,
    pub form_error: Style,
    pub form_button: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            brand: Style::default().fg(TEAL).add_modifier(Modifier::BOLD),
            hero_title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            hero_tagline: Style::default().fg(Color::Gray),
            section_title: Style::default().fg(TEAL).add_modifier(Modifier::BOLD),
            footer: Style::default().fg(Color::DarkGray),

            item_title: Style::default(),
            item_selected: Style::default().bg(DEEP_TEAL).fg(Color::White),
            item_rating: Style::default().fg(Color::Yellow),
            item_genre: Style::default().fg(Color::DarkGray),
            list_loading: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            list_error: Style::default().fg(Color::Red),

            tab_active: Style::default()
                .fg(Color::Black)
                .bg(TEAL)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            genre_active: Style::default()
                .fg(TEAL)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            genre_inactive: Style::default().fg(Color::Gray),

            form_label: Style::default().fg(Color::Gray),
            form_input: Style::default().fg(Color::White),
            form_input_focused: Style::default().fg(TEAL),
            form_error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            form_button: Style::default()
                .fg(Color::Black)
                .bg(TEAL)
                .add_modifier(Modifier::BOLD),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(TEAL),
        }
    }

    fn light() -> Self {
        Self {
            brand: Style::default().fg(DEEP_TEAL).add_modifier(Modifier::BOLD),
            hero_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            hero_tagline: Style::default().fg(Color::DarkGray),
            section_title: Style::default()
                .fg(DEEP_TEAL)
                .add_modifier(Modifier::BOLD),
            footer: Style::default().fg(Color::DarkGray),

            item_title: Style::default().fg(Color::Black),
            item_selected: Style::default().bg(DEEP_TEAL).fg(Color::White),
            item_rating: Style::default().fg(Color::Magenta),
            item_genre: Style::default().fg(Color::DarkGray),
            list_loading: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            list_error: Style::default().fg(Color::Red),

            tab_active: Style::default()
                .fg(Color::White)
                .bg(DEEP_TEAL)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            genre_active: Style::default()
                .fg(DEEP_TEAL)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            genre_inactive: Style::default().fg(Color::DarkGray),

            form_label: Style::default().fg(Color::DarkGray),
            form_input: Style::default().fg(Color::Black),
            form_input_focused: Style::default().fg(DEEP_TEAL),
            form_error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            form_button: Style::default()
                .fg(Color::White)
                .bg(DEEP_TEAL)
                .add_modifier(Modifier::BOLD),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::Gray),
            panel_border_focused: Style::default().fg(DEEP_TEAL),
        }
    }
}

// ============================================================================
// Style Map
// ============================================================================

/// String-keyed style lookup built from a [`ColorPalette`].
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

const ROLE_NAMES: [&str; 24] = [
    "brand",
    "hero_title",
    "hero_tagline",
    "section_title",
    "footer",
    "item_title",
    "item_selected",
    "item_rating",
    "item_genre",
    "list_loading",
    "list_error",
    "tab_active",
    "tab_inactive",
    "genre_active",
    "genre_inactive",
    "form_label",
    "form_input",
    "form_input_focused",
    "form_error",
    "form_button",
    "status_bar",
    "panel_border",
    "panel_border_focused",
    // Placeholder rows share the genre style.
    "item_placeholder",
];

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 24] = [
            p.brand,
            p.hero_title,
            p.hero_tagline,
            p.section_title,
            p.footer,
            p.item_title,
            p.item_selected,
            p.item_rating,
            p.item_genre,
            p.list_loading,
            p.list_error,
            p.tab_active,
            p.tab_inactive,
            p.genre_active,
            p.genre_inactive,
            p.form_label,
            p.form_input,
            p.form_input_focused,
            p.form_error,
            p.form_button,
            p.status_bar,
            p.panel_border,
            p.panel_border_focused,
            p.item_genre,
        ];

        let map = ROLE_NAMES
            .iter()
            .copied()
            .zip(styles)
            .collect::<HashMap<_, _>>();
        Self { map }
    }

    /// Style for `role`, or `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_from_str_name() {
        assert_eq!(ThemeVariant::from_str_name("dark"), Some(ThemeVariant::Dark));
        assert_eq!(ThemeVariant::from_str_name("Light"), Some(ThemeVariant::Light));
        assert_eq!(ThemeVariant::from_str_name("neon"), None);
    }

    #[test]
    fn cycling_returns_to_start() {
        let v = ThemeVariant::Dark;
        assert_eq!(v.next(), ThemeVariant::Light);
        assert_eq!(v.next().next(), v);
    }

    #[test]
    fn selection_differs_between_variants() {
        let dark = ThemeVariant::Dark.palette();
        let light = ThemeVariant::Light.palette();
        assert_ne!(dark.item_title, light.item_title);
        assert_ne!(dark.status_bar, light.status_bar);
    }

    #[test]
    fn style_map_resolves_every_role() {
        let palette = ThemeVariant::Dark.palette();
        let sm = StyleMap::from_palette(&palette);
        assert_eq!(sm.map.len(), ROLE_NAMES.len());
        assert_eq!(sm.resolve("item_selected"), palette.item_selected);
        assert_eq!(sm.resolve("form_error"), palette.form_error);
        assert_eq!(sm.resolve("item_placeholder"), palette.item_genre);
    }

    #[test]
    fn unknown_role_is_default() {
        let sm = StyleMap::from_palette(&ThemeVariant::Light.palette());
        assert_eq!(sm.resolve("feed_unread"), Style::default());
    }
}
