//! Centralized theming for the gust TUI.
//!
//! One palette, pre-composed into the styles the panes use.

use ratatui::style::{Color, Modifier, Style};

/// Catppuccin Mocha color palette
mod catppuccin {
    use super::Color;

    // Background layers (darkest to lightest)
    pub const BASE: Color = Color::Rgb(30, 30, 46); // #1e1e2e - main background
    pub const MANTLE: Color = Color::Rgb(24, 24, 37); // #181825 - status bar, panels
    pub const SURFACE0: Color = Color::Rgb(49, 50, 68); // #313244 - borders
    pub const SURFACE1: Color = Color::Rgb(69, 71, 90); // #45475a - selection

    // Text colors
    pub const TEXT: Color = Color::Rgb(205, 214, 244); // #cdd6f4 - primary
    pub const SUBTEXT1: Color = Color::Rgb(186, 194, 222); // #bac2de - secondary
    pub const OVERLAY0: Color = Color::Rgb(108, 112, 134); // #6c7086 - muted/disabled

    // Accent colors
    pub const LAVENDER: Color = Color::Rgb(180, 190, 254); // #b4befe - focused borders
    pub const BLUE: Color = Color::Rgb(137, 180, 250); // #89b4fa - links, accent
    pub const GREEN: Color = Color::Rgb(166, 227, 161); // #a6e3a1 - authorized
    pub const YELLOW: Color = Color::Rgb(249, 226, 175); // #f9e2af - spinner, stars, matches
    pub const PEACH: Color = Color::Rgb(250, 179, 135); // #fab387 - thread badges
    pub const RED: Color = Color::Rgb(243, 139, 168); // #f38ba8 - errors
    pub const MAUVE: Color = Color::Rgb(203, 166, 247); // #cba6f7 - unread indicator
}

/// UI symbols - centralized for consistency
pub mod symbols {
    pub const UNREAD: &str = "●";
    pub const READ: &str = " ";
    pub const STARRED: &str = "★";
    pub const AUTHORIZED: &str = "●";
    pub const UNAUTHORIZED: &str = "○";
}

/// Pre-composed styles for common UI elements
pub struct Theme;

impl Theme {
    // === Text Styles ===

    pub fn text() -> Style {
        Style::default().fg(catppuccin::TEXT).bg(catppuccin::BASE)
    }

    pub fn text_secondary() -> Style {
        Style::default()
            .fg(catppuccin::SUBTEXT1)
            .bg(catppuccin::BASE)
    }

    pub fn text_muted() -> Style {
        Style::default()
            .fg(catppuccin::OVERLAY0)
            .bg(catppuccin::BASE)
    }

    pub fn text_unread() -> Style {
        Self::text().add_modifier(Modifier::BOLD)
    }

    pub fn text_accent() -> Style {
        Style::default().fg(catppuccin::BLUE).bg(catppuccin::BASE)
    }

    /// Search match inside a row.
    pub fn match_highlight() -> Style {
        Style::default()
            .fg(catppuccin::YELLOW)
            .add_modifier(Modifier::BOLD)
    }

    // === Status Bar ===

    pub fn status_bar() -> Style {
        Style::default()
            .bg(catppuccin::MANTLE)
            .fg(catppuccin::TEXT)
    }

    pub fn status_syncing() -> Style {
        Style::default()
            .bg(catppuccin::MANTLE)
            .fg(catppuccin::YELLOW)
    }

    pub fn status_authorized() -> Style {
        Style::default()
            .bg(catppuccin::MANTLE)
            .fg(catppuccin::GREEN)
    }

    pub fn status_unauthorized() -> Style {
        Style::default().bg(catppuccin::MANTLE).fg(catppuccin::RED)
    }

    pub fn status_muted() -> Style {
        Style::default()
            .bg(catppuccin::MANTLE)
            .fg(catppuccin::OVERLAY0)
    }

    pub fn error_bar() -> Style {
        Style::default().bg(catppuccin::RED).fg(catppuccin::BASE)
    }

    // === Help Bar ===

    pub fn help_key() -> Style {
        Style::default()
            .bg(catppuccin::MANTLE)
            .fg(catppuccin::YELLOW)
    }

    pub fn help_desc() -> Style {
        Style::default()
            .bg(catppuccin::MANTLE)
            .fg(catppuccin::OVERLAY0)
    }

    // === Borders ===

    pub fn border() -> Style {
        Style::default()
            .fg(catppuccin::SURFACE0)
            .bg(catppuccin::BASE)
    }

    pub fn border_focused() -> Style {
        Style::default()
            .fg(catppuccin::LAVENDER)
            .bg(catppuccin::BASE)
    }

    pub fn main_bg() -> Style {
        Style::default().bg(catppuccin::BASE)
    }

    // === Indicators ===

    pub fn unread_indicator() -> Style {
        Style::default().fg(catppuccin::MAUVE).bg(catppuccin::BASE)
    }

    pub fn unread_indicator_selected() -> Style {
        Style::default()
            .bg(catppuccin::SURFACE1)
            .fg(catppuccin::MAUVE)
    }

    pub fn star_indicator() -> Style {
        Style::default()
            .fg(catppuccin::YELLOW)
            .bg(catppuccin::BASE)
    }

    pub fn star_indicator_selected() -> Style {
        Style::default()
            .bg(catppuccin::SURFACE1)
            .fg(catppuccin::YELLOW)
    }

    pub fn thread_badge() -> Style {
        Style::default().fg(catppuccin::PEACH).bg(catppuccin::BASE)
    }

    // === Labels ===

    pub fn label() -> Style {
        Style::default()
            .bg(catppuccin::MANTLE)
            .fg(catppuccin::OVERLAY0)
    }

    pub fn label_active() -> Style {
        Style::default()
            .bg(catppuccin::MANTLE)
            .fg(catppuccin::BLUE)
            .add_modifier(Modifier::BOLD)
    }

    pub fn label_badge() -> Style {
        Style::default()
            .bg(catppuccin::MANTLE)
            .fg(catppuccin::PEACH)
    }

    // === Login Overlay ===

    pub fn title() -> Style {
        Style::default()
            .fg(catppuccin::BLUE)
            .bg(catppuccin::BASE)
            .add_modifier(Modifier::BOLD)
    }
}

/// Merge a style with the selection or main background so a highlight
/// covers the whole row.
pub fn with_selection_bg(style: Style, selected: bool) -> Style {
    if selected {
        style.bg(catppuccin::SURFACE1)
    } else {
        style.bg(catppuccin::BASE)
    }
}
