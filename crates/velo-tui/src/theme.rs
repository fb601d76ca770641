//! Colours and styles shared by every screen.
//!
//! A dark "night map" palette: teal for structure, amber for the things a
//! rider acts on, red for anything that needs a second look.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};

pub const TEAL: Color = Color::Rgb(94, 234, 212);
pub const AMBER: Color = Color::Rgb(251, 191, 36);
pub const GREEN: Color = Color::Rgb(74, 222, 128);
pub const RED: Color = Color::Rgb(248, 113, 113);

pub const TEXT: Color = Color::Rgb(226, 232, 240);
pub const MUTED: Color = Color::Rgb(100, 116, 139);
pub const SURFACE: Color = Color::Rgb(30, 41, 59);
pub const BASE: Color = Color::Rgb(15, 23, 42);

/// Rounded panel with a bold title; the border lights up when focused.
pub fn panel<'a>(title: impl Into<String>, focused: bool) -> Block<'a> {
    let border = if focused { AMBER } else { MUTED };
    Block::default()
        .title(title.into())
        .title_style(heading())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
}

pub fn heading() -> Style {
    Style::default().fg(TEAL).add_modifier(Modifier::BOLD)
}

pub fn column_header() -> Style {
    Style::default()
        .fg(TEAL)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn row() -> Style {
    Style::default().fg(TEXT)
}

pub fn row_selected() -> Style {
    Style::default()
        .fg(AMBER)
        .bg(SURFACE)
        .add_modifier(Modifier::BOLD)
}

/// Low battery, bike not available.
pub fn flagged() -> Style {
    Style::default().fg(RED)
}

/// Book action on a bike that cannot be booked.
pub fn disabled() -> Style {
    Style::default().fg(MUTED).add_modifier(Modifier::CROSSED_OUT)
}

pub fn hint() -> Style {
    Style::default().fg(MUTED)
}

pub fn hint_key() -> Style {
    Style::default().fg(AMBER).add_modifier(Modifier::BOLD)
}
