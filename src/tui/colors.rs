//! Color constants and helpers for the board UI.

use ratatui::style::{Color, Style};

use crate::category::{is_light, Category};
use crate::fields::Status;

/// Used for the Pending column
pub const SLATE: Color = Color::Rgb(100, 116, 139);
/// Used for the In Progress column
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Used for the Complete column
pub const DARK_GREEN: Color = Color::Rgb(0, 80, 0);
/// Used for a card that is being carried
pub const DARK_PURPLE: Color = Color::Rgb(86, 60, 92);

pub fn status_color(status: Status) -> Color {
    match status {
        Status::Pending => SLATE,
        Status::InProgress => GOLD,
        Status::Complete => DARK_GREEN,
    }
}

/// Readable foreground for text drawn on `bg`.
pub fn text_on(bg: Color) -> Color {
    match bg {
        Color::Rgb(r, g, b) if is_light((r, g, b)) => Color::Black,
        _ => Color::White,
    }
}

/// Chip style for a category: its own color as background when it is a hex
/// color, plain gray for older class-list colors.
pub fn category_style(category: &Category) -> Style {
    match category.rgb() {
        Some((r, g, b)) => {
            let bg = Color::Rgb(r, g, b);
            Style::default().bg(bg).fg(text_on(bg))
        }
        None => Style::default().bg(Color::Gray).fg(Color::Black),
    }
}
