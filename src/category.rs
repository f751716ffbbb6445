//! Category labels.
//!
//! Categories live in their own collection, but tasks embed a copy of each
//! category they carry. Renaming or recolouring a category therefore leaves
//! existing tasks with the old snapshot; deleting one strips it by id.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// `#rrggbb` in current documents, a CSS class list in older ones.
    pub color: String,
}

impl Category {
    /// Parse `color` as `#rrggbb` (leading `#` optional).
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        parse_hex_color(&self.color)
    }
}

/// Parse a six-digit hex color.
pub fn parse_hex_color(s: &str) -> Option<(u8, u8, u8)> {
    let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Black text on light backgrounds, white on dark ones.
pub fn is_light(rgb: (u8, u8, u8)) -> bool {
    let (r, g, b) = (rgb.0 as u32, rgb.1 as u32, rgb.2 as u32);
    (r * 299 + g * 587 + b * 114) / 1000 > 128
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff8000"), Some((255, 128, 0)));
        assert_eq!(parse_hex_color("0EA5E9"), Some((14, 165, 233)));
        assert_eq!(parse_hex_color("bg-sky-100 text-sky-800"), None);
        assert_eq!(parse_hex_color("#fff"), None);
    }

    #[test]
    fn test_is_light() {
        assert!(is_light((255, 255, 255)));
        assert!(!is_light((0, 0, 0)));
        assert!(is_light((250, 204, 21)));
        assert!(!is_light((30, 64, 175)));
    }
}
