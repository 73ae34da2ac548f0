//! Screen colors, based on the fan page palette
//! Individual colors can be overridden from the `[colors]` config table

use ratatui::style::Color;

use crate::config::ColorOverrides;

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub accent: Color,    // Enabled buttons, key hints, focused borders
    pub header: Color,    // Title bar
    pub disabled: Color,  // Disabled buttons
    pub danger: Color,    // Error indicator
    pub text: Color,
    pub text_dim: Color,
    pub border: Color,    // Card borders
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Rgb(69, 182, 156),    // #45B69C
            header: Color::Rgb(76, 161, 175),    // #4CA1AF
            disabled: Color::Rgb(156, 163, 175), // gray-400
            danger: Color::Rgb(211, 95, 95),
            text: Color::Rgb(244, 244, 244),
            text_dim: Color::Rgb(163, 213, 224),
            border: Color::Rgb(88, 91, 112),
        }
    }
}

impl Theme {
    /// Default palette with any valid overrides applied
    pub fn from_overrides(overrides: &ColorOverrides) -> Self {
        let mut theme = Self::default();

        let slots = [
            (&overrides.accent, &mut theme.accent, "accent"),
            (&overrides.header, &mut theme.header, "header"),
            (&overrides.disabled, &mut theme.disabled, "disabled"),
            (&overrides.danger, &mut theme.danger, "danger"),
        ];

        for (value, slot, name) in slots {
            let Some(value) = value else { continue };
            match parse_hex_color(value) {
                Some(color) => *slot = color,
                None => tracing::warn!("Ignoring invalid {} color: {}", name, value),
            }
        }

        theme
    }
}

/// Parse a hex color string (#RRGGBB or #RGB)
fn parse_hex_color(s: &str) -> Option<Color> {
    let s = s.trim().trim_start_matches('#');

    if !s.is_ascii() {
        return None;
    }

    if s.len() == 6 {
        let r = u8::from_str_radix(&s[0..2], 16).ok()?;
        let g = u8::from_str_radix(&s[2..4], 16).ok()?;
        let b = u8::from_str_radix(&s[4..6], 16).ok()?;
        Some(Color::Rgb(r, g, b))
    } else if s.len() == 3 {
        let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
        let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
        let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
        Some(Color::Rgb(r, g, b))
    } else {
        None
    }
}
