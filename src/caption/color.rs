//! RGBA color type, named palette and parsing.

use std::str::FromStr;

/// Represents an RGBA color with floating-point components.
///
/// All components are in the range 0.0 (minimum) to 1.0 (maximum).
///
/// # Examples
///
/// ```
/// use ezshot::caption::Color;
/// let red: Color = "red".parse().unwrap();
/// assert_eq!(red, Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 });
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }

    /// Perceived brightness (ITU-R BT.601 weights).
    pub fn brightness(&self) -> f64 {
        self.r * 0.299 + self.g * 0.587 + self.b * 0.114
    }

    /// Black for light colours, white for dark ones. Used for outlines.
    pub fn contrasting(&self) -> Color {
        if self.brightness() > 0.5 { BLACK } else { WHITE }
    }
}

pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
pub const ORANGE: Color = Color::rgb(1.0, 0.5, 0.0);
pub const PINK: Color = Color::rgb(1.0, 0.0, 1.0);
pub const PURPLE: Color = Color::rgb(0.5, 0.0, 0.5);
pub const CYAN: Color = Color::rgb(0.0, 1.0, 1.0);
pub const GRAY: Color = Color::rgb(0.5, 0.5, 0.5);
pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

/// Maps a colour name to a palette entry (case-insensitive).
pub fn name_to_color(name: &str) -> Option<Color> {
    match name.to_lowercase().as_str() {
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "yellow" => Some(YELLOW),
        "orange" => Some(ORANGE),
        "pink" | "magenta" => Some(PINK),
        "purple" => Some(PURPLE),
        "cyan" => Some(CYAN),
        "gray" | "grey" => Some(GRAY),
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        _ => None,
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::from_rgb8(r, g, b))
        }
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
            Some(Color::from_rgb8(digit(0)?, digit(1)?, digit(2)?))
        }
        _ => None,
    }
}

impl FromStr for Color {
    type Err = String;

    /// Accepts palette names and `#rrggbb` / `#rgb` hex.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = match trimmed.strip_prefix('#') {
            Some(hex) => parse_hex(hex),
            None => name_to_color(trimmed),
        };
        parsed.ok_or_else(|| format!("unknown colour '{trimmed}' (use a name like 'white' or #rrggbb)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!("White".parse::<Color>().unwrap(), WHITE);
        assert_eq!("grey".parse::<Color>().unwrap(), GRAY);
    }

    #[test]
    fn hex_forms_parse() {
        assert_eq!("#ff0000".parse::<Color>().unwrap(), RED);
        assert_eq!("#0f0".parse::<Color>().unwrap(), GREEN);
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
    }

    #[test]
    fn unknown_names_are_rejected() {
        let err = "chartreuse-ish".parse::<Color>().unwrap_err();
        assert!(err.contains("unknown colour"));
    }

    #[test]
    fn outline_contrasts_with_fill() {
        assert_eq!(WHITE.contrasting(), BLACK);
        assert_eq!(BLACK.contrasting(), WHITE);
        assert_eq!(YELLOW.contrasting(), BLACK);
        assert_eq!(BLUE.contrasting(), WHITE);
    }
}
