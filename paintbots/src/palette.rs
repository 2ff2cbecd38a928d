use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the 16 colors a bot can paint with.
///
/// The server identifies colors by a single hex digit. The RGB values follow
/// the pico-8 palette and are only a display convention.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Color {
    #[serde(rename = "0")]
    Black,
    #[serde(rename = "1")]
    Blue,
    #[serde(rename = "2")]
    Purple,
    #[serde(rename = "3")]
    Green,
    #[serde(rename = "4")]
    Brown,
    #[serde(rename = "5")]
    Grey,
    #[serde(rename = "6")]
    Silver,
    #[serde(rename = "7")]
    White,
    #[serde(rename = "8")]
    Red,
    #[serde(rename = "9")]
    Orange,
    #[serde(rename = "a")]
    Yellow,
    #[serde(rename = "b")]
    BrightGreen,
    #[serde(rename = "c")]
    LightBlue,
    #[serde(rename = "d")]
    DarkGrey,
    #[serde(rename = "e")]
    Pink,
    #[serde(rename = "f")]
    Tan,
}

pub static PALETTE: [Color; 16] = [
    Color::Black,
    Color::Blue,
    Color::Purple,
    Color::Green,
    Color::Brown,
    Color::Grey,
    Color::Silver,
    Color::White,
    Color::Red,
    Color::Orange,
    Color::Yellow,
    Color::BrightGreen,
    Color::LightBlue,
    Color::DarkGrey,
    Color::Pink,
    Color::Tan,
];

impl Color {
    /// The palette index, `0..16`.
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Color> {
        PALETTE.get(usize::from(index)).copied()
    }

    /// The hex digit the server uses for this color.
    pub fn symbol(self) -> char {
        // Indices are always below 16
        char::from_digit(u32::from(self.index()), 16).unwrap_or('0')
    }

    pub fn from_symbol(symbol: char) -> Option<Color> {
        symbol
            .to_digit(16)
            .and_then(|digit| Color::from_index(digit as u8))
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::Blue => "blue",
            Color::Purple => "purple",
            Color::Green => "green",
            Color::Brown => "brown",
            Color::Grey => "grey",
            Color::Silver => "silver",
            Color::White => "white",
            Color::Red => "red",
            Color::Orange => "orange",
            Color::Yellow => "yellow",
            Color::BrightGreen => "bright_green",
            Color::LightBlue => "light_blue",
            Color::DarkGrey => "dark_grey",
            Color::Pink => "pink",
            Color::Tan => "tan",
        }
    }

    /// Display RGB value, see <https://www.pixilart.com/palettes/pico-8-51001>
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Color::Black => [0x00, 0x00, 0x00],
            Color::Blue => [0x1D, 0x2B, 0x53],
            Color::Purple => [0x7E, 0x25, 0x53],
            Color::Green => [0x00, 0x87, 0x51],
            Color::Brown => [0xAB, 0x52, 0x36],
            Color::Grey => [0x5F, 0x57, 0x4F],
            Color::Silver => [0xC2, 0xC3, 0xC7],
            Color::White => [0xFF, 0xF1, 0xE8],
            Color::Red => [0xFF, 0x00, 0x4D],
            Color::Orange => [0xFF, 0xA3, 0x00],
            Color::Yellow => [0xFF, 0xEC, 0x27],
            Color::BrightGreen => [0x00, 0xE4, 0x36],
            Color::LightBlue => [0x29, 0xAD, 0xFF],
            Color::DarkGrey => [0x83, 0x76, 0x9C],
            Color::Pink => [0xFF, 0x77, 0xA8],
            Color::Tan => [0xFF, 0xCC, 0xAA],
        }
    }

    /// The RGB value as a `#RRGGBB` string.
    pub fn hex_rgb(self) -> String {
        let [r, g, b] = self.rgb();
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// The error type for the [`FromStr`] instance of [`Color`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is neither a palette symbol (0-9, a-f) nor a color name")]
pub struct UnknownColor(pub String);

/// Accepts either the hex symbol or the color name, e.g. `"8"` or `"red"`.
impl FromStr for Color {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        if let (Some(symbol), None) = (chars.next(), chars.next()) {
            return Color::from_symbol(symbol).ok_or_else(|| UnknownColor(s.to_string()));
        }
        let normalized = trimmed.to_ascii_lowercase().replace(['-', ' '], "_");
        let normalized = normalized.replace("gray", "grey");
        PALETTE
            .iter()
            .copied()
            .find(|color| color.name() == normalized)
            .ok_or_else(|| UnknownColor(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;

    quickcheck! {
        fn symbol_and_name_parse_back(color: Color) -> bool {
            color.symbol().to_string().parse::<Color>() == Ok(color)
                && color.name().parse::<Color>() == Ok(color)
        }
    }

    #[test]
    fn palette_is_ordered_by_index() {
        for (i, color) in PALETTE.iter().enumerate() {
            assert_eq!(usize::from(color.index()), i);
        }
        assert_eq!(Color::from_index(16), None);
    }

    #[test]
    fn symbols_are_lowercase_hex() {
        let symbols: String = PALETTE.iter().map(|c| c.symbol()).collect();
        assert_eq!(symbols, "0123456789abcdef");
    }

    #[test]
    fn parse_is_lenient_about_case_and_separators() {
        assert_eq!("A".parse::<Color>(), Ok(Color::Yellow));
        assert_eq!("Light Blue".parse::<Color>(), Ok(Color::LightBlue));
        assert_eq!("dark-gray".parse::<Color>(), Ok(Color::DarkGrey));
        assert_eq!("RED".parse::<Color>(), Ok(Color::Red));
        assert!("g".parse::<Color>().is_err());
        assert!("magenta".parse::<Color>().is_err());
        assert!("".parse::<Color>().is_err());
    }

    #[test]
    fn unknown_color_names_the_input() {
        let err = "magenta".parse::<Color>().unwrap_err();
        assert_eq!(err, UnknownColor(String::from("magenta")));
        assert_eq!(
            err.to_string(),
            "'magenta' is neither a palette symbol (0-9, a-f) nor a color name"
        );
        let source: &dyn std::error::Error = &err;
        assert!(source.source().is_none());
    }

    #[test]
    fn rgb_values() {
        assert_eq!(Color::Red.hex_rgb(), "#FF004D");
        assert_eq!(Color::Black.hex_rgb(), "#000000");
        assert_eq!(Color::Tan.hex_rgb(), "#FFCCAA");
    }

    #[test]
    fn serde_uses_symbols() {
        assert_eq!(serde_json::to_string(&Color::Pink).unwrap(), "\"e\"");
        assert_eq!(
            serde_json::from_str::<Color>("\"c\"").unwrap(),
            Color::LightBlue
        );
    }
}
