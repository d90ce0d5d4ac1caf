//! Hex colors accepted on the icon command line.

use std::fmt;
use std::str::FromStr;

use palette::Srgb;
use resvg::tiny_skia::Color;

use crate::error::Error;

/// A `#RGB` or `#RRGGBB` color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor(Srgb<u8>);

impl HexColor {
    /// Returns true for `#` followed by exactly 3 or 6 hex digits.
    pub fn is_valid(s: &str) -> bool {
        match s.strip_prefix('#') {
            Some(digits) => {
                matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
            }
            None => false,
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        (self.0.red, self.0.green, self.0.blue)
    }

    /// The opaque canvas color.
    pub fn to_color(&self) -> Color {
        Color::from_rgba8(self.0.red, self.0.green, self.0.blue, 255)
    }
}

impl FromStr for HexColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !Self::is_valid(s) {
            return Err(Error::InvalidColor(s.to_owned()));
        }
        s.parse::<Srgb<u8>>()
            .map(HexColor)
            .map_err(|_| Error::InvalidColor(s.to_owned()))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = self.rgb();
        write!(f, "#{:02X}{:02X}{:02X}", r, g, b)
    }
}
