use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

// Leftmost match wins; at the same offset the earlier alternative wins.
static COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Blue|Green|Light-Blue|Pink|Red|White|Orange").expect("color pattern compiles")
});

/// Semantic color of an asset, derived from its file name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ColorTag {
    /// `Blue`
    Blue,
    /// `Green`
    Green,
    /// `Light-Blue`
    LightBlue,
    /// `Pink`
    Pink,
    /// `Red`
    Red,
    /// `White`
    White,
    /// `Orange`
    Orange,
    /// No known color token. Compatible with every other tag.
    Greyscale,
}

impl ColorTag {
    /// Every tag, wildcard last.
    pub const ALL: [ColorTag; 8] = [
        ColorTag::Blue,
        ColorTag::Green,
        ColorTag::LightBlue,
        ColorTag::Pink,
        ColorTag::Red,
        ColorTag::White,
        ColorTag::Orange,
        ColorTag::Greyscale,
    ];

    /// Token as it appears in asset names (`greyscale` for the wildcard).
    pub fn token(self) -> &'static str {
        match self {
            ColorTag::Blue => "Blue",
            ColorTag::Green => "Green",
            ColorTag::LightBlue => "Light-Blue",
            ColorTag::Pink => "Pink",
            ColorTag::Red => "Red",
            ColorTag::White => "White",
            ColorTag::Orange => "Orange",
            ColorTag::Greyscale => "greyscale",
        }
    }

    fn from_token(token: &str) -> Self {
        match token {
            "Blue" => ColorTag::Blue,
            "Green" => ColorTag::Green,
            "Light-Blue" => ColorTag::LightBlue,
            "Pink" => ColorTag::Pink,
            "Red" => ColorTag::Red,
            "White" => ColorTag::White,
            "Orange" => ColorTag::Orange,
            _ => ColorTag::Greyscale,
        }
    }

    /// Wildcard check.
    pub fn is_greyscale(self) -> bool {
        self == ColorTag::Greyscale
    }

    /// Two tags may share an item when either is greyscale or they are equal.
    pub fn matches(self, other: ColorTag) -> bool {
        self.is_greyscale() || other.is_greyscale() || self == other
    }
}

impl fmt::Display for ColorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Classify an asset name. Total: names without a color token are greyscale.
pub fn classify(name: &str) -> ColorTag {
    COLOR_RE
        .find(name)
        .map(|m| ColorTag::from_token(m.as_str()))
        .unwrap_or(ColorTag::Greyscale)
}

#[cfg(test)]
#[path = "../../tests/unit/rules/color.rs"]
mod tests;
