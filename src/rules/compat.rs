//! Trait compatibility rules.
//!
//! One predicate, [`is_valid`], serves both the sampler (accept/reject a random draw) and the
//! counter (enumerate every legal tuple). The individual rules are exposed so they can be
//! checked in isolation.

use super::color::{ColorTag, classify};

/// Clothing family whose items never carry text and only sit on red or greyscale backgrounds.
pub const MAGA: &str = "Maga";
/// Clothing that only accepts solid text.
pub const SOLID_TEXT_ONLY: [&str; 2] = ["LeatherJacket", "SportsJacket"];
/// Marker for solid text variants.
pub const SOLID: &str = "Solid";
/// Clothing restricted to green or greyscale backgrounds (exact file name).
pub const OG: &str = "OG.png";

/// Reason a tuple was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Violation {
    /// Maga clothing with any text.
    MagaText,
    /// Maga clothing on a background that is neither greyscale nor red.
    MagaBackground,
    /// Jacket clothing with non-solid text.
    JacketText,
    /// Background and text colors disagree.
    ColorMismatch,
    /// `OG.png` on a background that is neither greyscale nor green.
    OgBackground,
}

fn is_maga(clothing: Option<&str>) -> bool {
    clothing.is_some_and(|c| c.contains(MAGA))
}

/// Rule A: Maga items never carry text.
pub fn maga_forbids_text(clothing: Option<&str>, text: Option<&str>) -> bool {
    !(is_maga(clothing) && text.is_some())
}

/// Rule B: Maga items only sit on greyscale or red backgrounds.
pub fn maga_background_ok(background: &str, clothing: Option<&str>) -> bool {
    if !is_maga(clothing) {
        return true;
    }
    matches!(classify(background), ColorTag::Greyscale | ColorTag::Red)
}

/// Jackets take solid text only.
pub fn jacket_text_ok(clothing: Option<&str>, text: Option<&str>) -> bool {
    let Some(clothing) = clothing else {
        return true;
    };
    let Some(text) = text else {
        return true;
    };
    if SOLID_TEXT_ONLY.iter().any(|j| clothing.contains(j)) {
        return text.contains(SOLID);
    }
    true
}

/// Text color must agree with the background unless either is greyscale.
pub fn colors_match(background: &str, text: Option<&str>) -> bool {
    match text {
        Some(text) => classify(background).matches(classify(text)),
        None => true,
    }
}

/// `OG.png` only sits on greyscale or green backgrounds.
pub fn og_background_ok(background: &str, clothing: Option<&str>) -> bool {
    if clothing != Some(OG) {
        return true;
    }
    matches!(classify(background), ColorTag::Greyscale | ColorTag::Green)
}

/// First rule the tuple breaks, in evaluation order.
pub fn check(background: &str, clothing: Option<&str>, text: Option<&str>) -> Option<Violation> {
    if !maga_forbids_text(clothing, text) {
        return Some(Violation::MagaText);
    }
    if !maga_background_ok(background, clothing) {
        return Some(Violation::MagaBackground);
    }
    if !jacket_text_ok(clothing, text) {
        return Some(Violation::JacketText);
    }
    if !colors_match(background, text) {
        return Some(Violation::ColorMismatch);
    }
    if !og_background_ok(background, clothing) {
        return Some(Violation::OgBackground);
    }
    None
}

/// True when no rule rejects the tuple.
pub fn is_valid(background: &str, clothing: Option<&str>, text: Option<&str>) -> bool {
    check(background, clothing, text).is_none()
}

#[cfg(test)]
#[path = "../../tests/unit/rules/compat.rs"]
mod tests;
