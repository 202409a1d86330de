use std::collections::BTreeMap;

use crate::assets::catalog::AssetCatalog;

use super::compat::is_valid;

/// Legal tuples reachable from one rare overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RareBreakdown {
    /// Background-only draws.
    pub without_text: u64,
    /// Draws that also carry text.
    pub with_text: u64,
}

impl RareBreakdown {
    /// Sum of both variants.
    pub fn total(&self) -> u64 {
        self.without_text + self.with_text
    }
}

/// Size of the legal combination space for a catalog.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct CombinationCounts {
    /// Normal tuples without text.
    pub normal_without_text: u64,
    /// Normal tuples with text.
    pub normal_with_text: u64,
    /// Per rare overlay, keyed by file name.
    pub rare: BTreeMap<String, RareBreakdown>,
}

impl CombinationCounts {
    /// All normal tuples.
    pub fn normal_total(&self) -> u64 {
        self.normal_without_text + self.normal_with_text
    }

    /// All rare tuples.
    pub fn rare_total(&self) -> u64 {
        self.rare.values().map(RareBreakdown::total).sum()
    }

    /// Every unique item the sampler could ever emit (secret rares excluded).
    pub fn total(&self) -> u64 {
        self.normal_total() + self.rare_total()
    }

    /// Highest achievable share of rares, in percent.
    pub fn max_rare_percentage(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.rare_total() as f64 / total as f64 * 100.0
    }
}

/// Enumerate every tuple the sampler could draw and count the ones [`is_valid`] accepts.
#[tracing::instrument(skip_all)]
pub fn count_combinations(catalog: &AssetCatalog) -> CombinationCounts {
    let mut counts = CombinationCounts::default();

    for bg in &catalog.backgrounds {
        for clothing in &catalog.clothing {
            let clothing = Some(clothing.as_str());
            let without = u64::from(is_valid(bg, clothing, None));
            let with = catalog
                .text
                .iter()
                .filter(|t| is_valid(bg, clothing, Some(t.as_str())))
                .count() as u64;
            let expressions = catalog.expressions.len() as u64;
            counts.normal_without_text += without * expressions;
            counts.normal_with_text += with * expressions;
        }
    }

    for rare in &catalog.rare {
        let mut entry = RareBreakdown::default();
        for bg in &catalog.backgrounds {
            entry.without_text += u64::from(is_valid(bg, None, None));
            entry.with_text += catalog
                .text
                .iter()
                .filter(|t| is_valid(bg, None, Some(t.as_str())))
                .count() as u64;
        }
        counts.rare.insert(rare.clone(), entry);
    }

    tracing::debug!(
        normal = counts.normal_total(),
        rare = counts.rare_total(),
        "counted legal combinations"
    );
    counts
}

#[cfg(test)]
#[path = "../../tests/unit/rules/count.rs"]
mod tests;
