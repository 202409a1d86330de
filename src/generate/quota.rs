use crate::{
    foundation::error::{ForgeError, ForgeResult},
    generate::model::Kind,
};

/// Share of the non-secret collection that is rare.
pub const RARE_SHARE: f64 = 0.0357;
/// Secret rare count in the full collection.
pub const FULL_SECRET_RARE: u64 = 7;

/// Target item counts per kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Quota {
    /// Normal items.
    pub normal: u64,
    /// Rare items.
    pub rare: u64,
    /// Secret rare items.
    pub secret_rare: u64,
}

impl Quota {
    /// Items across all kinds.
    pub fn total(&self) -> u64 {
        self.normal
            .saturating_add(self.rare)
            .saturating_add(self.secret_rare)
    }

    /// Count for one kind.
    pub fn get(&self, kind: Kind) -> u64 {
        match kind {
            Kind::Normal => self.normal,
            Kind::Rare => self.rare,
            Kind::SecretRare => self.secret_rare,
        }
    }

    /// Per-kind difference, floored at zero.
    pub fn saturating_sub(&self, done: &Quota) -> Quota {
        Quota {
            normal: self.normal.saturating_sub(done.normal),
            rare: self.rare.saturating_sub(done.rare),
            secret_rare: self.secret_rare.saturating_sub(done.secret_rare),
        }
    }
}

/// Split `total` into normal/rare/secret-rare counts.
///
/// `rare = floor((total - secret_rare) * 0.0357)`; rounding drift lands in `normal`.
pub fn allocate(total: u64, secret_rare: u64) -> ForgeResult<Quota> {
    if secret_rare > total {
        return Err(ForgeError::config(format!(
            "collection size {total} is smaller than the secret rare count {secret_rare}"
        )));
    }
    let remaining = total - secret_rare;
    let rare = (remaining as f64 * RARE_SHARE).floor() as u64;
    Ok(Quota {
        normal: remaining - rare,
        rare,
        secret_rare,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/generate/quota.rs"]
mod tests;
