use std::{fs::File, io::BufReader, path::Path};

use crate::{
    foundation::error::{ForgeError, ForgeResult},
    generate::{
        quota::{FULL_SECRET_RARE, Quota, allocate},
        sampler::DEFAULT_MAX_ATTEMPTS,
    },
    state::store::CheckpointPolicy,
};

/// Royalty recipient listed in every metadata record.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Creator {
    /// Wallet address.
    pub address: String,
    /// Percentage share of royalties.
    pub share: u8,
}

/// Collection-wide settings. Every field has a default, so `{}` is a valid config file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollectionConfig {
    /// Collection name; item names are `"<name> #<id>"`.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Description shared by every item.
    pub description: String,
    /// Royalty recipients; shares must sum to 100.
    pub creators: Vec<Creator>,
    /// Royalty in percent.
    pub royalty: u8,
    /// Collection size including secret rares.
    pub total: u64,
    /// Number of secret rares.
    pub secret_rare: u64,
    /// RNG seed; drawn at random and logged when absent.
    pub seed: Option<u64>,
    /// Consecutive rejected draws tolerated before giving up.
    pub max_attempts: u64,
    /// Progress flush policy.
    pub checkpoint: CheckpointPolicy,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            name: "Just Aliens".to_string(),
            symbol: "JSTA".to_string(),
            description: "Born from the buzz surrounding recent UFO disclosures. In a time when \
                Aliens are dominating headlines, we offer a fun way to engage with the mystery, \
                reminding everyone to chill out and enjoy the ride."
                .to_string(),
            creators: vec![Creator {
                address: "Hn1i7bLb7oHpAL5AoyGvkn7YgwmWrVTbVsjXA1LYnELo".to_string(),
                share: 100,
            }],
            royalty: 5,
            total: 100,
            secret_rare: FULL_SECRET_RARE,
            seed: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            checkpoint: CheckpointPolicy::EveryItem,
        }
    }
}

impl CollectionConfig {
    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ForgeResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| ForgeError::config(format!("parse collection config JSON: {e}")))
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ForgeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ForgeError::config(format!("open collection config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check internal consistency.
    pub fn validate(&self) -> ForgeResult<()> {
        if self.name.trim().is_empty() {
            return Err(ForgeError::config("collection name must not be empty"));
        }
        if self.creators.is_empty() {
            return Err(ForgeError::config("at least one creator is required"));
        }
        let shares: u32 = self.creators.iter().map(|c| u32::from(c.share)).sum();
        if shares != 100 {
            return Err(ForgeError::config(format!(
                "creator shares must sum to 100, got {shares}"
            )));
        }
        if self.royalty > 100 {
            return Err(ForgeError::config("royalty must be a percentage (0..=100)"));
        }
        if self.max_attempts == 0 {
            return Err(ForgeError::config("max_attempts must be > 0"));
        }
        if let CheckpointPolicy::Batched(0) = self.checkpoint {
            return Err(ForgeError::config("batched checkpoint size must be > 0"));
        }
        self.quota().map(|_| ())
    }

    /// Per-kind targets for `total`.
    pub fn quota(&self) -> ForgeResult<Quota> {
        allocate(self.total, self.secret_rare)
    }

    /// Royalty expressed in basis points.
    pub fn seller_fee_basis_points(&self) -> u32 {
        u32::from(self.royalty) * 100
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
