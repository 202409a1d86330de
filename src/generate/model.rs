use std::fmt;

/// Rarity class of a generated item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Kind {
    /// Background, clothing and expression, optionally text.
    Normal,
    /// Background and a rare overlay, optionally text.
    Rare,
    /// A finished artwork copied as-is.
    SecretRare,
}

impl Kind {
    /// Value written to the `Type` metadata attribute.
    pub fn label(self) -> &'static str {
        match self {
            Kind::Normal => "Normal",
            Kind::Rare => "Rare",
            Kind::SecretRare => "Secret Rare",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Slot assignment for one output item.
///
/// The constructors enforce the per-kind slot shape:
/// - [`Combination::normal`]: background, clothing and expression set, rare empty.
/// - [`Combination::rare`]: background and rare set, clothing and expression empty.
/// - [`Combination::secret_rare`]: only `artwork` set.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Combination {
    /// Sequential identity, assigned on acceptance.
    pub id: u64,
    /// Rarity class.
    pub kind: Kind,
    /// Base layer.
    pub background: Option<String>,
    /// Clothing overlay (normal only).
    pub clothing: Option<String>,
    /// Expression overlay (normal only).
    pub expression: Option<String>,
    /// Optional text overlay.
    pub text: Option<String>,
    /// Rare overlay (rare only).
    pub rare: Option<String>,
    /// Direct artwork reference (secret rare only).
    pub artwork: Option<String>,
}

impl Combination {
    /// Build a normal combination.
    pub fn normal(
        id: u64,
        background: impl Into<String>,
        clothing: impl Into<String>,
        expression: impl Into<String>,
        text: Option<String>,
    ) -> Self {
        Self {
            id,
            kind: Kind::Normal,
            background: Some(background.into()),
            clothing: Some(clothing.into()),
            expression: Some(expression.into()),
            text,
            rare: None,
            artwork: None,
        }
    }

    /// Build a rare combination.
    pub fn rare(
        id: u64,
        background: impl Into<String>,
        rare: impl Into<String>,
        text: Option<String>,
    ) -> Self {
        Self {
            id,
            kind: Kind::Rare,
            background: Some(background.into()),
            clothing: None,
            expression: None,
            text,
            rare: Some(rare.into()),
            artwork: None,
        }
    }

    /// Build a secret rare bound to a single artwork file.
    pub fn secret_rare(id: u64, artwork: impl Into<String>) -> Self {
        Self {
            id,
            kind: Kind::SecretRare,
            background: None,
            clothing: None,
            expression: None,
            text: None,
            rare: None,
            artwork: Some(artwork.into()),
        }
    }

    /// Deduplication key over the layered slots.
    pub fn signature(&self) -> Signature {
        Signature::of(
            self.background.as_deref(),
            self.clothing.as_deref(),
            self.expression.as_deref(),
            self.text.as_deref(),
            self.rare.as_deref(),
        )
    }
}

/// Canonical dedup key: `background-clothing-expression-text-rare`, absent slots empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    /// Build a signature from raw slot values.
    pub fn of(
        background: Option<&str>,
        clothing: Option<&str>,
        expression: Option<&str>,
        text: Option<&str>,
        rare: Option<&str>,
    ) -> Self {
        Self(format!(
            "{}-{}-{}-{}-{}",
            background.unwrap_or(""),
            clothing.unwrap_or(""),
            expression.unwrap_or(""),
            text.unwrap_or(""),
            rare.unwrap_or(""),
        ))
    }

    /// Wrap an already-encoded signature (e.g. read from a state file).
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Encoded form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the signature was produced by a rare combination.
    ///
    /// Rare signatures have empty clothing/expression slots and a non-empty rare slot, which
    /// shows up as a `--` run and no trailing `-`. Asset names in a valid catalog never end
    /// with `-`, so this is unambiguous for generated signatures.
    pub fn is_rare(&self) -> bool {
        !self.0.ends_with('-') && self.0.contains("--")
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generate/model.rs"]
mod tests;
