use rand::{Rng, SeedableRng, seq::IndexedRandom};
use rand_chacha::ChaCha8Rng;

use crate::{
    assets::catalog::AssetCatalog,
    foundation::error::{ForgeError, ForgeResult},
    generate::{
        model::{Combination, Kind},
        quota::Quota,
    },
    rules::compat,
    state::store::GenerationState,
};

/// Default ceiling on consecutive rejected draws before sampling gives up.
pub const DEFAULT_MAX_ATTEMPTS: u64 = 1_000_000;

/// Probability that a sampled item carries text.
pub const TEXT_PROBABILITY: f64 = 0.5;

/// Draws, validates and deduplicates combinations, handing out sequential identities.
///
/// All in-progress state (RNG, signature set, identity counter) lives in this value, so
/// independent generators never interfere.
#[derive(Debug)]
pub struct Generator<'a, R = ChaCha8Rng> {
    catalog: &'a AssetCatalog,
    rng: R,
    state: GenerationState,
    secret_offset: usize,
    max_attempts: u64,
}

impl<'a> Generator<'a, ChaCha8Rng> {
    /// Generator driven by a ChaCha8 stream seeded with `seed`.
    pub fn seeded(catalog: &'a AssetCatalog, seed: u64, prior: Option<GenerationState>) -> Self {
        Self::with_rng(catalog, ChaCha8Rng::seed_from_u64(seed), prior)
    }
}

impl<'a, R: Rng> Generator<'a, R> {
    /// Generator over `catalog` using `rng`, continuing from `prior` when given.
    ///
    /// Prior signatures seed the dedup set and numbering continues after `prior.last_id`.
    /// Previously accepted combinations are not re-validated.
    pub fn with_rng(catalog: &'a AssetCatalog, rng: R, prior: Option<GenerationState>) -> Self {
        let state = prior.unwrap_or_default();
        let secret_offset = state.progress().secret_rare as usize;
        Self {
            catalog,
            rng,
            state,
            secret_offset,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Override the consecutive-rejection ceiling (`0` is treated as `1`).
    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Progress so far, including everything accepted by this generator.
    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    /// Consume the generator, returning its progress.
    pub fn into_state(self) -> GenerationState {
        self.state
    }

    /// Produce `quota` new combinations, kinds in order rare, normal, secret rare.
    #[tracing::instrument(skip(self), fields(start_id = self.state.last_id + 1))]
    pub fn generate(&mut self, quota: &Quota) -> ForgeResult<Vec<Combination>> {
        self.check_catalog(quota)?;

        // Sized by accepted items, never by the requested quota.
        let mut out = Vec::new();
        for _ in 0..quota.rare {
            out.push(self.next_rare()?);
        }
        for _ in 0..quota.normal {
            out.push(self.next_normal()?);
        }
        for _ in 0..quota.secret_rare {
            out.push(self.next_secret_rare()?);
        }
        Ok(out)
    }

    /// Sample until a new valid rare combination is found.
    pub fn next_rare(&mut self) -> ForgeResult<Combination> {
        self.sample_until_new(Kind::Rare, |g| {
            let background = pick(&mut g.rng, &g.catalog.backgrounds)?;
            let rare = pick(&mut g.rng, &g.catalog.rare)?;
            let text = g.maybe_text();
            Some(Combination::rare(0, background, rare, text))
        })
    }

    /// Sample until a new valid normal combination is found.
    pub fn next_normal(&mut self) -> ForgeResult<Combination> {
        self.sample_until_new(Kind::Normal, |g| {
            let background = pick(&mut g.rng, &g.catalog.backgrounds)?;
            let clothing = pick(&mut g.rng, &g.catalog.clothing)?;
            let expression = pick(&mut g.rng, &g.catalog.expressions)?;
            let text = g.maybe_text();
            Some(Combination::normal(0, background, clothing, expression, text))
        })
    }

    /// Next secret rare in catalog order. No rule check and no signature.
    pub fn next_secret_rare(&mut self) -> ForgeResult<Combination> {
        let Some(artwork) = self.catalog.secret_rare.get(self.secret_offset) else {
            return Err(ForgeError::config(format!(
                "secret rare #{} requested but only {} secret rare assets exist",
                self.secret_offset + 1,
                self.catalog.secret_rare.len()
            )));
        };
        let id = self.state.last_id + 1;
        let combo = Combination::secret_rare(id, artwork.clone());
        self.secret_offset += 1;
        self.state.record(id, None);
        tracing::debug!(id, artwork = %artwork, "accepted secret rare");
        Ok(combo)
    }

    fn maybe_text(&mut self) -> Option<String> {
        if self.catalog.text.is_empty() || !self.rng.random_bool(TEXT_PROBABILITY) {
            return None;
        }
        pick(&mut self.rng, &self.catalog.text)
    }

    fn sample_until_new(
        &mut self,
        kind: Kind,
        mut draw: impl FnMut(&mut Self) -> Option<Combination>,
    ) -> ForgeResult<Combination> {
        for _ in 0..self.max_attempts {
            let Some(mut combo) = draw(self) else {
                return Err(ForgeError::config(format!(
                    "cannot sample {kind} combinations from an empty category"
                )));
            };

            let background = combo.background.as_deref().unwrap_or_default();
            if !compat::is_valid(background, combo.clothing.as_deref(), combo.text.as_deref()) {
                continue;
            }
            let sig = combo.signature();
            if self.state.used.contains(&sig) {
                continue;
            }

            combo.id = self.state.last_id + 1;
            self.state.record(combo.id, Some(sig));
            tracing::debug!(
                id = combo.id,
                %kind,
                background = %background,
                text = combo.text.as_deref().unwrap_or("none"),
                "accepted combination"
            );
            return Ok(combo);
        }

        Err(ForgeError::Exhausted {
            kind,
            attempts: self.max_attempts,
        })
    }

    fn check_catalog(&self, quota: &Quota) -> ForgeResult<()> {
        let c = self.catalog;
        if quota.rare > 0 && (c.backgrounds.is_empty() || c.rare.is_empty()) {
            return Err(ForgeError::config(
                "rare items need at least one background and one rare asset",
            ));
        }
        if quota.normal > 0
            && (c.backgrounds.is_empty() || c.clothing.is_empty() || c.expressions.is_empty())
        {
            return Err(ForgeError::config(
                "normal items need backgrounds, clothing and expressions",
            ));
        }
        let needed = self.secret_offset as u64 + quota.secret_rare;
        if needed > c.secret_rare.len() as u64 {
            return Err(ForgeError::config(format!(
                "{needed} secret rares requested but only {} secret rare assets exist",
                c.secret_rare.len()
            )));
        }
        Ok(())
    }
}

fn pick<R: Rng>(rng: &mut R, names: &[String]) -> Option<String> {
    names.choose(rng).cloned()
}

#[cfg(test)]
#[path = "../../tests/unit/generate/sampler.rs"]
mod tests;
