//! End-to-end generation run: catalog, quotas, sampling, compositing, metadata, checkpoints.

use std::path::{Path, PathBuf};

use anyhow::Context;
use rand::Rng;

use crate::{
    assets::catalog::{AssetCatalog, Category},
    config::CollectionConfig,
    foundation::error::{ForgeError, ForgeResult},
    generate::{
        model::{Combination, Kind},
        quota::Quota,
        sampler::Generator,
    },
    output::{
        compositor::{LayerCompositor, copy_artwork, layer_stack, render_layers},
        metadata::{image_file_name, synthesize, write_metadata},
    },
    state::store::{Checkpointer, StateStore},
};

/// Progress is logged at info level once per this many items.
pub const PROGRESS_EVERY: u64 = 100;

/// Inputs for [`run`].
#[derive(Clone, Debug)]
pub struct RunOptions {
    /// Asset root containing one directory per category.
    pub assets_dir: PathBuf,
    /// Destination for images, `metadata/` and the state file.
    pub output_dir: PathBuf,
    /// Collection settings.
    pub config: CollectionConfig,
}

/// What a run produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Seed the sampler ran with.
    pub seed: u64,
    /// Full collection targets.
    pub quota: Quota,
    /// Items produced by this run, per kind.
    pub produced: Quota,
    /// Identity of the last finished item (0 when nothing exists yet).
    pub last_id: u64,
    /// Whether the run continued from a saved state.
    pub resumed: bool,
    /// Checkpoints that could not be written.
    pub state_write_failures: u32,
}

/// Generate the collection described by `opts`, resuming from saved progress if present.
///
/// Any fatal error aborts the run; items finished before it stay checkpointed.
#[tracing::instrument(skip_all, fields(assets = %opts.assets_dir.display(), output = %opts.output_dir.display()))]
pub fn run(opts: &RunOptions, compositor: &dyn LayerCompositor) -> ForgeResult<RunSummary> {
    let cfg = &opts.config;
    cfg.validate()?;
    let quota = cfg.quota()?;
    let catalog = AssetCatalog::load(&opts.assets_dir)?;
    tracing::info!(
        root = %catalog.root().display(),
        backgrounds = catalog.backgrounds.len(),
        clothing = catalog.clothing.len(),
        expressions = catalog.expressions.len(),
        text = catalog.text.len(),
        rare = catalog.rare.len(),
        secret_rare = catalog.secret_rare.len(),
        "asset catalog loaded"
    );
    let unused = catalog.unused_secret_rares(quota.secret_rare);
    if !unused.is_empty() {
        tracing::warn!(
            secret_rare = quota.secret_rare,
            available = catalog.secret_rare.len(),
            skipped = ?unused,
            "more secret rare artworks than the collection uses; extras are skipped"
        );
    }

    let metadata_dir = opts.output_dir.join("metadata");
    std::fs::create_dir_all(&metadata_dir)
        .with_context(|| format!("create output dir '{}'", metadata_dir.display()))?;

    let store = StateStore::in_dir(&opts.output_dir);
    let prior = store.load();
    let resumed = prior.is_some();
    let remaining = match &prior {
        Some(state) => quota.saturating_sub(&state.progress()),
        None => quota,
    };

    tracing::info!(
        normal = quota.normal,
        rare = quota.rare,
        secret_rare = quota.secret_rare,
        total = quota.total(),
        "target distribution"
    );
    if let Some(state) = &prior {
        tracing::info!(next_id = state.last_id + 1, remaining = remaining.total(), "resuming");
    }

    let seed = cfg.seed.unwrap_or_else(|| rand::rng().random());
    tracing::info!(seed, "sampler seeded");

    let mut generator =
        Generator::seeded(&catalog, seed, prior.clone()).with_max_attempts(cfg.max_attempts);
    let combos = generator.generate(&remaining)?;

    let mut progress = prior.unwrap_or_default();
    let mut checkpoints = Checkpointer::new(store, cfg.checkpoint);
    let mut produced = Quota::default();

    for combo in &combos {
        let finished = finish_item(combo, &catalog, &opts.output_dir, &metadata_dir, cfg, compositor);
        if let Err(e) = finished {
            tracing::error!(id = combo.id, kind = %combo.kind, error = %e, "aborting run");
            checkpoints.finish(&progress);
            return Err(e);
        }

        let sig = (combo.kind != Kind::SecretRare).then(|| combo.signature());
        progress.record(combo.id, sig);
        checkpoints.item_done(&progress);
        bump(&mut produced, combo.kind);

        if combo.id % PROGRESS_EVERY == 0 {
            tracing::info!(id = combo.id, "progress");
        }
    }
    checkpoints.finish(&progress);

    tracing::info!(produced = produced.total(), last_id = progress.last_id, "done");
    Ok(RunSummary {
        seed,
        quota,
        produced,
        last_id: progress.last_id,
        resumed,
        state_write_failures: checkpoints.failures(),
    })
}

fn finish_item(
    combo: &Combination,
    catalog: &AssetCatalog,
    output_dir: &Path,
    metadata_dir: &Path,
    cfg: &CollectionConfig,
    compositor: &dyn LayerCompositor,
) -> ForgeResult<()> {
    let image_path = output_dir.join(image_file_name(combo));

    let bytes = match combo.kind {
        Kind::SecretRare => {
            let artwork = combo.artwork.as_deref().ok_or_else(|| {
                ForgeError::config(format!("secret rare #{} has no artwork", combo.id))
            })?;
            copy_artwork(&catalog.path_of(Category::SecretRare, artwork), &image_path)?
        }
        Kind::Normal | Kind::Rare => {
            let layers = layer_stack(combo, catalog);
            if let Some(missing) = layers.iter().find(|p| !p.is_file()) {
                return Err(ForgeError::MissingAsset(missing.clone()));
            }
            render_layers(compositor, &layers, &image_path)?
        }
    };

    write_metadata(metadata_dir, combo.id, &synthesize(combo, cfg))?;
    tracing::debug!(id = combo.id, kind = %combo.kind, bytes, image = %image_path.display(), "item written");
    Ok(())
}

fn bump(q: &mut Quota, kind: Kind) {
    match kind {
        Kind::Normal => q.normal += 1,
        Kind::Rare => q.rare += 1,
        Kind::SecretRare => q.secret_rare += 1,
    }
}
