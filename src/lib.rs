//! traitforge generates layered-trait art collections.
//!
//! A run turns a directory of PNG layers into numbered images plus JSON metadata:
//!
//! 1. **Allocate**: collection size → per-kind [`Quota`] (normal / rare / secret rare)
//! 2. **Sample**: [`Generator`] draws trait tuples, checks them with the rule engine
//!    ([`is_valid`]), drops duplicates by [`Signature`] and hands out sequential ids
//! 3. **Render**: a [`LayerCompositor`] stacks the layers; secret rares are copied as-is
//! 4. **Record**: [`synthesize`] builds the metadata record and [`StateStore`] checkpoints
//!    progress so an interrupted run can resume without repeating a combination
//!
//! The rule engine and sampler are pure and deterministic for a given seed; all IO lives in
//! [`AssetCatalog`], [`StateStore`], the compositor helpers and [`run`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod foundation;
mod generate;
mod output;
mod pipeline;
mod rules;
mod state;

pub use assets::catalog::{AssetCatalog, Category};
pub use config::{CollectionConfig, Creator};
pub use foundation::error::{ForgeError, ForgeResult};
pub use generate::model::{Combination, Kind, Signature};
pub use generate::quota::{FULL_SECRET_RARE, Quota, RARE_SHARE, allocate};
pub use generate::sampler::{DEFAULT_MAX_ATTEMPTS, Generator, TEXT_PROBABILITY};
pub use output::compositor::{
    ImageCompositor, LayerCompositor, copy_artwork, layer_stack, render_layers,
};
pub use output::metadata::{
    Attribute, FileRef, Metadata, Properties, attributes, image_file_name, synthesize,
    trait_value, write_metadata,
};
pub use output::prepare::{
    PrepareSummary, UploadMetadata, UploadProperties, prepare_upload, to_upload,
};
pub use pipeline::{PROGRESS_EVERY, RunOptions, RunSummary, run};
pub use rules::color::{ColorTag, classify};
pub use rules::compat::{
    Violation, check, colors_match, is_valid, jacket_text_ok, maga_background_ok,
    maga_forbids_text, og_background_ok,
};
pub use rules::count::{CombinationCounts, RareBreakdown, count_combinations};
pub use state::store::{
    CheckpointPolicy, Checkpointer, GenerationState, STATE_FILE_NAME, StateStore,
};
