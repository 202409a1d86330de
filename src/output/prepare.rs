//! Re-index a finished collection for the marketplace upload tool.
//!
//! The generator numbers items from 1; the upload tool expects `0.png`/`0.json` onwards and
//! a slightly different metadata layout (basis-point royalties, `properties.category`).

use std::path::Path;

use anyhow::Context;

use crate::{
    config::{CollectionConfig, Creator},
    foundation::error::{ForgeError, ForgeResult},
    output::metadata::{Attribute, FileRef},
};

/// `properties` block of an upload record.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UploadProperties {
    /// Files making up the item.
    pub files: Vec<FileRef>,
    /// Always `"image"`.
    pub category: String,
    /// Royalty recipients.
    pub creators: Vec<Creator>,
}

/// Metadata record in the upload tool's layout.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UploadMetadata {
    /// Item name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Description.
    pub description: String,
    /// Royalty in basis points.
    pub seller_fee_basis_points: u32,
    /// Image file name.
    pub image: String,
    /// Traits, copied from the source record.
    pub attributes: Vec<Attribute>,
    /// Files, category and creators.
    pub properties: UploadProperties,
}

/// Outcome of [`prepare_upload`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrepareSummary {
    /// Images copied.
    pub images: u64,
    /// Metadata records rewritten.
    pub metadata: u64,
    /// Inputs that did not exist.
    pub missing: u64,
}

/// Rewrite one generator record (1-based `source_id`) into the upload layout at `index`.
pub fn to_upload(
    source: &serde_json::Value,
    source_id: u64,
    index: u64,
    cfg: &CollectionConfig,
) -> ForgeResult<UploadMetadata> {
    let image = format!("{index}.png");

    let name = source
        .get("name")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} #{source_id}", cfg.name));
    let description = source
        .get("description")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| cfg.description.clone());
    let attributes = match source.get("attributes") {
        Some(v) => serde_json::from_value(v.clone())
            .map_err(|e| ForgeError::serde(format!("attributes of #{source_id}: {e}")))?,
        None => Vec::new(),
    };
    let creators = match source.pointer("/properties/creators") {
        Some(v) => serde_json::from_value(v.clone())
            .map_err(|e| ForgeError::serde(format!("creators of #{source_id}: {e}")))?,
        None => cfg.creators.clone(),
    };

    Ok(UploadMetadata {
        name,
        symbol: cfg.symbol.clone(),
        description,
        seller_fee_basis_points: cfg.seller_fee_basis_points(),
        attributes,
        properties: UploadProperties {
            files: vec![FileRef {
                uri: image.clone(),
                mime: "image/png".to_string(),
            }],
            category: "image".to_string(),
            creators,
        },
        image,
    })
}

/// Copy `src/<i>.png` and `src/metadata/<i>.json` for `i in 1..=count` to
/// `dest/<i-1>.png` and `dest/<i-1>.json`.
///
/// Missing inputs are logged and skipped; malformed metadata is an error.
#[tracing::instrument(skip_all, fields(src = %src.display(), dest = %dest.display(), count = count))]
pub fn prepare_upload(
    src: &Path,
    dest: &Path,
    count: u64,
    cfg: &CollectionConfig,
) -> ForgeResult<PrepareSummary> {
    std::fs::create_dir_all(dest)
        .with_context(|| format!("create upload dir '{}'", dest.display()))?;

    let mut summary = PrepareSummary::default();
    for id in 1..=count {
        let index = id - 1;

        let image_src = src.join(format!("{id}.png"));
        if image_src.is_file() {
            let image_dest = dest.join(format!("{index}.png"));
            std::fs::copy(&image_src, &image_dest)
                .with_context(|| format!("copy '{}'", image_src.display()))?;
            summary.images += 1;
        } else {
            tracing::warn!(path = %image_src.display(), "missing image");
            summary.missing += 1;
        }

        let meta_src = src.join("metadata").join(format!("{id}.json"));
        if meta_src.is_file() {
            let raw = std::fs::read(&meta_src)
                .with_context(|| format!("read '{}'", meta_src.display()))?;
            let value: serde_json::Value = serde_json::from_slice(&raw)
                .map_err(|e| ForgeError::serde(format!("parse '{}': {e}", meta_src.display())))?;
            let upload = to_upload(&value, id, index, cfg)?;
            let json = serde_json::to_vec_pretty(&upload)
                .map_err(|e| ForgeError::serde(format!("encode upload #{index}: {e}")))?;
            let meta_dest = dest.join(format!("{index}.json"));
            std::fs::write(&meta_dest, json)
                .with_context(|| format!("write '{}'", meta_dest.display()))?;
            summary.metadata += 1;
        } else {
            tracing::warn!(path = %meta_src.display(), "missing metadata");
            summary.missing += 1;
        }
    }

    tracing::info!(
        images = summary.images,
        metadata = summary.metadata,
        missing = summary.missing,
        "upload folder prepared"
    );
    Ok(summary)
}

#[cfg(test)]
#[path = "../../tests/unit/output/prepare.rs"]
mod tests;
