use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    config::{CollectionConfig, Creator},
    foundation::error::{ForgeError, ForgeResult},
    generate::model::{Combination, Kind},
};

/// One `{trait_type, value}` pair.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Attribute {
    /// Trait name.
    pub trait_type: String,
    /// Trait value (asset name without extension).
    pub value: String,
}

impl Attribute {
    fn new(trait_type: &str, value: impl Into<String>) -> Self {
        Self {
            trait_type: trait_type.to_string(),
            value: value.into(),
        }
    }
}

/// File entry under `properties.files`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FileRef {
    /// Relative file name.
    pub uri: String,
    /// MIME type.
    #[serde(rename = "type")]
    pub mime: String,
}

/// `properties` block.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Properties {
    /// Royalty recipients.
    pub creators: Vec<Creator>,
    /// Royalty in percent.
    pub royalty: u8,
    /// Files making up the item.
    pub files: Vec<FileRef>,
}

/// Metadata record written next to every generated image.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Metadata {
    /// `"<collection> #<id>"`.
    pub name: String,
    /// Collection description.
    pub description: String,
    /// Image file name.
    pub image: String,
    /// Ordered traits.
    pub attributes: Vec<Attribute>,
    /// Ticker symbol.
    pub symbol: String,
    /// Creators, royalty and files.
    pub properties: Properties,
}

/// Strip the final extension: `"Background-Red.png"` becomes `"Background-Red"`.
pub fn trait_value(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < name.len() && !name[dot + 1..].contains('/') => {
            &name[..dot]
        }
        _ => name,
    }
}

fn is_gif(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".gif")
}

/// Output image file name for `combo`: `<id>.gif` for animated secret rares, else `<id>.png`.
pub fn image_file_name(combo: &Combination) -> String {
    let gif = combo.kind == Kind::SecretRare && combo.artwork.as_deref().is_some_and(is_gif);
    format!("{}.{}", combo.id, if gif { "gif" } else { "png" })
}

fn mime_for(file_name: &str) -> &'static str {
    if is_gif(file_name) { "image/gif" } else { "image/png" }
}

/// Ordered attribute list for `combo`.
///
/// `Type` first, then `Background`, then `Rare Type` or `Clothing`/`Expression`, then `Text`
/// when present. Secret rares carry `Type` and `Artwork` only.
pub fn attributes(combo: &Combination) -> Vec<Attribute> {
    let mut out = vec![Attribute::new("Type", combo.kind.label())];

    if combo.kind == Kind::SecretRare {
        if let Some(art) = &combo.artwork {
            out.push(Attribute::new("Artwork", trait_value(art)));
        }
        return out;
    }

    if let Some(bg) = &combo.background {
        out.push(Attribute::new("Background", trait_value(bg)));
    }
    match combo.kind {
        Kind::Rare => {
            if let Some(rare) = &combo.rare {
                out.push(Attribute::new("Rare Type", trait_value(rare)));
            }
        }
        _ => {
            if let Some(c) = &combo.clothing {
                out.push(Attribute::new("Clothing", trait_value(c)));
            }
            if let Some(e) = &combo.expression {
                out.push(Attribute::new("Expression", trait_value(e)));
            }
        }
    }
    if let Some(t) = &combo.text {
        out.push(Attribute::new("Text", trait_value(t)));
    }
    out
}

/// Build the metadata record for `combo`.
pub fn synthesize(combo: &Combination, cfg: &CollectionConfig) -> Metadata {
    let image = image_file_name(combo);
    Metadata {
        name: format!("{} #{}", cfg.name, combo.id),
        description: cfg.description.clone(),
        attributes: attributes(combo),
        symbol: cfg.symbol.clone(),
        properties: Properties {
            creators: cfg.creators.clone(),
            royalty: cfg.royalty,
            files: vec![FileRef {
                uri: image.clone(),
                mime: mime_for(&image).to_string(),
            }],
        },
        image,
    }
}

/// Write `meta` as pretty JSON to `<dir>/<id>.json`.
pub fn write_metadata(dir: &Path, id: u64, meta: &Metadata) -> ForgeResult<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create metadata dir '{}'", dir.display()))?;
    let path = dir.join(format!("{id}.json"));
    let json = serde_json::to_vec_pretty(meta)
        .map_err(|e| ForgeError::serde(format!("encode metadata #{id}: {e}")))?;
    std::fs::write(&path, json).with_context(|| format!("write '{}'", path.display()))?;
    Ok(path)
}

#[cfg(test)]
#[path = "../../tests/unit/output/metadata.rs"]
mod tests;
