use std::{
    io::Cursor,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    assets::catalog::{AssetCatalog, Category},
    foundation::error::{ForgeError, ForgeResult},
    generate::model::{Combination, Kind},
};

/// Stacks encoded layer images into one encoded PNG.
pub trait LayerCompositor {
    /// Draw `overlays` over `base` in order, returning the encoded result.
    fn composite(&self, base: &[u8], overlays: &[Vec<u8>]) -> ForgeResult<Vec<u8>>;
}

/// CPU compositor: decodes with `image`, blends in premultiplied RGBA8, encodes PNG.
///
/// Every layer must share the base layer's dimensions.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageCompositor;

impl LayerCompositor for ImageCompositor {
    fn composite(&self, base: &[u8], overlays: &[Vec<u8>]) -> ForgeResult<Vec<u8>> {
        let (width, height, mut canvas) = decode_premul(base, "base layer")?;

        for (idx, layer) in overlays.iter().enumerate() {
            let label = format!("overlay #{}", idx + 1);
            let (w, h, px) = decode_premul(layer, &label)?;
            if (w, h) != (width, height) {
                return Err(ForgeError::compositing(format!(
                    "{label} is {w}x{h}, base layer is {width}x{height}"
                )));
            }
            over_in_place(&mut canvas, &px);
        }

        unpremultiply_rgba8_in_place(&mut canvas);
        let img = image::RgbaImage::from_raw(width, height, canvas)
            .ok_or_else(|| ForgeError::compositing("canvas buffer size mismatch"))?;
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .map_err(|e| ForgeError::compositing(format!("encode png: {e}")))?;
        Ok(buf)
    }
}

/// Layer files for `combo` in stacking order: background, clothing or rare, expression, text.
///
/// Secret rares have no stack and yield an empty list.
pub fn layer_stack(combo: &Combination, catalog: &AssetCatalog) -> Vec<PathBuf> {
    if combo.kind == Kind::SecretRare {
        return Vec::new();
    }
    let slots = [
        (Category::Background, &combo.background),
        (Category::Clothing, &combo.clothing),
        (Category::Rare, &combo.rare),
        (Category::Expression, &combo.expression),
        (Category::Text, &combo.text),
    ];
    slots
        .into_iter()
        .filter_map(|(cat, name)| name.as_deref().map(|n| catalog.path_of(cat, n)))
        .collect()
}

/// Read, stack and write one layered item to `out`.
pub fn render_layers(
    compositor: &dyn LayerCompositor,
    layers: &[PathBuf],
    out: &Path,
) -> ForgeResult<u64> {
    let Some((base_path, rest)) = layers.split_first() else {
        return Err(ForgeError::compositing("no layers to composite"));
    };
    let base = read_layer(base_path)?;
    let overlays = rest
        .iter()
        .map(|p| read_layer(p))
        .collect::<ForgeResult<Vec<_>>>()?;

    let png = compositor.composite(&base, &overlays)?;
    if png.is_empty() {
        return Err(ForgeError::compositing(format!(
            "compositor produced an empty image for '{}'",
            out.display()
        )));
    }
    std::fs::write(out, &png).with_context(|| format!("write image '{}'", out.display()))?;
    Ok(png.len() as u64)
}

/// Copy a finished artwork byte-for-byte and verify the copy.
pub fn copy_artwork(src: &Path, dest: &Path) -> ForgeResult<u64> {
    let meta = std::fs::metadata(src).map_err(|_| ForgeError::MissingAsset(src.to_path_buf()))?;
    if meta.len() == 0 {
        return Err(ForgeError::compositing(format!(
            "artwork '{}' is empty",
            src.display()
        )));
    }
    std::fs::copy(src, dest)
        .with_context(|| format!("copy '{}' to '{}'", src.display(), dest.display()))?;

    let copied = std::fs::metadata(dest)
        .with_context(|| format!("stat '{}'", dest.display()))?
        .len();
    if copied != meta.len() {
        return Err(ForgeError::compositing(format!(
            "artwork '{}' was not copied correctly ({copied} != {} bytes)",
            src.display(),
            meta.len()
        )));
    }
    Ok(copied)
}

fn read_layer(path: &Path) -> ForgeResult<Vec<u8>> {
    if !path.is_file() {
        return Err(ForgeError::MissingAsset(path.to_path_buf()));
    }
    Ok(std::fs::read(path).with_context(|| format!("read layer '{}'", path.display()))?)
}

fn decode_premul(bytes: &[u8], label: &str) -> ForgeResult<(u32, u32, Vec<u8>)> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| ForgeError::compositing(format!("decode {label}: {e}")))?
        .to_rgba8();
    let (w, h) = img.dimensions();
    let mut px = img.into_raw();
    premultiply_rgba8_in_place(&mut px);
    Ok((w, h, px))
}

fn over_in_place(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = s[3];
        if sa == 0 {
            continue;
        }
        let inv = 255u16 - u16::from(sa);
        for i in 0..4 {
            d[i] = s[i].saturating_add(mul_div255(u16::from(d[i]), inv));
        }
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = mul_div255(u16::from(*c), a);
        }
    }
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/output/compositor.rs"]
mod tests;
