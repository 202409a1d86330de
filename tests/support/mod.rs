#![allow(dead_code)]

use std::{
    io::Cursor,
    path::{Path, PathBuf},
};

pub fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "traitforge_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

pub fn png(rgba: [u8; 4]) -> Vec<u8> {
    let raw: Vec<u8> = (0..4).flat_map(|_| rgba).collect();
    let img = image::RgbaImage::from_raw(2, 2, raw).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn write_layers(dir: &Path, names: &[&str], rgba: [u8; 4]) {
    std::fs::create_dir_all(dir).unwrap();
    let bytes = png(rgba);
    for n in names {
        std::fs::write(dir.join(n), &bytes).unwrap();
    }
}

/// Small but realistic asset tree: 75 legal normal tuples, 2 rare overlays, 2 secret rares.
pub fn asset_tree(root: &Path) {
    write_layers(
        &root.join("Background"),
        &[
            "Background-Red.png",
            "Background-Green.png",
            "Background-Blue.png",
            "Background.png",
        ],
        [40, 40, 40, 255],
    );
    write_layers(
        &root.join("Clothing"),
        &["Hoodie.png", "OG.png", "Cap.png"],
        [200, 0, 0, 255],
    );
    write_layers(
        &root.join("Expression"),
        &["Smile.png", "Frown.png", "Wink.png"],
        [0, 200, 0, 128],
    );
    write_layers(
        &root.join("Text"),
        &["Text-Solid-Red.png", "Text-Plain.png"],
        [0, 0, 200, 64],
    );
    write_layers(&root.join("Rare"), &["Gold.png", "Ghost.png"], [255, 215, 0, 255]);

    let secret = root.join("SecretRare");
    std::fs::create_dir_all(&secret).unwrap();
    std::fs::write(secret.join("Mothership.gif"), b"GIF89a-not-really").unwrap();
    std::fs::write(secret.join("Portrait.png"), png([1, 2, 3, 255])).unwrap();
}
