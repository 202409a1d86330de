use super::*;

fn values(attrs: &[Attribute]) -> Vec<(&str, &str)> {
    attrs
        .iter()
        .map(|a| (a.trait_type.as_str(), a.value.as_str()))
        .collect()
}

#[test]
fn trait_value_strips_last_extension_only() {
    assert_eq!(trait_value("Background-Red.png"), "Background-Red");
    assert_eq!(trait_value("Text.Solid.png"), "Text.Solid");
    assert_eq!(trait_value("NoExt"), "NoExt");
    assert_eq!(trait_value("trailing."), "trailing.");
}

#[test]
fn normal_attributes_in_fixed_order() {
    let c = Combination::normal(
        4,
        "Background-Green.png",
        "OG.png",
        "Smile.png",
        Some("Text-Solid-Green.png".into()),
    );
    assert_eq!(
        values(&attributes(&c)),
        vec![
            ("Type", "Normal"),
            ("Background", "Background-Green"),
            ("Clothing", "OG"),
            ("Expression", "Smile"),
            ("Text", "Text-Solid-Green"),
        ]
    );
}

#[test]
fn rare_attributes_use_rare_type() {
    let c = Combination::rare(2, "Background.png", "Gold.png", None);
    assert_eq!(
        values(&attributes(&c)),
        vec![
            ("Type", "Rare"),
            ("Background", "Background"),
            ("Rare Type", "Gold"),
        ]
    );
}

#[test]
fn secret_rare_gif_keeps_gif_extension() {
    let cfg = CollectionConfig::default();
    let c = Combination::secret_rare(97, "Mothership.GIF");
    let meta = synthesize(&c, &cfg);
    assert_eq!(meta.image, "97.gif");
    assert_eq!(meta.properties.files[0].mime, "image/gif");
    assert_eq!(
        values(&meta.attributes),
        vec![("Type", "Secret Rare"), ("Artwork", "Mothership")]
    );

    let png = synthesize(&Combination::secret_rare(98, "Still.png"), &cfg);
    assert_eq!(png.image, "98.png");
    assert_eq!(png.properties.files[0].mime, "image/png");
}

#[test]
fn record_serializes_expected_shape() {
    let cfg = CollectionConfig::default();
    let meta = synthesize(&Combination::rare(3, "Background.png", "Gold.png", None), &cfg);
    let v = serde_json::to_value(&meta).unwrap();

    assert_eq!(v["name"], "Just Aliens #3");
    assert_eq!(v["image"], "3.png");
    assert_eq!(v["symbol"], "JSTA");
    assert_eq!(v["properties"]["royalty"], 5);
    assert_eq!(v["properties"]["creators"][0]["share"], 100);
    assert_eq!(v["properties"]["files"][0]["type"], "image/png");
    assert_eq!(v["attributes"][0]["trait_type"], "Type");
}

#[test]
fn write_metadata_creates_dir_and_file() {
    let dir = std::env::temp_dir().join(format!("traitforge_meta_{}", std::process::id()));
    let cfg = CollectionConfig::default();
    let meta = synthesize(&Combination::secret_rare(1, "a.png"), &cfg);

    let path = write_metadata(&dir, 1, &meta).unwrap();
    assert_eq!(path, dir.join("1.json"));
    let back: Metadata = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(back, meta);

    std::fs::remove_dir_all(&dir).ok();
}
