use super::*;

fn png(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let raw: Vec<u8> = (0..w * h).flat_map(|_| rgba).collect();
    let img = image::RgbaImage::from_raw(w, h, raw).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn decode(bytes: &[u8]) -> image::RgbaImage {
    image::load_from_memory(bytes).unwrap().to_rgba8()
}

#[test]
fn opaque_overlay_replaces_base() {
    let out = ImageCompositor
        .composite(&png(2, 2, [255, 0, 0, 255]), &[png(2, 2, [0, 0, 255, 255])])
        .unwrap();
    assert_eq!(decode(&out).get_pixel(1, 1).0, [0, 0, 255, 255]);
}

#[test]
fn transparent_overlay_is_noop() {
    let out = ImageCompositor
        .composite(&png(1, 1, [10, 20, 30, 255]), &[png(1, 1, [200, 200, 200, 0])])
        .unwrap();
    assert_eq!(decode(&out).get_pixel(0, 0).0, [10, 20, 30, 255]);
}

#[test]
fn half_alpha_overlay_blends() {
    let out = ImageCompositor
        .composite(&png(1, 1, [0, 0, 0, 255]), &[png(1, 1, [255, 255, 255, 128])])
        .unwrap();
    let px = decode(&out).get_pixel(0, 0).0;
    assert_eq!(px[3], 255);
    assert!((126..=130).contains(&px[0]));
}

#[test]
fn layers_stack_in_order() {
    let out = ImageCompositor
        .composite(
            &png(1, 1, [0, 0, 0, 255]),
            &[png(1, 1, [255, 0, 0, 255]), png(1, 1, [0, 255, 0, 255])],
        )
        .unwrap();
    assert_eq!(decode(&out).get_pixel(0, 0).0, [0, 255, 0, 255]);
}

#[test]
fn size_mismatch_is_a_compositing_error() {
    let err = ImageCompositor
        .composite(&png(2, 2, [0, 0, 0, 255]), &[png(1, 1, [0, 0, 0, 255])])
        .unwrap_err();
    assert!(matches!(err, ForgeError::Compositing(_)));

    let err = ImageCompositor.composite(b"not an image", &[]).unwrap_err();
    assert!(matches!(err, ForgeError::Compositing(_)));
}

#[test]
fn layer_stack_orders_slots() {
    let cat = AssetCatalog::from_parts("A", vec![], vec![], vec![], vec![], vec![], vec![]);
    let normal = Combination::normal(1, "bg.png", "c.png", "e.png", Some("t.png".into()));
    assert_eq!(
        layer_stack(&normal, &cat),
        vec![
            Path::new("A/Background/bg.png").to_path_buf(),
            Path::new("A/Clothing/c.png").to_path_buf(),
            Path::new("A/Expression/e.png").to_path_buf(),
            Path::new("A/Text/t.png").to_path_buf(),
        ]
    );

    let rare = Combination::rare(2, "bg.png", "r.png", None);
    assert_eq!(
        layer_stack(&rare, &cat),
        vec![
            Path::new("A/Background/bg.png").to_path_buf(),
            Path::new("A/Rare/r.png").to_path_buf(),
        ]
    );

    assert!(layer_stack(&Combination::secret_rare(3, "s.gif"), &cat).is_empty());
}

#[test]
fn render_layers_reports_missing_files() {
    let dir = std::env::temp_dir().join(format!("traitforge_render_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let base = dir.join("base.png");
    std::fs::write(&base, png(1, 1, [1, 2, 3, 255])).unwrap();
    let missing = dir.join("nope.png");

    let err = render_layers(&ImageCompositor, &[base.clone(), missing.clone()], &dir.join("o.png"))
        .unwrap_err();
    assert!(matches!(err, ForgeError::MissingAsset(p) if p == missing));

    let n = render_layers(&ImageCompositor, &[base], &dir.join("o.png")).unwrap();
    assert!(n > 0);
    assert!(dir.join("o.png").is_file());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn copy_artwork_verifies_source() {
    let dir = std::env::temp_dir().join(format!("traitforge_copy_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let src = dir.join("art.gif");
    std::fs::write(&src, b"GIF89a....").unwrap();

    assert_eq!(copy_artwork(&src, &dir.join("1.gif")).unwrap(), 10);
    assert_eq!(std::fs::read(dir.join("1.gif")).unwrap(), b"GIF89a....");

    let empty = dir.join("empty.png");
    std::fs::write(&empty, b"").unwrap();
    assert!(matches!(
        copy_artwork(&empty, &dir.join("2.png")),
        Err(ForgeError::Compositing(_))
    ));
    assert!(matches!(
        copy_artwork(&dir.join("missing.png"), &dir.join("3.png")),
        Err(ForgeError::MissingAsset(_))
    ));

    std::fs::remove_dir_all(&dir).ok();
}
