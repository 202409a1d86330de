use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ForgeError::config("x")
            .to_string()
            .contains("config error:")
    );
    assert!(
        ForgeError::state_write("x")
            .to_string()
            .contains("state write error:")
    );
    assert!(
        ForgeError::compositing("x")
            .to_string()
            .contains("compositing error:")
    );
    assert!(
        ForgeError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn exhausted_names_kind_and_attempts() {
    let err = ForgeError::Exhausted {
        kind: Kind::Rare,
        attempts: 42,
    };
    let msg = err.to_string();
    assert!(msg.contains("Rare"));
    assert!(msg.contains("42"));
}

#[test]
fn missing_asset_shows_path() {
    let err = ForgeError::MissingAsset(PathBuf::from("Assets/Clothing/OG.png"));
    assert!(err.to_string().contains("Clothing/OG.png"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ForgeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
