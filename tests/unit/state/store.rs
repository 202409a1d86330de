use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "traitforge_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn sample_state() -> GenerationState {
    let mut s = GenerationState::default();
    s.record(1, Some(Signature::from_raw("bg.png---t.png-gold.png")));
    s.record(2, Some(Signature::from_raw("bg.png-c.png-e.png--")));
    s.record(3, Some(Signature::from_raw("bg2.png-c.png-e.png--")));
    s.record(4, None);
    s
}

#[test]
fn save_then_load_restores_state() {
    let tmp = temp_dir("state_roundtrip");
    let store = StateStore::in_dir(&tmp);
    let state = sample_state();

    store.save(&state).unwrap();
    assert_eq!(store.load(), Some(state));
    assert!(!store.path().with_extension("json.tmp").exists());

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn file_uses_camel_case_keys() {
    let tmp = temp_dir("state_format");
    let store = StateStore::in_dir(&tmp);
    store.save(&sample_state()).unwrap();

    let v: serde_json::Value =
        serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();
    assert_eq!(v["lastId"], 4);
    assert_eq!(v["usedCombinations"].as_array().unwrap().len(), 3);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn load_treats_missing_or_corrupt_file_as_fresh_start() {
    let tmp = temp_dir("state_corrupt");
    let store = StateStore::in_dir(&tmp);
    assert_eq!(store.load(), None);

    std::fs::create_dir_all(&tmp).unwrap();
    std::fs::write(store.path(), b"{ not json").unwrap();
    assert_eq!(store.load(), None);

    std::fs::write(store.path(), br#"{"lastId": "x"}"#).unwrap();
    assert_eq!(store.load(), None);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn load_reads_external_state_file() {
    let tmp = temp_dir("state_external");
    std::fs::create_dir_all(&tmp).unwrap();
    let store = StateStore::in_dir(&tmp);
    std::fs::write(
        store.path(),
        r#"{ "lastId": 10, "usedCombinations": ["a-b-c--", "d---e-f"] }"#,
    )
    .unwrap();

    let state = store.load().unwrap();
    assert_eq!(state.last_id, 10);
    assert!(state.used.contains(&Signature::from_raw("a-b-c--")));

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn progress_splits_by_kind() {
    let p = sample_state().progress();
    assert_eq!(p.rare, 1);
    assert_eq!(p.normal, 2);
    assert_eq!(p.secret_rare, 1);
}

#[test]
fn save_into_unwritable_location_is_a_state_write_error() {
    let tmp = temp_dir("state_unwritable");
    std::fs::create_dir_all(&tmp).unwrap();
    // A regular file where the parent directory should be.
    let blocker = tmp.join("blocker");
    std::fs::write(&blocker, b"x").unwrap();
    let store = StateStore::new(blocker.join("state.json"));

    let err = store.save(&sample_state()).unwrap_err();
    assert!(matches!(err, ForgeError::StateWrite(_)));

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn batched_checkpointer_defers_until_batch_or_finish() {
    let tmp = temp_dir("state_batched");
    let store = StateStore::in_dir(&tmp);
    let mut cp = Checkpointer::new(store.clone(), CheckpointPolicy::Batched(3));
    let mut state = GenerationState::default();

    for id in 1..=2 {
        state.record(id, None);
        cp.item_done(&state);
    }
    assert_eq!(store.load(), None);

    state.record(3, None);
    cp.item_done(&state);
    assert_eq!(store.load().unwrap().last_id, 3);

    state.record(4, None);
    cp.item_done(&state);
    assert_eq!(store.load().unwrap().last_id, 3);
    cp.finish(&state);
    assert_eq!(store.load().unwrap().last_id, 4);
    assert_eq!(cp.failures(), 0);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn every_item_checkpointer_saves_each_time_and_counts_failures() {
    let tmp = temp_dir("state_every");
    std::fs::create_dir_all(&tmp).unwrap();
    let blocker = tmp.join("blocker");
    std::fs::write(&blocker, b"x").unwrap();

    let mut cp = Checkpointer::new(
        StateStore::new(blocker.join("state.json")),
        CheckpointPolicy::EveryItem,
    );
    let mut state = GenerationState::default();
    state.record(1, None);
    cp.item_done(&state);
    cp.item_done(&state);
    assert_eq!(cp.failures(), 2);

    std::fs::remove_dir_all(&tmp).ok();
}
