use super::*;

#[test]
fn full_collection_split() {
    let q = allocate(100, FULL_SECRET_RARE).unwrap();
    assert_eq!(
        q,
        Quota {
            normal: 90,
            rare: 3,
            secret_rare: 7
        }
    );
    assert_eq!(q.total(), 100);
}

#[test]
fn reduced_collection_split() {
    let q = allocate(50, 0).unwrap();
    assert_eq!(q.rare, 1);
    assert_eq!(q.normal, 49);
    assert_eq!(q.secret_rare, 0);
}

#[test]
fn small_totals_floor_to_zero_rares() {
    let q = allocate(20, 0).unwrap();
    assert_eq!(q.rare, 0);
    assert_eq!(q.normal, 20);

    let q = allocate(7, 7).unwrap();
    assert_eq!(q, Quota { normal: 0, rare: 0, secret_rare: 7 });
}

#[test]
fn secret_rares_cannot_exceed_total() {
    assert!(matches!(allocate(5, 7), Err(ForgeError::Config(_))));
}

#[test]
fn sums_always_match_total() {
    for total in 7..2_000 {
        assert_eq!(allocate(total, 7).unwrap().total(), total);
    }
}

#[test]
fn saturating_sub_floors_each_kind() {
    let q = Quota { normal: 10, rare: 2, secret_rare: 1 };
    let done = Quota { normal: 4, rare: 3, secret_rare: 0 };
    assert_eq!(
        q.saturating_sub(&done),
        Quota { normal: 6, rare: 0, secret_rare: 1 }
    );
    assert_eq!(q.get(Kind::Rare), 2);
}
