use demandsearch::model::{Channel, EntityKey, Product};
use demandsearch::reconcile::{filter_master, key_projection, project_keys, reconcile};
use demandsearch::registry::Domain;

fn product(id: &str, unit: &str) -> Product {
    Product { product_id: id.into(), business_unit: unit.into(), ..Product::default() }
}

#[test]
fn keeps_returned_products() {
    let rows = vec![product("P1", "Bakery"), product("P2", "Dairy")];
    let keys = vec![EntityKey::new("P1", "", "")];
    assert_eq!(filter_master(&keys, &rows), vec![product("P1", "Bakery")]);
}

#[test]
fn empty_keys_match_nothing() {
    let rows = vec![product("P1", "Bakery"), product("P2", "Dairy")];
    assert!(filter_master(&[], &rows).is_empty());
    assert!(project_keys(&[]).is_empty());
}

#[test]
fn master_order_is_preserved() {
    let rows = vec![product("P3", "a"), product("P1", "b"), product("P2", "c"), product("P1", "d")];
    let keys = vec![
        EntityKey::new("P1", "C1", "L1"),
        EntityKey::new("P3", "C1", "L1"),
        EntityKey::new("P9", "C1", "L1"),
    ];
    let ids: Vec<_> = filter_master(&keys, &rows).into_iter().map(|p| p.business_unit).collect();
    assert_eq!(ids, vec!["a", "b", "d"]);
}

#[test]
fn channel_keys_ignore_other_parts() {
    let rows = vec![
        Channel { channel_id: "C1".into(), channel_descr: "Retail".into(), ..Channel::default() },
        Channel { channel_id: "C2".into(), channel_descr: "Online".into(), ..Channel::default() },
    ];
    let keys = vec![EntityKey::new("whatever", "C2", "")];
    let matched = filter_master(&keys, &rows);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].channel_descr, "Online");
}

#[test]
fn projection_dedupes_keys() {
    let keys = vec![
        EntityKey::new("P1", "C1", "L1"),
        EntityKey::new("P2", "C1", "L1"),
        EntityKey::new("P1", "C1", "L1"),
    ];
    assert_eq!(project_keys(&keys), keys[..2].to_vec());
    let locations = key_projection(&keys, Domain::Location);
    assert_eq!(locations.len(), 1);
    assert!(locations.contains("L1"));
}

#[test]
fn generic_reconcile_by_location() {
    let rows = vec![("L1", 1), ("L2", 2), ("L3", 3)];
    let keys = vec![EntityKey::new("P", "C", "L3"), EntityKey::new("P", "C", "L1")];
    let kept = reconcile(&keys, &rows, |k| k.location_id.as_str(), |row| row.0);
    assert_eq!(kept, vec![("L1", 1), ("L3", 3)]);
}
