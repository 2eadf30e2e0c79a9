//! Converting a returned key set into the rows a screen shows.
//!
//! * Filter mode keeps the locally cached master rows whose identifier occurs
//!   in the keys, in the master's original order.
//! * Projection mode takes the keys themselves as the row set (or as the
//!   batch handed to a bulk detail fetch).
//!
//! An empty key set always reconciles to nothing.

use core::hash::BuildHasherDefault;
use std::collections::HashSet;

use seahash::SeaHasher;

use crate::model::{EntityKey, MasterRow};
use crate::registry::Domain;

pub type IdHasher = BuildHasherDefault<SeaHasher>;

/// The set of one identifier field present in `keys`.
pub fn key_projection(keys: &[EntityKey], domain: Domain) -> HashSet<&str, IdHasher> {
    keys.iter().map(|key| key.id_for(domain)).collect()
}

/// Generic filter: retain rows whose match key is among the key fragments.
pub fn reconcile<'k, R, K, M>(keys: &'k [EntityKey], rows: &[R], key_fragment: K, match_key_of: M) -> Vec<R>
where
    R: Clone,
    K: Fn(&'k EntityKey) -> &'k str,
    M: Fn(&R) -> &str,
{
    if keys.is_empty() {
        return Vec::new();
    }
    let allowed: HashSet<&str, IdHasher> = keys.iter().map(key_fragment).collect();
    rows.iter()
        .filter(|row| allowed.contains(match_key_of(*row)))
        .cloned()
        .collect()
}

/// Filter mode for a master table.
pub fn filter_master<R: MasterRow>(keys: &[EntityKey], rows: &[R]) -> Vec<R> {
    reconcile(keys, rows, |key| key.id_for(R::DOMAIN), |row| row.id())
}

/// Projection mode: the distinct keys, first occurrence wins.
pub fn project_keys(keys: &[EntityKey]) -> Vec<EntityKey> {
    let mut seen: HashSet<&EntityKey, IdHasher> = HashSet::default();
    keys.iter().filter(|key| seen.insert(*key)).cloned().collect()
}
