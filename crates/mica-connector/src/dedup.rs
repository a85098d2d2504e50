//! Feed deduplication
//!
//! Upstream feeds can legitimately re-emit an entity several times within
//! one batch, each emission carrying a monotonically growing version marker.
//! Reconciliation wants exactly one record per identity, so feeds are folded
//! down to the newest emission before an inventory is built from them.

use std::collections::BTreeMap;

/// Fold a feed down to the latest item per key.
///
/// Items sharing a key collapse to the one whose version compares strictly
/// greatest; on a version tie the earlier item is kept. The output preserves
/// the order in which keys were first seen, so a stable input produces a
/// stable output.
pub fn latest_by_key<T, K, V>(
    items: impl IntoIterator<Item = T>,
    key_of: impl Fn(&T) -> K,
    version_of: impl Fn(&T) -> V,
) -> Vec<T>
where
    K: Ord,
    V: PartialOrd,
{
    let mut kept: Vec<T> = Vec::new();
    let mut index: BTreeMap<K, usize> = BTreeMap::new();

    for item in items {
        let key = key_of(&item);
        let slot = index.get(&key).copied();
        match slot {
            Some(position) => {
                if version_of(&item) > version_of(&kept[position]) {
                    kept[position] = item;
                }
            }
            None => {
                index.insert(key, kept.len());
                kept.push(item);
            }
        }
    }

    kept
}
