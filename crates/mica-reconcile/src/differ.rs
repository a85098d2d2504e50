//! Set differ
//!
//! Generic three-way partition of the keys of two mappings. Used once for
//! tables and once for columns; the engine decides what each class means.

use std::collections::BTreeMap;

/// The three disjoint key classes of one partition.
///
/// Together the classes cover the union of both input key sets exactly.
/// Keys come out in ascending order regardless of how the inputs were
/// assembled.
#[derive(Debug)]
pub struct KeySets<'a, K> {
    /// Keys present in the left mapping only.
    pub added: Vec<&'a K>,
    /// Keys present in the right mapping only.
    pub removed: Vec<&'a K>,
    /// Keys present in both mappings.
    pub common: Vec<&'a K>,
}

impl<K> KeySets<'_, K> {
    /// Whether the two mappings had identical key sets and nothing is
    /// left-only or right-only.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Partition the keys of two mappings into added, removed, and common.
///
/// "Added" and "removed" are relative to the right mapping: a key only in
/// `left` is added, a key only in `right` is removed.
pub fn partition_keys<'a, K, L, R>(
    left: &'a BTreeMap<K, L>,
    right: &'a BTreeMap<K, R>,
) -> KeySets<'a, K>
where
    K: Ord,
{
    let mut sets = KeySets {
        added: Vec::new(),
        removed: Vec::new(),
        common: Vec::new(),
    };

    for key in left.keys() {
        if right.contains_key(key) {
            sets.common.push(key);
        } else {
            sets.added.push(key);
        }
    }

    for key in right.keys() {
        if !left.contains_key(key) {
            sets.removed.push(key);
        }
    }

    sets
}
