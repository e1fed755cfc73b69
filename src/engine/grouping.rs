//! Partitioning of enumerated rows into groups.
//!
//! Virtual lists cannot enumerate their rows, so this is only used by hosts
//! that hold every model and want old-style groups with explicit members.

use std::collections::BTreeMap;

use super::column::{Aspect, OlvColumn, SortOrder};
use super::group::OlvGroup;

/// One group per distinct group key of `column`, members in row order.
///
/// Groups are ordered by key; `SortOrder::None` keeps ascending key order.
pub fn make_groups<M>(models: &[M], column: &OlvColumn<M>, order: SortOrder) -> Vec<OlvGroup> {
    let mut buckets: BTreeMap<Aspect, Vec<usize>> = BTreeMap::new();
    for (row, model) in models.iter().enumerate() {
        buckets.entry(column.get_group_key(model)).or_default().push(row);
    }

    let mut groups: Vec<OlvGroup> = buckets
        .into_iter()
        .map(|(key, items)| {
            let mut group = OlvGroup::new(column.group_title(&key));
            group.sort_value = key.clone();
            group.key = key;
            group.items = items;
            group
        })
        .collect();

    if order == SortOrder::Descending {
        groups.reverse();
    }
    groups
}
