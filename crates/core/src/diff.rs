use crate::models::{ChangeSet, MetadataSnapshot};

/// Classifies every path across two snapshots: present only now -> added,
/// present only before -> deleted, present in both with a different
/// modification time -> modified. Equal modification time means unchanged
/// and the path lands in no set.
///
/// Pure and deterministic: the result depends only on the snapshot contents,
/// never on iteration order.
pub fn detect_changes(current: &MetadataSnapshot, previous: &MetadataSnapshot) -> ChangeSet {
    let mut changes = ChangeSet::default();

    for (path, record) in previous {
        match current.get(path) {
            None => {
                changes.deleted.insert(path.clone());
            }
            Some(seen) if seen.mod_time != record.mod_time => {
                changes.modified.insert(path.clone());
            }
            Some(_) => {}
        }
    }

    for path in current.keys() {
        if !previous.contains_key(path) {
            changes.added.insert(path.clone());
        }
    }

    changes
}
