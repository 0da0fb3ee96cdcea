//! Deep structural equality over collection snapshots.
//!
//! The fetch path compares every result against the last committed snapshot
//! and skips the state update when nothing changed, so refetches triggered by
//! irrelevant change events do not re-render consumers.  Cost is O(n) over
//! the collection plus the size of each entity's JSON fields; collections are
//! bounded per tenant, so the comparison is cheaper than a redundant
//! downstream update.

use crate::models::Entity;

/// Compare two snapshots structurally, order-sensitive.
///
/// Two snapshots are equal iff they have the same length and every position
/// holds a structurally equal entity (id, tenant, timestamp, and all
/// flattened columns).
pub fn snapshots_equal(a: &[Entity], b: &[Entity]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).all(|(x, y)| x == y)
}
