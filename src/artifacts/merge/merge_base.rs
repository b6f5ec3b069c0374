//! Merge-base search over the snapshot graph
//!
//! Snapshots only link child -> parent by id, so the history graph is never
//! materialized: parents are loaded on demand through a loader closure. That
//! keeps this module independent of where snapshots are stored (object
//! store, in-memory maps in tests, ...).
//!
//! ## Algorithm
//!
//! 1. Enumerate the ancestors of the current tip breadth-first, following
//!    the first parent and then, for merge snapshots, the second parent.
//!    Each snapshot is recorded once, at the position it was first discovered.
//! 2. Collect the ancestor set of the other tip the same way.
//! 3. The merge base is the first snapshot in the order from step 1 that
//!    also appears in the set from step 2.
//!
//! The result depends on which tip is enumerated first and, in criss-cross
//! histories, is not necessarily a lowest common ancestor:
//!
//! ```text
//!     A
//!    / \
//!   B   C
//!   |\ /|
//!   | X |
//!   |/ \|
//!   D   E      D = merge(B, C), E = merge(C, B)
//! ```
//!
//! Here `merge_base(D, E)` is `B` while `merge_base(E, D)` is `C`. Both are
//! valid bases; the tie is broken by discovery order on purpose.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let graph = HistoryGraph::new(|oid| {
//!     let snapshot = database.load_snapshot(oid)?;
//!     Ok(snapshot.parents().into_iter().cloned().collect())
//! });
//!
//! let base = graph.merge_base(&head, &other)?;
//! ```

use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{HashSet, VecDeque};

/// Parent lookup over an implicit snapshot DAG
///
/// # Type Parameters
///
/// * `ParentsLoaderFn` - Loads the ordered parent ids of a snapshot; root
///   snapshots yield an empty vector.
pub struct HistoryGraph<ParentsLoaderFn>
where
    ParentsLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    parents_loader: ParentsLoaderFn,
}

impl<ParentsLoaderFn> HistoryGraph<ParentsLoaderFn>
where
    ParentsLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    pub fn new(parents_loader: ParentsLoaderFn) -> Self {
        Self { parents_loader }
    }

    /// Every ancestor of `start` (itself included) in BFS discovery order
    pub fn ancestors(&self, start: &ObjectId) -> anyhow::Result<Vec<ObjectId>> {
        let mut discovered = Vec::new();
        let mut seen = HashSet::from([start.clone()]);
        let mut queue = VecDeque::from([start.clone()]);

        while let Some(oid) = queue.pop_front() {
            for parent in (self.parents_loader)(&oid)? {
                if seen.insert(parent.clone()) {
                    queue.push_back(parent);
                }
            }

            discovered.push(oid);
        }

        Ok(discovered)
    }

    pub fn ancestor_set(&self, start: &ObjectId) -> anyhow::Result<HashSet<ObjectId>> {
        Ok(self.ancestors(start)?.into_iter().collect())
    }

    /// First ancestor of `current`, in discovery order, that `other` also reaches
    ///
    /// Returns `None` only for snapshots from unrelated histories.
    pub fn merge_base(
        &self,
        current: &ObjectId,
        other: &ObjectId,
    ) -> anyhow::Result<Option<ObjectId>> {
        let other_ancestors = self.ancestor_set(other)?;
        let merge_base = self
            .ancestors(current)?
            .into_iter()
            .find(|oid| other_ancestors.contains(oid));

        tracing::debug!(
            current = %current.to_short_oid(),
            other = %other.to_short_oid(),
            base = ?merge_base.as_ref().map(ObjectId::to_short_oid),
            "computed merge base"
        );

        Ok(merge_base)
    }
}
