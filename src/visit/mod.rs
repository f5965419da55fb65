//! Driving traversals: the per-worker loop and the parallel subtrie visitor.
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::{
    iterator::{BoundedIterator, NodeIterator, SeekableTrie},
    partition::PartitionPlan,
    util::Result,
};

const TARGET: &str = "triewalk::visit";

/// How a [`walk`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOutcome {
    /// The iterator ran out of nodes.
    Completed,
    /// Cancellation was observed; the iterator still sits on the last node
    /// handed to the callback.
    Cancelled,
}

/// Advance `it` to exhaustion, handing every node to `per_node`.
///
/// `cancel` is checked only between nodes, so a node is always processed in
/// full before the walk returns. A cancelled walk does not stop a tracked
/// iterator: its position stays recorded for the next checkpoint.
///
/// Errors from the iterator or from `per_node` end the walk and are returned
/// as is.
pub fn walk<I, F>(it: &mut I, cancel: &AtomicBool, mut per_node: F) -> Result<WalkOutcome>
where
    I: NodeIterator,
    F: FnMut(&I) -> Result<()>,
{
    let mut visited = 0u64;
    loop {
        if cancel.load(Ordering::Acquire) {
            tracing::debug!(target: TARGET, "walk cancelled after {visited} nodes");
            return Ok(WalkOutcome::Cancelled);
        }
        if !it.next(true)? {
            break;
        }
        per_node(it)?;
        visited += 1;
    }
    tracing::debug!(target: TARGET, "walk completed after {visited} nodes");
    Ok(WalkOutcome::Completed)
}

/// Cut `trie` into `nbins` bins and run `callback` on each bin's bounded
/// iterator in parallel.
///
/// The callback receives the bin index and owns the iterator. Returns the
/// first error any callback (or iterator creation) produced; bins already
/// running are not interrupted.
pub fn visit_subtries<T, F>(trie: &T, nbins: usize, callback: F) -> Result<()>
where
    T: SeekableTrie + Sync,
    F: Fn(usize, BoundedIterator<T::Iter>) -> Result<()> + Send + Sync,
{
    let plan = PartitionPlan::new(nbins)?;
    tracing::debug!(target: TARGET, "visiting {} subtries", plan.len());

    plan.ranges()
        .par_iter()
        .enumerate()
        .try_for_each(|(bin, range)| {
            let it = trie.node_iterator(&range.seek_key())?;
            callback(bin, BoundedIterator::new(it, range.clone()))
        })
}
