use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    iterator::{BoundedIterator, NodeHash, NodeIterator},
    partition::PathRange,
    path::Path,
    tracker::{TrackerHandle, checkpoint::CheckpointRow},
    util::Result,
};

/// Position of a tracked iterator, shared with its tracker.
///
/// The worker owning the iterator writes it after every node; the tracker
/// only reads it when dumping a checkpoint.
pub(crate) struct Cursor {
    pub(crate) id: u64,
    path: Mutex<Path>,
    end: Option<Path>,
}

impl Cursor {
    pub(crate) fn new(id: u64, path: Path, end: Option<Path>) -> Self {
        Cursor {
            id,
            path: Mutex::new(path),
            end,
        }
    }

    fn set_path(&self, nibbles: &[u8]) {
        self.path.lock().assign(nibbles);
    }

    pub(crate) fn path(&self) -> Path {
        self.path.lock().clone()
    }

    pub(crate) fn snapshot(&self) -> CheckpointRow {
        CheckpointRow::new(self.path(), self.end.clone())
    }
}

/// A bounded iterator registered with a [`crate::tracker::Tracker`]
///
/// Advancing it publishes the current path so a halt can checkpoint it.
/// When the bounded iterator reports exhaustion the tracker is told the
/// iterator stopped; an upstream error does not count as exhaustion and
/// leaves the iterator active.
pub struct TrackedIterator<I> {
    inner: BoundedIterator<I>,
    cursor: Arc<Cursor>,
    handle: TrackerHandle,
    stopped: bool,
}

impl<I: NodeIterator> TrackedIterator<I> {
    pub(crate) fn new(inner: BoundedIterator<I>, cursor: Arc<Cursor>, handle: TrackerHandle) -> Self {
        TrackedIterator {
            inner,
            cursor,
            handle,
            stopped: false,
        }
    }

    /// Identity of this iterator within its tracker
    pub fn id(&self) -> u64 {
        self.cursor.id
    }

    pub fn range(&self) -> &PathRange {
        self.inner.range()
    }

    /// Path that would be checkpointed if the tracker halted now
    pub fn recorded_path(&self) -> Path {
        self.cursor.path()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn bounded(&self) -> &BoundedIterator<I> {
        &self.inner
    }

    pub fn into_inner(self) -> BoundedIterator<I> {
        self.inner
    }

    /// Tell the tracker this iterator is done. Only the first call notifies.
    pub(crate) fn finish(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.handle.notify_stop(self.cursor.id, self.inner.path());
    }
}

impl<I: NodeIterator> NodeIterator for TrackedIterator<I> {
    fn next(&mut self, descend: bool) -> Result<bool> {
        let ok = self.inner.next(descend)?;
        if ok {
            self.cursor.set_path(self.inner.path());
            self.handle.statistics().record_node(self.inner.leaf());
        } else {
            self.finish();
        }
        Ok(ok)
    }

    fn path(&self) -> &[u8] {
        self.inner.path()
    }

    fn hash(&self) -> NodeHash {
        self.inner.hash()
    }

    fn parent(&self) -> NodeHash {
        self.inner.parent()
    }

    fn leaf(&self) -> bool {
        self.inner.leaf()
    }

    fn leaf_key(&self) -> Option<&[u8]> {
        self.inner.leaf_key()
    }

    fn leaf_blob(&self) -> Option<&[u8]> {
        self.inner.leaf_blob()
    }
}
