//! Progress tracking for long-running, resumable trie traversals.
//!
//! A [`Tracker`] records which bounded iterators are alive. Workers advance
//! their own [`TrackedIterator`]s; registration and stop notifications reach
//! the tracker through bounded channels, so a worker never waits on the
//! tracker as long as the channel capacity covers the live iterators.
//!
//! ```text
//!  worker ──track──▶ start channel ─┐
//!  worker ──stop───▶ stop channel ──┼─▶ Tracker (single consumer)
//!  worker ─exhaust─▶ stop channel ──┘        │
//!                                   halt_and_dump ──▶ checkpoint file
//!                                   restore ◀──────── checkpoint file
//! ```
//!
//! At halt the tracker stops accepting notifications, drains whatever is
//! buffered and writes one checkpoint row per iterator that was started but
//! never stopped. The next run calls [`Tracker::restore`] to get those
//! iterators back, seeked to where they left off.
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use parking_lot::RwLock;

use crate::{
    iterator::{BoundedIterator, NodeIterator, SeekableTrie},
    options::TrackerOptions,
    partition::PathRange,
    path::Path,
    statistics::Statistics,
    util::Result,
};

mod checkpoint;
mod tracked_iterator;

pub use checkpoint::{CheckpointRow, read_checkpoint, remove_checkpoint, write_checkpoint};
pub use tracked_iterator::TrackedIterator;
use tracked_iterator::Cursor;

const TARGET: &str = "triewalk::tracker";

struct Shared {
    /// Read-held while a notification is sent, write-held to halt.
    running: RwLock<bool>,
    next_id: AtomicU64,
    statistics: Arc<Statistics>,
}

/// Cloneable sending side of a [`Tracker`], handed to worker threads.
#[derive(Clone)]
pub struct TrackerHandle {
    start_tx: Sender<Arc<Cursor>>,
    stop_tx: Sender<u64>,
    shared: Arc<Shared>,
}

impl TrackerHandle {
    /// Register a bounded iterator.
    ///
    /// Must not be called after the tracker halted; doing so is logged and
    /// the returned iterator is never checkpointed.
    pub fn track<I: NodeIterator>(&self, it: BoundedIterator<I>) -> TrackedIterator<I> {
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        let start = it.start().map(Path::to_even).unwrap_or_default();
        let cursor = Arc::new(Cursor::new(id, start, it.end().cloned()));

        {
            let running = self.shared.running.read();
            if !*running {
                tracing::warn!(
                    target: TARGET,
                    "iterator tracked after tracker halted: range={}",
                    it.range()
                );
                self.shared.statistics.record_late_notification();
            } else if self.start_tx.send(cursor.clone()).is_err() {
                tracing::warn!(target: TARGET, "tracker dropped, iterator {id} not tracked");
            } else {
                self.shared.statistics.record_tracked();
            }
        }

        TrackedIterator::new(it, cursor, self.clone())
    }

    /// Explicitly stop tracking an iterator.
    pub fn stop<I: NodeIterator>(&self, it: &mut TrackedIterator<I>) {
        it.finish();
    }

    pub fn is_running(&self) -> bool {
        *self.shared.running.read()
    }

    pub fn statistics(&self) -> &Arc<Statistics> {
        &self.shared.statistics
    }

    pub(crate) fn notify_stop(&self, id: u64, path: &[u8]) {
        let running = self.shared.running.read();
        if !*running {
            tracing::warn!(
                target: TARGET,
                "iterator stopped after tracker halted: path={}",
                hex::encode(path)
            );
            self.shared.statistics.record_late_notification();
            return;
        }
        if self.stop_tx.send(id).is_err() {
            tracing::warn!(target: TARGET, "tracker dropped, stop of iterator {id} lost");
            return;
        }
        self.shared.statistics.record_stopped();
    }
}

/// Coordinator recording live iterators and checkpointing them at halt
///
/// Created once per traversal run. Moves from running to halted exactly once,
/// in [`Tracker::halt_and_dump`], and is not reusable afterwards. Independent
/// runs use independent trackers.
pub struct Tracker {
    options: TrackerOptions,
    handle: TrackerHandle,
    start_rx: Receiver<Arc<Cursor>>,
    stop_rx: Receiver<u64>,
    started: BTreeMap<u64, Arc<Cursor>>,
    stopped: BTreeSet<u64>,
    halted: bool,
    /// Set when a restore failed; the checkpoint on disk is then left alone.
    restore_failed: bool,
}

impl Tracker {
    pub fn new(options: TrackerOptions) -> Self {
        // a zero capacity channel would block every notification until halt
        let capacity = options.buffer_size.max(1);
        let (start_tx, start_rx) = crossbeam_channel::bounded(capacity);
        let (stop_tx, stop_rx) = crossbeam_channel::bounded(capacity);
        let shared = Arc::new(Shared {
            running: RwLock::new(true),
            next_id: AtomicU64::new(0),
            statistics: Arc::new(Statistics::new()),
        });
        Tracker {
            options,
            handle: TrackerHandle {
                start_tx,
                stop_tx,
                shared,
            },
            start_rx,
            stop_rx,
            started: BTreeMap::new(),
            stopped: BTreeSet::new(),
            halted: false,
            restore_failed: false,
        }
    }

    pub fn options(&self) -> &TrackerOptions {
        &self.options
    }

    pub fn handle(&self) -> TrackerHandle {
        self.handle.clone()
    }

    pub fn statistics(&self) -> Arc<Statistics> {
        self.handle.statistics().clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_running()
    }

    /// Register a bounded iterator from the consumer side.
    ///
    /// Drains pending notifications first so this never blocks on a channel
    /// only this thread empties.
    pub fn track<I: NodeIterator>(&mut self, it: BoundedIterator<I>) -> TrackedIterator<I> {
        self.drain();
        self.handle.track(it)
    }

    /// Explicitly stop tracking an iterator from the consumer side.
    ///
    /// Drains first, like [`Tracker::track`].
    pub fn stop<I: NodeIterator>(&mut self, it: &mut TrackedIterator<I>) {
        self.drain();
        self.handle.stop(it);
    }

    /// Move buffered notifications into the started/stopped sets.
    ///
    /// Returns the number of notifications consumed.
    pub fn drain(&mut self) -> usize {
        let mut count = 0;
        loop {
            match self.start_rx.try_recv() {
                Ok(cursor) => {
                    self.started.insert(cursor.id, cursor);
                    count += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        loop {
            match self.stop_rx.try_recv() {
                Ok(id) => {
                    self.stopped.insert(id);
                    count += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        count
    }

    /// Number of iterators started and not yet stopped, as of the last drain.
    pub fn active_len(&self) -> usize {
        self.started
            .keys()
            .filter(|id| !self.stopped.contains(id))
            .count()
    }

    fn active_rows(&self) -> Vec<CheckpointRow> {
        self.started
            .values()
            .filter(|cursor| !self.stopped.contains(&cursor.id))
            .map(|cursor| cursor.snapshot())
            .collect()
    }

    /// Stop accepting notifications and persist every active iterator.
    ///
    /// With no active iterators any existing checkpoint is removed instead,
    /// since the traversal is complete. Calling this again after a halt is a
    /// logged no-op.
    ///
    /// If [`Tracker::restore`] failed on this tracker the checkpoint it could
    /// not load is kept as is: nothing is written or removed.
    pub fn halt_and_dump(&mut self) -> Result<()> {
        if self.halted {
            tracing::warn!(target: TARGET, "tracker already halted");
            return Ok(());
        }

        // Senders hold the read lock while sending, possibly blocked on a full
        // channel; keep draining until no sender is in flight.
        loop {
            self.drain();
            if let Some(mut running) = self.handle.shared.running.try_write() {
                *running = false;
                break;
            }
            std::thread::yield_now();
        }
        self.halted = true;
        self.drain();

        if self.restore_failed {
            tracing::warn!(
                target: TARGET,
                "restore failed earlier, keeping {} untouched",
                self.options.recovery_file.display()
            );
            return Ok(());
        }

        let file = &self.options.recovery_file;
        let rows = self.active_rows();
        let statistics = self.handle.statistics();

        if rows.is_empty() {
            tracing::debug!(target: TARGET, "no active iterators, removing {}", file.display());
            if remove_checkpoint(file)? {
                statistics.record_checkpoint_removed();
            }
            return Ok(());
        }

        tracing::debug!(
            target: TARGET,
            "dumping {} iterators to {}",
            rows.len(),
            file.display()
        );
        write_checkpoint(file, &rows, self.options.sync)?;
        statistics.record_checkpoint(rows.len() as u64);
        Ok(())
    }

    /// Rebuild the iterators recorded by a previous run's halt.
    ///
    /// Each row is seeked to its recorded path (rewound first if the path has
    /// odd length), bounded by its recorded end and tracked. Iterators are
    /// returned in file order. A missing checkpoint yields an empty list.
    ///
    /// A malformed checkpoint, or a trie failing to create any one of the
    /// iterators, fails the whole restore: no iterator is tracked, and the
    /// checkpoint file survives a later [`Tracker::halt_and_dump`].
    pub fn restore<T: SeekableTrie>(&mut self, trie: &T) -> Result<Vec<TrackedIterator<T::Iter>>> {
        let file = self.options.recovery_file.clone();
        let bounded = match self.open_checkpoint(trie) {
            Ok(Some(bounded)) => bounded,
            Ok(None) => return Ok(Vec::new()),
            Err(e) => {
                tracing::warn!(target: TARGET, "restore from {} failed: {e}", file.display());
                self.restore_failed = true;
                return Err(e);
            }
        };

        let ret: Vec<_> = bounded.into_iter().map(|it| self.track(it)).collect();

        tracing::debug!(target: TARGET, "restored {} iterators", ret.len());
        self.handle.statistics().record_restored(ret.len() as u64);
        Ok(ret)
    }

    /// Seek one bounded iterator per checkpoint row, without tracking any.
    fn open_checkpoint<T: SeekableTrie>(&self, trie: &T) -> Result<Option<Vec<BoundedIterator<T::Iter>>>> {
        let file = &self.options.recovery_file;
        let Some(rows) = read_checkpoint(file)? else {
            return Ok(None);
        };
        tracing::debug!(target: TARGET, "restoring recovery state from {}", file.display());

        let mut bounded = Vec::with_capacity(rows.len());
        for row in rows {
            // resume from the pre-order predecessor so nothing is skipped
            let seek = if row.path.is_even() {
                row.path
            } else {
                row.path.rewind()
            };
            let it = trie.node_iterator(&seek.to_key_bytes())?;
            let start = (!seek.is_empty()).then_some(seek);
            bounded.push(BoundedIterator::new(it, PathRange::new(start, row.end)));
        }
        Ok(Some(bounded))
    }
}
