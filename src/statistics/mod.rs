use std::sync::atomic::{AtomicU64, Ordering};

/// Traversal-wide statistics
///
/// Thread-safe counters shared by a tracker and every iterator it tracks.
/// Uses atomic counters for lock-free updates from worker threads.
#[derive(Debug, Default)]
pub struct Statistics {
    // Node traversal
    pub nodes_visited: AtomicU64,
    pub leaves_visited: AtomicU64,

    // Iterator lifecycle
    pub iterators_tracked: AtomicU64,
    pub iterators_stopped: AtomicU64,
    pub iterators_restored: AtomicU64,

    // Checkpoint
    pub checkpoints_written: AtomicU64,
    pub checkpoint_rows_written: AtomicU64,
    pub checkpoints_removed: AtomicU64,

    // Notifications that arrived after halt
    pub late_notifications: AtomicU64,
}

impl Statistics {
    pub fn new() -> Self {
        Statistics::default()
    }

    #[inline]
    pub fn record_node(&self, leaf: bool) {
        self.nodes_visited.fetch_add(1, Ordering::Relaxed);
        if leaf {
            self.leaves_visited.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn record_tracked(&self) {
        self.iterators_tracked.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_stopped(&self) {
        self.iterators_stopped.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_restored(&self, count: u64) {
        self.iterators_restored.fetch_add(count, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_checkpoint(&self, rows: u64) {
        self.checkpoints_written.fetch_add(1, Ordering::Relaxed);
        self.checkpoint_rows_written
            .fetch_add(rows, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_checkpoint_removed(&self) {
        self.checkpoints_removed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_late_notification(&self) {
        self.late_notifications.fetch_add(1, Ordering::Relaxed);
    }

    pub fn nodes_visited(&self) -> u64 {
        self.nodes_visited.load(Ordering::Relaxed)
    }

    pub fn leaves_visited(&self) -> u64 {
        self.leaves_visited.load(Ordering::Relaxed)
    }

    pub fn iterators_tracked(&self) -> u64 {
        self.iterators_tracked.load(Ordering::Relaxed)
    }

    pub fn iterators_stopped(&self) -> u64 {
        self.iterators_stopped.load(Ordering::Relaxed)
    }

    pub fn iterators_restored(&self) -> u64 {
        self.iterators_restored.load(Ordering::Relaxed)
    }

    pub fn checkpoint_rows_written(&self) -> u64 {
        self.checkpoint_rows_written.load(Ordering::Relaxed)
    }

    pub fn late_notifications(&self) -> u64 {
        self.late_notifications.load(Ordering::Relaxed)
    }

    /// Fraction of visited nodes that were leaves
    pub fn leaf_ratio(&self) -> f64 {
        let nodes = self.nodes_visited() as f64;
        if nodes > 0.0 {
            self.leaves_visited() as f64 / nodes
        } else {
            0.0
        }
    }

    /// Reset all statistics to zero
    pub fn reset(&self) {
        self.nodes_visited.store(0, Ordering::Relaxed);
        self.leaves_visited.store(0, Ordering::Relaxed);
        self.iterators_tracked.store(0, Ordering::Relaxed);
        self.iterators_stopped.store(0, Ordering::Relaxed);
        self.iterators_restored.store(0, Ordering::Relaxed);
        self.checkpoints_written.store(0, Ordering::Relaxed);
        self.checkpoint_rows_written.store(0, Ordering::Relaxed);
        self.checkpoints_removed.store(0, Ordering::Relaxed);
        self.late_notifications.store(0, Ordering::Relaxed);
    }

    /// Get a formatted statistics report
    pub fn report(&self) -> String {
        format!(
            "Traversal Statistics:\n\
            \n\
            Nodes:\n\
            - Visited:       {}\n\
            - Leaves:        {} ({:.2}%)\n\
            \n\
            Iterators:\n\
            - Tracked:       {}\n\
            - Stopped:       {}\n\
            - Restored:      {}\n\
            \n\
            Checkpoint:\n\
            - Written:       {}\n\
            - Rows:          {}\n\
            - Removed:       {}\n\
            \n\
            Late notifications: {}",
            self.nodes_visited(),
            self.leaves_visited(),
            self.leaf_ratio() * 100.0,
            self.iterators_tracked(),
            self.iterators_stopped(),
            self.iterators_restored(),
            self.checkpoints_written.load(Ordering::Relaxed),
            self.checkpoint_rows_written(),
            self.checkpoints_removed.load(Ordering::Relaxed),
            self.late_notifications(),
        )
    }
}
