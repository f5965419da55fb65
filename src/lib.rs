//! Partitioned, resumable traversal of hex-nibble addressed tries.
//!
//! The key space of a trie is cut into a power-of-two number of contiguous
//! path ranges ([`PartitionPlan`]); each range is walked by a
//! [`BoundedIterator`] on its own worker. A [`Tracker`] keeps the positions of
//! all live iterators and writes them to a checkpoint file when the traversal
//! is halted, so the next run can [`Tracker::restore`] them and carry on
//! without skipping a node.
//!
//! ```ignore
//! let mut tracker = Tracker::new(TrackerOptions::new("state.recovery"));
//! let mut iters = tracker.restore(&trie)?;
//! if iters.is_empty() {
//!     for it in subtrie_iterators(&trie, 16)? {
//!         iters.push(tracker.track(it));
//!     }
//! }
//! // hand iters to workers, then on shutdown:
//! tracker.halt_and_dump()?;
//! ```
pub mod iterator;
pub mod options;
pub mod partition;
pub mod path;
pub mod statistics;
pub mod tracker;
pub mod util;
pub mod visit;

pub use iterator::{
    BoundedIterator, NodeHash, NodeIterator, SeekableTrie, SubtrieIteratorFactory,
    subtrie_iterators,
};
pub use options::TrackerOptions;
pub use partition::{PartitionPlan, PathRange, make_paths};
pub use path::{MAX_PATH_LEN, Path, rewind};
pub use statistics::Statistics;
pub use tracker::{TrackedIterator, Tracker, TrackerHandle};
pub use util::{Code, Result, Status};
pub use visit::{WalkOutcome, visit_subtries, walk};
