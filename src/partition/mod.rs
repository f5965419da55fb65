//! Partitioning of the trie key space into contiguous path ranges.
//!
//! A [`PartitionPlan`] cuts the space of nibble paths into `n` ranges (`n` a
//! power of two) that can be traversed independently:
//!
//! ```text
//! plan(nil, 4):   (-inf, 4]  [4, 8]  [8, c]  [c, +inf)
//!                      └──────┴───────┴── shared boundaries
//! ```
//!
//! The end bound of a range is inclusive and the start bound is the same
//! boundary, seeked as key bytes (odd lengths padded with a zero nibble). A
//! node exactly at an even-length boundary is therefore emitted by both
//! neighbouring ranges; every other node is emitted by exactly one.
use std::fmt;

use crate::path::Path;

mod planner;

pub use planner::{PartitionPlan, make_paths};

/// A range of trie paths assigned to one partition.
///
/// `None` means unbounded on that side. The first range of a plan starts at
/// the very beginning of the key space (including the root) and the last one
/// runs to its end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRange {
    pub start: Option<Path>,
    pub end: Option<Path>,
}

impl PathRange {
    pub fn new(start: Option<Path>, end: Option<Path>) -> Self {
        PathRange { start, end }
    }

    pub fn unbounded() -> Self {
        PathRange {
            start: None,
            end: None,
        }
    }

    /// Key bytes to seek a node iterator to for the first node of this range.
    pub fn seek_key(&self) -> Vec<u8> {
        self.start
            .as_ref()
            .map(Path::to_key_bytes)
            .unwrap_or_default()
    }

    /// Check if a node path falls within this range
    ///
    /// Mirrors what a bounded iterator seeked to [`PathRange::seek_key`]
    /// emits: at or after the padded start, at or before the end.
    pub fn contains(&self, path: &[u8]) -> bool {
        let after_start = match &self.start {
            None => true,
            Some(start) => {
                let seek = start.nibbles();
                if start.is_even() {
                    path >= seek
                } else {
                    // `path >= start ++ [0]` holds exactly when `path > start`
                    path > seek
                }
            }
        };
        let before_end = match &self.end {
            None => true,
            Some(end) => path <= end.nibbles(),
        };
        after_start && before_end
    }

    /// True if no path can fall in the range.
    pub fn is_empty(&self) -> bool {
        match (&self.start, &self.end) {
            (Some(start), Some(end)) => {
                if start.is_even() {
                    start > end
                } else {
                    start >= end
                }
            }
            _ => false,
        }
    }
}

impl fmt::Display for PathRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.start {
            Some(start) => write!(f, "[{start}, ")?,
            None => write!(f, "(-inf, ")?,
        }
        match &self.end {
            Some(end) => write!(f, "{end}]"),
            None => write!(f, "+inf)"),
        }
    }
}
