use crate::{
    partition::PathRange,
    path::{MAX_PATH_LEN, Path},
    util::{Result, Status},
};

/// Generates `nbins` paths at uniform intervals below `prefix`, in ascending
/// order.
///
/// The suffix length is the smallest `L` with `nbins <= 16^L`; the last
/// suffix nibble steps by `16 / d`, where `d` is the share of `nbins` that
/// falls on that nibble, carrying into more significant nibbles.
///
/// ```text
/// make_paths([], 2)   => [0] [8]
/// make_paths([4], 32) => [4 0 0] [4 0 8] [4 1 0] ... [4 f 8]
/// ```
pub fn make_paths(prefix: &Path, nbins: usize) -> Result<Vec<Path>> {
    if !nbins.is_power_of_two() {
        return Err(Status::invalid_argument(format!(
            "nbins must be a power of 2, got {nbins}"
        )));
    }

    let bits = nbins.trailing_zeros() as usize;
    let suffix_len = bits.div_ceil(4);
    if prefix.len() + suffix_len > MAX_PATH_LEN {
        return Err(Status::invalid_argument(format!(
            "{nbins} bins below a {}-nibble prefix exceed the maximum path length",
            prefix.len()
        )));
    }

    // distance between consecutive boundaries, read as a suffix_len-digit
    // base-16 number
    let step: u128 = 1 << (suffix_len * 4 - bits);

    let mut paths = Vec::with_capacity(nbins);
    for i in 0..nbins as u128 {
        let value = i * step;
        let mut nibbles = Vec::with_capacity(prefix.len() + suffix_len);
        nibbles.extend_from_slice(prefix.nibbles());
        for pos in (0..suffix_len).rev() {
            nibbles.push(((value >> (pos * 4)) & 0x0f) as u8);
        }
        paths.push(Path::new(nibbles)?);
    }
    Ok(paths)
}

/// An ordered, immutable cut of the key space into `n` contiguous ranges.
///
/// For a fixed `(prefix, n)` the plan is always identical, which is what lets
/// a checkpoint written by one run be resumed by the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionPlan {
    ranges: Vec<PathRange>,
}

impl PartitionPlan {
    /// Plan `nbins` partitions of the whole key space.
    pub fn new(nbins: usize) -> Result<Self> {
        Self::with_prefix(&Path::empty(), nbins)
    }

    /// Plan `nbins` partitions whose interior boundaries are spread evenly
    /// below `prefix`.
    ///
    /// The first range still starts at the beginning of the key space and the
    /// last one still runs to its end, so the union is always the full space.
    pub fn with_prefix(prefix: &Path, nbins: usize) -> Result<Self> {
        let boundaries: Vec<Path> = make_paths(prefix, nbins)?
            .iter()
            // `[1 0]` and `[1]` both seek to key 0x10; the shorter form keeps
            // node `[1]` out of the following range
            .map(|b| b.trim_trailing_zeros(prefix.len()))
            .collect();

        let mut ranges = Vec::with_capacity(nbins);
        for i in 0..boundaries.len() {
            let start = if i == 0 {
                None
            } else {
                Some(boundaries[i].clone())
            };
            let end = boundaries.get(i + 1).cloned();
            ranges.push(PathRange::new(start, end));
        }

        tracing::debug!(
            target: "triewalk::partition",
            "planned {} ranges below prefix {}",
            ranges.len(),
            prefix
        );
        Ok(PartitionPlan { ranges })
    }

    pub fn ranges(&self) -> &[PathRange] {
        &self.ranges
    }

    pub fn range(&self, bin: usize) -> Option<&PathRange> {
        self.ranges.get(bin)
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathRange> {
        self.ranges.iter()
    }

    /// Index of the range a node path is emitted by.
    ///
    /// A node sitting exactly on an even-length boundary is emitted by two
    /// ranges; the earlier one is returned.
    pub fn bin_of(&self, path: &[u8]) -> Option<usize> {
        self.ranges.iter().position(|r| r.contains(path))
    }
}

impl<'a> IntoIterator for &'a PartitionPlan {
    type Item = &'a PathRange;
    type IntoIter = std::slice::Iter<'a, PathRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}
