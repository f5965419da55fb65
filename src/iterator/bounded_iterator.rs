use crate::{
    iterator::{NodeHash, NodeIterator},
    partition::PathRange,
    path::Path,
    util::Result,
};

/// A node iterator constrained to a [`PathRange`]
///
/// The wrapped iterator must already be seeked to the range start (see
/// [`PathRange::seek_key`]); this wrapper only enforces the end bound.
///
/// # Boundary behaviour
///
/// The end bound is inclusive: `next` keeps returning true while the current
/// path is `<= end`. Together with start keys padded to whole bytes this
/// means no node is ever skipped, at the cost of emitting a node that sits
/// exactly on an even-length boundary from both neighbouring ranges.
///
/// Once the bound is crossed the iterator stays exhausted, even though the
/// wrapped iterator has already moved onto the first node past the bound.
pub struct BoundedIterator<I> {
    inner: I,
    range: PathRange,
    exhausted: bool,
}

impl<I: NodeIterator> BoundedIterator<I> {
    pub fn new(inner: I, range: PathRange) -> Self {
        BoundedIterator {
            inner,
            range,
            exhausted: false,
        }
    }

    /// Iterator with an upper bound only
    pub fn with_end(inner: I, end: Option<Path>) -> Self {
        Self::new(inner, PathRange::new(None, end))
    }

    pub fn range(&self) -> &PathRange {
        &self.range
    }

    pub fn start(&self) -> Option<&Path> {
        self.range.start.as_ref()
    }

    pub fn end(&self) -> Option<&Path> {
        self.range.end.as_ref()
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn inner(&self) -> &I {
        &self.inner
    }

    pub fn into_inner(self) -> I {
        self.inner
    }
}

impl<I: NodeIterator> NodeIterator for BoundedIterator<I> {
    fn next(&mut self, descend: bool) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        if !self.inner.next(descend)? {
            self.exhausted = true;
            return Ok(false);
        }
        let Some(end) = &self.range.end else {
            return Ok(true);
        };
        // stop once the underlying iterator went past the end path
        if self.inner.path() > end.nibbles() {
            self.exhausted = true;
            return Ok(false);
        }
        Ok(true)
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
