use crate::{
    iterator::{BoundedIterator, SeekableTrie},
    partition::PartitionPlan,
    util::{Result, Status},
};

/// Creates the bounded iterator for each bin of a [`PartitionPlan`] on demand.
///
/// Workers that pick bins off a queue use this instead of opening every
/// iterator up front.
pub struct SubtrieIteratorFactory<T> {
    trie: T,
    plan: PartitionPlan,
}

impl<T: SeekableTrie> SubtrieIteratorFactory<T> {
    /// Cut `trie` into `nbins` bins by path prefix.
    pub fn new(trie: T, nbins: usize) -> Result<Self> {
        Ok(Self::with_plan(trie, PartitionPlan::new(nbins)?))
    }

    pub fn with_plan(trie: T, plan: PartitionPlan) -> Self {
        SubtrieIteratorFactory { trie, plan }
    }

    pub fn len(&self) -> usize {
        self.plan.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plan.is_empty()
    }

    pub fn plan(&self) -> &PartitionPlan {
        &self.plan
    }

    pub fn trie(&self) -> &T {
        &self.trie
    }

    /// Seek a fresh iterator to the start of `bin` and bound it by its end.
    pub fn iterator_at(&self, bin: usize) -> Result<BoundedIterator<T::Iter>> {
        let range = self.plan.range(bin).ok_or_else(|| {
            Status::invalid_argument(format!(
                "bin {bin} out of range for {} bins",
                self.plan.len()
            ))
        })?;
        let it = self.trie.node_iterator(&range.seek_key())?;
        Ok(BoundedIterator::new(it, range.clone()))
    }
}

/// Cut a trie by path prefix, returning `nbins` iterators covering it in
/// ascending order.
pub fn subtrie_iterators<T: SeekableTrie>(
    trie: &T,
    nbins: usize,
) -> Result<Vec<BoundedIterator<T::Iter>>> {
    let plan = PartitionPlan::new(nbins)?;
    plan.iter()
        .map(|range| {
            let it = trie.node_iterator(&range.seek_key())?;
            Ok(BoundedIterator::new(it, range.clone()))
        })
        .collect()
}
