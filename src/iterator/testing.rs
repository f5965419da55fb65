//! Sorted-list trie used by unit tests.
use crate::{
    iterator::{NodeHash, NodeIterator, SeekableTrie},
    path::Path,
    util::{Result, Status},
};

/// A "trie" given as its node paths in pre-order.
pub(crate) struct ListTrie {
    pub(crate) paths: Vec<Vec<u8>>,
    pub(crate) fail_at: Option<usize>,
}

impl ListTrie {
    pub(crate) fn new(paths: &[&[u8]]) -> Self {
        let mut paths: Vec<Vec<u8>> = paths.iter().map(|p| p.to_vec()).collect();
        paths.sort();
        ListTrie {
            paths,
            fail_at: None,
        }
    }

    pub(crate) fn iter_at(&self, seek: &[u8]) -> ListIterator {
        let next_index = self
            .paths
            .iter()
            .position(|p| p.as_slice() >= seek)
            .unwrap_or(self.paths.len());
        ListIterator {
            paths: self.paths.clone(),
            pos: None,
            next_index,
            fail_at: self.fail_at,
        }
    }
}

impl SeekableTrie for ListTrie {
    type Iter = ListIterator;

    fn node_iterator(&self, start_key: &[u8]) -> Result<ListIterator> {
        let seek = Path::from_key_bytes(start_key)?;
        Ok(self.iter_at(seek.nibbles()))
    }
}

/// Walks a sorted list of paths, optionally failing at a given index.
pub(crate) struct ListIterator {
    paths: Vec<Vec<u8>>,
    pos: Option<usize>,
    next_index: usize,
    pub(crate) fail_at: Option<usize>,
}

impl NodeIterator for ListIterator {
    fn next(&mut self, _descend: bool) -> Result<bool> {
        if self.fail_at == Some(self.next_index) {
            return Err(Status::iteration("missing trie node"));
        }
        if self.next_index >= self.paths.len() {
            return Ok(false);
        }
        self.pos = Some(self.next_index);
        self.next_index += 1;
        Ok(true)
    }

    fn path(&self) -> &[u8] {
        self.pos.map(|i| self.paths[i].as_slice()).unwrap_or(&[])
    }

    fn hash(&self) -> NodeHash {
        [self.pos.unwrap_or(0) as u8; 32]
    }

    fn parent(&self) -> NodeHash {
        [0; 32]
    }

    fn leaf(&self) -> bool {
        self.path().len() == 4
    }

    fn leaf_key(&self) -> Option<&[u8]> {
        None
    }

    fn leaf_blob(&self) -> Option<&[u8]> {
        None
    }
}
