//! In-memory hex-patricia trie used by the integration suites.
//!
//! Only the node layout matters here: which paths carry a node and in what
//! order a pre-order walk meets them. Nodes are
//!
//! - the root (empty path),
//! - a branch at the longest common prefix of every pair of adjacent keys,
//! - a child slot below every branch (`branch ++ [nibble]`), standing in for
//!   the short node or branch hanging off that slot,
//! - a leaf at every full key.
#![allow(dead_code)]

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use triewalk::{NodeHash, NodeIterator, Path, Result, SeekableTrie, Status};

struct Node {
    path: Vec<u8>,
    hash: NodeHash,
    parent: NodeHash,
    leaf: Option<(Vec<u8>, Vec<u8>)>,
}

pub struct MemTrie {
    nodes: Arc<Vec<Node>>,
    fail_at: Option<Vec<u8>>,
}

fn nibbles_of(key: &[u8]) -> Vec<u8> {
    key.iter().flat_map(|b| [b >> 4, b & 0x0f]).collect()
}

fn common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Stand-in for a node hash; unique per path.
fn hash_of(path: &[u8]) -> NodeHash {
    let mut out = [0u8; 32];
    let mut state = 0xcbf2_9ce4_8422_2325u64 ^ path.len() as u64;
    for chunk in out.chunks_mut(8) {
        for n in path {
            state ^= *n as u64 + 1;
            state = state.wrapping_mul(0x0100_0000_01b3);
        }
        state = state.wrapping_mul(0x9e37_79b9_7f4a_7c15);
        chunk.copy_from_slice(&state.to_be_bytes());
    }
    out
}

impl MemTrie {
    /// Build from key/value pairs. Keys must all have the same length.
    pub fn new(entries: impl IntoIterator<Item = (Vec<u8>, Vec<u8>)>) -> Self {
        let leaves: BTreeMap<Vec<u8>, (Vec<u8>, Vec<u8>)> = entries
            .into_iter()
            .map(|(k, v)| (nibbles_of(&k), (k, v)))
            .collect();

        let mut paths: BTreeMap<Vec<u8>, Option<(Vec<u8>, Vec<u8>)>> = BTreeMap::new();
        paths.insert(Vec::new(), None);

        let keys: Vec<&Vec<u8>> = leaves.keys().collect();
        let mut branches = BTreeSet::from([Vec::new()]);
        for pair in keys.windows(2) {
            let n = common_prefix(pair[0], pair[1]);
            branches.insert(pair[0][..n].to_vec());
        }
        for branch in &branches {
            paths.entry(branch.clone()).or_insert(None);
        }
        for key in &keys {
            // one slot below every branch the key passes through
            for len in 0..key.len() {
                if branches.contains(&key[..len]) {
                    paths.entry(key[..len + 1].to_vec()).or_insert(None);
                }
            }
        }
        for (key, kv) in leaves {
            paths.insert(key, Some(kv));
        }

        let mut nodes: Vec<Node> = Vec::with_capacity(paths.len());
        for (path, leaf) in paths {
            let parent = nodes
                .iter()
                .rev()
                .find(|n| path.starts_with(&n.path) && n.path.len() < path.len())
                .map(|n| n.hash)
                .unwrap_or([0; 32]);
            nodes.push(Node {
                hash: hash_of(&path),
                path,
                parent,
                leaf,
            });
        }

        MemTrie {
            nodes: Arc::new(nodes),
            fail_at: None,
        }
    }

    /// `count` pseudo-random 32 byte keys derived from `seed`.
    pub fn random(count: usize, seed: u64) -> Self {
        let mut state = seed;
        let mut next = move || {
            // splitmix64
            state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
            let mut z = state;
            z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
            z ^ (z >> 31)
        };
        let entries = (0..count).map(|i| {
            let mut key = Vec::with_capacity(32);
            for _ in 0..4 {
                key.extend_from_slice(&next().to_be_bytes());
            }
            (key, (i as u64).to_be_bytes().to_vec())
        });
        MemTrie::new(entries.collect::<Vec<_>>())
    }

    /// Make every iterator fail when it is about to move onto `path`.
    pub fn fail_at(mut self, path: &[u8]) -> Self {
        self.fail_at = Some(path.to_vec());
        self
    }

    /// Every node path in pre-order.
    pub fn paths(&self) -> Vec<Vec<u8>> {
        self.nodes.iter().map(|n| n.path.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn iter_from(&self, seek: &[u8]) -> MemIterator {
        let next = self.nodes.partition_point(|n| n.path.as_slice() < seek);
        MemIterator {
            nodes: self.nodes.clone(),
            pos: None,
            next,
            fail_at: self.fail_at.clone(),
        }
    }
}

impl SeekableTrie for MemTrie {
    type Iter = MemIterator;

    fn node_iterator(&self, start_key: &[u8]) -> Result<MemIterator> {
        let seek = Path::from_key_bytes(start_key)?;
        Ok(self.iter_from(seek.nibbles()))
    }
}

pub struct MemIterator {
    nodes: Arc<Vec<Node>>,
    pos: Option<usize>,
    next: usize,
    fail_at: Option<Vec<u8>>,
}

impl MemIterator {
    fn current(&self) -> Option<&Node> {
        self.pos.map(|i| &self.nodes[i])
    }
}

impl NodeIterator for MemIterator {
    fn next(&mut self, descend: bool) -> Result<bool> {
        let mut next = self.next;
        if !descend {
            if let Some(cur) = self.current() {
                let prefix = cur.path.clone();
                while next < self.nodes.len() && self.nodes[next].path.starts_with(&prefix) {
                    next += 1;
                }
            }
        }
        if next >= self.nodes.len() {
            self.next = next;
            return Ok(false);
        }
        if self.fail_at.as_deref() == Some(self.nodes[next].path.as_slice()) {
            return Err(Status::iteration(format!(
                "missing trie node at {}",
                hex::encode(&self.nodes[next].path)
            )));
        }
        self.pos = Some(next);
        self.next = next + 1;
        Ok(true)
    }

    fn path(&self) -> &[u8] {
        self.current().map(|n| n.path.as_slice()).unwrap_or(&[])
    }

    fn hash(&self) -> NodeHash {
        self.current().map(|n| n.hash).unwrap_or([0; 32])
    }

    fn parent(&self) -> NodeHash {
        self.current().map(|n| n.parent).unwrap_or([0; 32])
    }

    fn leaf(&self) -> bool {
        self.current().is_some_and(|n| n.leaf.is_some())
    }

    fn leaf_key(&self) -> Option<&[u8]> {
        self.current()?.leaf.as_ref().map(|(k, _)| k.as_slice())
    }

    fn leaf_blob(&self) -> Option<&[u8]> {
        self.current()?.leaf.as_ref().map(|(_, v)| v.as_slice())
    }
}

/// Paths emitted by walking `it` to exhaustion.
pub fn collect_paths<I: NodeIterator>(it: &mut I) -> Vec<Vec<u8>> {
    let mut out = Vec::new();
    while it.next(true).unwrap() {
        out.push(it.path().to_vec());
    }
    out
}
