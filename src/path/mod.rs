use std::fmt;

use crate::util::{Result, Status};

mod rewind;

pub use rewind::rewind;

/// Maximum path length in nibbles (a 32 byte key).
pub const MAX_PATH_LEN: usize = 64;

/// A position in a hex-nibble addressed trie.
///
/// Each element is a nibble in `0..=15`, most significant first. Ordering is
/// lexicographic over nibbles, so a node always sorts before its descendants
/// and siblings sort by branch index. That is exactly the pre-order a trie
/// node iterator visits nodes in.
///
/// The empty path is the root. When used as a range bound it means "no bound"
/// (see [`crate::partition::PathRange`]).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Path {
    nibbles: Vec<u8>,
}

impl Path {
    pub fn new(nibbles: Vec<u8>) -> Result<Self> {
        validate(&nibbles)?;
        Ok(Path { nibbles })
    }

    pub fn from_nibbles(nibbles: &[u8]) -> Result<Self> {
        Self::new(nibbles.to_vec())
    }

    pub fn empty() -> Self {
        Path {
            nibbles: Vec::new(),
        }
    }

    /// Expands key bytes into nibbles, high nibble first.
    pub fn from_key_bytes(key: &[u8]) -> Result<Self> {
        if key.len() * 2 > MAX_PATH_LEN {
            return Err(Status::invalid_argument(format!(
                "key of {} bytes exceeds {} nibbles",
                key.len(),
                MAX_PATH_LEN
            )));
        }
        let mut nibbles = Vec::with_capacity(key.len() * 2);
        for byte in key {
            nibbles.push(byte >> 4);
            nibbles.push(byte & 0x0f);
        }
        Ok(Path { nibbles })
    }

    /// Packs nibbles into key bytes, padding an odd-length path with a zero
    /// nibble.
    ///
    /// Seeking a node iterator to the padded key lands on the first node at or
    /// after `self ++ [0]`; since no path sorts strictly between `p` and
    /// `p ++ [0]`, the only node this can pass over is `p` itself.
    pub fn to_key_bytes(&self) -> Vec<u8> {
        self.nibbles
            .chunks(2)
            .map(|pair| {
                let lo = pair.get(1).copied().unwrap_or(0);
                (pair[0] << 4) | lo
            })
            .collect()
    }

    /// The path [`Path::to_key_bytes`] actually seeks to.
    pub fn to_even(&self) -> Path {
        let mut path = self.clone();
        if !path.is_even() {
            path.nibbles.push(0);
        }
        path
    }

    pub fn nibbles(&self) -> &[u8] {
        &self.nibbles
    }

    pub fn len(&self) -> usize {
        self.nibbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nibbles.is_empty()
    }

    pub fn is_even(&self) -> bool {
        self.nibbles.len() % 2 == 0
    }

    pub fn last(&self) -> Option<u8> {
        self.nibbles.last().copied()
    }

    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.nibbles.starts_with(&prefix.nibbles)
    }

    /// Returns a copy with trailing zero nibbles removed, never shortening the
    /// path below `keep` nibbles.
    pub fn trim_trailing_zeros(&self, keep: usize) -> Path {
        let mut end = self.nibbles.len();
        while end > keep && self.nibbles[end - 1] == 0 {
            end -= 1;
        }
        Path {
            nibbles: self.nibbles[..end].to_vec(),
        }
    }

    /// The pre-order predecessor position of this path, see [`rewind`].
    pub fn rewind(&self) -> Path {
        rewind(self)
    }

    /// One byte per nibble, hex encoded: `[8, 0, 10]` becomes `"08000a"`.
    ///
    /// Unlike [`Path::to_key_bytes`] this keeps odd lengths intact.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.nibbles)
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let nibbles = hex::decode(s)?;
        Self::new(nibbles)
    }

    /// Replaces the contents with `nibbles`, reusing the allocation.
    ///
    /// Nibbles reported by a node iterator are trusted as-is.
    pub(crate) fn assign(&mut self, nibbles: &[u8]) {
        self.nibbles.clear();
        self.nibbles.extend_from_slice(nibbles);
    }

    pub(crate) fn push_unchecked(&mut self, nibble: u8) {
        self.nibbles.push(nibble);
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.nibbles.truncate(len);
    }

    pub(crate) fn set_last(&mut self, nibble: u8) {
        if let Some(last) = self.nibbles.last_mut() {
            *last = nibble;
        }
    }
}

fn validate(nibbles: &[u8]) -> Result<()> {
    if nibbles.len() > MAX_PATH_LEN {
        return Err(Status::invalid_argument(format!(
            "path of {} nibbles exceeds {}",
            nibbles.len(),
            MAX_PATH_LEN
        )));
    }
    if let Some(pos) = nibbles.iter().position(|n| *n > 0x0f) {
        return Err(Status::invalid_argument(format!(
            "invalid nibble {:#x} at index {}",
            nibbles[pos], pos
        )));
    }
    Ok(())
}

impl TryFrom<Vec<u8>> for Path {
    type Error = Status;

    fn try_from(nibbles: Vec<u8>) -> Result<Self> {
        Path::new(nibbles)
    }
}

impl TryFrom<&[u8]> for Path {
    type Error = Status;

    fn try_from(nibbles: &[u8]) -> Result<Self> {
        Path::from_nibbles(nibbles)
    }
}

impl AsRef<[u8]> for Path {
    fn as_ref(&self) -> &[u8] {
        &self.nibbles
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for n in &self.nibbles {
            write!(f, "{n:x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({self})")
    }
}
