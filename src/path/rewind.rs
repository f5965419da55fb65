use super::{MAX_PATH_LEN, Path};

/// Computes the position to resume a scan from, given the last node that was
/// fully processed.
///
/// The result is the pre-order predecessor of `last_visited`:
///
/// - last nibble `0`: the parent, i.e. the path with that nibble dropped.
/// - otherwise: the previous sibling's deepest possible descendant, i.e. the
///   last nibble decremented and the path padded with `0xf` up to
///   [`MAX_PATH_LEN`].
///
/// No path sorts strictly between the result and `last_visited`, so seeking to
/// it and advancing lands on the predecessor node if it exists and on
/// `last_visited` otherwise. Nothing after `last_visited` is ever skipped.
///
/// The empty path has no predecessor and is returned unchanged.
pub fn rewind(last_visited: &Path) -> Path {
    let mut path = last_visited.clone();
    match path.last() {
        None => {}
        Some(0) => path.truncate(path.len() - 1),
        Some(n) => {
            path.set_last(n - 1);
            while path.len() < MAX_PATH_LEN {
                path.push_unchecked(0x0f);
            }
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(nibbles: &[u8]) -> Path {
        Path::from_nibbles(nibbles).unwrap()
    }

    #[test]
    fn test_rewind_empty() {
        assert_eq!(rewind(&Path::empty()), Path::empty());
    }

    #[test]
    fn test_rewind_zero_moves_to_parent() {
        assert_eq!(rewind(&p(&[3, 5, 0])), p(&[3, 5]));
        assert_eq!(rewind(&p(&[0])), Path::empty());
    }

    #[test]
    fn test_rewind_decrements_and_pads() {
        let rewound = rewind(&p(&[1, 2, 3]));
        assert_eq!(rewound.len(), MAX_PATH_LEN);
        assert_eq!(&rewound.nibbles()[..3], &[1, 2, 2]);
        assert!(rewound.nibbles()[3..].iter().all(|n| *n == 0xf));
    }

    #[test]
    fn test_rewind_fifteen() {
        let rewound = rewind(&p(&[0xf]));
        assert_eq!(rewound.nibbles()[0], 0xe);
        assert_eq!(rewound.len(), MAX_PATH_LEN);
    }

    #[test]
    fn test_rewind_is_strictly_before() {
        for last in [p(&[7]), p(&[7, 0]), p(&[0, 0, 1]), p(&[0xf; 63])] {
            let rewound = rewind(&last);
            assert!(rewound < last, "{rewound:?} !< {last:?}");
        }
    }

    #[test]
    fn test_rewind_odd_input_gives_even_output() {
        for last in [p(&[5]), p(&[5, 6, 0]), p(&[5, 6, 7])] {
            assert!(rewind(&last).is_even());
        }
    }
}
