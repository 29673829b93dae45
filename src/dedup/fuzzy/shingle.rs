//! Character shingling.

use xxhash_rust::xxh3::xxh3_64;

/// Hash every window of `width` consecutive characters.
///
/// Texts shorter than `width` characters, including the empty text, yield a
/// single hash of the whole text so that every document has a non-empty
/// shingle set. The output is sorted and free of repeats, so it doubles as
/// a set for Jaccard similarity.
pub fn shingle_hashes(text: &str, width: usize) -> Vec<u64> {
    let width = width.max(1);
    let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    boundaries.push(text.len());

    let char_count = boundaries.len() - 1;
    if char_count < width {
        return vec![xxh3_64(text.as_bytes())];
    }

    let mut hashes: Vec<u64> = (0..=char_count - width)
        .map(|i| xxh3_64(&text.as_bytes()[boundaries[i]..boundaries[i + width]]))
        .collect();
    hashes.sort_unstable();
    hashes.dedup();
    hashes
}

/// Exact Jaccard similarity of two sorted, repeat-free hash sets.
pub fn jaccard(a: &[u64], b: &[u64]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let (mut i, mut j, mut shared) = (0, 0, 0usize);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                shared += 1;
                i += 1;
                j += 1;
            }
        }
    }
    shared as f64 / (a.len() + b.len() - shared) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_count() {
        assert_eq!(shingle_hashes("abcdefg", 5).len(), 3);
        // "aba" appears twice.
        assert_eq!(shingle_hashes("ababa", 3).len(), 2);
    }

    #[test]
    fn test_short_and_empty_texts() {
        assert_eq!(shingle_hashes("abc", 5), vec![xxh3_64(b"abc")]);
        assert_eq!(shingle_hashes("", 24).len(), 1);
        assert_ne!(shingle_hashes("abc", 5), shingle_hashes("abd", 5));
    }

    #[test]
    fn test_multibyte_windows() {
        let hashes = shingle_hashes("héllo wörld", 5);
        assert_eq!(hashes.len(), 7);
    }

    #[test]
    fn test_jaccard() {
        let a = shingle_hashes("the quick brown fox", 4);
        assert_eq!(jaccard(&a, &a), 1.0);
        assert_eq!(jaccard(&[1, 2, 3], &[2, 3, 4]), 0.5);
        assert_eq!(jaccard(&[1], &[2]), 0.0);
    }
}
