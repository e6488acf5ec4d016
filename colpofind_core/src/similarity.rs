//! Title similarity as a Ratcliff/Obershelp matching ratio.
//!
//! `ratio = 2 * M / T` where `T` is the combined length of both strings and
//! `M` the total length of the matching blocks found by taking the longest
//! common contiguous block and recursing into the unmatched text on either
//! side of it.

/// Similarity of two titles in `[0, 1]`, case-insensitive.
///
/// Two empty titles are identical and score 1.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matched_len(&a, &b) as f64 / total as f64
}

/// Sum of the matching block lengths between `a` and `b`.
fn matched_len(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matched += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Returns `(i, j, size)`. Among equally long blocks the one starting
/// earliest in `a`, then earliest in `b`, is chosen.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    let width = bhi - blo;
    // run[k + 1] = length of the match ending at a[i - 1], b[blo + k]
    let mut prev = vec![0usize; width + 1];
    let mut curr = vec![0usize; width + 1];

    for i in alo..ahi {
        for k in 0..width {
            curr[k + 1] = if a[i] == b[blo + k] { prev[k] + 1 } else { 0 };
            let size = curr[k + 1];
            if size > best_size {
                best_i = i + 1 - size;
                best_j = blo + k + 1 - size;
                best_size = size;
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    (best_i, best_j, best_size)
}
