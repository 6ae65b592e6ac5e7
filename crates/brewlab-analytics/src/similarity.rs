//! Similarity between a participant's text and the AI hint.
//!
//! Ratcliff/Obershelp matching: find the longest common block, recurse on
//! both sides of it, and score `2 * matched / (len_a + len_b)`.

/// Similarity ratio in `[0, 1]`. Two empty strings are identical.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
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

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as
/// `(start_a, start_b, len)`. Ties go to the earliest start in `a`, then `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best) = (alo, blo, 0);
    // run[k] is the length of the match ending at a[i - 1], b[blo + k - 1].
    let mut run = vec![0usize; bhi - blo + 1];

    for i in alo..ahi {
        let mut next = vec![0usize; bhi - blo + 1];
        for j in blo..bhi {
            if a[i] != b[j] {
                continue;
            }
            let k = run[j - blo] + 1;
            next[j - blo + 1] = k;
            if k > best {
                best_i = i + 1 - k;
                best_j = j + 1 - k;
                best = k;
            }
        }
        run = next;
    }

    (best_i, best_j, best)
}

/// Similarity of a submitted text to the hint it was shown. 0 when AI was
/// not used or there is no hint.
pub fn ai_similarity(ai_used: bool, text: &str, hint: &str) -> f64 {
    if !ai_used || hint.trim().is_empty() {
        return 0.0;
    }
    ratio(text, hint)
}
