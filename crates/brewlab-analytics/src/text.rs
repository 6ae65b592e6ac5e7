//! Text metrics over participant assessments.

/// Character count.
pub fn text_len(text: &str) -> usize {
    text.chars().count()
}

/// Mean word length times word count, 0 for blank text.
pub fn complexity(text: &str) -> f64 {
    let lengths: Vec<usize> = text.split_whitespace().map(text_len).collect();
    if lengths.is_empty() {
        return 0.0;
    }
    let words = lengths.len() as f64;
    let mean = lengths.iter().sum::<usize>() as f64 / words;
    mean * words
}
