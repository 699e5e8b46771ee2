//! Buffer search state: live query editing plus committed-query repeat.

use quill_text::Buffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    Forward,
    Backward,
}

#[derive(Debug)]
pub struct SearchState {
    pub direction: SearchDirection,
    pub query: String,
    /// Last committed query, the target of `n`/`N`.
    pub committed: Option<String>,
    /// Flat rune index of the cursor when the search began (abort restore).
    pub origin: usize,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            direction: SearchDirection::Forward,
            query: String::new(),
            committed: None,
            origin: 0,
        }
    }
}

/// Wrapping scan for `query` starting one rune past `from` (forward) or
/// one rune before it (backward). Returns the flat rune index of the
/// match start. Plain rune comparison; no pattern syntax.
pub fn find_query(buf: &Buffer, query: &str, from: usize, forward: bool) -> Option<usize> {
    if query.is_empty() {
        return None;
    }
    let haystack: Vec<char> = buf.to_string().chars().collect();
    let needle: Vec<char> = query.chars().collect();
    if needle.len() > haystack.len() {
        return None;
    }
    let last_start = haystack.len() - needle.len();
    let matches_at = |i: usize| haystack[i..i + needle.len()] == needle[..];

    let n = last_start + 1;
    if forward {
        let first = if from >= last_start { 0 } else { from + 1 };
        (0..n)
            .map(|off| (first + off) % n)
            .find(|&i| matches_at(i))
    } else {
        let first = if from == 0 { last_start } else { from - 1 };
        (0..n)
            .map(|off| (first + n - off) % n)
            .find(|&i| matches_at(i))
    }
}
