//! Parsing of compact index selections such as `1 3 5-7`.
//!
//! Tokens are whitespace separated; each is a 1-based index or an inclusive
//! `start-end` range (a reversed range is swapped). Tokens that are neither
//! are discarded and counted, indices outside `1..=max_index` are dropped and
//! counted, and the surviving indices come back ascending and deduplicated.

use std::collections::BTreeSet;
use tracing::debug;

/// Outcome of parsing one selection string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Ascending, duplicate-free indices within `1..=max_index`
    pub indices: Vec<usize>,

    /// Number of indices that fell outside the displayed list
    pub out_of_range: usize,

    /// Tokens that were neither an integer nor a range
    pub invalid_tokens: Vec<String>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Pick the selected items out of the list the indices refer to
    pub fn pick<'a, T>(&self, items: &'a [T]) -> Vec<&'a T> {
        self.indices
            .iter()
            .filter_map(|i| items.get(i.checked_sub(1)?))
            .collect()
    }

    /// Human readable notices about discarded input, if any
    pub fn notices(&self) -> Vec<String> {
        let mut notices = Vec::new();
        if !self.invalid_tokens.is_empty() {
            notices.push(format!(
                "Ignored {} invalid token(s): {} (use numbers and ranges, e.g. 1 3 5-7)",
                self.invalid_tokens.len(),
                self.invalid_tokens.join(", ")
            ));
        }
        if self.out_of_range > 0 {
            notices.push(format!(
                "Ignored {} out-of-range index(es)",
                self.out_of_range
            ));
        }
        notices
    }
}

enum Token {
    Single(u64),
    Range(u64, u64),
}

/// Plain ASCII digits only; `str::parse` would also take a leading `+`
fn parse_index(digits: &str) -> Option<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn parse_token(token: &str) -> Option<Token> {
    match token.split_once('-') {
        Some((start, end)) => {
            let start = parse_index(start)?;
            let end = parse_index(end)?;
            Some(Token::Range(start.min(end), start.max(end)))
        }
        None => parse_index(token).map(Token::Single),
    }
}

/// Parse `text` into indices valid for a list of `max_index` items
pub fn parse_selection(text: &str, max_index: usize) -> Selection {
    let mut indices = BTreeSet::new();
    let mut out_of_range: usize = 0;
    let mut invalid_tokens = Vec::new();
    let max = max_index as u64;

    for token in text.split_whitespace() {
        let (start, end) = match parse_token(token) {
            Some(Token::Single(n)) => (n, n),
            Some(Token::Range(start, end)) => (start, end),
            None => {
                invalid_tokens.push(token.to_string());
                continue;
            }
        };

        // Clamp before expanding so huge ranges stay cheap
        let lo = start.max(1);
        let hi = end.min(max);
        let requested = (end - start).saturating_add(1);
        let kept = if lo <= hi { hi - lo + 1 } else { 0 };
        let dropped = usize::try_from(requested - kept).unwrap_or(usize::MAX);
        out_of_range = out_of_range.saturating_add(dropped);

        if kept > 0 {
            indices.extend((lo..=hi).map(|i| i as usize));
        }
    }

    let selection = Selection {
        indices: indices.into_iter().collect(),
        out_of_range,
        invalid_tokens,
    };
    debug!(
        "Parsed selection '{}' (max {}): {:?}",
        text, max_index, selection
    );
    selection
}
