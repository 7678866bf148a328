//! Bitap (shift-or) approximate string matching with bounded errors.
//!
//! Patterns longer than [`MAX_BITS`] characters are split into chunks that
//! are matched independently; the final score is the mean of chunk scores.
//! Matching is case-insensitive.

use std::collections::HashMap;

/// Longest pattern chunk that fits the bit vectors.
pub const MAX_BITS: usize = 32;

/// Lowest score reported for a non-identical match.
const MIN_SCORE: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BitapOptions {
    pub threshold: f64,
    pub location: usize,
    pub distance: usize,
    pub ignore_location: bool,
    pub min_match_char_length: usize,
    pub find_all_matches: bool,
}

/// Outcome of matching one pattern against one text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BitapMatch {
    pub is_match: bool,
    /// `0.0` is an identical match, `1.0` no match.
    pub score: f64,
}

impl BitapMatch {
    const NONE: Self = Self {
        is_match: false,
        score: 1.0,
    };
}

#[derive(Debug, Clone)]
struct PatternChunk {
    pattern: Vec<char>,
    alphabet: HashMap<char, u32>,
    start_index: usize,
}

impl PatternChunk {
    fn new(pattern: &[char], start_index: usize) -> Self {
        let len = pattern.len();
        let mut alphabet: HashMap<char, u32> = HashMap::new();
        for (i, c) in pattern.iter().enumerate() {
            *alphabet.entry(*c).or_insert(0) |= 1u32 << (len - i - 1);
        }

        Self {
            pattern: pattern.to_vec(),
            alphabet,
            start_index,
        }
    }
}

/// A compiled query.
#[derive(Debug, Clone)]
pub struct BitapSearcher {
    pattern: Vec<char>,
    chunks: Vec<PatternChunk>,
    options: BitapOptions,
}

impl BitapSearcher {
    pub fn new(pattern: &str, options: BitapOptions) -> Self {
        let pattern: Vec<char> = pattern.to_lowercase().chars().collect();
        let len = pattern.len();

        let mut chunks = Vec::new();
        if len > MAX_BITS {
            let remainder = len % MAX_BITS;
            let end = len - remainder;
            let mut i = 0;
            while i < end {
                chunks.push(PatternChunk::new(&pattern[i..i + MAX_BITS], i));
                i += MAX_BITS;
            }
            if remainder > 0 {
                let start = len - MAX_BITS;
                chunks.push(PatternChunk::new(&pattern[start..], start));
            }
        } else if len > 0 {
            chunks.push(PatternChunk::new(&pattern, 0));
        }

        Self {
            pattern,
            chunks,
            options,
        }
    }

    pub fn pattern_len(&self) -> usize {
        self.pattern.len()
    }

    /// Match the compiled pattern against `text`.
    pub fn search_in(&self, text: &str) -> BitapMatch {
        if self.chunks.is_empty() {
            return BitapMatch::NONE;
        }

        let text: Vec<char> = text.to_lowercase().chars().collect();
        if text == self.pattern {
            return BitapMatch {
                is_match: true,
                score: 0.0,
            };
        }

        let mut total = 0.0;
        let mut has_matches = false;
        for chunk in &self.chunks {
            let m = search_chunk(&text, chunk, &self.options);
            has_matches |= m.is_match;
            total += m.score;
        }

        if has_matches {
            BitapMatch {
                is_match: true,
                score: total / self.chunks.len() as f64,
            }
        } else {
            BitapMatch::NONE
        }
    }
}

fn compute_score(
    pattern_len: usize,
    errors: usize,
    current_location: usize,
    expected_location: usize,
    options: &BitapOptions,
) -> f64 {
    let accuracy = errors as f64 / pattern_len as f64;
    if options.ignore_location {
        return accuracy;
    }

    let proximity = expected_location.abs_diff(current_location);
    if options.distance == 0 {
        return if proximity > 0 { 1.0 } else { accuracy };
    }
    accuracy + proximity as f64 / options.distance as f64
}

fn find_from(text: &[char], pattern: &[char], from: usize) -> Option<usize> {
    if from > text.len() || pattern.len() > text.len() - from {
        return None;
    }
    text[from..]
        .windows(pattern.len())
        .position(|w| w == pattern)
        .map(|p| p + from)
}

/// Runs of consecutive matched positions at least `min_len` long.
fn match_runs(mask: &[bool], min_len: usize) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start: Option<usize> = None;

    for (i, &matched) in mask.iter().enumerate() {
        match (matched, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                if i - s >= min_len {
                    runs.push((s, i - 1));
                }
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        if mask.len() - s >= min_len {
            runs.push((s, mask.len() - 1));
        }
    }
    runs
}

fn search_chunk(text: &[char], chunk: &PatternChunk, options: &BitapOptions) -> BitapMatch {
    let pattern = &chunk.pattern;
    let pattern_len = pattern.len();
    let text_len = text.len();

    let expected = (options.location + chunk.start_index).min(text_len);
    let mut current_threshold = options.threshold;
    let compute_matches = options.min_match_char_length > 1;
    let mut match_mask = vec![false; if compute_matches { text_len } else { 0 }];

    // Exact occurrences tighten the threshold before the approximate pass.
    let mut from = expected;
    while let Some(index) = find_from(text, pattern, from) {
        let score = compute_score(pattern_len, 0, index, expected, options);
        current_threshold = current_threshold.min(score);
        from = index + pattern_len;
        if compute_matches {
            match_mask[index..index + pattern_len].fill(true);
        }
    }

    let mut best_location: Option<usize> = None;
    let mut final_score = 1.0;
    let mut last_bits: Vec<u32> = Vec::new();
    let mut bin_max = pattern_len + text_len;
    let mask = 1u32 << (pattern_len - 1);

    for errors in 0..pattern_len {
        // Widest window that can still beat the threshold with this many errors.
        let mut bin_min = 0;
        let mut bin_mid = bin_max;
        while bin_min < bin_mid {
            let score = compute_score(pattern_len, errors, expected + bin_mid, expected, options);
            if score <= current_threshold {
                bin_min = bin_mid;
            } else {
                bin_max = bin_mid;
            }
            bin_mid = (bin_max - bin_min) / 2 + bin_min;
        }
        bin_max = bin_mid;

        let mut start = (expected + 1).saturating_sub(bin_mid).max(1);
        let finish = if options.find_all_matches {
            text_len
        } else {
            (expected + bin_mid).min(text_len) + pattern_len
        };

        let mut bits = vec![0u32; finish + 2];
        bits[finish + 1] = (1u32 << errors).wrapping_sub(1);

        let mut j = finish;
        while j >= start {
            let current_location = j - 1;
            let char_match = text
                .get(current_location)
                .and_then(|c| chunk.alphabet.get(c))
                .copied()
                .unwrap_or(0);

            if compute_matches && current_location < text_len {
                match_mask[current_location] = char_match != 0;
            }

            bits[j] = ((bits[j + 1] << 1) | 1) & char_match;
            if errors > 0 {
                let prev_next = last_bits.get(j + 1).copied().unwrap_or(0);
                let prev = last_bits.get(j).copied().unwrap_or(0);
                bits[j] |= ((prev_next | prev) << 1) | 1 | prev_next;
            }

            if bits[j] & mask != 0 {
                final_score = compute_score(pattern_len, errors, current_location, expected, options);
                if final_score <= current_threshold {
                    current_threshold = final_score;
                    best_location = Some(current_location);
                    if current_location <= expected {
                        break;
                    }
                    start = (2 * expected).saturating_sub(current_location).max(1);
                }
            }

            j -= 1;
        }

        // One more error cannot beat the current best.
        let score = compute_score(pattern_len, errors + 1, expected, expected, options);
        if score > current_threshold {
            break;
        }
        last_bits = bits;
    }

    let mut result = BitapMatch {
        is_match: best_location.is_some(),
        score: f64::max(MIN_SCORE, final_score),
    };
    if compute_matches && match_runs(&match_mask, options.min_match_char_length).is_empty() {
        result.is_match = false;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> BitapOptions {
        BitapOptions {
            threshold: 0.2,
            location: 0,
            distance: 100,
            ignore_location: true,
            min_match_char_length: 3,
            find_all_matches: false,
        }
    }

    fn search(pattern: &str, text: &str) -> BitapMatch {
        BitapSearcher::new(pattern, options()).search_in(text)
    }

    #[test]
    fn identical_text_scores_zero() {
        let m = search("Widget", "widget");
        assert!(m.is_match);
        assert_eq!(m.score, 0.0);
    }

    #[test]
    fn substring_anywhere_scores_floor() {
        let m = search("fiber", "Pure Fiber Blend");
        assert!(m.is_match);
        assert_eq!(m.score, MIN_SCORE);
    }

    #[test]
    fn one_typo_within_threshold_matches() {
        let m = search("widgit", "blue widget");
        assert!(m.is_match);
        assert!((m.score - 1.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn too_many_typos_do_not_match() {
        let m = search("wodgat", "widget");
        assert!(!m.is_match);
    }

    #[test]
    fn unrelated_text_does_not_match() {
        let m = search("tangerine", "osteo fx");
        assert!(!m.is_match);
        assert_eq!(m.score, 1.0);
    }

    #[test]
    fn short_runs_are_rejected_by_min_match_length() {
        // "ab" is present but the longest run of pattern characters is 2.
        let m = search("ab", "xabx");
        assert!(!m.is_match);

        // Identity still matches regardless of length.
        assert!(search("ab", "AB").is_match);
    }

    #[test]
    fn min_match_length_of_one_disables_run_check() {
        let opts = BitapOptions {
            min_match_char_length: 1,
            ..options()
        };
        let m = BitapSearcher::new("ab", opts).search_in("xabx");
        assert!(m.is_match);
    }

    #[test]
    fn location_aware_mode_penalizes_distance() {
        let opts = BitapOptions {
            ignore_location: false,
            threshold: 0.6,
            ..options()
        };
        let near = BitapSearcher::new("fiber", opts).search_in("fiber blend");
        let far = BitapSearcher::new("fiber", opts).search_in(&format!("{}fiber", "x".repeat(40)));
        assert!(near.is_match && far.is_match);
        assert!(near.score < far.score);
        assert!((far.score - 0.4).abs() < 1e-9);
    }

    #[test]
    fn long_patterns_are_chunked() {
        let text = "the quick brown fox jumps over the lazy dog and keeps running far away";
        let searcher = BitapSearcher::new(&text[..50], options());
        assert_eq!(searcher.pattern_len(), 50);
        assert_eq!(searcher.chunks.len(), 2);
        assert_eq!(searcher.chunks[1].start_index, 18);

        let m = searcher.search_in(text);
        assert!(m.is_match);
        assert_eq!(m.score, MIN_SCORE);
    }

    #[test]
    fn empty_pattern_never_matches() {
        let m = search("", "anything");
        assert!(!m.is_match);
    }

    #[test]
    fn match_runs_reports_inclusive_ranges() {
        let mask = [true, true, true, false, true, true, false, true, true, true, true];
        assert_eq!(match_runs(&mask, 3), vec![(0, 2), (7, 10)]);
        assert_eq!(match_runs(&mask, 1), vec![(0, 2), (4, 5), (7, 10)]);
        assert!(match_runs(&[], 3).is_empty());
    }
}
