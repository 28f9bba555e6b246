//! OCR-tolerant term matching for short status vocabularies.
//!
//! Scanned checkbox labels regularly lose or swap a letter ("Unremakable").
//! A token is accepted as a known term only when it is long enough to be
//! unambiguous (>= 8 letters), sits within edit distance 1 of a term, and no
//! other term is equally close.

/// Tokens shorter than this are only ever matched exactly.
const MIN_FUZZY_LEN: usize = 8;

/// Largest edit distance still accepted as an OCR slip.
const MAX_DISTANCE: u32 = 1;

/// Find the unique closest term to `word` (already lowercase).
/// Exact matches are returned regardless of length.
pub fn closest_term<'a, I>(word: &str, terms: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let word_len = word.chars().count();
    let mut best_term: Option<&str> = None;
    let mut best_distance = MAX_DISTANCE + 1;
    let mut ambiguous = false;

    for term in terms {
        if term == word {
            return Some(term);
        }
        if word_len < MIN_FUZZY_LEN {
            continue;
        }

        // Quick length filter: terms differing by more than the budget can't match
        let len_diff = word_len.abs_diff(term.chars().count());
        if len_diff as u32 > MAX_DISTANCE {
            continue;
        }

        let dist = edit_distance(word, term);
        if dist < best_distance {
            best_distance = dist;
            best_term = Some(term);
            ambiguous = false;
        } else if dist == best_distance && best_term.is_some_and(|b| b != term) {
            ambiguous = true;
        }
    }

    if ambiguous {
        None
    } else {
        best_term
    }
}

/// Compute Levenshtein edit distance between two strings.
pub fn edit_distance(a: &str, b: &str) -> u32 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n as u32;
    }
    if n == 0 {
        return m as u32;
    }

    let mut prev: Vec<u32> = (0..=n as u32).collect();
    let mut curr = vec![0u32; n + 1];

    for (i, &a_ch) in a_chars.iter().enumerate() {
        curr[0] = (i + 1) as u32;
        for (j, &b_ch) in b_chars.iter().enumerate() {
            let cost = u32::from(a_ch != b_ch);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}
