//! "Did you mean" suggestions for unresolved names

use std::collections::BTreeSet;

/// Largest edit distance worth suggesting for a name of `len` characters
fn max_distance(len: usize) -> usize {
    match len {
        0..=3 => 1,
        4..=6 => 2,
        _ => 3,
    }
}

/// Levenshtein distance over characters
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];

    for i in 1..=a.len() {
        current[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            current[j] = (previous[j] + 1)
                .min(current[j - 1] + 1)
                .min(previous[j - 1] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Pick the candidate most likely meant by `name`.
///
/// A unique case-insensitive match wins outright. Otherwise the closest
/// candidate within the length-dependent distance bound is chosen, with
/// ties going to the lexicographically first name.
pub fn suggest<'a>(name: &str, candidates: &BTreeSet<&'a str>) -> Option<&'a str> {
    let lowered = name.to_lowercase();
    let mut case_matches = candidates
        .iter()
        .filter(|candidate| candidate.to_lowercase() == lowered);
    if let (Some(only), None) = (case_matches.next(), case_matches.next()) {
        return Some(only);
    }

    let len = name.chars().count();
    let bound = max_distance(len);
    let mut best: Option<(usize, &'a str)> = None;

    for &candidate in candidates {
        if candidate.chars().count().abs_diff(len) > bound {
            continue;
        }
        let distance = levenshtein(name, candidate);
        if distance <= bound && best.map_or(true, |(best_distance, _)| distance < best_distance) {
            best = Some((distance, candidate));
        }
    }

    best.map(|(_, candidate)| candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set<'a>(names: &[&'a str]) -> BTreeSet<&'a str> {
        names.iter().copied().collect()
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("consol", "console"), 1);
        assert_eq!(levenshtein("héllo", "hello"), 1);
    }

    #[test]
    fn test_distance_bounds() {
        assert_eq!(max_distance(3), 1);
        assert_eq!(max_distance(4), 2);
        assert_eq!(max_distance(6), 2);
        assert_eq!(max_distance(7), 3);
    }

    #[test]
    fn test_close_typo() {
        let candidates = set(&["console", "document", "window"]);
        assert_eq!(suggest("consol", &candidates), Some("console"));
        assert_eq!(suggest("windw", &candidates), Some("window"));
    }

    #[test]
    fn test_case_insensitive_match_beats_distance() {
        let candidates = set(&["UserName", "userNames"]);
        assert_eq!(suggest("username", &candidates), Some("UserName"));
    }

    #[test]
    fn test_ambiguous_case_match_falls_back_to_distance() {
        let candidates = set(&["TOTAL", "Total", "totals"]);
        // two case matches, so distance decides: `Total` and `totals` are one
        // edit away and `Total` sorts first
        assert_eq!(suggest("total", &candidates), Some("Total"));

        let candidates = set(&["Count", "COUNT", "counter"]);
        assert_eq!(suggest("count", &candidates), Some("Count"));
        let candidates = set(&["COUNT", "CoUnT", "counts"]);
        assert_eq!(suggest("count", &candidates), Some("counts"));
    }

    #[test]
    fn test_ties_pick_first_in_order() {
        let candidates = set(&["bar", "baz", "bat"]);
        assert_eq!(suggest("ba", &candidates), Some("bar"));
    }

    #[test]
    fn test_nothing_close() {
        let candidates = set(&["console", "Math", "JSON"]);
        assert_eq!(suggest("zzzqqq123", &candidates), None);
        assert_eq!(suggest("x", &candidates), None);
    }
}
