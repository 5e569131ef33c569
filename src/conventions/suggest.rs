//! Closest-token lookup shared by both engines.

/// Computes the Levenshtein edit distance between two strings.
pub(crate) fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Returns the catalog token closest to `unknown` by edit distance.
///
/// Distances are computed over lowercase strings. Ties keep the earliest
/// token in catalog order.
pub(crate) fn closest_token<'a>(candidates: &'a [String], unknown: &str) -> Option<&'a str> {
    let unknown = unknown.to_lowercase();
    let mut best: Option<(&str, usize)> = None;
    for candidate in candidates {
        let distance = levenshtein(candidate, &unknown);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((candidate.as_str(), distance)),
        }
    }
    best.map(|(token, _)| token)
}
