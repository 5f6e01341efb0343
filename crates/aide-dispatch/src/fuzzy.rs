//! Closest-name matching for application names.
//!
//! Scores are normalized Levenshtein similarity in `[0, 1]` over lowercased
//! names with `-`, `_` and `.` treated as spaces. A candidate whose tokens
//! contain every query token scores at least [`CONTAINMENT_SCORE`], so
//! `"code"` still finds `"visual studio code"`.

/// Minimum score for a candidate to count as a match.
pub const MATCH_THRESHOLD: f64 = 0.6;

/// Floor applied when all query tokens appear in the candidate.
pub const CONTAINMENT_SCORE: f64 = 0.85;

fn normalize(name: &str) -> String {
    name.to_lowercase()
        .replace(['-', '_', '.'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Similarity between a spoken name and an application name.
pub fn similarity(query: &str, candidate: &str) -> f64 {
    let query = normalize(query);
    let candidate = normalize(candidate);
    if query.is_empty() || candidate.is_empty() {
        return 0.0;
    }

    let longest = query.chars().count().max(candidate.chars().count());
    let score = 1.0 - levenshtein(&query, &candidate) as f64 / longest as f64;

    let tokens: Vec<&str> = candidate.split(' ').collect();
    if query.split(' ').all(|t| tokens.contains(&t)) {
        score.max(CONTAINMENT_SCORE)
    } else {
        score
    }
}

/// Best candidate scoring at least [`MATCH_THRESHOLD`]; ties go to the shorter name.
pub fn closest_match<'a>(query: &str, candidates: &'a [String]) -> Option<&'a str> {
    candidates
        .iter()
        .map(|c| (similarity(query, c), c))
        .filter(|(score, _)| *score >= MATCH_THRESHOLD)
        .max_by(|(sa, a), (sb, b)| sa.total_cmp(sb).then_with(|| b.len().cmp(&a.len())))
        .map(|(_, c)| c.as_str())
}
