use strsim::normalized_levenshtein;

/// Partial/substring-tolerant fuzzy similarity between two strings,
/// case-insensitive, as an integer in 0..=100.
///
/// The shorter string is slid over every same-length character window of the
/// longer one and the best normalized edit similarity wins, so a query that
/// appears verbatim inside a long listing title still scores 100.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();

    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let (shorter, longer) = if a.chars().count() <= b.chars().count() {
        (a.as_str(), b.as_str())
    } else {
        (b.as_str(), a.as_str())
    };

    let shorter_len = shorter.chars().count();
    let longer_chars: Vec<char> = longer.chars().collect();

    let mut best = 0.0f64;
    for window in longer_chars.windows(shorter_len) {
        let candidate: String = window.iter().collect();
        let score = normalized_levenshtein(shorter, &candidate);
        if score > best {
            best = score;
        }
        if best >= 1.0 {
            break;
        }
    }

    (best * 100.0).round() as u8
}
