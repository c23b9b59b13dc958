use tracing::debug;

use crate::models::{MatchCandidate, SearchSummary};

use super::fuzzy::partial_ratio;

/// Pick the best fuzzy match for `query` among search results.
///
/// Sponsored entries are skipped outright: they are never scored and never
/// count toward the scan cap. Scoring stops once `max_candidates`
/// non-sponsored results have been scored, even if a later result would score
/// higher. That cap is a deliberate latency/precision trade-off carried over
/// from the production matching policy; do not widen it.
///
/// Only a strictly greater score replaces the running best, so ties keep the
/// earlier-seen candidate, and candidates scoring 0 never qualify.
pub fn select_best_match(
    query: &str,
    results: &[SearchSummary],
    base_url: &str,
    max_candidates: usize,
) -> Option<MatchCandidate> {
    select_best_match_with(query, results, base_url, max_candidates, partial_ratio)
}

/// Same as [`select_best_match`] but with an injectable scorer.
pub fn select_best_match_with<S>(
    query: &str,
    results: &[SearchSummary],
    base_url: &str,
    max_candidates: usize,
    scorer: S,
) -> Option<MatchCandidate>
where
    S: Fn(&str, &str) -> u8,
{
    let mut best: Option<MatchCandidate> = None;
    let mut highest_score: u8 = 0;
    let mut scored = 0usize;

    for result in results {
        if result.sponsored {
            debug!(title = %result.title, "skipping sponsored result");
            continue;
        }

        let score = scorer(query, &result.title);
        debug!(title = %result.title, score, "scored candidate");

        if score > highest_score {
            highest_score = score;
            best = Some(MatchCandidate {
                title: result.title.clone(),
                link: normalize_link(&result.link, base_url),
                score,
            });
        }

        scored += 1;
        if scored == max_candidates {
            break;
        }
    }

    best
}

/// Rewrite a relative product link (leading `/`) to an absolute URL against
/// the marketplace base origin. Absolute links pass through unchanged.
fn normalize_link(link: &str, base_url: &str) -> String {
    if link.starts_with('/') {
        format!("{}{}", base_url.trim_end_matches('/'), link)
    } else {
        link.to_string()
    }
}
