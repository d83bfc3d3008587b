//! Rank lookup and visibility classification.

use geovis_common::{PerChannel, RankMatch, SerpResult, VisibilityStatus};

/// First entry whose domain or URL contains `target_domain`.
///
/// Entries are scanned in list order, so the first hit is the best rank.
pub fn find_rank(results: Option<&[SerpResult]>, target_domain: &str) -> RankMatch {
    let Some(results) = results else {
        return RankMatch::NotFound;
    };
    if target_domain.is_empty() {
        return RankMatch::NotFound;
    }

    results
        .iter()
        .find(|r| r.domain.contains(target_domain) || r.url.to_lowercase().contains(target_domain))
        .map(|r| RankMatch::Found {
            rank: r.rank,
            url: r.url.clone(),
        })
        .unwrap_or(RankMatch::NotFound)
}

/// Classify one row from its four rank matches.
///
/// `all_four_empty` means every provider call produced nothing at all, which
/// wins over any match outcome.
pub fn classify_status(
    model_gpt: &RankMatch,
    model_gemini: &RankMatch,
    web_gpt: &RankMatch,
    web_gemini: &RankMatch,
    all_four_empty: bool,
) -> VisibilityStatus {
    if all_four_empty {
        return VisibilityStatus::Error;
    }

    let in_model = model_gpt.is_found() || model_gemini.is_found();
    let in_search = web_gpt.is_found() || web_gemini.is_found();

    match (in_model, in_search) {
        (true, _) => VisibilityStatus::Visible,
        (false, true) => VisibilityStatus::ToolOnly,
        (false, false) => VisibilityStatus::Invisible,
    }
}

/// Rank every channel and classify the row.
pub fn rank_row(
    results: &PerChannel<Option<Vec<SerpResult>>>,
    target_domain: &str,
) -> (PerChannel<RankMatch>, VisibilityStatus) {
    let ranks = results.map(|_, r| find_rank(r.as_deref(), target_domain));
    let all_four_empty = [
        &results.gpt_model_only,
        &results.gpt_with_search,
        &results.gemini_model_only,
        &results.gemini_with_search,
    ]
    .iter()
    .all(|r| r.as_ref().map_or(true, Vec::is_empty));

    let status = classify_status(
        &ranks.gpt_model_only,
        &ranks.gemini_model_only,
        &ranks.gpt_with_search,
        &ranks.gemini_with_search,
        all_four_empty,
    );
    (ranks, status)
}
