//! Deterministic data-quality scoring.

use crate::types::EnrichedResult;

/// Score a result's completeness on a 0 to 100 scale.
///
/// Additive checklist: +20 URL, +20 title (raw or page), +15 description
/// (raw or page), +15/+10/+5 for content length over 1000/500/100,
/// +10 any images, +10 any links, +10 no error fields. Capped at 100.
pub fn quality_score(result: &EnrichedResult) -> u8 {
    let mut score: u32 = 0;

    if !result.url.is_empty() {
        score += 20;
    }

    let has_title = result.title.as_deref().is_some_and(|t| !t.is_empty())
        || result
            .metadata
            .page_title
            .as_deref()
            .is_some_and(|t| !t.is_empty());
    if has_title {
        score += 20;
    }

    let has_description = result.description.as_deref().is_some_and(|d| !d.is_empty())
        || result
            .metadata
            .page_description
            .as_deref()
            .is_some_and(|d| !d.is_empty());
    if has_description {
        score += 15;
    }

    let content_length = result.metadata.page_content_length;
    if content_length > 1000 {
        score += 15;
    } else if content_length > 500 {
        score += 10;
    } else if content_length > 100 {
        score += 5;
    }

    if !result.metadata.page_images.is_empty() {
        score += 10;
    }
    if !result.metadata.page_links.is_empty() {
        score += 10;
    }
    if result.error.is_none() && result.metadata_error.is_none() {
        score += 10;
    }

    score.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PageMetadata;
    use chrono::Utc;
    use serde_json::json;

    fn base_result() -> EnrichedResult {
        EnrichedResult {
            url: String::new(),
            title: None,
            description: None,
            query: "q".into(),
            source_url: "https://example.com".into(),
            search_term_id: json!(1),
            search_term_data: json!({"id": 1}),
            extraction_timestamp: Utc::now(),
            metadata: PageMetadata::default(),
            data_quality_score: 0,
            metadata_error: None,
            error: None,
        }
    }

    #[test]
    fn empty_result_scores_only_the_no_error_bonus() {
        assert_eq!(quality_score(&base_result()), 10);
    }

    #[test]
    fn complete_result_scores_exactly_100() {
        let mut result = base_result();
        result.url = "https://example.com/item".into();
        result.title = Some("Title".into());
        result.description = Some("Description".into());
        result.metadata.page_content_length = 1200;
        result.metadata.page_images = vec!["https://example.com/a.jpg".into(); 2];
        result.metadata.page_links = vec!["https://example.com/l".into(); 3];
        assert_eq!(quality_score(&result), 100);
    }

    #[test]
    fn page_fields_substitute_for_raw_fields() {
        let mut result = base_result();
        result.metadata.page_title = Some("Page Title".into());
        result.metadata.page_description = Some("Page description".into());
        // 20 title + 15 description + 10 no errors
        assert_eq!(quality_score(&result), 45);
    }

    #[test]
    fn content_length_tiers() {
        let mut result = base_result();
        result.metadata.page_content_length = 50;
        assert_eq!(quality_score(&result), 10);
        result.metadata.page_content_length = 101;
        assert_eq!(quality_score(&result), 15);
        result.metadata.page_content_length = 501;
        assert_eq!(quality_score(&result), 20);
        result.metadata.page_content_length = 1001;
        assert_eq!(quality_score(&result), 25);
    }

    #[test]
    fn longer_content_never_decreases_score() {
        let mut result = base_result();
        let mut previous = 0;
        for length in [0, 100, 101, 500, 501, 1000, 1001, 100_000] {
            result.metadata.page_content_length = length;
            let score = quality_score(&result);
            assert!(score >= previous, "score dropped at length {length}");
            previous = score;
        }
    }

    #[test]
    fn errors_forfeit_the_no_error_bonus() {
        let mut result = base_result();
        result.metadata_error = Some("timed out".into());
        assert_eq!(quality_score(&result), 0);
        result.metadata_error = None;
        result.error = Some("broken".into());
        assert_eq!(quality_score(&result), 0);
    }

    #[test]
    fn score_always_within_bounds() {
        let mut result = base_result();
        result.url = "https://example.com".into();
        result.title = Some("t".into());
        result.description = Some("d".into());
        result.metadata.page_title = Some("pt".into());
        result.metadata.page_description = Some("pd".into());
        result.metadata.page_content_length = usize::MAX;
        result.metadata.page_images = vec!["i".into()];
        result.metadata.page_links = vec!["l".into()];
        assert!(quality_score(&result) <= 100);
    }
}
