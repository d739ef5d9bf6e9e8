use quiz_core::model::{GradeResult, TagName, TopicBreakdown, WorkingSet};

/// Summarize results by topic tag.
///
/// Every result counts toward each tag of its question (looked up by position in
/// `working_set`); questions without tags count toward `general`.
#[must_use]
pub fn aggregate(results: &[GradeResult], working_set: &WorkingSet) -> TopicBreakdown {
    let general = [TagName::general()];
    let mut breakdown = TopicBreakdown::new();
    for result in results {
        let tags = working_set
            .get(result.position)
            .map(|q| q.tags())
            .filter(|tags| !tags.is_empty())
            .unwrap_or(&general);
        for tag in tags {
            breakdown.record(tag, result.is_correct);
        }
    }
    breakdown
}
