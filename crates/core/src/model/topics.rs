use indexmap::IndexMap;

use crate::model::grade::rounded_percent;
use crate::model::tag::TagName;

/// Asked/wrong counts for one topic tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TopicStat {
    pub total_asked: usize,
    pub wrong_count: usize,
}

impl TopicStat {
    pub fn record(&mut self, is_correct: bool) {
        self.total_asked += 1;
        if !is_correct {
            self.wrong_count += 1;
        }
    }

    /// Rounded share of wrong answers; 0 when nothing was asked.
    #[must_use]
    pub fn wrong_percent(&self) -> u32 {
        rounded_percent(self.wrong_count, self.total_asked).unwrap_or(0)
    }
}

/// Per-topic statistics in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicBreakdown {
    stats: IndexMap<TagName, TopicStat>,
}

impl TopicBreakdown {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, tag: &TagName, is_correct: bool) {
        self.stats.entry(tag.clone()).or_default().record(is_correct);
    }

    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&TopicStat> {
        self.stats.get(tag)
    }

    /// Wrong percentage for `tag`, if it was asked at all.
    #[must_use]
    pub fn wrong_percent(&self, tag: &str) -> Option<u32> {
        self.get(tag).map(TopicStat::wrong_percent)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TagName, &TopicStat)> {
        self.stats.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_tracks_wrong_share() {
        let mut stat = TopicStat::default();
        stat.record(true);
        stat.record(false);
        stat.record(false);
        assert_eq!(stat.total_asked, 3);
        assert_eq!(stat.wrong_count, 2);
        assert_eq!(stat.wrong_percent(), 67);
    }

    #[test]
    fn breakdown_keeps_first_occurrence_order() {
        let mut breakdown = TopicBreakdown::new();
        let malware = TagName::new("malware").unwrap();
        let phishing = TagName::new("phishing").unwrap();
        breakdown.record(&phishing, true);
        breakdown.record(&malware, false);
        breakdown.record(&phishing, false);

        let order: Vec<_> = breakdown.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(order, vec!["phishing", "malware"]);
        assert_eq!(breakdown.wrong_percent("phishing"), Some(50));
        assert_eq!(breakdown.wrong_percent("malware"), Some(100));
        assert_eq!(breakdown.wrong_percent("passwords"), None);
    }
}
