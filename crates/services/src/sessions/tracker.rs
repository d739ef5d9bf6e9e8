use quiz_core::model::{AnswerSheet, WorkingSet, rounded_percent};

use super::progress::SessionProgress;
use crate::error::TrackerError;

/// Records the option chosen for each question of a working set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerTracker {
    option_counts: Vec<usize>,
    selections: Vec<Option<usize>>,
}

impl AnswerTracker {
    /// A fresh, all-unanswered tracker sized for `working_set`.
    #[must_use]
    pub fn new(working_set: &WorkingSet) -> Self {
        let option_counts: Vec<usize> = working_set.iter().map(|q| q.options().len()).collect();
        let selections = vec![None; option_counts.len()];
        Self {
            option_counts,
            selections,
        }
    }

    /// Select `option` for the question at `position`, replacing any earlier choice.
    ///
    /// Returns the previous selection.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError` if the position or option does not exist.
    pub fn record(&mut self, position: usize, option: usize) -> Result<Option<usize>, TrackerError> {
        let len = self.option_counts.len();
        let Some(&options) = self.option_counts.get(position) else {
            return Err(TrackerError::PositionOutOfRange { position, len });
        };
        if option >= options {
            return Err(TrackerError::OptionOutOfRange {
                position,
                option,
                len: options,
            });
        }
        Ok(self.selections[position].replace(option))
    }

    /// Mark the question at `position` unanswered again.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::PositionOutOfRange` if the position does not exist.
    pub fn clear(&mut self, position: usize) -> Result<Option<usize>, TrackerError> {
        let len = self.selections.len();
        self.selections
            .get_mut(position)
            .map(Option::take)
            .ok_or(TrackerError::PositionOutOfRange { position, len })
    }

    #[must_use]
    pub fn selection(&self, position: usize) -> Option<usize> {
        self.selections.get(position).copied().flatten()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.selections.len()
    }

    #[must_use]
    pub fn answered(&self) -> usize {
        self.selections.iter().filter(|s| s.is_some()).count()
    }

    /// Answered / total, or 0 when there are no questions.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn completion_ratio(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.answered() as f64 / total as f64
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.total();
        let answered = self.answered();
        SessionProgress {
            total,
            answered,
            remaining: total - answered,
            percent: rounded_percent(answered, total).unwrap_or(0),
        }
    }

    /// Copy of the current selections.
    #[must_use]
    pub fn snapshot(&self) -> AnswerSheet {
        AnswerSheet::from_selections(self.selections.clone())
    }
}
