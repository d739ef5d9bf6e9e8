use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::{QuestionBank, TagName, WorkingQuestion, WorkingSet};

/// Returns true when `selected` narrows the bank.
///
/// Filtering only applies to a non-empty selection that does not cover every bank tag;
/// selecting nothing or everything yields the whole bank.
#[must_use]
pub fn filter_is_active(bank: &QuestionBank, selected: &[TagName]) -> bool {
    !selected.is_empty() && !bank.tags().iter().all(|tag| selected.contains(tag))
}

/// Builds a randomized working set from a question bank.
pub struct SessionBuilder<'a> {
    bank: &'a QuestionBank,
}

impl<'a> SessionBuilder<'a> {
    #[must_use]
    pub fn new(bank: &'a QuestionBank) -> Self {
        Self { bank }
    }

    /// Build with the thread-local RNG.
    #[must_use]
    pub fn build(self, selected: &[TagName]) -> WorkingSet {
        self.build_with_rng(selected, &mut rand::rng())
    }

    /// Filter by `selected`, copy the matching questions, shuffle each question's
    /// options (remapping the correct index), then shuffle question order.
    ///
    /// Unknown tags never match. An empty result is a valid, empty working set.
    pub fn build_with_rng<R: Rng + ?Sized>(self, selected: &[TagName], rng: &mut R) -> WorkingSet {
        let active = filter_is_active(self.bank, selected);

        let mut questions: Vec<WorkingQuestion> = self
            .bank
            .questions()
            .iter()
            .filter(|q| !active || q.has_any_tag(selected))
            .map(|q| WorkingQuestion::shuffled(q, rng))
            .collect();
        questions.shuffle(rng);

        log::debug!(
            "built working set: {} of {} questions (filter active: {active})",
            questions.len(),
            self.bank.len()
        );
        WorkingSet::new(questions)
    }
}
