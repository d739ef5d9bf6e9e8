use rand::Rng;

use crate::model::ids::QuestionId;
use crate::model::question::Question;
use crate::model::tag::TagName;
use crate::permute::permute_with_index_tracking;

/// A per-session copy of a bank question with its options possibly reordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingQuestion {
    source_id: QuestionId,
    text: String,
    options: Vec<String>,
    correct_index: usize,
    explanation: String,
    tags: Vec<TagName>,
}

impl WorkingQuestion {
    /// Copy a bank question without reordering.
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            source_id: question.id(),
            text: question.text().to_string(),
            options: question.options().to_vec(),
            correct_index: question.correct_index(),
            explanation: question.explanation().to_string(),
            tags: question.tags().to_vec(),
        }
    }

    /// Copy a bank question and shuffle its options, remapping the correct index.
    pub fn shuffled<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> Self {
        let mut copy = Self::from_question(question);
        let (options, correct_index) =
            permute_with_index_tracking(copy.options, copy.correct_index, rng);
        copy.options = options;
        // Bank questions always carry an in-range correct index.
        copy.correct_index = correct_index.unwrap_or(question.correct_index());
        copy
    }

    #[must_use]
    pub fn source_id(&self) -> QuestionId {
        self.source_id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn tags(&self) -> &[TagName] {
        &self.tags
    }
}

/// Ordered questions presented in one attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingSet {
    questions: Vec<WorkingQuestion>,
}

impl WorkingSet {
    #[must_use]
    pub fn new(questions: Vec<WorkingQuestion>) -> Self {
        Self { questions }
    }

    #[must_use]
    pub fn questions(&self) -> &[WorkingQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&WorkingQuestion> {
        self.questions.get(position)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WorkingQuestion> {
        self.questions.iter()
    }
}

impl<'a> IntoIterator for &'a WorkingSet {
    type Item = &'a WorkingQuestion;
    type IntoIter = std::slice::Iter<'a, WorkingQuestion>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}
