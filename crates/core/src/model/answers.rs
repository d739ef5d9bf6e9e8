/// Selected option per question position; `None` means unanswered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    selections: Vec<Option<usize>>,
}

impl AnswerSheet {
    /// An all-unanswered sheet for `len` questions.
    #[must_use]
    pub fn unanswered(len: usize) -> Self {
        Self {
            selections: vec![None; len],
        }
    }

    /// Build a sheet from explicit selections.
    #[must_use]
    pub fn from_selections(selections: Vec<Option<usize>>) -> Self {
        Self { selections }
    }

    /// Selection at `position`; positions past the end read as unanswered.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<usize> {
        self.selections.get(position).copied().flatten()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.selections.iter().filter(|s| s.is_some()).count()
    }

    #[must_use]
    pub fn selections(&self) -> &[Option<usize>] {
        &self.selections
    }
}
