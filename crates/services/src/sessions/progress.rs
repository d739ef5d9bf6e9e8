/// Aggregated view of answer progress, useful for a progress bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    /// Rounded share of answered questions; 0 for an empty session.
    pub percent: u32,
}

impl SessionProgress {
    #[must_use]
    pub fn all_answered(&self) -> bool {
        self.total > 0 && self.remaining == 0
    }
}
