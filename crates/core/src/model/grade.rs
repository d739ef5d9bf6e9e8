use crate::model::ids::QuestionId;

/// Percentage of `part` in `whole`, rounded half-up. `None` when `whole` is zero.
#[must_use]
pub fn rounded_percent(part: usize, whole: usize) -> Option<u32> {
    if whole == 0 {
        return None;
    }
    let pct = (part.saturating_mul(200) + whole) / whole.saturating_mul(2);
    Some(u32::try_from(pct).unwrap_or(u32::MAX))
}

/// Outcome for a single question position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeResult {
    pub position: usize,
    pub question_id: QuestionId,
    pub is_correct: bool,
    pub selected: Option<usize>,
    pub correct_index: usize,
    pub explanation: String,
}

/// Encouragement band for a final percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Great,
    KeepGoing,
    StartWithBasics,
}

impl Verdict {
    #[must_use]
    pub fn from_percent(percent: u32) -> Self {
        match percent {
            80.. => Self::Great,
            50..=79 => Self::KeepGoing,
            _ => Self::StartWithBasics,
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Great => "Great job!",
            Self::KeepGoing => "Keep going!",
            Self::StartWithBasics => "Start with the basics.",
        }
    }
}

/// Per-question results plus the aggregate score of one grading pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeReport {
    results: Vec<GradeResult>,
    score: usize,
}

impl GradeReport {
    #[must_use]
    pub fn new(results: Vec<GradeResult>) -> Self {
        let score = results.iter().filter(|r| r.is_correct).count();
        Self { results, score }
    }

    #[must_use]
    pub fn results(&self) -> &[GradeResult] {
        &self.results
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Rounded score percentage; `None` for a zero-question attempt.
    #[must_use]
    pub fn percent(&self) -> Option<u32> {
        rounded_percent(self.score, self.total())
    }

    #[must_use]
    pub fn verdict(&self) -> Verdict {
        Verdict::from_percent(self.percent().unwrap_or(0))
    }
}
