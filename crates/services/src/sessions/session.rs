use chrono::{DateTime, Utc};
use std::fmt;

use quiz_core::model::{AnswerSheet, GradeReport, TopicBreakdown, WorkingSet};

use super::analytics::aggregate;
use super::grader::grade;
use super::progress::SessionProgress;
use super::tracker::AnswerTracker;
use crate::error::SessionError;

/// Lifecycle of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    InProgress,
    Graded,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::InProgress => "in progress",
            Self::Graded => "graded",
        };
        f.write_str(label)
    }
}

/// What caused an attempt to be graded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    Manual,
    TimerExpired,
}

/// Immutable result of grading one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOutcome {
    pub attempt: u64,
    pub report: GradeReport,
    pub topics: TopicBreakdown,
    pub trigger: SubmitTrigger,
    pub graded_at: DateTime<Utc>,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Explicit quiz session: `Idle -> InProgress -> Graded -> Idle`.
///
/// Each `begin` starts a new attempt with a fresh answer tracker. Grading happens at
/// most once per attempt; later submits and stale timer expiries are ignored.
pub struct QuizSession {
    state: SessionState,
    attempt: u64,
    working_set: WorkingSet,
    tracker: AnswerTracker,
    started_at: Option<DateTime<Utc>>,
    outcome: Option<QuizOutcome>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            attempt: 0,
            working_set: WorkingSet::default(),
            tracker: AnswerTracker::default(),
            started_at: None,
            outcome: None,
        }
    }

    /// Replace the working set and enter `InProgress`, from any state.
    ///
    /// Returns the new attempt number.
    pub fn begin(&mut self, working_set: WorkingSet, started_at: DateTime<Utc>) -> u64 {
        self.attempt += 1;
        self.tracker = AnswerTracker::new(&working_set);
        self.working_set = working_set;
        self.started_at = Some(started_at);
        self.outcome = None;
        self.state = SessionState::InProgress;
        log::debug!(
            "attempt {} started with {} questions",
            self.attempt,
            self.working_set.len()
        );
        self.attempt
    }

    /// Back to `Idle`, dropping the working set and answers.
    pub fn reset(&mut self) {
        self.working_set = WorkingSet::default();
        self.tracker = AnswerTracker::default();
        self.started_at = None;
        self.outcome = None;
        self.state = SessionState::Idle;
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Number of the current (or last) attempt; 0 before the first `begin`.
    #[must_use]
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    #[must_use]
    pub fn working_set(&self) -> &WorkingSet {
        &self.working_set
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Select an option for a question of the running attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress` outside `InProgress`, and
    /// `SessionError::Tracker` for positions or options that do not exist.
    pub fn record(&mut self, position: usize, option: usize) -> Result<Option<usize>, SessionError> {
        self.ensure_in_progress()?;
        Ok(self.tracker.record(position, option)?)
    }

    /// Clear the selection for a question of the running attempt.
    ///
    /// # Errors
    ///
    /// Same as [`QuizSession::record`].
    pub fn clear_answer(&mut self, position: usize) -> Result<Option<usize>, SessionError> {
        self.ensure_in_progress()?;
        Ok(self.tracker.clear(position)?)
    }

    #[must_use]
    pub fn answers(&self) -> AnswerSheet {
        self.tracker.snapshot()
    }

    #[must_use]
    pub fn completion_ratio(&self) -> f64 {
        self.tracker.completion_ratio()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        self.tracker.progress()
    }

    /// Correct option index for every position of the working set.
    #[must_use]
    pub fn answer_key(&self) -> Vec<usize> {
        self.working_set
            .iter()
            .map(|q| q.correct_index())
            .collect()
    }

    /// Grade the running attempt on user request.
    ///
    /// Returns `None` (and changes nothing) unless the session is `InProgress`.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Option<&QuizOutcome> {
        self.grade_once(SubmitTrigger::Manual, now)
    }

    /// Grade attempt `attempt` because its countdown ran out.
    ///
    /// Ignored for stale attempts and for sessions that are not `InProgress`.
    pub fn expire(&mut self, attempt: u64, now: DateTime<Utc>) -> Option<&QuizOutcome> {
        if attempt != self.attempt {
            log::warn!(
                "ignoring expiry for stale attempt {attempt} (current {})",
                self.attempt
            );
            return None;
        }
        self.grade_once(SubmitTrigger::TimerExpired, now)
    }

    /// The outcome of the current attempt once graded.
    #[must_use]
    pub fn outcome(&self) -> Option<&QuizOutcome> {
        self.outcome.as_ref()
    }

    fn grade_once(&mut self, trigger: SubmitTrigger, now: DateTime<Utc>) -> Option<&QuizOutcome> {
        if self.state != SessionState::InProgress {
            log::warn!("ignoring {trigger:?} submit while session is {}", self.state);
            return None;
        }

        let report = grade(&self.working_set, &self.tracker.snapshot());
        let topics = if report.total() == 0 {
            TopicBreakdown::new()
        } else {
            aggregate(report.results(), &self.working_set)
        };
        log::info!(
            "attempt {} graded ({trigger:?}): {}/{}",
            self.attempt,
            report.score(),
            report.total()
        );

        self.state = SessionState::Graded;
        self.outcome = Some(QuizOutcome {
            attempt: self.attempt,
            report,
            topics,
            trigger,
            graded_at: now,
        });
        self.outcome.as_ref()
    }

    fn ensure_in_progress(&self) -> Result<(), SessionError> {
        if self.state == SessionState::InProgress {
            Ok(())
        } else {
            Err(SessionError::NotInProgress(self.state))
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("state", &self.state)
            .field("attempt", &self.attempt)
            .field("questions", &self.working_set.len())
            .field("answered", &self.tracker.answered())
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackerError;
    use crate::sessions::builder::SessionBuilder;
    use quiz_core::model::QuestionBank;
    use quiz_core::time::fixed_now;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn started_session() -> QuizSession {
        let bank = QuestionBank::builtin();
        let ws = SessionBuilder::new(&bank).build_with_rng(&[], &mut StdRng::seed_from_u64(3));
        let mut session = QuizSession::new();
        session.begin(ws, fixed_now());
        session
    }

    #[test]
    fn new_session_is_idle_and_rejects_answers() {
        let mut session = QuizSession::new();
        assert_eq!(session.state(), SessionState::Idle);
        let err = session.record(0, 0).unwrap_err();
        assert!(matches!(err, SessionError::NotInProgress(SessionState::Idle)));
        assert!(session.submit(fixed_now()).is_none());
    }

    #[test]
    fn submit_grades_once() {
        let mut session = started_session();
        let key = session.answer_key();
        session.record(0, key[0]).unwrap();

        let outcome = session.submit(fixed_now()).cloned().expect("graded");
        assert_eq!(outcome.report.score(), 1);
        assert_eq!(outcome.trigger, SubmitTrigger::Manual);
        assert_eq!(session.state(), SessionState::Graded);

        assert!(session.submit(fixed_now()).is_none());
        assert!(session.expire(session.attempt(), fixed_now()).is_none());
        assert_eq!(session.outcome(), Some(&outcome));
    }

    #[test]
    fn answers_are_frozen_after_grading() {
        let mut session = started_session();
        session.submit(fixed_now());
        let err = session.record(0, 0).unwrap_err();
        assert!(matches!(err, SessionError::NotInProgress(SessionState::Graded)));
    }

    #[test]
    fn stale_expiry_is_ignored() {
        let mut session = started_session();
        let first = session.attempt();
        let ws = session.working_set().clone();
        let second = session.begin(ws, fixed_now());
        assert_eq!(second, first + 1);

        assert!(session.expire(first, fixed_now()).is_none());
        assert_eq!(session.state(), SessionState::InProgress);

        let outcome = session.expire(second, fixed_now()).expect("graded");
        assert_eq!(outcome.trigger, SubmitTrigger::TimerExpired);
        assert_eq!(outcome.attempt, second);
    }

    #[test]
    fn rebuild_resets_answers() {
        let mut session = started_session();
        session.record(0, 1).unwrap();
        session.record(1, 1).unwrap();
        let ws = session.working_set().clone();
        session.begin(ws, fixed_now());
        assert_eq!(session.progress().answered, 0);
        assert_eq!(session.completion_ratio(), 0.0);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut session = started_session();
        session.submit(fixed_now());
        assert_eq!(session.started_at(), Some(fixed_now()));
        session.reset();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.started_at(), None);
        assert!(session.outcome().is_none());
        assert!(session.working_set().is_empty());
    }

    #[test]
    fn empty_working_set_grades_zero_of_zero_without_topics() {
        let mut session = QuizSession::new();
        session.begin(WorkingSet::default(), fixed_now());
        let outcome = session.submit(fixed_now()).expect("graded");
        assert_eq!(outcome.report.score(), 0);
        assert_eq!(outcome.report.total(), 0);
        assert!(outcome.topics.is_empty());
    }

    #[test]
    fn invalid_answers_surface_tracker_errors() {
        let mut session = started_session();
        let err = session.record(99, 0).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Tracker(TrackerError::PositionOutOfRange { position: 99, len: 10 })
        ));
    }
}
