use std::sync::Arc;

use quiz_core::model::{BestScore, QuestionBank, QuizSettings, TagName};
use rand::Rng;
use storage::repository::BestScoreRepository;

use super::builder::SessionBuilder;
use super::session::{QuizOutcome, QuizSession};
use crate::Clock;
use crate::best_score_service::{BestScoreService, BestScoreUpdate};
use crate::error::SessionError;

/// Result of a grading pass that actually happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResult {
    pub outcome: QuizOutcome,
    /// `None` when the attempt had no questions and no percentage exists.
    pub best: Option<BestScoreUpdate>,
}

/// Orchestrates session start, grading and best-score bookkeeping.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    bank: Arc<QuestionBank>,
    settings: QuizSettings,
    best_scores: BestScoreService,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        bank: Arc<QuestionBank>,
        settings: QuizSettings,
        best_scores: Arc<dyn BestScoreRepository>,
    ) -> Self {
        Self {
            clock,
            bank,
            settings,
            best_scores: BestScoreService::new(clock, best_scores),
        }
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn settings(&self) -> QuizSettings {
        self.settings
    }

    /// Build a fresh working set for `tags` and start a new attempt.
    ///
    /// Returns the attempt number.
    pub fn start(&self, session: &mut QuizSession, tags: &[TagName]) -> u64 {
        self.start_with_rng(session, tags, &mut rand::rng())
    }

    pub fn start_with_rng<R: Rng + ?Sized>(
        &self,
        session: &mut QuizSession,
        tags: &[TagName],
        rng: &mut R,
    ) -> u64 {
        let working_set = SessionBuilder::new(&self.bank).build_with_rng(tags, rng);
        session.begin(working_set, self.clock.now())
    }

    /// Grade on user request, then offer the percentage to the best-score store.
    ///
    /// Returns `Ok(None)` if the session ignored the submit.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::BestScore` if the best-score store fails. The session
    /// stays graded in that case.
    pub async fn submit(
        &self,
        session: &mut QuizSession,
    ) -> Result<Option<SubmitResult>, SessionError> {
        let outcome = session.submit(self.clock.now()).cloned();
        self.finish(outcome).await
    }

    /// Grade because attempt `attempt` ran out of time.
    ///
    /// Returns `Ok(None)` for stale attempts or sessions that are not in progress.
    ///
    /// # Errors
    ///
    /// Same as [`QuizLoopService::submit`].
    pub async fn expire(
        &self,
        session: &mut QuizSession,
        attempt: u64,
    ) -> Result<Option<SubmitResult>, SessionError> {
        let outcome = session.expire(attempt, self.clock.now()).cloned();
        self.finish(outcome).await
    }

    /// Currently stored best score.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::BestScore` on storage failures.
    pub async fn best_score(&self) -> Result<Option<BestScore>, SessionError> {
        Ok(self.best_scores.current().await?)
    }

    async fn finish(
        &self,
        outcome: Option<QuizOutcome>,
    ) -> Result<Option<SubmitResult>, SessionError> {
        let Some(outcome) = outcome else {
            return Ok(None);
        };
        let best = match outcome.report.percent() {
            Some(percent) => Some(self.best_scores.record(percent).await?),
            None => None,
        };
        Ok(Some(SubmitResult { outcome, best }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::SessionState;
    use quiz_core::time::fixed_now;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use storage::repository::InMemoryRepository;

    fn service(repo: InMemoryRepository) -> QuizLoopService {
        QuizLoopService::new(
            Clock::fixed(fixed_now()),
            Arc::new(QuestionBank::builtin()),
            QuizSettings::default(),
            Arc::new(repo),
        )
    }

    #[tokio::test]
    async fn perfect_attempt_updates_best_score() {
        let repo = InMemoryRepository::new();
        let svc = service(repo.clone());
        let mut session = QuizSession::new();
        svc.start_with_rng(&mut session, &[], &mut StdRng::seed_from_u64(9));

        for (position, correct) in session.answer_key().into_iter().enumerate() {
            session.record(position, correct).unwrap();
        }
        let result = svc.submit(&mut session).await.unwrap().expect("graded");

        assert_eq!(result.outcome.report.score(), 10);
        assert_eq!(
            result.best,
            Some(BestScoreUpdate::Improved {
                previous: None,
                current: 100
            })
        );
        assert_eq!(svc.best_score().await.unwrap().unwrap().percent(), 100);
    }

    #[tokio::test]
    async fn second_submit_is_a_no_op() {
        let svc = service(InMemoryRepository::new());
        let mut session = QuizSession::new();
        svc.start(&mut session, &[]);

        assert!(svc.submit(&mut session).await.unwrap().is_some());
        assert!(svc.submit(&mut session).await.unwrap().is_none());
        assert_eq!(session.state(), SessionState::Graded);
    }

    #[tokio::test]
    async fn empty_attempt_skips_best_score() {
        let repo = InMemoryRepository::new();
        let svc = service(repo.clone());
        let mut session = QuizSession::new();
        let unknown = [TagName::new("unknown").unwrap()];
        svc.start(&mut session, &unknown);

        let result = svc.submit(&mut session).await.unwrap().expect("graded");
        assert_eq!(result.outcome.report.total(), 0);
        assert_eq!(result.best, None);
        assert!(result.outcome.topics.is_empty());
        assert_eq!(svc.best_score().await.unwrap(), None);
    }
}
