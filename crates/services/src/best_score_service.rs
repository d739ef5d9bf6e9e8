use std::sync::Arc;

use quiz_core::model::BestScore;
use storage::repository::BestScoreRepository;

use crate::Clock;
use crate::error::BestScoreServiceError;

/// Result of offering a new percentage to the best-score store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BestScoreUpdate {
    Improved { previous: Option<u32>, current: u32 },
    Unchanged { best: u32 },
}

/// Keeps the persisted best score monotonic.
#[derive(Clone)]
pub struct BestScoreService {
    clock: Clock,
    repo: Arc<dyn BestScoreRepository>,
}

impl BestScoreService {
    #[must_use]
    pub fn new(clock: Clock, repo: Arc<dyn BestScoreRepository>) -> Self {
        Self { clock, repo }
    }

    /// Load the stored best score.
    ///
    /// # Errors
    ///
    /// Returns `BestScoreServiceError::Storage` on storage failures.
    pub async fn current(&self) -> Result<Option<BestScore>, BestScoreServiceError> {
        Ok(self.repo.get_best().await?)
    }

    /// Store `percent` only if it strictly beats the stored best.
    ///
    /// A missing best counts as 0, so a 0% attempt never creates a record.
    ///
    /// # Errors
    ///
    /// Returns `BestScoreServiceError::Score` for percentages above 100 and
    /// `BestScoreServiceError::Storage` on storage failures.
    pub async fn record(&self, percent: u32) -> Result<BestScoreUpdate, BestScoreServiceError> {
        let candidate = BestScore::new(percent, self.clock.now())?;
        let previous = self.repo.get_best().await?.map(|b| b.percent());
        let best = previous.unwrap_or(0);
        if percent <= best {
            return Ok(BestScoreUpdate::Unchanged { best });
        }

        self.repo.save_best(&candidate).await?;
        log::info!("new best score: {percent}% (previous {best}%)");
        Ok(BestScoreUpdate::Improved {
            previous,
            current: percent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::BestScoreError;
    use quiz_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    fn service(repo: InMemoryRepository) -> BestScoreService {
        BestScoreService::new(Clock::fixed(fixed_now()), Arc::new(repo))
    }

    #[tokio::test]
    async fn first_positive_score_is_stored() {
        let repo = InMemoryRepository::new();
        let update = service(repo.clone()).record(60).await.unwrap();
        assert_eq!(
            update,
            BestScoreUpdate::Improved {
                previous: None,
                current: 60
            }
        );
        let stored = repo.get_best().await.unwrap().unwrap();
        assert_eq!(stored.percent(), 60);
        assert_eq!(stored.achieved_at(), fixed_now());
    }

    #[tokio::test]
    async fn zero_percent_never_creates_a_record() {
        let repo = InMemoryRepository::new();
        let update = service(repo.clone()).record(0).await.unwrap();
        assert_eq!(update, BestScoreUpdate::Unchanged { best: 0 });
        assert_eq!(repo.get_best().await.unwrap(), None);
    }

    #[tokio::test]
    async fn equal_or_lower_scores_never_downgrade() {
        let repo = InMemoryRepository::with_best(BestScore::new(80, fixed_now()).unwrap());
        let svc = service(repo.clone());
        assert_eq!(
            svc.record(80).await.unwrap(),
            BestScoreUpdate::Unchanged { best: 80 }
        );
        assert_eq!(
            svc.record(30).await.unwrap(),
            BestScoreUpdate::Unchanged { best: 80 }
        );
        assert_eq!(svc.current().await.unwrap().unwrap().percent(), 80);
    }

    #[tokio::test]
    async fn higher_score_replaces_best() {
        let repo = InMemoryRepository::with_best(BestScore::new(70, fixed_now()).unwrap());
        let update = service(repo).record(90).await.unwrap();
        assert_eq!(
            update,
            BestScoreUpdate::Improved {
                previous: Some(70),
                current: 90
            }
        );
    }

    #[tokio::test]
    async fn out_of_range_percent_is_rejected() {
        let err = service(InMemoryRepository::new())
            .record(120)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BestScoreServiceError::Score(BestScoreError::OutOfRange(120))
        ));
    }
}
