use std::sync::Arc;

use quiz_core::model::{QuestionBank, QuizSettings};
use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::sessions::QuizLoopService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    quiz_loop: Arc<QuizLoopService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be opened or migrated.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        bank: QuestionBank,
        settings: QuizSettings,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, bank, settings))
    }

    /// Build services that keep the best score in memory only.
    #[must_use]
    pub fn in_memory(clock: Clock, bank: QuestionBank, settings: QuizSettings) -> Self {
        Self::from_storage(&Storage::in_memory(), clock, bank, settings)
    }

    fn from_storage(
        storage: &Storage,
        clock: Clock,
        bank: QuestionBank,
        settings: QuizSettings,
    ) -> Self {
        log::debug!(
            "quiz services ready: {} questions, {}s per attempt",
            bank.len(),
            settings.duration_secs()
        );
        let quiz_loop = Arc::new(QuizLoopService::new(
            clock,
            Arc::new(bank),
            settings,
            Arc::clone(&storage.best_scores),
        ));
        Self { quiz_loop }
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[tokio::test]
    async fn in_memory_services_start_without_a_best_score() {
        let services = AppServices::in_memory(
            Clock::fixed(fixed_now()),
            QuestionBank::builtin(),
            QuizSettings::default(),
        );
        let quiz_loop = services.quiz_loop();
        assert_eq!(quiz_loop.bank().len(), 10);
        assert_eq!(quiz_loop.settings().duration_secs(), 300);
        assert_eq!(quiz_loop.best_score().await.unwrap(), None);
    }
}
