#![forbid(unsafe_code)]

pub mod app_services;
pub mod best_score_service;
pub mod error;
pub mod sessions;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use best_score_service::{BestScoreService, BestScoreUpdate};
pub use error::{AppServicesError, BestScoreServiceError, SessionError, TrackerError};

pub use sessions::{
    AnswerTracker, QuizLoopService, QuizOutcome, QuizSession, SessionBuilder, SessionState,
    SubmitResult, SubmitTrigger, TimedQuiz, TimerEvent,
};
