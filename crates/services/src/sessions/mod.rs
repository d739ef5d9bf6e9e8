mod analytics;
mod builder;
mod grader;
mod progress;
mod session;
mod timed;
mod timer;
mod tracker;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::{SessionError, TrackerError};
pub use analytics::aggregate;
pub use builder::{SessionBuilder, filter_is_active};
pub use grader::grade;
pub use progress::SessionProgress;
pub use session::{QuizOutcome, QuizSession, SessionState, SubmitTrigger};
pub use timed::{TimedQuiz, TimerEvent};
pub use timer::{Countdown, SessionTimer};
pub use tracker::AnswerTracker;
pub use workflow::{QuizLoopService, SubmitResult};
