use quiz_core::model::TagName;
use rand::Rng;
use tokio::sync::mpsc::UnboundedSender;

use super::session::QuizSession;
use super::timer::SessionTimer;
use super::workflow::{QuizLoopService, SubmitResult};
use crate::error::SessionError;

/// Countdown notifications, tagged with the attempt they belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Tick { attempt: u64, remaining: u32 },
    Expired { attempt: u64 },
}

/// A quiz session paired with its countdown.
///
/// Timer callbacks only send `TimerEvent`s; the owner feeds them back through
/// [`TimedQuiz::handle`] so every session mutation happens on one task.
#[derive(Debug)]
pub struct TimedQuiz {
    session: QuizSession,
    timer: SessionTimer,
    events: UnboundedSender<TimerEvent>,
    remaining: Option<u32>,
}

impl TimedQuiz {
    #[must_use]
    pub fn new(events: UnboundedSender<TimerEvent>) -> Self {
        Self {
            session: QuizSession::new(),
            timer: SessionTimer::new(),
            events,
            remaining: None,
        }
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// Seconds left in the running attempt, if a countdown is active.
    #[must_use]
    pub fn remaining_secs(&self) -> Option<u32> {
        self.remaining
    }

    /// Start a new attempt and (re)start its countdown.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start(&mut self, service: &QuizLoopService, tags: &[TagName]) -> u64 {
        self.start_with_rng(service, tags, &mut rand::rng())
    }

    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start_with_rng<R: Rng + ?Sized>(
        &mut self,
        service: &QuizLoopService,
        tags: &[TagName],
        rng: &mut R,
    ) -> u64 {
        let attempt = service.start_with_rng(&mut self.session, tags, rng);
        let duration = service.settings().duration_secs();
        self.remaining = Some(duration);

        let tick_events = self.events.clone();
        let expire_events = self.events.clone();
        self.timer.start(
            duration,
            move |remaining| {
                let _ = tick_events.send(TimerEvent::Tick { attempt, remaining });
            },
            move || {
                let _ = expire_events.send(TimerEvent::Expired { attempt });
            },
        );
        attempt
    }

    /// Record an answer for the running attempt.
    ///
    /// # Errors
    ///
    /// See [`QuizSession::record`].
    pub fn record(&mut self, position: usize, option: usize) -> Result<Option<usize>, SessionError> {
        self.session.record(position, option)
    }

    /// # Errors
    ///
    /// See [`QuizSession::clear_answer`].
    pub fn clear_answer(&mut self, position: usize) -> Result<Option<usize>, SessionError> {
        self.session.clear_answer(position)
    }

    /// Cancel the countdown, then grade.
    ///
    /// # Errors
    ///
    /// See [`QuizLoopService::submit`].
    pub async fn submit(
        &mut self,
        service: &QuizLoopService,
    ) -> Result<Option<SubmitResult>, SessionError> {
        self.stop_countdown();
        service.submit(&mut self.session).await
    }

    /// Apply a timer event. Returns the grading result when an expiry graded the
    /// running attempt.
    ///
    /// # Errors
    ///
    /// See [`QuizLoopService::expire`].
    pub async fn handle(
        &mut self,
        service: &QuizLoopService,
        event: TimerEvent,
    ) -> Result<Option<SubmitResult>, SessionError> {
        match event {
            TimerEvent::Tick { attempt, remaining } => {
                if attempt == self.session.attempt() && self.remaining.is_some() {
                    self.remaining = Some(remaining);
                }
                Ok(None)
            }
            TimerEvent::Expired { attempt } => {
                if attempt == self.session.attempt() {
                    self.stop_countdown();
                }
                service.expire(&mut self.session, attempt).await
            }
        }
    }

    /// Cancel the countdown and return the session to `Idle`.
    pub fn reset(&mut self) {
        self.stop_countdown();
        self.session.reset();
    }

    fn stop_countdown(&mut self) {
        self.timer.cancel();
        self.remaining = None;
    }
}
