use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BestScoreError {
    #[error("best score percent must be <= 100, got {0}")]
    OutOfRange(u32),
}

/// Highest percentage reached so far, with the time it was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestScore {
    percent: u32,
    achieved_at: DateTime<Utc>,
}

impl BestScore {
    /// # Errors
    ///
    /// Returns `BestScoreError::OutOfRange` if `percent` exceeds 100.
    pub fn new(percent: u32, achieved_at: DateTime<Utc>) -> Result<Self, BestScoreError> {
        if percent > 100 {
            return Err(BestScoreError::OutOfRange(percent));
        }
        Ok(Self {
            percent,
            achieved_at,
        })
    }

    #[must_use]
    pub fn percent(&self) -> u32 {
        self.percent
    }

    #[must_use]
    pub fn achieved_at(&self) -> DateTime<Utc> {
        self.achieved_at
    }

    /// True when `percent` strictly beats this score.
    #[must_use]
    pub fn is_beaten_by(&self, percent: u32) -> bool {
        percent > self.percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn percent_above_hundred_is_rejected() {
        let err = BestScore::new(101, fixed_now()).unwrap_err();
        assert_eq!(err, BestScoreError::OutOfRange(101));
    }

    #[test]
    fn only_strictly_higher_scores_beat() {
        let best = BestScore::new(80, fixed_now()).unwrap();
        assert!(!best.is_beaten_by(80));
        assert!(!best.is_beaten_by(50));
        assert!(best.is_beaten_by(81));
    }
}
