use thiserror::Error;

/// Default countdown length for one attempt (five minutes).
pub const DEFAULT_DURATION_SECS: u32 = 5 * 60;

/// Upper bound for a countdown (one day).
pub const MAX_DURATION_SECS: u32 = 86_400;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("quiz duration must be between 1 and 86400 seconds, got {0}")]
    InvalidDuration(u32),
}

/// Tunable parameters of a quiz attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSettings {
    duration_secs: u32,
}

impl QuizSettings {
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidDuration` if the duration is zero or above
    /// `MAX_DURATION_SECS`.
    pub fn new(duration_secs: u32) -> Result<Self, SettingsError> {
        if duration_secs == 0 || duration_secs > MAX_DURATION_SECS {
            return Err(SettingsError::InvalidDuration(duration_secs));
        }
        Ok(Self { duration_secs })
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_five_minutes() {
        assert_eq!(QuizSettings::default().duration_secs(), 300);
    }

    #[test]
    fn zero_and_oversized_durations_are_rejected() {
        assert_eq!(
            QuizSettings::new(0).unwrap_err(),
            SettingsError::InvalidDuration(0)
        );
        assert!(QuizSettings::new(MAX_DURATION_SECS + 1).is_err());
        assert_eq!(QuizSettings::new(90).unwrap().duration_secs(), 90);
    }
}
