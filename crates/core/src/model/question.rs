use serde::Deserialize;
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::tag::{TagError, TagName};

/// Minimum number of options a multiple-choice question must offer.
pub const MIN_OPTIONS: usize = 2;

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

/// Unvalidated question as authored (in code or in a JSON bank file).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuestionDraft {
    #[serde(default)]
    pub id: Option<QuestionId>,
    #[serde(alias = "q")]
    pub text: String,
    pub options: Vec<String>,
    #[serde(alias = "answer")]
    pub correct_index: usize,
    #[serde(default, alias = "explain")]
    pub explanation: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl QuestionDraft {
    pub fn new(
        text: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
        correct_index: usize,
    ) -> Self {
        Self {
            id: None,
            text: text.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct_index,
            explanation: String::new(),
            tags: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: QuestionId) -> Self {
        self.id = Some(id);
        self
    }

    /// Validate the draft, using `fallback_id` when the draft carries none.
    ///
    /// Untagged drafts receive the `general` tag; duplicate tags collapse.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` for blank text or options, fewer than two options,
    /// an out-of-range correct index, or an invalid tag.
    pub fn validate(self, fallback_id: QuestionId) -> Result<Question, QuestionError> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }

        if self.options.len() < MIN_OPTIONS {
            return Err(QuestionError::TooFewOptions {
                len: self.options.len(),
            });
        }
        if let Some(position) = self.options.iter().position(|o| o.trim().is_empty()) {
            return Err(QuestionError::EmptyOption { position });
        }
        if self.correct_index >= self.options.len() {
            return Err(QuestionError::CorrectIndexOutOfRange {
                index: self.correct_index,
                len: self.options.len(),
            });
        }

        let mut tags: Vec<TagName> = Vec::with_capacity(self.tags.len().max(1));
        for raw in self.tags {
            let tag = TagName::new(raw)?;
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        if tags.is_empty() {
            tags.push(TagName::general());
        }

        Ok(Question {
            id: self.id.unwrap_or(fallback_id),
            text: text.to_string(),
            options: self.options,
            correct_index: self.correct_index,
            explanation: self.explanation.trim().to_string(),
            tags,
        })
    }
}

/// A validated, immutable bank question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<String>,
    correct_index: usize,
    explanation: String,
    tags: Vec<TagName>,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    /// Text of the correct option.
    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Topic tags in authoring order; never empty.
    #[must_use]
    pub fn tags(&self) -> &[TagName] {
        &self.tags
    }

    /// Returns true if any of this question's tags is in `selected`.
    #[must_use]
    pub fn has_any_tag(&self, selected: &[TagName]) -> bool {
        self.tags.iter().any(|t| selected.contains(t))
    }
}

//
// ─── QUESTION VALIDATION ERRORS ────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question needs at least 2 options, found {len}")]
    TooFewOptions { len: usize },

    #[error("option {position} is empty")]
    EmptyOption { position: usize },

    #[error("correct index {index} is out of range for {len} options")]
    CorrectIndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Tag(#[from] TagError),
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
