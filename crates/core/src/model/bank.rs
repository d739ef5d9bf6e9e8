use std::collections::HashSet;

use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::{Question, QuestionDraft, QuestionError};
use crate::model::tag::TagName;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankError {
    #[error("question {position} is invalid: {source}")]
    Question {
        position: usize,
        #[source]
        source: QuestionError,
    },

    #[error("duplicate question id {0}")]
    DuplicateId(QuestionId),

    #[error("failed to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),
}

//
// ─── BANK ──────────────────────────────────────────────────────────────────────
//

/// Immutable catalog of validated questions.
///
/// Construction validates every record up front; a bank that exists is well formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
    tags: Vec<TagName>,
}

impl QuestionBank {
    /// Validate drafts into a bank. Drafts without an id get their 1-based position.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Question` for the first malformed draft (0-based position)
    /// and `BankError::DuplicateId` when two questions share an id.
    pub fn from_drafts(drafts: impl IntoIterator<Item = QuestionDraft>) -> Result<Self, BankError> {
        let mut questions = Vec::new();
        let mut seen = HashSet::new();
        for (position, draft) in drafts.into_iter().enumerate() {
            let fallback = QuestionId::new(position as u64 + 1);
            let question = draft
                .validate(fallback)
                .map_err(|source| BankError::Question { position, source })?;
            if !seen.insert(question.id()) {
                return Err(BankError::DuplicateId(question.id()));
            }
            questions.push(question);
        }

        let mut tags: Vec<TagName> = Vec::new();
        for tag in questions.iter().flat_map(Question::tags) {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }

        Ok(Self { questions, tags })
    }

    /// Parse a JSON array of question drafts.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Parse` for malformed JSON, otherwise the same errors as
    /// [`QuestionBank::from_drafts`].
    pub fn from_json(json: &str) -> Result<Self, BankError> {
        let drafts: Vec<QuestionDraft> = serde_json::from_str(json)?;
        Self::from_drafts(drafts)
    }

    /// The built-in cyber-awareness question set.
    ///
    /// # Panics
    ///
    /// Panics if the built-in drafts fail validation.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_drafts(builtin_drafts()).expect("built-in question bank should be valid")
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    /// All distinct tags in first-occurrence order.
    #[must_use]
    pub fn tags(&self) -> &[TagName] {
        &self.tags
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

fn builtin_drafts() -> Vec<QuestionDraft> {
    vec![
        QuestionDraft::new(
            "Which is a common sign of a phishing email?",
            [
                "From your saved contacts only",
                "Urgent request to click a link and verify your account",
                "Perfect grammar always",
                "No links inside",
            ],
            1,
        )
        .with_explanation("Phishing often uses urgency and links to fake sites.")
        .with_tags(["phishing"]),
        QuestionDraft::new(
            "Which password is strongest?",
            ["password123", "Ru@2024", "L0ng-phrase_with-Symb0ls!", "123456"],
            2,
        )
        .with_explanation("Use long passphrases with a mix of cases, numbers, and symbols.")
        .with_tags(["passwords"]),
        QuestionDraft::new(
            "What is MFA/2FA?",
            [
                "Two firewalls",
                "Extra verification like code/app/biometrics",
                "Two antivirus tools",
                "Security question only",
            ],
            1,
        )
        .with_explanation("MFA adds a second factor beyond your password.")
        .with_tags(["passwords"]),
        QuestionDraft::new(
            "Public Wi-Fi best practice:",
            [
                "Log in to bank sites freely",
                "Use a VPN for sensitive actions",
                "Turn off HTTPS",
                "Share hotspot with strangers",
            ],
            1,
        )
        .with_explanation("Use a VPN or avoid sensitive logins on public Wi-Fi.")
        .with_tags(["phishing", "passwords"]),
        QuestionDraft::new(
            "A malicious program that demands payment to unlock files is:",
            ["Adware", "Ransomware", "Worm", "Keylogger"],
            1,
        )
        .with_explanation("Ransomware encrypts files and asks for payment.")
        .with_tags(["malware"]),
        QuestionDraft::new(
            "Best way to check a suspicious link:",
            [
                "Link text only matters",
                "Hover to preview the real URL",
                "Click first, check later",
                "Shortened links are always safe",
            ],
            1,
        )
        .with_explanation("Always hover to see the real destination before clicking.")
        .with_tags(["phishing"]),
        QuestionDraft::new(
            "Which is a social engineering tactic?",
            ["SQL injection", "Brute force", "Pretexting", "ARP spoofing"],
            2,
        )
        .with_explanation("Pretexting manipulates people using a made-up scenario.")
        .with_tags(["phishing"]),
        QuestionDraft::new(
            "Best practice for software updates:",
            [
                "Delay updates for months",
                "Install updates promptly",
                "Disable automatic updates forever",
                "Only update UI themes",
            ],
            1,
        )
        .with_explanation("Updates fix security vulnerabilities.")
        .with_tags(["malware"]),
        QuestionDraft::new(
            "Which email attachment is riskier?",
            ["invoice.pdf.exe", "meeting-notes.pdf", "photo.jpg", "readme.txt"],
            0,
        )
        .with_explanation("Double extensions can hide executables.")
        .with_tags(["malware", "phishing"]),
        QuestionDraft::new(
            "HTTPS means:",
            [
                "The site is always safe and honest",
                "Traffic is encrypted in transit",
                "The site is government-approved",
                "No certificate is needed",
            ],
            1,
        )
        .with_explanation("HTTPS encrypts data between your browser and the site.")
        .with_tags(["phishing"]),
    ]
}
