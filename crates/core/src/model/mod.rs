mod answers;
mod bank;
mod best_score;
mod grade;
mod ids;
mod question;
mod settings;
mod tag;
mod topics;
mod working_set;

pub use answers::AnswerSheet;
pub use bank::{BankError, QuestionBank};
pub use best_score::{BestScore, BestScoreError};
pub use grade::{GradeReport, GradeResult, Verdict, rounded_percent};
pub use ids::QuestionId;
pub use question::{MIN_OPTIONS, Question, QuestionDraft, QuestionError};
pub use settings::{DEFAULT_DURATION_SECS, MAX_DURATION_SECS, QuizSettings, SettingsError};
pub use tag::{GENERAL_TAG, TagError, TagName, parse_tag_list};
pub use topics::{TopicBreakdown, TopicStat};
pub use working_set::{WorkingQuestion, WorkingSet};
