//! Plain-text rendering of sessions and results.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use quiz_core::model::{AnswerSheet, BestScore, TagName, TopicBreakdown, WorkingSet};
use quiz_core::time::format_mm_ss;
use services::sessions::SessionProgress;
use services::{BestScoreUpdate, QuizOutcome, SubmitTrigger};

/// `A`, `B`, `C`… for option indices; `?` past `Z`.
#[must_use]
pub fn option_label(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map_or('?', |i| char::from(b'A' + i))
}

/// Inverse of [`option_label`], case-insensitive.
#[must_use]
pub fn option_index(raw: &str) -> Option<usize> {
    let mut chars = raw.chars();
    let c = chars.next()?;
    if chars.next().is_some() || !c.is_ascii_alphabetic() {
        return None;
    }
    Some(usize::from(c.to_ascii_uppercase() as u8 - b'A'))
}

#[must_use]
pub fn working_set(ws: &WorkingSet, answers: &AnswerSheet) -> String {
    if ws.is_empty() {
        return "No questions match the selected topics.\n".to_string();
    }

    let mut out = String::new();
    for (position, question) in ws.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", position + 1, question.text());
        let selected = answers.get(position);
        for (index, option) in question.options().iter().enumerate() {
            let marker = if selected == Some(index) { '>' } else { ' ' };
            let _ = writeln!(out, "  {marker} {}) {option}", option_label(index));
        }
    }
    out
}

#[must_use]
pub fn outcome(outcome: &QuizOutcome, ws: &WorkingSet) -> String {
    let report = &outcome.report;
    let mut out = String::new();
    if outcome.trigger == SubmitTrigger::TimerExpired {
        out.push_str("Time's up!\n");
    }
    let percent = report.percent().unwrap_or(0);
    let _ = writeln!(
        out,
        "Score: {}/{} ({percent}%). {}",
        report.score(),
        report.total(),
        report.verdict().message()
    );

    for result in report.results() {
        let Some(question) = ws.get(result.position) else {
            continue;
        };
        let mark = if result.is_correct { "correct" } else { "wrong" };
        let picked = result
            .selected
            .map_or_else(|| "no answer".to_string(), |i| option_label(i).to_string());
        let _ = writeln!(
            out,
            "{}. {mark} (you: {picked}, answer: {}) {}",
            result.position + 1,
            option_label(result.correct_index),
            question.text()
        );
        if !result.explanation.is_empty() {
            let _ = writeln!(out, "   {}", result.explanation);
        }
    }

    out.push_str(&topics(&outcome.topics));
    out
}

/// Elapsed time between the start of an attempt and its grading.
#[must_use]
pub fn time_taken(started_at: Option<DateTime<Utc>>, graded_at: DateTime<Utc>) -> Option<String> {
    let secs = (graded_at - started_at?).num_seconds();
    let secs = u32::try_from(secs).ok()?;
    Some(format!("Time taken: {}", format_mm_ss(secs)))
}

#[must_use]
pub fn topics(breakdown: &TopicBreakdown) -> String {
    if breakdown.is_empty() {
        return String::new();
    }
    let mut out = String::from("Mistakes by topic:\n");
    for (tag, stat) in breakdown.iter() {
        let _ = writeln!(
            out,
            "  {tag}: {}% wrong ({}/{})",
            stat.wrong_percent(),
            stat.wrong_count,
            stat.total_asked
        );
    }
    out
}

#[must_use]
pub fn answer_key(key: &[usize], ws: &WorkingSet) -> String {
    let mut out = String::from("Answer key:\n");
    for (position, (correct, question)) in key.iter().zip(ws.iter()).enumerate() {
        let _ = writeln!(
            out,
            "  {}. {}) {}",
            position + 1,
            option_label(*correct),
            question.correct_option()
        );
    }
    out
}

#[must_use]
pub fn progress(progress: &SessionProgress, remaining_secs: Option<u32>) -> String {
    let clock = remaining_secs.map_or_else(|| "--:--".to_string(), format_mm_ss);
    format!(
        "Answered {}/{} ({}%), {clock} left",
        progress.answered, progress.total, progress.percent
    )
}

#[must_use]
pub fn best(best: Option<&BestScore>) -> String {
    match best {
        Some(best) => format!(
            "Best score: {}% ({})",
            best.percent(),
            best.achieved_at().format("%Y-%m-%d %H:%M")
        ),
        None => "No best score yet.".to_string(),
    }
}

#[must_use]
pub fn best_update(update: &BestScoreUpdate) -> String {
    match update {
        BestScoreUpdate::Improved { current, .. } => format!("New best score: {current}%!"),
        BestScoreUpdate::Unchanged { best } => format!("Best score: {best}%"),
    }
}

#[must_use]
pub fn tag_list(tags: &[TagName]) -> String {
    if tags.is_empty() {
        return "all".to_string();
    }
    tags.iter()
        .map(TagName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{GradeReport, GradeResult, QuestionBank, QuestionId, WorkingQuestion};
    use quiz_core::time::fixed_now;

    fn unshuffled() -> WorkingSet {
        let bank = QuestionBank::builtin();
        WorkingSet::new(
            bank.questions()
                .iter()
                .take(2)
                .map(WorkingQuestion::from_question)
                .collect(),
        )
    }

    #[test]
    fn labels_round_trip() {
        assert_eq!(option_label(0), 'A');
        assert_eq!(option_label(3), 'D');
        assert_eq!(option_label(26), '?');
        assert_eq!(option_index("c"), Some(2));
        assert_eq!(option_index("C"), Some(2));
        assert_eq!(option_index("cc"), None);
        assert_eq!(option_index("1"), None);
    }

    #[test]
    fn marks_selected_options() {
        let ws = unshuffled();
        let sheet = AnswerSheet::from_selections(vec![Some(1), None]);
        let text = working_set(&ws, &sheet);
        assert!(text.starts_with("1. "));
        assert!(text.contains("  > B) "));
        assert!(!text.contains("  > A) "));
    }

    #[test]
    fn empty_working_set_says_so() {
        let text = working_set(&WorkingSet::default(), &AnswerSheet::unanswered(0));
        assert_eq!(text, "No questions match the selected topics.\n");
    }

    #[test]
    fn outcome_lists_score_verdict_and_topics() {
        let ws = unshuffled();
        let first = ws.get(0).unwrap();
        let results = vec![GradeResult {
            position: 0,
            question_id: QuestionId::new(1),
            is_correct: false,
            selected: None,
            correct_index: first.correct_index(),
            explanation: "Check the sender.".into(),
        }];
        let mut topics = TopicBreakdown::new();
        topics.record(&TagName::new("phishing").unwrap(), false);
        let outcome = QuizOutcome {
            attempt: 1,
            report: GradeReport::new(results),
            topics,
            trigger: SubmitTrigger::TimerExpired,
            graded_at: fixed_now(),
        };

        let text = super::outcome(&outcome, &ws);
        assert!(text.starts_with("Time's up!\nScore: 0/1 (0%). Start with the basics.\n"));
        assert!(text.contains("1. wrong (you: no answer, answer: "));
        assert!(text.contains("   Check the sender.\n"));
        assert!(text.contains("  phishing: 100% wrong (1/1)\n"));
    }

    #[test]
    fn answer_key_uses_letters() {
        let ws = unshuffled();
        let key: Vec<usize> = ws.iter().map(|q| q.correct_index()).collect();
        let text = answer_key(&key, &ws);
        let expected = format!(
            "  1. {}) {}\n",
            option_label(key[0]),
            ws.get(0).unwrap().correct_option()
        );
        assert!(text.contains(&expected));
    }

    #[test]
    fn time_taken_is_rendered_as_minutes_and_seconds() {
        let started = fixed_now();
        let graded = started + chrono::Duration::seconds(95);
        assert_eq!(
            time_taken(Some(started), graded),
            Some("Time taken: 01:35".to_string())
        );
        assert_eq!(time_taken(None, graded), None);
        assert_eq!(time_taken(Some(graded), started), None);
    }

    #[test]
    fn tag_lists_default_to_all() {
        assert_eq!(tag_list(&[]), "all");
        let tags = [TagName::new("malware").unwrap(), TagName::general()];
        assert_eq!(tag_list(&tags), "malware, general");
    }
}
