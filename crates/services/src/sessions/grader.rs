use quiz_core::model::{AnswerSheet, GradeReport, GradeResult, WorkingSet};

/// Grade `answers` against the working set's correct indices.
///
/// Pure: identical inputs always produce identical reports. Unanswered questions,
/// including positions missing from a short answer sheet, are incorrect.
#[must_use]
pub fn grade(working_set: &WorkingSet, answers: &AnswerSheet) -> GradeReport {
    let results = working_set
        .iter()
        .enumerate()
        .map(|(position, question)| {
            let selected = answers.get(position);
            GradeResult {
                position,
                question_id: question.source_id(),
                is_correct: selected == Some(question.correct_index()),
                selected,
                correct_index: question.correct_index(),
                explanation: question.explanation().to_string(),
            }
        })
        .collect();
    GradeReport::new(results)
}
