use crate::{
    error,
    store::{AttemptStore, QuestionStore},
};
use chrono::Utc;
use model::{Answers, Grade, GradedResult, NewAttempt, QuizId, Session};

/// Grades a submission against the questions of `quiz` and records exactly one
/// attempt for it. Nothing is recorded when the quiz does not exist, and
/// storage failures are surfaced as-is without retrying.
pub async fn grade_submission<S>(
    store: &S,
    quiz: QuizId,
    answers: &Answers,
    session: Session,
) -> error::Result<GradedResult>
where
    S: QuestionStore + AttemptStore,
{
    let questions = store.graded_questions(quiz).await?;
    let grade = Grade::new(&questions, answers);
    let (score, total, percentage) = (grade.score, grade.total, grade.percentage());

    let attempt = NewAttempt::from_grade(quiz, session, grade, Utc::now());
    let attempt = store.insert_attempt(attempt).await?;
    log::info!("attempt {} on quiz {quiz} scored {score}/{total}", attempt.id);

    Ok(GradedResult { attempt, questions, score, total, percentage })
}
