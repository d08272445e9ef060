use crate::{
    answers::Answers,
    question::{Choice, GradedQuestion},
    AttemptId, QuestionId, QuizId,
};
use alloc::{boxed::Box, string::String, vec::Vec};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Originator of a submission.
///
/// Anonymous submissions are kept distinct from each other instead of being
/// lumped under a shared placeholder ID. Serialized as the session ID string,
/// or `null` when anonymous.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Session {
    Identified(Box<str>),
    #[default]
    Anonymous,
}

impl Session {
    pub fn as_id(&self) -> Option<&str> {
        match self {
            Self::Identified(id) => Some(id),
            Self::Anonymous => None,
        }
    }
}

impl From<Option<String>> for Session {
    /// Empty and whitespace-only session IDs count as no session ID at all.
    fn from(id: Option<String>) -> Self {
        match id {
            Some(id) if !id.trim().is_empty() => Self::Identified(id.into_boxed_str()),
            _ => Self::Anonymous,
        }
    }
}

impl From<Session> for Option<String> {
    fn from(session: Session) -> Self {
        match session {
            Session::Identified(id) => Some(id.into_string()),
            Session::Anonymous => None,
        }
    }
}

/// Outcome of a single question within an attempt.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    /// `None` when the question was left unanswered.
    pub selected_answer: Option<Choice>,
    pub is_correct: bool,
}

/// Result of scoring a set of answers against the questions of a quiz.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grade {
    pub score: u32,
    pub total: u32,
    /// One record per question, in question order.
    pub records: Vec<AnswerRecord>,
}

impl Grade {
    /// Only the given questions are visited, so answers to questions from
    /// other quizzes never count.
    pub fn new(questions: &[GradedQuestion], answers: &Answers) -> Self {
        let mut score = 0;
        let mut total = 0;
        let mut records = Vec::with_capacity(questions.len());
        for question in questions {
            let question_id = question.id();
            let selected_answer = answers.get(question_id);
            let is_correct = question.is_correct(selected_answer);
            total += 1;
            if is_correct {
                score += 1;
            }
            records.push(AnswerRecord { question_id, selected_answer, is_correct });
        }
        Self { score, total, records }
    }

    pub const fn percentage(&self) -> u8 {
        percentage(self.score, self.total)
    }
}

/// Rounds `100 * score / total` half away from zero. An empty quiz scores zero.
pub const fn percentage(score: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }

    let score = score as u64;
    let total = total as u64;
    let rounded = (200 * score + total) / (2 * total);
    if rounded > 100 {
        100
    } else {
        rounded as u8
    }
}

/// Attempt ready to be persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewAttempt {
    pub quiz_id: QuizId,
    pub session: Session,
    pub score: u32,
    pub total_questions: u32,
    pub answers: Vec<AnswerRecord>,
    pub completed_at: DateTime<Utc>,
}

impl NewAttempt {
    pub fn from_grade(quiz_id: QuizId, session: Session, grade: Grade, completed_at: DateTime<Utc>) -> Self {
        let Grade { score, total, records } = grade;
        Self { quiz_id, session, score, total_questions: total, answers: records, completed_at }
    }

    /// Attaches the identity and timestamp assigned by the store.
    pub fn persisted(self, id: AttemptId, completed_at: DateTime<Utc>) -> QuizAttempt {
        let Self { quiz_id, session, score, total_questions, answers, .. } = self;
        QuizAttempt { id, quiz_id, session, score, total_questions, answers, completed_at }
    }
}

/// A stored attempt. Never modified after insertion.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    pub id: AttemptId,
    pub quiz_id: QuizId,
    #[serde(rename = "sessionId")]
    pub session: Session,
    pub score: u32,
    pub total_questions: u32,
    pub answers: Vec<AnswerRecord>,
    pub completed_at: DateTime<Utc>,
}

/// Request body of a quiz submission.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub quiz_id: QuizId,
    #[serde(default)]
    pub answers: Answers,
    #[serde(default, rename = "sessionId")]
    pub session: Session,
}

/// Everything a learner sees after submitting, answers included.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct GradedResult {
    pub attempt: QuizAttempt,
    pub questions: Vec<GradedQuestion>,
    pub score: u32,
    pub total: u32,
    pub percentage: u8,
}
