use super::{AttemptStore, QuestionStore, QuizCatalog};
use crate::error;
use chrono::{DateTime, TimeZone, Utc};
use model::{
    Bilingual, Category, Choice, Difficulty, GradedQuestion, NewAttempt, PublicQuestion, Quiz, QuizAttempt, QuizId,
};
use std::sync::Mutex;

/// In-memory stand-in for the database.
#[derive(Default)]
pub struct MemoryStore {
    pub quizzes: Vec<Quiz>,
    pub questions: Vec<GradedQuestion>,
    pub attempts: Mutex<Vec<QuizAttempt>>,
    /// Makes every insert fail as if the database were unreachable.
    pub failing: bool,
    /// Makes every question load fail the same way.
    pub unreadable: bool,
}

fn timestamp(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
}

pub fn quiz(id: QuizId, category: Category, published: bool, day: u32) -> Quiz {
    Quiz {
        id,
        title: Bilingual::new(format!("Quiz {id}"), format!("اختبار {id}")),
        description: None,
        category,
        difficulty: Difficulty::Beginner,
        time_limit: None,
        published,
        question_count: 0,
        created_at: timestamp(day),
        updated_at: timestamp(day),
    }
}

pub fn question(id: i32, quiz_id: QuizId, order_number: i32, correct: u8) -> GradedQuestion {
    let option = |n: u8| Bilingual::new(format!("Option {n}"), format!("الخيار {n}"));
    GradedQuestion {
        question: PublicQuestion {
            id,
            quiz_id,
            order_number,
            text: Bilingual::new(format!("Question {id}"), format!("السؤال {id}")),
            options: [option(1), option(2), option(3), option(4)],
        },
        correct_answer: Choice::new(correct).unwrap(),
        explanation: Some(Bilingual::new("Because.", "لأن.")),
    }
}

impl MemoryStore {
    /// Quiz 1 (salah, published) has questions 11, 12 and 13 whose answers are
    /// `2`, `4` and `1`. Quiz 2 (zakat) is unpublished and empty. Quiz 3 (hajj,
    /// published) owns question 31.
    pub fn sample() -> Self {
        Self {
            quizzes: vec![
                quiz(1, Category::Salah, true, 1),
                quiz(2, Category::Zakat, false, 2),
                quiz(3, Category::Hajj, true, 3),
            ],
            // Deliberately shuffled so that ordering is exercised.
            questions: vec![question(13, 1, 3, 1), question(31, 3, 1, 3), question(11, 1, 1, 2), question(12, 1, 2, 4)],
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self { failing: true, ..Self::sample() }
    }

    pub fn unreadable() -> Self {
        Self { unreadable: true, ..Self::sample() }
    }

    pub fn attempts(&self) -> Vec<QuizAttempt> {
        self.attempts.lock().unwrap().clone()
    }
}

impl QuestionStore for MemoryStore {
    async fn graded_questions(&self, quiz: QuizId) -> error::Result<Vec<GradedQuestion>> {
        if self.unreadable {
            return Err(error::Error::Fatal);
        }
        if !self.quizzes.iter().any(|q| q.id == quiz) {
            return Err(error::Error::NotFound);
        }
        let mut questions: Vec<_> = self.questions.iter().filter(|q| q.question.quiz_id == quiz).cloned().collect();
        questions.sort_by_key(|q| (q.question.order_number, q.id()));
        Ok(questions)
    }
}

impl AttemptStore for MemoryStore {
    async fn insert_attempt(&self, attempt: NewAttempt) -> error::Result<QuizAttempt> {
        if self.failing {
            return Err(error::Error::Fatal);
        }
        let mut attempts = self.attempts.lock().unwrap();
        let id = attempts.len() as i64 + 1;
        let completed_at = attempt.completed_at;
        let stored = attempt.persisted(id, completed_at);
        attempts.push(stored.clone());
        Ok(stored)
    }
}

impl QuizCatalog for MemoryStore {
    async fn published_quizzes(&self, category: Option<Category>) -> error::Result<Vec<Quiz>> {
        let mut quizzes: Vec<_> = self
            .quizzes
            .iter()
            .filter(|q| q.published && category.map_or(true, |c| q.category == c))
            .cloned()
            .collect();
        quizzes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(quizzes)
    }

    async fn quiz(&self, quiz: QuizId) -> error::Result<Quiz> {
        self.quizzes.iter().find(|q| q.id == quiz).cloned().ok_or(error::Error::NotFound)
    }

    async fn public_questions(&self, quiz: QuizId) -> error::Result<Vec<PublicQuestion>> {
        let questions = self.graded_questions(quiz).await?;
        Ok(questions.into_iter().map(GradedQuestion::into_public).collect())
    }
}
