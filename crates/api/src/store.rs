//! Storage capabilities needed by the request handlers. [`Database`] provides
//! all of them in production.

#[cfg(test)]
pub mod memory;

use crate::error;
use core::future::Future;
use db::{Database, TryStreamExt};
use model::{Category, GradedQuestion, NewAttempt, PublicQuestion, Quiz, QuizAttempt, QuizId};

/// Read access to the authoritative questions of a quiz.
pub trait QuestionStore {
    /// Questions sorted by order number, answers included. Fails with
    /// [`error::Error::NotFound`] when the quiz itself does not exist.
    fn graded_questions(&self, quiz: QuizId) -> impl Future<Output = error::Result<Vec<GradedQuestion>>> + Send;
}

/// Append-only attempt history.
pub trait AttemptStore {
    /// Returns the stored record, including its assigned ID and timestamp.
    fn insert_attempt(&self, attempt: NewAttempt) -> impl Future<Output = error::Result<QuizAttempt>> + Send;
}

/// Read access to quizzes as shown before submission.
pub trait QuizCatalog {
    fn published_quizzes(&self, category: Option<Category>) -> impl Future<Output = error::Result<Vec<Quiz>>> + Send;
    fn quiz(&self, quiz: QuizId) -> impl Future<Output = error::Result<Quiz>> + Send;
    fn public_questions(&self, quiz: QuizId) -> impl Future<Output = error::Result<Vec<PublicQuestion>>> + Send;
}

impl QuestionStore for Database {
    async fn graded_questions(&self, quiz: QuizId) -> error::Result<Vec<GradedQuestion>> {
        Ok(self.get_questions(quiz).await?)
    }
}

impl AttemptStore for Database {
    async fn insert_attempt(&self, attempt: NewAttempt) -> error::Result<QuizAttempt> {
        Ok(Database::insert_attempt(self, attempt).await?)
    }
}

impl QuizCatalog for Database {
    async fn published_quizzes(&self, category: Option<Category>) -> error::Result<Vec<Quiz>> {
        let quizzes: Vec<_> = self.get_published_quizzes(category).await?.try_collect().await?;
        Ok(quizzes)
    }

    async fn quiz(&self, quiz: QuizId) -> error::Result<Quiz> {
        Ok(self.get_quiz(quiz).await?)
    }

    async fn public_questions(&self, quiz: QuizId) -> error::Result<Vec<PublicQuestion>> {
        Ok(self.get_public_questions(quiz).await?)
    }
}
