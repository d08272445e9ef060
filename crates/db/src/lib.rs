#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod error;

use alloc::{string::String, vec::Vec};
use chrono::{DateTime, Utc};
use core::num::NonZeroU16;
use model::{
    Bilingual, Category, Choice, GradedQuestion, NewAttempt, PublicQuestion, Quiz, QuizAttempt, QuizId,
};
use tokio_postgres::{types::Json, Row};

pub use futures_util::{TryStream, TryStreamExt};
pub use tokio_postgres::{tls::NoTls, Client, Config};

macro_rules! quiz_columns {
    () => {
        "id, title_en, title_ar, description_en, description_ar, category, difficulty, time_limit, published, \
         question_count, created_at, updated_at"
    };
}

macro_rules! question_columns {
    () => {
        "id, quiz_id, order_number, question_en, question_ar, options_en, options_ar"
    };
}

pub struct Database(Client);

impl From<Client> for Database {
    fn from(client: Client) -> Self {
        Self(client)
    }
}

fn bilingual_from_row(row: &Row, en: &str, ar: &str) -> error::Result<Bilingual> {
    Ok(Bilingual { en: row.try_get(en)?, ar: row.try_get(ar)? })
}

/// Both halves or neither. A lone translation means the row is corrupt.
fn bilingual_pair(en: Option<String>, ar: Option<String>) -> error::Result<Option<Bilingual>> {
    match (en, ar) {
        (Some(en), Some(ar)) => Ok(Some(Bilingual { en, ar })),
        (None, None) => Ok(None),
        _ => {
            log::error!("bilingual column pair is only half filled");
            Err(error::Error::Fatal)
        }
    }
}

fn optional_bilingual_from_row(row: &Row, en: &str, ar: &str) -> error::Result<Option<Bilingual>> {
    bilingual_pair(row.try_get(en)?, row.try_get(ar)?)
}

fn deserialize_quiz_from_row(row: &Row) -> error::Result<Quiz> {
    let category: &str = row.try_get("category")?;
    let category = category.parse().map_err(|_| error::Error::Fatal)?;
    let difficulty: &str = row.try_get("difficulty")?;
    let difficulty = difficulty.parse().map_err(|_| error::Error::Fatal)?;

    let time_limit: Option<i16> = row.try_get("time_limit")?;
    let time_limit = time_limit
        .map(|minutes| u16::try_from(minutes).ok().and_then(NonZeroU16::new).ok_or(error::Error::Fatal))
        .transpose()?;

    let question_count: i32 = row.try_get("question_count")?;
    let question_count = u32::try_from(question_count).map_err(|_| error::Error::Fatal)?;

    Ok(Quiz {
        id: row.try_get("id")?,
        title: bilingual_from_row(row, "title_en", "title_ar")?,
        description: optional_bilingual_from_row(row, "description_en", "description_ar")?,
        category,
        difficulty,
        time_limit,
        published: row.try_get("published")?,
        question_count,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn deserialize_public_question_from_row(row: &Row) -> error::Result<PublicQuestion> {
    let en: Vec<String> = row.try_get("options_en")?;
    let ar: Vec<String> = row.try_get("options_ar")?;
    let options: Vec<_> = en.into_iter().zip(ar).map(|(en, ar)| Bilingual { en, ar }).collect();
    let options = options.try_into().map_err(|_| error::Error::Fatal)?;
    Ok(PublicQuestion {
        id: row.try_get("id")?,
        quiz_id: row.try_get("quiz_id")?,
        order_number: row.try_get("order_number")?,
        text: bilingual_from_row(row, "question_en", "question_ar")?,
        options,
    })
}

fn deserialize_graded_question_from_row(row: &Row) -> error::Result<GradedQuestion> {
    let answer: i16 = row.try_get("correct_answer")?;
    let correct_answer = u8::try_from(answer).ok().and_then(Choice::new).ok_or(error::Error::Fatal)?;
    Ok(GradedQuestion {
        question: deserialize_public_question_from_row(row)?,
        correct_answer,
        explanation: optional_bilingual_from_row(row, "explanation_en", "explanation_ar")?,
    })
}

impl Database {
    pub async fn quiz_exists(&self, quiz: QuizId) -> error::Result<bool> {
        let row = self.0.query_one("SELECT EXISTS (SELECT 1 FROM quiz WHERE id = $1) AS found", &[&quiz]).await?;
        Ok(row.try_get("found")?)
    }

    pub async fn get_quiz(&self, quiz: QuizId) -> error::Result<Quiz> {
        let row = self
            .0
            .query_opt(concat!("SELECT ", quiz_columns!(), " FROM quiz WHERE id = $1"), &[&quiz])
            .await?
            .ok_or(error::Error::NotFound)?;
        deserialize_quiz_from_row(&row)
    }

    /// Streams published quizzes, newest first.
    pub async fn get_published_quizzes(
        &self,
        category: Option<Category>,
    ) -> error::Result<impl TryStream<Ok = Quiz, Error = error::Error> + '_> {
        let category = category.map(Category::as_str);
        Ok(self
            .0
            .query_raw(
                concat!(
                    "SELECT ",
                    quiz_columns!(),
                    " FROM quiz WHERE published AND ($1::TEXT IS NULL OR category = $1) \
                     ORDER BY created_at DESC, id DESC"
                ),
                &[&category],
            )
            .await?
            .map_err(error::Error::from)
            .and_then(|row| core::future::ready(deserialize_quiz_from_row(&row))))
    }

    /// Questions of a quiz in grading order, answers included. An empty list
    /// is only returned when the quiz itself exists.
    pub async fn get_questions(&self, quiz: QuizId) -> error::Result<Vec<GradedQuestion>> {
        let rows = self
            .0
            .query(
                concat!(
                    "SELECT ",
                    question_columns!(),
                    ", correct_answer, explanation_en, explanation_ar \
                     FROM quiz_question WHERE quiz_id = $1 ORDER BY order_number, id"
                ),
                &[&quiz],
            )
            .await?;
        if rows.is_empty() && !self.quiz_exists(quiz).await? {
            return Err(error::Error::NotFound);
        }
        rows.iter().map(deserialize_graded_question_from_row).collect()
    }

    /// Same as [`Database::get_questions`] but without ever selecting the answer columns.
    pub async fn get_public_questions(&self, quiz: QuizId) -> error::Result<Vec<PublicQuestion>> {
        let rows = self
            .0
            .query(
                concat!(
                    "SELECT ",
                    question_columns!(),
                    " FROM quiz_question WHERE quiz_id = $1 ORDER BY order_number, id"
                ),
                &[&quiz],
            )
            .await?;
        if rows.is_empty() && !self.quiz_exists(quiz).await? {
            return Err(error::Error::NotFound);
        }
        rows.iter().map(deserialize_public_question_from_row).collect()
    }

    pub async fn insert_attempt(&self, attempt: NewAttempt) -> error::Result<QuizAttempt> {
        let score = i32::try_from(attempt.score).map_err(|_| error::Error::BadInput)?;
        let total = i32::try_from(attempt.total_questions).map_err(|_| error::Error::BadInput)?;
        let session = attempt.session.as_id();
        let row = self
            .0
            .query_one(
                "INSERT INTO quiz_attempt (quiz_id, session_id, score, total_questions, answers, completed_at) \
                 VALUES ($1, $2, $3, $4, $5, $6) RETURNING id, completed_at",
                &[&attempt.quiz_id, &session, &score, &total, &Json(&attempt.answers), &attempt.completed_at],
            )
            .await?;
        let id = row.try_get("id")?;
        let completed_at: DateTime<Utc> = row.try_get("completed_at")?;
        Ok(attempt.persisted(id, completed_at))
    }
}
