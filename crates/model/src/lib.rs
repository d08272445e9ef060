#![cfg_attr(not(test), no_std)]
extern crate alloc;

pub mod answers;
pub mod attempt;
pub mod question;
pub mod quiz;

pub use answers::Answers;
pub use attempt::{AnswerRecord, Grade, GradedResult, NewAttempt, QuizAttempt, Session, Submission};
pub use question::{Choice, GradedQuestion, PublicQuestion};
pub use quiz::{Bilingual, Category, Difficulty, Quiz, QuizDetail};

pub type QuizId = i32;
pub type QuestionId = i32;
pub type AttemptId = i64;
