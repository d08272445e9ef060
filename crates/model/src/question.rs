use crate::{quiz::Bilingual, QuestionId, QuizId};
use core::fmt::{self, Display};
use serde::{Deserialize, Serialize};

/// One of the four answer options of a question, numbered from `1` to `4`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Choice {
    First = 1,
    Second = 2,
    Third = 3,
    Fourth = 4,
}

impl Choice {
    pub const fn new(marker: u8) -> Option<Self> {
        Some(match marker {
            1 => Self::First,
            2 => Self::Second,
            3 => Self::Third,
            4 => Self::Fourth,
            _ => return None,
        })
    }

    pub const fn get(self) -> u8 {
        self as u8
    }

    /// Zero-based position of this choice within [`PublicQuestion::options`].
    pub const fn index(self) -> usize {
        self as usize - 1
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct InvalidChoice(pub u8);

impl Display for InvalidChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "choice must be between 1 and 4, got {}", self.0)
    }
}

impl TryFrom<u8> for Choice {
    type Error = InvalidChoice;

    fn try_from(marker: u8) -> Result<Self, Self::Error> {
        Self::new(marker).ok_or(InvalidChoice(marker))
    }
}

impl From<Choice> for u8 {
    fn from(choice: Choice) -> Self {
        choice.get()
    }
}

/// Question as shown before submission. It deliberately carries neither the
/// correct answer nor the explanation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
    pub id: QuestionId,
    pub quiz_id: QuizId,
    /// Display and grading position within the quiz (ascending).
    pub order_number: i32,
    pub text: Bilingual,
    pub options: [Bilingual; 4],
}

/// Question with its answer revealed. Only ever sent back as part of a graded
/// submission.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedQuestion {
    #[serde(flatten)]
    pub question: PublicQuestion,
    pub correct_answer: Choice,
    pub explanation: Option<Bilingual>,
}

impl GradedQuestion {
    pub const fn id(&self) -> QuestionId {
        self.question.id
    }

    /// An absent selection is never correct.
    pub fn is_correct(&self, selected: Option<Choice>) -> bool {
        selected == Some(self.correct_answer)
    }

    pub fn into_public(self) -> PublicQuestion {
        self.question
    }
}
