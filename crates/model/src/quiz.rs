use crate::{question::PublicQuestion, QuizId};
use alloc::{string::String, vec::Vec};
use chrono::{DateTime, Utc};
use core::{
    fmt::{self, Display},
    num::NonZeroU16,
    str::FromStr,
};
use serde::{Deserialize, Serialize};

/// Text presented to learners in both English and Arabic.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Bilingual {
    pub en: String,
    pub ar: String,
}

impl Bilingual {
    pub fn new(en: impl Into<String>, ar: impl Into<String>) -> Self {
        Self { en: en.into(), ar: ar.into() }
    }
}

/// Ritual topic that a quiz covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Ritual purification (wudu, ghusl, tayammum).
    Taharah,
    Salah,
    Sawm,
    Zakat,
    Hajj,
    /// Funeral rites.
    Janazah,
}

impl Category {
    pub const ALL: [Self; 6] = [Self::Taharah, Self::Salah, Self::Sawm, Self::Zakat, Self::Hajj, Self::Janazah];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Taharah => "taharah",
            Self::Salah => "salah",
            Self::Sawm => "sawm",
            Self::Zakat => "zakat",
            Self::Hajj => "hajj",
            Self::Janazah => "janazah",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownVariant;

impl Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown variant")
    }
}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|category| category.as_str() == text).ok_or(UnknownVariant)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl FromStr for Difficulty {
    type Err = UnknownVariant;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Ok(match text {
            "beginner" => Self::Beginner,
            "intermediate" => Self::Intermediate,
            "advanced" => Self::Advanced,
            _ => return Err(UnknownVariant),
        })
    }
}

/// Quiz metadata. Questions are stored separately and loaded on demand.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: QuizId,
    pub title: Bilingual,
    pub description: Option<Bilingual>,
    pub category: Category,
    pub difficulty: Difficulty,
    /// Minutes allotted to finish the quiz, if limited at all.
    pub time_limit: Option<NonZeroU16>,
    /// Only published quizzes appear in the public listing.
    pub published: bool,
    /// Denormalized count maintained alongside the question rows.
    pub question_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A quiz as shown to a learner before submission.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizDetail {
    pub quiz: Quiz,
    pub questions: Vec<PublicQuestion>,
}
