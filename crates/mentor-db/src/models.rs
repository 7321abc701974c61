use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Difficulty of a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        };
        f.write_str(s)
    }
}

impl FromStr for Difficulty {
    type Err = DifficultyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(DifficultyParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Difficulty`] string.
#[derive(Debug, Clone)]
pub struct DifficultyParseError(pub String);

impl fmt::Display for DifficultyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid difficulty: {:?}", self.0)
    }
}

impl std::error::Error for DifficultyParseError {}

// ---------------------------------------------------------------------------

/// Completion status of a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TopicStatus {
    Pending,
    Done,
}

impl fmt::Display for TopicStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Done => "done",
        };
        f.write_str(s)
    }
}

impl FromStr for TopicStatus {
    type Err = TopicStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "done" => Ok(Self::Done),
            other => Err(TopicStatusParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`TopicStatus`] string.
#[derive(Debug, Clone)]
pub struct TopicStatusParseError(pub String);

impl fmt::Display for TopicStatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid topic status: {:?}", self.0)
    }
}

impl std::error::Error for TopicStatusParseError {}

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// The learner's profile. A single row exists once onboarding has run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub exam_date: NaiveDate,
    /// Daily hour ceiling; always positive.
    pub daily_available_hours: f64,
    pub preferred_study_time: String,
    pub onboarding_completed: bool,
}

/// A subject in the syllabus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Subject {
    pub id: String,
    pub name: String,
}

/// Highest confidence a topic can reach.
pub const MAX_CONFIDENCE: i32 = 100;

/// A topic in the syllabus, owned by a [`Subject`].
///
/// Deserialization goes through [`TopicRecord`] so that records written
/// before `confidence_score` existed are normalized on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TopicRecord")]
pub struct Topic {
    pub id: String,
    pub subject_id: String,
    pub name: String,
    pub difficulty: Difficulty,
    pub estimated_hours: f64,
    pub status: TopicStatus,
    /// User override, independent of `difficulty`.
    pub is_hard_marked: bool,
    pub exposure_count: i32,
    /// Mastery estimate in `0..=100`.
    pub confidence_score: i32,
}

impl Topic {
    pub fn is_done(&self) -> bool {
        self.status == TopicStatus::Done
    }

    pub fn is_hard(&self) -> bool {
        self.difficulty == Difficulty::Hard
    }
}

/// A topic as stored, with `confidence_score` possibly absent.
#[derive(Debug, Clone, Deserialize, FromRow)]
pub struct TopicRecord {
    pub id: String,
    pub subject_id: String,
    pub name: String,
    pub difficulty: Difficulty,
    pub estimated_hours: f64,
    pub status: TopicStatus,
    #[serde(default)]
    pub is_hard_marked: bool,
    #[serde(default)]
    pub exposure_count: i32,
    #[serde(default)]
    pub confidence_score: Option<i32>,
}

impl From<TopicRecord> for Topic {
    fn from(r: TopicRecord) -> Self {
        // Legacy records lack a confidence score: done means mastered.
        let confidence_score = r.confidence_score.unwrap_or(match r.status {
            TopicStatus::Done => MAX_CONFIDENCE,
            TopicStatus::Pending => 0,
        });
        Self {
            id: r.id,
            subject_id: r.subject_id,
            name: r.name,
            difficulty: r.difficulty,
            estimated_hours: r.estimated_hours,
            status: r.status,
            is_hard_marked: r.is_hard_marked,
            exposure_count: r.exposure_count,
            confidence_score,
        }
    }
}

/// One validated entry of a [`DailyPlan`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanItem {
    pub subject_id: String,
    /// Always references an existing [`Topic`].
    pub topic_id: String,
    /// Hours, strictly positive.
    pub allocated_time: f64,
    pub reason: String,
}

/// The study plan for one calendar day. `date` is unique within history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DailyPlan {
    pub date: NaiveDate,
    pub mentor_message: String,
    pub reasoning: String,
    #[sqlx(json)]
    pub items: Vec<PlanItem>,
    pub completed: bool,
    /// True when the plan was generated for a day other than today.
    #[serde(default)]
    pub preview_flag: bool,
}

impl DailyPlan {
    /// Sum of allocated hours across all items.
    pub fn total_hours(&self) -> f64 {
        self.items.iter().map(|i| i.allocated_time).sum()
    }
}

/// A topic proposed by the generative service, not yet part of the syllabus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSuggestion {
    pub name: String,
    pub difficulty: Difficulty,
    pub estimated_hours: f64,
    pub subject_id: String,
    pub suggested: bool,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
