use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Looks a variant up by its canonical (serialized) name.
fn from_name<T: Copy>(all: &[T], name: fn(&T) -> &'static str, value: &str) -> Option<T> {
    all.iter().copied().find(|variant| name(variant) == value)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Student,
    Professor,
    Admin,
}

impl Role {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Professor => "Professor",
            Self::Admin => "Administrator",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl CourseLevel {
    pub const ALL: [CourseLevel; 4] = [
        Self::Beginner,
        Self::Intermediate,
        Self::Advanced,
        Self::Expert,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Beginner => "BEGINNER",
            Self::Intermediate => "INTERMEDIATE",
            Self::Advanced => "ADVANCED",
            Self::Expert => "EXPERT",
        }
    }

    pub fn difficulty(&self) -> u8 {
        match self {
            Self::Beginner => 1,
            Self::Intermediate => 2,
            Self::Advanced => 3,
            Self::Expert => 4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LessonType {
    Lecture,
    Lab,
    Seminar,
    Workshop,
    Exam,
    Quiz,
    ProjectReview,
}

impl LessonType {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Lecture => "Lecture",
            Self::Lab => "Laboratory",
            Self::Seminar => "Seminar",
            Self::Workshop => "Workshop",
            Self::Exam => "Exam",
            Self::Quiz => "Quiz",
            Self::ProjectReview => "Project Review",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Semester {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
}

impl Semester {
    pub const ALL: [Semester; 6] = [
        Self::First,
        Self::Second,
        Self::Third,
        Self::Fourth,
        Self::Fifth,
        Self::Sixth,
    ];

    pub fn number(&self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
            Self::Fourth => 4,
            Self::Fifth => 5,
            Self::Sixth => 6,
        }
    }

    pub fn from_number(number: u8) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.number() == number)
            .ok_or_else(|| {
                Error::validation("semester", format!("{} is not between 1 and 6", number))
            })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::First => "FIRST",
            Self::Second => "SECOND",
            Self::Third => "THIRD",
            Self::Fourth => "FOURTH",
            Self::Fifth => "FIFTH",
            Self::Sixth => "SIXTH",
        }
    }
}

impl FromStr for Semester {
    type Err = Error;

    /// Accepts either the canonical name (`THIRD`) or the ordinal (`3`).
    fn from_str(s: &str) -> Result<Self> {
        if let Ok(number) = s.parse::<u8>() {
            return Self::from_number(number);
        }

        from_name(&Self::ALL, Self::name, s)
            .ok_or_else(|| Error::validation("semester", format!("unknown semester {:?}", s)))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    Active,
    Completed,
    Dropped,
    Failed,
    Pending,
}

impl EnrollmentStatus {
    pub const ALL: [EnrollmentStatus; 5] = [
        Self::Active,
        Self::Completed,
        Self::Dropped,
        Self::Failed,
        Self::Pending,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Completed => "COMPLETED",
            Self::Dropped => "DROPPED",
            Self::Failed => "FAILED",
            Self::Pending => "PENDING",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active | Self::Pending)
    }

    /// COMPLETED and FAILED end the lifecycle and stamp a completion date.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl FromStr for EnrollmentStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        from_name(&Self::ALL, Self::name, s)
            .ok_or_else(|| Error::validation("status", format!("unknown status {:?}", s)))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GradeType {
    APlus,
    A,
    B,
    C,
    D,
    F,
    Incomplete,
    NotGraded,
}

impl GradeType {
    pub const ALL: [GradeType; 8] = [
        Self::APlus,
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::F,
        Self::Incomplete,
        Self::NotGraded,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::APlus => "A_PLUS",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
            Self::Incomplete => "INCOMPLETE",
            Self::NotGraded => "NOT_GRADED",
        }
    }

    pub fn grade_point(&self) -> f64 {
        match self {
            Self::APlus => 5.0,
            Self::A => 4.5,
            Self::B => 3.5,
            Self::C => 2.5,
            Self::D => 1.5,
            Self::F => 0.0,
            Self::Incomplete | Self::NotGraded => -1.0,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::APlus => "Excellent",
            Self::A => "Very Good",
            Self::B => "Good",
            Self::C => "Satisfactory",
            Self::D => "Sufficient",
            Self::F => "Fail",
            Self::Incomplete => "Incomplete",
            Self::NotGraded => "Not Yet Graded",
        }
    }

    /// Inclusive score band, `None` for the two sentinel grades.
    fn score_range(&self) -> Option<(u32, u32)> {
        match self {
            Self::APlus => Some((90, 100)),
            Self::A => Some((80, 89)),
            Self::B => Some((70, 79)),
            Self::C => Some((60, 69)),
            Self::D => Some((50, 59)),
            Self::F => Some((0, 49)),
            Self::Incomplete | Self::NotGraded => None,
        }
    }

    pub fn is_passing(&self) -> bool {
        let point = self.grade_point();
        (1.5..=5.0).contains(&point)
    }

    /// Sentinels carry no grade point and are left out of averages.
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::Incomplete | Self::NotGraded)
    }

    /// Converts a percentage score (0..=100) to a letter grade.
    pub fn from_score(score: u32) -> Result<Self> {
        if score > 100 {
            return Err(Error::validation(
                "score",
                format!("{} is not between 0 and 100", score),
            ));
        }

        Ok(Self::ALL
            .iter()
            .copied()
            .find(|grade| match grade.score_range() {
                Some((min, max)) => score >= min && score <= max,
                None => false,
            })
            .unwrap_or(Self::NotGraded))
    }
}

impl FromStr for GradeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        from_name(&Self::ALL, Self::name, s)
            .ok_or_else(|| Error::validation("grade", format!("unknown grade {:?}", s)))
    }
}

impl fmt::Display for GradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.description())
    }
}
