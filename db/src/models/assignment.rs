use chrono::{Local, NaiveDateTime};

use super::{enums::GradeType, Course, Person, Student};
use crate::error::{require_name, require_positive, Error, Result};
use crate::NewAssignment;

/// Graded work set for one course. Assignments live in memory only.
#[derive(Clone, Debug)]
pub struct Assignment {
    title: String,
    description: String,
    course_name: String,
    max_points: u32,
    due_date: NaiveDateTime,
    created_date: NaiveDateTime,
}

impl Assignment {
    pub fn new(assignment: NewAssignment, course: &Course) -> Result<Self> {
        require_name("assignment title", &assignment.title)?;
        let max_points = require_positive("max points", assignment.max_points)?;

        Ok(Self {
            title: assignment.title,
            description: assignment.description,
            course_name: course.name().to_string(),
            max_points,
            due_date: assignment.due_date,
            created_date: Local::now().naive_local(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn course_name(&self) -> &str {
        &self.course_name
    }

    pub fn max_points(&self) -> u32 {
        self.max_points
    }

    pub fn due_date(&self) -> NaiveDateTime {
        self.due_date
    }

    pub fn created_date(&self) -> NaiveDateTime {
        self.created_date
    }

    pub fn is_overdue(&self) -> bool {
        Local::now().naive_local() > self.due_date
    }
}

/// Assignments are identified by title within a course.
impl PartialEq for Assignment {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title && self.course_name == other.course_name
    }
}

#[derive(Clone, Debug)]
pub struct Submission {
    student_id: u32,
    assignment: Assignment,
    content: String,
    submitted_date: NaiveDateTime,
    score: Option<u32>,
    feedback: String,
}

impl Submission {
    pub fn new(student: &Student, assignment: &Assignment, content: impl Into<String>) -> Self {
        Self::submitted_at(student, assignment, content, Local::now().naive_local())
    }

    pub fn submitted_at(
        student: &Student,
        assignment: &Assignment,
        content: impl Into<String>,
        submitted_date: NaiveDateTime,
    ) -> Self {
        Self {
            student_id: student.id(),
            assignment: assignment.clone(),
            content: content.into(),
            submitted_date,
            score: None,
            feedback: String::new(),
        }
    }

    /// Scores the submission; the score must lie within `0..=max_points`.
    pub fn grade(&mut self, score: i64, feedback: Option<&str>) -> Result<()> {
        let max = i64::from(self.assignment.max_points);

        if score < 0 || score > max {
            return Err(Error::validation(
                "score",
                format!("{} is not between 0 and {}", score, max),
            ));
        }

        self.score = Some(score as u32);
        self.feedback = feedback.unwrap_or_default().to_string();
        Ok(())
    }

    pub fn student_id(&self) -> u32 {
        self.student_id
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn submitted_date(&self) -> NaiveDateTime {
        self.submitted_date
    }

    pub fn score(&self) -> Option<u32> {
        self.score
    }

    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    pub fn is_graded(&self) -> bool {
        self.score.is_some()
    }

    pub fn is_late(&self) -> bool {
        self.submitted_date > self.assignment.due_date
    }

    pub fn percentage(&self) -> Option<f64> {
        self.score
            .map(|score| f64::from(score) * 100.0 / f64::from(self.assignment.max_points))
    }

    pub fn letter_grade(&self) -> GradeType {
        match self.percentage() {
            // Percentages never exceed 100 once the score is validated.
            Some(percentage) => {
                GradeType::from_score(percentage as u32).unwrap_or(GradeType::NotGraded)
            }
            None => GradeType::NotGraded,
        }
    }
}
