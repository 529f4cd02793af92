use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::enums::{EnrollmentStatus, GradeType, Semester};

/// A student's registration for a course in one semester.
///
/// Values are never changed in place: every transition returns a new
/// `Enrollment`, which the caller stores in place of the old one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    student_id: u32,
    course_name: String,
    semester: Semester,
    status: EnrollmentStatus,
    grade: GradeType,
    enrollment_date: NaiveDateTime,
    completion_date: Option<NaiveDateTime>,
}

impl Enrollment {
    pub fn new(student_id: u32, course_name: impl Into<String>, semester: Semester) -> Self {
        Self::with_initial_status(student_id, course_name, semester, EnrollmentStatus::Active)
    }

    pub fn pending(student_id: u32, course_name: impl Into<String>, semester: Semester) -> Self {
        Self::with_initial_status(student_id, course_name, semester, EnrollmentStatus::Pending)
    }

    fn with_initial_status(
        student_id: u32,
        course_name: impl Into<String>,
        semester: Semester,
        status: EnrollmentStatus,
    ) -> Self {
        Self {
            student_id,
            course_name: course_name.into(),
            semester,
            status,
            grade: GradeType::NotGraded,
            enrollment_date: Local::now().naive_local(),
            completion_date: None,
        }
    }

    /// Rebuilds a stored enrollment exactly as it was saved.
    pub(crate) fn restore(
        student_id: u32,
        course_name: String,
        semester: Semester,
        status: EnrollmentStatus,
        grade: GradeType,
        enrollment_date: NaiveDateTime,
        completion_date: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            student_id,
            course_name,
            semester,
            status,
            grade,
            enrollment_date,
            completion_date,
        }
    }

    /// Moves to `status`. Reaching COMPLETED or FAILED stamps the completion
    /// date with the current time; any other status keeps the previous date.
    pub fn with_status(&self, status: EnrollmentStatus) -> Self {
        let completion_date = if status.is_terminal() {
            Some(Local::now().naive_local())
        } else {
            self.completion_date
        };

        Self {
            status,
            completion_date,
            ..self.clone()
        }
    }

    /// Records `grade` and derives the status from it: F fails, a passing
    /// grade completes, and the sentinel grades leave the status alone.
    pub fn with_grade(&self, grade: GradeType) -> Self {
        let graded = Self {
            grade,
            ..self.clone()
        };

        match grade {
            GradeType::F => graded.with_status(EnrollmentStatus::Failed),
            GradeType::Incomplete | GradeType::NotGraded => graded,
            g if g.is_passing() => graded.with_status(EnrollmentStatus::Completed),
            _ => graded.with_status(EnrollmentStatus::Failed),
        }
    }

    pub fn student_id(&self) -> u32 {
        self.student_id
    }

    pub fn course_name(&self) -> &str {
        &self.course_name
    }

    pub fn semester(&self) -> Semester {
        self.semester
    }

    pub fn status(&self) -> EnrollmentStatus {
        self.status
    }

    pub fn grade(&self) -> GradeType {
        self.grade
    }

    pub fn enrollment_date(&self) -> NaiveDateTime {
        self.enrollment_date
    }

    pub fn completion_date(&self) -> Option<NaiveDateTime> {
        self.completion_date
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn is_passed(&self) -> bool {
        self.grade.is_passing()
    }

    /// Whether this enrollment is for the given student and course.
    pub fn matches(&self, student_id: u32, course_name: &str) -> bool {
        self.student_id == student_id && self.course_name == course_name
    }
}
