use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod backup;
mod error;
mod json;
pub mod lifecycle;
pub mod load;
pub mod models;
mod projection;
pub mod save;
mod search;
pub mod seed;
pub mod stats;
pub mod timestamp;

pub use backup::SnapshotCounts;
pub use error::{Error, LoadCause, Result};
pub use json::JSONDatabase;
pub use save::SaveReport;

use models::{
    Course, CourseLevel, Enrollment, EnrollmentStatus, GradeType, LessonType, Member, Professor,
    Semester, Student,
};

pub const PAGE_SIZE: usize = 10;

pub const STUDENTS_FILE: &str = "students.json";
pub const PROFESSORS_FILE: &str = "professors.json";
pub const COURSES_FILE: &str = "courses.json";
pub const LESSONS_FILE: &str = "lessons.json";
pub const ENROLLMENTS_FILE: &str = "enrollments.json";

/// The four top-level collections making up the records graph.
///
/// Courses refer to professors by id, enrollments to students by id and to
/// courses by name. Lessons are owned by their course.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Records {
    pub professors: Vec<Professor>,
    pub students: Vec<Student>,
    pub courses: Vec<Course>,
    pub enrollments: Vec<Enrollment>,
}

impl Records {
    pub fn is_empty(&self) -> bool {
        self.professors.is_empty()
            && self.students.is_empty()
            && self.courses.is_empty()
            && self.enrollments.is_empty()
    }

    pub fn counts(&self) -> SnapshotCounts {
        SnapshotCounts {
            students: self.students.len(),
            professors: self.professors.len(),
            courses: self.courses.len(),
            enrollments: self.enrollments.len(),
        }
    }

    /// Every professor and student, professors first.
    pub fn members(&self) -> impl Iterator<Item = Member<'_>> {
        self.professors
            .iter()
            .map(Member::Professor)
            .chain(self.students.iter().map(Member::Student))
    }
}

// Besides documenting the operations, the trait lets the seed data be written
// against any store.
pub trait Database {
    fn records(&self) -> &Records;

    /// Drops every entity and deletes the JSON files.
    fn reset(&mut self);
    fn save(&self) -> SaveReport;
    fn dump_as_json(&self) -> std::result::Result<String, serde_json::Error>;

    fn backup(&self, path: &Path) -> Result<SnapshotCounts>;
    /// Replaces the live records with the snapshot at `path`, then rewrites
    /// the JSON files. Nothing changes if the snapshot cannot be read; if the
    /// rewrite fails the records stay restored in memory and
    /// `Error::Save` names the files that were not written.
    fn restore(&mut self, path: &Path) -> Result<SnapshotCounts>;

    fn professor_add(&mut self, professor: NewProfessor) -> Result<&Professor>;
    fn professor_get(&self, id: u32) -> Option<&Professor>;
    fn professor_list(&self, page: usize, query: Option<&str>) -> (usize, Vec<&Professor>);
    fn professor_find(&self, last_name: &str) -> Result<Vec<&Professor>>;

    fn student_add(&mut self, student: NewStudent) -> Result<&Student>;
    fn student_get(&self, id: u32) -> Option<&Student>;
    fn student_list(&self, page: usize, query: Option<&str>) -> (usize, Vec<&Student>);
    fn student_find(&self, first_name: &str) -> Result<Vec<&Student>>;

    fn user_list(
        &self,
        page: usize,
        query: Option<&str>,
        filter: impl Fn(&Member) -> bool,
    ) -> (usize, Vec<Member<'_>>);

    fn course_add(&mut self, course: NewCourse) -> Result<&Course>;
    fn course_get(&self, name: &str) -> Option<&Course>;
    fn course_list(&self, page: usize, query: Option<&str>) -> (usize, Vec<&Course>);
    fn course_find(&self, name: &str) -> Result<Vec<&Course>>;

    fn lesson_add(&mut self, course_name: &str, lesson: NewLesson) -> Result<()>;
    fn lesson_schedule(
        &mut self,
        course_name: &str,
        lesson_name: &str,
        date: NaiveDate,
        hour: u32,
        minute: u32,
    ) -> Result<()>;

    fn enrollment_add(
        &mut self,
        student_id: u32,
        course_name: &str,
        semester: Semester,
    ) -> Result<&Enrollment>;
    fn enrollment_add_pending(
        &mut self,
        student_id: u32,
        course_name: &str,
        semester: Semester,
    ) -> Result<&Enrollment>;
    fn enrollment_get(&self, student_id: u32, course_name: &str) -> Option<&Enrollment>;
    fn enrollment_grade(
        &mut self,
        student_id: u32,
        course_name: &str,
        grade: GradeType,
    ) -> Result<&Enrollment>;
    fn enrollment_set_status(
        &mut self,
        student_id: u32,
        course_name: &str,
        status: EnrollmentStatus,
    ) -> Result<&Enrollment>;
}

/// Lower-cased ASCII login built from the first initial and the last name.
pub fn username_from_name(first_name: &str, last_name: &str) -> String {
    let initial: String = first_name.chars().take(1).collect();

    unidecode::unidecode(&format!("{}{}", initial, last_name))
        .to_ascii_lowercase()
        .replace(' ', "")
}

pub const DEFAULT_MAX_COURSES: i64 = 5;

pub struct NewProfessor {
    pub id: u32,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,
    pub email: String,
    pub max_courses: i64,
}

pub struct NewStudent {
    pub id: u32,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,
    pub email: String,
    pub max_courses: i64,
}

pub struct NewCourse {
    pub name: String,
    pub professor_id: u32,
    pub max_lessons: i64,
    pub ects: i64,
    pub level: CourseLevel,
}

pub struct NewLesson {
    pub name: String,
    pub length_minutes: i64,
    pub kind: LessonType,
}

pub struct NewAssignment {
    pub title: String,
    pub description: String,
    pub max_points: i64,
    pub due_date: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usernames_are_ascii_initial_and_last_name() {
        assert_eq!(username_from_name("Ivan", "Horvat"), "ihorvat");
        assert_eq!(username_from_name("Željka", "Kovačević"), "zkovacevic");
        assert_eq!(username_from_name("Ana", "Van Dijk"), "avandijk");
    }
}
