use chrono::NaiveDate;
use log::info;
use std::path::{Path, PathBuf};

use super::{
    backup, lifecycle, load, save,
    search::{find_all, search},
    Database, NewCourse, NewLesson, NewProfessor, NewStudent, Records, SaveReport,
    SnapshotCounts,
};
use crate::error::{Error, Result};
use crate::models::{
    Course, Enrollment, EnrollmentStatus, GradeType, Lesson, Member, Person, Professor, Semester,
    Student,
};

/// Records store backed by one JSON file per entity kind inside `data_dir`.
///
/// Changes stay in memory until [`Database::save`] is called.
#[derive(Debug)]
pub struct JSONDatabase {
    data_dir: PathBuf,
    records: Records,
}

impl JSONDatabase {
    /// Loads the store from `data_dir`. Missing files are treated as empty;
    /// a file that cannot be parsed fails with `Error::DataLoad`.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        let records = load::load_all(&data_dir)?;

        Ok(Self { data_dir, records })
    }

    pub fn new_empty(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            records: Records::default(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn check_new_member(&self, id_taken: bool, id: u32, username: &str) -> Result<()> {
        if id_taken {
            return Err(Error::Duplicate(format!("id {} is already in use", id)));
        }

        if self
            .records
            .members()
            .any(|m| m.user().username() == username)
        {
            return Err(Error::Duplicate(format!(
                "username {} is already in use",
                username
            )));
        }

        Ok(())
    }

    fn enroll(
        &mut self,
        student_id: u32,
        course_name: &str,
        semester: Semester,
        pending: bool,
    ) -> Result<&Enrollment> {
        let student = self
            .records
            .students
            .iter_mut()
            .find(|s| s.id() == student_id)
            .ok_or_else(|| Error::NotFound(format!("student {}", student_id)))?;
        let course = self
            .records
            .courses
            .iter_mut()
            .find(|c| c.name() == course_name)
            .ok_or_else(|| Error::NotFound(format!("course {}", course_name)))?;

        let enrollment = if pending {
            lifecycle::enroll_student_pending(student, course, semester)?
        } else {
            lifecycle::enroll_student(student, course, semester)?
        };

        self.records.enrollments.push(enrollment);
        Ok(&self.records.enrollments[self.records.enrollments.len() - 1])
    }

    fn enrollment_index(&self, student_id: u32, course_name: &str) -> Result<usize> {
        self.records
            .enrollments
            .iter()
            .position(|e| e.matches(student_id, course_name))
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "enrollment of student {} in {}",
                    student_id, course_name
                ))
            })
    }

    fn course_mut(&mut self, name: &str) -> Result<&mut Course> {
        self.records
            .courses
            .iter_mut()
            .find(|c| c.name() == name)
            .ok_or_else(|| Error::NotFound(format!("course {}", name)))
    }
}

impl Database for JSONDatabase {
    fn records(&self) -> &Records {
        &self.records
    }

    fn reset(&mut self) {
        self.records = Records::default();
        save::delete_all(&self.data_dir);
        info!("All records cleared");
    }

    fn save(&self) -> SaveReport {
        save::save_all(&self.data_dir, &self.records)
    }

    fn dump_as_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.records)
    }

    fn backup(&self, path: &Path) -> Result<SnapshotCounts> {
        backup::write_backup(path, &self.records)
    }

    fn restore(&mut self, path: &Path) -> Result<SnapshotCounts> {
        let records = backup::read_backup(path)?;
        let counts = records.counts();

        self.records = records;
        info!("Restored {} from {}", counts, path.display());

        self.save().check()?;
        Ok(counts)
    }

    fn professor_add(&mut self, professor: NewProfessor) -> Result<&Professor> {
        let id_taken = self.professor_get(professor.id).is_some();
        self.check_new_member(id_taken, professor.id, &professor.username)?;

        let professor = Professor::new(professor)?;
        info!("Professor {} added", professor.full_name());
        self.records.professors.push(professor);

        Ok(&self.records.professors[self.records.professors.len() - 1])
    }

    fn professor_get(&self, id: u32) -> Option<&Professor> {
        self.records.professors.iter().find(|p| p.id() == id)
    }

    fn professor_list(&self, page: usize, query: Option<&str>) -> (usize, Vec<&Professor>) {
        search(
            self.records.professors.iter(),
            |p| p.last_name().to_string(),
            page,
            query,
            |_| true,
        )
    }

    fn professor_find(&self, last_name: &str) -> Result<Vec<&Professor>> {
        find_all(
            self.records.professors.iter(),
            |p| p.last_name().to_string(),
            last_name,
        )
        .ok_or_else(|| Error::NotFound(format!("no professor with last name {}", last_name)))
    }

    fn student_add(&mut self, student: NewStudent) -> Result<&Student> {
        let id_taken = self.student_get(student.id).is_some();
        self.check_new_member(id_taken, student.id, &student.username)?;

        let student = Student::new(student)?;
        info!("Student {} added", student.full_name());
        self.records.students.push(student);

        Ok(&self.records.students[self.records.students.len() - 1])
    }

    fn student_get(&self, id: u32) -> Option<&Student> {
        self.records.students.iter().find(|s| s.id() == id)
    }

    fn student_list(&self, page: usize, query: Option<&str>) -> (usize, Vec<&Student>) {
        search(
            self.records.students.iter(),
            |s| s.first_name().to_string(),
            page,
            query,
            |_| true,
        )
    }

    fn student_find(&self, first_name: &str) -> Result<Vec<&Student>> {
        find_all(
            self.records.students.iter(),
            |s| s.first_name().to_string(),
            first_name,
        )
        .ok_or_else(|| Error::NotFound(format!("no student with first name {}", first_name)))
    }

    fn user_list(
        &self,
        page: usize,
        query: Option<&str>,
        filter: impl Fn(&Member) -> bool,
    ) -> (usize, Vec<Member<'_>>) {
        search(
            self.records.members(),
            |m| m.full_name(),
            page,
            query,
            filter,
        )
    }

    fn course_add(&mut self, course: NewCourse) -> Result<&Course> {
        let course = Course::new(course)?;

        if self.course_get(course.name()).is_some() {
            return Err(Error::Duplicate(format!("course {}", course.name())));
        }

        let professor = self
            .records
            .professors
            .iter_mut()
            .find(|p| p.id() == course.professor_id())
            .ok_or_else(|| Error::NotFound(format!("professor {}", course.professor_id())))?;
        professor.add_course(course.name())?;

        info!(
            "Course {} added, taught by {}",
            course.name(),
            professor.full_name()
        );
        self.records.courses.push(course);

        Ok(&self.records.courses[self.records.courses.len() - 1])
    }

    fn course_get(&self, name: &str) -> Option<&Course> {
        self.records.courses.iter().find(|c| c.name() == name)
    }

    fn course_list(&self, page: usize, query: Option<&str>) -> (usize, Vec<&Course>) {
        search(
            self.records.courses.iter(),
            |c| c.name().to_string(),
            page,
            query,
            |_| true,
        )
    }

    fn course_find(&self, name: &str) -> Result<Vec<&Course>> {
        find_all(self.records.courses.iter(), |c| c.name().to_string(), name)
            .ok_or_else(|| Error::NotFound(format!("no course named {}", name)))
    }

    fn lesson_add(&mut self, course_name: &str, lesson: NewLesson) -> Result<()> {
        let lesson = Lesson::new(lesson)?;
        self.course_mut(course_name)?.add_lesson(lesson)
    }

    fn lesson_schedule(
        &mut self,
        course_name: &str,
        lesson_name: &str,
        date: NaiveDate,
        hour: u32,
        minute: u32,
    ) -> Result<()> {
        self.course_mut(course_name)?
            .lesson_mut(lesson_name)
            .ok_or_else(|| Error::NotFound(format!("lesson {} in {}", lesson_name, course_name)))?
            .schedule(date, hour, minute)
    }

    fn enrollment_add(
        &mut self,
        student_id: u32,
        course_name: &str,
        semester: Semester,
    ) -> Result<&Enrollment> {
        self.enroll(student_id, course_name, semester, false)
    }

    fn enrollment_add_pending(
        &mut self,
        student_id: u32,
        course_name: &str,
        semester: Semester,
    ) -> Result<&Enrollment> {
        self.enroll(student_id, course_name, semester, true)
    }

    fn enrollment_get(&self, student_id: u32, course_name: &str) -> Option<&Enrollment> {
        self.records
            .enrollments
            .iter()
            .find(|e| e.matches(student_id, course_name))
    }

    fn enrollment_grade(
        &mut self,
        student_id: u32,
        course_name: &str,
        grade: GradeType,
    ) -> Result<&Enrollment> {
        let index = self.enrollment_index(student_id, course_name)?;
        let student = self
            .records
            .students
            .iter_mut()
            .find(|s| s.id() == student_id)
            .ok_or_else(|| Error::NotFound(format!("student {}", student_id)))?;

        let graded = lifecycle::grade_enrollment(student, &self.records.enrollments[index], grade)?;
        self.records.enrollments[index] = graded;

        Ok(&self.records.enrollments[index])
    }

    fn enrollment_set_status(
        &mut self,
        student_id: u32,
        course_name: &str,
        status: EnrollmentStatus,
    ) -> Result<&Enrollment> {
        let index = self.enrollment_index(student_id, course_name)?;
        let changed = lifecycle::change_status(&self.records.enrollments[index], status);
        self.records.enrollments[index] = changed;

        Ok(&self.records.enrollments[index])
    }
}
