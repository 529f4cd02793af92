//! Flat, id-keyed shapes of the entities as they appear in the JSON files.
//!
//! Records never nest one entity inside another: courses name their
//! professor by id, lessons their course by name, and enrollments their
//! student by id and their course by name.

use chrono::Timelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::LoadCause;
use crate::models::{
    Course, CourseLevel, Enrollment, EnrollmentStatus, GradeType, Lesson, LessonType, Person,
    Professor, Semester, Student,
};
use crate::timestamp;
use crate::{NewCourse, NewLesson, NewProfessor, NewStudent};

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessorRecord {
    pub id: u32,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: String,
    pub max_courses: i64,
    #[serde(default)]
    pub teaching_courses: Vec<String>,
}

impl ProfessorRecord {
    pub fn new(professor: &Professor) -> Self {
        let user = professor.user();

        Self {
            id: professor.id(),
            first_name: professor.first_name().to_string(),
            last_name: professor.last_name().to_string(),
            username: user.username().to_string(),
            password: user.password().to_string(),
            email: user.email().to_string(),
            max_courses: i64::from(professor.max_courses()),
            teaching_courses: professor.teaching_courses().to_vec(),
        }
    }

    pub fn into_professor(self) -> Result<Professor, LoadCause> {
        let mut professor = Professor::new(NewProfessor {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            username: self.username,
            password: self.password,
            email: self.email,
            max_courses: self.max_courses,
        })?;

        for course_name in &self.teaching_courses {
            professor.add_course(course_name)?;
        }

        Ok(professor)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: u32,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: String,
    pub max_courses: i64,
    #[serde(default)]
    pub enrolled_courses: Vec<String>,
    #[serde(default)]
    pub course_grades: BTreeMap<String, GradeType>,
}

impl StudentRecord {
    pub fn new(student: &Student) -> Self {
        let user = student.user();

        Self {
            id: student.id(),
            first_name: student.first_name().to_string(),
            last_name: student.last_name().to_string(),
            username: user.username().to_string(),
            password: user.password().to_string(),
            email: user.email().to_string(),
            max_courses: i64::from(student.max_courses()),
            enrolled_courses: student.enrolled_courses().to_vec(),
            course_grades: student.course_grades().clone(),
        }
    }

    pub fn into_student(self) -> Result<Student, LoadCause> {
        let mut student = Student::new(NewStudent {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            username: self.username,
            password: self.password,
            email: self.email,
            max_courses: self.max_courses,
        })?;

        for course_name in &self.enrolled_courses {
            student.enroll_course(course_name)?;
        }

        for (course_name, grade) in self.course_grades {
            student.set_grade(&course_name, grade)?;
        }

        Ok(student)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    pub name: String,
    pub professor_id: u32,
    pub max_lessons: i64,
    pub ects: i64,
    pub level: CourseLevel,
    #[serde(default)]
    pub lesson_names: Vec<String>,
}

impl CourseRecord {
    pub fn new(course: &Course) -> Self {
        Self {
            name: course.name().to_string(),
            professor_id: course.professor_id(),
            max_lessons: i64::from(course.max_lessons()),
            ects: i64::from(course.ects()),
            level: course.level(),
            lesson_names: course
                .lessons()
                .iter()
                .map(|l| l.name().to_string())
                .collect(),
        }
    }

    /// Builds the course without lessons; those come from their own file.
    pub fn into_course(self) -> Result<Course, LoadCause> {
        Ok(Course::new(NewCourse {
            name: self.name,
            professor_id: self.professor_id,
            max_lessons: self.max_lessons,
            ects: self.ects,
            level: self.level,
        })?)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonRecord {
    pub name: String,
    pub course_name: String,
    pub length_minutes: i64,
    #[serde(rename = "type")]
    pub kind: LessonType,
    pub scheduled_date: Option<String>,
    pub scheduled_time: Option<String>,
}

impl LessonRecord {
    pub fn new(lesson: &Lesson, course_name: &str) -> Self {
        let start = lesson.start_time();

        Self {
            name: lesson.name().to_string(),
            course_name: course_name.to_string(),
            length_minutes: i64::from(lesson.length_minutes()),
            kind: lesson.kind(),
            scheduled_date: start.map(|s| timestamp::encode_date(&s.date())),
            scheduled_time: start.map(|s| timestamp::encode_time(&s.time())),
        }
    }

    /// A lesson is scheduled only when both the date and the time are present.
    pub fn into_lesson(self) -> Result<Lesson, LoadCause> {
        let mut lesson = Lesson::new(NewLesson {
            name: self.name,
            length_minutes: self.length_minutes,
            kind: self.kind,
        })?;

        if let (Some(date), Some(time)) = (&self.scheduled_date, &self.scheduled_time) {
            let date = timestamp::decode_date(date)?;
            let time = timestamp::decode_time(time)?;
            lesson.schedule(date, time.hour(), time.minute())?;
        }

        Ok(lesson)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRecord {
    pub student_id: u32,
    pub course_name: String,
    pub semester: Semester,
    pub status: EnrollmentStatus,
    pub grade: GradeType,
    pub enrollment_date: String,
    pub completion_date: Option<String>,
}

impl EnrollmentRecord {
    pub fn new(enrollment: &Enrollment) -> Self {
        Self {
            student_id: enrollment.student_id(),
            course_name: enrollment.course_name().to_string(),
            semester: enrollment.semester(),
            status: enrollment.status(),
            grade: enrollment.grade(),
            enrollment_date: timestamp::encode_date_time(&enrollment.enrollment_date()),
            completion_date: enrollment
                .completion_date()
                .map(|d| timestamp::encode_date_time(&d)),
        }
    }

    pub fn into_enrollment(self) -> Result<Enrollment, LoadCause> {
        let enrollment_date = timestamp::decode_date_time(&self.enrollment_date)?;
        let completion_date = match &self.completion_date {
            Some(date) => Some(timestamp::decode_date_time(date)?),
            None => None,
        };

        Ok(Enrollment::restore(
            self.student_id,
            self.course_name,
            self.semester,
            self.status,
            self.grade,
            enrollment_date,
            completion_date,
        ))
    }
}
