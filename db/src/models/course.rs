use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::enums::{CourseLevel, LessonType};
use crate::error::{require_name, require_positive, Error, Result};
use crate::{NewCourse, NewLesson};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    name: String,
    length_minutes: u32,
    kind: LessonType,
    start_time: Option<NaiveDateTime>,
}

impl Lesson {
    pub fn new(lesson: NewLesson) -> Result<Self> {
        require_name("lesson name", &lesson.name)?;
        let length_minutes = require_positive("lesson length", lesson.length_minutes)?;

        Ok(Self {
            name: lesson.name,
            length_minutes,
            kind: lesson.kind,
            start_time: None,
        })
    }

    /// Sets the start time. The length stays the one given at construction.
    pub fn schedule(&mut self, date: NaiveDate, hour: u32, minute: u32) -> Result<()> {
        let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| {
            Error::validation("start time", format!("{:02}:{:02} is not a valid time", hour, minute))
        })?;

        self.start_time = Some(date.and_time(time));
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn length_minutes(&self) -> u32 {
        self.length_minutes
    }

    pub fn kind(&self) -> LessonType {
        self.kind
    }

    pub fn start_time(&self) -> Option<NaiveDateTime> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<NaiveDateTime> {
        self.start_time
            .map(|start| start + Duration::minutes(i64::from(self.length_minutes)))
    }
}

/// A course taught by exactly one professor.
///
/// Courses are identified by their name together with the professor id. The
/// list of enrolled students is a secondary index over enrollments: adding a
/// student twice is a no-op rather than an error.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Course {
    name: String,
    professor_id: u32,
    lessons: Vec<Lesson>,
    max_lessons: u32,
    ects: u32,
    level: CourseLevel,
    enrolled_students: Vec<u32>,
}

impl Course {
    pub fn new(course: NewCourse) -> Result<Self> {
        require_name("course name", &course.name)?;
        let max_lessons = require_positive("max lessons", course.max_lessons)?;
        let ects = require_positive("ECTS", course.ects)?;

        Ok(Self {
            name: course.name,
            professor_id: course.professor_id,
            lessons: Vec::new(),
            max_lessons,
            ects,
            level: course.level,
            enrolled_students: Vec::new(),
        })
    }

    /// Appends a lesson. Lesson names are unique within a course, ignoring case.
    pub fn add_lesson(&mut self, lesson: Lesson) -> Result<()> {
        let lowercase = lesson.name.to_lowercase();

        if self
            .lessons
            .iter()
            .any(|l| l.name.to_lowercase() == lowercase)
        {
            return Err(Error::Duplicate(format!(
                "course {} already has a lesson named {}",
                self.name, lesson.name
            )));
        }

        if self.lessons.len() >= self.max_lessons as usize {
            return Err(Error::LimitExceeded(format!(
                "course {} already has the maximum of {} lessons",
                self.name, self.max_lessons
            )));
        }

        self.lessons.push(lesson);
        Ok(())
    }

    /// Returns whether the student was newly added.
    pub fn enroll_student(&mut self, student_id: u32) -> bool {
        if self.enrolled_students.contains(&student_id) {
            return false;
        }

        self.enrolled_students.push(student_id);
        true
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn professor_id(&self) -> u32 {
        self.professor_id
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn lesson_mut(&mut self, name: &str) -> Option<&mut Lesson> {
        let lowercase = name.to_lowercase();
        self.lessons
            .iter_mut()
            .find(|l| l.name.to_lowercase() == lowercase)
    }

    pub fn max_lessons(&self) -> u32 {
        self.max_lessons
    }

    pub fn ects(&self) -> u32 {
        self.ects
    }

    pub fn level(&self) -> CourseLevel {
        self.level
    }

    pub fn enrolled_students(&self) -> &[u32] {
        &self.enrolled_students
    }

    pub fn total_lesson_minutes(&self) -> u32 {
        self.lessons.iter().map(Lesson::length_minutes).sum()
    }
}

impl PartialEq for Course {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.professor_id == other.professor_id
    }
}

impl Eq for Course {}
