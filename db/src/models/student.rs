use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{
    enums::{GradeType, Role},
    NameSet, Person, User,
};
use crate::error::{require_name, require_positive, Error, Result};
use crate::NewStudent;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Student {
    user: User,
    enrolled_courses: NameSet,
    max_courses: u32,
    course_grades: BTreeMap<String, GradeType>,
}

impl Student {
    pub fn new(student: NewStudent) -> Result<Self> {
        let max_courses = require_positive("max courses", student.max_courses)?;
        let user = User::new(
            student.id,
            student.first_name,
            student.last_name,
            student.username,
            student.password,
            student.email,
            Role::Student,
        )?;

        Ok(Self {
            user,
            enrolled_courses: NameSet::new(),
            max_courses,
            course_grades: BTreeMap::new(),
        })
    }

    /// Registers the student for a course, with the grade starting as
    /// `NotGraded`.
    ///
    /// Fails with `Duplicate` if already registered and with `LimitExceeded`
    /// when at capacity; nothing is changed on failure.
    pub fn enroll_course(&mut self, course_name: &str) -> Result<()> {
        require_name("course name", course_name)?;

        if self.enrolled_courses.contains(course_name) {
            return Err(Error::Duplicate(format!(
                "student {} is already enrolled in the course {}",
                self.full_name(),
                course_name
            )));
        }

        if self.enrolled_courses.len() >= self.max_courses as usize {
            return Err(Error::LimitExceeded(format!(
                "student {} has reached the maximum number of courses ({})",
                self.full_name(),
                self.max_courses
            )));
        }

        self.enrolled_courses.insert(course_name);
        self.course_grades
            .insert(course_name.to_string(), GradeType::NotGraded);
        Ok(())
    }

    pub fn set_grade(&mut self, course_name: &str, grade: GradeType) -> Result<()> {
        if !self.enrolled_courses.contains(course_name) {
            return Err(Error::NotFound(format!(
                "student {} is not enrolled in course {}",
                self.full_name(),
                course_name
            )));
        }

        self.course_grades.insert(course_name.to_string(), grade);
        Ok(())
    }

    pub fn grade(&self, course_name: &str) -> GradeType {
        self.course_grades
            .get(course_name)
            .copied()
            .unwrap_or(GradeType::NotGraded)
    }

    /// Average grade point over every grade except `NotGraded` and
    /// `Incomplete`; 0.0 when no such grade exists.
    pub fn calculate_gpa(&self) -> f64 {
        let points: Vec<f64> = self
            .course_grades
            .values()
            .filter(|g| !g.is_sentinel())
            .map(GradeType::grade_point)
            .collect();

        if points.is_empty() {
            return 0.0;
        }

        points.iter().sum::<f64>() / points.len() as f64
    }

    pub fn is_enrolled(&self, course_name: &str) -> bool {
        self.enrolled_courses.contains(course_name)
    }

    pub fn enrolled_courses(&self) -> &NameSet {
        &self.enrolled_courses
    }

    pub fn course_grades(&self) -> &BTreeMap<String, GradeType> {
        &self.course_grades
    }

    pub fn course_count(&self) -> usize {
        self.enrolled_courses.len()
    }

    pub fn max_courses(&self) -> u32 {
        self.max_courses
    }

    pub fn user(&self) -> &User {
        &self.user
    }
}

impl Person for Student {
    fn id(&self) -> u32 {
        self.user.id()
    }

    fn first_name(&self) -> &str {
        self.user.first_name()
    }

    fn last_name(&self) -> &str {
        self.user.last_name()
    }
}
