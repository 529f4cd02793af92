use serde::{Deserialize, Serialize};

use super::{enums::Role, NameSet, Person, User};
use crate::error::{require_name, require_positive, Error, Result};
use crate::NewProfessor;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Professor {
    user: User,
    teaching_courses: NameSet,
    max_courses: u32,
}

impl Professor {
    pub fn new(professor: NewProfessor) -> Result<Self> {
        let max_courses = require_positive("max courses", professor.max_courses)?;
        let user = User::new(
            professor.id,
            professor.first_name,
            professor.last_name,
            professor.username,
            professor.password,
            professor.email,
            Role::Professor,
        )?;

        Ok(Self {
            user,
            teaching_courses: NameSet::new(),
            max_courses,
        })
    }

    /// Adds a course to the teaching list.
    ///
    /// Fails with `Duplicate` if the course is already taught and with
    /// `LimitExceeded` once `max_courses` courses are taught; the list is
    /// unchanged on failure.
    pub fn add_course(&mut self, course_name: &str) -> Result<()> {
        require_name("course name", course_name)?;

        if self.teaching_courses.contains(course_name) {
            return Err(Error::Duplicate(format!(
                "professor {} already teaches {}",
                self.full_name(),
                course_name
            )));
        }

        if self.teaching_courses.len() >= self.max_courses as usize {
            return Err(Error::LimitExceeded(format!(
                "professor {} already teaches the maximum of {} courses",
                self.full_name(),
                self.max_courses
            )));
        }

        self.teaching_courses.insert(course_name);
        Ok(())
    }

    pub fn teaches(&self, course_name: &str) -> bool {
        self.teaching_courses.contains(course_name)
    }

    pub fn teaching_courses(&self) -> &NameSet {
        &self.teaching_courses
    }

    pub fn course_count(&self) -> usize {
        self.teaching_courses.len()
    }

    pub fn max_courses(&self) -> u32 {
        self.max_courses
    }

    pub fn user(&self) -> &User {
        &self.user
    }
}

impl Person for Professor {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn professor(max_courses: i64) -> Result<Professor> {
        Professor::new(NewProfessor {
            id: 10,
            first_name: "Ivo".to_string(),
            last_name: "Kovač".to_string(),
            username: "ikovac".to_string(),
            password: "10123".to_string(),
            email: "ikovac10@profuni.hr".to_string(),
            max_courses,
        })
    }

    #[test]
    fn non_positive_capacity_is_rejected() {
        assert!(matches!(professor(0), Err(Error::Validation { .. })));
        assert!(matches!(professor(-3), Err(Error::Validation { .. })));
    }

    #[test]
    fn same_course_twice_is_a_duplicate() {
        let mut p = professor(3).unwrap();
        p.add_course("Algebra").unwrap();

        assert!(matches!(p.add_course("Algebra"), Err(Error::Duplicate(_))));
        assert_eq!(p.course_count(), 1);
    }

    #[test]
    fn courses_beyond_capacity_are_rejected() {
        let mut p = professor(2).unwrap();
        p.add_course("Algebra").unwrap();
        p.add_course("Analysis").unwrap();

        assert!(matches!(
            p.add_course("Topology"),
            Err(Error::LimitExceeded(_))
        ));
        assert_eq!(
            p.teaching_courses().iter().collect::<Vec<_>>(),
            vec!["Algebra", "Analysis"]
        );
    }

    #[test]
    fn duplicate_is_reported_before_capacity() {
        let mut p = professor(1).unwrap();
        p.add_course("Algebra").unwrap();

        assert!(matches!(p.add_course("Algebra"), Err(Error::Duplicate(_))));
    }

    #[test]
    fn professors_carry_the_professor_role() {
        assert_eq!(professor(1).unwrap().user().role(), Role::Professor);
    }
}
