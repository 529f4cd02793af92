mod assignment;
mod course;
mod enrollment;
pub mod enums;
mod name_set;
mod professor;
mod student;
mod user;

pub use assignment::{Assignment, Submission};
pub use course::{Course, Lesson};
pub use enrollment::Enrollment;
pub use enums::{CourseLevel, EnrollmentStatus, GradeType, LessonType, Role, Semester};
pub use name_set::NameSet;
pub use professor::Professor;
pub use student::Student;
pub use user::{Member, Person, User};
