//! Creating, grading and transitioning enrollments.
//!
//! A graded enrollment exists twice: as the `Enrollment` value and as the
//! entry for the course in the student's grade map. Both are written here from
//! the same input, grade map first.

use log::info;

use crate::error::{Error, Result};
use crate::models::{Course, Enrollment, EnrollmentStatus, GradeType, Person, Semester, Student};

/// Registers `student` for `course` and returns the new ACTIVE enrollment.
///
/// The student's own capacity and duplicate checks decide; the course side
/// only records the student in its index.
pub fn enroll_student(
    student: &mut Student,
    course: &mut Course,
    semester: Semester,
) -> Result<Enrollment> {
    register(student, course)?;
    info!(
        "Student {} enrolled in course {} ({})",
        student.full_name(),
        course.name(),
        semester.name()
    );

    Ok(Enrollment::new(student.id(), course.name(), semester))
}

/// Same as [`enroll_student`] but the enrollment awaits approval.
pub fn enroll_student_pending(
    student: &mut Student,
    course: &mut Course,
    semester: Semester,
) -> Result<Enrollment> {
    register(student, course)?;
    info!(
        "Student {} requested enrollment in course {} ({})",
        student.full_name(),
        course.name(),
        semester.name()
    );

    Ok(Enrollment::pending(student.id(), course.name(), semester))
}

fn register(student: &mut Student, course: &mut Course) -> Result<()> {
    student.enroll_course(course.name())?;
    course.enroll_student(student.id());
    Ok(())
}

/// Grades an enrollment, updating the student's grade map and returning the
/// replacement enrollment.
pub fn grade_enrollment(
    student: &mut Student,
    enrollment: &Enrollment,
    grade: GradeType,
) -> Result<Enrollment> {
    if student.id() != enrollment.student_id() {
        return Err(Error::NotFound(format!(
            "enrollment in {} belongs to student {}, not {}",
            enrollment.course_name(),
            enrollment.student_id(),
            student.id()
        )));
    }

    student.set_grade(enrollment.course_name(), grade)?;
    let graded = enrollment.with_grade(grade);

    info!(
        "Enrollment graded: {} in {} - grade {} ({})",
        student.full_name(),
        enrollment.course_name(),
        grade.name(),
        graded.status().name()
    );

    Ok(graded)
}

/// Checks that `enrollment` agrees with its student: the course is in the
/// student's enrolled set and both sides hold the same grade.
pub fn check_consistency(student: &Student, enrollment: &Enrollment) -> Result<()> {
    let course_name = enrollment.course_name();

    if !student.is_enrolled(course_name) {
        return Err(Error::validation(
            "enrollment",
            format!(
                "student {} is not enrolled in {}",
                enrollment.student_id(),
                course_name
            ),
        ));
    }

    if student.grade(course_name) != enrollment.grade() {
        return Err(Error::validation(
            "grade",
            format!(
                "enrollment of student {} in {} is graded {} but the grade map says {}",
                enrollment.student_id(),
                course_name,
                enrollment.grade().name(),
                student.grade(course_name).name()
            ),
        ));
    }

    Ok(())
}

pub fn change_status(enrollment: &Enrollment, status: EnrollmentStatus) -> Enrollment {
    let changed = enrollment.with_status(status);
    info!(
        "Enrollment of student {} in {} moved from {} to {}",
        enrollment.student_id(),
        enrollment.course_name(),
        enrollment.status().name(),
        status.name()
    );
    changed
}
