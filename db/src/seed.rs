//! Fixed demo roster used by the `seed` command.

use chrono::NaiveDate;
use log::info;

use super::{
    models::{CourseLevel, EnrollmentStatus, GradeType, LessonType, Semester},
    username_from_name, Database, NewCourse, NewLesson, NewProfessor, NewStudent, Result,
    DEFAULT_MAX_COURSES,
};

const PROFESSORS: [(&str, &str, i64); 3] = [
    ("Ivana", "Marić", 3),
    ("Tomislav", "Novak", 2),
    ("Željko", "Perić", 2),
];

const STUDENTS: [(&str, &str); 5] = [
    ("Ana", "Horvat"),
    ("Marko", "Babić"),
    ("Lucija", "Kovačević"),
    ("Filip", "Jurić"),
    ("Ema", "Knežević"),
];

/// (name, professor index, max lessons, ECTS, level)
const COURSES: [(&str, usize, i64, i64, CourseLevel); 5] = [
    ("Programming Basics", 0, 6, 6, CourseLevel::Beginner),
    ("Data Structures", 0, 6, 7, CourseLevel::Intermediate),
    ("Databases", 1, 5, 6, CourseLevel::Intermediate),
    ("Operating Systems", 1, 5, 6, CourseLevel::Advanced),
    ("Compilers", 2, 4, 8, CourseLevel::Expert),
];

/// (course, lesson, minutes, kind)
const LESSONS: [(&str, &str, i64, LessonType); 6] = [
    ("Programming Basics", "Variables and Types", 90, LessonType::Lecture),
    ("Programming Basics", "Control Flow Lab", 120, LessonType::Lab),
    ("Data Structures", "Trees", 90, LessonType::Lecture),
    ("Databases", "Normal Forms", 45, LessonType::Seminar),
    ("Operating Systems", "Scheduling Workshop", 180, LessonType::Workshop),
    ("Compilers", "Parser Review", 60, LessonType::ProjectReview),
];

/// (student index, course, semester, grade)
const ENROLLMENTS: [(usize, &str, Semester, Option<GradeType>); 9] = [
    (0, "Programming Basics", Semester::First, Some(GradeType::APlus)),
    (0, "Data Structures", Semester::Second, Some(GradeType::A)),
    (0, "Compilers", Semester::Fifth, None),
    (1, "Programming Basics", Semester::First, Some(GradeType::C)),
    (1, "Databases", Semester::Third, Some(GradeType::F)),
    (2, "Databases", Semester::Third, Some(GradeType::B)),
    (2, "Operating Systems", Semester::Fourth, Some(GradeType::Incomplete)),
    (3, "Programming Basics", Semester::First, Some(GradeType::D)),
    (4, "Data Structures", Semester::Second, None),
];

/// Clears `db` and fills it with the demo roster. Nothing is written to disk.
pub fn seed_db<D: Database>(db: &mut D) -> Result<()> {
    db.reset();

    for (i, (first_name, last_name, max_courses)) in PROFESSORS.iter().enumerate() {
        let id = 10 + i as u32;
        let username = username_from_name(first_name, last_name);

        db.professor_add(NewProfessor {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            password: format!("{}123", id),
            email: format!("{}{}@profuni.hr", username, id),
            username,
            max_courses: *max_courses,
        })?;
    }

    for (i, (first_name, last_name)) in STUDENTS.iter().enumerate() {
        let id = 100 + i as u32;
        let username = username_from_name(first_name, last_name);

        db.student_add(NewStudent {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            password: format!("{}456", id),
            email: format!("{}{}@studuni.hr", username, id),
            username,
            max_courses: DEFAULT_MAX_COURSES,
        })?;
    }

    for (name, professor, max_lessons, ects, level) in COURSES.iter() {
        db.course_add(NewCourse {
            name: name.to_string(),
            professor_id: 10 + *professor as u32,
            max_lessons: *max_lessons,
            ects: *ects,
            level: *level,
        })?;
    }

    let first_day = NaiveDate::from_ymd_opt(2025, 10, 6).unwrap_or_default();
    for (day, (course, lesson, minutes, kind)) in LESSONS.iter().enumerate() {
        db.lesson_add(
            course,
            NewLesson {
                name: lesson.to_string(),
                length_minutes: *minutes,
                kind: *kind,
            },
        )?;

        let date = first_day + chrono::Duration::days(day as i64);
        db.lesson_schedule(course, lesson, date, 9 + (day as u32 % 3) * 2, 15)?;
    }

    for (student, course, semester, grade) in ENROLLMENTS.iter() {
        let student_id = 100 + *student as u32;
        db.enrollment_add(student_id, course, *semester)?;

        if let Some(grade) = grade {
            db.enrollment_grade(student_id, course, *grade)?;
        }
    }

    db.enrollment_add_pending(103, "Databases", Semester::Third)?;
    db.enrollment_set_status(104, "Data Structures", EnrollmentStatus::Dropped)?;

    info!("Seeded {}", db.records().counts());
    Ok(())
}
