//! Rebuilding the records graph from the per-entity JSON files.
//!
//! Files must be read in dependency order: professors, courses (checked
//! against professor ids), lessons (attached to courses by name), students,
//! then enrollments (checked against student ids and course names). Records
//! pointing at something that did not load are skipped with a warning; a file
//! that cannot be read or parsed fails as a whole with `Error::DataLoad`.

use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::{fs, io, path::Path};

use crate::error::{Error, LoadCause, Result};
use crate::lifecycle;
use crate::models::{Course, Enrollment, Person, Professor, Student};
use crate::projection::{
    CourseRecord, EnrollmentRecord, LessonRecord, ProfessorRecord, StudentRecord,
};
use crate::{
    Records, COURSES_FILE, ENROLLMENTS_FILE, LESSONS_FILE, PROFESSORS_FILE, STUDENTS_FILE,
};

/// Loads all five files. A missing file counts as an empty collection.
pub fn load_all(dir: &Path) -> Result<Records> {
    let professors = load_professors(dir)?;
    let mut courses = load_courses(dir, &professors)?;
    load_lessons(dir, &mut courses)?;
    let students = load_students(dir)?;
    let enrollments = load_enrollments(dir, &students, &mut courses)?;

    Ok(Records {
        professors,
        students,
        courses,
        enrollments,
    })
}

fn read_records<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<Vec<T>> {
    let contents = match fs::read_to_string(dir.join(file)) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("No {} found.", file);
            return Ok(Vec::new());
        }
        Err(e) => return Err(Error::data_load(file, e)),
    };

    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }

    let records: Option<Vec<T>> =
        serde_json::from_str(&contents).map_err(|e| Error::data_load(file, e))?;
    Ok(records.unwrap_or_default())
}

/// Converts every record of a file, failing the file on the first bad one.
fn convert<R, T>(
    file: &str,
    records: Vec<R>,
    f: impl Fn(R) -> std::result::Result<T, LoadCause>,
) -> Result<Vec<T>> {
    records
        .into_iter()
        .map(|record| f(record).map_err(|cause| Error::data_load(file, cause)))
        .collect()
}

fn reject_duplicates<T>(file: &str, items: &[T], key: impl Fn(&T) -> String) -> Result<()> {
    let mut seen = HashSet::new();

    for item in items {
        let key = key(item);
        if !seen.insert(key.clone()) {
            return Err(Error::data_load(
                file,
                Error::Duplicate(format!("{} appears more than once", key)),
            ));
        }
    }

    Ok(())
}

pub fn load_professors(dir: &Path) -> Result<Vec<Professor>> {
    let records: Vec<ProfessorRecord> = read_records(dir, PROFESSORS_FILE)?;
    let professors = convert(PROFESSORS_FILE, records, ProfessorRecord::into_professor)?;
    reject_duplicates(PROFESSORS_FILE, &professors, |p| format!("professor id {}", p.id()))?;

    info!("Loaded {} professors", professors.len());
    Ok(professors)
}

/// Courses whose professor is not among `professors` are dropped.
pub fn load_courses(dir: &Path, professors: &[Professor]) -> Result<Vec<Course>> {
    let records: Vec<CourseRecord> = read_records(dir, COURSES_FILE)?;
    let professor_ids: HashSet<u32> = professors.iter().map(|p| p.id()).collect();

    let resolved = records
        .into_iter()
        .filter(|record| {
            let known = professor_ids.contains(&record.professor_id);
            if !known {
                warn!(
                    "Professor ID {} not found for course {}",
                    record.professor_id, record.name
                );
            }
            known
        })
        .collect();

    let courses = convert(COURSES_FILE, resolved, CourseRecord::into_course)?;
    reject_duplicates(COURSES_FILE, &courses, |c| format!("course {}", c.name()))?;

    info!("Loaded {} courses", courses.len());
    Ok(courses)
}

/// Attaches lessons to their courses, dropping lessons of unknown courses.
/// Returns the number of lessons attached.
pub fn load_lessons(dir: &Path, courses: &mut [Course]) -> Result<usize> {
    let records: Vec<LessonRecord> = read_records(dir, LESSONS_FILE)?;
    let by_name: HashMap<String, usize> = courses
        .iter()
        .enumerate()
        .map(|(i, c)| (c.name().to_string(), i))
        .collect();

    let mut attached = 0;

    for record in records {
        let index = match by_name.get(&record.course_name) {
            Some(&index) => index,
            None => {
                warn!(
                    "Course {} not found for lesson {}",
                    record.course_name, record.name
                );
                continue;
            }
        };

        let lesson = record
            .into_lesson()
            .map_err(|cause| Error::data_load(LESSONS_FILE, cause))?;
        courses[index]
            .add_lesson(lesson)
            .map_err(|e| Error::data_load(LESSONS_FILE, e))?;
        attached += 1;
    }

    info!("Loaded {} lessons", attached);
    Ok(attached)
}

pub fn load_students(dir: &Path) -> Result<Vec<Student>> {
    let records: Vec<StudentRecord> = read_records(dir, STUDENTS_FILE)?;
    let students = convert(STUDENTS_FILE, records, StudentRecord::into_student)?;
    reject_duplicates(STUDENTS_FILE, &students, |s| format!("student id {}", s.id()))?;

    info!("Loaded {} students", students.len());
    Ok(students)
}

/// Resolves enrollments against the loaded students and courses. Enrolled
/// students are recorded in each course's index as a side effect; records
/// pointing at a missing student or course are skipped one by one. An
/// enrollment the student does not list, or whose grade differs from the
/// student's grade map, fails the file.
pub fn load_enrollments(
    dir: &Path,
    students: &[Student],
    courses: &mut [Course],
) -> Result<Vec<Enrollment>> {
    let records: Vec<EnrollmentRecord> = read_records(dir, ENROLLMENTS_FILE)?;
    let by_id: HashMap<u32, &Student> = students.iter().map(|s| (s.id(), s)).collect();
    let by_name: HashMap<String, usize> = courses
        .iter()
        .enumerate()
        .map(|(i, c)| (c.name().to_string(), i))
        .collect();

    let mut enrollments = Vec::new();

    for record in records {
        let resolved = (
            by_id.get(&record.student_id),
            by_name.get(&record.course_name),
        );
        let (student, index) = match resolved {
            (Some(&student), Some(&index)) => (student, index),
            _ => {
                warn!(
                    "Skipping enrollment of student {} in {}: unknown student or course",
                    record.student_id, record.course_name
                );
                continue;
            }
        };

        let enrollment = record
            .into_enrollment()
            .map_err(|cause| Error::data_load(ENROLLMENTS_FILE, cause))?;
        lifecycle::check_consistency(student, &enrollment)
            .map_err(|e| Error::data_load(ENROLLMENTS_FILE, e))?;

        if courses[index].enroll_student(enrollment.student_id()) {
            debug!(
                "Student {} indexed in course {}",
                enrollment.student_id(),
                enrollment.course_name()
            );
        }
        enrollments.push(enrollment);
    }

    info!("Loaded {} enrollments", enrollments.len());
    Ok(enrollments)
}
