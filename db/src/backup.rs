//! Whole-graph snapshots in bincode.
//!
//! A snapshot is a `Header` followed by the `Records`, both bincode-encoded.
//! Decoding checks the header before touching the records and rejects
//! trailing bytes, so a snapshot is either read completely or not at all.
//! The decoded records are then run back through the validating
//! constructors, since bincode fills private fields directly.

use bincode::Options;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::{fmt, fs, path::Path};

use crate::error::{Error, Result};
use crate::lifecycle;
use crate::models::{Person, Student};
use crate::projection::{CourseRecord, LessonRecord, ProfessorRecord, StudentRecord};
use crate::save::write_atomically;
use crate::Records;

pub const MAGIC: [u8; 5] = *b"ACREC";
pub const VERSION: u32 = 1;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Header {
    magic: [u8; 5],
    version: u32,
}

/// Sizes of the four collections held in a snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SnapshotCounts {
    pub students: usize,
    pub professors: usize,
    pub courses: usize,
    pub enrollments: usize,
}

impl fmt::Display for SnapshotCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} students, {} professors, {} courses, {} enrollments",
            self.students, self.professors, self.courses, self.enrollments
        )
    }
}

pub fn encode(records: &Records) -> Result<Vec<u8>> {
    let header = Header {
        magic: MAGIC,
        version: VERSION,
    };

    let mut bytes = bincode::DefaultOptions::new()
        .serialize(&header)
        .map_err(|e| Error::Backup(format!("could not encode header: {}", e)))?;
    let body = bincode::DefaultOptions::new()
        .serialize(records)
        .map_err(|e| Error::Backup(format!("could not encode records: {}", e)))?;
    bytes.extend_from_slice(&body);

    Ok(bytes)
}

pub fn decode(bytes: &[u8]) -> Result<Records> {
    let limit = bytes.len() as u64;
    let mut reader = bytes;

    let header: Header = bincode::DefaultOptions::new()
        .with_limit(limit)
        .deserialize_from(&mut reader)
        .map_err(|e| Error::Backup(format!("unreadable header: {}", e)))?;

    if header.magic != MAGIC {
        return Err(Error::Backup("not a records snapshot".to_string()));
    }
    if header.version != VERSION {
        return Err(Error::Backup(format!(
            "unsupported snapshot version {} (expected {})",
            header.version, VERSION
        )));
    }

    let records: Records = bincode::DefaultOptions::new()
        .with_limit(limit)
        .deserialize_from(&mut reader)
        .map_err(|e| Error::Backup(format!("unreadable records: {}", e)))?;

    if !reader.is_empty() {
        return Err(Error::Backup(format!(
            "{} unexpected bytes after the records",
            reader.len()
        )));
    }

    validate(&records)?;
    Ok(records)
}

fn invalid(reason: impl fmt::Display) -> Error {
    Error::Backup(format!("invalid snapshot: {}", reason))
}

fn validate(records: &Records) -> Result<()> {
    let mut professor_ids = HashSet::new();
    for professor in &records.professors {
        ProfessorRecord::new(professor)
            .into_professor()
            .map_err(invalid)?;
        if !professor_ids.insert(professor.id()) {
            return Err(invalid(format!("professor id {} repeats", professor.id())));
        }
    }

    let mut students: HashMap<u32, &Student> = HashMap::new();
    for student in &records.students {
        StudentRecord::new(student).into_student().map_err(invalid)?;
        if students.insert(student.id(), student).is_some() {
            return Err(invalid(format!("student id {} repeats", student.id())));
        }
    }

    let mut course_names = HashSet::new();
    for course in &records.courses {
        if !professor_ids.contains(&course.professor_id()) {
            return Err(invalid(format!(
                "course {} has no professor {}",
                course.name(),
                course.professor_id()
            )));
        }
        if !course_names.insert(course.name()) {
            return Err(invalid(format!("course {} repeats", course.name())));
        }

        let mut rebuilt = CourseRecord::new(course).into_course().map_err(invalid)?;
        for lesson in course.lessons() {
            let lesson = LessonRecord::new(lesson, course.name())
                .into_lesson()
                .map_err(invalid)?;
            rebuilt.add_lesson(lesson).map_err(invalid)?;
        }
    }

    for enrollment in &records.enrollments {
        let student = students.get(&enrollment.student_id()).ok_or_else(|| {
            invalid(format!(
                "enrollment refers to missing student {}",
                enrollment.student_id()
            ))
        })?;
        lifecycle::check_consistency(student, enrollment).map_err(invalid)?;
    }

    Ok(())
}

pub fn write_backup(path: &Path, records: &Records) -> Result<SnapshotCounts> {
    let bytes = encode(records)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    write_atomically(path, &bytes)?;

    let counts = records.counts();
    info!("Backup written to {}: {}", path.display(), counts);
    Ok(counts)
}

pub fn read_backup(path: &Path) -> Result<Records> {
    let bytes = fs::read(path)?;
    decode(&bytes)
}

pub fn backup_exists(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Enrollment, Professor, Semester, Student};
    use crate::{NewProfessor, NewStudent};

    fn records() -> Records {
        let mut student = Student::new(NewStudent {
            id: 100,
            first_name: "Ana".to_string(),
            last_name: "Horvat".to_string(),
            username: "ahorvat".to_string(),
            password: "100456".to_string(),
            email: "ahorvat@studuni.hr".to_string(),
            max_courses: 3,
        })
        .unwrap();
        student.enroll_course("Algebra").unwrap();

        let professor = Professor::new(NewProfessor {
            id: 10,
            first_name: "Ivan".to_string(),
            last_name: "Kovač".to_string(),
            username: "ikovac".to_string(),
            password: "prof10".to_string(),
            email: String::new(),
            max_courses: 2,
        })
        .unwrap();

        Records {
            professors: vec![professor],
            students: vec![student],
            courses: Vec::new(),
            enrollments: vec![Enrollment::new(100, "Algebra", Semester::First)],
        }
    }

    #[test]
    fn snapshots_decode_to_the_same_graph() {
        let records = records();
        let bytes = encode(&records).unwrap();

        assert_eq!(decode(&bytes).unwrap(), records);
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let mut bytes = encode(&records()).unwrap();
        bytes[0] = b'X';

        assert!(matches!(decode(&bytes), Err(Error::Backup(_))));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut bytes = bincode::DefaultOptions::new()
            .serialize(&Header {
                magic: MAGIC,
                version: VERSION + 1,
            })
            .unwrap();
        bytes.extend(bincode::DefaultOptions::new().serialize(&records()).unwrap());

        match decode(&bytes) {
            Err(Error::Backup(message)) => assert!(message.contains("version")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn truncated_and_padded_snapshots_are_rejected() {
        let bytes = encode(&records()).unwrap();

        assert!(matches!(
            decode(&bytes[..bytes.len() - 3]),
            Err(Error::Backup(_))
        ));

        let mut padded = bytes;
        padded.push(0);
        assert!(matches!(decode(&padded), Err(Error::Backup(_))));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(decode(&[]), Err(Error::Backup(_))));
    }

    fn tampered_student(edit: impl Fn(&mut serde_json::Value)) -> Records {
        let mut records = records();
        let mut value = serde_json::to_value(&records.students[0]).unwrap();
        edit(&mut value);
        records.students[0] = serde_json::from_value(value).unwrap();
        records
    }

    #[test]
    fn snapshots_breaking_invariants_are_rejected() {
        let no_capacity = tampered_student(|v| v["max_courses"] = serde_json::json!(0));
        let repeated = tampered_student(|v| {
            v["enrolled_courses"] = serde_json::json!(["Algebra", "Algebra"])
        });
        let regraded = tampered_student(|v| v["course_grades"]["Algebra"] = serde_json::json!("B"));

        for records in [no_capacity, repeated, regraded].iter() {
            let bytes = encode(records).unwrap();
            match decode(&bytes) {
                Err(Error::Backup(message)) => assert!(message.starts_with("invalid snapshot")),
                other => panic!("unexpected result: {:?}", other),
            }
        }
    }

    #[test]
    fn enrollments_of_unknown_students_are_rejected() {
        let mut records = records();
        records.students.clear();

        let bytes = encode(&records).unwrap();
        assert!(matches!(decode(&bytes), Err(Error::Backup(_))));
    }
}
