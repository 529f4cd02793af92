//! Writing the records graph back to its per-entity JSON files.
//!
//! Each file is written on its own: a failure is logged and reported in the
//! `SaveReport` but the remaining files are still attempted.

use log::{error, info, warn};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::projection::{
    CourseRecord, EnrollmentRecord, LessonRecord, ProfessorRecord, StudentRecord,
};
use crate::{
    Records, COURSES_FILE, ENROLLMENTS_FILE, LESSONS_FILE, PROFESSORS_FILE, STUDENTS_FILE,
};

pub const DATA_FILES: [&str; 5] = [
    STUDENTS_FILE,
    PROFESSORS_FILE,
    COURSES_FILE,
    LESSONS_FILE,
    ENROLLMENTS_FILE,
];

/// Which files a save wrote and which it could not.
#[derive(Debug, Default)]
pub struct SaveReport {
    pub saved: Vec<&'static str>,
    pub failed: Vec<(&'static str, String)>,
}

impl SaveReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Turns an incomplete save into `Error::Save` naming the failed files.
    pub fn check(&self) -> Result<()> {
        if self.is_complete() {
            return Ok(());
        }

        Err(Error::Save(self.failed.iter().map(|(file, _)| *file).collect()))
    }

    fn record(&mut self, file: &'static str, result: io::Result<usize>) {
        match result {
            Ok(count) => {
                info!("Saved {} records to {}", count, file);
                self.saved.push(file);
            }
            Err(e) => {
                error!("Could not save {}: {}", file, e);
                self.failed.push((file, e.to_string()));
            }
        }
    }
}

pub fn save_all(dir: &Path, records: &Records) -> SaveReport {
    let mut report = SaveReport::default();

    if let Err(e) = fs::create_dir_all(dir) {
        error!("Could not create data directory {}: {}", dir.display(), e);
        for file in DATA_FILES.iter().copied() {
            report.failed.push((file, e.to_string()));
        }
        return report;
    }

    let students: Vec<StudentRecord> = records.students.iter().map(StudentRecord::new).collect();
    report.record(STUDENTS_FILE, write_records(dir, STUDENTS_FILE, &students));

    let professors: Vec<ProfessorRecord> =
        records.professors.iter().map(ProfessorRecord::new).collect();
    report.record(
        PROFESSORS_FILE,
        write_records(dir, PROFESSORS_FILE, &professors),
    );

    let courses: Vec<CourseRecord> = records.courses.iter().map(CourseRecord::new).collect();
    report.record(COURSES_FILE, write_records(dir, COURSES_FILE, &courses));

    let lessons: Vec<LessonRecord> = records
        .courses
        .iter()
        .flat_map(|c| c.lessons().iter().map(move |l| LessonRecord::new(l, c.name())))
        .collect();
    report.record(LESSONS_FILE, write_records(dir, LESSONS_FILE, &lessons));

    let enrollments: Vec<EnrollmentRecord> =
        records.enrollments.iter().map(EnrollmentRecord::new).collect();
    report.record(
        ENROLLMENTS_FILE,
        write_records(dir, ENROLLMENTS_FILE, &enrollments),
    );

    report
}

fn write_records<T: Serialize>(dir: &Path, file: &str, records: &[T]) -> io::Result<usize> {
    let contents = serde_json::to_vec_pretty(records)?;
    write_atomically(&dir.join(file), &contents)?;
    Ok(records.len())
}

/// Writes `contents` to a sibling temporary file and renames it over `path`,
/// so readers see either the old file or the new one.
pub(crate) fn write_atomically(path: &Path, contents: &[u8]) -> io::Result<()> {
    let temporary = temporary_path(path);

    let written = File::create(&temporary).and_then(|mut file| {
        file.write_all(contents)?;
        file.sync_all()
    });

    if let Err(e) = written.and_then(|_| fs::rename(&temporary, path)) {
        let _ = fs::remove_file(&temporary);
        return Err(e);
    }

    Ok(())
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Deletes every data file in `dir`. Files that are already gone are fine;
/// other failures are logged and skipped.
pub fn delete_all(dir: &Path) {
    for file in DATA_FILES.iter() {
        match fs::remove_file(dir.join(file)) {
            Ok(()) => info!("Deleted {}", file),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Could not delete {}: {}", file, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_reports_fail_the_check() {
        let mut report = SaveReport::default();
        report.record(STUDENTS_FILE, Ok(3));
        assert!(report.check().is_ok());

        report.record(
            LESSONS_FILE,
            Err(io::Error::new(io::ErrorKind::Other, "disk full")),
        );
        match report.check() {
            Err(Error::Save(files)) => assert_eq!(files, vec![LESSONS_FILE]),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn temporary_files_sit_next_to_the_target() {
        assert_eq!(
            temporary_path(Path::new("data/students.json")),
            PathBuf::from("data/students.json.tmp")
        );
    }
}
