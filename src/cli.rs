use clap::{Parser, Subcommand};
use db::models::{EnrollmentStatus, GradeType, Semester};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "records")]
#[command(about = "Academic records store: students, professors, courses and enrollments")]
pub struct Config {
    /// Directory holding the JSON data files
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Snapshot file used by `backup` and `restore` [default: <data-dir>/backup.bin]
    #[arg(long)]
    pub backup_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Config {
    pub fn backup_file(&self) -> PathBuf {
        self.backup_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("backup.bin"))
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load the data and log counts and statistics
    Summary,
    /// Replace all data with the demo roster
    Seed,
    /// Enroll a student in a course
    Enroll {
        student_id: u32,
        course: String,
        /// Semester number (1-6) or name
        #[arg(long, default_value = "1")]
        semester: Semester,
        /// Create the enrollment as PENDING
        #[arg(long)]
        pending: bool,
    },
    /// Grade an enrollment, e.g. `grade 100 Databases A_PLUS`
    Grade {
        student_id: u32,
        course: String,
        grade: GradeType,
    },
    /// Move an enrollment to another status
    Status {
        student_id: u32,
        course: String,
        status: EnrollmentStatus,
    },
    /// Write a snapshot of all data
    Backup,
    /// Replace all data with the snapshot and rewrite the JSON files
    Restore,
    /// Delete all data and the JSON files
    Reset,
    /// Print all data as JSON
    Dump,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_file_defaults_to_the_data_dir() {
        let config = Config::parse_from(["records", "--data-dir", "school", "summary"]);
        assert_eq!(config.backup_file(), PathBuf::from("school/backup.bin"));

        let config = Config::parse_from(["records", "--backup-file", "snap.bin", "backup"]);
        assert_eq!(config.backup_file(), PathBuf::from("snap.bin"));
    }

    #[test]
    fn enums_parse_from_their_names() {
        let config = Config::parse_from([
            "records", "enroll", "100", "Databases", "--semester", "THIRD", "--verbose",
        ]);

        assert!(config.verbose);
        match config.command {
            Command::Enroll {
                student_id,
                semester,
                pending,
                ..
            } => {
                assert_eq!(student_id, 100);
                assert_eq!(semester, Semester::Third);
                assert!(!pending);
            }
            other => panic!("unexpected command {:?}", other),
        }

        let config = Config::parse_from(["records", "grade", "100", "Databases", "A_PLUS"]);
        assert!(matches!(
            config.command,
            Command::Grade {
                grade: GradeType::APlus,
                ..
            }
        ));
    }
}
