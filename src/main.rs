use clap::Parser;
use fern::colors::{Color, ColoredLevelConfig};
use log::{debug, error, info, warn};

mod cli;

use cli::{Command, Config};
use db::models::{GradeType, Person, Role};
use db::{seed::seed_db, stats, Database, JSONDatabase};

type BoxError = Box<dyn std::error::Error>;

fn main() {
    let config = Config::parse();
    setup_logging(config.verbose);
    debug!("{:?}", config);

    if let Err(e) = run(&config) {
        error!("{}", e);

        let mut source = e.source();
        while let Some(cause) = source {
            error!("  caused by: {}", cause);
            source = cause.source();
        }

        // A data file that exists but cannot be read is the one fatal case.
        let code = match e.downcast_ref::<db::Error>() {
            Some(db::Error::DataLoad { .. }) => 2,
            _ => 1,
        };
        std::process::exit(code);
    }
}

fn run(config: &Config) -> Result<(), BoxError> {
    // These commands replace everything, so they work even on unreadable data.
    let mut db = match config.command {
        Command::Seed | Command::Reset | Command::Restore => {
            JSONDatabase::new_empty(&config.data_dir)
        }
        _ => JSONDatabase::open(&config.data_dir)?,
    };

    match &config.command {
        Command::Summary => summary(&db),
        Command::Seed => {
            seed_db(&mut db)?;
            db.save().check()?;
        }
        Command::Enroll {
            student_id,
            course,
            semester,
            pending,
        } => {
            let enrollment = if *pending {
                db.enrollment_add_pending(*student_id, course, *semester)?
            } else {
                db.enrollment_add(*student_id, course, *semester)?
            };
            info!(
                "Enrollment is {} for semester {}",
                enrollment.status().name(),
                enrollment.semester().number()
            );
            db.save().check()?;
        }
        Command::Grade {
            student_id,
            course,
            grade,
        } => {
            db.enrollment_grade(*student_id, course, *grade)?;
            let gpa = db
                .student_get(*student_id)
                .map(|s| s.calculate_gpa())
                .unwrap_or_default();
            info!("GPA of student {} is now {:.2}", student_id, gpa);
            db.save().check()?;
        }
        Command::Status {
            student_id,
            course,
            status,
        } => {
            db.enrollment_set_status(*student_id, course, *status)?;
            db.save().check()?;
        }
        Command::Backup => {
            db.backup(&config.backup_file())?;
        }
        Command::Restore => {
            db.restore(&config.backup_file())?;
        }
        Command::Reset => db.reset(),
        Command::Dump => println!("{}", db.dump_as_json()?),
    }

    Ok(())
}

fn summary(db: &JSONDatabase) {
    let records = db.records();

    if records.is_empty() {
        warn!("No data in {}", db.data_dir().display());
        return;
    }

    info!("{}", records.counts());
    for role in [Role::Professor, Role::Student].iter() {
        let count = records.members().filter(|m| m.role() == *role).count();
        info!("  {}s: {}", role.display_name(), count);
    }

    let (total, professors) = db.professor_list(1, None);
    for professor in professors {
        debug!(
            "  {} teaches {} of {} courses",
            professor.full_name(),
            professor.course_count(),
            professor.max_courses()
        );
    }
    if total > db::PAGE_SIZE {
        debug!("  ... and {} more professors", total - db::PAGE_SIZE);
    }

    for course in &records.courses {
        let kinds: Vec<&str> = course
            .lessons()
            .iter()
            .map(|l| l.kind().display_name())
            .collect();
        debug!(
            "  {}: {} minutes of lessons ({})",
            course.name(),
            course.total_lesson_minutes(),
            kinds.join(", ")
        );
    }

    info!(
        "Average GPA {:.2}, median GPA {:.2}",
        stats::average_gpa(&records.students),
        stats::median_gpa(&records.students)
    );
    info!(
        "Completion rate {:.1}%, {} active enrollments",
        stats::completion_rate(&records.enrollments),
        stats::active_enrollments(&records.enrollments).len()
    );
    info!(
        "Total ECTS offered {}, total student capacity {}",
        stats::total_ects(&records.courses),
        stats::total_max_courses(&records.students)
    );

    if let Some(top) = stats::top_student(&records.students) {
        info!(
            "Top student: {} ({:.2})",
            top.full_name(),
            top.calculate_gpa()
        );
    }

    for (range, students) in stats::group_by_gpa_range(&records.students) {
        info!("  {}: {}", range, students.len());
    }

    for (semester, enrollments) in stats::group_by_semester(&records.enrollments) {
        debug!("  semester {}: {} enrollments", semester.number(), enrollments.len());
    }

    let distribution = stats::grade_distribution(&records.enrollments);
    for grade in GradeType::ALL.iter() {
        if let Some(count) = distribution.get(grade) {
            debug!("  {}: {}", grade, count);
        }
    }
}

fn setup_logging(verbose: bool) {
    let colors = ColoredLevelConfig::new().debug(Color::Magenta);
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let result = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{}{} {}",
                colors.color(record.level()),
                chrono::Local::now().format("[%H:%M:%S]"),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout())
        .apply();

    if let Err(e) = result {
        eprintln!("Could not apply logging configuration: {}", e);
    }
}
