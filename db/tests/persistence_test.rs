use db::models::{EnrollmentStatus, GradeType, Person, Semester};
use db::seed::seed_db;
use db::{Database, Error, JSONDatabase, LoadCause, NewStudent, Records};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_json(dir: &Path, file: &str, value: Value) {
    fs::write(dir.join(file), serde_json::to_string_pretty(&value).unwrap()).unwrap();
}

fn read_json(dir: &Path, file: &str) -> Value {
    serde_json::from_str(&fs::read_to_string(dir.join(file)).unwrap()).unwrap()
}

fn professor(id: u32, last_name: &str, teaching: &[&str]) -> Value {
    json!({
        "id": id,
        "firstName": "Ivan",
        "lastName": last_name,
        "username": format!("i{}", last_name.to_lowercase()),
        "password": "secret",
        "email": "",
        "maxCourses": 3,
        "teachingCourses": teaching,
    })
}

fn student(id: u32, enrolled: &[&str], grades: Value) -> Value {
    json!({
        "id": id,
        "firstName": "Ana",
        "lastName": format!("Student{}", id),
        "username": format!("astudent{}", id),
        "password": "secret",
        "email": "",
        "maxCourses": 3,
        "enrolledCourses": enrolled,
        "courseGrades": grades,
    })
}

fn course(name: &str, professor_id: u32) -> Value {
    json!({
        "name": name,
        "professorId": professor_id,
        "maxLessons": 4,
        "ects": 6,
        "level": "BEGINNER",
        "lessonNames": [],
    })
}

fn enrollment(student_id: u32, course_name: &str, status: &str, grade: &str) -> Value {
    json!({
        "studentId": student_id,
        "courseName": course_name,
        "semester": "FIRST",
        "status": status,
        "grade": grade,
        "enrollmentDate": "2025-02-03T10:15:30.123",
        "completionDate": null,
    })
}

fn data_load_file(result: Result<JSONDatabase, Error>) -> (String, LoadCause) {
    match result {
        Err(Error::DataLoad { file, source }) => (file, source),
        Err(other) => panic!("expected a data load error, got {:?}", other),
        Ok(_) => panic!("expected a data load error, got a database"),
    }
}

#[test]
fn test_seeded_records_survive_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let mut db = JSONDatabase::new_empty(temp_dir.path());
    seed_db(&mut db).unwrap();

    let report = db.save();
    assert!(report.is_complete());
    assert_eq!(report.saved.len(), 5);

    let reloaded = JSONDatabase::open(temp_dir.path()).unwrap();
    assert_eq!(reloaded.records(), db.records());
    assert_eq!(reloaded.records().counts(), db.records().counts());

    for course in &db.records().courses {
        let loaded = reloaded.course_get(course.name()).unwrap();
        assert_eq!(loaded.lessons(), course.lessons());
        assert_eq!(loaded.max_lessons(), course.max_lessons());

        let mut expected = course.enrolled_students().to_vec();
        let mut actual = loaded.enrolled_students().to_vec();
        expected.sort_unstable();
        actual.sort_unstable();
        assert_eq!(actual, expected);
    }
}

#[test]
fn test_saved_files_use_flat_camel_case_records() {
    let temp_dir = TempDir::new().unwrap();
    let mut db = JSONDatabase::new_empty(temp_dir.path());
    seed_db(&mut db).unwrap();
    db.save();

    let courses = read_json(temp_dir.path(), db::COURSES_FILE);
    let first = &courses[0];
    assert_eq!(first["name"], "Programming Basics");
    assert_eq!(first["professorId"], 10);
    assert_eq!(first["maxLessons"], 6);
    assert_eq!(first["level"], "BEGINNER");

    let lessons = read_json(temp_dir.path(), db::LESSONS_FILE);
    assert_eq!(lessons[0]["courseName"], "Programming Basics");
    assert_eq!(lessons[0]["type"], "LECTURE");
    assert_eq!(lessons[0]["scheduledDate"], "2025-10-06");
    assert_eq!(lessons[0]["scheduledTime"], "09:15");

    let students = read_json(temp_dir.path(), db::STUDENTS_FILE);
    assert_eq!(students[0]["courseGrades"]["Programming Basics"], "A_PLUS");
    assert_eq!(students[0]["enrolledCourses"][2], "Compilers");

    let enrollments = read_json(temp_dir.path(), db::ENROLLMENTS_FILE);
    assert_eq!(enrollments[0]["studentId"], 100);
    assert_eq!(enrollments[0]["status"], "COMPLETED");
    assert!(enrollments[0]["completionDate"].is_string());
    assert!(enrollments[2]["completionDate"].is_null());

    let leftovers: Vec<_> = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .filter(|name| name.to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_missing_directory_loads_empty() {
    let temp_dir = TempDir::new().unwrap();
    let db = JSONDatabase::open(temp_dir.path().join("nothing-here")).unwrap();

    assert!(db.records().is_empty());
}

#[test]
fn test_null_and_empty_files_load_empty() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(db::STUDENTS_FILE), "null").unwrap();
    fs::write(temp_dir.path().join(db::PROFESSORS_FILE), "").unwrap();

    let db = JSONDatabase::open(temp_dir.path()).unwrap();
    assert!(db.records().is_empty());
}

#[test]
fn test_dangling_references_are_dropped() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    write_json(
        dir,
        db::PROFESSORS_FILE,
        json!([professor(10, "Horvat", &["Algebra"])]),
    );
    write_json(
        dir,
        db::COURSES_FILE,
        json!([course("Algebra", 10), course("Orphaned", 99)]),
    );
    write_json(
        dir,
        db::LESSONS_FILE,
        json!([
            {"name": "Intro", "courseName": "Algebra", "lengthMinutes": 90, "type": "LECTURE",
             "scheduledDate": "2025-03-01", "scheduledTime": "08:30"},
            {"name": "Lost", "courseName": "Orphaned", "lengthMinutes": 45, "type": "LAB",
             "scheduledDate": null, "scheduledTime": null},
            {"name": "Half", "courseName": "Algebra", "lengthMinutes": 45, "type": "QUIZ",
             "scheduledDate": "2025-03-02", "scheduledTime": null},
        ]),
    );
    write_json(
        dir,
        db::STUDENTS_FILE,
        json!([student(100, &["Algebra"], json!({"Algebra": "B"}))]),
    );
    write_json(
        dir,
        db::ENROLLMENTS_FILE,
        json!([
            enrollment(100, "Algebra", "COMPLETED", "B"),
            enrollment(100, "Orphaned", "ACTIVE", "NOT_GRADED"),
            enrollment(555, "Algebra", "ACTIVE", "NOT_GRADED"),
        ]),
    );

    let db = JSONDatabase::open(dir).unwrap();
    let records = db.records();

    assert_eq!(records.courses.len(), 1);
    assert_eq!(records.enrollments.len(), 1);

    let algebra = db.course_get("Algebra").unwrap();
    assert_eq!(algebra.enrolled_students(), &[100]);
    assert_eq!(algebra.lessons().len(), 2);
    assert!(algebra.lessons()[0].start_time().is_some());
    assert!(algebra.lessons()[1].start_time().is_none());

    let enrollment = db.enrollment_get(100, "Algebra").unwrap();
    assert_eq!(enrollment.status(), EnrollmentStatus::Completed);
    assert_eq!(enrollment.grade(), GradeType::B);
    assert_eq!(db.student_get(100).unwrap().grade("Algebra"), GradeType::B);
}

#[test]
fn test_malformed_json_names_the_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(db::STUDENTS_FILE), "[{\"id\": 1,").unwrap();

    let (file, cause) = data_load_file(JSONDatabase::open(temp_dir.path()));

    assert_eq!(file, db::STUDENTS_FILE);
    assert!(matches!(cause, LoadCause::Json(_)));
}

#[test]
fn test_unknown_enum_value_rejects_the_file() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    write_json(dir, db::PROFESSORS_FILE, json!([professor(10, "Horvat", &["Algebra"])]));
    write_json(dir, db::COURSES_FILE, json!([course("Algebra", 10)]));
    write_json(dir, db::STUDENTS_FILE, json!([student(100, &["Algebra"], json!({}))]));
    write_json(
        dir,
        db::ENROLLMENTS_FILE,
        json!([enrollment(100, "Algebra", "ARCHIVED", "NOT_GRADED")]),
    );

    let (file, _) = data_load_file(JSONDatabase::open(dir));
    assert_eq!(file, db::ENROLLMENTS_FILE);
}

#[test]
fn test_invalid_limits_and_timestamps_reject_the_file() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    let mut bad = student(100, &[], json!({}));
    bad["maxCourses"] = json!(0);
    write_json(dir, db::STUDENTS_FILE, json!([bad]));

    let (file, cause) = data_load_file(JSONDatabase::open(dir));
    assert_eq!(file, db::STUDENTS_FILE);
    assert!(matches!(cause, LoadCause::Record(_)));

    write_json(dir, db::STUDENTS_FILE, json!([student(100, &["Algebra"], json!({}))]));
    write_json(dir, db::PROFESSORS_FILE, json!([professor(10, "Horvat", &["Algebra"])]));
    write_json(dir, db::COURSES_FILE, json!([course("Algebra", 10)]));
    let mut late = enrollment(100, "Algebra", "ACTIVE", "NOT_GRADED");
    late["enrollmentDate"] = json!("yesterday");
    write_json(dir, db::ENROLLMENTS_FILE, json!([late]));

    let (file, cause) = data_load_file(JSONDatabase::open(dir));
    assert_eq!(file, db::ENROLLMENTS_FILE);
    assert!(matches!(cause, LoadCause::Timestamp { .. }));
}

#[test]
fn test_enrollments_must_agree_with_their_student() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    write_json(dir, db::PROFESSORS_FILE, json!([professor(10, "Horvat", &["Algebra", "Logic"])]));
    write_json(dir, db::COURSES_FILE, json!([course("Algebra", 10), course("Logic", 10)]));
    write_json(
        dir,
        db::STUDENTS_FILE,
        json!([student(100, &["Algebra"], json!({"Algebra": "B"}))]),
    );

    write_json(
        dir,
        db::ENROLLMENTS_FILE,
        json!([enrollment(100, "Algebra", "COMPLETED", "A_PLUS")]),
    );
    let (file, cause) = data_load_file(JSONDatabase::open(dir));
    assert_eq!(file, db::ENROLLMENTS_FILE);
    assert!(matches!(cause, LoadCause::Record(_)));

    write_json(
        dir,
        db::ENROLLMENTS_FILE,
        json!([enrollment(100, "Logic", "ACTIVE", "NOT_GRADED")]),
    );
    let (file, _) = data_load_file(JSONDatabase::open(dir));
    assert_eq!(file, db::ENROLLMENTS_FILE);

    write_json(
        dir,
        db::ENROLLMENTS_FILE,
        json!([enrollment(100, "Algebra", "COMPLETED", "B")]),
    );
    let db = JSONDatabase::open(dir).unwrap();
    assert_eq!(db.enrollment_get(100, "Algebra").unwrap().grade(), GradeType::B);
}

#[test]
fn test_duplicate_course_names_reject_the_file() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    write_json(dir, db::PROFESSORS_FILE, json!([professor(10, "Horvat", &[])]));
    write_json(
        dir,
        db::COURSES_FILE,
        json!([course("Algebra", 10), course("Algebra", 10)]),
    );

    let (file, _) = data_load_file(JSONDatabase::open(dir));
    assert_eq!(file, db::COURSES_FILE);
}

#[test]
fn test_capacity_of_two_rejects_a_third_enrollment() {
    let temp_dir = TempDir::new().unwrap();
    let mut db = JSONDatabase::new_empty(temp_dir.path());
    seed_db(&mut db).unwrap();

    db.student_add(NewStudent {
        id: 200,
        first_name: "Sara".to_string(),
        last_name: "Vuković".to_string(),
        username: "svukovic".to_string(),
        password: "200456".to_string(),
        email: String::new(),
        max_courses: 2,
    })
    .unwrap();

    db.enrollment_add(200, "Programming Basics", Semester::First).unwrap();
    db.enrollment_add(200, "Databases", Semester::First).unwrap();
    let third = db.enrollment_add(200, "Compilers", Semester::First);

    assert!(matches!(third, Err(Error::LimitExceeded(_))));
    let sara = db.student_get(200).unwrap();
    assert_eq!(
        sara.enrolled_courses().iter().collect::<Vec<_>>(),
        vec!["Programming Basics", "Databases"]
    );
    assert!(db.enrollment_get(200, "Compilers").is_none());
    assert!(!db
        .course_get("Compilers")
        .unwrap()
        .enrolled_students()
        .contains(&200));
}

#[test]
fn test_grading_keeps_map_and_enrollment_in_step() {
    let temp_dir = TempDir::new().unwrap();
    let mut db = JSONDatabase::new_empty(temp_dir.path());
    seed_db(&mut db).unwrap();

    let graded = db
        .enrollment_grade(104, "Data Structures", GradeType::F)
        .unwrap();
    assert_eq!(graded.status(), EnrollmentStatus::Failed);
    assert!(graded.completion_date().is_some());
    assert_eq!(db.student_get(104).unwrap().grade("Data Structures"), GradeType::F);

    db.save();
    let reloaded = JSONDatabase::open(temp_dir.path()).unwrap();
    assert_eq!(
        reloaded.enrollment_get(104, "Data Structures"),
        db.enrollment_get(104, "Data Structures")
    );
    assert_eq!(
        reloaded.student_get(104).unwrap().grade("Data Structures"),
        GradeType::F
    );

    let missing = db.enrollment_grade(104, "Compilers", GradeType::A);
    assert!(matches!(missing, Err(Error::NotFound(_))));
}

#[test]
fn test_search_and_find() {
    let temp_dir = TempDir::new().unwrap();
    let mut db = JSONDatabase::new_empty(temp_dir.path());
    seed_db(&mut db).unwrap();

    let (total, students) = db.student_list(1, Some("LUC"));
    assert_eq!(total, 1);
    assert_eq!(students[0].first_name(), "Lucija");

    let found = db.professor_find("maric").unwrap();
    assert_eq!(found[0].id(), 10);
    assert!(matches!(db.student_find("Nobody"), Err(Error::NotFound(_))));
    assert!(matches!(db.course_find("Alchemy"), Err(Error::NotFound(_))));

    let (total, _) = db.course_list(1, None);
    assert_eq!(total, 5);

    let (total, professors) = db.professor_list(1, Some("nov"));
    assert_eq!(total, 1);
    assert_eq!(professors[0].last_name(), "Novak");
    let (total, professors) = db.professor_list(0, None);
    assert_eq!((total, professors.len()), (3, 3));

    let (total, members) = db.user_list(1, Some("ic"), |m| m.role() == db::models::Role::Student);
    assert!(total > 0);
    assert!(members
        .iter()
        .all(|m| m.role() == db::models::Role::Student));
}

#[test]
fn test_duplicate_members_are_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let mut db = JSONDatabase::new_empty(temp_dir.path());
    seed_db(&mut db).unwrap();

    let clash = db.student_add(NewStudent {
        id: 300,
        first_name: "Ana".to_string(),
        last_name: "Horvat".to_string(),
        username: "ahorvat".to_string(),
        password: "x".to_string(),
        email: String::new(),
        max_courses: 2,
    });

    assert!(matches!(clash, Err(Error::Duplicate(_))));
    assert_eq!(db.records().students.len(), 5);
}

#[test]
fn test_reset_clears_memory_and_files() {
    let temp_dir = TempDir::new().unwrap();
    let mut db = JSONDatabase::new_empty(temp_dir.path());
    seed_db(&mut db).unwrap();
    db.save();
    assert!(temp_dir.path().join(db::STUDENTS_FILE).exists());

    db.reset();

    assert_eq!(db.records(), &Records::default());
    for file in db::save::DATA_FILES.iter() {
        assert!(!temp_dir.path().join(file).exists(), "{} still exists", file);
    }
}

#[test]
fn test_dump_lists_every_collection() {
    let temp_dir = TempDir::new().unwrap();
    let mut db = JSONDatabase::new_empty(temp_dir.path());
    seed_db(&mut db).unwrap();

    let dump: Value = serde_json::from_str(&db.dump_as_json().unwrap()).unwrap();

    assert_eq!(dump["professors"].as_array().unwrap().len(), 3);
    assert_eq!(dump["students"].as_array().unwrap().len(), 5);
    assert_eq!(dump["courses"].as_array().unwrap().len(), 5);
    assert_eq!(dump["enrollments"].as_array().unwrap().len(), 10);
}
