//! Queries and aggregates over enrollments, students and courses.
//!
//! Every function works on borrowed slices and computes its result on demand;
//! nothing here keeps running totals.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::models::{Course, Enrollment, EnrollmentStatus, GradeType, Semester, Student};

pub fn enrollments_of_student(enrollments: &[Enrollment], student_id: u32) -> Vec<&Enrollment> {
    enrollments
        .iter()
        .filter(|e| e.student_id() == student_id)
        .collect()
}

pub fn enrollments_in_course<'a>(
    enrollments: &'a [Enrollment],
    course_name: &str,
) -> Vec<&'a Enrollment> {
    enrollments
        .iter()
        .filter(|e| e.course_name() == course_name)
        .collect()
}

pub fn enrollments_in_semester(enrollments: &[Enrollment], semester: Semester) -> Vec<&Enrollment> {
    enrollments
        .iter()
        .filter(|e| e.semester() == semester)
        .collect()
}

/// ACTIVE and PENDING enrollments.
pub fn active_enrollments(enrollments: &[Enrollment]) -> Vec<&Enrollment> {
    enrollments.iter().filter(|e| e.is_active()).collect()
}

pub fn passed_enrollments(enrollments: &[Enrollment]) -> Vec<&Enrollment> {
    enrollments.iter().filter(|e| e.is_passed()).collect()
}

pub fn group_by_semester(enrollments: &[Enrollment]) -> BTreeMap<Semester, Vec<&Enrollment>> {
    let mut groups: BTreeMap<Semester, Vec<&Enrollment>> = BTreeMap::new();
    for e in enrollments {
        groups.entry(e.semester()).or_default().push(e);
    }
    groups
}

pub fn group_by_status(enrollments: &[Enrollment]) -> HashMap<EnrollmentStatus, Vec<&Enrollment>> {
    let mut groups: HashMap<EnrollmentStatus, Vec<&Enrollment>> = HashMap::new();
    for e in enrollments {
        groups.entry(e.status()).or_default().push(e);
    }
    groups
}

pub fn group_by_course(enrollments: &[Enrollment]) -> BTreeMap<&str, Vec<&Enrollment>> {
    let mut groups: BTreeMap<&str, Vec<&Enrollment>> = BTreeMap::new();
    for e in enrollments {
        groups.entry(e.course_name()).or_default().push(e);
    }
    groups
}

pub fn count_by_status(enrollments: &[Enrollment], status: EnrollmentStatus) -> usize {
    enrollments.iter().filter(|e| e.status() == status).count()
}

/// Percentage of enrollments that are COMPLETED, 0.0 for none.
pub fn completion_rate(enrollments: &[Enrollment]) -> f64 {
    if enrollments.is_empty() {
        return 0.0;
    }

    let completed = count_by_status(enrollments, EnrollmentStatus::Completed);
    completed as f64 * 100.0 / enrollments.len() as f64
}

/// Passed enrollment with the highest grade point.
pub fn top_enrollment(enrollments: &[Enrollment]) -> Option<&Enrollment> {
    enrollments
        .iter()
        .filter(|e| e.is_passed())
        .max_by(|a, b| a.grade().grade_point().total_cmp(&b.grade().grade_point()))
}

pub fn grade_distribution(enrollments: &[Enrollment]) -> HashMap<GradeType, usize> {
    let mut distribution = HashMap::new();
    for e in enrollments {
        *distribution.entry(e.grade()).or_insert(0) += 1;
    }
    distribution
}

fn graded_gpas(students: &[Student]) -> Vec<f64> {
    students
        .iter()
        .map(Student::calculate_gpa)
        .filter(|gpa| *gpa > 0.0)
        .collect()
}

/// Mean GPA of the students that have one.
pub fn average_gpa(students: &[Student]) -> f64 {
    let gpas = graded_gpas(students);
    if gpas.is_empty() {
        return 0.0;
    }

    gpas.iter().sum::<f64>() / gpas.len() as f64
}

pub fn median_gpa(students: &[Student]) -> f64 {
    let mut gpas = graded_gpas(students);
    if gpas.is_empty() {
        return 0.0;
    }

    gpas.sort_by(f64::total_cmp);
    let middle = gpas.len() / 2;

    if gpas.len() % 2 == 0 {
        (gpas[middle - 1] + gpas[middle]) / 2.0
    } else {
        gpas[middle]
    }
}

/// Students with a GPA of at least `min_gpa`, best first.
pub fn honor_students(students: &[Student], min_gpa: f64) -> Vec<&Student> {
    let mut honors: Vec<&Student> = students
        .iter()
        .filter(|s| s.calculate_gpa() >= min_gpa)
        .collect();
    honors.sort_by(|a, b| b.calculate_gpa().total_cmp(&a.calculate_gpa()));
    honors
}

/// Graded students below `max_gpa`, weakest first.
pub fn at_risk_students(students: &[Student], max_gpa: f64) -> Vec<&Student> {
    let mut at_risk: Vec<&Student> = students
        .iter()
        .filter(|s| {
            let gpa = s.calculate_gpa();
            gpa > 0.0 && gpa < max_gpa
        })
        .collect();
    at_risk.sort_by(|a, b| a.calculate_gpa().total_cmp(&b.calculate_gpa()));
    at_risk
}

pub fn top_student(students: &[Student]) -> Option<&Student> {
    students
        .iter()
        .max_by(|a, b| a.calculate_gpa().total_cmp(&b.calculate_gpa()))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GpaRange {
    Excellent,
    VeryGood,
    Good,
    Satisfactory,
    Poor,
    NotGraded,
}

impl GpaRange {
    pub fn from_gpa(gpa: f64) -> Self {
        if gpa >= 4.5 {
            GpaRange::Excellent
        } else if gpa >= 3.5 {
            GpaRange::VeryGood
        } else if gpa >= 2.5 {
            GpaRange::Good
        } else if gpa >= 2.0 {
            GpaRange::Satisfactory
        } else if gpa > 0.0 {
            GpaRange::Poor
        } else {
            GpaRange::NotGraded
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GpaRange::Excellent => "Excellent (4.5-5.0)",
            GpaRange::VeryGood => "Very Good (3.5-4.4)",
            GpaRange::Good => "Good (2.5-3.4)",
            GpaRange::Satisfactory => "Satisfactory (2.0-2.4)",
            GpaRange::Poor => "Poor (<2.0)",
            GpaRange::NotGraded => "Not Graded",
        }
    }
}

impl fmt::Display for GpaRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn group_by_gpa_range(students: &[Student]) -> BTreeMap<GpaRange, Vec<&Student>> {
    let mut groups: BTreeMap<GpaRange, Vec<&Student>> = BTreeMap::new();
    for s in students {
        groups
            .entry(GpaRange::from_gpa(s.calculate_gpa()))
            .or_default()
            .push(s);
    }
    groups
}

pub fn total_ects(courses: &[Course]) -> u32 {
    courses.iter().map(Course::ects).sum()
}

/// Sum of every student's course capacity.
pub fn total_max_courses(students: &[Student]) -> u32 {
    students.iter().map(Student::max_courses).sum()
}
