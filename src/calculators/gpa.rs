//! Grade point average on a 4.0 scale

use serde::{Deserialize, Serialize};

/// Letter grades and their points
pub const GRADE_POINTS: [(&str, f64); 10] = [
    ("A", 4.0),
    ("A-", 3.7),
    ("B+", 3.3),
    ("B", 3.0),
    ("B-", 2.7),
    ("C+", 2.3),
    ("C", 2.0),
    ("C-", 1.7),
    ("D", 1.0),
    ("F", 0.0),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(default)]
    pub name: String,
    pub credits: f64,
    pub grade: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpaResult {
    /// Rounded to two decimals
    pub gpa: f64,
    pub total_quality_points: f64,
    pub total_credits: f64,
    pub course_count: usize,
}

/// Points for a grade, case-insensitive; unknown grades score zero
pub fn grade_points(grade: &str) -> f64 {
    let grade = grade.trim().to_ascii_uppercase();
    GRADE_POINTS
        .iter()
        .find(|(g, _)| *g == grade)
        .map(|(_, p)| *p)
        .unwrap_or(0.0)
}

pub fn available_grades() -> impl Iterator<Item = &'static str> {
    GRADE_POINTS.iter().map(|(g, _)| *g)
}

/// Courses without a grade or with non-positive credits are ignored
pub fn calculate_gpa(courses: &[Course]) -> GpaResult {
    let valid: Vec<&Course> = courses
        .iter()
        .filter(|c| !c.grade.trim().is_empty() && c.credits > 0.0)
        .collect();

    let total_quality_points: f64 = valid.iter().map(|c| grade_points(&c.grade) * c.credits).sum();
    let total_credits: f64 = valid.iter().map(|c| c.credits).sum();
    let gpa = if total_credits > 0.0 { total_quality_points / total_credits } else { 0.0 };

    GpaResult {
        gpa: (gpa * 100.0).round() / 100.0,
        total_quality_points,
        total_credits,
        course_count: valid.len(),
    }
}
