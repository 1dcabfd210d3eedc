//! Subject records and derived attendance statistics.
//!
//! A `Subject` is one tracked course. All statistics are pure functions of
//! the attended/total counters; nothing here touches storage or the UI.

use serde::{Deserialize, Serialize};

/// Maximum number of subjects that can be tracked at once.
pub const MAX_SUBJECTS: usize = 7;

/// Attendance percentage required to stay eligible for exams.
pub const ELIGIBILITY_THRESHOLD: u32 = 75;

/// One tracked course with attendance counters.
///
/// Field names match the persisted JSON format, so a data file written by
/// an earlier version of the tracker loads unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    pub attended: u32,
    pub total: u32,
}

impl Subject {
    /// Create a new subject with zeroed counters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attended: 0,
            total: 0,
        }
    }

    /// Attendance percentage for this subject, 0..=100.
    pub fn percentage(&self) -> u32 {
        percentage(self.attended, self.total)
    }

    /// Whether this subject meets the eligibility threshold.
    pub fn is_eligible(&self) -> bool {
        is_eligible(self.attended, self.total)
    }

    /// Consecutive future classes that must be attended to recover eligibility.
    pub fn classes_needed(&self) -> u32 {
        classes_needed(self.attended, self.total)
    }
}

/// Attendance percentage, rounded half-up. 0 when no classes have been held.
pub fn percentage(attended: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    ((attended as f64 / total as f64) * 100.0).round() as u32
}

/// Whether the rounded percentage meets the eligibility threshold.
pub fn is_eligible(attended: u32, total: u32) -> bool {
    percentage(attended, total) >= ELIGIBILITY_THRESHOLD
}

/// Number of additional consecutive "present" classes needed so that
/// (attended + x) / (total + x) >= 0.75.
///
/// The closed form ceil((0.75*total - attended) / 0.25) is exact in
/// integers as 3*total - 4*attended; results at or below zero mean the
/// threshold is already met. With no classes held yet the first class must
/// be attended, so the bootstrap answer is 1.
pub fn classes_needed(attended: u32, total: u32) -> u32 {
    if total == 0 {
        return 1;
    }
    let deficit = 3 * total as i64 - 4 * attended as i64;
    deficit.max(0) as u32
}

/// Rounded mean of per-subject percentages. 0 for an empty collection.
pub fn average_attendance(subjects: &[Subject]) -> u32 {
    if subjects.is_empty() {
        return 0;
    }
    let sum: u32 = subjects.iter().map(Subject::percentage).sum();
    (sum as f64 / subjects.len() as f64).round() as u32
}
