//! Data models for attendance tracking.
//!
//! - `Subject`: one tracked course with attended/total counters
//! - Derived statistics: `percentage`, `classes_needed`, `is_eligible`,
//!   `average_attendance`

pub mod subject;

pub use subject::{
    average_attendance, classes_needed, is_eligible, percentage, Subject,
    ELIGIBILITY_THRESHOLD, MAX_SUBJECTS,
};
