//! The subject collection and its mutating operations.
//!
//! The `Tracker` owns the ordered list of subjects. Mutations validate
//! first and then return the side effects the caller must carry out, so the
//! computation stays decoupled from persistence and rendering. Identity is
//! positional: deleting a subject shifts later indices down.

use thiserror::Error;

use crate::models::{average_attendance, Subject, MAX_SUBJECTS};

/// Validation errors for tracker mutations.
///
/// Each of these aborts the attempted mutation with no state change and is
/// reported to the user synchronously.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttendanceError {
    #[error("Please enter a subject name")]
    EmptyName,

    #[error("Maximum {MAX_SUBJECTS} subjects allowed")]
    CapacityExceeded,

    #[error("No subject at position {index}")]
    IndexOutOfRange { index: usize },
}

/// Side effects a successful mutation requires of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Re-serialize the whole collection to the persistence store.
    Persist,
    /// Recompute derived statistics and redraw.
    Rerender,
}

/// Ordered collection of tracked subjects, bounded at `MAX_SUBJECTS`.
#[derive(Debug, Default, Clone)]
pub struct Tracker {
    subjects: Vec<Subject>,
}

impl Tracker {
    pub fn new(subjects: Vec<Subject>) -> Self {
        Self { subjects }
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.subjects.len() >= MAX_SUBJECTS
    }

    pub fn get(&self, index: usize) -> Option<&Subject> {
        self.subjects.get(index)
    }

    /// Rounded mean of per-subject percentages.
    pub fn average_attendance(&self) -> u32 {
        average_attendance(&self.subjects)
    }

    /// Append a new subject with zeroed counters.
    ///
    /// The name is trimmed before validation; an all-whitespace name counts
    /// as empty.
    pub fn add_subject(&mut self, name: &str) -> Result<Vec<Effect>, AttendanceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AttendanceError::EmptyName);
        }
        if self.is_full() {
            return Err(AttendanceError::CapacityExceeded);
        }
        self.subjects.push(Subject::new(name));
        Ok(vec![Effect::Persist, Effect::Rerender])
    }

    /// Record one held class: total always advances, attended only when
    /// the student was present.
    pub fn mark_attendance(
        &mut self,
        index: usize,
        present: bool,
    ) -> Result<Vec<Effect>, AttendanceError> {
        let subject = self
            .subjects
            .get_mut(index)
            .ok_or(AttendanceError::IndexOutOfRange { index })?;
        subject.total += 1;
        if present {
            subject.attended += 1;
        }
        Ok(vec![Effect::Persist, Effect::Rerender])
    }

    /// Remove the subject at `index`, shifting later subjects down.
    ///
    /// The caller is responsible for obtaining user confirmation before
    /// invoking this.
    pub fn delete_subject(&mut self, index: usize) -> Result<Vec<Effect>, AttendanceError> {
        if index >= self.subjects.len() {
            return Err(AttendanceError::IndexOutOfRange { index });
        }
        self.subjects.remove(index);
        Ok(vec![Effect::Persist, Effect::Rerender])
    }
}
