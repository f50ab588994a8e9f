//! Ledger consistency checks over a store snapshot.

use std::collections::{HashMap, HashSet};

use crate::domain::{Course, CourseId, Enrollment, StudentId};

/// A broken ledger invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsistencyViolation {
    /// The stored live count differs from the number of `Enrolled` entries.
    #[error("course {course_id} records {recorded} seats taken but holds {counted} enrolled entries")]
    LiveCountMismatch {
        course_id: CourseId,
        recorded: u32,
        counted: u32,
    },
    /// The live count exceeds the capacity.
    #[error("course {course_id} has {live_count} students enrolled over a capacity of {capacity}")]
    OverCapacity {
        course_id: CourseId,
        live_count: u32,
        capacity: u32,
    },
    /// More than one entry exists for a (student, course) pair.
    #[error("student {student_id} has more than one entry for course {course_id}")]
    DuplicatePair {
        student_id: StudentId,
        course_id: CourseId,
    },
    /// An entry references a course that no longer exists.
    #[error("enrollment references missing course {course_id}")]
    OrphanedEntry { course_id: CourseId },
    /// The store's lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}

pub(super) fn check(
    courses: &HashMap<CourseId, Course>,
    enrollments: &[Enrollment],
) -> Vec<ConsistencyViolation> {
    let mut violations = Vec::new();
    let mut seats: HashMap<CourseId, u32> = HashMap::new();
    let mut pairs = HashSet::new();

    for entry in enrollments {
        if !pairs.insert((entry.student_id, entry.course_id)) {
            violations.push(ConsistencyViolation::DuplicatePair {
                student_id: entry.student_id,
                course_id: entry.course_id,
            });
        }
        if !courses.contains_key(&entry.course_id) {
            violations.push(ConsistencyViolation::OrphanedEntry {
                course_id: entry.course_id,
            });
        }
        if entry.holds_seat() {
            *seats.entry(entry.course_id).or_default() += 1;
        }
    }

    for course in courses.values() {
        let counted = seats.get(&course.id).copied().unwrap_or_default();
        if counted != course.live_count {
            violations.push(ConsistencyViolation::LiveCountMismatch {
                course_id: course.id,
                recorded: course.live_count,
                counted,
            });
        }
        if course.live_count > course.capacity {
            violations.push(ConsistencyViolation::OverCapacity {
                course_id: course.id,
                live_count: course.live_count,
                capacity: course.capacity,
            });
        }
    }

    violations
}
