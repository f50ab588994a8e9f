//! In-process store implementing every driven port.
//!
//! Used when no database is configured and by integration tests. All state
//! lives behind one mutex, so each port operation (including the two-record
//! enroll and withdraw writes) is atomic with respect to every other.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    CourseCounts, CourseRepository, CourseRepositoryError, EnrollmentLedger,
    EnrollmentLedgerError, StudentRepository, StudentRepositoryError,
};
use crate::domain::{
    Course, CourseDraft, CourseId, CourseSearch, CourseSummary, Enrollment, EnrollmentDetails,
    EnrollmentId, EnrollmentStatus, IdentityRef, Student, StudentId, StudentSummary,
};

mod audit;

pub use audit::ConsistencyViolation;

const POISONED: &str = "in-memory store lock poisoned";

#[derive(Debug, Default)]
struct PortalState {
    courses: HashMap<CourseId, Course>,
    students: HashMap<StudentId, Student>,
    /// Ledger entries in insertion order.
    enrollments: Vec<Enrollment>,
}

impl PortalState {
    fn details(&self, entry: &Enrollment) -> Option<EnrollmentDetails> {
        let student = self.students.get(&entry.student_id)?;
        let course = self.courses.get(&entry.course_id)?;
        Some(EnrollmentDetails {
            enrollment: entry.clone(),
            student: StudentSummary {
                name: student.full_name(),
                student_number: student.student_number.clone(),
            },
            course: CourseSummary {
                code: course.code.clone(),
                name: course.name.clone(),
                credits: course.credits,
                instructor: course.instructor.clone(),
            },
        })
    }

    fn code_taken(&self, code: &str, except: Option<CourseId>) -> bool {
        self.courses
            .values()
            .any(|course| course.code.as_str() == code && Some(course.id) != except)
    }
}

/// Mutex-guarded store for courses, students, and the ledger.
#[derive(Debug, Default)]
pub struct InMemoryPortalStore {
    state: Mutex<PortalState>,
}

impl InMemoryPortalStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock<E>(&self, poisoned: impl FnOnce(&'static str) -> E) -> Result<MutexGuard<'_, PortalState>, E> {
        self.state.lock().map_err(|_| poisoned(POISONED))
    }

    /// Check the ledger invariants against the stored live counts.
    ///
    /// Returns every violation found; an empty list means the store is
    /// consistent.
    pub fn audit(&self) -> Vec<ConsistencyViolation> {
        match self.state.lock() {
            Ok(state) => audit::check(&state.courses, &state.enrollments),
            Err(_) => vec![ConsistencyViolation::Poisoned],
        }
    }
}

#[async_trait]
impl CourseRepository for InMemoryPortalStore {
    async fn insert(&self, course: &Course) -> Result<(), CourseRepositoryError> {
        let mut state = self.lock(CourseRepositoryError::query)?;
        if state.code_taken(course.code.as_str(), None) {
            return Err(CourseRepositoryError::duplicate_code(course.code.as_str()));
        }
        state.courses.insert(course.id, course.clone());
        Ok(())
    }

    async fn update_details(
        &self,
        course_id: CourseId,
        draft: &CourseDraft,
        now: DateTime<Utc>,
    ) -> Result<Course, CourseRepositoryError> {
        let mut state = self.lock(CourseRepositoryError::query)?;
        if state.code_taken(draft.code().as_str(), Some(course_id)) {
            return Err(CourseRepositoryError::duplicate_code(draft.code().as_str()));
        }
        let course = state
            .courses
            .get_mut(&course_id)
            .ok_or(CourseRepositoryError::NotFound { course_id })?;
        if draft.capacity() < course.live_count {
            return Err(CourseRepositoryError::capacity_below_enrollment(
                course.live_count,
                draft.capacity(),
            ));
        }
        *course = course.clone().with_details(draft.clone(), now);
        Ok(course.clone())
    }

    async fn set_active(
        &self,
        course_id: CourseId,
        active: bool,
        now: DateTime<Utc>,
    ) -> Result<Course, CourseRepositoryError> {
        let mut state = self.lock(CourseRepositoryError::query)?;
        let course = state
            .courses
            .get_mut(&course_id)
            .ok_or(CourseRepositoryError::NotFound { course_id })?;
        course.active = active;
        course.updated_at = now;
        Ok(course.clone())
    }

    async fn delete(&self, course_id: CourseId) -> Result<u64, CourseRepositoryError> {
        let mut state = self.lock(CourseRepositoryError::query)?;
        if state.courses.remove(&course_id).is_none() {
            return Err(CourseRepositoryError::not_found(course_id));
        }
        let before = state.enrollments.len();
        state.enrollments.retain(|entry| entry.course_id != course_id);
        Ok(u64::try_from(before - state.enrollments.len()).unwrap_or_default())
    }

    async fn find_by_id(&self, course_id: CourseId) -> Result<Option<Course>, CourseRepositoryError> {
        let state = self.lock(CourseRepositoryError::query)?;
        Ok(state.courses.get(&course_id).cloned())
    }

    async fn search(&self, search: &CourseSearch) -> Result<Vec<Course>, CourseRepositoryError> {
        let state = self.lock(CourseRepositoryError::query)?;
        let mut found: Vec<Course> = state
            .courses
            .values()
            .filter(|course| search.matches(course))
            .cloned()
            .collect();
        found.sort_by(|a, b| search.sort.compare(a, b));
        Ok(found)
    }

    async fn counts(&self) -> Result<CourseCounts, CourseRepositoryError> {
        let state = self.lock(CourseRepositoryError::query)?;
        let total = state.courses.len();
        let active = state.courses.values().filter(|course| course.active).count();
        Ok(CourseCounts {
            total: total as u64,
            active: active as u64,
        })
    }
}

#[async_trait]
impl StudentRepository for InMemoryPortalStore {
    async fn insert(&self, student: &Student) -> Result<(), StudentRepositoryError> {
        let mut state = self.lock(StudentRepositoryError::query)?;
        if state
            .students
            .values()
            .any(|existing| existing.identity == student.identity)
        {
            return Err(StudentRepositoryError::duplicate_identity(student.identity.as_str()));
        }
        if state
            .students
            .values()
            .any(|existing| existing.student_number == student.student_number)
        {
            return Err(StudentRepositoryError::duplicate_student_number(
                student.student_number.as_str(),
            ));
        }
        state.students.insert(student.id, student.clone());
        Ok(())
    }

    async fn find_by_id(&self, student_id: StudentId) -> Result<Option<Student>, StudentRepositoryError> {
        let state = self.lock(StudentRepositoryError::query)?;
        Ok(state.students.get(&student_id).cloned())
    }

    async fn find_by_identity(
        &self,
        identity: &IdentityRef,
    ) -> Result<Option<Student>, StudentRepositoryError> {
        let state = self.lock(StudentRepositoryError::query)?;
        Ok(state
            .students
            .values()
            .find(|student| &student.identity == identity)
            .cloned())
    }

    async fn count(&self) -> Result<u64, StudentRepositoryError> {
        let state = self.lock(StudentRepositoryError::query)?;
        Ok(state.students.len() as u64)
    }
}

#[async_trait]
impl EnrollmentLedger for InMemoryPortalStore {
    async fn enroll(&self, entry: &Enrollment) -> Result<Course, EnrollmentLedgerError> {
        let mut state = self.lock(EnrollmentLedgerError::query)?;
        if !state.students.contains_key(&entry.student_id) {
            return Err(EnrollmentLedgerError::student_not_found(entry.student_id));
        }
        if state
            .enrollments
            .iter()
            .any(|existing| existing.student_id == entry.student_id && existing.course_id == entry.course_id)
        {
            return Err(EnrollmentLedgerError::already_enrolled(
                entry.student_id,
                entry.course_id,
            ));
        }
        let course = state
            .courses
            .get_mut(&entry.course_id)
            .filter(|course| course.active)
            .ok_or(EnrollmentLedgerError::CourseNotFound {
                course_id: entry.course_id,
            })?;
        if !course.has_seat() {
            return Err(EnrollmentLedgerError::course_full(entry.course_id));
        }
        course.live_count += 1;
        course.updated_at = entry.enrolled_at;
        let seated = course.clone();
        state.enrollments.push(entry.clone());
        Ok(seated)
    }

    async fn withdraw(
        &self,
        enrollment_id: EnrollmentId,
        student_id: StudentId,
        now: DateTime<Utc>,
    ) -> Result<Enrollment, EnrollmentLedgerError> {
        let mut state = self.lock(EnrollmentLedgerError::query)?;
        let state = &mut *state;
        let entry = state
            .enrollments
            .iter_mut()
            .find(|entry| entry.id == enrollment_id && entry.student_id == student_id)
            .ok_or(EnrollmentLedgerError::EnrollmentNotFound { enrollment_id })?;
        if entry.status != EnrollmentStatus::Enrolled {
            return Err(EnrollmentLedgerError::not_enrolled(enrollment_id, entry.status));
        }
        let course = state
            .courses
            .get_mut(&entry.course_id)
            .filter(|course| course.live_count > 0)
            .ok_or_else(|| {
                EnrollmentLedgerError::query(format!(
                    "enrollment {enrollment_id} has no seat to release on course {}",
                    entry.course_id
                ))
            })?;
        course.live_count -= 1;
        course.updated_at = now;
        entry.status = EnrollmentStatus::Withdrawn;
        Ok(entry.clone())
    }

    async fn find_for_pair(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> Result<Option<Enrollment>, EnrollmentLedgerError> {
        let state = self.lock(EnrollmentLedgerError::query)?;
        Ok(state
            .enrollments
            .iter()
            .find(|entry| entry.student_id == student_id && entry.course_id == course_id)
            .cloned())
    }

    async fn list_for_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<EnrollmentDetails>, EnrollmentLedgerError> {
        let state = self.lock(EnrollmentLedgerError::query)?;
        Ok(state
            .enrollments
            .iter()
            .rev()
            .filter(|entry| entry.student_id == student_id)
            .filter_map(|entry| state.details(entry))
            .collect())
    }

    async fn list_for_course(
        &self,
        course_id: CourseId,
    ) -> Result<Vec<EnrollmentDetails>, EnrollmentLedgerError> {
        let state = self.lock(EnrollmentLedgerError::query)?;
        Ok(state
            .enrollments
            .iter()
            .filter(|entry| entry.course_id == course_id)
            .filter_map(|entry| state.details(entry))
            .collect())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<EnrollmentDetails>, EnrollmentLedgerError> {
        let state = self.lock(EnrollmentLedgerError::query)?;
        Ok(state
            .enrollments
            .iter()
            .rev()
            .filter_map(|entry| state.details(entry))
            .take(limit)
            .collect())
    }

    async fn count_enrolled(&self) -> Result<u64, EnrollmentLedgerError> {
        let state = self.lock(EnrollmentLedgerError::query)?;
        Ok(state
            .enrollments
            .iter()
            .filter(|entry| entry.holds_seat())
            .count() as u64)
    }
}
