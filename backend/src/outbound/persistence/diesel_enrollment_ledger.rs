//! PostgreSQL-backed `EnrollmentLedger` implementation using Diesel ORM.
//!
//! Enroll runs in one transaction: insert the entry (the unique pair
//! constraint catches concurrent duplicates), then take a seat with a
//! conditional increment that only matches an active course below capacity.
//! A zero-row increment rolls the insert back. Withdraw locks the entry,
//! flips its status, and releases the seat in the same transaction; a
//! zero-row release rolls the status change back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::warn;

use crate::domain::ports::{EnrollmentLedger, EnrollmentLedgerError};
use crate::domain::{
    Course, CourseId, Enrollment, EnrollmentDetails, EnrollmentId, EnrollmentStatus, StudentId,
};

use super::diesel_basic_error_mapping::{
    foreign_key_violation, map_basic_diesel_error, map_basic_pool_error, unique_violation,
};
use super::models::{
    CourseRow, CourseSummaryRow, EnrollmentDetailsRow, EnrollmentRow, NewEnrollmentRow,
    StudentSummaryRow, into_enrollment_details,
};
use super::pool::{DbPool, PoolError};
use super::schema::{courses, enrollments, students};

const PAIR_CONSTRAINT: &str = "enrollments_student_course_key";
const STUDENT_FK: &str = "enrollments_student_id_fkey";
const COURSE_FK: &str = "enrollments_course_id_fkey";

/// Diesel-backed implementation of the `EnrollmentLedger` port.
#[derive(Clone)]
pub struct DieselEnrollmentLedger {
    pool: DbPool,
}

impl DieselEnrollmentLedger {
    /// Create a new ledger with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EnrollmentLedgerError {
    map_basic_pool_error(error, EnrollmentLedgerError::connection)
}

fn map_diesel_error(error: DieselError) -> EnrollmentLedgerError {
    map_basic_diesel_error(
        error,
        EnrollmentLedgerError::query,
        EnrollmentLedgerError::connection,
    )
}

/// Error carried out of a ledger transaction.
enum LedgerTxError {
    Diesel(DieselError),
    Rejected(EnrollmentLedgerError),
}

impl From<DieselError> for LedgerTxError {
    fn from(error: DieselError) -> Self {
        Self::Diesel(error)
    }
}

impl From<LedgerTxError> for EnrollmentLedgerError {
    fn from(error: LedgerTxError) -> Self {
        match error {
            LedgerTxError::Diesel(error) => map_diesel_error(error),
            LedgerTxError::Rejected(rejection) => rejection,
        }
    }
}

fn classify_insert_error(error: DieselError, entry: &Enrollment) -> LedgerTxError {
    if unique_violation(&error) == Some(PAIR_CONSTRAINT) {
        return LedgerTxError::Rejected(EnrollmentLedgerError::already_enrolled(
            entry.student_id,
            entry.course_id,
        ));
    }
    match foreign_key_violation(&error) {
        Some(STUDENT_FK) => {
            LedgerTxError::Rejected(EnrollmentLedgerError::student_not_found(entry.student_id))
        }
        Some(COURSE_FK) => {
            LedgerTxError::Rejected(EnrollmentLedgerError::course_not_found(entry.course_id))
        }
        _ => LedgerTxError::Diesel(error),
    }
}

/// A withdrawal whose course holds no seat to give back.
fn no_seat_to_release(enrollment_id: EnrollmentId, course_id: CourseId) -> EnrollmentLedgerError {
    EnrollmentLedgerError::query(format!(
        "enrollment {enrollment_id} has no seat to release on course {course_id}"
    ))
}

fn to_db_grade(entry: &Enrollment) -> Option<i16> {
    entry.grade.map(|grade| i16::from(grade.value()))
}

fn convert_details(rows: Vec<EnrollmentDetailsRow>) -> Result<Vec<EnrollmentDetails>, EnrollmentLedgerError> {
    rows.into_iter()
        .map(into_enrollment_details)
        .collect::<Result<Vec<_>, _>>()
        .map_err(EnrollmentLedgerError::query)
}

#[async_trait]
impl EnrollmentLedger for DieselEnrollmentLedger {
    async fn enroll(&self, entry: &Enrollment) -> Result<Course, EnrollmentLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let course_id = *entry.course_id.as_uuid();
        let new_row = NewEnrollmentRow {
            id: *entry.id.as_uuid(),
            student_id: *entry.student_id.as_uuid(),
            course_id,
            status: entry.status.as_str(),
            enrolled_at: entry.enrolled_at,
            grade: to_db_grade(entry),
            updated_at: entry.enrolled_at,
        };
        let now = entry.enrolled_at;

        let row = conn
            .transaction::<CourseRow, LedgerTxError, _>(|conn| {
                async move {
                    diesel::insert_into(enrollments::table)
                        .values(&new_row)
                        .execute(conn)
                        .await
                        .map_err(|err| classify_insert_error(err, entry))?;

                    let seated: Option<CourseRow> = diesel::update(
                        courses::table.filter(
                            courses::id
                                .eq(course_id)
                                .and(courses::is_active.eq(true))
                                .and(courses::current_enrolled.lt(courses::max_students)),
                        ),
                    )
                    .set((
                        courses::current_enrolled.eq(courses::current_enrolled + 1),
                        courses::updated_at.eq(now),
                    ))
                    .returning(CourseRow::as_returning())
                    .get_result(conn)
                    .await
                    .optional()?;

                    if let Some(row) = seated {
                        return Ok(row);
                    }

                    let active: Option<bool> = courses::table
                        .filter(courses::id.eq(course_id))
                        .select(courses::is_active)
                        .first(conn)
                        .await
                        .optional()?;
                    Err(LedgerTxError::Rejected(match active {
                        Some(true) => EnrollmentLedgerError::course_full(entry.course_id),
                        _ => EnrollmentLedgerError::course_not_found(entry.course_id),
                    }))
                }
                .scope_boxed()
            })
            .await?;

        row.into_course().map_err(EnrollmentLedgerError::query)
    }

    async fn withdraw(
        &self,
        enrollment_id: EnrollmentId,
        student_id: StudentId,
        now: DateTime<Utc>,
    ) -> Result<Enrollment, EnrollmentLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = *enrollment_id.as_uuid();
        let owner = *student_id.as_uuid();

        let withdrawn = conn
            .transaction::<Enrollment, LedgerTxError, _>(|conn| {
                async move {
                    let row: Option<EnrollmentRow> = enrollments::table
                        .filter(enrollments::id.eq(id).and(enrollments::student_id.eq(owner)))
                        .select(EnrollmentRow::as_select())
                        .for_update()
                        .get_result(conn)
                        .await
                        .optional()?;
                    let mut entry = row
                        .ok_or(LedgerTxError::Rejected(
                            EnrollmentLedgerError::enrollment_not_found(enrollment_id),
                        ))?
                        .into_enrollment()
                        .map_err(|message| {
                            LedgerTxError::Rejected(EnrollmentLedgerError::query(message))
                        })?;

                    if entry.status != EnrollmentStatus::Enrolled {
                        return Err(LedgerTxError::Rejected(EnrollmentLedgerError::not_enrolled(
                            enrollment_id,
                            entry.status,
                        )));
                    }

                    diesel::update(enrollments::table.filter(enrollments::id.eq(id)))
                        .set((
                            enrollments::status.eq(EnrollmentStatus::Withdrawn.as_str()),
                            enrollments::updated_at.eq(now),
                        ))
                        .execute(conn)
                        .await?;

                    let released = diesel::update(
                        courses::table.filter(
                            courses::id
                                .eq(entry.course_id.as_uuid())
                                .and(courses::current_enrolled.gt(0)),
                        ),
                    )
                    .set((
                        courses::current_enrolled.eq(courses::current_enrolled - 1),
                        courses::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .await?;
                    if released == 0 {
                        warn!(
                            %enrollment_id,
                            course_id = %entry.course_id,
                            "withdrawn entry had no seat to release"
                        );
                        return Err(LedgerTxError::Rejected(no_seat_to_release(
                            enrollment_id,
                            entry.course_id,
                        )));
                    }

                    entry.status = EnrollmentStatus::Withdrawn;
                    Ok(entry)
                }
                .scope_boxed()
            })
            .await?;

        Ok(withdrawn)
    }

    async fn find_for_pair(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> Result<Option<Enrollment>, EnrollmentLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<EnrollmentRow> = enrollments::table
            .filter(
                enrollments::student_id
                    .eq(student_id.as_uuid())
                    .and(enrollments::course_id.eq(course_id.as_uuid())),
            )
            .select(EnrollmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(EnrollmentRow::into_enrollment)
            .transpose()
            .map_err(EnrollmentLedgerError::query)
    }

    async fn list_for_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<EnrollmentDetails>, EnrollmentLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<EnrollmentDetailsRow> = enrollments::table
            .inner_join(students::table)
            .inner_join(courses::table)
            .filter(enrollments::student_id.eq(student_id.as_uuid()))
            .order(enrollments::enrolled_at.desc())
            .select((
                EnrollmentRow::as_select(),
                StudentSummaryRow::as_select(),
                CourseSummaryRow::as_select(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        convert_details(rows)
    }

    async fn list_for_course(
        &self,
        course_id: CourseId,
    ) -> Result<Vec<EnrollmentDetails>, EnrollmentLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<EnrollmentDetailsRow> = enrollments::table
            .inner_join(students::table)
            .inner_join(courses::table)
            .filter(enrollments::course_id.eq(course_id.as_uuid()))
            .order(enrollments::enrolled_at.asc())
            .select((
                EnrollmentRow::as_select(),
                StudentSummaryRow::as_select(),
                CourseSummaryRow::as_select(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        convert_details(rows)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<EnrollmentDetails>, EnrollmentLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<EnrollmentDetailsRow> = enrollments::table
            .inner_join(students::table)
            .inner_join(courses::table)
            .order(enrollments::enrolled_at.desc())
            .limit(limit)
            .select((
                EnrollmentRow::as_select(),
                StudentSummaryRow::as_select(),
                CourseSummaryRow::as_select(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        convert_details(rows)
    }

    async fn count_enrolled(&self) -> Result<u64, EnrollmentLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = enrollments::table
            .filter(enrollments::status.eq(EnrollmentStatus::Enrolled.as_str()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(u64::try_from(total).unwrap_or_default())
    }
}
