//! PostgreSQL-backed `CourseRepository` implementation using Diesel ORM.
//!
//! Capacity edits use a conditional update so the check against the live
//! count and the write are a single statement. The live count itself is only
//! written by the enrollment ledger.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{CourseCounts, CourseRepository, CourseRepositoryError};
use crate::domain::{
    Course, CourseDraft, CourseId, CourseSearch, SortDirection, SortKey,
};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, unique_violation,
};
use super::models::{CourseDetailsUpdate, CourseRow, NewCourseRow};
use super::pool::{DbPool, PoolError};
use super::schema::{courses, enrollments};

const COURSE_CODE_CONSTRAINT: &str = "courses_course_code_key";

/// Diesel-backed implementation of the `CourseRepository` port.
#[derive(Clone)]
pub struct DieselCourseRepository {
    pool: DbPool,
}

impl DieselCourseRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CourseRepositoryError {
    map_basic_pool_error(error, CourseRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> CourseRepositoryError {
    map_basic_diesel_error(
        error,
        CourseRepositoryError::query,
        CourseRepositoryError::connection,
    )
}

/// Map write errors, recognising the course code uniqueness constraint.
fn map_write_error(error: DieselError, code: &str) -> CourseRepositoryError {
    if unique_violation(&error) == Some(COURSE_CODE_CONSTRAINT) {
        return CourseRepositoryError::duplicate_code(code);
    }
    map_diesel_error(error)
}

fn convert_row(row: CourseRow) -> Result<Course, CourseRepositoryError> {
    row.into_course().map_err(CourseRepositoryError::query)
}

fn to_db_count(value: u32) -> Result<i32, CourseRepositoryError> {
    i32::try_from(value)
        .map_err(|_| CourseRepositoryError::query(format!("count {value} exceeds storage range")))
}

fn from_db_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

/// Escape `LIKE` metacharacters so the term matches literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Transaction outcome for purge.
enum PurgeError {
    Diesel(DieselError),
    NotFound,
}

impl From<DieselError> for PurgeError {
    fn from(error: DieselError) -> Self {
        Self::Diesel(error)
    }
}

#[async_trait]
impl CourseRepository for DieselCourseRepository {
    async fn insert(&self, course: &Course) -> Result<(), CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewCourseRow {
            id: *course.id.as_uuid(),
            course_code: course.code.as_str(),
            course_name: &course.name,
            description: &course.description,
            credits: i16::from(course.credits),
            instructor: &course.instructor,
            max_students: to_db_count(course.capacity)?,
            current_enrolled: to_db_count(course.live_count)?,
            is_active: course.active,
            created_at: course.created_at,
            updated_at: course.updated_at,
        };

        diesel::insert_into(courses::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_write_error(err, course.code.as_str()))
    }

    async fn update_details(
        &self,
        course_id: CourseId,
        draft: &CourseDraft,
        now: DateTime<Utc>,
    ) -> Result<Course, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let requested = to_db_count(draft.capacity())?;
        let changeset = CourseDetailsUpdate {
            course_code: draft.code().as_str(),
            course_name: draft.name(),
            description: draft.description(),
            credits: i16::from(draft.credits()),
            instructor: draft.instructor(),
            max_students: requested,
            is_active: draft.active(),
            updated_at: now,
        };

        let updated: Option<CourseRow> = diesel::update(
            courses::table.filter(
                courses::id
                    .eq(course_id.as_uuid())
                    .and(courses::current_enrolled.le(requested)),
            ),
        )
        .set(&changeset)
        .returning(CourseRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(|err| map_write_error(err, draft.code().as_str()))?;

        if let Some(row) = updated {
            return convert_row(row);
        }

        // Zero rows: either the course is gone or the live count is too high.
        let live_count: Option<i32> = courses::table
            .filter(courses::id.eq(course_id.as_uuid()))
            .select(courses::current_enrolled)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Err(match live_count {
            Some(live) => CourseRepositoryError::capacity_below_enrollment(
                u32::try_from(live).unwrap_or_default(),
                draft.capacity(),
            ),
            None => CourseRepositoryError::not_found(course_id),
        })
    }

    async fn set_active(
        &self,
        course_id: CourseId,
        active: bool,
        now: DateTime<Utc>,
    ) -> Result<Course, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated: Option<CourseRow> =
            diesel::update(courses::table.filter(courses::id.eq(course_id.as_uuid())))
                .set((courses::is_active.eq(active), courses::updated_at.eq(now)))
                .returning(CourseRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;

        updated
            .ok_or_else(|| CourseRepositoryError::not_found(course_id))
            .and_then(convert_row)
    }

    async fn delete(&self, course_id: CourseId) -> Result<u64, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = *course_id.as_uuid();

        let removed = conn
            .transaction::<usize, PurgeError, _>(|conn| {
                async move {
                    let removed = diesel::delete(enrollments::table.filter(enrollments::course_id.eq(id)))
                        .execute(conn)
                        .await?;
                    let deleted = diesel::delete(courses::table.filter(courses::id.eq(id)))
                        .execute(conn)
                        .await?;
                    if deleted == 0 {
                        return Err(PurgeError::NotFound);
                    }
                    Ok(removed)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| match err {
                PurgeError::Diesel(error) => map_diesel_error(error),
                PurgeError::NotFound => CourseRepositoryError::not_found(course_id),
            })?;

        Ok(u64::try_from(removed).unwrap_or_default())
    }

    async fn find_by_id(&self, course_id: CourseId) -> Result<Option<Course>, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CourseRow> = courses::table
            .filter(courses::id.eq(course_id.as_uuid()))
            .select(CourseRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(convert_row).transpose()
    }

    async fn search(&self, search: &CourseSearch) -> Result<Vec<Course>, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = courses::table
            .filter(courses::is_active.eq(true))
            .select(CourseRow::as_select())
            .into_boxed();

        if let Some(term) = search.term() {
            let pattern = like_pattern(term);
            query = query.filter(
                courses::course_code
                    .ilike(pattern.clone())
                    .or(courses::course_name.ilike(pattern.clone()))
                    .or(courses::instructor.ilike(pattern)),
            );
        }

        let sort = search.sort;
        query = match (sort.key, sort.direction) {
            (SortKey::Code, SortDirection::Ascending) => query.order(courses::course_code.asc()),
            (SortKey::Code, SortDirection::Descending) => query.order(courses::course_code.desc()),
            (SortKey::Name, SortDirection::Ascending) => {
                query.order((courses::course_name.asc(), courses::course_code.asc()))
            }
            (SortKey::Name, SortDirection::Descending) => {
                query.order((courses::course_name.desc(), courses::course_code.asc()))
            }
            (SortKey::Credits, SortDirection::Ascending) => {
                query.order((courses::credits.asc(), courses::course_code.asc()))
            }
            (SortKey::Credits, SortDirection::Descending) => {
                query.order((courses::credits.desc(), courses::course_code.asc()))
            }
        };

        let rows: Vec<CourseRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(convert_row).collect()
    }

    async fn counts(&self) -> Result<CourseCounts, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = courses::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let active: i64 = courses::table
            .filter(courses::is_active.eq(true))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(CourseCounts {
            total: from_db_count(total),
            active: from_db_count(active),
        })
    }
}
