//! PostgreSQL-backed `StudentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StudentRepository, StudentRepositoryError};
use crate::domain::{IdentityRef, Student, StudentId};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, unique_violation,
};
use super::models::{NewStudentRow, StudentRow};
use super::pool::{DbPool, PoolError};
use super::schema::students;

const IDENTITY_CONSTRAINT: &str = "students_identity_ref_key";
const STUDENT_NUMBER_CONSTRAINT: &str = "students_student_number_key";

/// Diesel-backed implementation of the `StudentRepository` port.
#[derive(Clone)]
pub struct DieselStudentRepository {
    pool: DbPool,
}

impl DieselStudentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> StudentRepositoryError {
    map_basic_pool_error(error, StudentRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> StudentRepositoryError {
    map_basic_diesel_error(
        error,
        StudentRepositoryError::query,
        StudentRepositoryError::connection,
    )
}

fn map_insert_error(error: DieselError, student: &Student) -> StudentRepositoryError {
    match unique_violation(&error) {
        Some(IDENTITY_CONSTRAINT) => {
            StudentRepositoryError::duplicate_identity(student.identity.as_str())
        }
        Some(STUDENT_NUMBER_CONSTRAINT) => {
            StudentRepositoryError::duplicate_student_number(student.student_number.as_str())
        }
        _ => map_diesel_error(error),
    }
}

fn convert_row(row: StudentRow) -> Result<Student, StudentRepositoryError> {
    row.into_student().map_err(StudentRepositoryError::query)
}

#[async_trait]
impl StudentRepository for DieselStudentRepository {
    async fn insert(&self, student: &Student) -> Result<(), StudentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewStudentRow {
            id: *student.id.as_uuid(),
            identity_ref: student.identity.as_str(),
            first_name: &student.first_name,
            last_name: &student.last_name,
            student_number: &student.student_number,
            date_of_birth: student.date_of_birth,
            major: &student.major,
            created_at: student.created_at,
        };

        diesel::insert_into(students::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_insert_error(err, student))
    }

    async fn find_by_id(&self, student_id: StudentId) -> Result<Option<Student>, StudentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<StudentRow> = students::table
            .filter(students::id.eq(student_id.as_uuid()))
            .select(StudentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(convert_row).transpose()
    }

    async fn find_by_identity(
        &self,
        identity: &IdentityRef,
    ) -> Result<Option<Student>, StudentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<StudentRow> = students::table
            .filter(students::identity_ref.eq(identity.as_str()))
            .select(StudentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(convert_row).transpose()
    }

    async fn count(&self) -> Result<u64, StudentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = students::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(u64::try_from(total).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::build("invalid URL"));

        assert!(matches!(repo_err, StudentRepositoryError::Connection { .. }));
        assert!(repo_err.to_string().contains("invalid URL"));
    }

    #[rstest]
    fn query_builder_error_maps_to_query_error() {
        let repo_err = map_diesel_error(DieselError::QueryBuilderError("bad query".into()));

        assert!(matches!(repo_err, StudentRepositoryError::Query { .. }));
    }
}
