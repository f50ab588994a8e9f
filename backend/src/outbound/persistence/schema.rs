//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations`.
//! Regenerate with `diesel print-schema` after changing a migration.

diesel::table! {
    /// Course catalogue.
    ///
    /// `current_enrolled` is the live count; a check constraint keeps it
    /// within `0..=max_students`.
    courses (id) {
        id -> Uuid,
        /// Unique, upper-cased code (max 10 characters).
        course_code -> Varchar,
        course_name -> Varchar,
        description -> Varchar,
        credits -> Int2,
        instructor -> Varchar,
        max_students -> Int4,
        current_enrolled -> Int4,
        is_active -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Student profiles keyed by external identity.
    students (id) {
        id -> Uuid,
        /// Unique external identity reference.
        identity_ref -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        /// Unique institution-issued number.
        student_number -> Varchar,
        date_of_birth -> Date,
        major -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Enrollment ledger. One row per (student, course) pair.
    enrollments (id) {
        id -> Uuid,
        student_id -> Uuid,
        course_id -> Uuid,
        /// One of `enrolled`, `completed`, `withdrawn`, `failed`.
        status -> Varchar,
        enrolled_at -> Timestamptz,
        grade -> Nullable<Int2>,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(enrollments -> courses (course_id));
diesel::joinable!(enrollments -> students (student_id));

diesel::allow_tables_to_appear_in_same_query!(courses, enrollments, students);
