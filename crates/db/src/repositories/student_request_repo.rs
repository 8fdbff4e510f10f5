//! Repository for the `student_requests` table.

use gigbridge_core::matching::{FilterField, FilterRange};
use gigbridge_core::types::DbId;
use sqlx::{PgPool, Postgres};

use crate::models::request::{CreateStudentRequest, StudentRequest};

const COLUMNS: &str = "service_id, student_id, hours_per_week, total_hours, rate_per_hour, \
    expertise, is_accepted_by_student, company_id, version, created_at, updated_at";

/// Provides CRUD and guarded-update operations for student requests.
pub struct StudentRequestRepo;

impl StudentRequestRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateStudentRequest,
    ) -> Result<StudentRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO student_requests
                (student_id, hours_per_week, total_hours, rate_per_hour, expertise)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StudentRequest>(&query)
            .bind(&input.student_id)
            .bind(input.hours_per_week)
            .bind(input.total_hours)
            .bind(input.rate_per_hour)
            .bind(&input.expertise)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        service_id: DbId,
    ) -> Result<Option<StudentRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM student_requests WHERE service_id = $1");
        sqlx::query_as::<_, StudentRequest>(&query)
            .bind(service_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<StudentRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM student_requests ORDER BY service_id ASC");
        sqlx::query_as::<_, StudentRequest>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_student(
        pool: &PgPool,
        student_id: &str,
    ) -> Result<Vec<StudentRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM student_requests
             WHERE student_id = $1
             ORDER BY service_id ASC"
        );
        sqlx::query_as::<_, StudentRequest>(&query)
            .bind(student_id)
            .fetch_all(pool)
            .await
    }

    /// List requests whose expertise tags contain `tag`.
    pub async fn search_expertise(
        pool: &PgPool,
        tag: &str,
    ) -> Result<Vec<StudentRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM student_requests
             WHERE $1 = ANY(expertise)
             ORDER BY service_id ASC"
        );
        sqlx::query_as::<_, StudentRequest>(&query)
            .bind(tag)
            .fetch_all(pool)
            .await
    }

    /// List requests whose `field` lies within `range` (inclusive).
    pub async fn filter(
        pool: &PgPool,
        field: FilterField,
        range: FilterRange,
    ) -> Result<Vec<StudentRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM student_requests
             WHERE {col}::DOUBLE PRECISION BETWEEN $1 AND $2
             ORDER BY service_id ASC",
            col = field.column()
        );
        sqlx::query_as::<_, StudentRequest>(&query)
            .bind(range.lower)
            .bind(range.upper)
            .fetch_all(pool)
            .await
    }

    /// Overwrite a request if its `version` still matches, bumping the version.
    pub async fn update_guarded(
        pool: &PgPool,
        request: &StudentRequest,
    ) -> Result<Option<StudentRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE student_requests SET
                hours_per_week = $3,
                total_hours = $4,
                rate_per_hour = $5,
                expertise = $6,
                is_accepted_by_student = $7,
                company_id = $8,
                version = version + 1,
                updated_at = NOW()
             WHERE service_id = $1 AND version = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StudentRequest>(&query)
            .bind(request.service_id)
            .bind(request.version)
            .bind(request.hours_per_week)
            .bind(request.total_hours)
            .bind(request.rate_per_hour)
            .bind(&request.expertise)
            .bind(request.is_accepted_by_student)
            .bind(&request.company_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete<'e, E>(
        executor: E,
        service_id: DbId,
    ) -> Result<Option<StudentRequest>, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let query =
            format!("DELETE FROM student_requests WHERE service_id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, StudentRequest>(&query)
            .bind(service_id)
            .fetch_optional(executor)
            .await
    }
}
