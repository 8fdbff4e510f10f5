//! Repository for the `company_requests` table.

use gigbridge_core::matching::{FilterField, FilterRange};
use gigbridge_core::types::DbId;
use sqlx::{PgPool, Postgres};

use crate::models::request::{CompanyRequest, CreateCompanyRequest};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "service_id, company_id, hours_per_week, total_hours, rate_per_hour, \
    requirements, is_accepted_by_company, student_id_candidates, student_id, \
    target_student_id, version, created_at, updated_at";

/// Provides CRUD and guarded-update operations for company requests.
pub struct CompanyRequestRepo;

impl CompanyRequestRepo {
    /// Insert a new company request, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCompanyRequest,
    ) -> Result<CompanyRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO company_requests
                (company_id, hours_per_week, total_hours, rate_per_hour, requirements, target_student_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CompanyRequest>(&query)
            .bind(&input.company_id)
            .bind(input.hours_per_week)
            .bind(input.total_hours)
            .bind(input.rate_per_hour)
            .bind(&input.requirements)
            .bind(&input.target_student_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        service_id: DbId,
    ) -> Result<Option<CompanyRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM company_requests WHERE service_id = $1");
        sqlx::query_as::<_, CompanyRequest>(&query)
            .bind(service_id)
            .fetch_optional(pool)
            .await
    }

    /// List all company requests, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<CompanyRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM company_requests ORDER BY service_id ASC");
        sqlx::query_as::<_, CompanyRequest>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_company(
        pool: &PgPool,
        company_id: &str,
    ) -> Result<Vec<CompanyRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM company_requests
             WHERE company_id = $1
             ORDER BY service_id ASC"
        );
        sqlx::query_as::<_, CompanyRequest>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// List requests addressed to a specific student.
    pub async fn list_targeting(
        pool: &PgPool,
        student_id: &str,
    ) -> Result<Vec<CompanyRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM company_requests
             WHERE target_student_id = $1
             ORDER BY service_id ASC"
        );
        sqlx::query_as::<_, CompanyRequest>(&query)
            .bind(student_id)
            .fetch_all(pool)
            .await
    }

    /// List requests whose `field` lies within `range` (inclusive).
    pub async fn filter(
        pool: &PgPool,
        field: FilterField,
        range: FilterRange,
    ) -> Result<Vec<CompanyRequest>, sqlx::Error> {
        // The column name comes from a closed enum, never from user input.
        let query = format!(
            "SELECT {COLUMNS} FROM company_requests
             WHERE {col}::DOUBLE PRECISION BETWEEN $1 AND $2
             ORDER BY service_id ASC",
            col = field.column()
        );
        sqlx::query_as::<_, CompanyRequest>(&query)
            .bind(range.lower)
            .bind(range.upper)
            .fetch_all(pool)
            .await
    }

    /// Overwrite a request if its `version` still matches, bumping the version.
    ///
    /// Returns `None` if the row is gone or was changed concurrently.
    pub async fn update_guarded(
        pool: &PgPool,
        request: &CompanyRequest,
    ) -> Result<Option<CompanyRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE company_requests SET
                hours_per_week = $3,
                total_hours = $4,
                rate_per_hour = $5,
                requirements = $6,
                is_accepted_by_company = $7,
                student_id_candidates = $8,
                student_id = $9,
                target_student_id = $10,
                version = version + 1,
                updated_at = NOW()
             WHERE service_id = $1 AND version = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CompanyRequest>(&query)
            .bind(request.service_id)
            .bind(request.version)
            .bind(request.hours_per_week)
            .bind(request.total_hours)
            .bind(request.rate_per_hour)
            .bind(&request.requirements)
            .bind(request.is_accepted_by_company)
            .bind(&request.student_id_candidates)
            .bind(&request.student_id)
            .bind(&request.target_student_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a request by ID. Returns the deleted row, if any.
    pub async fn delete<'e, E>(
        executor: E,
        service_id: DbId,
    ) -> Result<Option<CompanyRequest>, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let query =
            format!("DELETE FROM company_requests WHERE service_id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, CompanyRequest>(&query)
            .bind(service_id)
            .fetch_optional(executor)
            .await
    }

    /// Delete every request of a company, returning the deleted rows.
    pub async fn delete_by_company(
        pool: &PgPool,
        company_id: &str,
    ) -> Result<Vec<CompanyRequest>, sqlx::Error> {
        let query =
            format!("DELETE FROM company_requests WHERE company_id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, CompanyRequest>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }
}
