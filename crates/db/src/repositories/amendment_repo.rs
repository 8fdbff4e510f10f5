//! Repository for the `company_request_modifications` table.

use gigbridge_core::types::DbId;
use sqlx::PgPool;

use crate::models::amendment::{CompanyRequestModification, CreateCompanyRequestModification};

const COLUMNS: &str = "modification_id, service_id, student_id, company_id, hours_per_week, \
    total_hours, price_per_hour, accepted_by_company, created_at";

/// Provides persistence for company request amendments.
pub struct AmendmentRepo;

impl AmendmentRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateCompanyRequestModification,
    ) -> Result<CompanyRequestModification, sqlx::Error> {
        let query = format!(
            "INSERT INTO company_request_modifications
                (service_id, student_id, company_id, hours_per_week, total_hours, price_per_hour)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CompanyRequestModification>(&query)
            .bind(input.service_id)
            .bind(&input.student_id)
            .bind(&input.company_id)
            .bind(input.hours_per_week())
            .bind(input.total_hours())
            .bind(input.price_per_hour())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CompanyRequestModification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM company_request_modifications WHERE modification_id = $1"
        );
        sqlx::query_as::<_, CompanyRequestModification>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_company(
        pool: &PgPool,
        company_id: &str,
    ) -> Result<Vec<CompanyRequestModification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM company_request_modifications
             WHERE company_id = $1
             ORDER BY modification_id ASC"
        );
        sqlx::query_as::<_, CompanyRequestModification>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// Delete an amendment by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM company_request_modifications WHERE modification_id = $1")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
