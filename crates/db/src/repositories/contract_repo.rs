//! Repository for the `contracts` table.

use gigbridge_core::types::DbId;
use sqlx::{PgConnection, PgPool, Postgres};

use crate::models::contract::{Contract, CreateContract};
use crate::repositories::{CompanyRequestRepo, StudentRequestRepo};

const COLUMNS: &str = "contract_id, hours_per_week, total_hours, price_per_hour, \
    student_id, company_id, terminated, source_service_id, version, created_at, updated_at";

/// Provides CRUD operations for contracts.
pub struct ContractRepo;

impl ContractRepo {
    /// Insert a new contract. New contracts are never terminated.
    ///
    /// A draft whose `source_service_id` already has a contract returns that
    /// contract instead of inserting a second one.
    pub async fn create(pool: &PgPool, input: &CreateContract) -> Result<Contract, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::create_once(&mut *conn, input).await
    }

    async fn create_once(
        conn: &mut PgConnection,
        input: &CreateContract,
    ) -> Result<Contract, sqlx::Error> {
        let query = format!(
            "INSERT INTO contracts
                (hours_per_week, total_hours, price_per_hour, student_id, company_id,
                 source_service_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (source_service_id) DO NOTHING
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Contract>(&query)
            .bind(input.hours_per_week)
            .bind(input.total_hours)
            .bind(input.price_per_hour)
            .bind(&input.student_id)
            .bind(&input.company_id)
            .bind(input.source_service_id)
            .fetch_optional(&mut *conn)
            .await?;
        if let Some(contract) = inserted {
            return Ok(contract);
        }

        tracing::debug!(
            source_service_id = ?input.source_service_id,
            "Contract already recorded for request"
        );
        let query = format!("SELECT {COLUMNS} FROM contracts WHERE source_service_id = $1");
        sqlx::query_as::<_, Contract>(&query)
            .bind(input.source_service_id)
            .fetch_one(&mut *conn)
            .await
    }

    /// Record the contract for request `service_id` and delete the request,
    /// in one transaction.
    pub async fn create_for_request(
        pool: &PgPool,
        service_id: DbId,
        input: &CreateContract,
    ) -> Result<Contract, sqlx::Error> {
        let input = CreateContract {
            source_service_id: Some(service_id),
            ..input.clone()
        };
        let mut tx = pool.begin().await?;
        let contract = Self::create_once(&mut *tx, &input).await?;
        // Service ids are shared by both request tables, so at most one matches.
        CompanyRequestRepo::delete(&mut *tx, service_id).await?;
        StudentRequestRepo::delete(&mut *tx, service_id).await?;
        tx.commit().await?;
        Ok(contract)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contracts WHERE contract_id = $1");
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Contract>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contracts ORDER BY contract_id ASC");
        sqlx::query_as::<_, Contract>(&query).fetch_all(pool).await
    }

    pub async fn list_by_student(
        pool: &PgPool,
        student_id: &str,
    ) -> Result<Vec<Contract>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contracts WHERE student_id = $1 ORDER BY contract_id ASC"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(student_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_company(
        pool: &PgPool,
        company_id: &str,
    ) -> Result<Vec<Contract>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contracts WHERE company_id = $1 ORDER BY contract_id ASC"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// Overwrite the mutable fields of a contract that is not terminated,
    /// if `version` still matches, bumping the version.
    ///
    /// Returns `None` if the contract is gone, terminated, or was changed
    /// concurrently. Takes any executor so it can run inside the transaction
    /// that finishes the triggering modification.
    pub async fn update<'e, E>(
        executor: E,
        contract: &Contract,
    ) -> Result<Option<Contract>, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let query = format!(
            "UPDATE contracts SET
                hours_per_week = $2,
                total_hours = $3,
                price_per_hour = $4,
                terminated = $5,
                version = version + 1,
                updated_at = NOW()
             WHERE contract_id = $1 AND version = $6 AND NOT terminated
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(contract.contract_id)
            .bind(contract.hours_per_week)
            .bind(contract.total_hours)
            .bind(contract.price_per_hour)
            .bind(contract.terminated)
            .bind(contract.version)
            .fetch_optional(executor)
            .await
    }

    /// Whether the contract exists and is not terminated.
    pub async fn is_live<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM contracts WHERE contract_id = $1 AND NOT terminated)",
        )
        .bind(id)
        .fetch_one(executor)
        .await
    }

    /// Delete a contract by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contracts WHERE contract_id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
