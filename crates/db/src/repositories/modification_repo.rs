//! Repository for the `contract_modifications` table.

use gigbridge_core::types::DbId;
use sqlx::{PgPool, Postgres};

use crate::models::contract::Contract;
use crate::models::modification::{ContractModification, CreateContractModification};
use crate::repositories::ContractRepo;

const COLUMNS: &str = "modification_id, contract_id, modification_type, student_id, company_id, \
    hours_per_week, total_hours, price_per_hour, accepted_by_company, accepted_by_student, \
    finished, version, created_at, updated_at";

/// Provides persistence for contract modification proposals.
pub struct ModificationRepo;

impl ModificationRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateContractModification,
    ) -> Result<ContractModification, sqlx::Error> {
        let query = format!(
            "INSERT INTO contract_modifications
                (contract_id, modification_type, student_id, company_id, hours_per_week,
                 total_hours, price_per_hour, accepted_by_company, accepted_by_student, finished)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContractModification>(&query)
            .bind(input.contract_id)
            .bind(input.modification_type.as_str())
            .bind(&input.student_id)
            .bind(&input.company_id)
            .bind(input.terms.hours_per_week)
            .bind(input.terms.total_hours)
            .bind(input.terms.price_per_hour)
            .bind(input.consent.accepted_by_company)
            .bind(input.consent.accepted_by_student)
            .bind(input.consent.finished)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ContractModification>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contract_modifications WHERE modification_id = $1");
        sqlx::query_as::<_, ContractModification>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Open proposals the student has accepted and the company must answer.
    pub async fn list_awaiting_company(
        pool: &PgPool,
        company_id: &str,
    ) -> Result<Vec<ContractModification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contract_modifications
             WHERE company_id = $1 AND accepted_by_student AND NOT finished
             ORDER BY modification_id ASC"
        );
        sqlx::query_as::<_, ContractModification>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// Open proposals the company has accepted and the student must answer.
    pub async fn list_awaiting_student(
        pool: &PgPool,
        student_id: &str,
    ) -> Result<Vec<ContractModification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contract_modifications
             WHERE student_id = $1 AND accepted_by_company AND NOT finished
             ORDER BY modification_id ASC"
        );
        sqlx::query_as::<_, ContractModification>(&query)
            .bind(student_id)
            .fetch_all(pool)
            .await
    }

    /// Full proposal history of a company, finished or not.
    pub async fn list_by_company(
        pool: &PgPool,
        company_id: &str,
    ) -> Result<Vec<ContractModification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contract_modifications
             WHERE company_id = $1
             ORDER BY modification_id ASC"
        );
        sqlx::query_as::<_, ContractModification>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// Full proposal history of a student, finished or not.
    pub async fn list_by_student(
        pool: &PgPool,
        student_id: &str,
    ) -> Result<Vec<ContractModification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contract_modifications
             WHERE student_id = $1
             ORDER BY modification_id ASC"
        );
        sqlx::query_as::<_, ContractModification>(&query)
            .bind(student_id)
            .fetch_all(pool)
            .await
    }

    /// Write the consent flags if `version` still matches, bumping the version.
    ///
    /// A finished row is never rewritten. Returns `None` if the row is gone,
    /// already finished, or was changed concurrently.
    pub async fn update_guarded<'e, E>(
        executor: E,
        modification: &ContractModification,
    ) -> Result<Option<ContractModification>, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let query = format!(
            "UPDATE contract_modifications SET
                accepted_by_company = $3,
                accepted_by_student = $4,
                finished = $5,
                version = version + 1,
                updated_at = NOW()
             WHERE modification_id = $1 AND version = $2 AND NOT finished
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContractModification>(&query)
            .bind(modification.modification_id)
            .bind(modification.version)
            .bind(modification.accepted_by_company)
            .bind(modification.accepted_by_student)
            .bind(modification.finished)
            .fetch_optional(executor)
            .await
    }

    /// Finish a modification and overwrite its contract in one transaction.
    ///
    /// Returns `None` (and changes nothing) if the modification or the
    /// contract lost a concurrent update. Otherwise returns the finished
    /// modification and the updated contract, which is `None` if the
    /// contract vanished or was terminated in the meantime.
    pub async fn finish_and_apply(
        pool: &PgPool,
        modification: &ContractModification,
        contract: &Contract,
    ) -> Result<Option<(ContractModification, Option<Contract>)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(finished) = Self::update_guarded(&mut *tx, modification).await? else {
            tx.rollback().await?;
            return Ok(None);
        };
        let updated = ContractRepo::update(&mut *tx, contract).await?;
        if updated.is_none() && ContractRepo::is_live(&mut *tx, contract.contract_id).await? {
            tracing::debug!(
                modification_id = modification.modification_id,
                contract_id = contract.contract_id,
                "Contract changed concurrently, rolling back"
            );
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some((finished, updated)))
    }
}
