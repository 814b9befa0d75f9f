//! Customer persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `customers` table.
//! CPF uniqueness is enforced by the `customers_cpf_key` index; a violation
//! surfaces as a `sqlx::Error::Database` that [`crate::error::AppError`]
//! maps to 409.

use chrono::{DateTime, NaiveDate, Utc};
use custreg_core::Cpf;
use sqlx::PgPool;
use uuid::Uuid;

use crate::state::CustomerRecord;

/// Insert a new customer.
pub async fn insert(pool: &PgPool, record: &CustomerRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO customers (id, name, born, cpf, created_at)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(record.id)
    .bind(&record.name)
    .bind(record.born)
    .bind(record.cpf.as_str())
    .bind(record.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load all customers on startup.
///
/// Rows whose stored CPF no longer validates are skipped with a warning.
pub async fn load_all(pool: &PgPool) -> Result<Vec<CustomerRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CustomerRow>(
        "SELECT id, name, born, cpf, created_at FROM customers ORDER BY name, created_at, id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().filter_map(CustomerRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: Uuid,
    name: String,
    born: NaiveDate,
    cpf: String,
    created_at: DateTime<Utc>,
}

impl CustomerRow {
    fn into_record(self) -> Option<CustomerRecord> {
        let cpf = match Cpf::parse(self.cpf.trim()) {
            Ok(cpf) => cpf,
            Err(_) => {
                tracing::warn!(
                    id = %self.id,
                    "stored CPF fails check-digit validation, skipping row"
                );
                return None;
            }
        };

        Some(CustomerRecord {
            id: self.id,
            name: self.name,
            born: self.born,
            cpf,
            created_at: self.created_at,
        })
    }
}
