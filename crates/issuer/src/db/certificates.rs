//! `PostgreSQL`-backed record store.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use ignite_certificates_core::{CertificateId, UserCertificateRecord};

use super::{RecordStore, RepositoryError};

/// Repository for the `users_certificates` table.
#[derive(Clone)]
pub struct CertificateRepository {
    pool: PgPool,
}

impl CertificateRepository {
    /// Create a new certificate repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for CertificateRepository {
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored id no longer parses.
    #[instrument(skip(self), fields(certificate_id = %id))]
    async fn query(
        &self,
        id: &CertificateId,
    ) -> Result<Vec<UserCertificateRecord>, RepositoryError> {
        let rows: Vec<(String, String, String)> = sqlx::query_as(
            r"
            SELECT id, name, grade
            FROM users_certificates
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(id, name, grade)| {
                let id = CertificateId::parse(&id).map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid id in database: {e}"))
                })?;
                Ok(UserCertificateRecord { id, name, grade })
            })
            .collect()
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails for any reason
    /// other than the id already existing.
    #[instrument(skip(self, record), fields(certificate_id = %record.id))]
    async fn put_if_absent(&self, record: &UserCertificateRecord) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO users_certificates (id, name, grade)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO NOTHING
            ",
        )
        .bind(&record.id)
        .bind(&record.name)
        .bind(&record.grade)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
