//! File record repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::types::FileId;
use docvault_entity::file::FileRecord;

const INSERT_FILE_SQL: &str = "INSERT INTO files (id, tab_id, category_id, department_id, \
     file_name, original_filename, file_extension, file_size, mime_type, storage_bucket, \
     storage_key, storage_locator, uploaded_by, description, version, is_current_version, \
     parent_file_id, download_count, is_active, is_deleted, deleted_at, deleted_by, \
     created_at, updated_at) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
     $18, $19, $20, $21, $22, $23, $24) RETURNING *";

/// Repository for file record reads and conditional writes.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a file record by id.
    pub async fn find_by_id(&self, id: FileId) -> AppResult<Option<FileRecord>> {
        sqlx::query_as::<_, FileRecord>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    /// Insert a new file record.
    pub async fn create(&self, record: &FileRecord) -> AppResult<FileRecord> {
        let mut trx = self.begin().await?;
        let created = insert(&mut trx, record).await?;
        commit(trx).await?;
        Ok(created)
    }

    /// Retire `previous_id` as current version and insert `record`, atomically.
    pub async fn create_version(
        &self,
        previous_id: FileId,
        record: &FileRecord,
    ) -> AppResult<FileRecord> {
        let mut trx = self.begin().await?;

        let retired = sqlx::query(
            "UPDATE files SET is_current_version = FALSE, updated_at = $2 \
             WHERE id = $1 AND is_current_version = TRUE AND is_deleted = FALSE",
        )
        .bind(previous_id)
        .bind(record.created_at)
        .execute(&mut *trx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to retire previous version", e)
        })?;

        if retired.rows_affected() == 0 {
            trx.rollback().await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to roll back", e)
            })?;
            return Err(AppError::conflict(format!(
                "File {previous_id} is no longer the current version"
            )));
        }

        let created = insert(&mut trx, record).await?;
        commit(trx).await?;
        Ok(created)
    }

    /// Increment the download counter of an undeleted, active record.
    pub async fn increment_download_count(
        &self,
        id: FileId,
        at: DateTime<Utc>,
    ) -> AppResult<Option<FileRecord>> {
        sqlx::query_as::<_, FileRecord>(
            "UPDATE files SET download_count = download_count + 1, updated_at = $2 \
             WHERE id = $1 AND is_deleted = FALSE AND is_active = TRUE RETURNING *",
        )
        .bind(id)
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record download", e)
        })
    }

    /// Soft-delete an undeleted record.
    pub async fn soft_delete(
        &self,
        id: FileId,
        deleted_by: i32,
        at: DateTime<Utc>,
    ) -> AppResult<Option<FileRecord>> {
        sqlx::query_as::<_, FileRecord>(
            "UPDATE files SET is_deleted = TRUE, is_active = FALSE, deleted_at = $2, \
             deleted_by = $3, updated_at = $2 \
             WHERE id = $1 AND is_deleted = FALSE RETURNING *",
        )
        .bind(id)
        .bind(at)
        .bind(deleted_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))
    }

    /// Set the active flag of an undeleted record.
    pub async fn set_active(
        &self,
        id: FileId,
        is_active: bool,
        at: DateTime<Utc>,
    ) -> AppResult<Option<FileRecord>> {
        sqlx::query_as::<_, FileRecord>(
            "UPDATE files SET is_active = $2, updated_at = $3 \
             WHERE id = $1 AND is_deleted = FALSE RETURNING *",
        )
        .bind(id)
        .bind(is_active)
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update active flag", e)
        })
    }

    async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })
    }
}

async fn insert(
    trx: &mut Transaction<'static, Postgres>,
    record: &FileRecord,
) -> AppResult<FileRecord> {
    sqlx::query_as::<_, FileRecord>(INSERT_FILE_SQL)
        .bind(record.id)
        .bind(record.tab_id)
        .bind(record.category_id)
        .bind(record.department_id)
        .bind(&record.file_name)
        .bind(&record.original_filename)
        .bind(&record.file_extension)
        .bind(record.file_size)
        .bind(&record.mime_type)
        .bind(&record.storage_bucket)
        .bind(&record.storage_key)
        .bind(&record.storage_locator)
        .bind(record.uploaded_by)
        .bind(&record.description)
        .bind(record.version)
        .bind(record.is_current_version)
        .bind(record.parent_file_id)
        .bind(record.download_count)
        .bind(record.is_active)
        .bind(record.is_deleted)
        .bind(record.deleted_at)
        .bind(record.deleted_by)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&mut **trx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert file", e))
}

async fn commit(trx: Transaction<'static, Postgres>) -> AppResult<()> {
    trx.commit()
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit", e))
}
