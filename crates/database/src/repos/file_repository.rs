//! Repository for file records attached to events.

use sqlx::SqlitePool;
use tracing::info;

use crate::entities::{CreateFileRequest, FileRecord};
use crate::types::{timestamp, DatabaseError, DatabaseResult};

const FILE_COLUMNS: &str =
    "id, event_id, name, url, content_type, size_bytes, uploaded_by, created_at";

pub struct FileRepository {
    pool: SqlitePool,
}

impl FileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_for_event(&self, event_id: &str) -> DatabaseResult<Vec<FileRecord>> {
        let files = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE event_id = ? ORDER BY created_at DESC, id"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(files)
    }

    pub async fn get(&self, id: &str) -> DatabaseResult<FileRecord> {
        sqlx::query_as::<_, FileRecord>(&format!("SELECT {FILE_COLUMNS} FROM files WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DatabaseError::NotFound("File"))
    }

    pub async fn create(&self, event_id: &str, request: CreateFileRequest) -> DatabaseResult<FileRecord> {
        let file = FileRecord::from_request(cuid2::cuid(), event_id, request, &timestamp());
        file.validate()?;

        sqlx::query(
            "INSERT INTO files (id, event_id, name, url, content_type, size_bytes, uploaded_by,
                                created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&file.id)
        .bind(&file.event_id)
        .bind(&file.name)
        .bind(&file.url)
        .bind(&file.content_type)
        .bind(file.size_bytes)
        .bind(&file.uploaded_by)
        .bind(&file.created_at)
        .execute(&self.pool)
        .await?;

        info!(file_id = %file.id, event_id = %file.event_id, size_bytes = file.size_bytes, "recorded file");
        Ok(file)
    }

    pub async fn delete(&self, id: &str) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM files WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("File"));
        }
        info!(file_id = %id, "deleted file record");
        Ok(())
    }
}
