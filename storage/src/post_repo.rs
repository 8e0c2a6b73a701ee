//! Post repository: persistence and queries for post records.
//!
//! Uses SqlitePoolManager and the PostRecord model. Rows are append-only;
//! status-advancing updates are guarded by the caller-supplied set of
//! statuses the row must currently be in, so a lost race shows up as zero
//! affected rows instead of a silent overwrite.

use tracing::info;

use crate::models::PostRecord;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct PostRepository {
    pool_manager: SqlitePoolManager,
}

impl PostRepository {
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), sqlx::Error> {
        info!("Creating database tables if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS posts (
                id TEXT PRIMARY KEY,
                conversation_id TEXT NOT NULL,
                input_text TEXT NOT NULL,
                input_image_url TEXT,
                generated_content TEXT NOT NULL,
                feedback TEXT,
                poster_url TEXT,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        for index in [
            "CREATE INDEX IF NOT EXISTS idx_posts_conversation_id ON posts(conversation_id)",
            "CREATE INDEX IF NOT EXISTS idx_posts_status ON posts(status)",
            "CREATE INDEX IF NOT EXISTS idx_posts_created_at ON posts(created_at)",
        ] {
            sqlx::query(index).execute(pool).await?;
        }

        Ok(())
    }

    pub async fn save(&self, record: &PostRecord) -> Result<(), sqlx::Error> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            INSERT INTO posts (id, conversation_id, input_text, input_image_url,
                               generated_content, feedback, poster_url, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.conversation_id)
        .bind(&record.input_text)
        .bind(&record.input_image_url)
        .bind(&record.generated_content)
        .bind(&record.feedback)
        .bind(&record.poster_url)
        .bind(&record.status)
        .bind(record.created_at)
        .execute(pool)
        .await?;

        info!(
            "Saved post: id={}, conversation_id={}, status={}",
            record.id, record.conversation_id, record.status
        );
        Ok(())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<PostRecord>, sqlx::Error> {
        let pool = self.pool_manager.pool();

        sqlx::query_as::<_, PostRecord>("SELECT * FROM posts WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Most recent row for the conversation; rowid breaks created_at ties.
    pub async fn latest_for_conversation(
        &self,
        conversation_id: &str,
    ) -> Result<Option<PostRecord>, sqlx::Error> {
        let pool = self.pool_manager.pool();

        sqlx::query_as::<_, PostRecord>(
            "SELECT * FROM posts WHERE conversation_id = ? \
             ORDER BY created_at DESC, rowid DESC LIMIT 1",
        )
        .bind(conversation_id)
        .fetch_optional(pool)
        .await
    }

    /// Most recent row for the conversation among the given statuses.
    pub async fn latest_with_status_in(
        &self,
        conversation_id: &str,
        statuses: &[&str],
    ) -> Result<Option<PostRecord>, sqlx::Error> {
        // SQLite rejects an empty IN ().
        if statuses.is_empty() {
            return Ok(None);
        }

        let pool = self.pool_manager.pool();
        let placeholders = vec!["?"; statuses.len()].join(", ");
        let sql = format!(
            "SELECT * FROM posts WHERE conversation_id = ? AND status IN ({}) \
             ORDER BY created_at DESC, rowid DESC LIMIT 1",
            placeholders
        );

        let mut query = sqlx::query_as::<_, PostRecord>(&sql).bind(conversation_id);
        for status in statuses {
            query = query.bind(*status);
        }

        query.fetch_optional(pool).await
    }

    /// Overwrites content and feedback on a row still in `draft`.
    /// Returns the number of affected rows (0 when the guard failed).
    pub async fn update_content(
        &self,
        id: &str,
        content: &str,
        feedback: &str,
    ) -> Result<u64, sqlx::Error> {
        let pool = self.pool_manager.pool();

        let result =
            sqlx::query("UPDATE posts SET generated_content = ?, feedback = ? WHERE id = ? AND status = 'draft'")
                .bind(content)
                .bind(feedback)
                .bind(id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected())
    }

    /// Sets the poster URL and moves the row to `poster_approved` when its
    /// current status is in `allowed`. Returns affected rows.
    pub async fn update_poster(
        &self,
        id: &str,
        poster_url: &str,
        allowed: &[&str],
    ) -> Result<u64, sqlx::Error> {
        let pool = self.pool_manager.pool();
        let placeholders = vec!["?"; allowed.len()].join(", ");
        let sql = format!(
            "UPDATE posts SET poster_url = ?, status = 'poster_approved' \
             WHERE id = ? AND status IN ({})",
            placeholders
        );

        let mut query = sqlx::query(&sql).bind(poster_url).bind(id);
        for status in allowed {
            query = query.bind(*status);
        }

        let result = query.execute(pool).await?;
        Ok(result.rows_affected())
    }

    /// Moves the row to `new_status` when its current status is in
    /// `allowed`. Returns affected rows.
    pub async fn update_status(
        &self,
        id: &str,
        allowed: &[&str],
        new_status: &str,
    ) -> Result<u64, sqlx::Error> {
        let pool = self.pool_manager.pool();
        let placeholders = vec!["?"; allowed.len()].join(", ");
        let sql = format!(
            "UPDATE posts SET status = ? WHERE id = ? AND status IN ({})",
            placeholders
        );

        let mut query = sqlx::query(&sql).bind(new_status).bind(id);
        for status in allowed {
            query = query.bind(*status);
        }

        let result = query.execute(pool).await?;
        Ok(result.rows_affected())
    }
}
