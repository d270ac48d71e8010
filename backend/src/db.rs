use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, Row, Sqlite, SqlitePool};
use std::sync::Arc;

/// A stored user document together with the time it was last written
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub login: String,
    pub document: String,
    /// RFC 3339 timestamp
    pub updated_at: String,
}

/// DbConnection manages the per-user document table
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        let pool = SqlitePool::connect(url).await?;
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Close the pool so later queries fail
    #[cfg(test)]
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user_documents (
                login TEXT PRIMARY KEY,
                document TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Store a document, replacing whatever was stored for the same login.
    pub async fn put_document(&self, login: &str, document: &str, updated_at: &str) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO user_documents (login, document, updated_at) VALUES (?, ?, ?)",
        )
        .bind(login)
        .bind(document)
        .bind(updated_at)
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_document(&self, login: &str) -> Result<Option<StoredDocument>> {
        let row = sqlx::query("SELECT login, document, updated_at FROM user_documents WHERE login = ?")
            .bind(login)
            .fetch_optional(&*self.pool)
            .await?;

        Ok(row.map(|r| StoredDocument {
            login: r.get("login"),
            document: r.get("document"),
            updated_at: r.get("updated_at"),
        }))
    }

    /// Returns true if a document was deleted
    pub async fn delete_document(&self, login: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM user_documents WHERE login = ?")
            .bind(login)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All logins with a stored document, alphabetically
    pub async fn list_logins(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT login FROM user_documents ORDER BY login")
            .fetch_all(&*self.pool)
            .await?;
        Ok(rows.iter().map(|row| row.get("login")).collect())
    }
}
