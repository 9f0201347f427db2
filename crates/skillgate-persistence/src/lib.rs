use anyhow::{Context, Result};
use async_trait::async_trait;
use skillgate_skills::TodoSource;
use skillgate_types::TodoItem;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::{debug, info};

/// Persistence service storing todo tasks in SQLite
#[derive(Debug, Clone)]
pub struct PersistenceService {
    pool: SqlitePool,
}

impl PersistenceService {
    /// Open (or create) the database at `database_path`
    pub async fn new(database_path: &str) -> Result<Self> {
        let database_url = format!("sqlite:{}?mode=rwc", database_path);
        let pool = SqlitePool::connect(&database_url)
            .await
            .with_context(|| format!("Failed to open database {database_path}"))?;

        let service = Self { pool };
        service.run_migrations().await?;

        info!("Persistence service initialized with database: {}", database_path);
        Ok(service)
    }

    /// Private in-memory database, gone when the service is dropped
    pub async fn in_memory() -> Result<Self> {
        // Every connection to `sqlite::memory:` sees its own database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let service = Self { pool };
        service.run_migrations().await?;
        Ok(service)
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS todos (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT UNIQUE NOT NULL,
                title TEXT NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Database migrations completed");
        Ok(())
    }

    /// Save a new task and return it
    pub async fn add_todo(&self, title: &str) -> Result<TodoItem> {
        let item = TodoItem::new(title);

        sqlx::query(
            r#"
            INSERT INTO todos (id, title, completed, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&item.id)
        .bind(&item.title)
        .bind(item.completed)
        .bind(item.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!("Saved todo {}: {}", item.id, item.title);
        Ok(item)
    }

    /// Mark a task as done or not done. Returns false when no task has `id`.
    pub async fn set_completed(&self, id: &str, completed: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE todos SET completed = ? WHERE id = ?")
            .bind(completed)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All tasks in creation order
    pub async fn get_todos(&self) -> Result<Vec<TodoItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, completed, created_at
            FROM todos
            ORDER BY seq ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(todo_from_row).collect()
    }
}

fn todo_from_row(row: &SqliteRow) -> Result<TodoItem> {
    let created_at: String = row.get("created_at");
    let created_at = chrono::DateTime::parse_from_rfc3339(&created_at)
        .with_context(|| format!("Invalid created_at timestamp: {created_at}"))?
        .with_timezone(&chrono::Utc);

    Ok(TodoItem {
        id: row.get("id"),
        title: row.get("title"),
        completed: row.get("completed"),
        created_at,
    })
}

#[async_trait]
impl TodoSource for PersistenceService {
    async fn get_items(&self) -> Result<Vec<TodoItem>> {
        self.get_todos().await
    }
}
