use super::traits::{CredentialStore, InsertUserError, NewUser, TaskRecord, TaskStore, UserRecord};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use chrono::Utc;
use libsql::{Builder, Connection, Database, Row};

/// libsql-backed store for users and tasks.
pub struct TursoClient {
    _db: Database,
    conn: Connection,
}

fn db_err(e: libsql::Error) -> AppError {
    AppError::StoreUnavailable(e.to_string())
}

impl TursoClient {
    /// Opens (or creates) a SQLite database file.
    pub async fn new_local(path: &str) -> Result<Self> {
        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::StoreUnavailable(format!("Failed to open database: {}", e)))?;

        Self::from_database(db).await
    }

    /// Opens a private in-memory database.
    pub async fn new_memory() -> Result<Self> {
        Self::new_local(":memory:").await
    }

    async fn from_database(db: Database) -> Result<Self> {
        // One shared connection: a `:memory:` database lives only as long as
        // the connection that created it.
        let conn = db
            .connect()
            .map_err(|e| AppError::StoreUnavailable(format!("Failed to get connection: {}", e)))?;

        let client = Self { _db: db, conn };
        client.initialize_schema().await?;

        Ok(client)
    }

    pub fn connection(&self) -> Result<Connection> {
        Ok(self.conn.clone())
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection()?;

        // Users table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                name TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                display_name TEXT,
                created_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AppError::StoreUnavailable(format!("Failed to create users table: {}", e)))?;

        // Tasks table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                owner_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                status INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                deleted_at INTEGER,
                FOREIGN KEY (owner_id) REFERENCES users(id)
            )",
            (),
        )
        .await
        .map_err(|e| AppError::StoreUnavailable(format!("Failed to create tasks table: {}", e)))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_tasks_owner ON tasks (owner_id, deleted_at)",
            (),
        )
        .await
        .map_err(|e| AppError::StoreUnavailable(format!("Failed to create tasks index: {}", e)))?;

        Ok(())
    }

    async fn query_user(&self, sql: &str, param: libsql::Value) -> Result<Option<UserRecord>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(sql, [param])
            .await
            .map_err(|e| AppError::StoreUnavailable(format!("Failed to query user: {}", e)))?;

        match rows.next().await.map_err(db_err)? {
            Some(row) => Ok(Some(user_from_row(&row)?)),
            None => Ok(None),
        }
    }
}

fn user_from_row(row: &Row) -> Result<UserRecord> {
    Ok(UserRecord {
        id: row.get(0).map_err(db_err)?,
        name: row.get(1).map_err(db_err)?,
        password_hash: row.get(2).map_err(db_err)?,
        display_name: row.get(3).map_err(db_err)?,
        created_at: row.get(4).map_err(db_err)?,
    })
}

fn task_from_row(row: &Row) -> Result<TaskRecord> {
    Ok(TaskRecord {
        id: row.get(0).map_err(db_err)?,
        owner_id: row.get(1).map_err(db_err)?,
        title: row.get(2).map_err(db_err)?,
        status: row.get::<i64>(3).map_err(db_err)? != 0,
        created_at: row.get(4).map_err(db_err)?,
        updated_at: row.get(5).map_err(db_err)?,
    })
}

const SQLITE_CONSTRAINT: i32 = 19;
const SQLITE_CONSTRAINT_PRIMARYKEY: i32 = 1555;
const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;

/// Maps a failed `users` insert to the key it collided on.
///
/// The extended result code decides when SQLite reports one; a plain
/// `SQLITE_CONSTRAINT` falls back to the column named in the message.
fn constraint_violation(err: &libsql::Error, id: i64) -> Option<InsertUserError> {
    let libsql::Error::SqliteFailure(code, message) = err else {
        return None;
    };
    if code & 0xff != SQLITE_CONSTRAINT {
        return None;
    }

    match *code {
        SQLITE_CONSTRAINT_PRIMARYKEY => Some(InsertUserError::DuplicateId(id)),
        SQLITE_CONSTRAINT_UNIQUE | SQLITE_CONSTRAINT if message.contains("users.name") => {
            Some(InsertUserError::DuplicateName)
        }
        SQLITE_CONSTRAINT_UNIQUE | SQLITE_CONSTRAINT if message.contains("users.id") => {
            Some(InsertUserError::DuplicateId(id))
        }
        _ => None,
    }
}

const TASK_COLUMNS: &str = "id, owner_id, title, status, created_at, updated_at";

#[async_trait]
impl CredentialStore for TursoClient {
    async fn insert_user(&self, user: NewUser<'_>) -> std::result::Result<(), InsertUserError> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        conn.execute(
            "INSERT INTO users (id, name, password_hash, display_name, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                user.id,
                user.name,
                user.password_hash,
                user.display_name,
                now,
            ),
        )
        .await
        .map_err(|e| match constraint_violation(&e, user.id) {
            Some(violation) => violation,
            None => InsertUserError::Store(AppError::StoreUnavailable(format!(
                "Failed to create user: {}",
                e
            ))),
        })?;

        Ok(())
    }

    async fn get_user_by_name(&self, name: &str) -> Result<Option<UserRecord>> {
        self.query_user(
            "SELECT id, name, password_hash, display_name, created_at
             FROM users WHERE name = ?1",
            name.into(),
        )
        .await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<UserRecord>> {
        self.query_user(
            "SELECT id, name, password_hash, display_name, created_at
             FROM users WHERE id = ?1",
            id.into(),
        )
        .await
    }

    async fn max_user_id(&self) -> Result<Option<i64>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query("SELECT MAX(id) FROM users", ())
            .await
            .map_err(|e| AppError::StoreUnavailable(format!("Failed to query max id: {}", e)))?;

        match rows.next().await.map_err(db_err)? {
            Some(row) => row.get::<Option<i64>>(0).map_err(db_err),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl TaskStore for TursoClient {
    async fn create_task(&self, owner_id: i64, title: &str) -> Result<TaskRecord> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        let mut rows = conn
            .query(
                &format!(
                    "INSERT INTO tasks (owner_id, title, status, created_at, updated_at)
                     VALUES (?1, ?2, 0, ?3, ?3) RETURNING {}",
                    TASK_COLUMNS
                ),
                (owner_id, title, now),
            )
            .await
            .map_err(|e| AppError::StoreUnavailable(format!("Failed to create task: {}", e)))?;

        match rows.next().await.map_err(db_err)? {
            Some(row) => task_from_row(&row),
            None => Err(AppError::StoreUnavailable(
                "Task insert returned no row".to_string(),
            )),
        }
    }

    async fn list_tasks(&self, owner_id: i64) -> Result<Vec<TaskRecord>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                &format!(
                    "SELECT {} FROM tasks
                     WHERE owner_id = ?1 AND deleted_at IS NULL ORDER BY id ASC",
                    TASK_COLUMNS
                ),
                [owner_id],
            )
            .await
            .map_err(|e| AppError::StoreUnavailable(format!("Failed to query tasks: {}", e)))?;

        let mut tasks = Vec::new();
        while let Some(row) = rows.next().await.map_err(db_err)? {
            tasks.push(task_from_row(&row)?);
        }

        Ok(tasks)
    }

    async fn get_task(&self, owner_id: i64, id: i64) -> Result<Option<TaskRecord>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                &format!(
                    "SELECT {} FROM tasks
                     WHERE id = ?1 AND owner_id = ?2 AND deleted_at IS NULL",
                    TASK_COLUMNS
                ),
                (id, owner_id),
            )
            .await
            .map_err(|e| AppError::StoreUnavailable(format!("Failed to query task: {}", e)))?;

        match rows.next().await.map_err(db_err)? {
            Some(row) => Ok(Some(task_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn update_task_status(&self, owner_id: i64, id: i64, status: bool) -> Result<bool> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        let changed = conn
            .execute(
                "UPDATE tasks SET status = ?1, updated_at = ?2
                 WHERE id = ?3 AND owner_id = ?4 AND deleted_at IS NULL",
                (status as i64, now, id, owner_id),
            )
            .await
            .map_err(|e| AppError::StoreUnavailable(format!("Failed to update task: {}", e)))?;

        Ok(changed > 0)
    }

    async fn delete_task(&self, owner_id: i64, id: i64) -> Result<bool> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        let changed = conn
            .execute(
                "UPDATE tasks SET deleted_at = ?1
                 WHERE id = ?2 AND owner_id = ?3 AND deleted_at IS NULL",
                (now, id, owner_id),
            )
            .await
            .map_err(|e| AppError::StoreUnavailable(format!("Failed to delete task: {}", e)))?;

        Ok(changed > 0)
    }
}
