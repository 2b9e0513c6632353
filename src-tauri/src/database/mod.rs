use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::Pool;
use sqlx::Sqlite;
use thiserror::Error;
use tokio::sync::RwLock;

pub mod history;

pub struct Database {
    db: RwLock<Option<Pool<Sqlite>>>,
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database is not opened")]
    NotOpened,
    #[error("Entry not found")]
    NotFound,
    #[error("Number exceed i64 range")]
    NumberExceedI64Range,
    #[error("Invalid row: {0}")]
    InvalidRow(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("DB error: {0}")]
    DB(#[from] sqlx::Error),
}

impl From<DatabaseError> for String {
    fn from(err: DatabaseError) -> Self {
        err.to_string()
    }
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    platform TEXT NOT NULL,
    anchor TEXT NOT NULL,
    room_id INTEGER NOT NULL,
    category TEXT NOT NULL,
    last_title TEXT NOT NULL,
    last_play_time TEXT NOT NULL,
    UNIQUE (platform, room_id)
)";

impl Database {
    pub fn new() -> Database {
        Database {
            db: RwLock::new(None),
        }
    }

    /// Opens the sqlite file at `path`, creating it and the schema when missing.
    pub async fn open(&self, path: &str) -> Result<(), DatabaseError> {
        if let Some(dir) = std::path::Path::new(path).parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let options =
            SqliteConnectOptions::from_str(&format!("sqlite://{}", path))?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        self.set(pool).await?;
        log::info!("Database opened: {}", path);
        Ok(())
    }

    /// In-memory database, one connection so every query sees the same data.
    pub async fn open_in_memory(&self) -> Result<(), DatabaseError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        self.set(pool).await
    }

    pub async fn set(&self, p: Pool<Sqlite>) -> Result<(), DatabaseError> {
        sqlx::query(SCHEMA).execute(&p).await?;
        *self.db.write().await = Some(p);
        Ok(())
    }

    async fn pool(&self) -> Result<Pool<Sqlite>, DatabaseError> {
        self.db.read().await.clone().ok_or(DatabaseError::NotOpened)
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}
