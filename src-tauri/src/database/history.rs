use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use resolver::errors::HistoryError;
use resolver::platforms::Platform;
use resolver::traits::HistoryStore;
use resolver::HistoryRecord;

use super::Database;
use super::DatabaseError;

#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct HistoryRow {
    pub id: i64,
    pub platform: String,
    pub anchor: String,
    pub room_id: i64,
    pub category: String,
    pub last_title: String,
    pub last_play_time: String,
}

impl HistoryRow {
    pub fn to_record(&self) -> Result<HistoryRecord, DatabaseError> {
        let platform = self
            .platform
            .parse::<Platform>()
            .map_err(DatabaseError::InvalidRow)?;
        let last_play_time = DateTime::parse_from_rfc3339(&self.last_play_time)
            .map_err(|e| DatabaseError::InvalidRow(e.to_string()))?
            .with_timezone(&Utc);
        Ok(HistoryRecord {
            id: self.id,
            platform,
            anchor: self.anchor.clone(),
            room_id: u64::try_from(self.room_id)
                .map_err(|_| DatabaseError::InvalidRow(format!("room_id {}", self.room_id)))?,
            category: self.category.clone(),
            last_title: self.last_title.clone(),
            last_play_time,
        })
    }
}

// CREATE TABLE history (id INTEGER PRIMARY KEY, platform TEXT, anchor TEXT, room_id INTEGER, category TEXT, last_title TEXT, last_play_time TEXT);
impl Database {
    /// Inserts a play record, or refreshes the existing one of the same room.
    pub async fn add_history(&self, record: &HistoryRecord) -> Result<(), DatabaseError> {
        let lock = self.pool().await?;
        let room_id =
            i64::try_from(record.room_id).map_err(|_| DatabaseError::NumberExceedI64Range)?;
        sqlx::query(
            "INSERT INTO history (platform, anchor, room_id, category, last_title, last_play_time) VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (platform, room_id) DO UPDATE SET anchor = excluded.anchor, category = excluded.category, last_title = excluded.last_title, last_play_time = excluded.last_play_time",
        )
        .bind(record.platform.as_str())
        .bind(&record.anchor)
        .bind(room_id)
        .bind(&record.category)
        .bind(&record.last_title)
        .bind(
            record
                .last_play_time
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        )
        .execute(&lock)
        .await?;
        Ok(())
    }

    /// Most recently played first
    pub async fn get_history(&self) -> Result<Vec<HistoryRow>, DatabaseError> {
        let lock = self.pool().await?;
        Ok(sqlx::query_as::<_, HistoryRow>(
            "SELECT * FROM history ORDER BY last_play_time DESC, id DESC",
        )
        .fetch_all(&lock)
        .await?)
    }

    pub async fn remove_history(&self, id: i64) -> Result<(), DatabaseError> {
        let lock = self.pool().await?;
        let sql = sqlx::query("DELETE FROM history WHERE id = $1")
            .bind(id)
            .execute(&lock)
            .await?;
        if sql.rows_affected() != 1 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for Database {
    async fn persist(&self, record: &HistoryRecord) -> Result<(), HistoryError> {
        self.add_history(record)
            .await
            .map_err(|e| HistoryError::Store(e.to_string()))
    }

    async fn list(&self) -> Result<Vec<HistoryRecord>, HistoryError> {
        let rows = self
            .get_history()
            .await
            .map_err(|e| HistoryError::Store(e.to_string()))?;
        rows.iter()
            .map(|row| {
                row.to_record()
                    .map_err(|e| HistoryError::Store(e.to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(platform: Platform, room_id: u64, title: &str, played_at: DateTime<Utc>) -> HistoryRecord {
        HistoryRecord {
            id: 0,
            platform,
            anchor: "主播".to_string(),
            room_id,
            category: "单机游戏".to_string(),
            last_title: title.to_string(),
            last_play_time: played_at,
        }
    }

    async fn memory_db() -> Database {
        let db = Database::new();
        db.open_in_memory().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_not_opened() {
        let db = Database::new();
        assert!(matches!(db.get_history().await, Err(DatabaseError::NotOpened)));
    }

    #[tokio::test]
    async fn test_history_newest_first() {
        let db = memory_db().await;
        let now = Utc::now();
        db.persist(&record(Platform::Douyu, 1, "older", now - Duration::minutes(5)))
            .await
            .unwrap();
        db.persist(&record(Platform::Huya, 2, "newer", now)).await.unwrap();

        let records = db.list().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].last_title, "newer");
        assert_eq!(records[0].platform, Platform::Huya);
        assert_eq!(records[1].room_id, 1);
        assert!(records[0].id > 0);
    }

    #[tokio::test]
    async fn test_same_room_is_updated() {
        let db = memory_db().await;
        let now = Utc::now();
        db.persist(&record(Platform::Douyu, 1, "first", now - Duration::hours(1)))
            .await
            .unwrap();
        db.persist(&record(Platform::Douyu, 1, "second", now)).await.unwrap();
        db.persist(&record(Platform::Bigo, 1, "other platform", now))
            .await
            .unwrap();

        let records = db.list().await.unwrap();
        assert_eq!(records.len(), 2);
        let douyu = records
            .iter()
            .find(|r| r.platform == Platform::Douyu)
            .unwrap();
        assert_eq!(douyu.last_title, "second");
    }

    #[tokio::test]
    async fn test_remove_history() {
        let db = memory_db().await;
        db.persist(&record(Platform::Douyin, 7, "t", Utc::now()))
            .await
            .unwrap();
        let id = db.list().await.unwrap()[0].id;

        db.remove_history(id).await.unwrap();
        assert!(db.list().await.unwrap().is_empty());
        assert!(matches!(
            db.remove_history(id).await,
            Err(DatabaseError::NotFound)
        ));
    }
}
