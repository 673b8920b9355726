use crate::rows::{self, NOTIFICATION_COLUMNS};
use crate::{count, db_err, SqliteStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ic_core::error::Result;
use ic_core::models::Notification;
use ic_core::traits::NotificationRepo;
use sqlx::SqliteConnection;
use uuid::Uuid;

/// Inserts a notification on the caller's connection, so it commits or
/// rolls back with the transition that produced it.
pub(crate) async fn insert(conn: &mut SqliteConnection, notification: &Notification) -> Result<()> {
    sqlx::query(
        "INSERT INTO notifications (id, user_id, text, notification_type, is_read, read_at, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(notification.id)
    .bind(notification.user_id)
    .bind(&notification.text)
    .bind(notification.notification_type.as_str())
    .bind(notification.read)
    .bind(notification.read_at)
    .bind(notification.created_at)
    .execute(conn)
    .await
    .map_err(db_err)?;
    Ok(())
}

#[async_trait]
impl NotificationRepo for SqliteStore {
    async fn get_notification(&self, id: Uuid) -> Result<Option<Notification>> {
        let row = sqlx::query(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.as_ref().map(rows::notification).transpose()
    }

    async fn count_notifications(&self, user_id: Uuid) -> Result<u64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(count(n))
    }

    async fn list_notifications(&self, user_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Notification>> {
        let found = sqlx::query(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE user_id = ? \
             ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows::collect(found, rows::notification)
    }

    async fn unread_count(&self, user_id: Uuid) -> Result<u64> {
        let n: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ? AND is_read = 0",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(count(n))
    }

    async fn mark_read(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool> {
        let done = sqlx::query(
            "UPDATE notifications SET is_read = 1, read_at = ? WHERE id = ? AND is_read = 0",
        )
        .bind(at)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(done.rows_affected() > 0)
    }
}
