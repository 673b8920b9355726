use crate::rows::{self, SWAP_REQUEST_SELECT};
use crate::{count, db_err, notifications, SqliteStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ic_core::error::Result;
use ic_core::models::{Notification, SwapRequest, SwapStatus};
use ic_core::traits::{SwapDirection, SwapRepo};
use uuid::Uuid;

fn party_column(direction: SwapDirection) -> &'static str {
    match direction {
        SwapDirection::Incoming => "receiver_id",
        SwapDirection::Outgoing => "sender_id",
    }
}

#[async_trait]
impl SwapRepo for SqliteStore {
    async fn insert_swap_request(&self, request: &SwapRequest, notification: &Notification) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query(
            "INSERT INTO swap_requests (id, sender_id, receiver_id, item_id, message, status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(request.id)
        .bind(request.sender.id)
        .bind(request.receiver.id)
        .bind(request.item.id)
        .bind(&request.message)
        .bind(request.status.as_str())
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        notifications::insert(&mut *tx, notification).await?;
        tx.commit().await.map_err(db_err)
    }

    async fn get_swap_request(&self, id: Uuid) -> Result<Option<SwapRequest>> {
        let row = sqlx::query(&format!("{SWAP_REQUEST_SELECT} WHERE sr.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(rows::swap_request).transpose()
    }

    async fn transition_swap_request(
        &self,
        id: Uuid,
        from: SwapStatus,
        to: SwapStatus,
        at: DateTime<Utc>,
        notification: Option<Notification>,
    ) -> Result<bool> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let done = sqlx::query("UPDATE swap_requests SET status = ?, updated_at = ? WHERE id = ? AND status = ?")
            .bind(to.as_str())
            .bind(at)
            .bind(id)
            .bind(from.as_str())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        if done.rows_affected() == 0 {
            return Ok(false);
        }

        if let Some(notification) = &notification {
            notifications::insert(&mut *tx, notification).await?;
        }
        tx.commit().await.map_err(db_err)?;
        Ok(true)
    }

    async fn complete_swap_request(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let done = sqlx::query(
            "UPDATE swap_requests SET status = 'completed', updated_at = ? WHERE id = ? AND status = 'accepted'",
        )
        .bind(at)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;
        if done.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query(
            "UPDATE items SET is_available = 0, updated_at = ? \
             WHERE id = (SELECT item_id FROM swap_requests WHERE id = ?)",
        )
        .bind(at)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;
        Ok(true)
    }

    async fn count_swap_requests(&self, user_id: Uuid, direction: SwapDirection) -> Result<u64> {
        let column = party_column(direction);
        let n: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM swap_requests WHERE {column} = ?"))
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(count(n))
    }

    async fn list_swap_requests(
        &self,
        user_id: Uuid,
        direction: SwapDirection,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SwapRequest>> {
        let column = party_column(direction);
        let found = sqlx::query(&format!(
            "{SWAP_REQUEST_SELECT} WHERE sr.{column} = ? \
             ORDER BY sr.created_at DESC, sr.id DESC LIMIT ? OFFSET ?"
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows::collect(found, rows::swap_request)
    }
}
