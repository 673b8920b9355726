use crate::rows::{self, FRIEND_REQUEST_SELECT};
use crate::{db_err, notifications, SqliteStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ic_core::error::Result;
use ic_core::models::{FriendRequest, Notification};
use ic_core::traits::FriendRepo;
use uuid::Uuid;

impl SqliteStore {
    /// Runs `filter` with every `?` placeholder bound to `user_id`.
    async fn friend_requests_where(&self, filter: &str, user_id: Uuid) -> Result<Vec<FriendRequest>> {
        let sql = format!("{FRIEND_REQUEST_SELECT} WHERE {filter} ORDER BY fr.created_at DESC, fr.id DESC");
        let mut query = sqlx::query(&sql);
        for _ in 0..filter.matches('?').count() {
            query = query.bind(user_id);
        }
        let found = query.fetch_all(&self.pool).await.map_err(db_err)?;
        rows::collect(found, rows::friend_request)
    }
}

#[async_trait]
impl FriendRepo for SqliteStore {
    async fn insert_friend_request(&self, request: &FriendRequest, notification: &Notification) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query(
            "INSERT INTO friend_requests (id, from_user_id, to_user_id, message, accepted, accepted_at, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(request.id)
        .bind(request.from_user.id)
        .bind(request.to_user.id)
        .bind(&request.message)
        .bind(request.accepted)
        .bind(request.accepted_at)
        .bind(request.created_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        notifications::insert(&mut *tx, notification).await?;
        tx.commit().await.map_err(db_err)
    }

    async fn get_friend_request(&self, id: Uuid) -> Result<Option<FriendRequest>> {
        let row = sqlx::query(&format!("{FRIEND_REQUEST_SELECT} WHERE fr.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(rows::friend_request).transpose()
    }

    async fn friend_request_exists(&self, from_user: Uuid, to_user: Uuid) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM friend_requests WHERE from_user_id = ? AND to_user_id = ?)",
        )
        .bind(from_user)
        .bind(to_user)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)
    }

    async fn accept_friend_request(
        &self,
        id: Uuid,
        accepted_at: DateTime<Utc>,
        notification: &Notification,
    ) -> Result<bool> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let done = sqlx::query(
            "UPDATE friend_requests SET accepted = 1, accepted_at = ? WHERE id = ? AND accepted = 0",
        )
        .bind(accepted_at)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;
        if done.rows_affected() == 0 {
            return Ok(false);
        }

        notifications::insert(&mut *tx, notification).await?;
        tx.commit().await.map_err(db_err)?;
        Ok(true)
    }

    async fn delete_friend_request(&self, id: Uuid) -> Result<bool> {
        let done = sqlx::query("DELETE FROM friend_requests WHERE id = ? AND accepted = 0")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(done.rows_affected() > 0)
    }

    async fn are_friends(&self, a: Uuid, b: Uuid) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM friend_requests WHERE accepted = 1 AND \
             ((from_user_id = ? AND to_user_id = ?) OR (from_user_id = ? AND to_user_id = ?)))",
        )
        .bind(a)
        .bind(b)
        .bind(b)
        .bind(a)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)
    }

    async fn incoming_pending(&self, user_id: Uuid) -> Result<Vec<FriendRequest>> {
        self.friend_requests_where("fr.to_user_id = ? AND fr.accepted = 0", user_id)
            .await
    }

    async fn outgoing_pending(&self, user_id: Uuid) -> Result<Vec<FriendRequest>> {
        self.friend_requests_where("fr.from_user_id = ? AND fr.accepted = 0", user_id)
            .await
    }

    async fn accepted_for(&self, user_id: Uuid) -> Result<Vec<FriendRequest>> {
        self.friend_requests_where(
            "fr.accepted = 1 AND (fr.from_user_id = ? OR fr.to_user_id = ?)",
            user_id,
        )
        .await
    }
}
