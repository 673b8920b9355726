use crate::rows::{self, ITEM_SELECT};
use crate::{count, db_err, SqliteStore};
use async_trait::async_trait;
use ic_core::error::Result;
use ic_core::models::Item;
use ic_core::traits::ItemRepo;
use uuid::Uuid;

/// Available items of the viewer or of anyone holding an accepted friend
/// request with the viewer, in either direction. Binds the viewer three times.
const FEED_FILTER: &str = "i.is_available = 1 AND ( \
         i.owner_id = ? \
      OR i.owner_id IN (SELECT to_user_id FROM friend_requests WHERE accepted = 1 AND from_user_id = ?) \
      OR i.owner_id IN (SELECT from_user_id FROM friend_requests WHERE accepted = 1 AND to_user_id = ?))";

const NEWEST_FIRST: &str = "ORDER BY i.created_at DESC, i.id DESC";

#[async_trait]
impl ItemRepo for SqliteStore {
    async fn insert_item(&self, item: &Item) -> Result<()> {
        sqlx::query(
            "INSERT INTO items (id, owner_id, title, description, photo, category, size, condition, \
             is_available, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(item.id)
        .bind(item.owner.id)
        .bind(&item.title)
        .bind(&item.description)
        .bind(&item.photo)
        .bind(item.category.as_str())
        .bind(item.size.map(|s| s.as_str()))
        .bind(item.condition.as_str())
        .bind(item.is_available)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn get_item(&self, id: Uuid) -> Result<Option<Item>> {
        let row = sqlx::query(&format!("{ITEM_SELECT} WHERE i.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(rows::item).transpose()
    }

    async fn update_item(&self, item: &Item) -> Result<()> {
        sqlx::query(
            "UPDATE items SET title = ?, description = ?, photo = ?, category = ?, size = ?, \
             condition = ?, is_available = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&item.title)
        .bind(&item.description)
        .bind(&item.photo)
        .bind(item.category.as_str())
        .bind(item.size.map(|s| s.as_str()))
        .bind(item.condition.as_str())
        .bind(item.is_available)
        .bind(item.updated_at)
        .bind(item.id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn delete_item(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn count_feed(&self, viewer: Uuid) -> Result<u64> {
        let n: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM items i WHERE {FEED_FILTER}"))
            .bind(viewer)
            .bind(viewer)
            .bind(viewer)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(count(n))
    }

    async fn list_feed(&self, viewer: Uuid, limit: i64, offset: i64) -> Result<Vec<Item>> {
        let found = sqlx::query(&format!(
            "{ITEM_SELECT} WHERE {FEED_FILTER} {NEWEST_FIRST} LIMIT ? OFFSET ?"
        ))
        .bind(viewer)
        .bind(viewer)
        .bind(viewer)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows::collect(found, rows::item)
    }

    async fn count_owned(&self, owner: Uuid, available_only: bool) -> Result<u64> {
        let n: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM items WHERE owner_id = ? AND (? = 0 OR is_available = 1)",
        )
        .bind(owner)
        .bind(available_only)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(count(n))
    }

    async fn list_owned(
        &self,
        owner: Uuid,
        available_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Item>> {
        let found = sqlx::query(&format!(
            "{ITEM_SELECT} WHERE i.owner_id = ? AND (? = 0 OR i.is_available = 1) \
             {NEWEST_FIRST} LIMIT ? OFFSET ?"
        ))
        .bind(owner)
        .bind(available_only)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows::collect(found, rows::item)
    }
}
