use crate::rows::{self, like_pattern, USER_COLUMNS};
use crate::{count, db_err, SqliteStore};
use async_trait::async_trait;
use ic_core::error::Result;
use ic_core::models::{Profile, User, UserRef};
use ic_core::traits::{ProfileRepo, UserRepo};
use uuid::Uuid;

#[async_trait]
impl UserRepo for SqliteStore {
    async fn create_account(&self, user: &User, profile: &Profile) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, first_name, last_name, date_joined) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.date_joined)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        sqlx::query(
            "INSERT INTO profiles (user_id, avatar, bio, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(profile.user_id)
        .bind(&profile.avatar)
        .bind(&profile.bio)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(rows::user).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(rows::user).transpose()
    }

    async fn username_exists(&self, username: &str) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE username = ?)")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE email = ?)")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)
    }

    async fn search_users(&self, query: &str, exclude: Uuid, limit: i64) -> Result<Vec<UserRef>> {
        let pattern = like_pattern(query);
        let found = sqlx::query(
            "SELECT id, username FROM users \
             WHERE id <> ? AND (username LIKE ? ESCAPE '\\' OR email LIKE ? ESCAPE '\\') \
             ORDER BY username LIMIT ?",
        )
        .bind(exclude)
        .bind(&pattern)
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows::collect(found, rows::user_ref)
    }
}

#[async_trait]
impl ProfileRepo for SqliteStore {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let row = sqlx::query(
            "SELECT user_id, avatar, bio, created_at, updated_at FROM profiles WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.as_ref().map(rows::profile).transpose()
    }

    async fn update_profile(&self, profile: &Profile, first_name: &str, last_name: &str) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query("UPDATE profiles SET avatar = ?, bio = ?, updated_at = ? WHERE user_id = ?")
            .bind(&profile.avatar)
            .bind(&profile.bio)
            .bind(profile.updated_at)
            .bind(profile.user_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        sqlx::query("UPDATE users SET first_name = ?, last_name = ? WHERE id = ?")
            .bind(first_name)
            .bind(last_name)
            .bind(profile.user_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        tx.commit().await.map_err(db_err)
    }

    async fn friends_count(&self, user_id: Uuid) -> Result<u64> {
        let n: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM friend_requests \
             WHERE accepted = 1 AND (from_user_id = ? OR to_user_id = ?)",
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(count(n))
    }

    async fn items_count(&self, user_id: Uuid) -> Result<u64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE owner_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(count(n))
    }
}
