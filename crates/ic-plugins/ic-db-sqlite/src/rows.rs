//! Column lists and row → domain mapping shared by the repositories.

use crate::db_err;
use ic_core::error::{AppError, Result};
use ic_core::models::{
    FriendRequest, Item, ItemRef, Notification, Profile, SwapRequest, UnknownChoice, User, UserRef,
};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;

pub(crate) const USER_COLUMNS: &str =
    "id, username, email, password_hash, first_name, last_name, date_joined";

pub(crate) const ITEM_SELECT: &str = "SELECT i.id, i.owner_id, u.username AS owner_username, \
     i.title, i.description, i.photo, i.category, i.size, i.condition, i.is_available, \
     i.created_at, i.updated_at \
     FROM items i JOIN users u ON u.id = i.owner_id";

pub(crate) const FRIEND_REQUEST_SELECT: &str = "SELECT fr.id, \
     fr.from_user_id, fu.username AS from_username, \
     fr.to_user_id, tu.username AS to_username, \
     fr.message, fr.accepted, fr.accepted_at, fr.created_at \
     FROM friend_requests fr \
     JOIN users fu ON fu.id = fr.from_user_id \
     JOIN users tu ON tu.id = fr.to_user_id";

pub(crate) const SWAP_REQUEST_SELECT: &str = "SELECT sr.id, \
     sr.sender_id, su.username AS sender_username, \
     sr.receiver_id, ru.username AS receiver_username, \
     sr.item_id, i.title AS item_title, \
     sr.message, sr.status, sr.created_at, sr.updated_at \
     FROM swap_requests sr \
     JOIN users su ON su.id = sr.sender_id \
     JOIN users ru ON ru.id = sr.receiver_id \
     JOIN items i ON i.id = sr.item_id";

pub(crate) const NOTIFICATION_COLUMNS: &str =
    "id, user_id, text, notification_type, is_read, read_at, created_at";

fn choice<T>(row: &SqliteRow, column: &str) -> Result<T>
where
    T: FromStr<Err = UnknownChoice>,
{
    let raw: String = row.try_get(column).map_err(db_err)?;
    raw.parse()
        .map_err(|e: UnknownChoice| AppError::Internal(format!("corrupt {column}: {e}")))
}

pub(crate) fn user(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id").map_err(db_err)?,
        username: row.try_get("username").map_err(db_err)?,
        email: row.try_get("email").map_err(db_err)?,
        password_hash: row.try_get("password_hash").map_err(db_err)?,
        first_name: row.try_get("first_name").map_err(db_err)?,
        last_name: row.try_get("last_name").map_err(db_err)?,
        date_joined: row.try_get("date_joined").map_err(db_err)?,
    })
}

pub(crate) fn user_ref(row: &SqliteRow) -> Result<UserRef> {
    Ok(UserRef {
        id: row.try_get("id").map_err(db_err)?,
        username: row.try_get("username").map_err(db_err)?,
    })
}

pub(crate) fn profile(row: &SqliteRow) -> Result<Profile> {
    Ok(Profile {
        user_id: row.try_get("user_id").map_err(db_err)?,
        avatar: row.try_get("avatar").map_err(db_err)?,
        bio: row.try_get("bio").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
        updated_at: row.try_get("updated_at").map_err(db_err)?,
    })
}

pub(crate) fn item(row: &SqliteRow) -> Result<Item> {
    let size: Option<String> = row.try_get("size").map_err(db_err)?;
    let size = size
        .map(|s| s.parse())
        .transpose()
        .map_err(|e: UnknownChoice| AppError::Internal(format!("corrupt size: {e}")))?;

    Ok(Item {
        id: row.try_get("id").map_err(db_err)?,
        owner: UserRef {
            id: row.try_get("owner_id").map_err(db_err)?,
            username: row.try_get("owner_username").map_err(db_err)?,
        },
        title: row.try_get("title").map_err(db_err)?,
        description: row.try_get("description").map_err(db_err)?,
        photo: row.try_get("photo").map_err(db_err)?,
        category: choice(row, "category")?,
        size,
        condition: choice(row, "condition")?,
        is_available: row.try_get("is_available").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
        updated_at: row.try_get("updated_at").map_err(db_err)?,
    })
}

pub(crate) fn friend_request(row: &SqliteRow) -> Result<FriendRequest> {
    Ok(FriendRequest {
        id: row.try_get("id").map_err(db_err)?,
        from_user: UserRef {
            id: row.try_get("from_user_id").map_err(db_err)?,
            username: row.try_get("from_username").map_err(db_err)?,
        },
        to_user: UserRef {
            id: row.try_get("to_user_id").map_err(db_err)?,
            username: row.try_get("to_username").map_err(db_err)?,
        },
        message: row.try_get("message").map_err(db_err)?,
        accepted: row.try_get("accepted").map_err(db_err)?,
        accepted_at: row.try_get("accepted_at").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}

pub(crate) fn swap_request(row: &SqliteRow) -> Result<SwapRequest> {
    Ok(SwapRequest {
        id: row.try_get("id").map_err(db_err)?,
        sender: UserRef {
            id: row.try_get("sender_id").map_err(db_err)?,
            username: row.try_get("sender_username").map_err(db_err)?,
        },
        receiver: UserRef {
            id: row.try_get("receiver_id").map_err(db_err)?,
            username: row.try_get("receiver_username").map_err(db_err)?,
        },
        item: ItemRef {
            id: row.try_get("item_id").map_err(db_err)?,
            title: row.try_get("item_title").map_err(db_err)?,
        },
        message: row.try_get("message").map_err(db_err)?,
        status: choice(row, "status")?,
        created_at: row.try_get("created_at").map_err(db_err)?,
        updated_at: row.try_get("updated_at").map_err(db_err)?,
    })
}

pub(crate) fn notification(row: &SqliteRow) -> Result<Notification> {
    Ok(Notification {
        id: row.try_get("id").map_err(db_err)?,
        user_id: row.try_get("user_id").map_err(db_err)?,
        text: row.try_get("text").map_err(db_err)?,
        notification_type: choice(row, "notification_type")?,
        read: row.try_get("is_read").map_err(db_err)?,
        read_at: row.try_get("read_at").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}

pub(crate) fn collect<T>(rows: Vec<SqliteRow>, map: fn(&SqliteRow) -> Result<T>) -> Result<Vec<T>> {
    rows.iter().map(map).collect()
}

/// Escapes `%`, `_` and `\` for a `LIKE ... ESCAPE '\'` pattern.
pub(crate) fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
