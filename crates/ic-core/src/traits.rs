//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.
//! Each write method is one store transaction: a state change and the
//! notification it emits either both persist or neither does.

use crate::error::Result;
use crate::models::{
    FriendRequest, Item, Notification, Profile, SwapRequest, SwapStatus, User, UserRef,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

/// Identity store.
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Inserts the user together with its profile.
    async fn create_account(&self, user: &User, profile: &Profile) -> Result<()>;
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn username_exists(&self, username: &str) -> Result<bool>;
    async fn email_exists(&self, email: &str) -> Result<bool>;
    /// Case-insensitive substring match on username or email.
    async fn search_users(&self, query: &str, exclude: Uuid, limit: i64) -> Result<Vec<UserRef>>;
}

#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait ProfileRepo: Send + Sync {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>>;
    /// Saves profile fields and the owner's names together.
    async fn update_profile(&self, profile: &Profile, first_name: &str, last_name: &str) -> Result<()>;
    /// Accepted friend requests on either side.
    async fn friends_count(&self, user_id: Uuid) -> Result<u64>;
    async fn items_count(&self, user_id: Uuid) -> Result<u64>;
}

#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait ItemRepo: Send + Sync {
    async fn insert_item(&self, item: &Item) -> Result<()>;
    async fn get_item(&self, id: Uuid) -> Result<Option<Item>>;
    async fn update_item(&self, item: &Item) -> Result<()>;
    async fn delete_item(&self, id: Uuid) -> Result<()>;

    /// Available items owned by `viewer` or by any accepted friend of `viewer`.
    async fn count_feed(&self, viewer: Uuid) -> Result<u64>;
    async fn list_feed(&self, viewer: Uuid, limit: i64, offset: i64) -> Result<Vec<Item>>;

    async fn count_owned(&self, owner: Uuid, available_only: bool) -> Result<u64>;
    async fn list_owned(
        &self,
        owner: Uuid,
        available_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Item>>;
}

#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait FriendRepo: Send + Sync {
    /// Fails with `AppError::Integrity` when the ordered pair already exists.
    async fn insert_friend_request(&self, request: &FriendRequest, notification: &Notification) -> Result<()>;
    async fn get_friend_request(&self, id: Uuid) -> Result<Option<FriendRequest>>;
    async fn friend_request_exists(&self, from_user: Uuid, to_user: Uuid) -> Result<bool>;
    /// Marks a pending request accepted. Returns false if it was no longer pending.
    async fn accept_friend_request(
        &self,
        id: Uuid,
        accepted_at: DateTime<Utc>,
        notification: &Notification,
    ) -> Result<bool>;
    /// Removes a pending request. Returns false if it was no longer pending.
    async fn delete_friend_request(&self, id: Uuid) -> Result<bool>;
    /// An accepted row exists in either direction.
    async fn are_friends(&self, a: Uuid, b: Uuid) -> Result<bool>;
    async fn incoming_pending(&self, user_id: Uuid) -> Result<Vec<FriendRequest>>;
    async fn outgoing_pending(&self, user_id: Uuid) -> Result<Vec<FriendRequest>>;
    async fn accepted_for(&self, user_id: Uuid) -> Result<Vec<FriendRequest>>;
}

/// Which side of a swap request the listing user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapDirection {
    Incoming,
    Outgoing,
}

#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait SwapRepo: Send + Sync {
    async fn insert_swap_request(&self, request: &SwapRequest, notification: &Notification) -> Result<()>;
    async fn get_swap_request(&self, id: Uuid) -> Result<Option<SwapRequest>>;
    /// Compare-and-set on status. Returns false when the stored status was not `from`.
    async fn transition_swap_request(
        &self,
        id: Uuid,
        from: SwapStatus,
        to: SwapStatus,
        at: DateTime<Utc>,
        notification: Option<Notification>,
    ) -> Result<bool>;
    /// Accepted → Completed and the item marked unavailable, atomically.
    async fn complete_swap_request(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool>;
    async fn count_swap_requests(&self, user_id: Uuid, direction: SwapDirection) -> Result<u64>;
    async fn list_swap_requests(
        &self,
        user_id: Uuid,
        direction: SwapDirection,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SwapRequest>>;
}

#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait NotificationRepo: Send + Sync {
    async fn get_notification(&self, id: Uuid) -> Result<Option<Notification>>;
    async fn count_notifications(&self, user_id: Uuid) -> Result<u64>;
    async fn list_notifications(&self, user_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Notification>>;
    async fn unread_count(&self, user_id: Uuid) -> Result<u64>;
    /// Flips unread → read and stamps `read_at`. No-op (false) if already read.
    async fn mark_read(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool>;
}

/// Password hashing contract.
#[cfg_attr(any(test, feature = "testing"), automock)]
pub trait AuthProvider: Send + Sync {
    fn hash_password(&self, password: &str) -> Result<String>;
    fn verify_password(&self, password: &str, hash: &str) -> bool;
}
