//! # Domain Models
//!
//! These structs represent the core entities of InnerCircle.
//! We use UUID v7 for time-ordered, globally unique identification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Items shown per feed / "my items" page.
pub const ITEMS_PER_PAGE: u32 = 12;
/// Swap requests shown per incoming/outgoing page.
pub const SWAPS_PER_PAGE: u32 = 10;
pub const NOTIFICATIONS_PER_PAGE: u32 = 20;
/// Upper bound on user search results.
pub const SEARCH_LIMIT: i64 = 20;
/// Stored notification text is cut to this many characters.
pub const NOTIFICATION_TEXT_MAX: usize = 255;

/// Raised when a stored or submitted choice value is not one of the known keys.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} choice: {value:?}")]
pub struct UnknownChoice {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a closed set of string-keyed choices with a display label per key.
macro_rules! choices {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident => ($key:literal, $label:literal)),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The key persisted in the store and submitted by forms.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownChoice;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($key => Ok($name::$variant),)+
                    other => Err(UnknownChoice { kind: $kind, value: other.to_string() }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

choices!(
    /// Clothing category of an [`Item`].
    Category, "category" {
        Tops => ("tops", "Tops"),
        Bottoms => ("bottoms", "Bottoms"),
        Dresses => ("dresses", "Dresses"),
        Outerwear => ("outerwear", "Outerwear"),
        Shoes => ("shoes", "Shoes"),
        Accessories => ("accessories", "Accessories"),
        Other => ("other", "Other"),
    }
);

choices!(
    Size, "size" {
        Xs => ("xs", "XS"),
        S => ("s", "S"),
        M => ("m", "M"),
        L => ("l", "L"),
        Xl => ("xl", "XL"),
        Xxl => ("xxl", "XXL"),
    }
);

choices!(
    Condition, "condition" {
        New => ("new", "Like New"),
        Good => ("good", "Good"),
        Fair => ("fair", "Fair"),
    }
);

choices!(
    /// Lifecycle state of a [`SwapRequest`].
    SwapStatus, "status" {
        Pending => ("pending", "Pending"),
        Accepted => ("accepted", "Accepted"),
        Completed => ("completed", "Completed"),
        Cancelled => ("cancelled", "Cancelled"),
    }
);

choices!(
    NotificationType, "notification type" {
        FriendRequest => ("friend_request", "Friend Request"),
        RequestAccepted => ("request_accepted", "Request Accepted"),
        SwapRequest => ("swap_request", "Swap Request"),
        SwapAccepted => ("swap_accepted", "Swap Accepted"),
    }
);

impl Default for Category {
    fn default() -> Self {
        Category::Other
    }
}

impl Default for Condition {
    fn default() -> Self {
        Condition::Good
    }
}

impl SwapStatus {
    /// pending → accepted → completed, or pending/accepted → cancelled.
    pub fn can_transition_to(self, next: SwapStatus) -> bool {
        use SwapStatus::*;
        matches!(
            (self, next),
            (Pending, Accepted) | (Accepted, Completed) | (Pending, Cancelled) | (Accepted, Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SwapStatus::Completed | SwapStatus::Cancelled)
    }
}

/// Minimal identity used wherever an entity points at a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: Uuid,
    pub username: String,
}

/// An account in the identity store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub date_joined: DateTime<Utc>,
}

impl User {
    pub fn to_ref(&self) -> UserRef {
        UserRef {
            id: self.id,
            username: self.username.clone(),
        }
    }

    /// "First Last", or the username when neither name is set.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Exactly one per user, created together with the account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: Uuid,
    /// Reference to the avatar image (e.g. a URL)
    pub avatar: Option<String>,
    pub bio: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            avatar: None,
            bio: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A clothing item listed by its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub owner: UserRef,
    pub title: String,
    pub description: String,
    /// Reference to the item photo (e.g. a URL)
    pub photo: Option<String>,
    pub category: Category,
    pub size: Option<Size>,
    pub condition: Condition,
    /// Flips to false once a swap for this item completes
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner.id == user_id
    }

    pub fn to_ref(&self) -> ItemRef {
        ItemRef {
            id: self.id,
            title: self.title.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    pub id: Uuid,
    pub title: String,
}

/// A directional friendship edge. Friendship is symmetric once accepted:
/// it is looked up in both directions, never stored twice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendRequest {
    pub id: Uuid,
    pub from_user: UserRef,
    pub to_user: UserRef,
    pub message: String,
    pub accepted: bool,
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl FriendRequest {
    /// The other side of the edge as seen by `user_id`.
    pub fn counterpart(&self, user_id: Uuid) -> &UserRef {
        if self.from_user.id == user_id {
            &self.to_user
        } else {
            &self.from_user
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapRequest {
    pub id: Uuid,
    pub sender: UserRef,
    /// Always the owner of `item` at creation time
    pub receiver: UserRef,
    pub item: ItemRef,
    pub message: String,
    pub status: SwapStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SwapRequest {
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.sender.id == user_id || self.receiver.id == user_id
    }
}

/// Recipient-owned record of something that happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub notification_type: NotificationType,
    pub read: bool,
    /// Set once, when `read` first flips to true
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(user_id: Uuid, notification_type: NotificationType, text: &str) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            text: text.chars().take(NOTIFICATION_TEXT_MAX).collect(),
            notification_type,
            read: false,
            read_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn friend_request(recipient: Uuid, sender: &str) -> Self {
        Self::new(
            recipient,
            NotificationType::FriendRequest,
            &format!("{sender} sent you a friend request"),
        )
    }

    pub fn request_accepted(requester: Uuid, accepter: &str) -> Self {
        Self::new(
            requester,
            NotificationType::RequestAccepted,
            &format!("{accepter} accepted your friend request"),
        )
    }

    pub fn swap_request(owner: Uuid, sender: &str, item_title: &str) -> Self {
        Self::new(
            owner,
            NotificationType::SwapRequest,
            &format!("{sender} requested {item_title}"),
        )
    }

    pub fn swap_accepted(sender: Uuid, receiver: &str, item_title: &str) -> Self {
        Self::new(
            sender,
            NotificationType::SwapAccepted,
            &format!("{receiver} accepted your swap request for {item_title}"),
        )
    }
}
