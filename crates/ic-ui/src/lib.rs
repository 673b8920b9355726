//! # ic-ui
//!
//! Server-rendered pages. Every page embeds a [`Layout`] carrying the
//! navigation state and the flash messages queued for this response.

use askama::Template;
use ic_core::forms::{ItemForm, LoginForm, ProfileForm, RegisterForm, SwapRequestForm};
use ic_core::models::{
    Category, Condition, FriendRequest, Item, Notification, Profile, Size, SwapRequest, User, UserRef,
};
use ic_core::{FieldErrors, Page};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Directory holding the stylesheet and script served under `/static/`.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl FlashLevel {
    pub fn css_class(&self) -> &'static str {
        match self {
            FlashLevel::Success => "flash-success",
            FlashLevel::Info => "flash-info",
            FlashLevel::Warning => "flash-warning",
            FlashLevel::Error => "flash-error",
        }
    }
}

/// One-shot message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub text: String,
}

impl Flash {
    pub fn success(text: impl Into<String>) -> Self {
        Self { level: FlashLevel::Success, text: text.into() }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self { level: FlashLevel::Info, text: text.into() }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self { level: FlashLevel::Warning, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { level: FlashLevel::Error, text: text.into() }
    }
}

/// Shared chrome: who is signed in, their unread count, pending flashes.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub user: Option<UserRef>,
    pub unread: u64,
    pub flashes: Vec<Flash>,
}

impl Layout {
    pub fn anonymous(flashes: Vec<Flash>) -> Self {
        Self { user: None, unread: 0, flashes }
    }

    pub fn signed_in(user: UserRef, unread: u64, flashes: Vec<Flash>) -> Self {
        Self { user: Some(user), unread, flashes }
    }
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub layout: Layout,
    pub form: LoginForm,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterPage {
    pub layout: Layout,
    pub form: RegisterForm,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "item_list.html")]
pub struct FeedPage {
    pub layout: Layout,
    pub page: Page<Item>,
}

#[derive(Template)]
#[template(path = "item_detail.html")]
pub struct ItemDetailPage {
    pub layout: Layout,
    pub item: Item,
    pub is_owner: bool,
}

#[derive(Template)]
#[template(path = "item_form.html")]
pub struct ItemFormPage {
    pub layout: Layout,
    pub heading: &'static str,
    pub action: String,
    pub form: ItemForm,
    pub errors: FieldErrors,
    pub categories: &'static [Category],
    pub sizes: &'static [Size],
    pub conditions: &'static [Condition],
}

impl ItemFormPage {
    pub fn new(layout: Layout, heading: &'static str, action: String, form: ItemForm, errors: FieldErrors) -> Self {
        Self {
            layout,
            heading,
            action,
            form,
            errors,
            categories: Category::ALL,
            sizes: Size::ALL,
            conditions: Condition::ALL,
        }
    }
}

#[derive(Template)]
#[template(path = "item_delete_confirm.html")]
pub struct ItemDeletePage {
    pub layout: Layout,
    pub item: Item,
}

#[derive(Template)]
#[template(path = "my_items.html")]
pub struct MyItemsPage {
    pub layout: Layout,
    pub page: Page<Item>,
}

#[derive(Template)]
#[template(path = "friend_search.html")]
pub struct FriendSearchPage {
    pub layout: Layout,
    pub query: String,
    pub results: Vec<UserRef>,
}

#[derive(Template)]
#[template(path = "friend_requests.html")]
pub struct FriendRequestsPage {
    pub layout: Layout,
    pub viewer: Uuid,
    pub incoming: Vec<FriendRequest>,
    pub outgoing: Vec<FriendRequest>,
    pub accepted: Vec<FriendRequest>,
}

impl FriendRequestsPage {
    /// The other side of each accepted request.
    pub fn friends(&self) -> Vec<&UserRef> {
        self.accepted.iter().map(|fr| fr.counterpart(self.viewer)).collect()
    }
}

#[derive(Template)]
#[template(path = "request_form.html")]
pub struct RequestFormPage {
    pub layout: Layout,
    pub item: Item,
    pub form: SwapRequestForm,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "request_list.html")]
pub struct RequestListPage {
    pub layout: Layout,
    pub incoming: Page<SwapRequest>,
    pub outgoing: Page<SwapRequest>,
}

impl RequestListPage {
    /// Query suffix keeping the outgoing page while paging incoming.
    pub fn keep_outgoing(&self) -> String {
        format!("&page_out={}", self.outgoing.number)
    }

    pub fn keep_incoming(&self) -> String {
        format!("&page_in={}", self.incoming.number)
    }
}

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfilePage {
    pub layout: Layout,
    pub profile_user: User,
    pub profile: Profile,
    pub items: Vec<Item>,
    pub friends_count: u64,
    pub items_count: u64,
    pub is_self: bool,
}

#[derive(Template)]
#[template(path = "profile_edit.html")]
pub struct ProfileEditPage {
    pub layout: Layout,
    pub form: ProfileForm,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "notifications.html")]
pub struct NotificationsPage {
    pub layout: Layout,
    pub page: Page<Notification>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub layout: Layout,
    pub status: u16,
    pub message: String,
}
