//! # Forms
//!
//! Raw submitted input and the field-level checks applied before any write.
//! Every form keeps the user's input verbatim so a rejected submission can be
//! redisplayed as typed; `validate` turns it into a trusted draft.

use crate::error::FieldErrors;
use crate::models::{Category, Condition, Item, Profile, Size, User};
use serde::{Deserialize, Serialize};

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 150;
pub const PASSWORD_MIN: usize = 8;
pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 200;
pub const DESCRIPTION_MAX: usize = 1000;
pub const BIO_MAX: usize = 500;
pub const NAME_MAX: usize = 150;
pub const IMAGE_REF_MAX: usize = 255;
pub const SWAP_MESSAGE_MAX: usize = 500;
pub const FRIEND_MESSAGE_MAX: usize = 255;

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn optional(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Loose syntactic check: one `@`, non-empty local part, dotted domain.
pub fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

/// A registration that passed every check that does not need the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    /// Checks that need no store access. Uniqueness is checked by the
    /// account service, which merges its findings into the same error list.
    pub fn validate(&self) -> Result<NewAccount, FieldErrors> {
        let mut errors = FieldErrors::new();
        let username = self.username.trim();
        let email = self.email.trim();

        if username.is_empty() {
            errors.add("username", "This field is required.");
        } else if char_len(username) < USERNAME_MIN {
            errors.add("username", "Username must be at least 3 characters long.");
        } else if char_len(username) > USERNAME_MAX {
            errors.add("username", "Username cannot exceed 150 characters.");
        } else if !username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
        {
            errors.add(
                "username",
                "Enter a valid username. It may contain only letters, numbers, and @/./+/-/_ characters.",
            );
        }

        if email.is_empty() {
            errors.add("email", "This field is required.");
        } else if !looks_like_email(email) {
            errors.add("email", "Enter a valid email address.");
        }

        if char_len(&self.password1) < PASSWORD_MIN {
            errors.add("password1", "This password is too short. It must contain at least 8 characters.");
        }
        if self.password1 != self.password2 {
            errors.add("password2", "The two password fields didn't match.");
        }

        if errors.is_empty() {
            Ok(NewAccount {
                username: username.to_string(),
                email: email.to_string(),
                password: self.password1.clone(),
            })
        } else {
            Err(errors)
        }
    }

    /// Same input without the secrets, for redisplay.
    pub fn without_passwords(&self) -> Self {
        Self {
            username: self.username.clone(),
            email: self.email.clone(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ItemForm {
    pub title: String,
    pub description: String,
    pub photo: String,
    pub category: String,
    pub size: String,
    pub condition: String,
}

impl Default for ItemForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            photo: String::new(),
            category: Category::default().as_str().to_string(),
            size: String::new(),
            condition: Condition::default().as_str().to_string(),
        }
    }
}

/// Validated item fields, ready to be applied to a new or existing [`Item`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub title: String,
    pub description: String,
    pub photo: Option<String>,
    pub category: Category,
    pub size: Option<Size>,
    pub condition: Condition,
}

impl ItemForm {
    pub fn from_item(item: &Item) -> Self {
        Self {
            title: item.title.clone(),
            description: item.description.clone(),
            photo: item.photo.clone().unwrap_or_default(),
            category: item.category.as_str().to_string(),
            size: item.size.map(|s| s.as_str().to_string()).unwrap_or_default(),
            condition: item.condition.as_str().to_string(),
        }
    }

    pub fn validate(&self) -> Result<ItemDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = self.title.trim();
        if char_len(title) < TITLE_MIN {
            errors.add("title", "Title must be at least 3 characters long.");
        } else if char_len(title) > TITLE_MAX {
            errors.add("title", "Title cannot exceed 200 characters.");
        }

        let description = self.description.trim();
        if char_len(description) > DESCRIPTION_MAX {
            errors.add("description", "Description cannot exceed 1000 characters.");
        }

        let photo = optional(&self.photo);
        if photo.as_deref().is_some_and(|p| char_len(p) > IMAGE_REF_MAX) {
            errors.add("photo", "Photo reference cannot exceed 255 characters.");
        }

        let category = self.category.trim().parse::<Category>();
        if category.is_err() {
            errors.add("category", "Select a valid choice.");
        }

        let size = match self.size.trim() {
            "" => Ok(None),
            raw => raw.parse::<Size>().map(Some),
        };
        if size.is_err() {
            errors.add("size", "Select a valid choice.");
        }

        let condition = self.condition.trim().parse::<Condition>();
        if condition.is_err() {
            errors.add("condition", "Select a valid choice.");
        }

        match (category, size, condition) {
            (Ok(category), Ok(size), Ok(condition)) if errors.is_empty() => Ok(ItemDraft {
                title: title.to_string(),
                description: description.to_string(),
                photo,
                category,
                size,
                condition,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProfileForm {
    pub avatar: String,
    pub bio: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDraft {
    pub avatar: Option<String>,
    pub bio: String,
    pub first_name: String,
    pub last_name: String,
}

impl ProfileForm {
    pub fn from_profile(profile: &Profile, user: &User) -> Self {
        Self {
            avatar: profile.avatar.clone().unwrap_or_default(),
            bio: profile.bio.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }

    pub fn validate(&self) -> Result<ProfileDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let bio = self.bio.trim();
        if char_len(bio) > BIO_MAX {
            errors.add("bio", "Bio cannot exceed 500 characters.");
        }

        let avatar = optional(&self.avatar);
        if avatar.as_deref().is_some_and(|a| char_len(a) > IMAGE_REF_MAX) {
            errors.add("avatar", "Avatar reference cannot exceed 255 characters.");
        }

        let first_name = self.first_name.trim();
        if char_len(first_name) > NAME_MAX {
            errors.add("first_name", "First name cannot exceed 150 characters.");
        }
        let last_name = self.last_name.trim();
        if char_len(last_name) > NAME_MAX {
            errors.add("last_name", "Last name cannot exceed 150 characters.");
        }

        if errors.is_empty() {
            Ok(ProfileDraft {
                avatar,
                bio: bio.to_string(),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
            })
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SwapRequestForm {
    pub message: String,
}

impl SwapRequestForm {
    pub fn validate(&self) -> Result<String, FieldErrors> {
        let message = self.message.trim();
        let mut errors = FieldErrors::new();
        if char_len(message) > SWAP_MESSAGE_MAX {
            errors.add("message", "Message cannot exceed 500 characters.");
        }
        if errors.is_empty() {
            Ok(message.to_string())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FriendRequestForm {
    pub message: String,
}

impl FriendRequestForm {
    pub fn validate(&self) -> Result<String, FieldErrors> {
        let message = self.message.trim();
        let mut errors = FieldErrors::new();
        if char_len(message) > FRIEND_MESSAGE_MAX {
            errors.add("message", "Message cannot exceed 255 characters.");
        }
        if errors.is_empty() {
            Ok(message.to_string())
        } else {
            Err(errors)
        }
    }
}
