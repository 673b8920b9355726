//! Registration and sign-in.

use chrono::Utc;
use ic_core::forms::{LoginForm, RegisterForm};
use ic_core::{AppError, AuthProvider, FieldErrors, Profile, Result, User, UserRepo};
use std::sync::Arc;
use uuid::Uuid;

pub struct AccountService {
    users: Arc<dyn UserRepo>,
    auth: Arc<dyn AuthProvider>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepo>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { users, auth }
    }

    /// Creates the account and its profile.
    ///
    /// Field checks and the uniqueness checks are reported together so the
    /// form can show every problem at once.
    pub async fn register(&self, form: &RegisterForm) -> Result<User> {
        let mut errors = FieldErrors::new();
        let account = match form.validate() {
            Ok(account) => Some(account),
            Err(e) => {
                errors.extend(e);
                None
            }
        };

        let username = form.username.trim();
        if !username.is_empty() && !errors.has("username") && self.users.username_exists(username).await? {
            errors.add("username", "A user with that username already exists.");
        }
        let email = form.email.trim();
        if !email.is_empty() && !errors.has("email") && self.users.email_exists(email).await? {
            errors.add("email", "Email already registered.");
        }

        let account = match account {
            Some(account) if errors.is_empty() => account,
            _ => return Err(AppError::Validation(errors)),
        };

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            username: account.username,
            email: account.email,
            password_hash: self.auth.hash_password(&account.password)?,
            first_name: String::new(),
            last_name: String::new(),
            date_joined: now,
        };
        let profile = Profile::new(user.id, now);
        self.users.create_account(&user, &profile).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "account registered");
        Ok(user)
    }

    pub async fn authenticate(&self, form: &LoginForm) -> Result<User> {
        let user = self.users.find_by_username(form.username.trim()).await?;
        match user {
            Some(user) if self.auth.verify_password(&form.password, &user.password_hash) => {
                tracing::debug!(user_id = %user.id, "signed in");
                Ok(user)
            }
            _ => Err(AppError::invalid("Invalid username or password.")),
        }
    }

    /// Resolves a session's user id; `None` when the account no longer exists.
    pub async fn current_user(&self, id: Uuid) -> Result<Option<User>> {
        self.users.get_user(id).await
    }
}
