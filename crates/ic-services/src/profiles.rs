//! Profile pages and profile editing.

use chrono::Utc;
use ic_core::forms::ProfileForm;
use ic_core::{AppError, Item, ItemRepo, Profile, ProfileRepo, Result, User, UserRepo};
use std::sync::Arc;

/// Everything the profile page shows about one user.
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub user: User,
    pub profile: Profile,
    /// The user's items that are still available
    pub items: Vec<Item>,
    pub friends_count: u64,
    pub items_count: u64,
}

pub struct ProfileService {
    users: Arc<dyn UserRepo>,
    profiles: Arc<dyn ProfileRepo>,
    items: Arc<dyn ItemRepo>,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserRepo>, profiles: Arc<dyn ProfileRepo>, items: Arc<dyn ItemRepo>) -> Self {
        Self { users, profiles, items }
    }

    /// Profile of `username`, or of `viewer` when no username is given.
    pub async fn view(&self, viewer: &User, username: Option<&str>) -> Result<ProfileView> {
        let user = match username {
            Some(name) => self
                .users
                .find_by_username(name)
                .await?
                .ok_or_else(|| AppError::not_found("User", name))?,
            None => viewer.clone(),
        };
        let profile = self.profile_of(&user).await?;

        let available = self.items.count_owned(user.id, true).await?;
        let items = self
            .items
            .list_owned(user.id, true, i64::try_from(available).unwrap_or(i64::MAX), 0)
            .await?;

        Ok(ProfileView {
            friends_count: self.profiles.friends_count(user.id).await?,
            items_count: self.profiles.items_count(user.id).await?,
            user,
            profile,
            items,
        })
    }

    pub async fn edit_form(&self, user: &User) -> Result<ProfileForm> {
        let profile = self.profile_of(user).await?;
        Ok(ProfileForm::from_profile(&profile, user))
    }

    pub async fn update(&self, user: &User, form: &ProfileForm) -> Result<Profile> {
        let mut profile = self.profile_of(user).await?;
        let draft = form.validate().map_err(AppError::Validation)?;

        profile.avatar = draft.avatar;
        profile.bio = draft.bio;
        profile.updated_at = Utc::now();
        self.profiles
            .update_profile(&profile, &draft.first_name, &draft.last_name)
            .await?;

        tracing::info!(user_id = %user.id, "profile updated");
        Ok(profile)
    }

    async fn profile_of(&self, user: &User) -> Result<Profile> {
        self.profiles
            .get_profile(user.id)
            .await?
            .ok_or_else(|| AppError::not_found("Profile", &user.username))
    }
}
