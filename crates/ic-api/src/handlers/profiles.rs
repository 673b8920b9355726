use super::{layout_for, redirect, render};
use crate::cookies::Cookies;
use crate::error::WebResult;
use crate::extract::CurrentUser;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Form;
use ic_core::forms::ProfileForm;
use ic_core::models::User;
use ic_core::{AppError, FieldErrors};
use ic_ui::{Flash, ProfileEditPage, ProfilePage};

async fn show(state: AppState, user: User, cookies: Cookies, username: Option<&str>) -> WebResult {
    let view = state.services.profiles.view(&user, username).await?;
    let is_self = view.user.id == user.id;
    let (cookies, layout) = layout_for(&state, &user, cookies).await?;
    render(
        cookies,
        ProfilePage {
            layout,
            profile_user: view.user,
            profile: view.profile,
            items: view.items,
            friends_count: view.friends_count,
            items_count: view.items_count,
            is_self,
        },
    )
}

pub async fn own(State(state): State<AppState>, CurrentUser(user): CurrentUser, cookies: Cookies) -> WebResult {
    show(state, user, cookies, None).await
}

pub async fn of_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    cookies: Cookies,
    Path(username): Path<String>,
) -> WebResult {
    show(state, user, cookies, Some(&username)).await
}

pub async fn edit_form(State(state): State<AppState>, CurrentUser(user): CurrentUser, cookies: Cookies) -> WebResult {
    let form = state.services.profiles.edit_form(&user).await?;
    let (cookies, layout) = layout_for(&state, &user, cookies).await?;
    render(cookies, ProfileEditPage { layout, form, errors: FieldErrors::new() })
}

pub async fn edit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    cookies: Cookies,
    Form(form): Form<ProfileForm>,
) -> WebResult {
    match state.services.profiles.update(&user, &form).await {
        Ok(_) => redirect(cookies, "/profile/", Flash::success("Profile updated!")),
        Err(AppError::Validation(errors)) => {
            let (cookies, layout) = layout_for(&state, &user, cookies).await?;
            render(cookies, ProfileEditPage { layout, form, errors })
        }
        Err(e) => Err(e.into()),
    }
}
