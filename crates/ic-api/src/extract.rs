//! Session extractors.

use crate::cookies::Cookies;
use crate::error::WebError;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use ic_core::models::User;
use std::convert::Infallible;

/// The signed-in user. Anonymous requests are redirected to the login page.
pub struct CurrentUser(pub User);

/// The signed-in user, if any.
pub struct MaybeUser(pub Option<User>);

async fn resolve(parts: &mut Parts, state: &AppState) -> Result<Option<User>, WebError> {
    let cookies = match Cookies::from_request_parts(parts, state).await {
        Ok(cookies) => cookies,
        Err(never) => match never {},
    };
    match cookies.user_id() {
        Some(id) => Ok(state.services.accounts.current_user(id).await?),
        None => Ok(None),
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match resolve(parts, state).await {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => Err(Redirect::to("/login/").into_response()),
            Err(e) => Err(e.into_response()),
        }
    }
}

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // A failing store lookup reads as anonymous here; protected routes
        // go through `CurrentUser` and surface the error.
        match resolve(parts, state).await {
            Ok(user) => Ok(MaybeUser(user)),
            Err(_) => Ok(MaybeUser(None)),
        }
    }
}
