//! # ic-api Handlers
//!
//! One module per area. Each handler coordinates the flow between the
//! HTTP request and a single service call.

pub mod accounts;
pub mod friends;
pub mod items;
pub mod notifications;
pub mod profiles;
pub mod swaps;

use crate::cookies::Cookies;
use crate::error::{WebError, WebResult};
use crate::state::AppState;
use askama::Template;
use axum::response::{Html, IntoResponse, Redirect};
use ic_core::models::User;
use ic_core::AppError;
use ic_ui::{Flash, Layout};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// Navigation for a signed-in page. Consumes the pending flashes.
pub(crate) async fn layout_for(state: &AppState, user: &User, cookies: Cookies) -> Result<(Cookies, Layout), WebError> {
    let (cookies, flashes) = cookies.take_flashes();
    let unread = state.services.notifications.unread_count(user.id).await?;
    Ok((cookies, Layout::signed_in(user.to_ref(), unread, flashes)))
}

pub(crate) fn render(cookies: Cookies, page: impl Template) -> WebResult {
    let body = page.render()?;
    Ok((cookies, Html(body)).into_response())
}

pub(crate) fn redirect(cookies: Cookies, to: &str, flash: Flash) -> WebResult {
    Ok((cookies.flash(flash), Redirect::to(to)).into_response())
}

/// Malformed ids are treated like ids that match nothing.
pub(crate) fn parse_id(kind: &str, raw: &str) -> Result<Uuid, AppError> {
    raw.parse().map_err(|_| AppError::not_found(kind, raw))
}
