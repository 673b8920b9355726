//! Swap requests: asking for a friend's item, and answering requests.

use super::{layout_for, parse_id, redirect, render};
use crate::cookies::Cookies;
use crate::error::{Bounce, WebResult};
use crate::extract::CurrentUser;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::Form;
use ic_core::forms::SwapRequestForm;
use ic_core::models::User;
use ic_core::{AppError, FieldErrors};
use ic_ui::{Flash, RequestFormPage, RequestListPage};
use serde::Deserialize;
use uuid::Uuid;

const LIST_PAGE: &str = "/requests/";

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page_in: Option<String>,
    pub page_out: Option<String>,
}

/// Where a refused request goes: own items back to the feed, anything
/// else back to the item page.
async fn refusal_target(state: &AppState, user: &User, item_id: Uuid) -> Result<String, AppError> {
    let item = state.services.items.get(item_id).await?;
    Ok(if item.is_owned_by(user.id) {
        "/".to_string()
    } else {
        format!("/items/{item_id}/")
    })
}

pub async fn create_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    cookies: Cookies,
    Path(item_id): Path<String>,
) -> WebResult {
    let item_id = parse_id("Item", &item_id)?;
    let back = refusal_target(&state, &user, item_id).await?;
    let item = state
        .services
        .swaps
        .requestable(&user.to_ref(), item_id)
        .await
        .or_bounce(&cookies, &back)?;

    let (cookies, layout) = layout_for(&state, &user, cookies).await?;
    render(
        cookies,
        RequestFormPage { layout, item, form: SwapRequestForm::default(), errors: FieldErrors::new() },
    )
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    cookies: Cookies,
    Path(item_id): Path<String>,
    Form(form): Form<SwapRequestForm>,
) -> WebResult {
    let item_id = parse_id("Item", &item_id)?;
    let back = refusal_target(&state, &user, item_id).await?;

    match state.services.swaps.request(&user.to_ref(), item_id, &form).await {
        Ok(_) => redirect(cookies, LIST_PAGE, Flash::success("Swap request sent!")),
        Err(AppError::Validation(errors)) if errors.has("message") => {
            let item = state.services.items.get(item_id).await?;
            let (cookies, layout) = layout_for(&state, &user, cookies).await?;
            render(cookies, RequestFormPage { layout, item, form, errors })
        }
        Err(e) => Err(e).or_bounce(&cookies, &back),
    }
}

pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    cookies: Cookies,
    Query(query): Query<ListQuery>,
) -> WebResult {
    let lists = state
        .services
        .swaps
        .lists(user.id, query.page_in.as_deref(), query.page_out.as_deref())
        .await?;
    let (cookies, layout) = layout_for(&state, &user, cookies).await?;
    render(cookies, RequestListPage { layout, incoming: lists.incoming, outgoing: lists.outgoing })
}

pub async fn accept(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    cookies: Cookies,
    Path(id): Path<String>,
) -> WebResult {
    let id = parse_id("Swap request", &id)?;
    state
        .services
        .swaps
        .accept(&user.to_ref(), id)
        .await
        .or_bounce(&cookies, LIST_PAGE)?;
    redirect(cookies, LIST_PAGE, Flash::success("Swap request accepted!"))
}

pub async fn cancel(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    cookies: Cookies,
    Path(id): Path<String>,
) -> WebResult {
    let id = parse_id("Swap request", &id)?;
    state
        .services
        .swaps
        .cancel(&user.to_ref(), id)
        .await
        .or_bounce(&cookies, LIST_PAGE)?;
    redirect(cookies, LIST_PAGE, Flash::success("Request cancelled."))
}
