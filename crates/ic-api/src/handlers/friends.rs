//! Friend search and the friend request lifecycle.

use super::{layout_for, parse_id, redirect, render};
use crate::cookies::Cookies;
use crate::error::{Bounce, WebResult};
use crate::extract::CurrentUser;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::Form;
use ic_core::forms::FriendRequestForm;
use ic_ui::{Flash, FriendRequestsPage, FriendSearchPage};
use serde::Deserialize;

const SEARCH_PAGE: &str = "/friends/search/";
const REQUESTS_PAGE: &str = "/friends/requests/";

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn search(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    cookies: Cookies,
    Query(query): Query<SearchQuery>,
) -> WebResult {
    let query = query.q.trim().to_string();
    let results = state.services.friends.search(user.id, &query).await?;
    let (cookies, layout) = layout_for(&state, &user, cookies).await?;
    render(cookies, FriendSearchPage { layout, query, results })
}

pub async fn send_request(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    cookies: Cookies,
    Path(user_id): Path<String>,
    Form(form): Form<FriendRequestForm>,
) -> WebResult {
    let to_user = parse_id("User", &user_id)?;
    let request = state
        .services
        .friends
        .send_request(&user.to_ref(), to_user, &form)
        .await
        .or_bounce(&cookies, SEARCH_PAGE)?;
    let sent = Flash::success(format!("Friend request sent to {}!", request.to_user.username));
    redirect(cookies, SEARCH_PAGE, sent)
}

pub async fn requests(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    cookies: Cookies,
) -> WebResult {
    let overview = state.services.friends.overview(user.id).await?;
    let (cookies, layout) = layout_for(&state, &user, cookies).await?;
    render(
        cookies,
        FriendRequestsPage {
            layout,
            viewer: user.id,
            incoming: overview.incoming,
            outgoing: overview.outgoing,
            accepted: overview.accepted,
        },
    )
}

pub async fn accept(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    cookies: Cookies,
    Path(id): Path<String>,
) -> WebResult {
    let id = parse_id("Friend request", &id)?;
    let request = state
        .services
        .friends
        .accept(&user.to_ref(), id)
        .await
        .or_bounce(&cookies, REQUESTS_PAGE)?;
    let done = Flash::success(format!("You and {} are now friends!", request.from_user.username));
    redirect(cookies, REQUESTS_PAGE, done)
}

pub async fn decline(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    cookies: Cookies,
    Path(id): Path<String>,
) -> WebResult {
    let id = parse_id("Friend request", &id)?;
    state
        .services
        .friends
        .decline(&user.to_ref(), id)
        .await
        .or_bounce(&cookies, REQUESTS_PAGE)?;
    redirect(cookies, REQUESTS_PAGE, Flash::success("Friend request declined."))
}
