//! Axum router construction.

use crate::handlers::{accounts, friends, items, notifications, profiles, swaps};
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Build the complete router with every page, form target and the static assets.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Accounts
        .route("/login/", get(accounts::login_form).post(accounts::login))
        .route("/logout/", get(accounts::logout).post(accounts::logout))
        .route("/register/", get(accounts::register_form).post(accounts::register))
        // Items
        .route("/", get(items::feed))
        .route("/items/create/", get(items::create_form).post(items::create))
        .route("/items/{id}/", get(items::detail))
        .route("/items/{id}/edit/", get(items::edit_form).post(items::edit))
        .route(
            "/items/{id}/delete/",
            get(items::delete_confirm).post(items::delete),
        )
        .route("/my-items/", get(items::my_items))
        // Friends
        .route("/friends/search/", get(friends::search))
        .route("/friends/request/{user_id}/", post(friends::send_request))
        .route("/friends/requests/", get(friends::requests))
        .route("/friends/requests/{id}/accept/", post(friends::accept))
        .route("/friends/requests/{id}/decline/", post(friends::decline))
        // Swap requests
        .route(
            "/requests/create/{item_id}/",
            get(swaps::create_form).post(swaps::create),
        )
        .route("/requests/", get(swaps::list))
        .route("/requests/{id}/accept/", post(swaps::accept))
        .route("/requests/{id}/cancel/", post(swaps::cancel))
        // Profiles
        .route("/profile/", get(profiles::own))
        .route("/profile/edit/", get(profiles::edit_form).post(profiles::edit))
        .route("/profile/{username}/", get(profiles::of_user))
        // Notifications
        .route("/notifications/", get(notifications::list))
        .route("/notifications/{id}/read/", post(notifications::mark_read))
        .nest_service("/static", ServeDir::new(ic_ui::STATIC_DIR))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
