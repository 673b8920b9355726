//! Feed, item pages and the owner-only edit/delete flows.

use super::{layout_for, parse_id, redirect, render, PageQuery};
use crate::cookies::Cookies;
use crate::error::{Bounce, WebResult};
use crate::extract::CurrentUser;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::Form;
use ic_core::forms::ItemForm;
use ic_core::{AppError, FieldErrors};
use ic_ui::{FeedPage, Flash, ItemDeletePage, ItemDetailPage, ItemFormPage, MyItemsPage};

pub async fn feed(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    cookies: Cookies,
    Query(query): Query<PageQuery>,
) -> WebResult {
    let page = state.services.items.feed(user.id, query.page.as_deref()).await?;
    let (cookies, layout) = layout_for(&state, &user, cookies).await?;
    render(cookies, FeedPage { layout, page })
}

pub async fn my_items(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    cookies: Cookies,
    Query(query): Query<PageQuery>,
) -> WebResult {
    let page = state.services.items.owned_by(user.id, query.page.as_deref()).await?;
    let (cookies, layout) = layout_for(&state, &user, cookies).await?;
    render(cookies, MyItemsPage { layout, page })
}

pub async fn create_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    cookies: Cookies,
) -> WebResult {
    let (cookies, layout) = layout_for(&state, &user, cookies).await?;
    let page = ItemFormPage::new(layout, "Post New Item", "/items/create/".into(), ItemForm::default(), FieldErrors::new());
    render(cookies, page)
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    cookies: Cookies,
    Form(form): Form<ItemForm>,
) -> WebResult {
    match state.services.items.create(&user.to_ref(), &form).await {
        Ok(_) => redirect(cookies, "/", Flash::success("Item posted successfully!")),
        Err(AppError::Validation(errors)) => {
            let (cookies, layout) = layout_for(&state, &user, cookies).await?;
            render(cookies, ItemFormPage::new(layout, "Post New Item", "/items/create/".into(), form, errors))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn detail(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    cookies: Cookies,
    Path(id): Path<String>,
) -> WebResult {
    let item = state.services.items.get(parse_id("Item", &id)?).await?;
    let is_owner = item.is_owned_by(user.id);
    let (cookies, layout) = layout_for(&state, &user, cookies).await?;
    render(cookies, ItemDetailPage { layout, item, is_owner })
}

pub async fn edit_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    cookies: Cookies,
    Path(id): Path<String>,
) -> WebResult {
    let id = parse_id("Item", &id)?;
    let item = state.services.items.editable(user.id, id).await.or_bounce(&cookies, "/")?;
    let (cookies, layout) = layout_for(&state, &user, cookies).await?;
    let page = ItemFormPage::new(
        layout,
        "Edit Item",
        format!("/items/{id}/edit/"),
        ItemForm::from_item(&item),
        FieldErrors::new(),
    );
    render(cookies, page)
}

pub async fn edit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    cookies: Cookies,
    Path(id): Path<String>,
    Form(form): Form<ItemForm>,
) -> WebResult {
    let id = parse_id("Item", &id)?;
    // Ownership first, so a stranger is bounced before any form errors show.
    state.services.items.editable(user.id, id).await.or_bounce(&cookies, "/")?;

    match state.services.items.update(user.id, id, &form).await {
        Ok(item) => redirect(cookies, &format!("/items/{}/", item.id), Flash::success("Item updated!")),
        Err(AppError::Validation(errors)) => {
            let (cookies, layout) = layout_for(&state, &user, cookies).await?;
            render(cookies, ItemFormPage::new(layout, "Edit Item", format!("/items/{id}/edit/"), form, errors))
        }
        Err(e) => Err(e).or_bounce(&cookies, "/"),
    }
}

pub async fn delete_confirm(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    cookies: Cookies,
    Path(id): Path<String>,
) -> WebResult {
    let id = parse_id("Item", &id)?;
    let item = state.services.items.deletable(user.id, id).await.or_bounce(&cookies, "/")?;
    let (cookies, layout) = layout_for(&state, &user, cookies).await?;
    render(cookies, ItemDeletePage { layout, item })
}

pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    cookies: Cookies,
    Path(id): Path<String>,
) -> WebResult {
    let id = parse_id("Item", &id)?;
    state.services.items.delete(user.id, id).await.or_bounce(&cookies, "/")?;
    redirect(cookies, "/my-items/", Flash::success("Item deleted."))
}
