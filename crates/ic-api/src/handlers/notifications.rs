use super::{layout_for, parse_id, redirect, render, PageQuery};
use crate::cookies::Cookies;
use crate::error::{Bounce, WebResult};
use crate::extract::CurrentUser;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::header::{HOST, REFERER};
use axum::http::{HeaderMap, Uri};
use ic_ui::{Flash, NotificationsPage};

const LIST_PAGE: &str = "/notifications/";

pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    cookies: Cookies,
    Query(query): Query<PageQuery>,
) -> WebResult {
    let page = state.services.notifications.list(user.id, query.page.as_deref()).await?;
    let (cookies, layout) = layout_for(&state, &user, cookies).await?;
    render(cookies, NotificationsPage { layout, page })
}

pub async fn mark_read(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    cookies: Cookies,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> WebResult {
    let id = parse_id("Notification", &id)?;
    state
        .services
        .notifications
        .mark_read(user.id, id)
        .await
        .or_bounce(&cookies, LIST_PAGE)?;

    let back = same_site_referer(&headers).unwrap_or_else(|| LIST_PAGE.to_string());
    redirect(cookies, &back, Flash::success("Notification marked as read."))
}

/// The path of the `Referer` header when it points back at this host.
fn same_site_referer(headers: &HeaderMap) -> Option<String> {
    let referer: Uri = headers.get(REFERER)?.to_str().ok()?.parse().ok()?;
    if let Some(authority) = referer.authority() {
        let host = headers.get(HOST)?.to_str().ok()?;
        if !authority.as_str().eq_ignore_ascii_case(host) {
            return None;
        }
    }
    let path = referer.path_and_query()?.as_str();
    (path.starts_with('/') && !path.starts_with("//")).then(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(referer: &str, host: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(REFERER, HeaderValue::from_str(referer).unwrap());
        h.insert(HOST, HeaderValue::from_str(host).unwrap());
        h
    }

    #[test]
    fn referer_on_same_host_is_followed() {
        let h = headers("http://circle.test/requests/?page_in=2", "circle.test");
        assert_eq!(same_site_referer(&h).as_deref(), Some("/requests/?page_in=2"));
    }

    #[test]
    fn foreign_referer_is_ignored() {
        assert_eq!(same_site_referer(&headers("https://evil.test/", "circle.test")), None);
    }

    #[test]
    fn relative_referer_is_followed() {
        assert_eq!(same_site_referer(&headers("/items/", "circle.test")).as_deref(), Some("/items/"));
    }
}
