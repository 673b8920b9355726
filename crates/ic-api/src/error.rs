//! Mapping of `AppError` onto HTTP responses.
//!
//! Missing records render a 404 page. Store failures are logged and render
//! a generic 500 page. Refusals and bad input are usually answered with a
//! redirect and a flash message instead, via [`Bounce`].

use crate::cookies::Cookies;
use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use ic_core::AppError;
use ic_ui::{ErrorPage, Flash, Layout};

pub enum WebError {
    App(AppError),
    /// Redirect to `to` with a flash message queued on `cookies`.
    Bounce {
        cookies: Cookies,
        to: String,
        flash: Flash,
    },
}

impl From<AppError> for WebError {
    fn from(err: AppError) -> Self {
        WebError::App(err)
    }
}

impl From<askama::Error> for WebError {
    fn from(err: askama::Error) -> Self {
        WebError::App(AppError::Internal(format!("template rendering failed: {err}")))
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::Bounce { cookies, to, flash } => {
                (cookies.flash(flash), Redirect::to(&to)).into_response()
            }
            WebError::App(err) => {
                let status = match &err {
                    AppError::NotFound(..) => StatusCode::NOT_FOUND,
                    AppError::Unauthorized(_) => StatusCode::FORBIDDEN,
                    AppError::Validation(_) => StatusCode::BAD_REQUEST,
                    AppError::Integrity(_) | AppError::Internal(_) => {
                        tracing::error!(error = %err, "request failed");
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                error_page(status, err.user_message())
            }
        }
    }
}

fn error_page(status: StatusCode, message: String) -> Response {
    let page = ErrorPage {
        layout: Layout::default(),
        status: status.as_u16(),
        message,
    };
    match page.render() {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "error page failed to render");
            (status, page.message).into_response()
        }
    }
}

/// Turns refusals into a flash + redirect; other errors pass through.
pub trait Bounce<T> {
    fn or_bounce(self, cookies: &Cookies, to: &str) -> Result<T, WebError>;
}

impl<T> Bounce<T> for Result<T, AppError> {
    fn or_bounce(self, cookies: &Cookies, to: &str) -> Result<T, WebError> {
        self.map_err(|err| match err {
            AppError::Unauthorized(_) | AppError::Validation(_) => WebError::Bounce {
                cookies: cookies.clone(),
                to: to.to_string(),
                flash: Flash::error(err.user_message()),
            },
            other => WebError::App(other),
        })
    }
}

pub type WebResult = Result<Response, WebError>;
