//! Signed session and flash cookies.
//!
//! The session cookie holds the user id. The flash cookie holds a
//! base64-encoded JSON list of pending messages, cleared when a page
//! shows them. Both are signed with the key in [`AppState`].

use crate::state::AppState;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::{IntoResponseParts, ResponseParts};
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ic_ui::Flash;
use std::convert::Infallible;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "ic_session";
pub const FLASH_COOKIE: &str = "ic_flash";

#[derive(Clone)]
pub struct Cookies {
    jar: SignedCookieJar,
    secure: bool,
}

impl FromRequestParts<AppState> for Cookies {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Self {
            jar: SignedCookieJar::from_headers(&parts.headers, Key::from_ref(state)),
            secure: state.cookie_secure,
        })
    }
}

impl IntoResponseParts for Cookies {
    type Error = Infallible;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        self.jar.into_response_parts(res)
    }
}

impl Cookies {
    fn build(&self, name: &'static str, value: String) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build()
    }

    fn with_jar(self, jar: SignedCookieJar) -> Self {
        Self { jar, secure: self.secure }
    }

    /// The signed-in user id. Tampered or unsigned cookies read as absent.
    pub fn user_id(&self) -> Option<Uuid> {
        self.jar
            .get(SESSION_COOKIE)
            .and_then(|c| c.value().parse().ok())
    }

    pub fn sign_in(self, user_id: Uuid) -> Self {
        let cookie = self.build(SESSION_COOKIE, user_id.to_string());
        let jar = self.jar.clone().add(cookie);
        self.with_jar(jar)
    }

    pub fn sign_out(self) -> Self {
        let jar = self.jar.clone().remove(Cookie::build(SESSION_COOKIE).path("/"));
        self.with_jar(jar)
    }

    fn queued(&self) -> Vec<Flash> {
        self.jar
            .get(FLASH_COOKIE)
            .and_then(|c| {
                let bytes = URL_SAFE_NO_PAD.decode(c.value()).ok()?;
                serde_json::from_slice(&bytes).ok()
            })
            .unwrap_or_default()
    }

    /// Queues a message for the next rendered page.
    pub fn flash(self, flash: Flash) -> Self {
        let mut queued = self.queued();
        queued.push(flash);
        match serde_json::to_vec(&queued) {
            Ok(json) => {
                let cookie = self.build(FLASH_COOKIE, URL_SAFE_NO_PAD.encode(json));
                let jar = self.jar.clone().add(cookie);
                self.with_jar(jar)
            }
            Err(e) => {
                tracing::warn!(error = %e, "dropping flash message");
                self
            }
        }
    }

    /// Pending messages, removed from the cookie in the same response.
    pub fn take_flashes(self) -> (Self, Vec<Flash>) {
        let queued = self.queued();
        if queued.is_empty() {
            return (self, queued);
        }
        let jar = self.jar.clone().remove(Cookie::build(FLASH_COOKIE).path("/"));
        (self.with_jar(jar), queued)
    }
}
