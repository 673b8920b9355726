//! Login, logout and registration.

use super::{redirect, render};
use crate::cookies::Cookies;
use crate::error::WebResult;
use crate::extract::MaybeUser;
use crate::state::AppState;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect};
use axum::Form;
use ic_core::forms::{LoginForm, RegisterForm};
use ic_core::{AppError, FieldErrors};
use ic_ui::{Flash, Layout, LoginPage, RegisterPage};

pub async fn login_form(MaybeUser(user): MaybeUser, cookies: Cookies) -> WebResult {
    if user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }
    let (cookies, flashes) = cookies.take_flashes();
    render(cookies, LoginPage { layout: Layout::anonymous(flashes), form: LoginForm::default() })
}

pub async fn login(
    State(state): State<AppState>,
    MaybeUser(current): MaybeUser,
    cookies: Cookies,
    Form(form): Form<LoginForm>,
) -> WebResult {
    if current.is_some() {
        return Ok(Redirect::to("/").into_response());
    }
    match state.services.accounts.authenticate(&form).await {
        Ok(user) => {
            tracing::info!(user = %user.username, "signed in");
            let welcome = Flash::success(format!("Welcome back, {}!", user.username));
            redirect(cookies.sign_in(user.id), "/", welcome)
        }
        Err(AppError::Validation(errors)) => {
            let (cookies, mut flashes) = cookies.take_flashes();
            flashes.push(Flash::error(errors.to_string()));
            let form = LoginForm { username: form.username, password: String::new() };
            render(cookies, LoginPage { layout: Layout::anonymous(flashes), form })
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn logout(cookies: Cookies) -> WebResult {
    redirect(cookies.sign_out(), "/login/", Flash::success("You've been logged out."))
}

pub async fn register_form(MaybeUser(user): MaybeUser, cookies: Cookies) -> WebResult {
    if user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }
    let (cookies, flashes) = cookies.take_flashes();
    render(
        cookies,
        RegisterPage {
            layout: Layout::anonymous(flashes),
            form: RegisterForm::default(),
            errors: FieldErrors::new(),
        },
    )
}

pub async fn register(
    State(state): State<AppState>,
    MaybeUser(current): MaybeUser,
    cookies: Cookies,
    Form(form): Form<RegisterForm>,
) -> WebResult {
    if current.is_some() {
        return Ok(Redirect::to("/").into_response());
    }
    match state.services.accounts.register(&form).await {
        Ok(user) => redirect(cookies.sign_in(user.id), "/", Flash::success("Account created successfully!")),
        Err(AppError::Validation(errors)) => {
            let (cookies, flashes) = cookies.take_flashes();
            render(
                cookies,
                RegisterPage {
                    layout: Layout::anonymous(flashes),
                    form: form.without_passwords(),
                    errors,
                },
            )
        }
        Err(e) => Err(e.into()),
    }
}
