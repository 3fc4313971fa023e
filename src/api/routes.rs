//! API route handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::net::SocketAddr;

use super::server::SharedState;
use crate::auth::models::{LoginRequest, LoginResponse, MessageResponse, SessionUser};
use crate::auth::password;
use crate::db;
use crate::error::{Error, Result};

// Liveness

pub async fn index() -> &'static str {
    "Backend server is running"
}

// Login

pub async fn login(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    jar: CookieJar,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    // Every attempt counts, malformed ones included
    if !state.rate_limiter.try_acquire(addr.ip()) {
        return Err(Error::RateLimited);
    }

    let Json(req) = payload.map_err(|rejection| Error::Validation(vec![rejection.body_text()]))?;

    let violations = req.violations();
    if !violations.is_empty() {
        return Err(Error::Validation(violations));
    }

    let client = state.db.get().await?;
    let record = db::find_credential(&client, &req.name, &req.surname, req.role_id, req.city_id)
        .await?
        .ok_or(Error::InvalidCredentials)?;

    // Same error as the no-match case so the response does not reveal
    // which part of the credentials was wrong
    if !password::verify(req.password, record.password_hash.clone()).await? {
        return Err(Error::InvalidCredentials);
    }

    let user = SessionUser::from(&record);
    let session_id = state.sessions.create(user.clone()).await;

    tracing::info!(user_id = user.id, "login successful");

    let jar = jar.add(session_cookie(&state, session_id));
    Ok((
        jar,
        Json(LoginResponse {
            message: "Login successful",
            user,
        }),
    ))
}

// Check authentication status

pub async fn check_auth(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<Json<SessionUser>> {
    let cookie = jar
        .get(&state.config.session.cookie_name)
        .ok_or(Error::Unauthenticated)?;

    let session = state
        .sessions
        .get(cookie.value())
        .await
        .ok_or(Error::Unauthenticated)?;

    Ok(Json(session.user))
}

// Logout

pub async fn logout(State(state): State<SharedState>, jar: CookieJar) -> Response {
    let session_id = jar
        .get(&state.config.session.cookie_name)
        .map(|c| c.value().to_string());

    // The cookie clears unconditionally, even if server-side destruction
    // fails below
    let jar = jar.remove(removal_cookie(&state));

    if let Some(session_id) = session_id {
        if let Err(e) = state.sessions.destroy(&session_id).await {
            return (jar, Error::SessionStore(e.to_string())).into_response();
        }
    }

    (
        jar,
        Json(MessageResponse {
            message: "Logout successful",
        }),
    )
        .into_response()
}

// Cookie construction

fn session_cookie(state: &SharedState, session_id: String) -> Cookie<'static> {
    let session = &state.config.session;
    Cookie::build((session.cookie_name.clone(), session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(session.secure)
        .max_age(time::Duration::hours(session.ttl_hours))
        .build()
}

fn removal_cookie(state: &SharedState) -> Cookie<'static> {
    Cookie::build((state.config.session.cookie_name.clone(), ""))
        .path("/")
        .build()
}
