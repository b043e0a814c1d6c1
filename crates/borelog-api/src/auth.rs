//! Cookie sessions and password hashing.
//!
//! A session is a random token handed to the browser in the `sessionid`
//! cookie. The store only ever sees the SHA-256 of the token.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::{
  CookieJar,
  cookie::{Cookie, SameSite},
};
use borelog_core::{model::User, store::LogStore};
use chrono::{Duration, Utc};
use rand_core::{OsRng, RngCore as _};
use sha2::{Digest, Sha256};

use crate::{ApiState, error::ApiError};

pub const SESSION_COOKIE: &str = "sessionid";

/// Session cookie settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
  /// Mark the cookie `Secure`; enable when served over HTTPS.
  pub cookie_secure: bool,
  /// Server-side lifetime of a session.
  pub session_days:  i64,
}

impl Default for SessionConfig {
  fn default() -> Self { Self { cookie_secure: false, session_days: 14 } }
}

// ─── Tokens and passwords ────────────────────────────────────────────────────

/// 32 random bytes, hex-encoded.
pub fn new_token() -> String {
  let mut bytes = [0u8; 32];
  OsRng.fill_bytes(&mut bytes);
  hex::encode(bytes)
}

/// The form in which a token is stored.
pub fn hash_token(token: &str) -> String { hex::encode(Sha256::digest(token.as_bytes())) }

pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| ApiError::Hashing(e.to_string()))
}

pub fn verify_password(password: &str, phc: &str) -> bool {
  PasswordHash::new(phc)
    .map(|parsed| {
      Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
    })
    .unwrap_or(false)
}

// ─── Sessions ────────────────────────────────────────────────────────────────

fn session_cookie(token: String, config: &SessionConfig) -> Cookie<'static> {
  Cookie::build((SESSION_COOKIE, token))
    .path("/")
    .secure(config.cookie_secure)
    .http_only(true)
    .same_site(SameSite::Lax)
    .into()
}

/// Open a session for `user_id` and add its cookie to `jar`.
pub async fn start_session<S: LogStore>(
  state: &ApiState<S>,
  jar: CookieJar,
  user_id: i64,
) -> Result<CookieJar, ApiError> {
  let token = new_token();
  let expires_at = Utc::now() + Duration::days(state.sessions.session_days);

  state
    .store
    .create_session(hash_token(&token), user_id, expires_at)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(user_id, "session started");
  Ok(jar.add(session_cookie(token, &state.sessions)))
}

/// Forget the session in `jar`, if any, and clear its cookie.
pub async fn end_session<S: LogStore>(
  state: &ApiState<S>,
  jar: CookieJar,
) -> Result<CookieJar, ApiError> {
  if let Some(cookie) = jar.get(SESSION_COOKIE) {
    state
      .store
      .delete_session(hash_token(cookie.value()))
      .await
      .map_err(ApiError::store)?;
  }
  Ok(jar.remove(Cookie::build(SESSION_COOKIE).path("/")))
}

async fn session_user<S: LogStore>(
  parts: &Parts,
  state: &ApiState<S>,
) -> Result<Option<User>, ApiError> {
  let jar = CookieJar::from_headers(&parts.headers);
  let Some(cookie) = jar.get(SESSION_COOKIE) else {
    return Ok(None);
  };

  state
    .store
    .session_user(hash_token(cookie.value()), Utc::now())
    .await
    .map_err(ApiError::store)
}

// ─── Extractors ──────────────────────────────────────────────────────────────

/// The logged-in caller. Rejects anonymous requests with
/// `400 {"error": "User not logged in."}`.
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<ApiState<S>> for CurrentUser
where
  S: LogStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &ApiState<S>,
  ) -> Result<Self, Self::Rejection> {
    session_user(parts, state)
      .await?
      .map(CurrentUser)
      .ok_or(ApiError::Unauthenticated)
  }
}

/// The caller if logged in; never rejects for lack of a session.
pub struct MaybeUser(pub Option<User>);

impl<S> FromRequestParts<ApiState<S>> for MaybeUser
where
  S: LogStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &ApiState<S>,
  ) -> Result<Self, Self::Rejection> {
    Ok(MaybeUser(session_user(parts, state).await?))
  }
}
