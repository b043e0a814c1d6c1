//! Login, registration and logout, plus the single-page shell at `/`.
//!
//! These are plain form posts from the browser; success redirects with
//! `303 See Other` and failures answer with the usual `{"error": ...}` body.

use axum::{
  extract::State,
  response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use borelog_core::{model::NewUser, store::LogStore};
use serde::Deserialize;

use crate::{
  ApiState,
  auth::{MaybeUser, end_session, hash_password, start_session, verify_password},
  error::ApiError,
  extract::ApiForm,
};

// ─── Pages ───────────────────────────────────────────────────────────────────

const LOGIN_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>borelog: log in</title></head>
<body>
  <h2>Log in</h2>
  <form action="/login" method="post">
    <input autofocus type="text" name="username" placeholder="Username">
    <input type="password" name="password" placeholder="Password">
    <input type="submit" value="Login">
  </form>
  <p>Don't have an account? <a href="/register">Register here.</a></p>
</body>
</html>
"#;

const REGISTER_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>borelog: register</title></head>
<body>
  <h2>Register</h2>
  <form action="/register" method="post">
    <input autofocus type="text" name="username" placeholder="Username">
    <input type="email" name="email" placeholder="Email Address">
    <input type="password" name="password" placeholder="Password">
    <input type="password" name="confirmation" placeholder="Confirm Password">
    <input type="submit" value="Register">
  </form>
  <p>Already have an account? <a href="/login">Log in here.</a></p>
</body>
</html>
"#;

fn escape_html(raw: &str) -> String {
  let mut out = String::with_capacity(raw.len());
  for c in raw.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#x27;"),
      c => out.push(c),
    }
  }
  out
}

fn app_shell(user_id: i64, username: &str) -> String {
  let username = escape_html(username);
  format!(
    r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>borelog</title>
  <script src="https://unpkg.com/react@17/umd/react.production.min.js" crossorigin></script>
  <script src="https://unpkg.com/react-dom@17/umd/react-dom.production.min.js" crossorigin></script>
  <script src="https://unpkg.com/babel-standalone@6/babel.min.js"></script>
</head>
<body>
  <nav>
    <a href="#" id="nav-profile" data-user="{user_id}"><strong>{username}</strong></a>
    <a href="#" id="nav-projects">Projects</a>
    <a href="#" id="nav-users">Users</a>
    <a href="/logout">Log Out</a>
  </nav>
  <div id="root"></div>
  <script type="text/babel" src="/static/app/app.js"></script>
</body>
</html>
"##
  )
}

/// `GET /`: the app for logged-in users, otherwise the login page.
pub async fn index<S: LogStore>(MaybeUser(user): MaybeUser) -> Response {
  match user {
    Some(user) => Html(app_shell(user.id, &user.username)).into_response(),
    None => Redirect::to("/login").into_response(),
  }
}

/// `GET /login`
pub async fn login_page() -> Html<&'static str> { Html(LOGIN_PAGE) }

/// `GET /register`
pub async fn register_page() -> Html<&'static str> { Html(REGISTER_PAGE) }

// ─── Login / logout ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginForm {
  pub username: String,
  pub password: String,
}

/// `POST /login`
pub async fn login<S: LogStore>(
  State(state): State<ApiState<S>>,
  jar: CookieJar,
  ApiForm(form): ApiForm<LoginForm>,
) -> Result<(CookieJar, Redirect), ApiError> {
  let credentials = state
    .store
    .get_credentials(form.username.clone())
    .await
    .map_err(ApiError::store)?
    .filter(|c| verify_password(&form.password, &c.password_hash))
    .ok_or_else(|| {
      tracing::info!(username = %form.username, "failed login");
      ApiError::InvalidCredentials
    })?;

  let jar = start_session(&state, jar, credentials.user.id).await?;
  Ok((jar, Redirect::to("/")))
}

/// `GET /logout`
pub async fn logout<S: LogStore>(
  State(state): State<ApiState<S>>,
  jar: CookieJar,
) -> Result<(CookieJar, Redirect), ApiError> {
  let jar = end_session(&state, jar).await?;
  Ok((jar, Redirect::to("/")))
}

// ─── Registration ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
  pub username:     String,
  #[serde(default)]
  pub email:        String,
  pub password:     String,
  pub confirmation: String,
}

/// `POST /register`; logs the new user in on success. Usernames are stored
/// exactly as submitted, matching the lookup in [`login`].
pub async fn register<S: LogStore>(
  State(state): State<ApiState<S>>,
  jar: CookieJar,
  ApiForm(form): ApiForm<RegisterForm>,
) -> Result<(CookieJar, Redirect), ApiError> {
  if form.password != form.confirmation {
    return Err(ApiError::PasswordMismatch);
  }
  if form.username.trim().is_empty() {
    return Err(ApiError::MalformedRequest("empty username".to_owned()));
  }

  let user = state
    .store
    .create_user(NewUser {
      username:      form.username,
      email:         form.email,
      password_hash: hash_password(&form.password)?,
    })
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::UsernameTaken)?;

  tracing::info!(user_id = user.id, username = %user.username, "user registered");
  let jar = start_session(&state, jar, user.id).await?;
  Ok((jar, Redirect::to("/")))
}
