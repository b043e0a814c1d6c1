//! borelog web server: configuration and the full application router.
//!
//! The API router from `borelog-api` is combined with static file serving
//! for the browser app (`/static`) and stored sketches (the media URL).

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use borelog_api::{ApiState, SessionConfig, SketchManager, api_router};
use borelog_core::store::LogStore;
use serde::Deserialize;
use tower_http::{services::ServeDir, trace::TraceLayer};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration.
///
/// Layered from built-in defaults, an optional TOML file, then `BORELOG_*`
/// environment variables (e.g. `BORELOG_PORT=9000`).
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  pub store_path:    PathBuf,
  /// Directory holding uploaded sketches.
  pub media_root:    PathBuf,
  /// URL prefix under which `media_root` is served; must end with `/`.
  pub media_url:     String,
  /// Directory holding the browser app (`app/app.js`).
  pub static_root:   PathBuf,
  pub cookie_secure: bool,
  pub session_days:  i64,
}

impl ServerConfig {
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8000)?
      .set_default("store_path", "borelog.sqlite3")?
      .set_default("media_root", "media")?
      .set_default("media_url", "/media/")?
      .set_default("static_root", "static")?
      .set_default("cookie_secure", false)?
      .set_default("session_days", 14)?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("BORELOG").try_parsing(true))
      .build()?
      .try_deserialize()
  }

  /// The same configuration with `~` expanded in every path.
  pub fn expanded(mut self) -> Self {
    self.store_path = expand_tilde(&self.store_path);
    self.media_root = expand_tilde(&self.media_root);
    self.static_root = expand_tilde(&self.static_root);
    self
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn sessions(&self) -> SessionConfig {
    SessionConfig { cookie_secure: self.cookie_secure, session_days: self.session_days }
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ──────────────────────────────────────────────────────────────────

pub fn state<S: LogStore>(store: Arc<S>, cfg: &ServerConfig) -> ApiState<S> {
  ApiState {
    store,
    sketches: Arc::new(SketchManager::new(cfg.media_root.clone(), cfg.media_url.clone())),
    sessions: cfg.sessions(),
  }
}

/// The complete application: API routes, static assets and stored media.
pub fn app<S>(state: ApiState<S>, cfg: &ServerConfig) -> Router
where
  S: LogStore + 'static,
{
  let router = api_router(state).nest_service("/static", ServeDir::new(&cfg.static_root));

  let media_mount = cfg.media_url.trim_end_matches('/');
  let router = if media_mount.starts_with('/') && media_mount.len() > 1 {
    router.nest_service(media_mount, ServeDir::new(&cfg.media_root))
  } else {
    tracing::warn!(media_url = %cfg.media_url, "media_url is not a local path; not serving media");
    router
  };

  router.layer(TraceLayer::new_for_http())
}
