//! Router-level tests: requests go through `api_router` against an
//! in-memory store and a temporary media directory.

use std::sync::Arc;

use axum::{
  Router,
  body::{Body, to_bytes},
  http::{Request, StatusCode, header},
  response::Response,
};
use borelog_core::{
  model::{BoreholeFields, NewUser, ProjectFields, User},
  store::LogStore,
};
use borelog_store_sqlite::SqliteStore;
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt as _;

use crate::{
  ApiState, SessionConfig, SketchManager, api_router,
  auth::{SESSION_COOKIE, hash_password, hash_token, new_token},
  media::SKETCH_DIR,
};

struct Harness {
  app:    Router,
  store:  Arc<SqliteStore>,
  media:  TempDir,
  user:   User,
  cookie: String,
}

async fn harness() -> Harness {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let media = tempfile::tempdir().unwrap();

  let state = ApiState {
    store:    Arc::clone(&store),
    sketches: Arc::new(SketchManager::new(media.path(), "/media/")),
    sessions: SessionConfig::default(),
  };

  let user = store
    .create_user(NewUser {
      username:      "lead".into(),
      email:         "lead@example.com".into(),
      password_hash: hash_password("correct horse").unwrap(),
    })
    .await
    .unwrap()
    .unwrap();
  let cookie = login_cookie(&store, user.id).await;

  Harness { app: api_router(state), store, media, user, cookie }
}

async fn login_cookie(store: &SqliteStore, user_id: i64) -> String {
  let token = new_token();
  store
    .create_session(hash_token(&token), user_id, Utc::now() + Duration::days(1))
    .await
    .unwrap();
  format!("{SESSION_COOKIE}={token}")
}

async fn json_body(resp: Response) -> Value {
  let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

impl Harness {
  async fn send(&self, req: Request<Body>) -> Response { self.app.clone().oneshot(req).await.unwrap() }

  async fn call_as(
    &self,
    cookie: Option<&str>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
      req = req.header(header::COOKIE, cookie);
    }
    let body = body.map_or_else(Body::empty, |b| Body::from(b.to_string()));
    let resp = self.send(req.body(body).unwrap()).await;
    let status = resp.status();
    (status, json_body(resp).await)
  }

  async fn call(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    self.call_as(Some(&self.cookie), method, uri, body).await
  }

  async fn form(&self, uri: &str, body: &str) -> Response {
    let req = Request::builder()
      .method("POST")
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
      .body(Body::from(body.to_owned()))
      .unwrap();
    self.send(req).await
  }

  async fn project(&self, title: &str) -> i64 {
    self
      .store
      .create_project(self.user.id, ProjectFields {
        title:       title.into(),
        reference:   format!("R-{title}"),
        client:      "C".into(),
        description: "D".into(),
      })
      .await
      .unwrap()
      .id
  }

  async fn borehole(&self, logger_id: i64, project_id: i64, reference: &str) -> i64 {
    let fields = BoreholeFields::from_form(
      borehole_body(reference).as_object().unwrap(),
    )
    .unwrap();
    self
      .store
      .create_borehole(logger_id, project_id, fields)
      .await
      .unwrap()
      .id
  }

  fn sketch_files(&self) -> Vec<String> {
    let dir = self.media.path().join(SKETCH_DIR);
    let mut names: Vec<String> = std::fs::read_dir(dir)
      .map(|entries| {
        entries
          .filter_map(|e| e.ok())
          .map(|e| e.file_name().to_string_lossy().into_owned())
          .collect()
      })
      .unwrap_or_default();
    names.sort();
    names
  }
}

fn borehole_body(reference: &str) -> Value {
  json!({
    "borehole_reference": reference,
    "borehole_northing":  "6.524379",
    "ground_level":       "12.3",
    "drilling_equipment": "Cable percussion",
    "borehole_diameter":  150,
  })
}

fn layer_body(start: &str, end: &str) -> Value {
  json!({
    "start_depth":         start,
    "end_depth":           end,
    "sample_number":       "S1",
    "spt_result":          "",
    "field_test_details":  "Hand vane 40kPa",
    "geology_description": "Firm brown sandy CLAY",
  })
}

fn set_cookie(resp: &Response) -> Option<String> {
  resp
    .headers()
    .get_all(header::SET_COOKIE)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .find(|v| v.starts_with(SESSION_COOKIE))
    .and_then(|v| v.split(';').next())
    .map(str::to_owned)
}

// ─── Access ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn anonymous_requests_are_rejected() {
  let h = harness().await;
  for uri in ["/projects/0/1", "/profile/0", "/borehole/1", "/geology/1/0", "/sketch/1", "/message/1/1"] {
    let (status, body) = h.call_as(None, "GET", uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    assert_eq!(body, json!({ "error": "User not logged in." }), "{uri}");
  }
}

#[tokio::test]
async fn forged_cookie_is_anonymous() {
  let h = harness().await;
  let (status, body) = h
    .call_as(Some("sessionid=not-a-token"), "GET", "/projects/0/1", None)
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "User not logged in.");
}

#[tokio::test]
async fn unsupported_method_is_not_valid() {
  let h = harness().await;
  let (status, body) = h.call("DELETE", "/projects/0/1", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Request not valid.");

  let (status, _) = h.call("POST", "/profile/0", Some(json!({}))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_path_and_body() {
  let h = harness().await;
  let (status, body) = h.call("GET", "/projects/abc/1", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Request not valid.");

  let req = Request::builder()
    .method("POST")
    .uri("/projects/0/1")
    .header(header::COOKIE, &h.cookie)
    .body(Body::from("{not json"))
    .unwrap();
  let resp = h.send(req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(json_body(resp).await["error"], "Request not valid.");
}

// ─── Projects ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_list_project() {
  let h = harness().await;
  let (status, body) = h
    .call(
      "POST",
      "/projects/0/1",
      Some(json!({
        "project_title":       "A",
        "project_reference":   "R1",
        "project_client":      "C",
        "project_description": "D",
      })),
    )
    .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body, json!({ "message": "New project created." }));

  let (status, body) = h.call("GET", "/projects/0/1", None).await;
  assert_eq!(status, StatusCode::OK);
  let projects = body["projects"].as_array().unwrap();
  assert_eq!(projects.len(), 1);
  assert_eq!(projects[0]["title"], "A");
  assert_eq!(projects[0]["ref"], "R1");
  assert_eq!(projects[0]["lead"], "lead");
  assert_eq!(projects[0]["boreholes"], 0);
  assert_eq!(body["total_pages"], 1);
  assert_eq!(body["current_page"], 1);
  assert_eq!(body["has_prev"], false);
  assert_eq!(body["has_next"], false);
}

#[tokio::test]
async fn invalid_project_is_rejected() {
  let h = harness().await;
  let (status, body) = h
    .call("POST", "/projects/0/1", Some(json!({ "project_title": "A" })))
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body, json!({ "error": "Invalid inputs." }));

  let too_long = "x".repeat(56);
  let (status, _) = h
    .call(
      "POST",
      "/projects/0/1",
      Some(json!({
        "project_title":       too_long,
        "project_reference":   "R1",
        "project_client":      "C",
        "project_description": "D",
      })),
    )
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn project_listing_is_paginated_newest_first() {
  let h = harness().await;
  for n in 1..=7 {
    h.project(&format!("P{n}")).await;
  }

  let (_, first) = h.call("GET", "/projects/0/1", None).await;
  let titles: Vec<&str> = first["projects"]
    .as_array()
    .unwrap()
    .iter()
    .map(|p| p["title"].as_str().unwrap())
    .collect();
  assert_eq!(titles, vec!["P7", "P6", "P5", "P4", "P3"]);
  assert_eq!(first["total_pages"], 2);
  assert_eq!(first["has_next"], true);

  let (_, clamped) = h.call("GET", "/projects/0/9", None).await;
  assert_eq!(clamped["current_page"], 2);
  assert_eq!(clamped["projects"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn project_detail_lists_boreholes_oldest_first() {
  let h = harness().await;
  let p = h.project("A").await;
  h.borehole(h.user.id, p, "BH1").await;
  h.borehole(h.user.id, p, "BH2").await;

  let (status, body) = h.call("GET", &format!("/projects/{p}/1"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["project"]["boreholes"], 2);
  let refs: Vec<&str> = body["boreholes"]
    .as_array()
    .unwrap()
    .iter()
    .map(|b| b["ref"].as_str().unwrap())
    .collect();
  assert_eq!(refs, vec!["BH1", "BH2"]);
}

#[tokio::test]
async fn update_project() {
  let h = harness().await;
  let p = h.project("A").await;
  let body = json!({
    "project_title":       "B",
    "project_reference":   "R2",
    "project_client":      "C2",
    "project_description": "D2",
  });

  let (status, reply) = h.call("PUT", &format!("/projects/{p}/1"), Some(body.clone())).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(reply["message"], "Project updated.");
  let (_, detail) = h.call("GET", &format!("/projects/{p}/1"), None).await;
  assert_eq!(detail["project"]["title"], "B");

  let (status, reply) = h.call("PUT", "/projects/999/1", Some(body)).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(reply["error"], "Project could not be found.");
}

#[tokio::test]
async fn missing_project_is_not_found() {
  let h = harness().await;
  let (status, body) = h.call("GET", "/projects/42/1", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body, json!({ "error": "Project could not be found." }));
}

// ─── Boreholes ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn borehole_round_trips_every_field() {
  let h = harness().await;
  let p = h.project("A").await;
  let mut body = borehole_body("BH1");
  body["projectId"] = json!(p.to_string());

  let (status, reply) = h.call("POST", "/borehole/0", Some(body)).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(reply["message"], "New borehole created.");

  let id = h.store.list_boreholes(p).await.unwrap()[0].borehole.id;
  let (status, record) = h.call("GET", &format!("/borehole/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(record["ref"], "BH1");
  assert_eq!(record["northing"], "6.524379");
  assert_eq!(record["easting"], Value::Null);
  assert_eq!(record["ground_level"], "12.30");
  assert_eq!(record["equipment"], "Cable percussion");
  assert_eq!(record["bh_dia"], 150);
  assert_eq!(record["logger"], "lead");
  assert_eq!(record["logger_id"], h.user.id);
  assert_eq!(record["project"], "A");
  assert_eq!(record["project_ref"], "R-A");
  assert_eq!(record["project_client"], "C");
}

#[tokio::test]
async fn borehole_validation() {
  let h = harness().await;
  let p = h.project("A").await;

  let mut negative = borehole_body("BH1");
  negative["projectId"] = json!(p);
  negative["borehole_diameter"] = json!(-1);
  let (status, body) = h.call("POST", "/borehole/0", Some(negative)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Invalid inputs.");

  let mut no_level = borehole_body("BH1");
  no_level["projectId"] = json!(p);
  no_level.as_object_mut().unwrap().remove("ground_level");
  let (status, _) = h.call("POST", "/borehole/0", Some(no_level)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  assert!(h.store.list_boreholes(p).await.unwrap().is_empty());
}

#[tokio::test]
async fn borehole_needs_a_project() {
  let h = harness().await;
  let mut body = borehole_body("BH1");
  body["projectId"] = json!(77);
  let (status, reply) = h.call("POST", "/borehole/0", Some(body)).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(reply["error"], "Project could not be found.");

  let (status, reply) = h.call("POST", "/borehole/0", Some(borehole_body("BH1"))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(reply["error"], "Request not valid.");
}

#[tokio::test]
async fn update_borehole() {
  let h = harness().await;
  let p = h.project("A").await;
  let b = h.borehole(h.user.id, p, "BH1").await;

  let mut body = borehole_body("BH1-rev");
  body["borehole_diameter"] = json!("0");
  let (status, reply) = h.call("PUT", &format!("/borehole/{b}"), Some(body)).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(reply["message"], "Borehole updated.");

  let (_, record) = h.call("GET", &format!("/borehole/{b}"), None).await;
  assert_eq!(record["ref"], "BH1-rev");
  assert_eq!(record["bh_dia"], 0);

  let (status, _) = h.call("GET", "/borehole/999", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Profiles ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn profile_dedups_logged_projects() {
  let h = harness().await;
  let logger = h
    .store
    .create_user(NewUser {
      username:      "logger".into(),
      email:         String::new(),
      password_hash: "x".into(),
    })
    .await
    .unwrap()
    .unwrap();

  let p1 = h.project("Older").await;
  let p2 = h.project("Newer").await;
  h.borehole(logger.id, p1, "A").await;
  h.borehole(logger.id, p1, "B").await;
  h.borehole(logger.id, p2, "C").await;

  let (status, body) = h.call("GET", &format!("/profile/{}", logger.id), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["user"], "logger");
  assert_eq!(body["projects_leading"], json!([]));
  let logging: Vec<&str> = body["projects_logging"]
    .as_array()
    .unwrap()
    .iter()
    .map(|p| p["title"].as_str().unwrap())
    .collect();
  assert_eq!(logging, vec!["Newer", "Older"]);

  let (_, lead) = h.call("GET", &format!("/profile/{}", h.user.id), None).await;
  assert_eq!(lead["projects_leading"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn profile_zero_lists_users() {
  let h = harness().await;
  let p = h.project("A").await;
  h.borehole(h.user.id, p, "BH1").await;

  let (status, body) = h.call("GET", "/profile/0", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    body,
    json!([{ "id": h.user.id, "username": "lead", "projects": 1, "boreholes": 1 }])
  );

  let (status, body) = h.call("GET", "/profile/999", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "User could not be found.");
}

// ─── Geology ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn geology_layers_in_creation_order() {
  let h = harness().await;
  let p = h.project("A").await;
  let b = h.borehole(h.user.id, p, "BH1").await;

  for (start, end) in [("0", "1.2"), ("1.2", "3.5")] {
    let (status, reply) = h
      .call("POST", &format!("/geology/{b}/0"), Some(layer_body(start, end)))
      .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reply["message"], "New layer added.");
  }

  let (status, body) = h.call("GET", &format!("/geology/{b}/0"), None).await;
  assert_eq!(status, StatusCode::OK);
  let layers = body.as_array().unwrap();
  assert_eq!(layers.len(), 2);
  assert_eq!(layers[0]["start_depth"], "0.00");
  assert_eq!(layers[1]["end_depth"], "3.50");
  assert_eq!(layers[0]["borehole"], "BH1");
  assert_eq!(layers[0]["sample_id"], "S1");
  assert_eq!(layers[0]["spt"], Value::Null);

  let id = layers[1]["id"].as_i64().unwrap();
  let (status, reply) = h
    .call("PUT", &format!("/geology/{b}/{id}"), Some(layer_body("1.2", "4")))
    .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(reply["message"], "Strata updated.");

  let (_, layer) = h.call("GET", &format!("/geology/{b}/{id}"), None).await;
  assert_eq!(layer["end_depth"], "4.00");
}

#[tokio::test]
async fn geology_needs_a_borehole() {
  let h = harness().await;
  let (status, body) = h.call("GET", "/geology/5/0", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "Borehole could not be found.");

  let p = h.project("A").await;
  let b = h.borehole(h.user.id, p, "BH1").await;
  let (status, body) = h.call("GET", &format!("/geology/{b}/99"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "Geology could not be found.");

  let (status, body) = h
    .call("POST", &format!("/geology/{b}/0"), Some(json!({ "start_depth": "x" })))
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Invalid inputs.");
}

// ─── Messages ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn messages_paginate_newest_first() {
  let h = harness().await;
  let p = h.project("A").await;

  for n in 1..=7 {
    let (status, reply) = h
      .call("POST", &format!("/message/{p}/1"), Some(json!({ "message": format!("m{n}") })))
      .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reply["message"], "Message added.");
  }

  let (_, first) = h.call("GET", &format!("/message/{p}/1"), None).await;
  let texts: Vec<&str> = first["messages"]
    .as_array()
    .unwrap()
    .iter()
    .map(|m| m["message"].as_str().unwrap())
    .collect();
  assert_eq!(texts, vec!["m7", "m6", "m5", "m4", "m3"]);
  assert_eq!(first["messages"][0]["user"], "lead");
  assert_eq!(first["total_pages"], 2);
  assert_eq!(first["has_prev"], false);
  assert_eq!(first["has_next"], true);

  let (_, second) = h.call("GET", &format!("/message/{p}/2"), None).await;
  assert_eq!(second["messages"].as_array().unwrap().len(), 2);
  assert_eq!(second["has_prev"], true);
  assert_eq!(second["has_next"], false);
}

#[tokio::test]
async fn message_validation_and_missing_project() {
  let h = harness().await;
  let p = h.project("A").await;
  let (status, body) = h
    .call("POST", &format!("/message/{p}/1"), Some(json!({ "message": "   " })))
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Invalid inputs.");

  let (status, body) = h.call("GET", "/message/404/1", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "Project could not be found.");
}

// ─── Sketches ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn sketch_replacement_keeps_one_file() {
  let h = harness().await;
  let p = h.project("A").await;

  let (status, body) = h.call("GET", &format!("/sketch/{p}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "message": "No previous sketches." }));

  let png = json!({ "dataURI": "data:image/png;base64,aGVsbG8=" });
  let (status, reply) = h.call("POST", &format!("/sketch/{p}"), Some(png.clone())).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(reply["message"], "Sketch added.");

  let (_, body) = h.call("GET", &format!("/sketch/{p}"), None).await;
  let url = body["img"].as_str().unwrap().to_owned();
  assert!(url.starts_with(&format!("/media/{SKETCH_DIR}/{p}_")), "{url}");
  assert!(url.ends_with(".png"));

  let gif = json!({ "dataURI": "data:image/gif;base64,R0lGODlh" });
  let (status, _) = h.call("POST", &format!("/sketch/{p}"), Some(gif)).await;
  assert_eq!(status, StatusCode::CREATED);

  let files = h.sketch_files();
  assert_eq!(files.len(), 1, "{files:?}");
  assert!(files[0].ends_with(".gif"));

  // Uploading again still leaves a single file.
  h.call("POST", &format!("/sketch/{p}"), Some(png)).await;
  assert_eq!(h.sketch_files().len(), 1);
}

#[tokio::test]
async fn malformed_sketch_is_rejected() {
  let h = harness().await;
  let p = h.project("A").await;

  for body in [json!({ "dataURI": "data:image/png,aGVsbG8=" }), json!({})] {
    let (status, reply) = h.call("POST", &format!("/sketch/{p}"), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(reply["error"], "Sketch data not valid.");
  }
  assert!(h.sketch_files().is_empty());

  let (status, _) = h
    .call("POST", "/sketch/999", Some(json!({ "dataURI": "data:image/png;base64,aGVsbG8=" })))
    .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Sessions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_and_logout() {
  let h = harness().await;

  let resp = h.form("/login", "username=lead&password=wrong").await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(json_body(resp).await["error"], "Invalid username and/or password.");

  let resp = h.form("/login", "username=lead&password=correct+horse").await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(resp.headers()[header::LOCATION], "/");
  let cookie = set_cookie(&resp).unwrap();

  let (status, _) = h.call_as(Some(&cookie), "GET", "/projects/0/1", None).await;
  assert_eq!(status, StatusCode::OK);

  let req = Request::builder()
    .uri("/logout")
    .header(header::COOKIE, &cookie)
    .body(Body::empty())
    .unwrap();
  let resp = h.send(req).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);

  let (status, body) = h.call_as(Some(&cookie), "GET", "/projects/0/1", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "User not logged in.");
}

#[tokio::test]
async fn register_flow() {
  let h = harness().await;

  let resp = h
    .form("/register", "username=new&email=n%40x.io&password=a&confirmation=b")
    .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(json_body(resp).await["error"], "Passwords must match.");

  let resp = h
    .form("/register", "username=lead&email=&password=a&confirmation=a")
    .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(json_body(resp).await["error"], "Username already taken.");

  let resp = h
    .form("/register", "username=new&email=n%40x.io&password=pw&confirmation=pw")
    .await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  let cookie = set_cookie(&resp).unwrap();

  let (status, body) = h.call_as(Some(&cookie), "GET", "/profile/0", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn register_keeps_username_as_typed() {
  let h = harness().await;

  let resp = h
    .form("/register", "username=alice+&email=&password=pw&confirmation=pw")
    .await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);

  let resp = h.form("/login", "username=alice+&password=pw").await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert!(set_cookie(&resp).is_some());

  let resp = h.form("/login", "username=alice&password=pw").await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let resp = h
    .form("/register", "username=+++&email=&password=pw&confirmation=pw")
    .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(json_body(resp).await["error"], "Request not valid.");
}

#[tokio::test]
async fn index_redirects_anonymous_users() {
  let h = harness().await;

  let resp = h.send(Request::builder().uri("/").body(Body::empty()).unwrap()).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(resp.headers()[header::LOCATION], "/login");

  let req = Request::builder()
    .uri("/")
    .header(header::COOKIE, &h.cookie)
    .body(Body::empty())
    .unwrap();
  let resp = h.send(req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let html = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let html = String::from_utf8(html.to_vec()).unwrap();
  assert!(html.contains(&format!("data-user=\"{}\"", h.user.id)));
  assert!(html.contains("/static/app/app.js"));
  assert!(html.contains(r##"<a href="#" id="nav-projects">"##));

  let resp = h.send(Request::builder().uri("/login").body(Body::empty()).unwrap()).await;
  assert_eq!(resp.status(), StatusCode::OK);
}
