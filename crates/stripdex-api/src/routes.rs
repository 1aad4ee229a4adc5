//! The public REST surface.
//!
//! Responses are pretty-printed JSON (two-space indent); the login reply is
//! the raw token text. Backend error kinds are translated to HTTP statuses
//! here: `NotFound` becomes 404, `AlreadyRunning` becomes 202, everything
//! else 500.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tower_http::trace::TraceLayer;

use stripdex_core::{Comic, Error};

use crate::aaa::Aaa;
use crate::middleware::{self, RateState};
use crate::ports::{Pinger, Searcher, Updater};
use crate::rate;

/// Shared gateway state.
#[derive(Clone)]
pub struct AppState {
    pub updater: Arc<dyn Updater>,
    pub searcher: Arc<dyn Searcher>,
    pub pingers: Arc<Vec<(&'static str, Arc<dyn Pinger>)>>,
    pub aaa: Aaa,
}

/// Admission knobs applied while building the router.
pub struct RouterOptions {
    pub search_concurrency: usize,
    pub search_rate: i64,
    pub timeout: Duration,
}

/// Build the complete gateway router.
///
/// ## Public
/// - `GET /api/ping` - backend fan-out probe
/// - `POST /api/login` - credential check, returns a raw token
/// - `GET /api/search` - DB-backed search (concurrency-capped)
/// - `GET /api/isearch` - index-backed search (rate-limited)
/// - `GET /api/db/stats`, `GET /api/db/status`
///
/// ## Token-protected
/// - `POST /api/db/update`, `DELETE /api/db`
pub fn router(state: AppState, options: &RouterOptions) -> Router {
    let semaphore = Arc::new(Semaphore::new(options.search_concurrency));
    let rate_state = RateState {
        limiter: (options.search_rate > 0).then(|| rate::shared(options.search_rate as u32)),
        timeout: options.timeout,
    };

    Router::new()
        .route("/api/ping", get(ping))
        .route("/api/login", post(login))
        .route(
            "/api/search",
            get(search).layer(from_fn_with_state(semaphore, middleware::concurrency)),
        )
        .route(
            "/api/isearch",
            get(index_search).layer(from_fn_with_state(rate_state, middleware::rate)),
        )
        .route(
            "/api/db/update",
            post(update).layer(from_fn_with_state(state.aaa.clone(), middleware::auth)),
        )
        .route("/api/db/stats", get(stats))
        .route("/api/db/status", get(status))
        .route(
            "/api/db",
            delete(drop_db).layer(from_fn_with_state(state.aaa.clone(), middleware::auth)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ═══════════════════════════════════════════════════════════════════════════
// DTOs
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct PingReply {
    replies: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    name: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct ComicDto {
    id: i64,
    url: String,
}

#[derive(Debug, Serialize)]
struct ComicsReply {
    comics: Vec<ComicDto>,
    total: usize,
}

#[derive(Debug, Serialize)]
struct StatusReply {
    status: String,
}

// ═══════════════════════════════════════════════════════════════════════════
// Handlers
// ═══════════════════════════════════════════════════════════════════════════

async fn ping(State(state): State<AppState>) -> Response {
    let probes = state.pingers.iter().map(|(name, pinger)| {
        let pinger = pinger.clone();
        let name = *name;
        async move { (name, pinger.ping().await) }
    });

    let mut replies = BTreeMap::new();
    for (name, result) in futures::future::join_all(probes).await {
        let verdict = match result {
            Ok(()) => "ok",
            Err(err) => {
                tracing::error!(service = name, error = %err, "service is not available");
                "unavailable"
            }
        };
        replies.insert(name.to_string(), verdict.to_string());
    }

    pretty_json(StatusCode::OK, &PingReply { replies })
}

async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "cannot decode login request");
            return (StatusCode::BAD_REQUEST, "bad request").into_response();
        }
    };

    match state.aaa.login(&request.name, &request.password) {
        Ok(token) => (StatusCode::OK, token).into_response(),
        Err(err) => {
            tracing::debug!(error = %err, "failed login attempt");
            (StatusCode::UNAUTHORIZED, "invalid credentials").into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    phrase: Option<String>,
    limit: Option<String>,
}

/// Validate the shared query parameters of both search routes.
fn parse_search_params(params: &SearchParams) -> Result<(String, i64), Response> {
    let limit = match params.limit.as_deref() {
        None | Some("") => 0,
        Some(raw) => match raw.parse::<i64>() {
            Ok(value) if value >= 0 => value,
            _ => {
                tracing::debug!(limit = raw, "wrong limit");
                return Err((StatusCode::BAD_REQUEST, "bad limit").into_response());
            }
        },
    };

    match params.phrase.as_deref() {
        Some(phrase) if !phrase.is_empty() => Ok((phrase.to_string(), limit)),
        _ => {
            tracing::debug!("no phrase");
            Err((StatusCode::BAD_REQUEST, "no phrase").into_response())
        }
    }
}

async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let (phrase, limit) = match parse_search_params(&params) {
        Ok(parsed) => parsed,
        Err(resp) => return resp,
    };
    reply_comics(state.searcher.search(&phrase, limit).await)
}

async fn index_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let (phrase, limit) = match parse_search_params(&params) {
        Ok(parsed) => parsed,
        Err(resp) => return resp,
    };
    reply_comics(state.searcher.index_search(&phrase, limit).await)
}

fn reply_comics(result: stripdex_core::Result<Vec<Comic>>) -> Response {
    match result {
        Ok(comics) => {
            let reply = ComicsReply {
                total: comics.len(),
                comics: comics
                    .into_iter()
                    .map(|c| ComicDto { id: c.id, url: c.url })
                    .collect(),
            };
            pretty_json(StatusCode::OK, &reply)
        }
        Err(Error::NotFound) => (StatusCode::NOT_FOUND, "no comics found").into_response(),
        Err(err) => {
            tracing::error!(error = %err, "error while searching");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn update(State(state): State<AppState>) -> Response {
    match state.updater.update().await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(Error::AlreadyRunning) => {
            (StatusCode::ACCEPTED, "update already runs").into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "error while updating");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn stats(State(state): State<AppState>) -> Response {
    match state.updater.stats().await {
        Ok(stats) => pretty_json(StatusCode::OK, &stats),
        Err(err) => {
            tracing::error!(error = %err, "error while getting stats");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn status(State(state): State<AppState>) -> Response {
    match state.updater.status().await {
        Ok(status) => pretty_json(
            StatusCode::OK,
            &StatusReply {
                status: status.as_str().to_string(),
            },
        ),
        Err(err) => {
            tracing::error!(error = %err, "error while getting status");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn drop_db(State(state): State<AppState>) -> Response {
    match state.updater.drop_all().await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => {
            tracing::error!(error = %err, "error while dropping");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Encode a reply as pretty-printed JSON with a two-space indent.
fn pretty_json<T: serde::Serialize>(status: StatusCode, value: &T) -> Response {
    match serde_json::to_string_pretty(value) {
        Ok(mut body) => {
            body.push('\n');
            (
                status,
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "cannot encode reply");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FakePinger, FakeSearcher, FakeUpdater};
    use axum::body::Body;
    use axum::http::header::AUTHORIZATION;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use stripdex_core::{DbStats, ServiceStats};
    use tower::ServiceExt;

    fn test_aaa() -> Aaa {
        Aaa::from_credentials("admin", "hunter2", Duration::from_secs(60))
    }

    fn test_app(updater: FakeUpdater, searcher: FakeSearcher) -> Router {
        let pingers: Vec<(&'static str, Arc<dyn Pinger>)> = vec![
            ("update", Arc::new(FakePinger { ok: true })),
            ("search", Arc::new(FakePinger { ok: false })),
            ("words", Arc::new(FakePinger { ok: true })),
        ];
        let state = AppState {
            updater: Arc::new(updater),
            searcher: Arc::new(searcher),
            pingers: Arc::new(pingers),
            aaa: test_aaa(),
        };
        router(
            state,
            &RouterOptions {
                search_concurrency: 4,
                search_rate: 0,
                timeout: Duration::from_secs(1),
            },
        )
    }

    fn comics(ids: &[i64]) -> Vec<Comic> {
        ids.iter()
            .map(|id| Comic {
                id: *id,
                url: format!("https://example.com/{id}"),
                words: vec!["linux".to_string()],
            })
            .collect()
    }

    async fn body_string(resp: Response) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn ping_reports_backend_health() {
        let resp = test_app(FakeUpdater::default(), FakeSearcher::default())
            .oneshot(Request::get("/api/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_string(resp).await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["replies"]["update"], "ok");
        assert_eq!(json["replies"]["search"], "unavailable");
        assert_eq!(json["replies"]["words"], "ok");
    }

    #[tokio::test]
    async fn login_returns_verifiable_token() {
        let resp = test_app(FakeUpdater::default(), FakeSearcher::default())
            .oneshot(
                Request::post("/api/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"name":"admin","password":"hunter2"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let token = body_string(resp).await;
        test_aaa().verify(&token).unwrap();
    }

    #[tokio::test]
    async fn login_rejects_bad_credentials() {
        let resp = test_app(FakeUpdater::default(), FakeSearcher::default())
            .oneshot(
                Request::post("/api/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"admin","password":"nope"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_rejects_bad_json() {
        let resp = test_app(FakeUpdater::default(), FakeSearcher::default())
            .oneshot(
                Request::post("/api/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn search_requires_a_phrase() {
        for uri in ["/api/search", "/api/search?phrase="] {
            let resp = test_app(FakeUpdater::default(), FakeSearcher::default())
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "uri: {uri}");
        }
    }

    #[tokio::test]
    async fn search_rejects_bad_limits() {
        for uri in ["/api/search?phrase=linux&limit=-1", "/api/search?phrase=linux&limit=abc"] {
            let resp = test_app(FakeUpdater::default(), FakeSearcher::default())
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "uri: {uri}");
        }
    }

    #[tokio::test]
    async fn search_strips_words_from_the_reply() {
        let searcher = FakeSearcher::default().with_search(comics(&[2, 1]));
        let resp = test_app(FakeUpdater::default(), searcher)
            .oneshot(
                Request::get("/api/search?phrase=linux&limit=2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_string(resp).await;
        // pretty-printed, two-space indent, ranked order preserved
        assert!(body.contains("{\n  \"comics\""), "body: {body}");
        assert!(!body.contains("words"));
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["total"], 2);
        assert_eq!(json["comics"][0]["id"], 2);
        assert_eq!(json["comics"][1]["id"], 1);
    }

    #[tokio::test]
    async fn search_maps_not_found() {
        let searcher = FakeSearcher::default().with_search_error(Error::NotFound);
        let resp = test_app(FakeUpdater::default(), searcher)
            .oneshot(
                Request::get("/api/search?phrase=nothing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn index_search_replies_with_comics() {
        let searcher = FakeSearcher::default().with_index_search(comics(&[1]));
        let resp = test_app(FakeUpdater::default(), searcher)
            .oneshot(
                Request::get("/api/isearch?phrase=linux&limit=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn update_requires_a_token() {
        let resp = test_app(FakeUpdater::default(), FakeSearcher::default())
            .oneshot(Request::post("/api/db/update").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn update_with_token_succeeds() {
        let token = test_aaa().login("admin", "hunter2").unwrap();
        let resp = test_app(FakeUpdater::default(), FakeSearcher::default())
            .oneshot(
                Request::post("/api/db/update")
                    .header(AUTHORIZATION, format!("Token {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn concurrent_update_maps_to_accepted() {
        let token = test_aaa().login("admin", "hunter2").unwrap();
        let updater = FakeUpdater::default().with_update_error(Error::AlreadyRunning);
        let resp = test_app(updater, FakeSearcher::default())
            .oneshot(
                Request::post("/api/db/update")
                    .header(AUTHORIZATION, format!("Token {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn stats_and_status_reply_json() {
        let updater = FakeUpdater::default().with_stats(ServiceStats::new(
            DbStats {
                words_total: 10,
                words_unique: 7,
                comics_fetched: 3,
            },
            5,
        ));
        let app = test_app(updater, FakeSearcher::default());

        let resp = app
            .clone()
            .oneshot(Request::get("/api/db/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json: serde_json::Value =
            serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(json["words_total"], 10);
        assert_eq!(json["comics_total"], 5);

        let resp = app
            .oneshot(Request::get("/api/db/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(json["status"], "idle");
    }

    #[tokio::test]
    async fn drop_requires_token_and_succeeds_with_one() {
        let app = test_app(FakeUpdater::default(), FakeSearcher::default());

        let resp = app
            .clone()
            .oneshot(Request::delete("/api/db").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let token = test_aaa().login("admin", "hunter2").unwrap();
        let resp = app
            .oneshot(
                Request::delete("/api/db")
                    .header(AUTHORIZATION, format!("Token {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn backend_failure_maps_to_500() {
        let searcher = FakeSearcher::default()
            .with_search_error(Error::Unavailable("search is down".to_string()));
        let resp = test_app(FakeUpdater::default(), searcher)
            .oneshot(
                Request::get("/api/search?phrase=linux")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
