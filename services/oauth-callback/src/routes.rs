//! HTTP handlers for the login redirect and the authorization callback
//!
//! `/login` sends the browser to the authorization server, `/callback`
//! receives the code and exchanges it for the token endpoint's response,
//! which is returned verbatim with the endpoint's own content type.

use axum::Router;
use axum::extract::{Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use oauth_client::{Authorization, OAuth2Client, Params};
use serde::Deserialize;
use tracing::{info, instrument, warn};

/// Browser query parameters `/login` passes on to the authorization server.
/// Everything the client sets itself (`client_id`, `redirect_uri`,
/// `response_type`, `scope`) stays under the service's control.
const FORWARDED_LOGIN_PARAMS: &[&str] = &["state", "prompt", "login_hint", "nonce", "ui_locales"];

/// Shared state passed to handlers via axum State extractor
#[derive(Clone)]
pub struct AppState {
    pub client: OAuth2Client,
}

/// Query parameters the authorization server appends to the redirect URI
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Build the axum router with all routes and shared state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/login", get(login_handler))
        .route("/authorize-url", get(authorize_url_handler))
        .route("/callback", get(callback_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// JSON error envelope: {"error":{"type":"oauth_error","message":"..."}}
fn error_response(status: StatusCode, message: &str, extra: serde_json::Value) -> Response {
    let mut error = serde_json::json!({
        "type": "oauth_error",
        "message": message,
    });
    if let (Some(fields), serde_json::Value::Object(extra)) = (error.as_object_mut(), extra) {
        fields.extend(extra);
    }
    (
        status,
        [(CONTENT_TYPE, "application/json")],
        serde_json::json!({ "error": error }).to_string(),
    )
        .into_response()
}

/// Either redirect to the authorize URL or describe it as JSON.
///
/// Only [`FORWARDED_LOGIN_PARAMS`] from the incoming query reach the
/// authorization server; other keys are dropped.
fn authorize_response(
    client: &OAuth2Client,
    redirect_on_call: bool,
    query: Vec<(String, String)>,
) -> Response {
    let params: Params = query
        .into_iter()
        .filter(|(key, _)| FORWARDED_LOGIN_PARAMS.contains(&key.as_str()))
        .collect();
    match client.authorize(|location: &str| Redirect::to(location), redirect_on_call, &params) {
        Authorization::Redirect(redirect) => redirect.into_response(),
        Authorization::Url(url) => (
            StatusCode::OK,
            [(CONTENT_TYPE, "application/json")],
            serde_json::json!({ "authorize_url": url }).to_string(),
        )
            .into_response(),
    }
}

/// GET /login: 303 to the authorization server.
#[instrument(skip_all)]
async fn login_handler(
    State(state): State<AppState>,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    info!(forwarded_params = query.len(), "redirecting to authorization server");
    authorize_response(&state.client, true, query)
}

/// GET /authorize-url: the same URL `/login` would redirect to.
async fn authorize_url_handler(
    State(state): State<AppState>,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    authorize_response(&state.client, false, query)
}

/// GET /callback: exchange the authorization code.
///
/// Status mapping: missing code or an authorization error → 400, token
/// endpoint rejection or unreachable endpoint → 502, timeout → 504.
#[instrument(skip_all)]
async fn callback_handler(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Response {
    if let Some(error) = query.error {
        warn!(error = %error, "authorization server returned an error");
        let message = query.error_description.unwrap_or_else(|| error.clone());
        return error_response(
            StatusCode::BAD_REQUEST,
            &message,
            serde_json::json!({ "authorization_error": error }),
        );
    }

    let Some(code) = query.code.filter(|c| !c.is_empty()) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "missing authorization code",
            serde_json::Value::Null,
        );
    };

    match state.client.exchange_code(&code, &Params::new()).await {
        Ok(token) => {
            info!("authorization code exchanged");
            // Untyped bodies go out as opaque bytes
            let content_type = token
                .content_type()
                .and_then(|ct| HeaderValue::from_str(ct).ok())
                .unwrap_or(HeaderValue::from_static("application/octet-stream"));
            (
                StatusCode::OK,
                [(CONTENT_TYPE, content_type)],
                token.into_body(),
            )
                .into_response()
        }
        Err(oauth_client::Error::NonSuccessStatus { status, body }) => {
            warn!(upstream_status = status, "token endpoint rejected code");
            // Non-UTF-8 bodies are reported as null rather than rewritten
            let upstream_body = std::str::from_utf8(&body).ok();
            error_response(
                StatusCode::BAD_GATEWAY,
                "token endpoint rejected the authorization code",
                serde_json::json!({
                    "upstream_status": status,
                    "upstream_body": upstream_body,
                }),
            )
        }
        Err(e) if e.is_timeout() => {
            warn!(error = %e, "token endpoint timed out");
            error_response(
                StatusCode::GATEWAY_TIMEOUT,
                "token endpoint timed out",
                serde_json::Value::Null,
            )
        }
        Err(e) => {
            warn!(error = %e, "token exchange failed");
            error_response(
                StatusCode::BAD_GATEWAY,
                &format!("token exchange failed: {e}"),
                serde_json::Value::Null,
            )
        }
    }
}

/// GET /health
async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "application/json")],
        serde_json::json!({ "status": "healthy" }).to_string(),
    )
}
