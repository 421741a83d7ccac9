//! OAuth relay for the CMS admin panel
//!
//! `GET /api/auth` walks the GitHub authorization-code flow: without
//! parameters it sends the browser to the provider, on the way back it
//! trades the `code` for a token and hands the token to the admin panel
//! in the URL fragment.

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use super::AppState;
use crate::config::OAuthConfig;
use crate::helpers::encode_component;

/// Fragment error used whenever the token exchange itself fails
pub const TOKEN_EXCHANGE_FAILED: &str = "token_exchange_failed";

/// Fragment error used when no client id is configured
pub const NOT_CONFIGURED: &str = "oauth_not_configured";

#[derive(Debug, Default, Deserialize)]
pub struct AuthQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
    redirect_uri: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("OAuth client credentials are not configured")]
    MissingCredentials,

    #[error("Token request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Token response carried neither a token nor an error")]
    EmptyResponse,
}

/// Result of a completed token exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exchange {
    Token(String),
    /// The provider answered with an error code
    Rejected(String),
}

/// Routes for the auth endpoint; every response carries CORS headers
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth", get(auth_handler).options(preflight_handler))
        .layer(middleware::map_response(cors_headers))
}

async fn cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}

async fn preflight_handler() -> StatusCode {
    StatusCode::OK
}

async fn auth_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AuthQuery>,
) -> Response {
    let oauth = &state.site.config.oauth;
    let redirect_uri = oauth.redirect_uri_for(&state.site.config.url);

    if let Some(error) = query.error.as_deref().filter(|e| !e.is_empty()) {
        tracing::warn!("OAuth provider returned an error: {}", error);
        return redirect(&admin_fragment(oauth, "error", error));
    }

    if let Some(code) = query.code.as_deref().filter(|c| !c.is_empty()) {
        let location = match exchange_code(&state.http, oauth, &redirect_uri, code).await {
            Ok(Exchange::Token(token)) => {
                tracing::info!("OAuth token issued, handing over to the admin panel");
                admin_fragment(oauth, "access_token", &token)
            }
            Ok(Exchange::Rejected(error)) => {
                tracing::warn!("Token exchange rejected: {}", error);
                admin_fragment(oauth, "error", &error)
            }
            Err(e) => {
                tracing::error!("Token exchange failed: {}", e);
                admin_fragment(oauth, "error", TOKEN_EXCHANGE_FAILED)
            }
        };
        return redirect(&location);
    }

    match authorize_url(oauth, &redirect_uri) {
        Some(url) => {
            tracing::debug!("Redirecting to OAuth provider: {}", url);
            redirect(&url)
        }
        None => {
            tracing::error!(
                "OAuth login requested but no client id is set ({})",
                OAuthConfig::CLIENT_ID_ENV
            );
            redirect(&admin_fragment(oauth, "error", NOT_CONFIGURED))
        }
    }
}

/// Trade an authorization code for an access token
pub async fn exchange_code(
    http: &reqwest::Client,
    oauth: &OAuthConfig,
    redirect_uri: &str,
    code: &str,
) -> Result<Exchange, AuthError> {
    let (Some(client_id), Some(client_secret)) =
        (oauth.client_id.as_deref(), oauth.client_secret.as_deref())
    else {
        return Err(AuthError::MissingCredentials);
    };

    let body: TokenResponse = http
        .post(&oauth.token_url)
        .header(header::ACCEPT, "application/json")
        .json(&TokenRequest {
            client_id,
            client_secret,
            code,
            redirect_uri,
        })
        .send()
        .await?
        .json()
        .await?;

    if let Some(error) = body.error.filter(|e| !e.is_empty()) {
        return Ok(Exchange::Rejected(error));
    }
    body.access_token
        .filter(|t| !t.is_empty())
        .map(Exchange::Token)
        .ok_or(AuthError::EmptyResponse)
}

/// Provider authorization URL, or `None` without a client id
pub fn authorize_url(oauth: &OAuthConfig, redirect_uri: &str) -> Option<String> {
    let client_id = oauth.client_id.as_deref().filter(|id| !id.is_empty())?;
    let scope: Vec<String> = oauth.scope.split(',').map(encode_component).collect();

    Some(format!(
        "{}?client_id={}&redirect_uri={}&scope={}",
        oauth.authorize_url,
        encode_component(client_id),
        encode_component(redirect_uri),
        scope.join(",")
    ))
}

/// Admin panel URL with `key=value` in the fragment
pub fn admin_fragment(oauth: &OAuthConfig, key: &str, value: &str) -> String {
    format!("{}#{}={}", oauth.admin_path, key, encode_component(value))
}

fn redirect(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(e) => {
            tracing::error!("Invalid redirect location {:?}: {}", location, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
