//! Dashboard authentication extractor.
//!
//! Every `/dashboard` handler takes `RequireDashboardAuth`; the session
//! marker it checks is only ever written by a successful login.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, header, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{AuthContext, session_keys};

/// Extractor that requires an authenticated dashboard session.
///
/// Browser requests without one are redirected to the login page with
/// the original path preserved; JSON requests get a bare 401.
pub struct RequireDashboardAuth(pub AuthContext);

/// Rejection for an unauthenticated dashboard request.
pub enum AuthRejection {
    /// Redirect to the login page, preserving the requested path.
    RedirectToLogin(String),
    /// Unauthorized response (for JSON requests).
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin(next) => {
                Redirect::to(&format!("/dashboard/login?next={next}")).into_response()
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireDashboardAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Session is placed in extensions by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::Unauthorized)?;

        let auth: AuthContext = session
            .get(session_keys::DASHBOARD_AUTH)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| {
                if wants_json(&parts.headers) {
                    AuthRejection::Unauthorized
                } else {
                    AuthRejection::RedirectToLogin(parts.uri.path().to_string())
                }
            })?;

        Ok(Self(auth))
    }
}

/// A request that asks for or carries JSON gets a bare 401 instead of
/// the login redirect.
fn wants_json(headers: &HeaderMap) -> bool {
    [header::ACCEPT, header::CONTENT_TYPE].iter().any(|name| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("application/json"))
    })
}

/// Mark the session as holding an authenticated dashboard user.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_dashboard_auth(
    session: &Session,
    auth: &AuthContext,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::DASHBOARD_AUTH, auth).await
}

/// Clear the dashboard auth marker (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_dashboard_auth(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<AuthContext>(session_keys::DASHBOARD_AUTH)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(name: header::HeaderName, value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(name, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn test_wants_json_from_accept_header() {
        assert!(wants_json(&headers(header::ACCEPT, "application/json")));
        assert!(wants_json(&headers(
            header::ACCEPT,
            "text/html, application/json;q=0.9"
        )));
        assert!(!wants_json(&headers(header::ACCEPT, "text/html")));
    }

    #[test]
    fn test_wants_json_from_content_type() {
        assert!(wants_json(&headers(
            header::CONTENT_TYPE,
            "application/json; charset=utf-8"
        )));
    }

    #[test]
    fn test_plain_request_falls_back_to_redirect() {
        assert!(!wants_json(&HeaderMap::new()));
    }
}
