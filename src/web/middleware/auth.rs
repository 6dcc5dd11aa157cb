//! Session gate for protected routes.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use tracing::debug;

use crate::auth::SessionManager;
use crate::web::handlers::AppState;

/// Where unauthenticated requests are sent.
pub const LOGIN_PATH: &str = "/";

/// Identity bound to a validated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// User ID from the session.
    pub user_id: i64,
    /// Email from the session.
    pub email: String,
}

/// Check the request's session cookie.
///
/// Every failure becomes the same redirect to the login page. The reason is
/// only logged.
pub fn guard(sessions: &SessionManager, jar: &CookieJar) -> Result<AuthUser, Redirect> {
    match sessions.validate(jar.get(sessions.cookie_name())) {
        Ok(session) => Ok(AuthUser {
            user_id: session.user_id,
            email: session.email,
        }),
        Err(e) => {
            debug!(reason = %e, "Session rejected");
            Err(Redirect::to(LOGIN_PATH))
        }
    }
}

/// Middleware requiring a valid session.
///
/// On success the [`AuthUser`] is stored in the request extensions for
/// handlers to extract. Otherwise the inner handler never runs.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    match guard(&state.sessions, &jar) {
        Ok(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(redirect) => redirect.into_response(),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| Redirect::to(LOGIN_PATH))
    }
}
