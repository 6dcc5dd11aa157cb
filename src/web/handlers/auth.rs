//! Login, registration, and logout handlers.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::CookieJar;
use tracing::{error, info};

use crate::auth::{
    authenticate, register as register_user, Credentials, LoginError, RegistrationError,
    RegistrationRequest,
};
use crate::template::TemplateContext;
use crate::web::dto::{LoginForm, RegisterForm};
use crate::web::error::WebError;
use crate::web::handlers::AppState;

/// Landing page after login.
pub const MAIN_PATH: &str = "/main";

/// Shown for any failed login.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// Shown when the email is taken.
pub const DUPLICATE_EMAIL_MESSAGE: &str = "Email already registered";

/// Shown when the account could not be created.
pub const ACCOUNT_CREATION_FAILED_MESSAGE: &str = "Error creating account";

/// GET / - Login form.
pub async fn login_form(State(state): State<AppState>) -> Result<Response, WebError> {
    Ok(state.render("login", &TemplateContext::new())?.into_response())
}

/// POST / - Check credentials and start a session.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, WebError> {
    let LoginForm { email, password } = form;

    match authenticate(state.users.as_ref(), Credentials::new(email.clone(), password)).await {
        Ok(account) => {
            let cookie = state
                .sessions
                .issue(&account.email, account.id)
                .map_err(WebError::internal_from)?;

            Ok((jar.add(cookie), Redirect::to(MAIN_PATH)).into_response())
        }
        Err(LoginError::InvalidCredentials) => {
            let context = TemplateContext::new()
                .with("error", INVALID_CREDENTIALS_MESSAGE)
                .with("email", email);
            Ok(state.render("login", &context)?.into_response())
        }
        Err(LoginError::Storage(e)) => Err(WebError::internal_from(e)),
    }
}

/// GET /register - Registration form.
pub async fn register_form(State(state): State<AppState>) -> Result<Response, WebError> {
    Ok(state.render("register", &TemplateContext::new())?.into_response())
}

/// POST /register - Create an account.
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, WebError> {
    let RegisterForm {
        fullname,
        email,
        password,
    } = form;

    let request = RegistrationRequest::new(fullname.clone(), email.clone(), password);

    let message = match register_user(state.users.as_ref(), request).await {
        Ok(_) => return Ok(Redirect::to("/").into_response()),
        Err(RegistrationError::Validation(e)) => e.to_string(),
        Err(RegistrationError::DuplicateIdentity) => DUPLICATE_EMAIL_MESSAGE.to_string(),
        Err(RegistrationError::Hashing(e)) => {
            error!(error = %e, "Password hashing failed during registration");
            ACCOUNT_CREATION_FAILED_MESSAGE.to_string()
        }
        Err(RegistrationError::Storage(e)) => return Err(WebError::internal_from(e)),
    };

    let context = TemplateContext::new()
        .with("error", message)
        .with("fullname", fullname)
        .with("email", email);
    Ok(state.render("register", &context)?.into_response())
}

/// GET|POST /logout - End the session.
///
/// Always answers with the revocation cookie and a redirect, whether or not
/// a session was presented.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let current = state
        .sessions
        .validate(jar.get(state.sessions.cookie_name()))
        .ok();

    if let Some(session) = &current {
        info!(user_id = session.user_id, "User logged out");
    }

    let cookie = state.sessions.revoke(current.as_ref());
    (jar.add(cookie), Redirect::to("/"))
}
