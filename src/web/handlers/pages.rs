//! Pages behind the session gate.

use axum::{extract::State, response::Html};
use tracing::warn;

use crate::db::StoreError;
use crate::template::TemplateContext;
use crate::web::error::WebError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// GET /main - Main page for the signed-in user.
///
/// A session whose user has since disappeared, or whose email now belongs
/// to a different account, is answered with 500 "User not found".
pub async fn main_page(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Html<String>, WebError> {
    let account = match state.users.find_by_identity(&user.email).await {
        Ok(account) if account.id == user.user_id => account,
        Ok(account) => {
            warn!(
                user_id = user.user_id,
                current_id = account.id,
                "Session bound to a replaced user"
            );
            return Err(WebError::internal("User not found"));
        }
        Err(StoreError::NotFound) => {
            warn!(user_id = user.user_id, "Session bound to a missing user");
            return Err(WebError::internal("User not found"));
        }
        Err(e) => return Err(e.into()),
    };

    let context = TemplateContext::new()
        .with("fullname", account.fullname)
        .with("email", account.email);
    state.render("main", &context)
}
