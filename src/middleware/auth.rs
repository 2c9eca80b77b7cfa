use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::AuthError;
use crate::error::ApiError;

/// Authenticated caller context, injected as a request extension once the
/// admin gate has admitted the request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub role: String,
}

/// Gate for mutating routes: verify the bearer token, then require the admin
/// role. Read routes never pass through here. Failures short-circuit before
/// any storage access.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let claims = state.verifier.verify_header(header)?;
    if !claims.is_admin() {
        return Err(AuthError::AdminRequired.into());
    }

    request.extensions_mut().insert(AuthUser {
        id: claims.id,
        role: claims.role,
    });

    Ok(next.run(request).await)
}
