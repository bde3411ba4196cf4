//! Admin Middleware
//!
//! Guards `/admin/*`: requires `Authorization: Bearer <token>` belonging to a
//! platform admin and stores the caller as `AuthenticatedUser`.

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use platform::notify::NotificationTransport;

use crate::application::AuthorizeAdminUseCase;
use crate::presentation::handlers::{AccountsAppState, AccountsStore};

/// Token part of a `Bearer` authorization header
pub fn bearer_token(req: &Request<Body>) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Middleware that requires a live platform admin
pub async fn require_platform_admin<R, T>(
    State(state): State<AccountsAppState<R, T>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: AccountsStore,
    T: NotificationTransport + Send + Sync + 'static,
{
    let token = bearer_token(&req).map(str::to_owned);

    let use_case = AuthorizeAdminUseCase::new(state.repo.clone(), state.config.clone());

    let caller = use_case
        .execute(token.as_deref())
        .await
        .map_err(IntoResponse::into_response)?;

    tracing::debug!(user_id = %caller.user_id, "Platform admin authorized");

    req.extensions_mut().insert(caller);

    Ok(next.run(req).await)
}
