//! Accounts Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use platform::notify::{ConfiguredTransport, NotificationTransport};

use crate::application::config::AccountsConfig;
use crate::infra::postgres::PgAccountsRepository;
use crate::presentation::handlers::{self, AccountsAppState, AccountsStore};
use crate::presentation::middleware::require_platform_admin;

/// Create the Accounts router with PostgreSQL repository and configured transports
pub fn accounts_router(
    repo: PgAccountsRepository,
    email_transport: ConfiguredTransport,
    sms_transport: ConfiguredTransport,
    config: AccountsConfig,
) -> Router {
    accounts_router_generic(repo, email_transport, sms_transport, config)
}

/// Create a generic Accounts router for any repository and transport implementation
pub fn accounts_router_generic<R, T>(
    repo: R,
    email_transport: T,
    sms_transport: T,
    config: AccountsConfig,
) -> Router
where
    R: AccountsStore,
    T: NotificationTransport + Send + Sync + 'static,
{
    let state = AccountsAppState {
        repo: Arc::new(repo),
        email_transport: Arc::new(email_transport),
        sms_transport: Arc::new(sms_transport),
        config: Arc::new(config),
    };

    let admin = Router::new()
        .route(
            "/pending-verifications",
            get(handlers::pending_verifications::<R, T>),
        )
        .route(
            "/verify-admin/{user_id}",
            post(handlers::verify_admin::<R, T>),
        )
        .route(
            "/verification/{user_id}",
            get(handlers::verification_detail::<R, T>),
        )
        .route(
            "/verification-stats",
            get(handlers::verification_stats::<R, T>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_platform_admin::<R, T>,
        ));

    Router::new()
        .route(
            "/auth/student/register/step1",
            post(handlers::register_step1::<R, T>),
        )
        .route(
            "/auth/student/register/step2",
            post(handlers::register_step2::<R, T>),
        )
        .route(
            "/auth/student/register/step3",
            post(handlers::register_step3::<R, T>),
        )
        .route(
            "/auth/student/register/step4",
            post(handlers::register_step4::<R, T>),
        )
        .route(
            "/auth/student/resend-codes",
            post(handlers::resend_codes::<R, T>),
        )
        .route("/auth/login", post(handlers::login::<R, T>))
        .route(
            "/activities/recent",
            get(handlers::recent_activities::<R, T>),
        )
        .route("/health", get(handlers::health))
        .nest("/admin", admin)
        .with_state(state)
}
