//! Accounts Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Four-step student registration (basic info, college + codes, code
//!   verification, optional referral) over a signed temporary token
//! - Verification codes sent concurrently by email and SMS; one channel is enough
//! - Referral codes and referral counting
//! - Email + password sign-in with a stateless access token
//! - College admin verification for platform admins
//! - Public activity feed
//!
//! ## Consistency Model
//! - Registration sessions expire one hour after step 1 and are purged
//! - Promotion to a user is a single transaction; a session yields at most
//!   one user and one college counter increment

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AccountsConfig;
pub use error::{AccountsError, AccountsResult};
pub use infra::postgres::PgAccountsRepository;
pub use presentation::router::{accounts_router, accounts_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
