//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::{AccountsAppState, AccountsStore};
pub use middleware::require_platform_admin;
pub use router::{accounts_router, accounts_router_generic};
