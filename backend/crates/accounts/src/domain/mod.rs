//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{
    activity::Activity, college::College, registration_session::RegistrationSession, user::User,
};
pub use repository::{
    AccountsUnitOfWork, ActivityRepository, CollegeRepository, RegistrationSessionRepository,
    UserRepository,
};
