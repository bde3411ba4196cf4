//! Shared Kernel - Domain-crossing minimal core
//!
//! Vocabulary every campus backend crate agrees on:
//! - The unified error type ([`error::app_error::AppError`]) and its HTTP classification
//! - Typed UUID identifiers for users, colleges, activities and registration sessions
//!
//! Only things with one stable meaning across all bounded contexts belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
