//! Entity Module

pub mod activity;
pub mod college;
pub mod registration_session;
pub mod user;
