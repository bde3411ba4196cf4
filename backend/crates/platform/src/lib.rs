//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Token primitives (HMAC-SHA256, URL-safe Base64, constant-time comparison)
//! - Password hashing (Argon2id) behind a configurable length policy
//! - Notification transports (HTTP email API, HTTP SMS API, development log sink)

pub mod crypto;
pub mod notify;
pub mod password;
