//! # Warbler Infrastructure
//!
//! Concrete implementations of the ports defined in `warbler-core`.
//! This crate contains the SeaORM persistence layer and the credential hasher.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - Database only
//! - `auth` - Argon2 password hashing
//! - `sqlite` - SQLite backend in addition to PostgreSQL

pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - Database
pub use database::{DatabaseConfig, Persistence, Session};

#[cfg(feature = "auth")]
pub use auth::Argon2PasswordService;
