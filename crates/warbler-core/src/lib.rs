//! # Warbler Core
//!
//! The domain layer of the Warbler data model.
//! This crate contains the entities, their invariants and the ports the
//! infrastructure implements. It has zero database or hashing dependencies.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{DomainError, RepoError, RequireExt};
