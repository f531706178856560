//! SeaORM entities mirroring the `migration` crate schema.

pub mod follows;
pub mod message;
pub mod user;
