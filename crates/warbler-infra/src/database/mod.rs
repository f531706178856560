//! Database access: entities, repositories, unit of work and connection setup.

mod base;
mod connections;
mod errors;
mod persistence;
pub mod repositories;
mod session;

pub mod entity;

pub use base::SeaOrmRepository;
pub use connections::{DatabaseConfig, connect};
pub use persistence::Persistence;
pub use repositories::{SeaOrmMessageRepository, SeaOrmUserRepository};
pub use session::Session;
