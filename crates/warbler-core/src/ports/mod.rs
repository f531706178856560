//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod repository;
mod unit_of_work;

pub use auth::{AuthError, PasswordService};
pub use repository::{BaseRepository, MessageRepository, UserRepository};
pub use unit_of_work::{CommitReceipt, PendingWrite, SessionState, UnitOfWork, WriteSet};
