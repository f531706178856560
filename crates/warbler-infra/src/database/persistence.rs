use std::sync::Arc;

use sea_orm::DbConn;

use warbler_core::RepoError;
use warbler_core::ports::{MessageRepository, UserRepository};

use super::connections::{DatabaseConfig, connect};
use super::repositories::{SeaOrmMessageRepository, SeaOrmUserRepository};
use super::session::Session;

/// Persistence context handed to every caller that needs the store.
///
/// Repositories serve reads straight from the pool; writes are staged in a
/// [`Session`] obtained from [`session`](Self::session).
#[derive(Clone)]
pub struct Persistence {
    conn: DbConn,
}

impl Persistence {
    /// Connect using the given configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, RepoError> {
        Ok(Self::from_conn(connect(config).await?))
    }

    pub fn from_conn(conn: DbConn) -> Self {
        Self { conn }
    }

    pub fn conn(&self) -> &DbConn {
        &self.conn
    }

    pub fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(SeaOrmUserRepository::new(self.conn.clone()))
    }

    pub fn messages(&self) -> Arc<dyn MessageRepository> {
        Arc::new(SeaOrmMessageRepository::new(self.conn.clone()))
    }

    /// Start a new, idle unit of work.
    pub fn session(&self) -> Session {
        Session::new(self.conn.clone())
    }
}
