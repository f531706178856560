//! SeaORM-backed unit of work.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbConn, EntityTrait, QueryFilter,
    TransactionTrait,
};

use warbler_core::RepoError;
use warbler_core::ports::{CommitReceipt, PendingWrite, SessionState, UnitOfWork, WriteSet};

use super::entity::{follows, message, user};
use super::errors::map_db_err;

/// A unit of work over one database.
///
/// Staged writes stay in memory until [`commit`](UnitOfWork::commit), which
/// applies them inside a single transaction. Reads never go through a session.
pub struct Session {
    db: DbConn,
    writes: WriteSet,
}

impl Session {
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            writes: WriteSet::new(),
        }
    }

    pub fn pending(&self) -> &[PendingWrite] {
        self.writes.pending()
    }

    async fn flush(
        txn: &DatabaseTransaction,
        writes: Vec<PendingWrite>,
    ) -> Result<CommitReceipt, RepoError> {
        let mut receipt = CommitReceipt::default();

        for write in writes {
            match write {
                PendingWrite::InsertUser(new_user) => {
                    let model = user::ActiveModel::from(new_user)
                        .insert(txn)
                        .await
                        .map_err(map_db_err)?;
                    receipt.users.push(model.into());
                }
                PendingWrite::InsertMessage(new_message) => {
                    let model = message::ActiveModel::from(new_message)
                        .insert(txn)
                        .await
                        .map_err(map_db_err)?;
                    receipt.messages.push(model.into());
                }
                PendingWrite::Follow(edge) => {
                    follows::Entity::insert(follows::ActiveModel::from(edge))
                        .exec_without_returning(txn)
                        .await
                        .map_err(map_db_err)?;
                    receipt.follows.push(edge);
                }
                PendingWrite::Unfollow(edge) => {
                    let result = follows::Entity::delete_many()
                        .filter(follows::Column::UserFollowingId.eq(edge.follower_id))
                        .filter(follows::Column::UserBeingFollowedId.eq(edge.followed_id))
                        .exec(txn)
                        .await
                        .map_err(map_db_err)?;
                    receipt.removed += Self::expect_removed(result.rows_affected)?;
                }
                PendingWrite::DeleteUser(id) => {
                    let result = user::Entity::delete_by_id(id)
                        .exec(txn)
                        .await
                        .map_err(map_db_err)?;
                    receipt.removed += Self::expect_removed(result.rows_affected)?;
                }
                PendingWrite::DeleteMessage(id) => {
                    let result = message::Entity::delete_by_id(id)
                        .exec(txn)
                        .await
                        .map_err(map_db_err)?;
                    receipt.removed += Self::expect_removed(result.rows_affected)?;
                }
            }
        }

        Ok(receipt)
    }

    fn expect_removed(rows_affected: u64) -> Result<u64, RepoError> {
        if rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(rows_affected)
    }
}

#[async_trait]
impl UnitOfWork for Session {
    fn stage(&mut self, write: PendingWrite) -> Result<(), RepoError> {
        self.writes.stage(write)
    }

    async fn commit(&mut self) -> Result<CommitReceipt, RepoError> {
        let writes = self.writes.begin_commit()?;
        if writes.is_empty() {
            self.writes.finish_commit();
            return Ok(CommitReceipt::default());
        }

        let staged = writes.len();
        let txn = match self.db.begin().await {
            Ok(txn) => txn,
            Err(e) => {
                self.writes.abort();
                return Err(map_db_err(e));
            }
        };

        let outcome = match Self::flush(&txn, writes).await {
            Ok(receipt) => txn.commit().await.map(|_| receipt).map_err(map_db_err),
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Rollback after failed flush also failed: {}", rollback_err);
                }
                Err(e)
            }
        };

        match outcome {
            Ok(receipt) => {
                self.writes.finish_commit();
                tracing::info!(
                    writes = staged,
                    users = receipt.users.len(),
                    messages = receipt.messages.len(),
                    follows = receipt.follows.len(),
                    removed = receipt.removed,
                    "Unit of work committed"
                );
                Ok(receipt)
            }
            Err(e) => {
                self.writes.abort();
                tracing::warn!(writes = staged, error = %e, "Unit of work aborted");
                Err(e)
            }
        }
    }

    fn rollback(&mut self) {
        self.writes.rollback();
    }

    fn state(&self) -> SessionState {
        self.writes.state()
    }
}
