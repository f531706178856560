//! Unit of work port and its write-buffer state machine.

use async_trait::async_trait;

use crate::domain::{Follow, Message, NewMessage, NewUser, User};
use crate::error::RepoError;

/// A write staged in a unit of work, applied in order on commit.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingWrite {
    InsertUser(NewUser),
    InsertMessage(NewMessage),
    Follow(Follow),
    Unfollow(Follow),
    DeleteUser(i32),
    DeleteMessage(i32),
}

impl From<NewUser> for PendingWrite {
    fn from(user: NewUser) -> Self {
        PendingWrite::InsertUser(user)
    }
}

impl From<NewMessage> for PendingWrite {
    fn from(message: NewMessage) -> Self {
        PendingWrite::InsertMessage(message)
    }
}

impl From<Follow> for PendingWrite {
    fn from(follow: Follow) -> Self {
        PendingWrite::Follow(follow)
    }
}

/// Lifecycle of a unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing staged yet.
    Idle,
    /// At least one write staged.
    Active,
    Committed,
    RolledBack,
    /// A commit failed; only `rollback` is accepted.
    Aborted,
}

/// Entities persisted by a successful commit, in staging order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitReceipt {
    pub users: Vec<User>,
    pub messages: Vec<Message>,
    pub follows: Vec<Follow>,
    /// Rows removed by unfollow and delete writes.
    pub removed: u64,
}

impl CommitReceipt {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.messages.is_empty()
            && self.follows.is_empty()
            && self.removed == 0
    }
}

/// Buffer of staged writes plus the session state machine.
///
/// Storage backends drive it around their own transaction handling:
/// `begin_commit` hands out the writes, then exactly one of
/// `finish_commit` or `abort` reports the outcome.
#[derive(Debug)]
pub struct WriteSet {
    pending: Vec<PendingWrite>,
    state: SessionState,
}

impl WriteSet {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn pending(&self) -> &[PendingWrite] {
        &self.pending
    }

    pub fn stage(&mut self, write: PendingWrite) -> Result<(), RepoError> {
        if self.state == SessionState::Aborted {
            return Err(RepoError::NeedsRollback);
        }
        self.pending.push(write);
        self.state = SessionState::Active;
        Ok(())
    }

    /// Take the staged writes for flushing.
    pub fn begin_commit(&mut self) -> Result<Vec<PendingWrite>, RepoError> {
        if self.state == SessionState::Aborted {
            return Err(RepoError::NeedsRollback);
        }
        Ok(std::mem::take(&mut self.pending))
    }

    pub fn finish_commit(&mut self) {
        self.state = SessionState::Committed;
    }

    /// Record a failed commit. The flushed writes are already gone.
    pub fn abort(&mut self) {
        self.pending.clear();
        self.state = SessionState::Aborted;
    }

    pub fn rollback(&mut self) {
        self.pending.clear();
        self.state = SessionState::RolledBack;
    }
}

impl Default for WriteSet {
    fn default() -> Self {
        Self::new()
    }
}

/// A transactional unit of work over the store.
///
/// Writes are buffered until `commit`, which applies all of them atomically.
/// After a failed commit the unit of work must be rolled back before reuse.
#[async_trait]
pub trait UnitOfWork: Send {
    fn stage(&mut self, write: PendingWrite) -> Result<(), RepoError>;

    /// Apply every staged write in one transaction.
    async fn commit(&mut self) -> Result<CommitReceipt, RepoError>;

    /// Discard staged writes and clear a failed commit.
    fn rollback(&mut self);

    fn state(&self) -> SessionState;

    fn add<W>(&mut self, write: W) -> Result<(), RepoError>
    where
        W: Into<PendingWrite>,
        Self: Sized,
    {
        self.stage(write.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn follow() -> PendingWrite {
        Follow::new(1, 2).unwrap().into()
    }

    #[test]
    fn test_first_write_activates() {
        let mut writes = WriteSet::new();
        assert_eq!(writes.state(), SessionState::Idle);

        writes.stage(follow()).unwrap();
        assert_eq!(writes.state(), SessionState::Active);
        assert_eq!(writes.pending().len(), 1);
    }

    #[test]
    fn test_commit_drains_pending() {
        let mut writes = WriteSet::new();
        writes.stage(follow()).unwrap();
        writes.stage(PendingWrite::DeleteMessage(3)).unwrap();

        let flushed = writes.begin_commit().unwrap();
        writes.finish_commit();

        assert_eq!(flushed.len(), 2);
        assert_eq!(flushed[1], PendingWrite::DeleteMessage(3));
        assert!(writes.pending().is_empty());
        assert_eq!(writes.state(), SessionState::Committed);

        // A committed unit of work is reusable.
        writes.stage(follow()).unwrap();
        assert_eq!(writes.state(), SessionState::Active);
    }

    #[test]
    fn test_aborted_requires_rollback() {
        let mut writes = WriteSet::new();
        writes.stage(follow()).unwrap();
        let _ = writes.begin_commit().unwrap();
        writes.abort();

        assert_eq!(writes.state(), SessionState::Aborted);
        assert!(matches!(writes.stage(follow()), Err(RepoError::NeedsRollback)));
        assert!(matches!(writes.begin_commit(), Err(RepoError::NeedsRollback)));

        writes.rollback();
        assert_eq!(writes.state(), SessionState::RolledBack);
        writes.stage(follow()).unwrap();
        assert_eq!(writes.state(), SessionState::Active);
    }

    #[test]
    fn test_rollback_discards_pending() {
        let mut writes = WriteSet::new();
        writes.stage(PendingWrite::DeleteUser(9)).unwrap();
        writes.rollback();

        assert!(writes.pending().is_empty());
        assert!(writes.begin_commit().unwrap().is_empty());
    }

    #[test]
    fn test_empty_receipt() {
        assert!(CommitReceipt::default().is_empty());
    }
}
