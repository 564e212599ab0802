//! Submission store: persistence for backlogs and their submissions
//!
//! The store does file/record I/O only; ranking logic lives in
//! [`crate::consensus`]. Operations are synchronous and blocking and run on
//! the calling thread; callers needing timeouts must wrap calls externally.

pub mod file;

pub use file::FileBacklogStore;

use crate::domain::{Backlog, Submission};
use crate::error::Result;

/// Persistence operations for backlogs and their submissions
///
/// No locking is performed across operations. Concurrent submission writes
/// from different voters target distinct storage keys and are safe; writes
/// from the same voter race with last-write-wins. Reads take an
/// uncoordinated snapshot of whatever records exist at call time.
pub trait BacklogStore: Send + Sync {
    /// Assign a fresh unique id, persist the descriptor, return the id
    fn create_backlog(&self, backlog: Backlog) -> Result<String>;

    /// Read one backlog descriptor; `NotFound` when no descriptor exists
    fn read_backlog(&self, id: &str) -> Result<Backlog>;

    /// Every persisted submission for the backlog, in enumeration order
    ///
    /// Returns an empty vec (not an error) when the backlog has no
    /// submissions; fails when the backlog itself is absent or unreadable.
    fn read_submissions(&self, id: &str) -> Result<Vec<Submission>>;

    /// Persist one submission after re-reading the backlog and checking
    /// vote eligibility; no file is written for a rejected vote
    ///
    /// On a one-vote-per-user backlog the storage key derives from the
    /// voter id, so a repeat vote overwrites the previous one. Otherwise
    /// the key is a fresh unique token and votes accumulate.
    fn write_submission(&self, id: &str, submission: &Submission) -> Result<()>;

    /// Read every backlog descriptor under the root
    fn get_all(&self) -> Result<Vec<Backlog>>;

    /// Read the named descriptors; fails whole on the first unreadable id
    fn get_backlogs_by_ids(&self, ids: &[String]) -> Result<Vec<Backlog>>;

    /// Remove the descriptor and all its submissions together
    fn delete_backlog(&self, id: &str) -> Result<()>;
}
