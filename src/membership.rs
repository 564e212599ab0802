//! User-backlog membership store
//!
//! Tracks which backlogs each user may see. The pipeline's multi-tenant
//! listing consults this as an opaque list-of-ids dependency; the file
//! implementation keeps one `UserBacklogs.json` array per user under
//! `<root>/Users/{userId}/`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

const USERS_SUBFOLDER: &str = "Users";
const USER_BACKLOGS_FILE: &str = "UserBacklogs.json";

/// Which backlogs a user may see
pub trait MembershipStore: Send + Sync {
    /// The backlog ids registered for the user; `NotFound` when the user
    /// has no membership record
    fn user_backlog_ids(&self, user_id: i64) -> Result<Vec<String>>;

    /// Register a backlog for the user; fails when already registered
    fn add_user_backlog_id(&self, user_id: i64, backlog_id: &str) -> Result<()>;

    /// Remove a backlog from the user's record; fails when not registered
    fn delete_user_backlog_id(&self, user_id: i64, backlog_id: &str) -> Result<()>;
}

/// File-backed [`MembershipStore`]
#[derive(Debug)]
pub struct FileMembershipStore {
    root: PathBuf,
}

impl FileMembershipStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().join(USERS_SUBFOLDER),
        }
    }

    fn record_path(&self, user_id: i64) -> PathBuf {
        self.root.join(user_id.to_string()).join(USER_BACKLOGS_FILE)
    }

    fn read_record(&self, user_id: i64) -> Result<Vec<String>> {
        let path = self.record_path(user_id);
        if !path.is_file() {
            return Err(Error::not_found(format!(
                "backlog membership record for user {user_id}"
            )));
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write_record(&self, user_id: i64, ids: &[String]) -> Result<()> {
        let path = self.record_path(user_id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string(ids)?)?;
        Ok(())
    }
}

impl MembershipStore for FileMembershipStore {
    fn user_backlog_ids(&self, user_id: i64) -> Result<Vec<String>> {
        self.read_record(user_id)
    }

    fn add_user_backlog_id(&self, user_id: i64, backlog_id: &str) -> Result<()> {
        // first registration creates the user's record
        let mut ids = match self.read_record(user_id) {
            Ok(ids) => ids,
            Err(Error::NotFound(_)) => Vec::new(),
            Err(e) => return Err(e),
        };
        if ids.iter().any(|id| id == backlog_id) {
            return Err(Error::validation(format!(
                "backlog '{backlog_id}' is already registered for user {user_id}"
            )));
        }
        ids.push(backlog_id.to_string());
        self.write_record(user_id, &ids)?;
        debug!(user_id, backlog_id = %backlog_id, "registered backlog for user");
        Ok(())
    }

    fn delete_user_backlog_id(&self, user_id: i64, backlog_id: &str) -> Result<()> {
        let mut ids = self.read_record(user_id)?;
        let before = ids.len();
        ids.retain(|id| id != backlog_id);
        if ids.len() == before {
            return Err(Error::not_found(format!(
                "backlog '{backlog_id}' in membership record for user {user_id}"
            )));
        }
        self.write_record(user_id, &ids)?;
        debug!(user_id, backlog_id = %backlog_id, "removed backlog from user record");
        Ok(())
    }
}
