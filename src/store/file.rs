//! File-based submission store
//!
//! One directory per backlog under `<root>/Backlogs/`, holding a
//! `Backlog.json` descriptor plus one `Submission-{key}.json` per vote.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::domain::{Backlog, Submission};
use crate::error::{Error, Result};
use crate::idgen::IdSource;
use crate::policy::check_vote_eligibility;
use crate::store::BacklogStore;

const BACKLOGS_SUBFOLDER: &str = "Backlogs";
const BACKLOG_FILE: &str = "Backlog.json";
const SUBMISSION_PREFIX: &str = "submission";

/// How many candidate ids to try before declaring the source defective
const MAX_ID_ATTEMPTS: usize = 100;

/// File-backed [`BacklogStore`]
pub struct FileBacklogStore {
    root: PathBuf,
    ids: Arc<dyn IdSource>,
}

impl FileBacklogStore {
    /// Create a store rooted at `root/Backlogs`
    pub fn new(root: impl AsRef<Path>, ids: Arc<dyn IdSource>) -> Self {
        Self {
            root: root.as_ref().join(BACKLOGS_SUBFOLDER),
            ids,
        }
    }

    /// Create the backlogs root directory if it does not exist yet
    pub fn initialise(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    fn backlog_dir(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    /// Draw candidate ids until one is not already taken
    ///
    /// The source only promises freshness-in-expectation; every candidate
    /// must be checked against the ids already on disk.
    fn fresh_id<F>(&self, taken: F) -> Result<String>
    where
        F: Fn(&str) -> bool,
    {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = self.ids.next_id();
            if !taken(&candidate) {
                return Ok(candidate);
            }
        }
        Err(Error::storage(format!(
            "id source produced {MAX_ID_ATTEMPTS} colliding candidates in a row"
        )))
    }

    fn submission_path(dir: &Path, key: &str) -> PathBuf {
        dir.join(format!("Submission-{key}.json"))
    }

    fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
        let content = serde_json::to_string_pretty(value)?;
        fs::write(path, content)?;
        Ok(())
    }
}

impl BacklogStore for FileBacklogStore {
    fn create_backlog(&self, mut backlog: Backlog) -> Result<String> {
        let id = self.fresh_id(|candidate| self.backlog_dir(candidate).exists())?;
        backlog.id = id.clone();

        let dir = self.backlog_dir(&id);
        fs::create_dir_all(&dir)?;
        Self::write_json(&dir.join(BACKLOG_FILE), &backlog)?;

        debug!(backlog_id = %id, title = %backlog.title, "created backlog");
        Ok(id)
    }

    fn read_backlog(&self, id: &str) -> Result<Backlog> {
        let path = self.backlog_dir(id).join(BACKLOG_FILE);
        if !path.is_file() {
            return Err(Error::not_found(format!("backlog '{id}'")));
        }
        Self::read_json(&path)
    }

    fn read_submissions(&self, id: &str) -> Result<Vec<Submission>> {
        let dir = self.backlog_dir(id);
        let entries = fs::read_dir(&dir).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::not_found(format!("backlog '{id}'")),
            _ => Error::Io(e),
        })?;

        let mut submissions = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            // prefix filter also keeps Backlog.json out of the result
            if !name.to_lowercase().starts_with(SUBMISSION_PREFIX) {
                continue;
            }
            submissions.push(Self::read_json(&entry.path())?);
        }
        Ok(submissions)
    }

    fn write_submission(&self, id: &str, submission: &Submission) -> Result<()> {
        let backlog = self.read_backlog(id)?;
        check_vote_eligibility(&backlog, submission)?;

        let dir = self.backlog_dir(id);
        let key = if backlog.one_vote_per_user {
            submission
                .user_id
                .ok_or_else(|| {
                    Error::policy(format!("backlog '{id}' requires a voter id on every vote"))
                })?
                .to_string()
        } else {
            self.fresh_id(|candidate| Self::submission_path(&dir, candidate).exists())?
        };

        Self::write_json(&Self::submission_path(&dir, &key), submission)?;
        debug!(backlog_id = %id, key = %key, "wrote submission");
        Ok(())
    }

    fn get_all(&self) -> Result<Vec<Backlog>> {
        let entries = fs::read_dir(&self.root).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::not_found("backlog root not initialised"),
            _ => Error::Io(e),
        })?;

        let mut backlogs = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            backlogs.push(Self::read_json(&entry.path().join(BACKLOG_FILE))?);
        }
        Ok(backlogs)
    }

    fn get_backlogs_by_ids(&self, ids: &[String]) -> Result<Vec<Backlog>> {
        let mut backlogs = Vec::with_capacity(ids.len());
        for id in ids {
            backlogs.push(self.read_backlog(id)?);
        }
        Ok(backlogs)
    }

    fn delete_backlog(&self, id: &str) -> Result<()> {
        let dir = self.backlog_dir(id);
        if !dir.is_dir() {
            return Err(Error::not_found(format!("backlog '{id}'")));
        }
        fs::remove_dir_all(&dir)?;
        debug!(backlog_id = %id, "deleted backlog and its submissions");
        Ok(())
    }
}
