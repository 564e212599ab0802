//! Evaluation pipeline
//!
//! Orchestrates the store, the aggregator and the membership service to
//! answer "what is the current consensus order for backlog X", and drives
//! backlog creation and vote submission as single coherent sequences.
//! Every operation aborts at the first failing step and forwards that
//! failure untouched; partial or best-effort results are never returned.
//!
//! Mutating operations end by re-evaluating the consensus; there is no
//! cached or incrementally-updated ranking.

use std::sync::Arc;

use tracing::debug;

use crate::consensus::consensus_order;
use crate::domain::{Backlog, Submission};
use crate::error::{Error, Result};
use crate::identity::VoterContext;
use crate::membership::MembershipStore;
use crate::store::BacklogStore;

/// Request payload for creating a backlog
#[derive(Debug, Clone)]
pub struct CreateBacklogRequest {
    pub title: String,
    pub user_stories: Vec<String>,
    pub one_vote_per_user: bool,
}

/// The consensus view of one backlog, recomputed on every call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacklogEvaluation {
    pub id: String,
    pub title: String,
    /// Item labels in consensus order (original order when nobody voted yet)
    pub user_stories: Vec<String>,
    pub submission_count: usize,
}

/// One row of a backlog listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacklogSummary {
    pub id: String,
    pub title: String,
}

/// Store + aggregator + membership, wired behind trait seams
pub struct EvalPipeline {
    store: Arc<dyn BacklogStore>,
    membership: Arc<dyn MembershipStore>,
    voter: Arc<dyn VoterContext>,
}

impl EvalPipeline {
    pub fn new(
        store: Arc<dyn BacklogStore>,
        membership: Arc<dyn MembershipStore>,
        voter: Arc<dyn VoterContext>,
    ) -> Self {
        Self {
            store,
            membership,
            voter,
        }
    }

    /// Current consensus order for one backlog
    pub fn eval_submissions(&self, backlog_id: &str) -> Result<BacklogEvaluation> {
        let submissions = self.store.read_submissions(backlog_id)?;
        let backlog = self.store.read_backlog(backlog_id)?;
        let order = consensus_order(&submissions, backlog.item_count());

        debug!(
            backlog_id = %backlog_id,
            submissions = submissions.len(),
            "evaluated consensus order"
        );

        Ok(BacklogEvaluation {
            id: backlog_id.to_string(),
            title: backlog.title,
            user_stories: apply_order(backlog.user_stories, &order),
            submission_count: submissions.len(),
        })
    }

    /// Create a backlog, register it for the creator, return its first
    /// (vote-less) evaluation
    pub fn create_backlog(&self, request: CreateBacklogRequest) -> Result<BacklogEvaluation> {
        if request.title.trim().is_empty() {
            return Err(Error::validation("backlog title must not be empty"));
        }
        if request.user_stories.is_empty() {
            return Err(Error::validation(
                "backlog needs at least one item to rank",
            ));
        }

        let backlog = Backlog {
            id: String::new(),
            title: request.title,
            user_stories: request.user_stories,
            one_vote_per_user: request.one_vote_per_user,
        };
        let backlog_id = self.store.create_backlog(backlog)?;

        if let Some(user_id) = self.voter.current_voter() {
            self.membership.add_user_backlog_id(user_id, &backlog_id)?;
        }

        self.eval_submissions(&backlog_id)
    }

    /// Persist one vote from the current voter context, then re-evaluate
    pub fn submit_vote(&self, backlog_id: &str, indexes: Vec<usize>) -> Result<BacklogEvaluation> {
        let submission = Submission {
            indexes,
            user_id: self.voter.current_voter(),
        };
        self.store.write_submission(backlog_id, &submission)?;
        self.eval_submissions(backlog_id)
    }

    /// Every backlog in the store as (id, title) summaries
    pub fn show_backlogs(&self) -> Result<Vec<BacklogSummary>> {
        Ok(self.store.get_all()?.into_iter().map(summarize).collect())
    }

    /// The backlogs one user may see, per the membership store
    pub fn show_backlogs_for_user(&self, user_id: i64) -> Result<Vec<BacklogSummary>> {
        let ids = self.membership.user_backlog_ids(user_id)?;
        let backlogs = self.store.get_backlogs_by_ids(&ids)?;
        Ok(backlogs.into_iter().map(summarize).collect())
    }

    /// Delete a backlog and all its submissions
    ///
    /// When the request carries a voter id, the membership link is removed
    /// first; either step failing aborts the operation.
    pub fn delete_backlog(&self, backlog_id: &str) -> Result<()> {
        if let Some(user_id) = self.voter.current_voter() {
            self.membership.delete_user_backlog_id(user_id, backlog_id)?;
        }
        self.store.delete_backlog(backlog_id)
    }
}

/// Permute items by the consensus order
///
/// An empty order means "no reordering": the items come back verbatim.
fn apply_order(items: Vec<String>, order: &[usize]) -> Vec<String> {
    if order.is_empty() {
        return items;
    }
    order.iter().map(|&i| items[i].clone()).collect()
}

fn summarize(backlog: Backlog) -> BacklogSummary {
    BacklogSummary {
        id: backlog.id,
        title: backlog.title,
    }
}
