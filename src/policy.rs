//! Vote eligibility guard
//!
//! Checked inside `write_submission` before any file mutation, so a
//! rejected vote is never partially written.

use crate::domain::{Backlog, Submission};
use crate::error::{Error, Result};

/// Decide whether a submission may be persisted against a backlog
///
/// Rejects with [`Error::PolicyViolation`] when the backlog requires one
/// vote per user and the submission carries no voter id; allows otherwise.
pub fn check_vote_eligibility(backlog: &Backlog, submission: &Submission) -> Result<()> {
    if backlog.one_vote_per_user && submission.user_id.is_none() {
        return Err(Error::policy(format!(
            "backlog '{}' requires one vote per user; anonymous submissions are not allowed",
            backlog.id
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backlog(one_vote_per_user: bool) -> Backlog {
        Backlog {
            id: "b-1".into(),
            title: "Test".into(),
            user_stories: vec!["A".into(), "B".into()],
            one_vote_per_user,
        }
    }

    #[test]
    fn anonymous_vote_on_authenticated_backlog_is_rejected() {
        let err = check_vote_eligibility(&backlog(true), &Submission::anonymous(vec![0, 1]))
            .unwrap_err();
        assert!(matches!(err, Error::PolicyViolation(_)));
    }

    #[test]
    fn identified_vote_on_authenticated_backlog_is_allowed() {
        check_vote_eligibility(&backlog(true), &Submission::from_voter(42, vec![0, 1])).unwrap();
    }

    #[test]
    fn anonymous_backlog_accepts_votes_with_and_without_identity() {
        check_vote_eligibility(&backlog(false), &Submission::anonymous(vec![1, 0])).unwrap();
        check_vote_eligibility(&backlog(false), &Submission::from_voter(1, vec![1, 0])).unwrap();
    }
}
