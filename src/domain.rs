//! Domain records persisted by the submission store
//!
//! Wire names are PascalCase to match the on-disk JSON format
//! (`Backlog.json` / `Submission-{key}.json`).

use serde::{Deserialize, Serialize};

/// A named, ordered list of items being ranked
///
/// Immutable after creation; submissions accumulate against it. The item
/// sequence in `user_stories` is the original/display order and doubles as
/// the tie-break order during aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Backlog {
    /// Opaque identifier, assigned by the store at creation
    pub id: String,
    pub title: String,
    /// Ordered item labels, original/display order
    pub user_stories: Vec<String>,
    /// When set, every submission must carry a voter id and repeat votes
    /// from the same voter collapse into one record
    #[serde(default)]
    pub one_vote_per_user: bool,
}

impl Backlog {
    /// Number of items being ranked
    pub fn item_count(&self) -> usize {
        self.user_stories.len()
    }
}

/// One participant's proposed ordering
///
/// `indexes[p]` is the item placed at position `p`. The array is a
/// permutation of `{0..n-1}` for the item count at submission time; it may
/// be stale relative to a since-edited backlog, which the aggregator
/// tolerates by skipping out-of-range values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Submission {
    pub indexes: Vec<usize>,
    /// Voter identity, present only for authenticated votes
    #[serde(default)]
    pub user_id: Option<i64>,
}

impl Submission {
    /// An anonymous submission
    pub fn anonymous(indexes: Vec<usize>) -> Self {
        Self {
            indexes,
            user_id: None,
        }
    }

    /// A submission carrying a voter identity
    pub fn from_voter(user_id: i64, indexes: Vec<usize>) -> Self {
        Self {
            indexes,
            user_id: Some(user_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backlog_round_trips_with_pascal_case_field_names() {
        let json = r#"{"Id":"b-1","Title":"Sprint","UserStories":["A","B"],"OneVotePerUser":true}"#;
        let backlog: Backlog = serde_json::from_str(json).unwrap();
        assert_eq!(backlog.id, "b-1");
        assert_eq!(backlog.user_stories, vec!["A", "B"]);
        assert!(backlog.one_vote_per_user);

        let out = serde_json::to_string(&backlog).unwrap();
        assert_eq!(out, json);
    }

    #[test]
    fn submission_serializes_null_user_id() {
        let submission = Submission::anonymous(vec![1, 0]);
        let out = serde_json::to_string(&submission).unwrap();
        assert_eq!(out, r#"{"Indexes":[1,0],"UserId":null}"#);
    }

    #[test]
    fn submission_deserializes_missing_user_id_as_anonymous() {
        let submission: Submission = serde_json::from_str(r#"{"Indexes":[0,1,2]}"#).unwrap();
        assert_eq!(submission.user_id, None);
    }

    #[test]
    fn one_vote_per_user_defaults_to_false() {
        let json = r#"{"Id":"x","Title":"t","UserStories":[]}"#;
        let backlog: Backlog = serde_json::from_str(json).unwrap();
        assert!(!backlog.one_vote_per_user);
    }
}
