//! End-to-end pipeline flows over the real file stores

use std::sync::Arc;

use tempfile::TempDir;

use rankmerge::identity::FixedVoter;
use rankmerge::idgen::UuidSource;
use rankmerge::membership::FileMembershipStore;
use rankmerge::pipeline::{CreateBacklogRequest, EvalPipeline};
use rankmerge::store::FileBacklogStore;

fn pipeline(dir: &TempDir, voter: Option<i64>) -> EvalPipeline {
    let store = FileBacklogStore::new(dir.path(), Arc::new(UuidSource));
    store.initialise().unwrap();
    EvalPipeline::new(
        Arc::new(store),
        Arc::new(FileMembershipStore::new(dir.path())),
        Arc::new(FixedVoter(voter)),
    )
}

fn create_request(one_vote_per_user: bool) -> CreateBacklogRequest {
    CreateBacklogRequest {
        title: "Sprint 12".to_string(),
        user_stories: ["A", "B", "C", "D", "E"].map(String::from).to_vec(),
        one_vote_per_user,
    }
}

#[test]
fn freshly_created_backlog_evaluates_to_original_order() {
    let dir = TempDir::new().unwrap();
    let eval = pipeline(&dir, Some(1))
        .create_backlog(create_request(false))
        .unwrap();

    assert_eq!(eval.title, "Sprint 12");
    assert_eq!(eval.user_stories, vec!["A", "B", "C", "D", "E"]);
    assert_eq!(eval.submission_count, 0);
}

#[test]
fn every_vote_returns_the_freshly_recomputed_consensus() {
    let dir = TempDir::new().unwrap();
    let p = pipeline(&dir, None);
    let id = p.create_backlog(create_request(false)).unwrap().id;

    let eval = p.submit_vote(&id, vec![3, 4, 1, 0, 2]).unwrap();
    assert_eq!(eval.submission_count, 1);
    assert_eq!(eval.user_stories, vec!["D", "E", "B", "A", "C"]);

    let eval = p.submit_vote(&id, vec![0, 2, 1, 3, 4]).unwrap();
    assert_eq!(eval.submission_count, 2);
    assert_eq!(eval.user_stories, vec!["A", "D", "B", "C", "E"]);
}

#[test]
fn anonymous_votes_raise_the_count_by_one_each() {
    let dir = TempDir::new().unwrap();
    let p = pipeline(&dir, None);
    let id = p.create_backlog(create_request(false)).unwrap().id;

    p.submit_vote(&id, vec![0, 1, 2, 3, 4]).unwrap();
    let eval = p.submit_vote(&id, vec![0, 1, 2, 3, 4]).unwrap();
    assert_eq!(eval.submission_count, 2);
}

#[test]
fn revote_on_one_vote_per_user_backlog_replaces_the_previous_ranking() {
    let dir = TempDir::new().unwrap();
    let p = pipeline(&dir, Some(42));
    let id = p.create_backlog(create_request(true)).unwrap().id;

    p.submit_vote(&id, vec![0, 1, 2, 3, 4]).unwrap();
    let eval = p.submit_vote(&id, vec![4, 3, 2, 1, 0]).unwrap();

    assert_eq!(eval.submission_count, 1);
    assert_eq!(eval.user_stories, vec!["E", "D", "C", "B", "A"]);
}

#[test]
fn stale_vote_over_a_larger_item_set_is_tolerated() {
    let dir = TempDir::new().unwrap();
    let p = pipeline(&dir, None);
    let id = p
        .create_backlog(CreateBacklogRequest {
            title: "Short".to_string(),
            user_stories: ["A", "B", "C"].map(String::from).to_vec(),
            one_vote_per_user: false,
        })
        .unwrap()
        .id;

    // ranks five items even though the backlog has three
    let eval = p.submit_vote(&id, vec![4, 1, 0, 2, 3]).unwrap();
    assert_eq!(eval.submission_count, 1);
    assert_eq!(eval.user_stories, vec!["B", "A", "C"]);
}

#[test]
fn listing_shows_only_the_requesting_users_backlogs() {
    let dir = TempDir::new().unwrap();

    let alice = pipeline(&dir, Some(1));
    let bob = pipeline(&dir, Some(2));
    let mine = alice.create_backlog(create_request(false)).unwrap().id;
    bob.create_backlog(create_request(false)).unwrap();

    let rows = alice.show_backlogs_for_user(1).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, mine);

    // the unfiltered listing sees both
    assert_eq!(alice.show_backlogs().unwrap().len(), 2);
}

#[test]
fn delete_cascades_and_later_evaluation_reports_not_found() {
    let dir = TempDir::new().unwrap();
    let p = pipeline(&dir, Some(1));
    let id = p.create_backlog(create_request(false)).unwrap().id;
    p.submit_vote(&id, vec![1, 0, 2, 3, 4]).unwrap();

    p.delete_backlog(&id).unwrap();

    assert!(p.eval_submissions(&id).unwrap_err().is_not_found());
    assert!(p.show_backlogs_for_user(1).unwrap().is_empty());
}
