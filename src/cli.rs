//! CLI argument structures and command routing
//!
//! Thin plumbing over [`EvalPipeline`]; no ranking or storage logic lives
//! here.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::identity::FixedVoter;
use crate::idgen::UuidSource;
use crate::membership::FileMembershipStore;
use crate::pipeline::{BacklogEvaluation, CreateBacklogRequest, EvalPipeline};
use crate::state::{InMemoryState, KeyValueState, StateFlags};
use crate::store::FileBacklogStore;

const STORE_INITIALISED_FLAG: &str = "store-initialised";

/// Rank a shared backlog by merging everyone's submitted orderings
#[derive(Parser)]
#[command(name = "rankmerge")]
#[command(about = "Merge many personal rankings into one consensus order", long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Storage root (defaults to $RANKMERGE_ROOT, then ~/.rankmerge)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Numeric voter id for this invocation; omit to act anonymously
    #[arg(long, global = true)]
    pub user: Option<i64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a backlog and print its initial (vote-less) order
    Create {
        /// Backlog title
        title: String,

        /// Item labels in display order
        #[arg(required = true)]
        items: Vec<String>,

        /// Require a voter id on every vote and collapse repeat votes
        #[arg(long)]
        one_vote_per_user: bool,
    },
    /// Submit one ranking and print the fresh consensus
    Vote {
        /// Backlog to vote on
        backlog_id: String,

        /// Comma-separated item indices, most preferred first (e.g. 2,0,1)
        #[arg(value_delimiter = ',', required = true)]
        order: Vec<usize>,
    },
    /// Print the current consensus order for a backlog
    Eval {
        backlog_id: String,
    },
    /// List backlogs (all, or the ones visible to --user)
    List,
    /// Delete a backlog and every submission belonging to it
    Delete {
        backlog_id: String,
    },
}

/// Wire the stores and run one command
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::resolve(cli.root)?;

    let store = Arc::new(FileBacklogStore::new(&config.root, Arc::new(UuidSource)));
    let state = InMemoryState::new();
    ensure_initialised(&state, &store)?;

    let membership = Arc::new(FileMembershipStore::new(&config.root));
    let pipeline = EvalPipeline::new(store, membership, Arc::new(FixedVoter(cli.user)));

    match cli.command {
        Commands::Create {
            title,
            items,
            one_vote_per_user,
        } => {
            let eval = pipeline.create_backlog(CreateBacklogRequest {
                title,
                user_stories: items,
                one_vote_per_user,
            })?;
            print_evaluation(&eval);
        }
        Commands::Vote { backlog_id, order } => {
            let eval = pipeline.submit_vote(&backlog_id, order)?;
            print_evaluation(&eval);
        }
        Commands::Eval { backlog_id } => {
            let eval = pipeline.eval_submissions(&backlog_id)?;
            print_evaluation(&eval);
        }
        Commands::List => {
            let rows = match cli.user {
                Some(user_id) => pipeline.show_backlogs_for_user(user_id)?,
                None => pipeline.show_backlogs()?,
            };
            for row in rows {
                println!("{}  {}", row.id, row.title);
            }
        }
        Commands::Delete { backlog_id } => {
            pipeline.delete_backlog(&backlog_id)?;
            println!("deleted {backlog_id}");
        }
    }

    Ok(())
}

/// Create the store root once per process, however many pipeline calls run
fn ensure_initialised(state: &dyn KeyValueState, store: &FileBacklogStore) -> anyhow::Result<()> {
    if !state.flag(STORE_INITIALISED_FLAG) {
        store.initialise()?;
        state.set_flag(STORE_INITIALISED_FLAG, true);
    }
    Ok(())
}

fn print_evaluation(eval: &BacklogEvaluation) {
    println!("{} ({})", eval.title, eval.id);
    for (position, item) in eval.user_stories.iter().enumerate() {
        println!("{:>3}. {}", position + 1, item);
    }
    println!(
        "{} submission{}",
        eval.submission_count,
        if eval.submission_count == 1 { "" } else { "s" }
    );
}
