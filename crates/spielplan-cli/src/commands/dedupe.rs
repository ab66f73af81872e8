//! `spielplan dedupe`: merge discovered team candidates.
//!
//! Candidate files are read concurrently; the merge runs only after every
//! read has finished, in the order the files were given.

use std::path::PathBuf;

use spielplan_core::{TeamCandidate, dedupe, team_configs};
use tokio::task::JoinSet;
use tracing::debug;

use super::read_json;
use crate::error::{CliError, CliResult};

/// Reads all candidate files concurrently, returned in argument order.
pub async fn read_candidate_lists(files: &[PathBuf]) -> CliResult<Vec<Vec<TeamCandidate>>> {
    let mut set = JoinSet::new();
    for (index, path) in files.iter().cloned().enumerate() {
        set.spawn(async move {
            let list: CliResult<Vec<TeamCandidate>> = read_json(&path).await;
            (index, list)
        });
    }

    let mut lists: Vec<Option<Vec<TeamCandidate>>> = vec![None; files.len()];
    while let Some(joined) = set.join_next().await {
        let (index, list) = joined.map_err(|e| CliError::Task(e.to_string()))?;
        let list = list?;
        debug!(file = %files[index].display(), candidates = list.len(), "Read candidates");
        lists[index] = Some(list);
    }

    Ok(lists.into_iter().flatten().collect())
}

/// Runs the dedupe command, printing team configurations (or the merged
/// candidates with `raw`) as JSON.
pub async fn run(files: &[PathBuf], raw: bool) -> CliResult<()> {
    let merged = dedupe(read_candidate_lists(files).await?);

    let json = if raw {
        serde_json::to_string_pretty(&merged)
    } else {
        serde_json::to_string_pretty(&team_configs(&merged))
    }
    .map_err(|e| CliError::json("<stdout>", e))?;

    println!("{}", json);
    Ok(())
}
