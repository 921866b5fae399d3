use crate::error::Result;
use crate::pom::{DependencyScanner, PomDocument};
use crate::repository::VersionOracle;
use crate::scm::SourceRepository;
use jiff::Timestamp;
use std::sync::Arc;
use tracing::info;

const COMMIT_MESSAGE: &str = "updating project dependencies";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    NoChanges,
    MergeRequestCreated { url: String },
}

/// Clone → scan → branch/commit/push → merge request.
pub struct DependencyUpdateService {
    source: Arc<dyn SourceRepository>,
    oracle: Arc<dyn VersionOracle>,
    managed_group_id: String,
}

impl DependencyUpdateService {
    pub fn new(
        source: Arc<dyn SourceRepository>,
        oracle: Arc<dyn VersionOracle>,
        managed_group_id: impl Into<String>,
    ) -> Self {
        Self {
            source,
            oracle,
            managed_group_id: managed_group_id.into(),
        }
    }

    /// Bumps the organizational dependencies of `repository_name` on
    /// `source_branch` and opens a merge request back into it. Nothing is
    /// branched, committed or pushed when every dependency is current.
    pub fn update(
        &self,
        repository_name: &str,
        jira_number: &str,
        source_branch: &str,
    ) -> Result<UpdateOutcome> {
        let workspace = tempfile::tempdir()?;
        let repo = self
            .source
            .clone_checkout(repository_name, workspace.path(), source_branch)?;
        info!(repository_name, source_branch, "Cloned");

        let pom_path = repo.path.join("pom.xml");
        let mut doc = PomDocument::parse(&pom_path)?;
        let scanner = DependencyScanner::new(self.oracle.as_ref(), &self.managed_group_id);
        if !scanner.scan_and_update(&mut doc)? {
            info!(repository_name, "No dependency needs an update");
            return Ok(UpdateOutcome::NoChanges);
        }
        doc.write(&pom_path)?;

        let branch = update_branch_name(jira_number, Timestamp::now());
        self.source.create_new_branch(&repo, &branch)?;
        self.source.commit(&repo, jira_number, COMMIT_MESSAGE)?;
        self.source.push(&repo, repository_name)?;
        info!(%branch, "Changes pushed");

        let url =
            self.source
                .create_merge_request(&repo, repository_name, source_branch, jira_number)?;
        Ok(UpdateOutcome::MergeRequestCreated { url })
    }
}

fn update_branch_name(jira_number: &str, now: Timestamp) -> String {
    format!(
        "feature/{jira_number}_update_dependencies_{}",
        now.as_microsecond()
    )
}
