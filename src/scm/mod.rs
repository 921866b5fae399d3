use crate::error::Result;
use std::path::{Path, PathBuf};

pub mod git;
pub mod gitlab;

pub use git::GitService;
pub use gitlab::{GitLabClient, Pipeline};

/// A repository checked out on the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingCopy {
    pub path: PathBuf,
}

impl WorkingCopy {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

/// Source-control operations the workflows depend on.
pub trait SourceRepository: Send + Sync {
    /// Clone `repo_name` into `local_dir/<repo_name>` and check out `branch`.
    fn clone_checkout(&self, repo_name: &str, local_dir: &Path, branch: &str)
    -> Result<WorkingCopy>;

    fn create_new_branch(&self, repo: &WorkingCopy, branch: &str) -> Result<()>;

    /// Stage every working-copy change and commit it as `"<jira_number>: <message>"`.
    fn commit(&self, repo: &WorkingCopy, jira_number: &str, message: &str) -> Result<()>;

    /// Push the active branch to the remote of the same name.
    fn push(&self, repo: &WorkingCopy, repo_name: &str) -> Result<()>;

    /// Open a merge request from the active branch and return its web URL.
    fn create_merge_request(
        &self,
        repo: &WorkingCopy,
        repo_name: &str,
        target_branch: &str,
        jira_number: &str,
    ) -> Result<String>;
}

/// Merge request operations addressed by the request's web URL.
pub trait MergeRequests: Send + Sync {
    /// Pipelines of the merge request, newest first.
    fn pipelines(&self, merge_request_url: &str) -> Result<Vec<Pipeline>>;

    fn approve(&self, merge_request_url: &str) -> Result<()>;

    fn merge(&self, merge_request_url: &str) -> Result<()>;
}
