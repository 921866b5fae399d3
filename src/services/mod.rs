pub mod approve_merge;
pub mod build_status;
pub mod set_version;
pub mod update_dependencies;

pub use approve_merge::ApproveMergeService;
pub use build_status::BuildStatusService;
pub use set_version::SetVersionService;
pub use update_dependencies::{DependencyUpdateService, UpdateOutcome};

#[cfg(test)]
pub(crate) mod fakes {
    use crate::error::{Result, ToolingError};
    use crate::scm::{MergeRequests, Pipeline, SourceRepository, WorkingCopy};
    use std::fs;
    use std::path::Path;
    use std::sync::Mutex;

    /// In-memory SourceRepository: "clones" by writing the configured files
    /// into the working directory and records every call it receives.
    pub(crate) struct FakeSourceRepository {
        files: Vec<(String, String)>,
        branches: Vec<String>,
        merge_request_url: Option<String>,
        calls: Mutex<Vec<String>>,
        committed_pom: Mutex<Option<String>>,
    }

    impl FakeSourceRepository {
        pub(crate) fn with_pom(pom: &str) -> Self {
            Self {
                files: vec![("pom.xml".to_string(), pom.to_string())],
                branches: vec!["develop".to_string()],
                merge_request_url: Some("https://link-to-mr".to_string()),
                calls: Mutex::new(Vec::new()),
                committed_pom: Mutex::new(None),
            }
        }

        pub(crate) fn empty() -> Self {
            Self {
                files: Vec::new(),
                ..Self::with_pom("")
            }
        }

        pub(crate) fn with_file(mut self, relative: &str, content: &str) -> Self {
            self.files.push((relative.to_string(), content.to_string()));
            self
        }

        pub(crate) fn failing_merge_request(mut self) -> Self {
            self.merge_request_url = None;
            self
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        /// Root `pom.xml` as it was on disk when `commit` ran.
        pub(crate) fn committed_pom(&self) -> Option<String> {
            self.committed_pom.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl SourceRepository for FakeSourceRepository {
        fn clone_checkout(
            &self,
            repo_name: &str,
            local_dir: &Path,
            branch: &str,
        ) -> Result<WorkingCopy> {
            self.record(format!("clone_checkout {repo_name} {branch}"));
            if !self.branches.iter().any(|b| b == branch) {
                return Err(ToolingError::BranchNotFound(branch.to_string()));
            }

            let root = local_dir.join(repo_name);
            for (relative, content) in &self.files {
                let path = root.join(relative);
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, content)?;
            }
            Ok(WorkingCopy::new(root))
        }

        fn create_new_branch(&self, _repo: &WorkingCopy, branch: &str) -> Result<()> {
            self.record(format!("create_new_branch {branch}"));
            Ok(())
        }

        fn commit(&self, repo: &WorkingCopy, jira_number: &str, message: &str) -> Result<()> {
            self.record(format!("commit {jira_number}: {message}"));
            let pom = fs::read_to_string(repo.path.join("pom.xml"))?;
            *self.committed_pom.lock().unwrap() = Some(pom);
            Ok(())
        }

        fn push(&self, _repo: &WorkingCopy, repo_name: &str) -> Result<()> {
            self.record(format!("push {repo_name}"));
            Ok(())
        }

        fn create_merge_request(
            &self,
            _repo: &WorkingCopy,
            repo_name: &str,
            target_branch: &str,
            jira_number: &str,
        ) -> Result<String> {
            self.record(format!(
                "create_merge_request {repo_name} {target_branch} {jira_number}"
            ));
            self.merge_request_url
                .clone()
                .ok_or_else(|| ToolingError::Upstream("Failed to create merge request: 409".into()))
        }
    }

    /// MergeRequests answering from a fixed pipeline list.
    #[derive(Default)]
    pub(crate) struct FakeMergeRequests {
        pub(crate) pipelines: Vec<Pipeline>,
        pub(crate) reject_merge: bool,
        pub(crate) calls: Mutex<Vec<String>>,
    }

    impl FakeMergeRequests {
        pub(crate) fn with_statuses(statuses: &[&str]) -> Self {
            Self {
                pipelines: statuses
                    .iter()
                    .enumerate()
                    .map(|(i, status)| Pipeline {
                        id: (statuses.len() - i) as u64,
                        status: status.to_string(),
                    })
                    .collect(),
                ..Self::default()
            }
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl MergeRequests for FakeMergeRequests {
        fn pipelines(&self, merge_request_url: &str) -> Result<Vec<Pipeline>> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("pipelines {merge_request_url}"));
            Ok(self.pipelines.clone())
        }

        fn approve(&self, merge_request_url: &str) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("approve {merge_request_url}"));
            Ok(())
        }

        fn merge(&self, merge_request_url: &str) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("merge {merge_request_url}"));
            if self.reject_merge {
                return Err(ToolingError::Upstream(
                    "Failed to merge merge request: 405".into(),
                ));
            }
            Ok(())
        }
    }
}
