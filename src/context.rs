use crate::config::{GITLAB_TOKEN_ENV, ToolingConfig, required_env};
use crate::error::Result;
use crate::repository::{RepositoryFactory, VersionOracle};
use crate::scm::{GitLabClient, GitService, MergeRequests, SourceRepository};
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Process-wide collaborators, each built on first use and then shared.
pub struct AppContext {
    config: ToolingConfig,
    gitlab: OnceLock<Arc<GitLabClient>>,
    source: OnceLock<Arc<dyn SourceRepository>>,
    oracle: OnceLock<Arc<dyn VersionOracle>>,
    merge_requests: OnceLock<Arc<dyn MergeRequests>>,
}

impl AppContext {
    pub fn new(config: ToolingConfig) -> Self {
        Self {
            config,
            gitlab: OnceLock::new(),
            source: OnceLock::new(),
            oracle: OnceLock::new(),
            merge_requests: OnceLock::new(),
        }
    }

    /// Context whose collaborators are fixed up front.
    #[cfg(test)]
    pub fn with_collaborators(
        config: ToolingConfig,
        source: Arc<dyn SourceRepository>,
        oracle: Arc<dyn VersionOracle>,
        merge_requests: Arc<dyn MergeRequests>,
    ) -> Self {
        Self {
            config,
            gitlab: OnceLock::new(),
            source: OnceLock::from(source),
            oracle: OnceLock::from(oracle),
            merge_requests: OnceLock::from(merge_requests),
        }
    }

    pub fn config(&self) -> &ToolingConfig {
        &self.config
    }

    pub fn source_repository(&self) -> Result<Arc<dyn SourceRepository>> {
        get_or_build(&self.source, || {
            let client = self.gitlab_client()?;
            let token = required_env(GITLAB_TOKEN_ENV)?;
            let service = GitService::new(&self.config.gitlab, &self.config.git, token, client)?;
            Ok(Arc::new(service) as Arc<dyn SourceRepository>)
        })
    }

    pub fn version_oracle(&self) -> Result<Arc<dyn VersionOracle>> {
        get_or_build(&self.oracle, || {
            RepositoryFactory::create_nexus(&self.config.nexus)
        })
    }

    pub fn merge_requests(&self) -> Result<Arc<dyn MergeRequests>> {
        get_or_build(&self.merge_requests, || {
            Ok(self.gitlab_client()? as Arc<dyn MergeRequests>)
        })
    }

    fn gitlab_client(&self) -> Result<Arc<GitLabClient>> {
        get_or_build(&self.gitlab, || {
            let token = required_env(GITLAB_TOKEN_ENV)?;
            Ok(Arc::new(GitLabClient::new(&self.config.gitlab, token)?))
        })
    }
}

/// Returns the cached value, building it on the first successful call.
/// Failed builds are not cached.
fn get_or_build<T: Clone>(cell: &OnceLock<T>, build: impl FnOnce() -> Result<T>) -> Result<T> {
    if let Some(value) = cell.get() {
        return Ok(value.clone());
    }

    let built = build()?;
    debug!(collaborator = std::any::type_name::<T>(), "Collaborator built");
    Ok(cell.get_or_init(|| built).clone())
}
