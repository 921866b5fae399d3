use crate::error::Result;

pub mod factory;
pub use factory::RepositoryFactory;

/// Authority on the latest published version of an artifact.
pub trait VersionOracle: Send + Sync {
    /// Latest released version of `artifact_id` within the organization's group.
    /// Fails when the artifact has no published version.
    fn fetch_latest_version(&self, artifact_id: &str) -> Result<String>;
}
