use crate::config::{NEXUS_PASSWORD_ENV, NEXUS_USERNAME_ENV, NexusConfig, required_env};
use crate::error::Result;
use crate::maven::NexusRepository;
use crate::repository::VersionOracle;
use std::sync::Arc;

pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Nexus-backed oracle using credentials from the environment.
    pub fn create_nexus(config: &NexusConfig) -> Result<Arc<dyn VersionOracle>> {
        let username = required_env(NEXUS_USERNAME_ENV)?;
        let password = required_env(NEXUS_PASSWORD_ENV)?;
        let client = NexusRepository::new(config, username, password)?;
        Ok(Arc::new(client))
    }
}
