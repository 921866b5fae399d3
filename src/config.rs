use crate::error::{Result, ToolingError};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const CONFIG_PATH_ENV: &str = "POM_TOOLING_CONFIG";
pub const GITLAB_TOKEN_ENV: &str = "GITLAB_TOKEN";
pub const NEXUS_USERNAME_ENV: &str = "NEXUS_USERNAME";
pub const NEXUS_PASSWORD_ENV: &str = "NEXUS_PASSWORD";

const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ToolingConfig {
    pub gitlab: GitLabConfig,
    pub nexus: NexusConfig,
    pub dependencies: DependencyConfig,
    pub git: GitConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitLabConfig {
    pub base_url: String,
    /// Namespace that holds every managed project, e.g. `group/subgroup`.
    pub group_path: String,
    pub timeout_secs: u64,
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            base_url: "https://natwest.gitlab-dedicated.com".to_string(),
            group_path: "natwestgroup/DigitalX/RetailBankingDigiTech/DigitalChannels/DigiBankingMplatform"
                .to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NexusConfig {
    pub url: String,
    pub repository: String,
    pub group_id: String,
    pub timeout_secs: u64,
}

impl Default for NexusConfig {
    fn default() -> Self {
        Self {
            url: "https://nexus.mplatform.co.uk".to_string(),
            repository: "mob-libs-releases-local".to_string(),
            group_id: "com.rbs.digital.mobile".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DependencyConfig {
    /// Organizational group id whose artifacts are bumped automatically.
    pub managed_group_id: String,
}

impl Default for DependencyConfig {
    fn default() -> Self {
        Self {
            managed_group_id: "com.rbs.digital.mobile".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    pub author_name: String,
    pub author_email: String,
    pub default_branch: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            author_name: "pom-tooling".to_string(),
            author_email: "pom-tooling@users.noreply.gitlab.com".to_string(),
            default_branch: "develop".to_string(),
        }
    }
}

impl ToolingConfig {
    /// Load configuration from an explicit path, the `POM_TOOLING_CONFIG`
    /// variable, or fall back to the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var(CONFIG_PATH_ENV).ok();
        let config = match path.or(env_path.as_deref().map(Path::new)) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ToolingError::Configuration(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<()> {
        validate_base_url(&self.gitlab.base_url)?;
        validate_base_url(&self.nexus.url)?;
        if self.gitlab.group_path.trim_matches('/').is_empty() {
            return Err(ToolingError::Configuration(
                "gitlab.group_path cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl GitLabConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `group/subgroup/<repo>` as GitLab addresses the project.
    pub fn project_path(&self, repo_name: &str) -> String {
        format!("{}/{}", self.group_path.trim_matches('/'), repo_name)
    }
}

impl NexusConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

pub fn validate_base_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url)
        .map_err(|_| ToolingError::Configuration(format!("Invalid base URL: {url}")))?;

    match parsed.scheme() {
        "https" | "http" => Ok(parsed),
        scheme => Err(ToolingError::Configuration(format!(
            "Unsupported URL scheme: {scheme}"
        ))),
    }
}

/// Reads a credential from the environment, failing when it is unset or blank.
pub fn required_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ToolingError::Configuration(format!(
            "Environment variable {name} must be set"
        ))),
    }
}
