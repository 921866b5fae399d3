use crate::config::{NexusConfig, validate_base_url};
use crate::error::{Result, ToolingError};
use crate::repository::VersionOracle;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

const SEARCH_PATH: &str = "service/rest/v1/search";
const ARTIFACT_EXTENSION: &str = "pom";

/// Nexus search API client used as the version authority.
pub struct NexusRepository {
    client: Client,
    base_url: Url,
    repository: String,
    group_id: String,
    username: String,
    password: String,
}

impl NexusRepository {
    pub fn new(config: &NexusConfig, username: String, password: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("pom-tooling/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: validate_base_url(&config.url)?,
            repository: config.repository.clone(),
            group_id: config.group_id.clone(),
            username,
            password,
        })
    }

    /// Fetch the newest release of `artifact_id`, as ranked by Nexus.
    pub fn fetch_latest_version(&self, artifact_id: &str) -> Result<String> {
        let url = self.search_url(artifact_id)?;
        debug!(%url, "Querying Nexus");

        let response = self
            .client
            .get(url)
            .basic_auth(&self.username, Some(&self.password))
            .send()?;

        let status = response.status();
        let body = response.text()?;
        let version = Self::latest_from_response(artifact_id, status, &body)?;
        info!(artifact_id, %version, "Latest version found in Nexus");
        Ok(version)
    }

    fn search_url(&self, artifact_id: &str) -> Result<Url> {
        let endpoint = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            SEARCH_PATH
        );
        Url::parse_with_params(
            &endpoint,
            &[
                ("repository", self.repository.as_str()),
                ("maven.groupId", self.group_id.as_str()),
                ("maven.artifactId", artifact_id),
                ("maven.extension", ARTIFACT_EXTENSION),
                ("sort", "version"),
                ("direction", "desc"),
            ],
        )
        .map_err(|e| ToolingError::Configuration(format!("Invalid Nexus URL '{endpoint}': {e}")))
    }

    fn latest_from_response(artifact_id: &str, status: StatusCode, body: &str) -> Result<String> {
        if status != StatusCode::OK {
            return Err(ToolingError::Upstream(format!(
                "Failed to call Nexus. Status code: {} and body: {}",
                status.as_u16(),
                body
            )));
        }

        let search: SearchResponse = serde_json::from_str(body)?;
        search
            .items
            .into_iter()
            .next()
            .and_then(|item| item.version)
            .ok_or_else(|| {
                ToolingError::Upstream(format!(
                    "No version has been found for artifact id: [{artifact_id}]"
                ))
            })
    }
}

impl VersionOracle for NexusRepository {
    fn fetch_latest_version(&self, artifact_id: &str) -> Result<String> {
        NexusRepository::fetch_latest_version(self, artifact_id)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    version: Option<String>,
}
