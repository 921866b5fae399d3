use crate::config::{GitLabConfig, validate_base_url};
use crate::error::{Result, ToolingError};
use crate::scm::MergeRequests;
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

const MERGE_REQUEST_MARKER: &str = "/-/merge_requests/";

/// Merge request addressed by project path and internal id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequestRef {
    pub project_path: String,
    pub iid: u64,
}

impl MergeRequestRef {
    /// Parse `https://<host>/<project path>/-/merge_requests/<iid>`.
    pub fn parse(base_url: &Url, merge_request_url: &str) -> Result<Self> {
        let invalid = || {
            ToolingError::Validation(format!(
                "Invalid merge request URL: {merge_request_url}"
            ))
        };

        let url = Url::parse(merge_request_url).map_err(|_| invalid())?;
        if url.host_str() != base_url.host_str() {
            return Err(invalid());
        }

        let base_path = base_url.path().trim_end_matches('/');
        let path = url.path().strip_prefix(base_path).ok_or_else(invalid)?;
        let (project_path, rest) = path.split_once(MERGE_REQUEST_MARKER).ok_or_else(invalid)?;

        let project_path = project_path.trim_matches('/');
        let iid = rest
            .split('/')
            .next()
            .and_then(|iid| iid.parse::<u64>().ok())
            .ok_or_else(invalid)?;

        if project_path.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            project_path: project_path.to_string(),
            iid,
        })
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Pipeline {
    pub id: u64,
    pub status: String,
}

#[derive(Debug, Deserialize)]
struct CreatedMergeRequest {
    web_url: String,
}

/// GitLab REST API client.
pub struct GitLabClient {
    client: Client,
    base_url: Url,
    token: String,
}

impl GitLabClient {
    pub fn new(config: &GitLabConfig, token: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("pom-tooling/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: validate_base_url(&config.base_url)?,
            token,
        })
    }

    pub fn create_merge_request(
        &self,
        project_path: &str,
        source_branch: &str,
        target_branch: &str,
        title: &str,
    ) -> Result<String> {
        let url = self.project_api_url(project_path, "merge_requests");
        debug!(%url, source_branch, target_branch, "Creating merge request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .form(&[
                ("source_branch", source_branch),
                ("target_branch", target_branch),
                ("title", title),
            ])
            .send()?;

        if response.status() != StatusCode::CREATED {
            return Err(ToolingError::Upstream(format!(
                "Failed to create merge request: {}",
                response.status().as_u16()
            )));
        }

        let created: CreatedMergeRequest = serde_json::from_str(&response.text()?)?;
        info!(merge_request_url = %created.web_url, "Merge request created");
        Ok(created.web_url)
    }

    pub fn merge_request_pipelines(&self, mr: &MergeRequestRef) -> Result<Vec<Pipeline>> {
        let url = self.merge_request_api_url(mr, "pipelines");
        debug!(%url, "Listing merge request pipelines");

        let response = self.client.get(&url).bearer_auth(&self.token).send()?;
        let response = Self::ensure_success(response, "fetch pipelines for merge request")?;
        Ok(serde_json::from_str(&response.text()?)?)
    }

    pub fn approve_merge_request(&self, mr: &MergeRequestRef) -> Result<()> {
        let url = self.merge_request_api_url(mr, "approve");
        let response = self.client.post(&url).bearer_auth(&self.token).send()?;
        Self::ensure_success(response, "approve merge request")?;
        info!(project = %mr.project_path, iid = mr.iid, "Merge request approved");
        Ok(())
    }

    pub fn merge_merge_request(&self, mr: &MergeRequestRef) -> Result<()> {
        let url = self.merge_request_api_url(mr, "merge");
        let response = self.client.put(&url).bearer_auth(&self.token).send()?;
        Self::ensure_success(response, "merge merge request")?;
        info!(project = %mr.project_path, iid = mr.iid, "Merge request merged");
        Ok(())
    }

    fn project_api_url(&self, project_path: &str, suffix: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(project_path.as_bytes()).collect();
        format!(
            "{}/api/v4/projects/{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            encoded,
            suffix
        )
    }

    fn merge_request_api_url(&self, mr: &MergeRequestRef, action: &str) -> String {
        self.project_api_url(
            &mr.project_path,
            &format!("merge_requests/{}/{}", mr.iid, action),
        )
    }

    fn ensure_success(response: Response, action: &str) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        Err(ToolingError::Upstream(format!(
            "Failed to {action}: {}",
            response.status().as_u16()
        )))
    }
}

impl MergeRequests for GitLabClient {
    fn pipelines(&self, merge_request_url: &str) -> Result<Vec<Pipeline>> {
        let mr = MergeRequestRef::parse(&self.base_url, merge_request_url)?;
        self.merge_request_pipelines(&mr)
    }

    fn approve(&self, merge_request_url: &str) -> Result<()> {
        let mr = MergeRequestRef::parse(&self.base_url, merge_request_url)?;
        self.approve_merge_request(&mr)
    }

    fn merge(&self, merge_request_url: &str) -> Result<()> {
        let mr = MergeRequestRef::parse(&self.base_url, merge_request_url)?;
        self.merge_merge_request(&mr)
    }
}
