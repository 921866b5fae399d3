use crate::error::Result;
use crate::scm::MergeRequests;
use std::sync::Arc;
use tracing::info;

pub const BUILD_NOT_STARTED: &str = "build has not started yet";

pub struct BuildStatusService {
    merge_requests: Arc<dyn MergeRequests>,
}

impl BuildStatusService {
    pub fn new(merge_requests: Arc<dyn MergeRequests>) -> Self {
        Self { merge_requests }
    }

    /// Status of the most recent pipeline of the merge request.
    pub fn fetch_build_status(&self, merge_request_url: &str) -> Result<String> {
        let pipelines = self.merge_requests.pipelines(merge_request_url)?;
        let status = pipelines
            .into_iter()
            .next()
            .map(|pipeline| pipeline.status)
            .unwrap_or_else(|| BUILD_NOT_STARTED.to_string());

        info!(merge_request_url, %status, "Build status");
        Ok(status)
    }
}
