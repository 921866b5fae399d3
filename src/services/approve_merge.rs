use crate::error::Result;
use crate::scm::MergeRequests;
use std::sync::Arc;
use tracing::info;

pub struct ApproveMergeService {
    merge_requests: Arc<dyn MergeRequests>,
}

impl ApproveMergeService {
    pub fn new(merge_requests: Arc<dyn MergeRequests>) -> Self {
        Self { merge_requests }
    }

    pub fn approve_and_merge(&self, merge_request_url: &str) -> Result<()> {
        self.merge_requests.approve(merge_request_url)?;
        self.merge_requests.merge(merge_request_url)?;
        info!(merge_request_url, "Approved and merged");
        Ok(())
    }
}
