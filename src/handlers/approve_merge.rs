use crate::context::AppContext;
use crate::error::Result;
use crate::handlers::{Response, respond};
use crate::services::ApproveMergeService;
use crate::validation::validate_merge_request_url;
use serde::Deserialize;
use tracing::info_span;

pub const APPROVED_AND_MERGED: &str = "build has been approved and merged";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveMergeEvent {
    pub merge_request_url: Option<String>,
}

pub fn handle(context: &AppContext, event: &ApproveMergeEvent) -> Response {
    let span = info_span!(
        "approve_merge",
        merge_request_url = event.merge_request_url.as_deref().unwrap_or_default(),
    );
    let _guard = span.enter();
    respond(run(context, event))
}

fn run(context: &AppContext, event: &ApproveMergeEvent) -> Result<Response> {
    let merge_request_url = validate_merge_request_url(event.merge_request_url.as_deref())?;
    ApproveMergeService::new(context.merge_requests()?).approve_and_merge(&merge_request_url)?;
    Ok(Response::ok(APPROVED_AND_MERGED))
}
