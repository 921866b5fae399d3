use crate::context::AppContext;
use crate::error::Result;
use crate::handlers::{Response, respond};
use crate::services::BuildStatusService;
use crate::validation::validate_merge_request_url;
use serde::Deserialize;
use tracing::info_span;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStatusEvent {
    pub merge_request_url: Option<String>,
}

pub fn handle(context: &AppContext, event: &BuildStatusEvent) -> Response {
    let span = info_span!(
        "check_build_status",
        merge_request_url = event.merge_request_url.as_deref().unwrap_or_default(),
    );
    let _guard = span.enter();
    respond(run(context, event))
}

fn run(context: &AppContext, event: &BuildStatusEvent) -> Result<Response> {
    let merge_request_url = validate_merge_request_url(event.merge_request_url.as_deref())?;
    let status =
        BuildStatusService::new(context.merge_requests()?).fetch_build_status(&merge_request_url)?;
    Ok(Response::ok(status))
}
