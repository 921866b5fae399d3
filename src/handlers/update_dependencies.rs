use crate::context::AppContext;
use crate::error::Result;
use crate::handlers::{Response, respond};
use crate::services::{DependencyUpdateService, UpdateOutcome};
use crate::validation::{validate_branch, validate_jira_number, validate_repo_name};
use serde::Deserialize;
use tracing::info_span;

pub const NO_NEW_VERSION: &str = "Not found new version of any dependency";
pub const MERGE_REQUEST_CREATED: &str = "Merge request created with updated dependencies";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDependenciesEvent {
    pub repository_name: Option<String>,
    pub jira_number: Option<String>,
    pub branch_name: Option<String>,
}

pub fn handle(context: &AppContext, event: &UpdateDependenciesEvent) -> Response {
    let span = info_span!(
        "update_dependencies",
        repository_name = event.repository_name.as_deref().unwrap_or_default(),
        jira_number = event.jira_number.as_deref().unwrap_or_default(),
    );
    let _guard = span.enter();
    respond(run(context, event))
}

fn run(context: &AppContext, event: &UpdateDependenciesEvent) -> Result<Response> {
    let repository_name = validate_repo_name(event.repository_name.as_deref())?;
    let jira_number = validate_jira_number(event.jira_number.as_deref())?;
    let branch = validate_branch(Some(
        event
            .branch_name
            .as_deref()
            .filter(|branch| !branch.is_empty())
            .unwrap_or(&context.config().git.default_branch),
    ))?;

    let service = DependencyUpdateService::new(
        context.source_repository()?,
        context.version_oracle()?,
        context.config().dependencies.managed_group_id.as_str(),
    );

    Ok(
        match service.update(&repository_name, &jira_number, &branch)? {
            UpdateOutcome::NoChanges => Response::ok(NO_NEW_VERSION),
            UpdateOutcome::MergeRequestCreated { url } => {
                Response::with_merge_request(MERGE_REQUEST_CREATED, url)
            }
        },
    )
}
