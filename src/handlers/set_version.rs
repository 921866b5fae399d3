use crate::context::AppContext;
use crate::error::Result;
use crate::handlers::{Response, respond};
use crate::services::SetVersionService;
use crate::validation::{
    validate_branch, validate_jira_number, validate_pom_version, validate_repo_name,
};
use serde::Deserialize;
use tracing::info_span;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetVersionEvent {
    pub repository_name: Option<String>,
    pub new_pom_version: Option<String>,
    pub jira_number: Option<String>,
    pub branch_name: Option<String>,
}

pub fn handle(context: &AppContext, event: &SetVersionEvent) -> Response {
    let span = info_span!(
        "set_version",
        repository_name = event.repository_name.as_deref().unwrap_or_default(),
        new_pom_version = event.new_pom_version.as_deref().unwrap_or_default(),
    );
    let _guard = span.enter();
    respond(run(context, event))
}

fn run(context: &AppContext, event: &SetVersionEvent) -> Result<Response> {
    let repository_name = validate_repo_name(event.repository_name.as_deref())?;
    let new_version = validate_pom_version(event.new_pom_version.as_deref())?;
    let jira_number = validate_jira_number(event.jira_number.as_deref())?;
    let branch = validate_branch(Some(
        event
            .branch_name
            .as_deref()
            .filter(|branch| !branch.is_empty())
            .unwrap_or(&context.config().git.default_branch),
    ))?;

    SetVersionService::new(context.source_repository()?).set_version(
        &repository_name,
        &new_version,
        &jira_number,
        &branch,
    )?;

    Ok(Response::ok(format!(
        "pom(s) in {repository_name} updated to version {new_version} on branch {branch}"
    )))
}
