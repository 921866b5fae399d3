use crate::error::{Result, ToolingError};
use crate::maven::version::Version;
use regex::Regex;

pub const REPO_NAME_PATTERN: &str = r"^[\w_-]+$";
pub const JIRA_NUMBER_PATTERN: &str = r"^MPLAT-\d{4,}$";
pub const BRANCH_PATTERN: &str = r"^[/\w_-]+$";

fn matching(value: Option<&str>, field: &str, pattern: &str) -> Result<String> {
    let regex = Regex::new(pattern)
        .map_err(|e| ToolingError::Configuration(format!("Invalid pattern '{pattern}': {e}")))?;

    match value {
        Some(value) if regex.is_match(value) => Ok(value.to_string()),
        _ => Err(ToolingError::Validation(format!(
            "Please supply a valid {field} matching the pattern: {pattern}"
        ))),
    }
}

pub fn validate_repo_name(value: Option<&str>) -> Result<String> {
    matching(value, "repo_name", REPO_NAME_PATTERN)
}

pub fn validate_jira_number(value: Option<&str>) -> Result<String> {
    matching(value, "jira_number", JIRA_NUMBER_PATTERN)
}

pub fn validate_branch(value: Option<&str>) -> Result<String> {
    matching(value, "branch", BRANCH_PATTERN)
}

/// Accepts any Maven version once a trailing `-SNAPSHOT` is removed.
pub fn validate_pom_version(value: Option<&str>) -> Result<String> {
    let value = value.unwrap_or_default();
    if value.trim().is_empty() || !Version::parse(value).is_known() {
        return Err(ToolingError::Validation(format!(
            "Unable to parse {value} as a maven version"
        )));
    }
    Ok(value.to_string())
}

pub fn validate_merge_request_url(value: Option<&str>) -> Result<String> {
    match value.map(str::trim) {
        Some(url) if !url.is_empty() => Ok(url.to_string()),
        _ => Err(ToolingError::Validation(
            "Please supply a merge_request_url".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_inputs() {
        assert_eq!(validate_repo_name(Some("mobile-token_2")).unwrap(), "mobile-token_2");
        assert_eq!(validate_jira_number(Some("MPLAT-12345")).unwrap(), "MPLAT-12345");
        assert_eq!(
            validate_branch(Some("feature/MPLAT-1234_x")).unwrap(),
            "feature/MPLAT-1234_x"
        );
        assert_eq!(validate_pom_version(Some("4.12.0-SNAPSHOT")).unwrap(), "4.12.0-SNAPSHOT");
    }

    #[test]
    fn repo_name_message_names_the_pattern() {
        let err = validate_repo_name(Some("!!@@")).unwrap_err();
        assert_eq!(
            err.to_string(),
            r"Please supply a valid repo_name matching the pattern: ^[\w_-]+$"
        );
        assert!(validate_repo_name(None).is_err());
        assert!(validate_repo_name(Some("a/b")).is_err());
    }

    #[test]
    fn jira_number_needs_four_digits() {
        assert!(validate_jira_number(Some("MPLAT-123")).is_err());
        assert!(validate_jira_number(Some("JIRA-1234")).is_err());
        let err = validate_jira_number(None).unwrap_err();
        assert_eq!(
            err.to_string(),
            r"Please supply a valid jira_number matching the pattern: ^MPLAT-\d{4,}$"
        );
    }

    #[test]
    fn branch_rejects_spaces() {
        let err = validate_branch(Some("my branch")).unwrap_err();
        assert_eq!(
            err.to_string(),
            r"Please supply a valid branch matching the pattern: ^[/\w_-]+$"
        );
    }

    #[test]
    fn pom_version_must_parse() {
        let err = validate_pom_version(Some("not a version")).unwrap_err();
        assert_eq!(err.to_string(), "Unable to parse not a version as a maven version");
        assert!(validate_pom_version(None).is_err());
    }

    #[test]
    fn merge_request_url_is_required() {
        assert!(validate_merge_request_url(Some("  ")).is_err());
        assert!(validate_merge_request_url(Some("https://gitlab/x/-/merge_requests/1")).is_ok());
    }
}
