use thiserror::Error;

/// Message returned to callers for errors that are not part of the domain taxonomy.
pub const UNHANDLED_ERROR_MESSAGE: &str = "Not handled error";

#[derive(Error, Debug)]
pub enum ToolingError {
    #[error("{0}")]
    Validation(String),

    #[error("Unable to checkout {0}")]
    BranchNotFound(String),

    #[error("Could not find {0} element in root pom.xml")]
    MissingRequiredElement(String),

    #[error("Unexpected null XML element for type: {0}")]
    MissingElement(String),

    #[error("Element '{0}' has no text content")]
    MissingElementText(String),

    #[error("Malformed POM document: {0}")]
    MalformedDocument(String),

    #[error("{0}")]
    InvalidPomVersion(String),

    #[error("Invalid version '{version}' for {coordinate}")]
    InvalidVersion { coordinate: String, version: String },

    #[error("{0}")]
    Upstream(String),

    #[error("Git operation failed: {0}")]
    GitOperation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Closed classification of every [`ToolingError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    InternalServerError,
    Unhandled,
}

impl ErrorKind {
    pub fn http_status(self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::InternalServerError | ErrorKind::Unhandled => 500,
        }
    }
}

impl ToolingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ToolingError::Validation(_) | ToolingError::BranchNotFound(_) => ErrorKind::BadRequest,
            ToolingError::MissingRequiredElement(_)
            | ToolingError::MissingElement(_)
            | ToolingError::MissingElementText(_)
            | ToolingError::MalformedDocument(_)
            | ToolingError::InvalidPomVersion(_)
            | ToolingError::InvalidVersion { .. }
            | ToolingError::Upstream(_)
            | ToolingError::GitOperation(_)
            | ToolingError::Configuration(_) => ErrorKind::InternalServerError,
            ToolingError::Io(_)
            | ToolingError::Json(_)
            | ToolingError::Toml(_)
            | ToolingError::Http(_) => ErrorKind::Unhandled,
        }
    }

    pub fn http_status(&self) -> u16 {
        self.kind().http_status()
    }

    /// Message safe to hand back to the caller. Library errors are hidden behind
    /// a fixed message and only ever reach the logs.
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Unhandled => UNHANDLED_ERROR_MESSAGE.to_string(),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ToolingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_keep_their_message() {
        let err = ToolingError::MissingRequiredElement("parent".into());
        assert_eq!(err.http_status(), 500);
        assert_eq!(
            err.user_message(),
            "Could not find parent element in root pom.xml"
        );
    }

    #[test]
    fn invalid_version_names_the_coordinate() {
        let err = ToolingError::InvalidVersion {
            coordinate: "com.rbs.digital.mobile:lib-a".into(),
            version: "${lib-a.version}".into(),
        };
        assert_eq!(err.kind(), ErrorKind::InternalServerError);
        assert_eq!(
            err.user_message(),
            "Invalid version '${lib-a.version}' for com.rbs.digital.mobile:lib-a"
        );
    }

    #[test]
    fn branch_not_found_is_a_bad_request() {
        let err = ToolingError::BranchNotFound("feature/missing".into());
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(err.user_message(), "Unable to checkout feature/missing");
    }

    #[test]
    fn library_errors_are_masked() {
        let err = ToolingError::Io(std::io::Error::other("disk on fire"));
        assert_eq!(err.kind(), ErrorKind::Unhandled);
        assert_eq!(err.http_status(), 500);
        assert_eq!(err.user_message(), UNHANDLED_ERROR_MESSAGE);
    }
}
