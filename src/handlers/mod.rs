//! One handler per automation function: validate the event, call the
//! service, and fold the outcome into a [`Response`] envelope.

use crate::error::{Result, ToolingError};
use serde::Serialize;
use tracing::error;

pub mod approve_merge;
pub mod build_status;
pub mod set_version;
pub mod update_dependencies;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    pub body: ResponseBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<AdditionalInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Message(String),
    Error {
        #[serde(rename = "errorCode")]
        error_code: u16,
        #[serde(rename = "errorMessage")]
        error_message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalInfo {
    pub merge_request_url: String,
}

impl Response {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: ResponseBody::Message(message.into()),
            additional_info: None,
        }
    }

    pub fn with_merge_request(message: impl Into<String>, merge_request_url: String) -> Self {
        Self {
            additional_info: Some(AdditionalInfo { merge_request_url }),
            ..Self::ok(message)
        }
    }

    pub fn from_error(err: &ToolingError) -> Self {
        let status = err.http_status();
        error!(error = %err, status, kind = ?err.kind(), "Request failed");

        Self {
            status_code: status,
            body: ResponseBody::Error {
                error_code: status,
                error_message: err.user_message(),
            },
            additional_info: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

pub(crate) fn respond(result: Result<Response>) -> Response {
    result.unwrap_or_else(|err| Response::from_error(&err))
}
