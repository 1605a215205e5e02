use std::fmt;

use serde::{Deserialize, Serialize};

/// Structured error payload returned by the Edgee API on non-2xx responses.
///
/// Agents branch on `error.type` (e.g. `not_found_error` vs `conflict_error`),
/// so the type is kept machine-readable and the original string survives even
/// when the API introduces a type this crate does not know yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error category
    #[serde(rename = "type")]
    pub kind: ErrorType,
    /// Human/agent-readable description of what went wrong
    pub message: String,
    /// Per-parameter validation failures (invalid_request_error only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<ErrorParam>>,
}

/// Which request parameter was rejected, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorParam {
    pub param: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorType {
    InvalidRequest,
    NotFound,
    Creation,
    Update,
    Deletion,
    Forbidden,
    Authentication,
    Conflict,
    /// A type string not (yet) part of the documented set
    Other(String),
}

/// Error type strings as they appear on the wire
pub mod codes {
    pub const INVALID_REQUEST: &str = "invalid_request_error";
    pub const NOT_FOUND: &str = "not_found_error";
    pub const CREATION: &str = "creation_error";
    pub const UPDATE: &str = "update_error";
    pub const DELETION: &str = "deletion_error";
    pub const FORBIDDEN: &str = "forbidden_error";
    pub const AUTHENTICATION: &str = "authentication_error";
    pub const CONFLICT: &str = "conflict_error";
}

impl ErrorType {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorType::InvalidRequest => codes::INVALID_REQUEST,
            ErrorType::NotFound => codes::NOT_FOUND,
            ErrorType::Creation => codes::CREATION,
            ErrorType::Update => codes::UPDATE,
            ErrorType::Deletion => codes::DELETION,
            ErrorType::Forbidden => codes::FORBIDDEN,
            ErrorType::Authentication => codes::AUTHENTICATION,
            ErrorType::Conflict => codes::CONFLICT,
            ErrorType::Other(raw) => raw,
        }
    }
}

impl From<String> for ErrorType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            codes::INVALID_REQUEST => ErrorType::InvalidRequest,
            codes::NOT_FOUND => ErrorType::NotFound,
            codes::CREATION => ErrorType::Creation,
            codes::UPDATE => ErrorType::Update,
            codes::DELETION => ErrorType::Deletion,
            codes::FORBIDDEN => ErrorType::Forbidden,
            codes::AUTHENTICATION => ErrorType::Authentication,
            codes::CONFLICT => ErrorType::Conflict,
            _ => ErrorType::Other(raw),
        }
    }
}

impl From<ErrorType> for String {
    fn from(kind: ErrorType) -> Self {
        match kind {
            ErrorType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
