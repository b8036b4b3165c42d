use thiserror::Error;

use crate::review::ReviewError;

/// Operation-level failures of the review workflow. Everything a caller
/// can see is one of these; storage and notification internals are folded
/// into their owning variants before they cross this boundary.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("caller is not allowed to review edit requests")]
    Forbidden,
    #[error("edit request `{0}` was not found")]
    RequestNotFound(String),
    #[error(transparent)]
    Review(#[from] ReviewError),
    #[error("no update handler is registered for entity type `{0}`")]
    UnknownEntityType(String),
    #[error("target {entity_type} `{entity_id}` no longer exists")]
    EntityMissing { entity_type: String, entity_id: String },
    #[error("invalid patch: {0}")]
    InvalidPatch(String),
    #[error("persistence failure: {0}")]
    Persistence(String),
}

/// What the page/form layer shows the user when an operation fails.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::ServiceUnavailable { .. } => {
                "The service is temporarily unavailable. Please retry shortly."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }
}

impl WorkflowError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::ServiceUnavailable { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<WorkflowError> for InterfaceError {
    fn from(value: WorkflowError) -> Self {
        match value {
            WorkflowError::Forbidden
            | WorkflowError::RequestNotFound(_)
            | WorkflowError::Review(_)
            | WorkflowError::EntityMissing { .. }
            | WorkflowError::InvalidPatch(_) => Self::BadRequest {
                message: value.to_string(),
                correlation_id: "unassigned".to_owned(),
            },
            WorkflowError::Persistence(message) => {
                Self::ServiceUnavailable { message, correlation_id: "unassigned".to_owned() }
            }
            WorkflowError::UnknownEntityType(tag) => Self::Internal {
                message: format!("no update handler is registered for entity type `{tag}`"),
                correlation_id: "unassigned".to_owned(),
            },
        }
    }
}
