pub mod audit;
pub mod config;
pub mod domain;
pub mod errors;
pub mod review;

pub use domain::edit_request::{EditRequest, EditRequestId, EditRequestStatus};
pub use domain::entity::{EntityId, EntityType, OrgId, UnknownEntityType};
pub use domain::patch::{EntityPatch, FieldValue, PatchField};
pub use domain::session::{Role, Session, UserId};
pub use errors::{InterfaceError, WorkflowError};
pub use review::{ReviewError, ReviewEvent};
