//! Resource model of the Edgee management API.
//!
//! Every type mirrors the JSON the API sends or accepts. Optional request
//! fields are omitted from serialized bodies rather than sent as `null`.

pub mod common;
pub mod component;
pub mod data_collection;
pub mod error;
pub mod organization;
pub mod project;
pub mod user;

pub use common::{
    DeletedResponse, ListParams, ListResponse, OrderDirection, QueryFields, UploadPresign,
};
pub use error::{ErrorResponse, ErrorType};
