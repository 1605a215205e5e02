//! Endpoint catalog: one `ApiClient` method per Edgee API operation.
//!
//! Each method maps its arguments onto a path, query and body and issues a
//! single request. Results come back exactly as the request layer produced
//! them.

mod component;
mod organization;
mod project;
mod user;
