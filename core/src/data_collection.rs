use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::ListResponse;

/// An event as received at the edge, before fan-out to components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingDataCollectionEvent {
    pub object: String,
    pub uuid: String,
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub from: EventOrigin,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub context: Value,
}

pub type IncomingDataCollectionEventListResponse = ListResponse<IncomingDataCollectionEvent>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Page,
    Track,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventOrigin {
    Edge,
    Client,
    Third,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Page => "page",
            EventKind::Track => "track",
            EventKind::User => "user",
        }
    }
}

impl EventOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            EventOrigin::Edge => "edge",
            EventOrigin::Client => "client",
            EventOrigin::Third => "third",
        }
    }
}

/// What one component sent upstream for an incoming event, and what it got back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingDataCollectionEvent {
    pub object: String,
    pub uuid: String,
    pub component_id: String,
    pub component_slug: String,
    #[serde(default)]
    pub component_request: Value,
    #[serde(default)]
    pub component_response: Value,
}

pub type OutgoingDataCollectionEventListResponse = ListResponse<OutgoingDataCollectionEvent>;
