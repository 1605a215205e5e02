use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered query fields of a request. `None` values are dropped by the
/// request layer, never sent as empty strings.
pub type QueryFields = Vec<(&'static str, Option<String>)>;

/// Cursor-based pagination accepted by every list endpoint.
///
/// `start_key` is the opaque `last_key` of the previous page, echoed back
/// verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_direction: Option<OrderDirection>,
}

impl ListParams {
    pub fn query_fields(&self) -> QueryFields {
        vec![
            ("limit", self.limit.map(|v| v.to_string())),
            ("start_key", self.start_key.clone()),
            ("order_direction", self.order_direction.map(|d| d.to_string())),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub object: String,
    pub url: String,
    pub has_more: bool,
    /// Cursor for the next page; pass as `start_key`
    #[serde(default)]
    pub last_key: Option<String>,
    pub data: Vec<T>,
}

/// Uniform response of every DELETE endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub object: String,
    pub id: String,
    pub deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadPresign {
    pub upload_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_params_fields_keep_declaration_order() {
        let params = ListParams {
            limit: Some(10),
            start_key: None,
            order_direction: Some(OrderDirection::Asc),
        };
        assert_eq!(
            params.query_fields(),
            vec![
                ("limit", Some("10".to_string())),
                ("start_key", None),
                ("order_direction", Some("ASC".to_string())),
            ]
        );
    }

    #[test]
    fn list_response_tolerates_null_last_key() {
        let page: ListResponse<DeletedResponse> = serde_json::from_str(
            r#"{"object":"list","url":"/v1/x","has_more":false,"last_key":null,"data":[]}"#,
        )
        .unwrap();
        assert!(page.last_key.is_none());
        assert!(!page.has_more);
    }
}
