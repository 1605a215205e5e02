use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::{ListParams, ListResponse, QueryFields};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub object: String,
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(rename = "type")]
    pub kind: OrganizationType,
    #[serde(default)]
    pub current_billing_plan: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

pub type OrganizationListResponse = ListResponse<Organization>;

/// Personal organizations are created with the account; `pro` ones by users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganizationType {
    Perso,
    Pro,
}

impl fmt::Display for OrganizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OrganizationType::Perso => "perso",
            OrganizationType::Pro => "pro",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrganizationCreateInput {
    pub name: String,
    pub slug: String,
}

/// The API expects the id inside the body as well as in the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrganizationUpdateInput {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizationListParams {
    #[serde(flatten)]
    pub list: ListParams,
    /// Filter by organization name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl OrganizationListParams {
    pub fn query_fields(&self) -> QueryFields {
        let mut fields = self.list.query_fields();
        fields.push(("name", self.name.clone()));
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationUser {
    pub object: String,
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub role: OrganizationRole,
    pub created_at: String,
    pub updated_at: String,
}

pub type OrganizationUserListResponse = ListResponse<OrganizationUser>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganizationRole {
    Admin,
    Editor,
    Member,
}

impl OrganizationRole {
    pub fn as_str(self) -> &'static str {
        match self {
            OrganizationRole::Admin => "admin",
            OrganizationRole::Editor => "editor",
            OrganizationRole::Member => "member",
        }
    }
}

impl fmt::Display for OrganizationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationUserListParams {
    #[serde(flatten)]
    pub list: ListParams,
    /// Only list members holding this role
    pub role: OrganizationRole,
}

impl OrganizationUserListParams {
    pub fn query_fields(&self) -> QueryFields {
        let mut fields = self.list.query_fields();
        fields.push(("role", Some(self.role.to_string())));
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrganizationUserUpdateInput {
    pub role: OrganizationRole,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_input_omits_absent_fields() {
        let input = OrganizationUpdateInput {
            id: "org_1".to_string(),
            name: Some("Acme".to_string()),
            slug: None,
        };
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({ "id": "org_1", "name": "Acme" })
        );
    }

    #[test]
    fn organization_type_reads_from_type_field() {
        let org: Organization = serde_json::from_value(json!({
            "object": "organization",
            "id": "org_1",
            "name": "Acme",
            "slug": "acme",
            "avatar_url": null,
            "type": "pro",
            "current_billing_plan": "starter",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-02T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(org.kind, OrganizationType::Pro);
        assert!(org.avatar_url.is_none());
    }

    #[test]
    fn user_list_params_append_role_after_pagination() {
        let params = OrganizationUserListParams {
            list: ListParams {
                limit: Some(5),
                ..Default::default()
            },
            role: OrganizationRole::Editor,
        };
        let fields = params.query_fields();
        assert_eq!(fields.last(), Some(&("role", Some("editor".to_string()))));
        assert_eq!(fields[0], ("limit", Some("5".to_string())));
    }
}
