use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::{ListParams, ListResponse, QueryFields};
use crate::organization::OrganizationRole;

/// A user together with their role in every organization they belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserWithRoles {
    pub object: String,
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    /// Organization id → role
    #[serde(default)]
    pub roles: BTreeMap<String, OrganizationRole>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserUpdateInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Version of the terms of service the user accepted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_version: Option<String>,
    /// Version of the privacy policy the user accepted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_version: Option<String>,
}

/// Role granted through an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Admin,
    Member,
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MemberRole::Admin => "admin",
            MemberRole::Member => "member",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    pub object: String,
    pub id: String,
    pub organization_id: String,
    pub role: MemberRole,
    pub email: String,
    pub created_at: String,
}

pub type InvitationListResponse = ListResponse<Invitation>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InvitationCreateInput {
    pub organization_id: String,
    pub email: String,
    pub role: MemberRole,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvitationListParams {
    #[serde(flatten)]
    pub list: ListParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
}

impl InvitationListParams {
    pub fn query_fields(&self) -> QueryFields {
        let mut fields = self.list.query_fields();
        fields.push(("organization_id", self.organization_id.clone()));
        fields
    }
}

/// A personal API token. `token` carries the secret and is only present in the
/// response to the creation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiToken {
    pub object: String,
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub from_browser: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

pub type ApiTokenListResponse = ListResponse<ApiToken>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiTokenCreateInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiTokenListParams {
    #[serde(flatten)]
    pub list: ListParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ApiTokenListParams {
    pub fn query_fields(&self) -> QueryFields {
        let mut fields = self.list.query_fields();
        fields.push(("name", self.name.clone()));
        fields
    }
}
