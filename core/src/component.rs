use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::common::{ListResponse, QueryFields};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub object: String,
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub category: String,
    pub subcategory: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<String>,
    /// Keyed by version string
    #[serde(default)]
    pub versions: BTreeMap<String, ComponentVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_link: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_archived: bool,
}

pub type ComponentListResponse = ListResponse<Component>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentVersion {
    pub object: String,
    pub version: String,
    pub wit_world_version: String,
    pub wasm_url: String,
    #[serde(default)]
    pub dynamic_fields: Vec<ConfigurationField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog: Option<String>,
    pub created_at: String,
}

/// A setting a project must (or may) provide when installing the component,
/// as the API returns it. Keys beyond the documented ones are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationField {
    pub name: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A configuration field declared when publishing a component version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigurationFieldInput {
    pub name: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: FieldType,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Bool,
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentCategory {
    DataCollection,
    ConsentManagement,
}

impl ComponentCategory {
    pub const ALL: [&'static str; 2] = ["data_collection", "consent_management"];

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentCategory::DataCollection => "data_collection",
            ComponentCategory::ConsentManagement => "consent_management",
        }
    }
}

impl fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentSubcategory {
    #[serde(rename = "analytics")]
    Analytics,
    #[serde(rename = "warehouse")]
    Warehouse,
    #[serde(rename = "attribution")]
    Attribution,
    #[serde(rename = "conversion api")]
    ConversionApi,
    #[serde(rename = "consent_mapping")]
    ConsentMapping,
}

impl ComponentSubcategory {
    pub const ALL: [&'static str; 5] = [
        "analytics",
        "warehouse",
        "attribution",
        "conversion api",
        "consent_mapping",
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentSubcategory::Analytics => "analytics",
            ComponentSubcategory::Warehouse => "warehouse",
            ComponentSubcategory::Attribution => "attribution",
            ComponentSubcategory::ConversionApi => "conversion api",
            ComponentSubcategory::ConsentMapping => "consent_mapping",
        }
    }
}

impl fmt::Display for ComponentSubcategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional category filter shared by the component list endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ComponentCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<ComponentSubcategory>,
}

impl ComponentFilter {
    pub fn query_fields(&self) -> QueryFields {
        vec![
            ("category", self.category.map(|c| c.to_string())),
            ("subcategory", self.subcategory.map(|s| s.to_string())),
        ]
    }
}

/// How a component is addressed: by its UUID, or by the slug of its owning
/// organization plus its own slug. Both resolve to the same resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentRef {
    Id(Uuid),
    Slug {
        organization: String,
        component: String,
    },
}

impl ComponentRef {
    pub fn slug(organization: impl Into<String>, component: impl Into<String>) -> Self {
        ComponentRef::Slug {
            organization: organization.into(),
            component: component.into(),
        }
    }

    /// Path segments following `/v1/components`.
    pub fn segments(&self) -> Vec<String> {
        match self {
            ComponentRef::Id(id) => vec![id.to_string()],
            ComponentRef::Slug {
                organization,
                component,
            } => vec![organization.clone(), component.clone()],
        }
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentRef::Id(id) => write!(f, "{id}"),
            ComponentRef::Slug {
                organization,
                component,
            } => write!(f, "{organization}/{component}"),
        }
    }
}

impl From<Uuid> for ComponentRef {
    fn from(id: Uuid) -> Self {
        ComponentRef::Id(id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentCreateInput {
    pub organization_id: String,
    pub name: String,
    pub slug: String,
    pub category: ComponentCategory,
    pub subcategory: ComponentSubcategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentUpdateInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentVersionCreateInput {
    pub version: String,
    pub wit_version: String,
    pub wasm_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_fields: Option<Vec<ConfigurationFieldInput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentVersionUpdateInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog: Option<String>,
}
