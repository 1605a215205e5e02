use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::{ListParams, ListResponse, QueryFields};

/// A project with its edge settings flattened in, as the API returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub object: String,
    pub id: String,
    pub organization_id: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_project_url: Option<String>,
    #[serde(flatten)]
    pub settings: ProjectSettings,
}

pub type ProjectListResponse = ListResponse<Project>;

/// Edge behaviour of a project. Every field is optional: absent means the
/// platform default applies (on read) or the value is left unchanged (on update).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_severity: Option<LogSeverity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edgee_behind_proxy_cache: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_https: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_cache: Option<Vec<CacheRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inject_sdk: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforce_no_store_policy: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trusted_ips: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_protection: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_ips: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie_whitelist: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forwarded_headers: Option<Vec<ForwardedHeader>>,
}

/// Project log level. Levels the API adds later are kept as `Other` so that
/// reading a project never fails on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LogSeverity {
    Debug,
    Info,
    Warning,
    Error,
    Other(String),
}

impl LogSeverity {
    pub const ALL: [&'static str; 4] = ["DEBUG", "INFO", "WARNING", "ERROR"];

    pub fn as_str(&self) -> &str {
        match self {
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO",
            LogSeverity::Warning => "WARNING",
            LogSeverity::Error => "ERROR",
            LogSeverity::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, LogSeverity::Other(_))
    }
}

impl From<String> for LogSeverity {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "DEBUG" => LogSeverity::Debug,
            "INFO" => LogSeverity::Info,
            "WARNING" => LogSeverity::Warning,
            "ERROR" => LogSeverity::Error,
            _ => LogSeverity::Other(raw),
        }
    }
}

impl From<LogSeverity> for String {
    fn from(severity: LogSeverity) -> Self {
        match severity {
            LogSeverity::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for LogSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardedHeader {
    pub name: String,
    pub value: String,
}

/// Cache override applied to requests whose path matches `path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRule {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<bool>,
    /// Seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
    /// Stale-while-revalidate window, seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swr: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<CacheConditions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheConditions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_cookies: Option<KeyValueConditions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_headers: Option<KeyValueConditions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_query_params: Option<KeyValueConditions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_methods: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_status: Option<Vec<u16>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_headers: Option<KeyValueConditions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyValueConditions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub present: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absent: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectCreateInput {
    pub organization_id: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_project_url: Option<String>,
}

/// The API expects the id inside the body as well as in the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectUpdateInput {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_project_url: Option<String>,
    #[serde(flatten)]
    pub settings: ProjectSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectListParams {
    #[serde(flatten)]
    pub list: ListParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
}

impl ProjectListParams {
    pub fn query_fields(&self) -> QueryFields {
        let mut fields = self.list.query_fields();
        fields.push(("organization_id", self.organization_id.clone()));
        fields
    }
}

/// Counter period: `month` and `day` narrow the window, both optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CounterPeriod {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
}

impl CounterPeriod {
    pub fn query_fields(&self) -> QueryFields {
        vec![("month", self.month.clone()), ("day", self.day.clone())]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectCounters {
    pub object: String,
    pub request_count: u64,
    pub event_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    pub project_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectComponentCounters {
    pub object: String,
    pub user_count: u64,
    pub track_count: u64,
    pub page_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    pub project_id: String,
    pub component_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub object: String,
    pub name: String,
    pub project_id: String,
    pub dns_status: bool,
    pub ssl_status: bool,
    pub created_at: String,
    pub updated_at: String,
}

pub type DomainListResponse = ListResponse<Domain>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomainCreateInput {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomainUpdateInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_status: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_status: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxySettingsBackend {
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_ssl: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_certificate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_certificate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sni_hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_host: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxySettingsRoute {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<bool>,
    pub backend_name: String,
    pub rank: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continent: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<Vec<String>>,
}

/// One revision of a project's proxy configuration. Exactly one revision is
/// active at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxySettings {
    pub object: String,
    pub revision: u64,
    #[serde(default)]
    pub description: String,
    pub is_active: bool,
    #[serde(default)]
    pub backends: Vec<ProxySettingsBackend>,
    #[serde(default)]
    pub routes: Vec<ProxySettingsRoute>,
}

pub type ProxySettingsListResponse = ListResponse<ProxySettings>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProxySettingsCreateInput {
    pub description: String,
    pub backends: Vec<ProxySettingsBackend>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routes: Option<Vec<ProxySettingsRoute>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProxySettingsUpdateInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// A component installed on a project, pinned to one version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectComponent {
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    pub component_id: String,
    pub component_slug: String,
    pub component_version: String,
    pub category: String,
    pub subcategory: String,
    #[serde(default)]
    pub active: bool,
    /// Component-specific configuration; shape is defined by the component's
    /// dynamic fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<BTreeMap<String, Value>>,
}

pub type ProjectComponentListResponse = ListResponse<ProjectComponent>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectComponentCreateInput {
    pub component_id: String,
    pub component_slug: String,
    pub component_version: String,
    pub category: String,
    pub subcategory: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectComponentUpdateInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<BTreeMap<String, Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn project_settings_flatten_on_read() {
        let project: Project = serde_json::from_value(json!({
            "object": "project",
            "id": "prj_1",
            "organization_id": "org_1",
            "slug": "shop",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z",
            "log_severity": "WARNING",
            "force_https": true,
            "override_cache": [{ "path": "/static", "ttl": 3600 }]
        }))
        .unwrap();
        assert_eq!(project.settings.log_severity, Some(LogSeverity::Warning));
        assert_eq!(project.settings.force_https, Some(true));
        assert_eq!(project.settings.override_cache.unwrap()[0].ttl, Some(3600));
        assert!(project.description.is_none());
    }

    #[test]
    fn unknown_log_severity_is_kept_verbatim() {
        let settings: ProjectSettings =
            serde_json::from_value(json!({ "log_severity": "TRACE" })).unwrap();
        let severity = settings.log_severity.unwrap();
        assert_eq!(severity, LogSeverity::Other("TRACE".to_string()));
        assert!(!severity.is_known());
        assert_eq!(serde_json::to_value(&severity).unwrap(), json!("TRACE"));
    }

    #[test]
    fn project_update_input_serializes_only_present_fields() {
        let input = ProjectUpdateInput {
            id: "prj_1".to_string(),
            slug: None,
            description: Some("new".to_string()),
            external_project_url: None,
            settings: ProjectSettings {
                cache: Some(false),
                ..Default::default()
            },
        };
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({ "id": "prj_1", "description": "new", "cache": false })
        );
    }

    #[test]
    fn counter_period_query_fields() {
        let period = CounterPeriod {
            month: Some("2024-05".to_string()),
            day: None,
        };
        assert_eq!(
            period.query_fields(),
            vec![("month", Some("2024-05".to_string())), ("day", None)]
        );
    }
}
