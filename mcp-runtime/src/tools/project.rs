use edgee_core::data_collection::{IncomingDataCollectionEvent, OutgoingDataCollectionEvent};
use edgee_core::project::{
    CounterPeriod, Domain, DomainCreateInput, DomainUpdateInput, LogSeverity, Project,
    ProjectComponent,
    ProjectComponentCreateInput, ProjectComponentUpdateInput, ProjectCreateInput,
    ProjectListParams, ProjectUpdateInput, ProxySettings, ProxySettingsCreateInput,
    ProxySettingsUpdateInput,
};
use serde_json::{Map, Value, json};

use super::{
    ToolDefinition, ToolOutput, ToolResult, api_failure, arg_optional_string, component_filter,
    component_filter_properties, deleted_output, list_params, list_schema, list_text,
    object_schema, or, or_unknown, parse_input, required_string, to_pretty_json, yes_no,
};
use crate::client::ApiClient;

fn key_value_conditions_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "present": { "type": "array", "items": { "type": "string" } },
            "absent": { "type": "array", "items": { "type": "string" } },
            "values": { "type": "object" }
        }
    })
}

fn cache_rule_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "path": { "type": "string" },
            "regex": { "type": "boolean" },
            "ttl": { "type": "integer", "description": "Seconds" },
            "swr": { "type": "integer", "description": "Seconds" },
            "pass": { "type": "boolean" },
            "rank": { "type": "integer" },
            "conditions": {
                "type": "object",
                "properties": {
                    "request_cookies": key_value_conditions_schema(),
                    "request_headers": key_value_conditions_schema(),
                    "request_query_params": key_value_conditions_schema(),
                    "request_methods": { "type": "array", "items": { "type": "string" } },
                    "response_status": { "type": "array", "items": { "type": "integer" } },
                    "response_headers": key_value_conditions_schema()
                }
            }
        },
        "required": ["path"]
    })
}

fn backend_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "address": { "type": "string" },
            "enable_ssl": { "type": "boolean" },
            "check_certificate": { "type": "string" },
            "ca_certificate": { "type": "string" },
            "sni_hostname": { "type": "string" },
            "default": { "type": "boolean" },
            "override_host": { "type": "string" }
        },
        "required": ["name", "address"]
    })
}

fn route_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "path": { "type": "string" },
            "regex": { "type": "boolean" },
            "backend_name": { "type": "string" },
            "rank": { "type": "string" },
            "continent": { "type": "array", "items": { "type": "string" } },
            "region": { "type": "array", "items": { "type": "string" } },
            "country": { "type": "array", "items": { "type": "string" } }
        },
        "required": ["path", "backend_name", "rank"]
    })
}

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "edgee-listProjects",
            description: "List all projects, optionally filtered by organization.",
            input_schema: list_schema(
                json!({ "organization_id": { "type": "string" } }),
                &[],
            ),
        },
        ToolDefinition {
            name: "edgee-getProject",
            description: "Retrieve a project by ID.",
            input_schema: object_schema(
                json!({
                    "id": { "type": "string" },
                    "organization_id": { "type": "string" }
                }),
                &["id"],
            ),
        },
        ToolDefinition {
            name: "edgee-createProject",
            description: "Create a new project in an organization.",
            input_schema: object_schema(
                json!({
                    "organization_id": { "type": "string" },
                    "slug": { "type": "string" },
                    "description": { "type": "string" },
                    "external_project_url": { "type": "string" }
                }),
                &["organization_id", "slug"],
            ),
        },
        ToolDefinition {
            name: "edgee-updateProject",
            description: "Update a project and its edge settings.",
            input_schema: object_schema(
                json!({
                    "id": { "type": "string" },
                    "slug": { "type": "string" },
                    "description": { "type": "string" },
                    "external_project_url": { "type": "string" },
                    "log_severity": { "type": "string", "enum": LogSeverity::ALL },
                    "edgee_behind_proxy_cache": { "type": "boolean" },
                    "force_https": { "type": "boolean" },
                    "cache": { "type": "boolean" },
                    "override_cache": { "type": "array", "items": cache_rule_schema() },
                    "cookie_name": { "type": "string" },
                    "cookie_domain": { "type": "string" },
                    "proxy_only": { "type": "boolean" },
                    "inject_sdk": { "type": "boolean" },
                    "enforce_no_store_policy": { "type": "boolean" },
                    "trusted_ips": { "type": "array", "items": { "type": "string" } },
                    "password_protection": { "type": "boolean" },
                    "blocked_ips": { "type": "array", "items": { "type": "string" } },
                    "cookie_whitelist": { "type": "array", "items": { "type": "string" } },
                    "forwarded_headers": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": { "type": "string" },
                                "value": { "type": "string" }
                            },
                            "required": ["name", "value"]
                        }
                    }
                }),
                &["id"],
            ),
        },
        ToolDefinition {
            name: "edgee-deleteProject",
            description: "Delete a project.",
            input_schema: object_schema(json!({ "id": { "type": "string" } }), &["id"]),
        },
        ToolDefinition {
            name: "edgee-getProjectCounters",
            description: "Retrieve request and event counters for a project.",
            input_schema: object_schema(
                json!({
                    "id": { "type": "string" },
                    "month": { "type": "string", "description": "YYYY-MM" },
                    "day": { "type": "string", "description": "YYYY-MM-DD" }
                }),
                &["id"],
            ),
        },
        ToolDefinition {
            name: "edgee-getProjectComponentCounters",
            description: "Retrieve counters for one component of a project.",
            input_schema: object_schema(
                json!({
                    "id": { "type": "string" },
                    "componentId": { "type": "string" },
                    "month": { "type": "string", "description": "YYYY-MM" },
                    "day": { "type": "string", "description": "YYYY-MM-DD" }
                }),
                &["id", "componentId"],
            ),
        },
        ToolDefinition {
            name: "edgee-listProjectDomains",
            description: "List the domains attached to a project.",
            input_schema: object_schema(json!({ "id": { "type": "string" } }), &["id"]),
        },
        ToolDefinition {
            name: "edgee-getProjectDomain",
            description: "Retrieve a project domain by name.",
            input_schema: object_schema(
                json!({
                    "id": { "type": "string" },
                    "name": { "type": "string" }
                }),
                &["id", "name"],
            ),
        },
        ToolDefinition {
            name: "edgee-createProjectDomain",
            description: "Attach a domain to a project.",
            input_schema: object_schema(
                json!({
                    "id": { "type": "string" },
                    "name": { "type": "string" }
                }),
                &["id", "name"],
            ),
        },
        ToolDefinition {
            name: "edgee-updateProjectDomain",
            description: "Update the DNS and SSL status of a project domain.",
            input_schema: object_schema(
                json!({
                    "id": { "type": "string" },
                    "name": { "type": "string" },
                    "dns_status": { "type": "boolean" },
                    "ssl_status": { "type": "boolean" }
                }),
                &["id", "name"],
            ),
        },
        ToolDefinition {
            name: "edgee-deleteProjectDomain",
            description: "Remove a domain from a project.",
            input_schema: object_schema(
                json!({
                    "id": { "type": "string" },
                    "name": { "type": "string" }
                }),
                &["id", "name"],
            ),
        },
        ToolDefinition {
            name: "edgee-listProjectProxySettings",
            description: "List the proxy settings revisions of a project.",
            input_schema: object_schema(json!({ "id": { "type": "string" } }), &["id"]),
        },
        ToolDefinition {
            name: "edgee-createProjectProxySettings",
            description: "Create a new proxy settings revision for a project.",
            input_schema: object_schema(
                json!({
                    "id": { "type": "string" },
                    "description": { "type": "string" },
                    "backends": { "type": "array", "items": backend_schema() },
                    "routes": { "type": "array", "items": route_schema() }
                }),
                &["id", "description", "backends"],
            ),
        },
        ToolDefinition {
            name: "edgee-updateProjectProxySettings",
            description: "Update the description or activation of a proxy settings revision.",
            input_schema: object_schema(
                json!({
                    "id": { "type": "string" },
                    "revision": { "type": "string" },
                    "description": { "type": "string" },
                    "is_active": { "type": "boolean" }
                }),
                &["id", "revision"],
            ),
        },
        ToolDefinition {
            name: "edgee-listProjectComponents",
            description: "List the components installed on a project.",
            input_schema: object_schema(
                {
                    let mut properties = component_filter_properties();
                    properties["id"] = json!({ "type": "string" });
                    properties
                },
                &["id"],
            ),
        },
        ToolDefinition {
            name: "edgee-getProjectComponent",
            description: "Retrieve a component installed on a project.",
            input_schema: object_schema(
                json!({
                    "id": { "type": "string" },
                    "componentId": { "type": "string" }
                }),
                &["id", "componentId"],
            ),
        },
        ToolDefinition {
            name: "edgee-createProjectComponent",
            description: "Install a component version on a project.",
            input_schema: object_schema(
                json!({
                    "id": { "type": "string" },
                    "component_id": { "type": "string" },
                    "component_slug": { "type": "string" },
                    "component_version": { "type": "string" },
                    "category": { "type": "string" },
                    "subcategory": { "type": "string" },
                    "active": { "type": "boolean" },
                    "settings": { "type": "object" }
                }),
                &[
                    "id",
                    "component_id",
                    "component_slug",
                    "component_version",
                    "category",
                    "subcategory",
                ],
            ),
        },
        ToolDefinition {
            name: "edgee-updateProjectComponent",
            description: "Update the version, activation or settings of a project component.",
            input_schema: object_schema(
                json!({
                    "id": { "type": "string" },
                    "componentId": { "type": "string" },
                    "component_version": { "type": "string" },
                    "active": { "type": "boolean" },
                    "settings": { "type": "object" }
                }),
                &["id", "componentId"],
            ),
        },
        ToolDefinition {
            name: "edgee-deleteProjectComponent",
            description: "Uninstall a component from a project.",
            input_schema: object_schema(
                json!({
                    "id": { "type": "string" },
                    "componentId": { "type": "string" }
                }),
                &["id", "componentId"],
            ),
        },
        ToolDefinition {
            name: "edgee-getIncomingDataCollectionEvents",
            description: "List recent data collection events received by a project.",
            input_schema: list_schema(json!({ "id": { "type": "string" } }), &["id"]),
        },
        ToolDefinition {
            name: "edgee-getOutgoingDataCollectionEvents",
            description: "List what each component sent upstream for one incoming event.",
            input_schema: list_schema(
                json!({
                    "id": { "type": "string" },
                    "eventId": { "type": "string" }
                }),
                &["id", "eventId"],
            ),
        },
    ]
}

fn or_default(value: Option<bool>) -> String {
    value.map_or_else(|| "Default".to_string(), |v| v.to_string())
}

fn valid(status: bool) -> &'static str {
    if status { "Valid" } else { "Invalid" }
}

fn project_summary(project: &Project) -> Vec<String> {
    vec![
        format!("ID: {}", project.id),
        format!("Organization ID: {}", or_unknown(&project.organization_id)),
        format!("Description: {}", or(project.description.as_deref(), "None")),
        format!(
            "External URL: {}",
            or(project.external_project_url.as_deref(), "None")
        ),
    ]
}

fn project_timestamps(project: &Project) -> [String; 2] {
    [
        format!("Created at: {}", or_unknown(&project.created_at)),
        format!("Updated at: {}", or_unknown(&project.updated_at)),
    ]
}

fn project_settings(project: &Project) -> Vec<String> {
    let settings = &project.settings;
    let mut lines = vec![
        format!(
            "Log Severity: {}",
            settings
                .log_severity
                .as_ref()
                .map_or_else(|| "Default".to_string(), |s| s.to_string())
        ),
        format!("Force HTTPS: {}", or_default(settings.force_https)),
        format!("Cache Enabled: {}", or_default(settings.cache)),
    ];
    if let Some(rules) = &settings.override_cache {
        lines.push(format!("Override Cache Rules: {}", rules.len()));
    }
    lines.extend([
        format!("Cookie Name: {}", or(settings.cookie_name.as_deref(), "Default")),
        format!("Cookie Domain: {}", or(settings.cookie_domain.as_deref(), "None")),
        format!("Proxy Only: {}", or_default(settings.proxy_only)),
        format!("Inject SDK: {}", or_default(settings.inject_sdk)),
    ]);
    lines
}

fn project_detail(first: Vec<String>, project: &Project) -> String {
    let mut lines = first;
    lines.extend(project_summary(project));
    lines.extend(project_settings(project));
    lines.extend(project_timestamps(project));
    lines.join("\n")
}

fn domain_fields(domain: &Domain) -> Vec<String> {
    vec![
        format!("Project ID: {}", domain.project_id),
        format!("DNS Status: {}", valid(domain.dns_status)),
        format!("SSL Status: {}", valid(domain.ssl_status)),
        format!("Created at: {}", or_unknown(&domain.created_at)),
        format!("Updated at: {}", or_unknown(&domain.updated_at)),
    ]
}

fn domain_text(first: String, domain: &Domain) -> String {
    let mut lines = vec![first];
    lines.extend(domain_fields(domain));
    lines.join("\n")
}

fn proxy_settings_fields(settings: &ProxySettings) -> Vec<String> {
    vec![
        format!("Description: {}", or(Some(settings.description.as_str()), "None")),
        format!("Active: {}", yes_no(settings.is_active)),
        format!("Backends: {}", settings.backends.len()),
        format!("Routes: {}", settings.routes.len()),
    ]
}

fn proxy_settings_text(heading: &str, settings: &ProxySettings) -> String {
    let mut lines = vec![
        heading.to_string(),
        format!("Revision: {}", settings.revision),
    ];
    lines.extend(proxy_settings_fields(settings));
    lines.join("\n")
}

fn project_component_fields(component: &ProjectComponent) -> Vec<String> {
    vec![
        format!("ID: {}", or(component.id.as_deref(), "Unknown")),
        format!("Component ID: {}", component.component_id),
        format!("Version: {}", component.component_version),
        format!("Category: {}", component.category),
        format!("Subcategory: {}", component.subcategory),
        format!("Active: {}", yes_no(component.active)),
        format!(
            "Settings: {}",
            component
                .settings
                .as_ref()
                .map_or_else(|| "None".to_string(), to_pretty_json)
        ),
    ]
}

fn project_component_text(first: Vec<String>, component: &ProjectComponent) -> String {
    let mut lines = first;
    lines.extend(project_component_fields(component));
    lines.join("\n")
}

fn counter_period(args: &Map<String, Value>) -> Result<CounterPeriod, super::ToolError> {
    Ok(CounterPeriod {
        month: arg_optional_string(args, "month")?,
        day: arg_optional_string(args, "day")?,
    })
}

fn period_lines(period: &CounterPeriod) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(month) = &period.month {
        lines.push(format!("Month: {month}"));
    }
    if let Some(day) = &period.day {
        lines.push(format!("Day: {day}"));
    }
    lines
}

pub(super) async fn list_projects(client: &ApiClient, args: &Map<String, Value>) -> ToolResult {
    let params = ProjectListParams {
        list: list_params(args)?,
        organization_id: arg_optional_string(args, "organization_id")?,
    };
    let page = client
        .list_projects(&params)
        .await
        .map_err(api_failure("retrieving projects"))?;
    let text = list_text("Projects", &page, |project| {
        let mut lines = vec![format!("{}:", or_unknown(&project.slug))];
        lines.extend(project_summary(project));
        lines.extend(project_timestamps(project));
        lines
    });
    Ok(ToolOutput::new(text, &page))
}

pub(super) async fn get_project(client: &ApiClient, args: &Map<String, Value>) -> ToolResult {
    let id = required_string(args, "id")?;
    let organization_id = arg_optional_string(args, "organization_id")?;
    let project = client
        .get_project(&id, organization_id.as_deref())
        .await
        .map_err(api_failure("retrieving project"))?;
    let text = project_detail(
        vec![format!("Project: {}", or_unknown(&project.slug))],
        &project,
    );
    Ok(ToolOutput::new(text, &project))
}

pub(super) async fn create_project(client: &ApiClient, args: &Map<String, Value>) -> ToolResult {
    let input: ProjectCreateInput = parse_input(args, &[])?;
    let project = client
        .create_project(&input)
        .await
        .map_err(api_failure("creating project"))?;
    let mut lines = vec![
        "Project created successfully:".to_string(),
        format!("Slug: {}", or_unknown(&project.slug)),
    ];
    lines.extend(project_summary(&project));
    lines.extend(project_timestamps(&project));
    Ok(ToolOutput::new(lines.join("\n"), &project))
}

pub(super) async fn update_project(client: &ApiClient, args: &Map<String, Value>) -> ToolResult {
    let id = required_string(args, "id")?;
    let input: ProjectUpdateInput = parse_input(args, &[])?;
    let project = client
        .update_project(&id, &input)
        .await
        .map_err(api_failure("updating project"))?;
    let text = project_detail(
        vec![
            "Project updated successfully:".to_string(),
            format!("Slug: {}", or_unknown(&project.slug)),
        ],
        &project,
    );
    Ok(ToolOutput::new(text, &project))
}

pub(super) async fn delete_project(client: &ApiClient, args: &Map<String, Value>) -> ToolResult {
    let id = required_string(args, "id")?;
    let deleted = client
        .delete_project(&id)
        .await
        .map_err(api_failure("deleting project"))?;
    Ok(deleted_output(
        &deleted,
        format!("Project with ID {id} was successfully deleted."),
        format!("Failed to delete project with ID: {id}"),
    ))
}

pub(super) async fn get_project_counters(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    let id = required_string(args, "id")?;
    let period = counter_period(args)?;
    let counters = client
        .get_project_counters(&id, &period)
        .await
        .map_err(api_failure("retrieving project counters"))?;
    let mut lines = vec![
        format!("Project Counters for {id}:"),
        format!("Request Count: {}", counters.request_count),
        format!("Event Count: {}", counters.event_count),
    ];
    lines.extend(period_lines(&period));
    Ok(ToolOutput::new(lines.join("\n"), &counters))
}

pub(super) async fn get_project_component_counters(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    let id = required_string(args, "id")?;
    let component_id = required_string(args, "componentId")?;
    let period = counter_period(args)?;
    let counters = client
        .get_project_component_counters(&id, &component_id, &period)
        .await
        .map_err(api_failure("retrieving project component counters"))?;
    let mut lines = vec![
        format!("Component Counters for {component_id}:"),
        format!("User Count: {}", counters.user_count),
        format!("Track Count: {}", counters.track_count),
        format!("Page Count: {}", counters.page_count),
    ];
    lines.extend(period_lines(&period));
    Ok(ToolOutput::new(lines.join("\n"), &counters))
}

pub(super) async fn list_project_domains(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    let id = required_string(args, "id")?;
    let page = client
        .list_project_domains(&id)
        .await
        .map_err(api_failure("retrieving project domains"))?;
    let text = list_text(&format!("Domains for project {id}"), &page, |domain| {
        let mut lines = vec![format!("{}:", or_unknown(&domain.name))];
        lines.extend(domain_fields(domain));
        lines
    });
    Ok(ToolOutput::new(text, &page))
}

pub(super) async fn get_project_domain(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    let id = required_string(args, "id")?;
    let name = required_string(args, "name")?;
    let domain = client
        .get_project_domain(&id, &name)
        .await
        .map_err(api_failure("retrieving project domain"))?;
    let text = domain_text(format!("Domain: {}", or_unknown(&domain.name)), &domain);
    Ok(ToolOutput::new(text, &domain))
}

pub(super) async fn create_project_domain(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    let id = required_string(args, "id")?;
    let input = DomainCreateInput {
        name: required_string(args, "name")?,
    };
    let domain = client
        .create_project_domain(&id, &input)
        .await
        .map_err(api_failure("creating project domain"))?;
    let text = domain_text(
        format!("Domain created successfully:\nName: {}", domain.name),
        &domain,
    );
    Ok(ToolOutput::new(text, &domain))
}

pub(super) async fn update_project_domain(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    let id = required_string(args, "id")?;
    let name = required_string(args, "name")?;
    let input: DomainUpdateInput = parse_input(args, &["id", "name"])?;
    let domain = client
        .update_project_domain(&id, &name, &input)
        .await
        .map_err(api_failure("updating project domain"))?;
    let text = domain_text(
        format!("Domain updated successfully:\nName: {}", domain.name),
        &domain,
    );
    Ok(ToolOutput::new(text, &domain))
}

pub(super) async fn delete_project_domain(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    let id = required_string(args, "id")?;
    let name = required_string(args, "name")?;
    let deleted = client
        .delete_project_domain(&id, &name)
        .await
        .map_err(api_failure("deleting project domain"))?;
    Ok(deleted_output(
        &deleted,
        format!("Domain {name} was successfully deleted from project {id}."),
        format!("Failed to delete domain {name} from project {id}"),
    ))
}

pub(super) async fn list_project_proxy_settings(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    let id = required_string(args, "id")?;
    let page = client
        .list_project_proxy_settings(&id)
        .await
        .map_err(api_failure("retrieving project proxy settings"))?;
    let text = list_text(&format!("Proxy Settings for project {id}"), &page, |settings| {
        let mut lines = vec![format!("Revision {}:", settings.revision)];
        lines.extend(proxy_settings_fields(settings));
        lines
    });
    Ok(ToolOutput::new(text, &page))
}

pub(super) async fn create_project_proxy_settings(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    let id = required_string(args, "id")?;
    let input: ProxySettingsCreateInput = parse_input(args, &["id"])?;
    let settings = client
        .create_project_proxy_settings(&id, &input)
        .await
        .map_err(api_failure("creating project proxy settings"))?;
    Ok(ToolOutput::new(
        proxy_settings_text("Proxy settings created successfully:", &settings),
        &settings,
    ))
}

pub(super) async fn update_project_proxy_settings(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    let id = required_string(args, "id")?;
    let revision = required_string(args, "revision")?;
    let input: ProxySettingsUpdateInput = parse_input(args, &["id", "revision"])?;
    let settings = client
        .update_project_proxy_settings(&id, &revision, &input)
        .await
        .map_err(api_failure("updating project proxy settings"))?;
    Ok(ToolOutput::new(
        proxy_settings_text("Proxy settings updated successfully:", &settings),
        &settings,
    ))
}

pub(super) async fn list_project_components(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    let id = required_string(args, "id")?;
    let filter = component_filter(args)?;
    let page = client
        .list_project_components(&id, &filter)
        .await
        .map_err(api_failure("retrieving project components"))?;
    let text = list_text(&format!("Components for project {id}"), &page, |component| {
        let mut lines = vec![format!("{}:", or_unknown(&component.component_slug))];
        lines.extend(project_component_fields(component));
        lines
    });
    Ok(ToolOutput::new(text, &page))
}

pub(super) async fn get_project_component(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    let id = required_string(args, "id")?;
    let component_id = required_string(args, "componentId")?;
    let component = client
        .get_project_component(&id, &component_id)
        .await
        .map_err(api_failure("retrieving project component"))?;
    let text = project_component_text(
        vec![format!("Component: {}", or_unknown(&component.component_slug))],
        &component,
    );
    Ok(ToolOutput::new(text, &component))
}

pub(super) async fn create_project_component(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    let id = required_string(args, "id")?;
    let input: ProjectComponentCreateInput = parse_input(args, &["id"])?;
    let component = client
        .create_project_component(&id, &input)
        .await
        .map_err(api_failure("creating project component"))?;
    let text = project_component_text(
        vec![
            "Component created successfully:".to_string(),
            format!("Slug: {}", or_unknown(&component.component_slug)),
        ],
        &component,
    );
    Ok(ToolOutput::new(text, &component))
}

pub(super) async fn update_project_component(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    let id = required_string(args, "id")?;
    let component_id = required_string(args, "componentId")?;
    let input: ProjectComponentUpdateInput = parse_input(args, &["id", "componentId"])?;
    let component = client
        .update_project_component(&id, &component_id, &input)
        .await
        .map_err(api_failure("updating project component"))?;
    let text = project_component_text(
        vec![
            "Component updated successfully:".to_string(),
            format!("Slug: {}", or_unknown(&component.component_slug)),
        ],
        &component,
    );
    Ok(ToolOutput::new(text, &component))
}

pub(super) async fn delete_project_component(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    let id = required_string(args, "id")?;
    let component_id = required_string(args, "componentId")?;
    let deleted = client
        .delete_project_component(&id, &component_id)
        .await
        .map_err(api_failure("deleting project component"))?;
    Ok(deleted_output(
        &deleted,
        format!("Component {component_id} was successfully deleted from project {id}."),
        format!("Failed to delete component {component_id} from project {id}"),
    ))
}

fn incoming_event_lines(event: &IncomingDataCollectionEvent) -> Vec<String> {
    vec![
        format!("Event {}:", event.uuid),
        format!("Type: {}", event.kind.as_str()),
        format!("From: {}", event.from.as_str()),
        format!("Timestamp: {}", event.timestamp),
        format!("Data: {}", to_pretty_json(&event.data)),
    ]
}

fn outgoing_event_lines(event: &OutgoingDataCollectionEvent) -> Vec<String> {
    vec![
        format!("Event {}:", event.uuid),
        format!("Component: {}", event.component_slug),
        format!("Component ID: {}", event.component_id),
        format!("Request: {}", to_pretty_json(&event.component_request)),
        format!("Response: {}", to_pretty_json(&event.component_response)),
    ]
}

pub(super) async fn get_incoming_data_collection_events(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    let id = required_string(args, "id")?;
    let params = list_params(args)?;
    let page = client
        .get_incoming_data_collection_events(&id, &params)
        .await
        .map_err(api_failure("retrieving incoming data collection events"))?;
    let text = list_text("Incoming Data Collection Events", &page, incoming_event_lines);
    Ok(ToolOutput::new(text, &page))
}

pub(super) async fn get_outgoing_data_collection_events(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    let id = required_string(args, "id")?;
    let event_id = required_string(args, "eventId")?;
    let params = list_params(args)?;
    let page = client
        .get_outgoing_data_collection_events(&id, &event_id, &params)
        .await
        .map_err(api_failure("retrieving outgoing data collection events"))?;
    let text = list_text("Outgoing Data Collection Events", &page, outgoing_event_lines);
    Ok(ToolOutput::new(text, &page))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::call_tool;
    use super::super::testing::{args, client_for, is_error, text};
    use crate::test_support::MockApi;

    fn project_json() -> String {
        json!({
            "object": "project",
            "id": "prj_1",
            "organization_id": "org_1",
            "slug": "shop",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-02T00:00:00Z",
            "force_https": true,
            "override_cache": [{"path": "/static", "ttl": 60}]
        })
        .to_string()
    }

    #[tokio::test]
    async fn get_project_renders_settings_with_defaults() {
        let mock = MockApi::start(200, project_json()).await;
        let client = client_for(&mock);

        let result = call_tool(
            &client,
            "edgee-getProject",
            &args(json!({"id": "prj_1", "organization_id": "org_1"})),
        )
        .await;

        assert!(!is_error(&result));
        assert_eq!(
            text(&result),
            [
                "Project: shop",
                "ID: prj_1",
                "Organization ID: org_1",
                "Description: None",
                "External URL: None",
                "Log Severity: Default",
                "Force HTTPS: true",
                "Cache Enabled: Default",
                "Override Cache Rules: 1",
                "Cookie Name: Default",
                "Cookie Domain: None",
                "Proxy Only: Default",
                "Inject SDK: Default",
                "Created at: 2024-01-01T00:00:00Z",
                "Updated at: 2024-01-02T00:00:00Z",
            ]
            .join("\n")
        );
        assert_eq!(mock.last_request().query.as_deref(), Some("organization_id=org_1"));
    }

    #[tokio::test]
    async fn update_project_flattens_settings_into_body() {
        let mock = MockApi::start(200, project_json()).await;
        let client = client_for(&mock);

        let result = call_tool(
            &client,
            "edgee-updateProject",
            &args(json!({"id": "prj_1", "log_severity": "ERROR", "cache": false})),
        )
        .await;

        assert!(text(&result).starts_with("Project updated successfully:\nSlug: shop"));
        let req = mock.last_request();
        assert_eq!(req.method, "POST");
        assert_eq!(req.path, "/v1/projects/prj_1");
        assert_eq!(
            req.json_body(),
            json!({"id": "prj_1", "log_severity": "ERROR", "cache": false})
        );
    }

    #[tokio::test]
    async fn update_project_rejects_unknown_log_severity() {
        let mock = MockApi::start(200, project_json()).await;
        let client = client_for(&mock);

        let result = call_tool(
            &client,
            "edgee-updateProject",
            &args(json!({"id": "prj_1", "log_severity": "TRACE"})),
        )
        .await;

        assert!(is_error(&result));
        assert!(text(&result).starts_with("Invalid arguments:"));
        assert_eq!(result["structuredContent"]["field"], "log_severity");
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn get_project_tolerates_unknown_log_severity() {
        let mut project: serde_json::Value = serde_json::from_str(&project_json()).unwrap();
        project["log_severity"] = json!("TRACE");
        let mock = MockApi::start(200, project.to_string()).await;
        let client = client_for(&mock);

        let result = call_tool(&client, "edgee-getProject", &args(json!({"id": "prj_1"}))).await;

        assert!(!is_error(&result));
        assert!(text(&result).contains("Log Severity: TRACE"));
    }

    #[tokio::test]
    async fn counters_echo_requested_period() {
        let mock = MockApi::start(
            200,
            r#"{"object":"counters","request_count":10,"event_count":4,"project_id":"prj_1"}"#,
        )
        .await;
        let client = client_for(&mock);

        let result = call_tool(
            &client,
            "edgee-getProjectCounters",
            &args(json!({"id": "prj_1", "month": "2024-05"})),
        )
        .await;

        assert_eq!(
            text(&result),
            "Project Counters for prj_1:\nRequest Count: 10\nEvent Count: 4\nMonth: 2024-05"
        );
        let req = mock.last_request();
        assert_eq!(req.path, "/v1/projects/prj_1/counters");
        assert_eq!(req.query.as_deref(), Some("month=2024-05"));
    }

    #[tokio::test]
    async fn domain_listing_uses_valid_invalid_statuses() {
        let page = json!({
            "object": "list",
            "url": "/v1/projects/prj_1/domains",
            "has_more": false,
            "data": [{
                "object": "domain",
                "name": "shop.example.com",
                "project_id": "prj_1",
                "dns_status": true,
                "ssl_status": false,
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-01T00:00:00Z"
            }]
        });
        let mock = MockApi::start(200, page.to_string()).await;
        let client = client_for(&mock);

        let result = call_tool(
            &client,
            "edgee-listProjectDomains",
            &args(json!({"id": "prj_1"})),
        )
        .await;

        let body = text(&result);
        assert!(body.starts_with("Domains for project prj_1:\n\nshop.example.com:\n"));
        assert!(body.contains("DNS Status: Valid\nSSL Status: Invalid"));
        assert!(body.ends_with("---"));
    }

    #[tokio::test]
    async fn proxy_settings_update_addresses_revision() {
        let mock = MockApi::start(
            200,
            r#"{"object":"proxy_settings","revision":3,"description":"","is_active":true,"backends":[],"routes":[]}"#,
        )
        .await;
        let client = client_for(&mock);

        let result = call_tool(
            &client,
            "edgee-updateProjectProxySettings",
            &args(json!({"id": "prj_1", "revision": "3", "is_active": true})),
        )
        .await;

        assert_eq!(
            text(&result),
            "Proxy settings updated successfully:\nRevision: 3\nDescription: None\nActive: Yes\nBackends: 0\nRoutes: 0"
        );
        let req = mock.last_request();
        assert_eq!(req.path, "/v1/projects/prj_1/proxy-settings/3");
        assert_eq!(req.json_body(), json!({"is_active": true}));
    }

    #[tokio::test]
    async fn project_component_update_strips_path_arguments() {
        let mock = MockApi::start(
            200,
            json!({
                "id": "pc_1",
                "component_id": "cmp_1",
                "component_slug": "edgee/ga",
                "component_version": "1.2.0",
                "category": "data_collection",
                "subcategory": "analytics",
                "active": true
            })
            .to_string(),
        )
        .await;
        let client = client_for(&mock);

        let result = call_tool(
            &client,
            "edgee-updateProjectComponent",
            &args(json!({"id": "prj_1", "componentId": "cmp_1", "component_version": "1.2.0"})),
        )
        .await;

        assert!(text(&result).contains("Version: 1.2.0\n"));
        assert!(text(&result).ends_with("Settings: None"));
        let req = mock.last_request();
        assert_eq!(req.path, "/v1/projects/prj_1/components/cmp_1");
        assert_eq!(req.json_body(), json!({"component_version": "1.2.0"}));
    }

    #[tokio::test]
    async fn outgoing_events_render_request_and_response() {
        let page = json!({
            "object": "list",
            "url": "/v1/projects/prj_1/outgoing-events",
            "has_more": false,
            "data": [{
                "object": "outgoing_event",
                "uuid": "evt_9",
                "component_id": "cmp_1",
                "component_slug": "edgee/ga",
                "component_request": {"method": "POST"},
                "component_response": {"status": 204}
            }]
        });
        let mock = MockApi::start(200, page.to_string()).await;
        let client = client_for(&mock);

        let result = call_tool(
            &client,
            "edgee-getOutgoingDataCollectionEvents",
            &args(json!({"id": "prj_1", "eventId": "evt_9", "limit": 5})),
        )
        .await;

        let body = text(&result);
        assert!(body.starts_with("Outgoing Data Collection Events:\n\nEvent evt_9:"));
        assert!(body.contains("\"status\": 204"));
        assert_eq!(mock.last_request().query.as_deref(), Some("limit=5"));
    }
}
