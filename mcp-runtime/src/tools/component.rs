use edgee_core::component::{
    Component, ComponentCreateInput, ComponentRef, ComponentUpdateInput, ComponentVersion,
    ComponentVersionCreateInput, ComponentVersionUpdateInput,
};
use serde_json::{Map, Value, json};

use super::{
    ToolDefinition, ToolError, ToolOutput, ToolResult, api_failure, component_filter,
    component_filter_properties, deleted_output, list_text, object_schema, or, or_unknown,
    parse_input, parse_uuid_string, required_string, to_pretty_json, yes_no,
};
use crate::client::ApiClient;

const UUID_KEYS: [&str; 1] = ["id"];
const SLUG_KEYS: [&str; 2] = ["orgSlug", "componentSlug"];

fn by_uuid(args: &Map<String, Value>) -> Result<ComponentRef, ToolError> {
    let id = required_string(args, "id")?;
    Ok(ComponentRef::Id(parse_uuid_string(&id, "id")?))
}

fn by_slug(args: &Map<String, Value>) -> Result<ComponentRef, ToolError> {
    Ok(ComponentRef::slug(
        required_string(args, "orgSlug")?,
        required_string(args, "componentSlug")?,
    ))
}

/// Adds the addressing arguments to a body schema.
fn addressed(keys: &[&str], mut properties: Value, required: &[&str]) -> Value {
    for key in keys {
        let schema = match *key {
            "id" => json!({ "type": "string", "format": "uuid", "description": "Component UUID" }),
            "orgSlug" => json!({ "type": "string", "description": "Organization slug" }),
            "componentSlug" => json!({ "type": "string", "description": "Component slug" }),
            _ => continue,
        };
        properties[*key] = schema;
    }
    let required: Vec<&str> = keys.iter().chain(required).copied().collect();
    object_schema(properties, &required)
}

fn update_properties() -> Value {
    json!({
        "name": { "type": "string" },
        "description": { "type": "string" },
        "documentation_link": { "type": "string" },
        "repo_link": { "type": "string" },
        "avatar_url": { "type": "string" },
        "is_archived": { "type": "boolean" },
        "public": { "type": "boolean" }
    })
}

fn version_properties() -> Value {
    json!({
        "version": { "type": "string" },
        "wit_version": { "type": "string" },
        "wasm_url": { "type": "string" },
        "changelog": { "type": "string" },
        "dynamic_fields": {
            "type": "array",
            "items": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "title": { "type": "string" },
                    "type": { "type": "string", "enum": ["string", "bool", "number"] },
                    "required": { "type": "boolean" },
                    "description": { "type": "string" }
                },
                "required": ["name", "title", "type", "required"]
            }
        }
    })
}

const VERSION_REQUIRED: [&str; 3] = ["version", "wit_version", "wasm_url"];

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "edgee-listPublicComponents",
            description: "List the components published in the public registry.",
            input_schema: object_schema(component_filter_properties(), &[]),
        },
        ToolDefinition {
            name: "edgee-listOrganizationComponents",
            description: "List the components owned by an organization.",
            input_schema: object_schema(
                {
                    let mut properties = component_filter_properties();
                    properties["id"] =
                        json!({ "type": "string", "description": "Organization ID" });
                    properties
                },
                &["id"],
            ),
        },
        ToolDefinition {
            name: "edgee-getComponentByUuid",
            description: "Retrieve a component by UUID, including its versions.",
            input_schema: addressed(&UUID_KEYS, json!({}), &[]),
        },
        ToolDefinition {
            name: "edgee-getComponentBySlug",
            description: "Retrieve a component by organization and component slug, including its versions.",
            input_schema: addressed(&SLUG_KEYS, json!({}), &[]),
        },
        ToolDefinition {
            name: "edgee-createComponent",
            description: "Create a new component in an organization.",
            input_schema: object_schema(
                {
                    let mut properties = update_properties();
                    if let Some(map) = properties.as_object_mut() {
                        map.remove("is_archived");
                    }
                    let filter = component_filter_properties();
                    properties["organization_id"] = json!({ "type": "string" });
                    properties["slug"] = json!({ "type": "string" });
                    properties["category"] = filter["category"].clone();
                    properties["subcategory"] = filter["subcategory"].clone();
                    properties
                },
                &["organization_id", "name", "slug", "category", "subcategory"],
            ),
        },
        ToolDefinition {
            name: "edgee-updateComponentByUuid",
            description: "Update a component addressed by UUID.",
            input_schema: addressed(&UUID_KEYS, update_properties(), &[]),
        },
        ToolDefinition {
            name: "edgee-updateComponentBySlug",
            description: "Update a component addressed by slug.",
            input_schema: addressed(&SLUG_KEYS, update_properties(), &[]),
        },
        ToolDefinition {
            name: "edgee-deleteComponentByUuid",
            description: "Delete a component addressed by UUID.",
            input_schema: addressed(&UUID_KEYS, json!({}), &[]),
        },
        ToolDefinition {
            name: "edgee-deleteComponentBySlug",
            description: "Delete a component addressed by slug.",
            input_schema: addressed(&SLUG_KEYS, json!({}), &[]),
        },
        ToolDefinition {
            name: "edgee-createComponentVersion",
            description: "Publish a new version of a component addressed by UUID.",
            input_schema: addressed(&UUID_KEYS, version_properties(), &VERSION_REQUIRED),
        },
        ToolDefinition {
            name: "edgee-createComponentVersionBySlug",
            description: "Publish a new version of a component addressed by slug.",
            input_schema: addressed(&SLUG_KEYS, version_properties(), &VERSION_REQUIRED),
        },
        ToolDefinition {
            name: "edgee-updateComponentVersionBySlug",
            description: "Update the changelog of a component version.",
            input_schema: addressed(
                &["orgSlug", "componentSlug", "versionId"],
                json!({
                    "versionId": { "type": "string", "description": "Version string, e.g. 1.2.0" },
                    "changelog": { "type": "string" }
                }),
                &[],
            ),
        },
    ]
}

fn summary_lines(component: &Component) -> Vec<String> {
    vec![
        format!("ID: {}", component.id),
        format!("Slug: {}", or_unknown(&component.slug)),
        format!("Category: {}", or_unknown(&component.category)),
        format!("Subcategory: {}", or_unknown(&component.subcategory)),
        format!("Description: {}", or(component.description.as_deref(), "None")),
    ]
}

fn link_lines(component: &Component) -> [String; 2] {
    [
        format!("Repository Link: {}", or(component.repo_link.as_deref(), "None")),
        format!(
            "Documentation Link: {}",
            or(component.documentation_link.as_deref(), "None")
        ),
    ]
}

fn timestamps(component: &Component) -> [String; 2] {
    [
        format!("Created at: {}", or_unknown(&component.created_at)),
        format!("Updated at: {}", or_unknown(&component.updated_at)),
    ]
}

fn latest_version(component: &Component) -> String {
    format!(
        "Latest Version: {}",
        or(component.latest_version.as_deref(), "None")
    )
}

fn listing_lines(component: &Component) -> Vec<String> {
    let mut lines = vec![format!("{}:", or_unknown(&component.name))];
    lines.extend(summary_lines(component));
    lines.push(latest_version(component));
    lines.push(format!("Public: {}", yes_no(component.is_public)));
    lines.push(format!("Archived: {}", yes_no(component.is_archived)));
    lines.extend(timestamps(component));
    lines
}

fn version_lines(version: &ComponentVersion) -> Vec<String> {
    let dynamic_fields = if version.dynamic_fields.is_empty() {
        "None".to_string()
    } else {
        to_pretty_json(&version.dynamic_fields)
    };
    vec![
        format!("Version: {}", version.version),
        format!("WIT World Version: {}", or_unknown(&version.wit_world_version)),
        format!("WASM URL: {}", or_unknown(&version.wasm_url)),
        format!("Created at: {}", or_unknown(&version.created_at)),
        format!("Changelog: {}", or(version.changelog.as_deref(), "None")),
        format!("Dynamic Fields: {dynamic_fields}"),
    ]
}

fn component_detail(component: &Component) -> String {
    let mut lines = vec![format!("Component: {}", or_unknown(&component.name))];
    lines.extend(summary_lines(component));
    lines.push(latest_version(component));
    lines.extend(link_lines(component));
    lines.push(format!("Public: {}", yes_no(component.is_public)));
    lines.push(format!("Archived: {}", yes_no(component.is_archived)));
    lines.extend(timestamps(component));
    let mut text = lines.join("\n");

    if !component.versions.is_empty() {
        let versions: Vec<String> = component
            .versions
            .values()
            .map(|version| version_lines(version).join("\n  "))
            .collect();
        text.push_str("\n\nVersions:\n  ");
        text.push_str(&versions.join("\n  ---\n  "));
    }
    text
}

fn changed_component_text(heading: &str, component: &Component, archived: bool) -> String {
    let mut lines = vec![
        heading.to_string(),
        format!("Name: {}", or_unknown(&component.name)),
    ];
    lines.extend(summary_lines(component));
    lines.extend(link_lines(component));
    lines.push(format!("Public: {}", yes_no(component.is_public)));
    if archived {
        lines.push(format!("Archived: {}", yes_no(component.is_archived)));
    }
    lines.extend(timestamps(component));
    lines.join("\n")
}

fn version_text(heading: &str, version: &ComponentVersion) -> String {
    let mut lines = vec![heading.to_string()];
    lines.extend(version_lines(version));
    lines.join("\n")
}

pub(super) async fn list_public_components(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    let filter = component_filter(args)?;
    let page = client
        .list_public_components(&filter)
        .await
        .map_err(api_failure("retrieving public components"))?;
    Ok(ToolOutput::new(
        list_text("Public Components", &page, listing_lines),
        &page,
    ))
}

pub(super) async fn list_organization_components(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    let id = required_string(args, "id")?;
    let filter = component_filter(args)?;
    let page = client
        .list_organization_components(&id, &filter)
        .await
        .map_err(api_failure("retrieving organization components"))?;
    Ok(ToolOutput::new(
        list_text(&format!("Components for organization {id}"), &page, listing_lines),
        &page,
    ))
}

async fn get_component(client: &ApiClient, component: ComponentRef) -> ToolResult {
    let found = client
        .get_component(&component)
        .await
        .map_err(api_failure("retrieving component"))?;
    Ok(ToolOutput::new(component_detail(&found), &found))
}

pub(super) async fn get_component_by_uuid(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    get_component(client, by_uuid(args)?).await
}

pub(super) async fn get_component_by_slug(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    get_component(client, by_slug(args)?).await
}

pub(super) async fn create_component(client: &ApiClient, args: &Map<String, Value>) -> ToolResult {
    let input: ComponentCreateInput = parse_input(args, &[])?;
    let component = client
        .create_component(&input)
        .await
        .map_err(api_failure("creating component"))?;
    Ok(ToolOutput::new(
        changed_component_text("Component created successfully:", &component, false),
        &component,
    ))
}

async fn update_component(
    client: &ApiClient,
    component: ComponentRef,
    args: &Map<String, Value>,
    path_keys: &[&str],
) -> ToolResult {
    let input: ComponentUpdateInput = parse_input(args, path_keys)?;
    let updated = client
        .update_component(&component, &input)
        .await
        .map_err(api_failure("updating component"))?;
    Ok(ToolOutput::new(
        changed_component_text("Component updated successfully:", &updated, true),
        &updated,
    ))
}

pub(super) async fn update_component_by_uuid(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    update_component(client, by_uuid(args)?, args, &UUID_KEYS).await
}

pub(super) async fn update_component_by_slug(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    update_component(client, by_slug(args)?, args, &SLUG_KEYS).await
}

async fn delete_component(
    client: &ApiClient,
    component: ComponentRef,
    label: String,
) -> ToolResult {
    let deleted = client
        .delete_component(&component)
        .await
        .map_err(api_failure("deleting component"))?;
    Ok(deleted_output(
        &deleted,
        format!("Component {label} was successfully deleted."),
        format!("Failed to delete component {label}"),
    ))
}

pub(super) async fn delete_component_by_uuid(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    let component = by_uuid(args)?;
    let label = format!("with ID {component}");
    delete_component(client, component, label).await
}

pub(super) async fn delete_component_by_slug(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    let component = by_slug(args)?;
    let label = component.to_string();
    delete_component(client, component, label).await
}

async fn create_component_version(
    client: &ApiClient,
    component: ComponentRef,
    args: &Map<String, Value>,
    path_keys: &[&str],
) -> ToolResult {
    let input: ComponentVersionCreateInput = parse_input(args, path_keys)?;
    let version = client
        .create_component_version(&component, &input)
        .await
        .map_err(api_failure("creating component version"))?;
    Ok(ToolOutput::new(
        version_text("Component version created successfully:", &version),
        &version,
    ))
}

pub(super) async fn create_component_version_by_uuid(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    create_component_version(client, by_uuid(args)?, args, &UUID_KEYS).await
}

pub(super) async fn create_component_version_by_slug(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    create_component_version(client, by_slug(args)?, args, &SLUG_KEYS).await
}

pub(super) async fn update_component_version_by_slug(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    let component = by_slug(args)?;
    let version_id = required_string(args, "versionId")?;
    let input: ComponentVersionUpdateInput =
        parse_input(args, &["orgSlug", "componentSlug", "versionId"])?;
    let version = client
        .update_component_version(&component, &version_id, &input)
        .await
        .map_err(api_failure("updating component version"))?;
    Ok(ToolOutput::new(
        version_text("Component version updated successfully:", &version),
        &version,
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::call_tool;
    use super::super::testing::{args, client_for, is_error, text};
    use crate::test_support::MockApi;

    const COMPONENT_ID: &str = "3f2b8f1e-6c1a-4d3b-9a57-0f4f3c1d2e10";

    fn component_json() -> String {
        json!({
            "object": "component",
            "id": COMPONENT_ID,
            "name": "Google Analytics",
            "slug": "google-analytics",
            "category": "data_collection",
            "subcategory": "analytics",
            "latest_version": "1.0.0",
            "versions": {
                "1.0.0": {
                    "object": "component_version",
                    "version": "1.0.0",
                    "wit_world_version": "0.5.0",
                    "wasm_url": "https://cdn.example.com/ga.wasm",
                    "dynamic_fields": [],
                    "created_at": "2024-01-01T00:00:00Z"
                }
            },
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z",
            "is_public": true,
            "is_archived": false
        })
        .to_string()
    }

    #[tokio::test]
    async fn uuid_and_slug_tools_render_identically() {
        let mock = MockApi::start(200, component_json()).await;
        let client = client_for(&mock);

        let by_uuid = call_tool(
            &client,
            "edgee-getComponentByUuid",
            &args(json!({"id": COMPONENT_ID})),
        )
        .await;
        let by_slug = call_tool(
            &client,
            "edgee-getComponentBySlug",
            &args(json!({"orgSlug": "edgee", "componentSlug": "google-analytics"})),
        )
        .await;

        assert_eq!(text(&by_uuid), text(&by_slug));
        assert!(text(&by_uuid).starts_with("Component: Google Analytics\nID: "));
        assert!(text(&by_uuid).contains(
            "\n\nVersions:\n  Version: 1.0.0\n  WIT World Version: 0.5.0\n  WASM URL: https://cdn.example.com/ga.wasm"
        ));
        assert!(text(&by_uuid).ends_with("Dynamic Fields: None"));
        let requests = mock.requests();
        assert_eq!(requests[0].path, format!("/v1/components/{COMPONENT_ID}"));
        assert_eq!(requests[1].path, "/v1/components/edgee/google-analytics");
    }

    #[tokio::test]
    async fn malformed_uuid_is_rejected_before_any_request() {
        let mock = MockApi::start(200, component_json()).await;
        let client = client_for(&mock);

        let result = call_tool(
            &client,
            "edgee-getComponentByUuid",
            &args(json!({"id": "not-a-uuid"})),
        )
        .await;

        assert!(is_error(&result));
        assert_eq!(text(&result), "Invalid arguments: 'id' must be a valid UUID");
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn update_by_slug_puts_body_without_slugs() {
        let mock = MockApi::start(200, component_json()).await;
        let client = client_for(&mock);

        let result = call_tool(
            &client,
            "edgee-updateComponentBySlug",
            &args(json!({
                "orgSlug": "edgee",
                "componentSlug": "google-analytics",
                "is_archived": true
            })),
        )
        .await;

        assert!(
            text(&result).starts_with("Component updated successfully:\nName: Google Analytics")
        );
        let req = mock.last_request();
        assert_eq!(req.method, "PUT");
        assert_eq!(req.json_body(), json!({"is_archived": true}));
    }

    #[tokio::test]
    async fn create_component_rejects_unknown_subcategory() {
        let mock = MockApi::start(200, component_json()).await;
        let client = client_for(&mock);

        let result = call_tool(
            &client,
            "edgee-createComponent",
            &args(json!({
                "organization_id": "org_1",
                "name": "Pixel",
                "slug": "pixel",
                "category": "data_collection",
                "subcategory": "pixels"
            })),
        )
        .await;

        assert!(is_error(&result));
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn version_update_targets_version_path() {
        let mock = MockApi::start(
            200,
            r#"{"object":"component_version","version":"1.0.0","wit_world_version":"0.5.0","wasm_url":"https://cdn.example.com/ga.wasm","dynamic_fields":[],"changelog":"Fixes","created_at":"2024-01-01T00:00:00Z"}"#,
        )
        .await;
        let client = client_for(&mock);

        let result = call_tool(
            &client,
            "edgee-updateComponentVersionBySlug",
            &args(json!({
                "orgSlug": "edgee",
                "componentSlug": "google-analytics",
                "versionId": "1.0.0",
                "changelog": "Fixes"
            })),
        )
        .await;

        assert!(text(&result).contains("Changelog: Fixes"));
        let req = mock.last_request();
        assert_eq!(req.method, "PUT");
        assert_eq!(req.path, "/v1/components/edgee/google-analytics/versions/1.0.0");
        assert_eq!(req.json_body(), json!({"changelog": "Fixes"}));
    }

    #[tokio::test]
    async fn delete_by_slug_names_the_component() {
        let mock = MockApi::start(200, r#"{"object":"component","id":"x","deleted":true}"#).await;
        let client = client_for(&mock);

        let result = call_tool(
            &client,
            "edgee-deleteComponentBySlug",
            &args(json!({"orgSlug": "edgee", "componentSlug": "old"})),
        )
        .await;

        assert_eq!(text(&result), "Component edgee/old was successfully deleted.");
    }
}
