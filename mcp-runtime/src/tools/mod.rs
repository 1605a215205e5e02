//! Tool registry: the MCP tools exposed over the endpoint catalog.
//!
//! `tool_definitions` is the table served by `tools/list`; `call_tool`
//! validates arguments against it, runs the matching catalog method and
//! renders the outcome as an MCP tool result. Tool failures never become
//! JSON-RPC errors; they come back as results flagged `isError`.

mod component;
mod organization;
mod project;
mod user;

use std::sync::LazyLock;

use edgee_core::component::{ComponentCategory, ComponentFilter, ComponentSubcategory};
use edgee_core::{DeletedResponse, ListParams, ListResponse};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::client::{ApiClient, ApiError};
use crate::credentials::TOKEN_ENV;

#[derive(Debug)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

static TOOL_DEFINITIONS: LazyLock<Vec<ToolDefinition>> = LazyLock::new(|| {
    let mut tools = organization::definitions();
    tools.extend(project::definitions());
    tools.extend(component::definitions());
    tools.extend(user::definitions());
    tools
});

pub fn tool_definitions() -> &'static [ToolDefinition] {
    &TOOL_DEFINITIONS
}

/// Runs one tool and returns the MCP `tools/call` result object.
pub async fn call_tool(client: &ApiClient, name: &str, args: &Map<String, Value>) -> Value {
    let outcome = match tool_definitions().iter().find(|tool| tool.name == name) {
        None => Err(ToolFailure::Invalid(
            ToolError::new("unknown_tool", format!("Unknown tool: {name}"))
                .with_field("name")
                .with_docs_hint("Call tools/list for the available tool names."),
        )),
        Some(tool) => match check_arguments(&tool.input_schema, args) {
            Ok(()) => execute_tool(client, name, args).await,
            Err(err) => Err(ToolFailure::Invalid(err)),
        },
    };

    match outcome {
        Ok(output) => {
            tracing::debug!(tool = name, is_error = output.is_error, "tool call finished");
            output.into_response()
        }
        Err(failure) => {
            tracing::warn!(tool = name, error = %failure.summary(), "tool call failed");
            failure.into_response()
        }
    }
}

async fn execute_tool(client: &ApiClient, name: &str, args: &Map<String, Value>) -> ToolResult {
    match name {
        "edgee-listOrganizations" => organization::list_organizations(client, args).await,
        "edgee-getMyOrganization" => organization::get_my_organization(client, args).await,
        "edgee-getOrganization" => organization::get_organization(client, args).await,
        "edgee-createOrganization" => organization::create_organization(client, args).await,
        "edgee-updateOrganization" => organization::update_organization(client, args).await,
        "edgee-deleteOrganization" => organization::delete_organization(client, args).await,
        "edgee-listOrganizationUsers" => {
            organization::list_organization_users(client, args).await
        }
        "edgee-updateOrganizationUser" => {
            organization::update_organization_user(client, args).await
        }
        "edgee-deleteOrganizationUser" => {
            organization::delete_organization_user(client, args).await
        }

        "edgee-listProjects" => project::list_projects(client, args).await,
        "edgee-getProject" => project::get_project(client, args).await,
        "edgee-createProject" => project::create_project(client, args).await,
        "edgee-updateProject" => project::update_project(client, args).await,
        "edgee-deleteProject" => project::delete_project(client, args).await,
        "edgee-getProjectCounters" => project::get_project_counters(client, args).await,
        "edgee-getProjectComponentCounters" => {
            project::get_project_component_counters(client, args).await
        }
        "edgee-listProjectDomains" => project::list_project_domains(client, args).await,
        "edgee-getProjectDomain" => project::get_project_domain(client, args).await,
        "edgee-createProjectDomain" => project::create_project_domain(client, args).await,
        "edgee-updateProjectDomain" => project::update_project_domain(client, args).await,
        "edgee-deleteProjectDomain" => project::delete_project_domain(client, args).await,
        "edgee-listProjectProxySettings" => {
            project::list_project_proxy_settings(client, args).await
        }
        "edgee-createProjectProxySettings" => {
            project::create_project_proxy_settings(client, args).await
        }
        "edgee-updateProjectProxySettings" => {
            project::update_project_proxy_settings(client, args).await
        }
        "edgee-listProjectComponents" => project::list_project_components(client, args).await,
        "edgee-getProjectComponent" => project::get_project_component(client, args).await,
        "edgee-createProjectComponent" => project::create_project_component(client, args).await,
        "edgee-updateProjectComponent" => project::update_project_component(client, args).await,
        "edgee-deleteProjectComponent" => project::delete_project_component(client, args).await,
        "edgee-getIncomingDataCollectionEvents" => {
            project::get_incoming_data_collection_events(client, args).await
        }
        "edgee-getOutgoingDataCollectionEvents" => {
            project::get_outgoing_data_collection_events(client, args).await
        }

        "edgee-listPublicComponents" => component::list_public_components(client, args).await,
        "edgee-listOrganizationComponents" => {
            component::list_organization_components(client, args).await
        }
        "edgee-getComponentByUuid" => component::get_component_by_uuid(client, args).await,
        "edgee-getComponentBySlug" => component::get_component_by_slug(client, args).await,
        "edgee-createComponent" => component::create_component(client, args).await,
        "edgee-updateComponentByUuid" => component::update_component_by_uuid(client, args).await,
        "edgee-updateComponentBySlug" => component::update_component_by_slug(client, args).await,
        "edgee-deleteComponentByUuid" => component::delete_component_by_uuid(client, args).await,
        "edgee-deleteComponentBySlug" => component::delete_component_by_slug(client, args).await,
        "edgee-createComponentVersion" => {
            component::create_component_version_by_uuid(client, args).await
        }
        "edgee-createComponentVersionBySlug" => {
            component::create_component_version_by_slug(client, args).await
        }
        "edgee-updateComponentVersionBySlug" => {
            component::update_component_version_by_slug(client, args).await
        }

        "edgee-getMe" => user::get_me(client, args).await,
        "edgee-getUser" => user::get_user(client, args).await,
        "edgee-updateUser" => user::update_user(client, args).await,
        "edgee-listInvitations" => user::list_invitations(client, args).await,
        "edgee-getInvitation" => user::get_invitation(client, args).await,
        "edgee-createInvitation" => user::create_invitation(client, args).await,
        "edgee-deleteInvitation" => user::delete_invitation(client, args).await,
        "edgee-listApiTokens" => user::list_api_tokens(client, args).await,
        "edgee-getApiToken" => user::get_api_token(client, args).await,
        "edgee-createApiToken" => user::create_api_token(client, args).await,
        "edgee-deleteApiToken" => user::delete_api_token(client, args).await,
        "edgee-getUploadPresignedUrl" => user::get_upload_presigned_url(client, args).await,

        _ => Err(ToolFailure::Invalid(ToolError::new(
            "unknown_tool",
            format!("Unknown tool: {name}"),
        ))),
    }
}

type ToolResult = Result<ToolOutput, ToolFailure>;

/// A rendered tool outcome: agent-facing text plus the raw JSON.
#[derive(Debug)]
struct ToolOutput {
    text: String,
    structured: Value,
    is_error: bool,
}

impl ToolOutput {
    fn new(text: impl Into<String>, payload: &impl Serialize) -> Self {
        Self {
            text: text.into(),
            structured: serde_json::to_value(payload).unwrap_or(Value::Null),
            is_error: false,
        }
    }

    /// The API answered but reported the operation as not applied.
    fn refused(text: impl Into<String>, payload: &impl Serialize) -> Self {
        Self {
            is_error: true,
            ..Self::new(text, payload)
        }
    }

    fn into_response(self) -> Value {
        build_tool_call_response(self.text, self.structured, self.is_error)
    }
}

#[derive(Debug)]
enum ToolFailure {
    Invalid(ToolError),
    Api { action: &'static str, error: ApiError },
}

impl ToolFailure {
    fn summary(&self) -> String {
        match self {
            ToolFailure::Invalid(err) => format!("{}: {}", err.code, err.message),
            ToolFailure::Api { action, error } => {
                format!("{action}: {}", describe_api_error(error))
            }
        }
    }

    fn into_response(self) -> Value {
        match self {
            ToolFailure::Invalid(err) => {
                let text = format!("Invalid arguments: {}", err.message);
                build_tool_call_response(text, err.to_value(), true)
            }
            ToolFailure::Api { action, error } => {
                let text = format!("Error {action}: {}", describe_api_error(&error));
                build_tool_call_response(text, api_error_value(&error), true)
            }
        }
    }
}

impl From<ToolError> for ToolFailure {
    fn from(err: ToolError) -> Self {
        ToolFailure::Invalid(err)
    }
}

/// Maps a catalog failure onto the tool failure for `action`
/// ("retrieving organizations", "creating project", ...).
fn api_failure(action: &'static str) -> impl FnOnce(ApiError) -> ToolFailure {
    move |error| ToolFailure::Api { action, error }
}

#[derive(Debug, Clone)]
struct ToolError {
    code: String,
    message: String,
    field: Option<String>,
    docs_hint: Option<String>,
    status: Option<u16>,
    details: Option<Value>,
}

impl ToolError {
    fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: None,
            docs_hint: None,
            status: None,
            details: None,
        }
    }

    fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::new("validation_failed", message).with_field(field)
    }

    fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    fn with_docs_hint(mut self, docs_hint: impl Into<String>) -> Self {
        self.docs_hint = Some(docs_hint.into());
        self
    }

    fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    fn to_value(&self) -> Value {
        let mut payload = json!({
            "error": self.code,
            "message": self.message
        });
        if let Some(field) = &self.field {
            payload["field"] = Value::String(field.clone());
        }
        if let Some(docs_hint) = &self.docs_hint {
            payload["docs_hint"] = Value::String(docs_hint.clone());
        }
        if let Some(status) = self.status {
            payload["status"] = json!(status);
        }
        if let Some(details) = &self.details {
            payload["details"] = details.clone();
        }
        payload
    }
}

fn build_tool_call_response(text: String, structured: Value, is_error: bool) -> Value {
    let mut response = json!({
        "content": [{ "type": "text", "text": text }],
        "structuredContent": structured
    });
    if is_error {
        response["isError"] = Value::Bool(true);
    }
    response
}

fn describe_api_error(error: &ApiError) -> String {
    let Some(payload) = error.error_response() else {
        return error.message().to_string();
    };
    let mut text = format!(
        "{} ({}: {})",
        error.message(),
        payload.error.kind,
        payload.error.message
    );
    for param in payload.error.params.iter().flatten() {
        text.push_str(&format!("\n  - {}: {}", param.param, param.message));
    }
    text
}

fn api_error_value(error: &ApiError) -> Value {
    let tool_error = match error {
        ApiError::Configuration(config) => ToolError::new("configuration_error", config.message())
            .with_docs_hint(format!(
                "Provide an Edgee API token through {TOKEN_ENV} or --token."
            )),
        ApiError::Api(failure) if failure.status() == 0 => {
            ToolError::new("request_failed", failure.message())
        }
        ApiError::Api(failure) => {
            let code = error
                .error_type()
                .map(|kind| kind.as_str().to_string())
                .unwrap_or_else(|| "api_error".to_string());
            ToolError::new(code, failure.message()).with_status(failure.status())
        }
    };
    let tool_error = match error.error_response() {
        Some(payload) => {
            tool_error.with_details(serde_json::to_value(payload).unwrap_or(Value::Null))
        }
        None => tool_error,
    };
    tool_error.to_value()
}

/// Checks `args` against the tool's input schema: declared and required keys,
/// JSON types and enum values, down through nested objects and array items.
/// Null arguments count as absent.
fn check_arguments(schema: &Value, args: &Map<String, Value>) -> Result<(), ToolError> {
    check_object(schema, args, "")
}

fn check_object(
    schema: &Value,
    object: &Map<String, Value>,
    prefix: &str,
) -> Result<(), ToolError> {
    let properties = schema.get("properties").and_then(Value::as_object);
    if schema.get("additionalProperties") == Some(&Value::Bool(false)) {
        for key in object.keys() {
            if !properties.is_some_and(|p| p.contains_key(key)) {
                let field = field_path(prefix, key);
                return Err(ToolError::validation(&field, format!("Unknown argument '{field}'")));
            }
        }
    }
    let required = schema
        .get("required")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str);
    for key in required {
        if object.get(key).is_none_or(Value::is_null) {
            let field = field_path(prefix, key);
            return Err(ToolError::validation(
                &field,
                format!("Missing required field '{field}'"),
            ));
        }
    }
    let Some(properties) = properties else {
        return Ok(());
    };
    for (key, value) in object.iter().filter(|(_, value)| !value.is_null()) {
        if let Some(property) = properties.get(key) {
            check_value(property, value, &field_path(prefix, key))?;
        }
    }
    Ok(())
}

fn check_value(schema: &Value, value: &Value, field: &str) -> Result<(), ToolError> {
    if let Some(expected) = schema.get("type").and_then(Value::as_str) {
        if !has_json_type(value, expected) {
            return Err(ToolError::validation(
                field,
                format!("'{field}' must be {}", type_phrase(expected)),
            ));
        }
    }
    if let Some(allowed) = schema.get("enum").and_then(Value::as_array) {
        if !allowed.contains(value) {
            let allowed: Vec<String> = allowed
                .iter()
                .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_string))
                .collect();
            return Err(ToolError::validation(
                field,
                format!("'{field}' must be one of: {}", allowed.join(", ")),
            ));
        }
    }
    match (value, schema.get("items")) {
        (Value::Object(object), _) => check_object(schema, object, field),
        (Value::Array(items), Some(item_schema)) => {
            for (index, item) in items.iter().enumerate() {
                check_value(item_schema, item, &format!("{field}[{index}]"))?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn field_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn has_json_type(value: &Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        _ => true,
    }
}

fn type_phrase(expected: &str) -> &str {
    match expected {
        "string" => "a string",
        "integer" => "an integer",
        "number" => "a number",
        "boolean" => "a boolean",
        "array" => "an array",
        "object" => "an object",
        other => other,
    }
}

fn required_string(args: &Map<String, Value>, key: &str) -> Result<String, ToolError> {
    let value = args
        .get(key)
        .ok_or_else(|| ToolError::validation(key, format!("Missing required field '{key}'")))?;
    match value {
        Value::String(v) if !v.trim().is_empty() => Ok(v.clone()),
        Value::String(_) => Err(ToolError::validation(key, format!("'{key}' must not be empty"))),
        _ => Err(ToolError::validation(key, format!("'{key}' must be a string"))),
    }
}

fn arg_optional_string(args: &Map<String, Value>, key: &str) -> Result<Option<String>, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(v)) if v.trim().is_empty() => Ok(None),
        Some(Value::String(v)) => Ok(Some(v.clone())),
        Some(_) => Err(ToolError::validation(key, format!("'{key}' must be a string"))),
    }
}

fn arg_optional_u64(args: &Map<String, Value>, key: &str) -> Result<Option<u64>, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_u64().map(Some).ok_or_else(|| {
            ToolError::validation(key, format!("'{key}' must be an unsigned integer"))
        }),
        Some(_) => Err(ToolError::validation(
            key,
            format!("'{key}' must be an unsigned integer"),
        )),
    }
}

/// Reads a string argument restricted to a closed set, e.g. `order_direction`.
fn arg_optional_enum<T: DeserializeOwned>(
    args: &Map<String, Value>,
    key: &str,
    allowed: &[&str],
) -> Result<Option<T>, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone()).map(Some).map_err(|_| {
            ToolError::validation(
                key,
                format!("'{key}' must be one of: {}", allowed.join(", ")),
            )
        }),
    }
}

fn required_enum<T: DeserializeOwned>(
    args: &Map<String, Value>,
    key: &str,
    allowed: &[&str],
) -> Result<T, ToolError> {
    arg_optional_enum(args, key, allowed)?
        .ok_or_else(|| ToolError::validation(key, format!("Missing required field '{key}'")))
}

fn parse_uuid_string(value: &str, field: &str) -> Result<Uuid, ToolError> {
    Uuid::parse_str(value)
        .map_err(|_| ToolError::validation(field, format!("'{field}' must be a valid UUID")))
}

const ORDER_DIRECTIONS: [&str; 2] = ["ASC", "DESC"];

fn list_params(args: &Map<String, Value>) -> Result<ListParams, ToolError> {
    Ok(ListParams {
        limit: arg_optional_u64(args, "limit")?,
        start_key: arg_optional_string(args, "start_key")?,
        order_direction: arg_optional_enum(args, "order_direction", &ORDER_DIRECTIONS)?,
    })
}

fn component_filter(args: &Map<String, Value>) -> Result<ComponentFilter, ToolError> {
    Ok(ComponentFilter {
        category: arg_optional_enum(args, "category", &ComponentCategory::ALL)?,
        subcategory: arg_optional_enum(args, "subcategory", &ComponentSubcategory::ALL)?,
    })
}

/// Deserializes the request body from the arguments, leaving out the ones
/// that address the resource in the path.
fn parse_input<T: DeserializeOwned>(
    args: &Map<String, Value>,
    path_keys: &[&str],
) -> Result<T, ToolError> {
    let body: Map<String, Value> = args
        .iter()
        .filter(|(key, value)| !path_keys.contains(&key.as_str()) && !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    serde_json::from_value(Value::Object(body)).map_err(|e| input_error(&e.to_string()))
}

/// Names the offending argument when serde reports one (`missing field `x``).
fn input_error(message: &str) -> ToolError {
    let named = message
        .split_once('`')
        .and_then(|(_, rest)| rest.split_once('`'))
        .map(|(name, _)| name);
    match named {
        Some(name) if message.starts_with("missing field") => {
            ToolError::validation(name, format!("Missing required field '{name}'"))
        }
        Some(name) if message.starts_with("unknown field") => {
            ToolError::validation(name, format!("Unknown argument '{name}'"))
        }
        _ => ToolError::validation(
            "arguments",
            format!("Arguments do not match the input schema ({message})"),
        ),
    }
}

// Shared schema fragments

fn list_schema_properties() -> Map<String, Value> {
    let Value::Object(properties) = json!({
        "limit": { "type": "integer", "minimum": 0, "description": "Maximum number of items to return" },
        "start_key": { "type": "string", "description": "Cursor from a previous page's last_key" },
        "order_direction": { "type": "string", "enum": ORDER_DIRECTIONS }
    }) else {
        return Map::new();
    };
    properties
}

fn component_filter_properties() -> Value {
    json!({
        "category": { "type": "string", "enum": ComponentCategory::ALL },
        "subcategory": { "type": "string", "enum": ComponentSubcategory::ALL }
    })
}

/// Object schema with `additionalProperties: false`.
fn object_schema(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}

/// Object schema for list tools: the given properties plus pagination.
fn list_schema(properties: Value, required: &[&str]) -> Value {
    let mut merged = match properties {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    merged.extend(list_schema_properties());
    object_schema(Value::Object(merged), required)
}

// Text rendering

fn or<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    value.filter(|v| !v.is_empty()).unwrap_or(fallback)
}

fn or_unknown(value: &str) -> &str {
    if value.is_empty() { "Unknown" } else { value }
}

fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

fn to_pretty_json(value: &impl Serialize) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

/// `<header>:` followed by one `---`-terminated block per item, and a cursor
/// hint when more pages exist.
fn list_text<T>(
    header: &str,
    page: &ListResponse<T>,
    render: impl Fn(&T) -> Vec<String>,
) -> String {
    let items: Vec<String> = page
        .data
        .iter()
        .map(|item| {
            let mut lines = render(item);
            lines.push("---".to_string());
            lines.join("\n")
        })
        .collect();
    let mut text = format!("{header}:\n\n{}", items.join("\n"));
    if page.data.is_empty() {
        text.push_str("None found.");
    }
    if page.has_more {
        match page.last_key.as_deref() {
            Some(cursor) => text.push_str(&format!(
                "\n\nMore results available. Pass start_key \"{cursor}\" to fetch the next page."
            )),
            None => text.push_str("\n\nMore results available."),
        }
    }
    text
}

fn deleted_output(deleted: &DeletedResponse, success: String, failure: String) -> ToolOutput {
    if deleted.deleted {
        ToolOutput::new(success, deleted)
    } else {
        ToolOutput::refused(failure, deleted)
    }
}
