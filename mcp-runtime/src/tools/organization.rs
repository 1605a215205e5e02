use edgee_core::organization::{
    Organization, OrganizationCreateInput, OrganizationListParams, OrganizationUpdateInput,
    OrganizationUser, OrganizationUserListParams, OrganizationUserUpdateInput,
};
use serde_json::{Map, Value, json};

use super::{
    ToolDefinition, ToolOutput, ToolResult, api_failure, arg_optional_string, deleted_output,
    list_params, list_schema, list_text, object_schema, or, or_unknown, parse_input,
    required_enum, required_string,
};
use crate::client::ApiClient;

const ROLES: [&str; 3] = ["admin", "editor", "member"];

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "edgee-listOrganizations",
            description: "Returns a list of your Organizations. The Organizations are returned sorted by creation date, with the most recent Organizations appearing first.",
            input_schema: list_schema(
                json!({
                    "name": { "type": "string", "description": "Filter by organization name" }
                }),
                &[],
            ),
        },
        ToolDefinition {
            name: "edgee-getMyOrganization",
            description: "Retrieve your personal organization.",
            input_schema: object_schema(json!({}), &[]),
        },
        ToolDefinition {
            name: "edgee-getOrganization",
            description: "Retrieve an Organization by ID.",
            input_schema: object_schema(json!({ "id": { "type": "string" } }), &["id"]),
        },
        ToolDefinition {
            name: "edgee-createOrganization",
            description: "Create a new Organization.",
            input_schema: object_schema(
                json!({
                    "name": { "type": "string" },
                    "slug": { "type": "string" }
                }),
                &["name", "slug"],
            ),
        },
        ToolDefinition {
            name: "edgee-updateOrganization",
            description: "Update an existing Organization.",
            input_schema: object_schema(
                json!({
                    "id": { "type": "string" },
                    "name": { "type": "string" },
                    "slug": { "type": "string" }
                }),
                &["id"],
            ),
        },
        ToolDefinition {
            name: "edgee-deleteOrganization",
            description: "Delete an existing Organization.",
            input_schema: object_schema(json!({ "id": { "type": "string" } }), &["id"]),
        },
        ToolDefinition {
            name: "edgee-listOrganizationUsers",
            description: "List all users of an organization.",
            input_schema: list_schema(
                json!({
                    "id": { "type": "string" },
                    "role": { "type": "string", "enum": ROLES }
                }),
                &["id", "role"],
            ),
        },
        ToolDefinition {
            name: "edgee-updateOrganizationUser",
            description: "Change the role of a user in an organization.",
            input_schema: object_schema(
                json!({
                    "id": { "type": "string", "description": "Organization ID" },
                    "user_id": { "type": "string" },
                    "role": { "type": "string", "enum": ROLES }
                }),
                &["id", "user_id", "role"],
            ),
        },
        ToolDefinition {
            name: "edgee-deleteOrganizationUser",
            description: "Remove a user from an organization.",
            input_schema: object_schema(
                json!({
                    "id": { "type": "string", "description": "Organization ID" },
                    "user_id": { "type": "string" }
                }),
                &["id", "user_id"],
            ),
        },
    ]
}

fn organization_fields(organization: &Organization) -> Vec<String> {
    vec![
        format!("ID: {}", organization.id),
        format!("Slug: {}", or_unknown(&organization.slug)),
        format!("Type: {}", organization.kind),
        format!(
            "Current billing plan: {}",
            or(organization.current_billing_plan.as_deref(), "Unknown")
        ),
        format!("Created at: {}", or_unknown(&organization.created_at)),
        format!("Updated at: {}", or_unknown(&organization.updated_at)),
    ]
}

fn organization_text(heading: Option<&str>, organization: &Organization) -> String {
    let mut lines = match heading {
        Some(heading) => vec![
            heading.to_string(),
            format!("Name: {}", or_unknown(&organization.name)),
        ],
        None => vec![format!("Organization: {}", or_unknown(&organization.name))],
    };
    lines.extend(organization_fields(organization));
    lines.join("\n")
}

fn user_lines(user: &OrganizationUser) -> Vec<String> {
    vec![
        format!("{}:", or_unknown(&user.name)),
        format!("ID: {}", user.id),
        format!("Email: {}", or_unknown(&user.email)),
        format!("Role: {}", user.role),
        format!("Created at: {}", or_unknown(&user.created_at)),
        format!("Updated at: {}", or_unknown(&user.updated_at)),
    ]
}

pub(super) async fn list_organizations(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    let params = OrganizationListParams {
        list: list_params(args)?,
        name: arg_optional_string(args, "name")?,
    };
    let page = client
        .list_organizations(&params)
        .await
        .map_err(api_failure("retrieving organizations"))?;
    let text = list_text("Organizations", &page, |organization| {
        let mut lines = vec![format!("{}:", or_unknown(&organization.name))];
        lines.extend(organization_fields(organization));
        lines
    });
    Ok(ToolOutput::new(text, &page))
}

pub(super) async fn get_my_organization(
    client: &ApiClient,
    _args: &Map<String, Value>,
) -> ToolResult {
    let organization = client
        .get_my_organization()
        .await
        .map_err(api_failure("retrieving your organization"))?;
    Ok(ToolOutput::new(organization_text(None, &organization), &organization))
}

pub(super) async fn get_organization(client: &ApiClient, args: &Map<String, Value>) -> ToolResult {
    let id = required_string(args, "id")?;
    let organization = client
        .get_organization(&id)
        .await
        .map_err(api_failure("retrieving organization"))?;
    Ok(ToolOutput::new(organization_text(None, &organization), &organization))
}

pub(super) async fn create_organization(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    let input = OrganizationCreateInput {
        name: required_string(args, "name")?,
        slug: required_string(args, "slug")?,
    };
    let organization = client
        .create_organization(&input)
        .await
        .map_err(api_failure("creating organization"))?;
    Ok(ToolOutput::new(
        organization_text(Some("Organization created successfully:"), &organization),
        &organization,
    ))
}

pub(super) async fn update_organization(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    let id = required_string(args, "id")?;
    let input: OrganizationUpdateInput = parse_input(args, &[])?;
    let organization = client
        .update_organization(&id, &input)
        .await
        .map_err(api_failure("updating organization"))?;
    Ok(ToolOutput::new(
        organization_text(Some("Organization updated successfully:"), &organization),
        &organization,
    ))
}

pub(super) async fn delete_organization(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    let id = required_string(args, "id")?;
    let deleted = client
        .delete_organization(&id)
        .await
        .map_err(api_failure("deleting organization"))?;
    Ok(deleted_output(
        &deleted,
        format!("Organization with ID {id} was successfully deleted."),
        format!("Failed to delete organization with ID: {id}"),
    ))
}

pub(super) async fn list_organization_users(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    let id = required_string(args, "id")?;
    let params = OrganizationUserListParams {
        list: list_params(args)?,
        role: required_enum(args, "role", &ROLES)?,
    };
    let page = client
        .list_organization_users(&id, &params)
        .await
        .map_err(api_failure("retrieving organization users"))?;
    let text = list_text(&format!("Users for organization {id}"), &page, user_lines);
    Ok(ToolOutput::new(text, &page))
}

pub(super) async fn update_organization_user(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    let id = required_string(args, "id")?;
    let user_id = required_string(args, "user_id")?;
    let input = OrganizationUserUpdateInput {
        role: required_enum(args, "role", &ROLES)?,
    };
    let user = client
        .update_organization_user(&id, &user_id, &input)
        .await
        .map_err(api_failure("updating organization user"))?;
    let mut lines = vec!["Organization user updated successfully:".to_string()];
    lines.extend(user_lines(&user));
    Ok(ToolOutput::new(lines.join("\n"), &user))
}

pub(super) async fn delete_organization_user(
    client: &ApiClient,
    args: &Map<String, Value>,
) -> ToolResult {
    let id = required_string(args, "id")?;
    let user_id = required_string(args, "user_id")?;
    let deleted = client
        .delete_organization_user(&id, &user_id)
        .await
        .map_err(api_failure("removing organization user"))?;
    Ok(deleted_output(
        &deleted,
        format!("User {user_id} was successfully removed from organization {id}."),
        format!("Failed to remove user {user_id} from organization {id}"),
    ))
}
