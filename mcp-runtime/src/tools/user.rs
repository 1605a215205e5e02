use edgee_core::user::{
    ApiToken, ApiTokenCreateInput, ApiTokenListParams, Invitation, InvitationCreateInput,
    InvitationListParams, MemberRole, UserUpdateInput, UserWithRoles,
};
use serde_json::{Map, Value, json};

use super::{
    ToolDefinition, ToolError, ToolOutput, ToolResult, api_failure, arg_optional_string,
    deleted_output, list_params, list_schema, list_text, object_schema, or, or_unknown,
    parse_input, required_enum, required_string, yes_no,
};
use crate::client::ApiClient;

const INVITATION_ROLES: [&str; 2] = ["admin", "member"];

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "edgee-getMe",
            description: "Get the current user.",
            input_schema: object_schema(json!({}), &[]),
        },
        ToolDefinition {
            name: "edgee-getUser",
            description: "Get a user by ID.",
            input_schema: object_schema(json!({ "id": { "type": "string" } }), &["id"]),
        },
        ToolDefinition {
            name: "edgee-updateUser",
            description: "Update a user's avatar or accepted terms and privacy versions.",
            input_schema: object_schema(
                json!({
                    "id": { "type": "string" },
                    "avatar_url": { "type": "string" },
                    "terms_version": { "type": "string" },
                    "privacy_version": { "type": "string" }
                }),
                &["id"],
            ),
        },
        ToolDefinition {
            name: "edgee-listInvitations",
            description: "List pending invitations, optionally for one organization.",
            input_schema: list_schema(
                json!({ "organization_id": { "type": "string" } }),
                &[],
            ),
        },
        ToolDefinition {
            name: "edgee-getInvitation",
            description: "Get an invitation by ID.",
            input_schema: object_schema(json!({ "id": { "type": "string" } }), &["id"]),
        },
        ToolDefinition {
            name: "edgee-createInvitation",
            description: "Invite someone to an organization.",
            input_schema: object_schema(
                json!({
                    "organization_id": { "type": "string" },
                    "email": { "type": "string", "format": "email" },
                    "role": { "type": "string", "enum": INVITATION_ROLES }
                }),
                &["organization_id", "email", "role"],
            ),
        },
        ToolDefinition {
            name: "edgee-deleteInvitation",
            description: "Revoke an invitation.",
            input_schema: object_schema(json!({ "id": { "type": "string" } }), &["id"]),
        },
        ToolDefinition {
            name: "edgee-listApiTokens",
            description: "List your API tokens.",
            input_schema: list_schema(json!({ "name": { "type": "string" } }), &[]),
        },
        ToolDefinition {
            name: "edgee-getApiToken",
            description: "Get an API token by ID. The secret is never returned.",
            input_schema: object_schema(json!({ "id": { "type": "string" } }), &["id"]),
        },
        ToolDefinition {
            name: "edgee-createApiToken",
            description: "Create an API token. The secret is only shown in this response.",
            input_schema: object_schema(
                json!({
                    "name": { "type": "string" },
                    "expires_at": { "type": "string", "description": "ISO 8601 timestamp" }
                }),
                &["name"],
            ),
        },
        ToolDefinition {
            name: "edgee-deleteApiToken",
            description: "Revoke an API token.",
            input_schema: object_schema(json!({ "id": { "type": "string" } }), &["id"]),
        },
        ToolDefinition {
            name: "edgee-getUploadPresignedUrl",
            description: "Get a presigned URL for uploading files.",
            input_schema: object_schema(json!({}), &[]),
        },
    ]
}

fn user_text(first: Vec<String>, user: &UserWithRoles) -> String {
    let mut lines = first;
    lines.extend([
        format!("ID: {}", user.id),
        format!("Email: {}", or_unknown(&user.email)),
        format!("Avatar URL: {}", or(user.avatar_url.as_deref(), "None")),
        format!("Created at: {}", or_unknown(&user.created_at)),
        format!("Updated at: {}", or_unknown(&user.updated_at)),
    ]);
    let mut text = lines.join("\n");
    if !user.roles.is_empty() {
        let roles: Vec<String> = user
            .roles
            .iter()
            .map(|(organization_id, role)| format!("Organization {organization_id}: {role}"))
            .collect();
        text.push_str("\nRoles:\n  ");
        text.push_str(&roles.join("\n  "));
    }
    text
}

fn invitation_lines(invitation: &Invitation) -> Vec<String> {
    vec![
        format!("Email: {}", or_unknown(&invitation.email)),
        format!("ID: {}", invitation.id),
        format!("Organization ID: {}", or_unknown(&invitation.organization_id)),
        format!("Role: {}", invitation.role),
        format!("Created at: {}", or_unknown(&invitation.created_at)),
    ]
}

fn token_lines(token: &ApiToken) -> Vec<String> {
    vec![
        format!("ID: {}", token.id),
        format!("User ID: {}", or_unknown(&token.user_id)),
        format!("From Browser: {}", yes_no(token.from_browser)),
        format!("Last Used At: {}", or(token.last_used_at.as_deref(), "Never")),
        format!("Expires At: {}", or(token.expires_at.as_deref(), "Never")),
        format!("Created at: {}", or_unknown(&token.created_at)),
        format!("Updated at: {}", or_unknown(&token.updated_at)),
    ]
}

/// Shape check only; the API owns real address validation.
fn checked_email(args: &Map<String, Value>) -> Result<String, ToolError> {
    let email = required_string(args, "email")?;
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.split('.').count() > 1
                && domain.split('.').all(|label| !label.is_empty())
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(email)
    } else {
        Err(ToolError::validation("email", "'email' must be a valid email address"))
    }
}

pub(super) async fn get_me(client: &ApiClient, _args: &Map<String, Value>) -> ToolResult {
    let user = client
        .get_me()
        .await
        .map_err(api_failure("retrieving current user"))?;
    let text = user_text(vec![format!("User: {}", or_unknown(&user.name))], &user);
    Ok(ToolOutput::new(text, &user))
}

pub(super) async fn get_user(client: &ApiClient, args: &Map<String, Value>) -> ToolResult {
    let id = required_string(args, "id")?;
    let user = client
        .get_user(&id)
        .await
        .map_err(api_failure("retrieving user"))?;
    let text = user_text(vec![format!("User: {}", or_unknown(&user.name))], &user);
    Ok(ToolOutput::new(text, &user))
}

pub(super) async fn update_user(client: &ApiClient, args: &Map<String, Value>) -> ToolResult {
    let id = required_string(args, "id")?;
    let input: UserUpdateInput = parse_input(args, &["id"])?;
    let user = client
        .update_user(&id, &input)
        .await
        .map_err(api_failure("updating user"))?;
    let text = user_text(
        vec![
            "User updated successfully:".to_string(),
            format!("Name: {}", or_unknown(&user.name)),
        ],
        &user,
    );
    Ok(ToolOutput::new(text, &user))
}

pub(super) async fn list_invitations(client: &ApiClient, args: &Map<String, Value>) -> ToolResult {
    let params = InvitationListParams {
        list: list_params(args)?,
        organization_id: arg_optional_string(args, "organization_id")?,
    };
    let page = client
        .list_invitations(&params)
        .await
        .map_err(api_failure("retrieving invitations"))?;
    Ok(ToolOutput::new(
        list_text("Invitations", &page, invitation_lines),
        &page,
    ))
}

pub(super) async fn get_invitation(client: &ApiClient, args: &Map<String, Value>) -> ToolResult {
    let id = required_string(args, "id")?;
    let invitation = client
        .get_invitation(&id)
        .await
        .map_err(api_failure("retrieving invitation"))?;
    let mut lines = vec!["Invitation:".to_string()];
    lines.extend(invitation_lines(&invitation));
    Ok(ToolOutput::new(lines.join("\n"), &invitation))
}

pub(super) async fn create_invitation(client: &ApiClient, args: &Map<String, Value>) -> ToolResult {
    let input = InvitationCreateInput {
        organization_id: required_string(args, "organization_id")?,
        email: checked_email(args)?,
        role: required_enum::<MemberRole>(args, "role", &INVITATION_ROLES)?,
    };
    let invitation = client
        .create_invitation(&input)
        .await
        .map_err(api_failure("creating invitation"))?;
    let mut lines = vec!["Invitation created successfully:".to_string()];
    lines.extend(invitation_lines(&invitation));
    Ok(ToolOutput::new(lines.join("\n"), &invitation))
}

pub(super) async fn delete_invitation(client: &ApiClient, args: &Map<String, Value>) -> ToolResult {
    let id = required_string(args, "id")?;
    let deleted = client
        .delete_invitation(&id)
        .await
        .map_err(api_failure("deleting invitation"))?;
    Ok(deleted_output(
        &deleted,
        format!("Invitation with ID {id} was successfully deleted."),
        format!("Failed to delete invitation with ID: {id}"),
    ))
}

pub(super) async fn list_api_tokens(client: &ApiClient, args: &Map<String, Value>) -> ToolResult {
    let params = ApiTokenListParams {
        list: list_params(args)?,
        name: arg_optional_string(args, "name")?,
    };
    let page = client
        .list_api_tokens(&params)
        .await
        .map_err(api_failure("retrieving API tokens"))?;
    let text = list_text("API Tokens", &page, |token| {
        let mut lines = vec![format!("{}:", or_unknown(&token.name))];
        lines.extend(token_lines(token));
        lines
    });
    Ok(ToolOutput::new(text, &page))
}

pub(super) async fn get_api_token(client: &ApiClient, args: &Map<String, Value>) -> ToolResult {
    let id = required_string(args, "id")?;
    let token = client
        .get_api_token(&id)
        .await
        .map_err(api_failure("retrieving API token"))?;
    let mut lines = vec![format!("API Token: {}", or_unknown(&token.name))];
    lines.extend(token_lines(&token));
    Ok(ToolOutput::new(lines.join("\n"), &token))
}

pub(super) async fn create_api_token(client: &ApiClient, args: &Map<String, Value>) -> ToolResult {
    let input: ApiTokenCreateInput = parse_input(args, &[])?;
    let token = client
        .create_api_token(&input)
        .await
        .map_err(api_failure("creating API token"))?;
    let mut lines = vec![
        "API Token created successfully:".to_string(),
        format!("Name: {}", or_unknown(&token.name)),
    ];
    lines.extend(
        token_lines(&token)
            .into_iter()
            .filter(|line| !line.starts_with("Last Used At:")),
    );
    lines.push(match token.token.as_deref() {
        Some(secret) => format!("Token: {secret}"),
        None => "Token: Not available (only shown once at creation)".to_string(),
    });
    Ok(ToolOutput::new(lines.join("\n"), &token))
}

pub(super) async fn delete_api_token(client: &ApiClient, args: &Map<String, Value>) -> ToolResult {
    let id = required_string(args, "id")?;
    let deleted = client
        .delete_api_token(&id)
        .await
        .map_err(api_failure("deleting API token"))?;
    Ok(deleted_output(
        &deleted,
        format!("API token with ID {id} was successfully deleted."),
        format!("Failed to delete API token with ID: {id}"),
    ))
}

pub(super) async fn get_upload_presigned_url(
    client: &ApiClient,
    _args: &Map<String, Value>,
) -> ToolResult {
    let presign = client
        .get_upload_presigned_url()
        .await
        .map_err(api_failure("getting upload presigned URL"))?;
    Ok(ToolOutput::new(
        format!("Upload Presigned URL: {}", presign.upload_url),
        &presign,
    ))
}
