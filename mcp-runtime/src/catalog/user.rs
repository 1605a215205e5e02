use edgee_core::user::{
    ApiToken, ApiTokenCreateInput, ApiTokenListParams, ApiTokenListResponse, Invitation,
    InvitationCreateInput, InvitationListParams, InvitationListResponse, UserUpdateInput,
    UserWithRoles,
};
use edgee_core::{DeletedResponse, UploadPresign};

use crate::client::{ApiClient, ApiError};

impl ApiClient {
    /// The user owning the credential.
    pub async fn get_me(&self) -> Result<UserWithRoles, ApiError> {
        self.get(&["v1", "users", "me"]).await
    }

    pub async fn get_user(&self, id: &str) -> Result<UserWithRoles, ApiError> {
        self.get(&["v1", "users", id]).await
    }

    pub async fn update_user(
        &self,
        id: &str,
        input: &UserUpdateInput,
    ) -> Result<UserWithRoles, ApiError> {
        self.post(&["v1", "users", id], input).await
    }

    pub async fn list_invitations(
        &self,
        params: &InvitationListParams,
    ) -> Result<InvitationListResponse, ApiError> {
        self.get_with(&["v1", "invitations"], params.query_fields())
            .await
    }

    pub async fn get_invitation(&self, id: &str) -> Result<Invitation, ApiError> {
        self.get(&["v1", "invitations", id]).await
    }

    pub async fn create_invitation(
        &self,
        input: &InvitationCreateInput,
    ) -> Result<Invitation, ApiError> {
        self.post(&["v1", "invitations"], input).await
    }

    pub async fn delete_invitation(&self, id: &str) -> Result<DeletedResponse, ApiError> {
        self.delete(&["v1", "invitations", id]).await
    }

    pub async fn list_api_tokens(
        &self,
        params: &ApiTokenListParams,
    ) -> Result<ApiTokenListResponse, ApiError> {
        self.get_with(&["v1", "api_tokens"], params.query_fields())
            .await
    }

    pub async fn get_api_token(&self, id: &str) -> Result<ApiToken, ApiError> {
        self.get(&["v1", "api_tokens", id]).await
    }

    /// The returned token carries the secret; it is not retrievable later.
    pub async fn create_api_token(
        &self,
        input: &ApiTokenCreateInput,
    ) -> Result<ApiToken, ApiError> {
        self.post(&["v1", "api_tokens"], input).await
    }

    pub async fn delete_api_token(&self, id: &str) -> Result<DeletedResponse, ApiError> {
        self.delete(&["v1", "api_tokens", id]).await
    }

    pub async fn get_upload_presigned_url(&self) -> Result<UploadPresign, ApiError> {
        self.get(&["v1", "upload", "presign"]).await
    }
}
