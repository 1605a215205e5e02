use edgee_core::DeletedResponse;
use edgee_core::organization::{
    Organization, OrganizationCreateInput, OrganizationListParams, OrganizationListResponse,
    OrganizationUpdateInput, OrganizationUser, OrganizationUserListParams,
    OrganizationUserListResponse, OrganizationUserUpdateInput,
};

use crate::client::{ApiClient, ApiError};

impl ApiClient {
    pub async fn list_organizations(
        &self,
        params: &OrganizationListParams,
    ) -> Result<OrganizationListResponse, ApiError> {
        self.get_with(&["v1", "organizations"], params.query_fields())
            .await
    }

    /// The caller's personal organization.
    pub async fn get_my_organization(&self) -> Result<Organization, ApiError> {
        self.get(&["v1", "organizations", "me"]).await
    }

    pub async fn get_organization(&self, id: &str) -> Result<Organization, ApiError> {
        self.get(&["v1", "organizations", id]).await
    }

    pub async fn create_organization(
        &self,
        input: &OrganizationCreateInput,
    ) -> Result<Organization, ApiError> {
        self.post(&["v1", "organizations"], input).await
    }

    pub async fn update_organization(
        &self,
        id: &str,
        input: &OrganizationUpdateInput,
    ) -> Result<Organization, ApiError> {
        self.post(&["v1", "organizations", id], input).await
    }

    pub async fn delete_organization(&self, id: &str) -> Result<DeletedResponse, ApiError> {
        self.delete(&["v1", "organizations", id]).await
    }

    pub async fn list_organization_users(
        &self,
        id: &str,
        params: &OrganizationUserListParams,
    ) -> Result<OrganizationUserListResponse, ApiError> {
        self.get_with(&["v1", "organizations", id, "users"], params.query_fields())
            .await
    }

    pub async fn update_organization_user(
        &self,
        id: &str,
        user_id: &str,
        input: &OrganizationUserUpdateInput,
    ) -> Result<OrganizationUser, ApiError> {
        self.post(&["v1", "organizations", id, "users", user_id], input)
            .await
    }

    pub async fn delete_organization_user(
        &self,
        id: &str,
        user_id: &str,
    ) -> Result<DeletedResponse, ApiError> {
        self.delete(&["v1", "organizations", id, "users", user_id])
            .await
    }
}
