use edgee_core::DeletedResponse;
use edgee_core::component::{
    Component, ComponentCreateInput, ComponentFilter, ComponentListResponse, ComponentRef,
    ComponentUpdateInput, ComponentVersion, ComponentVersionCreateInput,
    ComponentVersionUpdateInput,
};

use crate::client::{ApiClient, ApiError};

/// `/v1/components/<ref>[/<tail>...]`
fn component_path(component: &ComponentRef, tail: &[&str]) -> Vec<String> {
    let mut path = vec!["v1".to_string(), "components".to_string()];
    path.extend(component.segments());
    path.extend(tail.iter().map(|s| s.to_string()));
    path
}

impl ApiClient {
    pub async fn list_public_components(
        &self,
        filter: &ComponentFilter,
    ) -> Result<ComponentListResponse, ApiError> {
        self.get_with(&["v1", "components"], filter.query_fields())
            .await
    }

    pub async fn list_organization_components(
        &self,
        organization_id: &str,
        filter: &ComponentFilter,
    ) -> Result<ComponentListResponse, ApiError> {
        self.get_with(
            &["v1", "organizations", organization_id, "components"],
            filter.query_fields(),
        )
        .await
    }

    pub async fn get_component(&self, component: &ComponentRef) -> Result<Component, ApiError> {
        self.get(component_path(component, &[]).as_slice()).await
    }

    pub async fn create_component(
        &self,
        input: &ComponentCreateInput,
    ) -> Result<Component, ApiError> {
        self.post(&["v1", "components"], input).await
    }

    /// Components are updated with PUT, unlike every other resource family.
    pub async fn update_component(
        &self,
        component: &ComponentRef,
        input: &ComponentUpdateInput,
    ) -> Result<Component, ApiError> {
        self.put(component_path(component, &[]).as_slice(), input)
            .await
    }

    pub async fn delete_component(
        &self,
        component: &ComponentRef,
    ) -> Result<DeletedResponse, ApiError> {
        self.delete(component_path(component, &[]).as_slice())
            .await
    }

    pub async fn create_component_version(
        &self,
        component: &ComponentRef,
        input: &ComponentVersionCreateInput,
    ) -> Result<ComponentVersion, ApiError> {
        self.post(component_path(component, &["versions"]).as_slice(), input)
            .await
    }

    pub async fn update_component_version(
        &self,
        component: &ComponentRef,
        version: &str,
        input: &ComponentVersionUpdateInput,
    ) -> Result<ComponentVersion, ApiError> {
        self.put(
            component_path(component, &["versions", version]).as_slice(),
            input,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use edgee_core::component::{ComponentCategory, ComponentSubcategory};
    use serde_json::json;
    use uuid::Uuid;

    use super::*;
    use crate::catalog::fixtures::{DELETED, client_for, empty_list};
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

    fn by_uuid() -> ComponentRef {
        ComponentRef::Id(Uuid::parse_str(COMPONENT_ID).unwrap())
    }

    #[tokio::test]
    async fn uuid_and_slug_addressing_return_the_same_component() {
        let mock = MockApi::start(200, component_json()).await;
        let client = client_for(&mock);

        let a = client.get_component(&by_uuid()).await.unwrap();
        let b = client
            .get_component(&ComponentRef::slug("edgee", "google-analytics"))
            .await
            .unwrap();

        assert_eq!(a, b);
        assert!(a.versions.contains_key("1.0.0"));
        let requests = mock.requests();
        assert_eq!(requests[0].path, format!("/v1/components/{COMPONENT_ID}"));
        assert_eq!(requests[1].path, "/v1/components/edgee/google-analytics");
    }

    #[tokio::test]
    async fn undocumented_dynamic_field_keys_are_accepted() {
        let mut component: serde_json::Value = serde_json::from_str(&component_json()).unwrap();
        component["versions"]["1.0.0"]["dynamic_fields"] = json!([{
            "name": "measurement_id",
            "title": "Measurement ID",
            "type": "string",
            "required": true,
            "placeholder": "abc"
        }]);
        let mock = MockApi::start(200, component.to_string()).await;
        let client = client_for(&mock);

        let fetched = client
            .get_component(&ComponentRef::slug("edgee", "google-analytics"))
            .await
            .unwrap();

        let field = &fetched.versions["1.0.0"].dynamic_fields[0];
        assert_eq!(field.name, "measurement_id");
        assert_eq!(field.extra.get("placeholder"), Some(&json!("abc")));
    }

    #[tokio::test]
    async fn component_updates_use_put() {
        let version = json!({
            "object": "component_version",
            "version": "1.0.0",
            "wit_world_version": "0.5.0",
            "wasm_url": "https://cdn.example.com/ga.wasm",
            "dynamic_fields": [],
            "changelog": "Initial",
            "created_at": "2024-01-01T00:00:00Z"
        })
        .to_string();
        let component = component_json();
        let mock = MockApi::start_with(move |req| {
            if req.path.contains("/versions") {
                (200, version.clone())
            } else {
                (200, component.clone())
            }
        })
        .await;
        let client = client_for(&mock);

        client
            .update_component(
                &by_uuid(),
                &ComponentUpdateInput {
                    is_archived: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let updated = client
            .update_component_version(
                &ComponentRef::slug("edgee", "google-analytics"),
                "1.0.0",
                &ComponentVersionUpdateInput {
                    changelog: Some("Initial".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.changelog.as_deref(), Some("Initial"));
        let requests = mock.requests();
        assert_eq!(requests[0].method, "PUT");
        assert_eq!(requests[0].json_body(), json!({"is_archived": true}));
        assert_eq!(requests[1].method, "PUT");
        assert_eq!(
            requests[1].path,
            "/v1/components/edgee/google-analytics/versions/1.0.0"
        );
    }

    #[tokio::test]
    async fn create_version_posts_under_versions() {
        let mock = MockApi::start(
            201,
            r#"{"object":"component_version","version":"2.0.0","wit_world_version":"1.0.0","wasm_url":"https://cdn.example.com/x.wasm","dynamic_fields":[],"created_at":"2024-01-01T00:00:00Z"}"#,
        )
        .await;
        let client = client_for(&mock);

        client
            .create_component_version(
                &by_uuid(),
                &ComponentVersionCreateInput {
                    version: "2.0.0".to_string(),
                    wit_version: "1.0.0".to_string(),
                    wasm_url: "https://cdn.example.com/x.wasm".to_string(),
                    dynamic_fields: None,
                    changelog: None,
                },
            )
            .await
            .unwrap();

        let req = mock.last_request();
        assert_eq!(req.method, "POST");
        assert_eq!(req.path, format!("/v1/components/{COMPONENT_ID}/versions"));
        assert_eq!(
            req.json_body(),
            json!({
                "version": "2.0.0",
                "wit_version": "1.0.0",
                "wasm_url": "https://cdn.example.com/x.wasm"
            })
        );
    }

    #[tokio::test]
    async fn list_filters_render_category_values() {
        let mock = MockApi::start(200, empty_list("/v1/components")).await;
        let client = client_for(&mock);

        client
            .list_public_components(&ComponentFilter {
                category: Some(ComponentCategory::DataCollection),
                subcategory: None,
            })
            .await
            .unwrap();
        client
            .list_organization_components(
                "org_1",
                &ComponentFilter {
                    category: None,
                    subcategory: Some(ComponentSubcategory::Warehouse),
                },
            )
            .await
            .unwrap();

        let requests = mock.requests();
        assert_eq!(requests[0].path, "/v1/components");
        assert_eq!(requests[0].query.as_deref(), Some("category=data_collection"));
        assert_eq!(requests[1].path, "/v1/organizations/org_1/components");
        assert_eq!(requests[1].query.as_deref(), Some("subcategory=warehouse"));
    }

    #[tokio::test]
    async fn delete_by_slug() {
        let mock = MockApi::start(200, DELETED).await;
        let client = client_for(&mock);

        client
            .delete_component(&ComponentRef::slug("edgee", "old-component"))
            .await
            .unwrap();

        let req = mock.last_request();
        assert_eq!(req.method, "DELETE");
        assert_eq!(req.path, "/v1/components/edgee/old-component");
    }
}
