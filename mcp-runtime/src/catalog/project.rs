use edgee_core::component::ComponentFilter;
use edgee_core::data_collection::{
    IncomingDataCollectionEventListResponse, OutgoingDataCollectionEventListResponse,
};
use edgee_core::project::{
    CounterPeriod, Domain, DomainCreateInput, DomainListResponse, DomainUpdateInput, Project,
    ProjectComponent, ProjectComponentCounters, ProjectComponentCreateInput,
    ProjectComponentListResponse, ProjectComponentUpdateInput, ProjectCounters,
    ProjectCreateInput, ProjectListParams, ProjectListResponse, ProjectUpdateInput,
    ProxySettings, ProxySettingsCreateInput, ProxySettingsListResponse,
    ProxySettingsUpdateInput,
};
use edgee_core::{DeletedResponse, ListParams};

use crate::client::{ApiClient, ApiError};

impl ApiClient {
    pub async fn list_projects(
        &self,
        params: &ProjectListParams,
    ) -> Result<ProjectListResponse, ApiError> {
        self.get_with(&["v1", "projects"], params.query_fields())
            .await
    }

    pub async fn get_project(
        &self,
        id: &str,
        organization_id: Option<&str>,
    ) -> Result<Project, ApiError> {
        self.get_with(
            &["v1", "projects", id],
            vec![("organization_id", organization_id.map(str::to_string))],
        )
        .await
    }

    pub async fn create_project(&self, input: &ProjectCreateInput) -> Result<Project, ApiError> {
        self.post(&["v1", "projects"], input).await
    }

    pub async fn update_project(
        &self,
        id: &str,
        input: &ProjectUpdateInput,
    ) -> Result<Project, ApiError> {
        self.post(&["v1", "projects", id], input).await
    }

    pub async fn delete_project(&self, id: &str) -> Result<DeletedResponse, ApiError> {
        self.delete(&["v1", "projects", id]).await
    }

    pub async fn get_project_counters(
        &self,
        id: &str,
        period: &CounterPeriod,
    ) -> Result<ProjectCounters, ApiError> {
        self.get_with(&["v1", "projects", id, "counters"], period.query_fields())
            .await
    }

    pub async fn get_project_component_counters(
        &self,
        id: &str,
        component_id: &str,
        period: &CounterPeriod,
    ) -> Result<ProjectComponentCounters, ApiError> {
        self.get_with(
            &["v1", "projects", id, "components", component_id, "counters"],
            period.query_fields(),
        )
        .await
    }

    // Domains

    pub async fn list_project_domains(&self, id: &str) -> Result<DomainListResponse, ApiError> {
        self.get(&["v1", "projects", id, "domains"]).await
    }

    pub async fn get_project_domain(&self, id: &str, name: &str) -> Result<Domain, ApiError> {
        self.get(&["v1", "projects", id, "domains", name]).await
    }

    pub async fn create_project_domain(
        &self,
        id: &str,
        input: &DomainCreateInput,
    ) -> Result<Domain, ApiError> {
        self.post(&["v1", "projects", id, "domains"], input).await
    }

    pub async fn update_project_domain(
        &self,
        id: &str,
        name: &str,
        input: &DomainUpdateInput,
    ) -> Result<Domain, ApiError> {
        self.post(&["v1", "projects", id, "domains", name], input)
            .await
    }

    pub async fn delete_project_domain(
        &self,
        id: &str,
        name: &str,
    ) -> Result<DeletedResponse, ApiError> {
        self.delete(&["v1", "projects", id, "domains", name]).await
    }

    // Proxy settings

    pub async fn list_project_proxy_settings(
        &self,
        id: &str,
    ) -> Result<ProxySettingsListResponse, ApiError> {
        self.get(&["v1", "projects", id, "proxy-settings"]).await
    }

    pub async fn create_project_proxy_settings(
        &self,
        id: &str,
        input: &ProxySettingsCreateInput,
    ) -> Result<ProxySettings, ApiError> {
        self.post(&["v1", "projects", id, "proxy-settings"], input)
            .await
    }

    /// Updates one revision; revisions are addressed by their number.
    pub async fn update_project_proxy_settings(
        &self,
        id: &str,
        revision: &str,
        input: &ProxySettingsUpdateInput,
    ) -> Result<ProxySettings, ApiError> {
        self.post(&["v1", "projects", id, "proxy-settings", revision], input)
            .await
    }

    // Components enabled on a project

    pub async fn list_project_components(
        &self,
        id: &str,
        filter: &ComponentFilter,
    ) -> Result<ProjectComponentListResponse, ApiError> {
        self.get_with(&["v1", "projects", id, "components"], filter.query_fields())
            .await
    }

    pub async fn get_project_component(
        &self,
        id: &str,
        component_id: &str,
    ) -> Result<ProjectComponent, ApiError> {
        self.get(&["v1", "projects", id, "components", component_id])
            .await
    }

    pub async fn create_project_component(
        &self,
        id: &str,
        input: &ProjectComponentCreateInput,
    ) -> Result<ProjectComponent, ApiError> {
        self.post(&["v1", "projects", id, "components"], input).await
    }

    pub async fn update_project_component(
        &self,
        id: &str,
        component_id: &str,
        input: &ProjectComponentUpdateInput,
    ) -> Result<ProjectComponent, ApiError> {
        self.post(&["v1", "projects", id, "components", component_id], input)
            .await
    }

    pub async fn delete_project_component(
        &self,
        id: &str,
        component_id: &str,
    ) -> Result<DeletedResponse, ApiError> {
        self.delete(&["v1", "projects", id, "components", component_id])
            .await
    }

    // Data collection debugging

    pub async fn get_incoming_data_collection_events(
        &self,
        id: &str,
        params: &ListParams,
    ) -> Result<IncomingDataCollectionEventListResponse, ApiError> {
        self.get_with(
            &["v1", "projects", id, "debug", "data-collection", "incoming"],
            params.query_fields(),
        )
        .await
    }

    /// Component fan-out of a single incoming event.
    pub async fn get_outgoing_data_collection_events(
        &self,
        id: &str,
        event_id: &str,
        params: &ListParams,
    ) -> Result<OutgoingDataCollectionEventListResponse, ApiError> {
        self.get_with(
            &[
                "v1",
                "projects",
                id,
                "debug",
                "data-collection",
                "outgoing",
                event_id,
            ],
            params.query_fields(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use edgee_core::component::{ComponentCategory, ComponentSubcategory};
    use edgee_core::data_collection::EventKind;
    use edgee_core::project::ProjectSettings;
    use serde_json::json;

    use super::*;
    use crate::catalog::fixtures::{DELETED, client_for, empty_list};
    use crate::test_support::MockApi;

    fn project_json() -> String {
        json!({
            "object": "project",
            "id": "prj_1",
            "organization_id": "org_1",
            "slug": "shop",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z",
            "force_https": true
        })
        .to_string()
    }

    #[tokio::test]
    async fn get_project_passes_organization_only_when_given() {
        let mock = MockApi::start(200, project_json()).await;
        let client = client_for(&mock);

        let project = client.get_project("prj_1", None).await.unwrap();
        client.get_project("prj_1", Some("org_1")).await.unwrap();

        assert_eq!(project.settings.force_https, Some(true));
        let requests = mock.requests();
        assert_eq!(requests[0].path, "/v1/projects/prj_1");
        assert_eq!(requests[0].query, None);
        assert_eq!(requests[1].query.as_deref(), Some("organization_id=org_1"));
    }

    #[tokio::test]
    async fn update_project_posts_settings_flat() {
        let mock = MockApi::start(200, project_json()).await;
        let client = client_for(&mock);
        let input = ProjectUpdateInput {
            id: "prj_1".to_string(),
            slug: None,
            description: Some("Storefront".to_string()),
            external_project_url: None,
            settings: ProjectSettings {
                force_https: Some(true),
                ..Default::default()
            },
        };

        client.update_project("prj_1", &input).await.unwrap();

        let req = mock.last_request();
        assert_eq!(req.method, "POST");
        assert_eq!(
            req.json_body(),
            json!({"id": "prj_1", "description": "Storefront", "force_https": true})
        );
    }

    #[tokio::test]
    async fn counters_forward_period() {
        let mock = MockApi::start(
            200,
            r#"{"object":"project_counters","request_count":12,"event_count":30,"month":"2024-05","project_id":"prj_1"}"#,
        )
        .await;
        let client = client_for(&mock);
        let period = CounterPeriod {
            month: Some("2024-05".to_string()),
            day: None,
        };

        let counters = client.get_project_counters("prj_1", &period).await.unwrap();

        assert_eq!(counters.event_count, 30);
        let req = mock.last_request();
        assert_eq!(req.path, "/v1/projects/prj_1/counters");
        assert_eq!(req.query.as_deref(), Some("month=2024-05"));
    }

    #[tokio::test]
    async fn domain_routes_use_domain_name_segment() {
        let domain = json!({
            "object": "domain",
            "name": "www.example.com",
            "project_id": "prj_1",
            "dns_status": true,
            "ssl_status": false,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
        .to_string();
        let mock = MockApi::start_with(move |req| match req.method.as_str() {
            "DELETE" => (200, DELETED.to_string()),
            _ => (200, domain.clone()),
        })
        .await;
        let client = client_for(&mock);

        client
            .get_project_domain("prj_1", "www.example.com")
            .await
            .unwrap();
        client
            .update_project_domain(
                "prj_1",
                "www.example.com",
                &DomainUpdateInput {
                    dns_status: Some(true),
                    ssl_status: None,
                },
            )
            .await
            .unwrap();
        client
            .delete_project_domain("prj_1", "www.example.com")
            .await
            .unwrap();

        let requests = mock.requests();
        assert!(
            requests
                .iter()
                .all(|r| r.path == "/v1/projects/prj_1/domains/www.example.com")
        );
        assert_eq!(requests[1].method, "POST");
        assert_eq!(requests[1].json_body(), json!({"dns_status": true}));
        assert_eq!(requests[2].method, "DELETE");
    }

    #[tokio::test]
    async fn proxy_settings_update_addresses_revision() {
        let mock = MockApi::start(
            200,
            r#"{"object":"proxy_settings","revision":3,"description":"v3","is_active":true,"backends":[],"routes":[]}"#,
        )
        .await;
        let client = client_for(&mock);

        let settings = client
            .update_project_proxy_settings(
                "prj_1",
                "3",
                &ProxySettingsUpdateInput {
                    description: None,
                    is_active: Some(true),
                },
            )
            .await
            .unwrap();

        assert_eq!(settings.revision, 3);
        let req = mock.last_request();
        assert_eq!(req.method, "POST");
        assert_eq!(req.path, "/v1/projects/prj_1/proxy-settings/3");
        assert_eq!(req.json_body(), json!({"is_active": true}));
    }

    #[tokio::test]
    async fn project_components_filter_and_update() {
        let component = json!({
            "component_id": "cmp_1",
            "component_slug": "ga",
            "component_version": "1.2.0",
            "category": "data_collection",
            "subcategory": "analytics",
            "active": true
        })
        .to_string();
        let mock = MockApi::start_with(move |req| match req.method.as_str() {
            "GET" => (200, empty_list("/v1/projects/prj_1/components")),
            _ => (200, component.clone()),
        })
        .await;
        let client = client_for(&mock);

        let filter = ComponentFilter {
            category: Some(ComponentCategory::DataCollection),
            subcategory: Some(ComponentSubcategory::ConversionApi),
        };
        client.list_project_components("prj_1", &filter).await.unwrap();
        let updated = client
            .update_project_component(
                "prj_1",
                "cmp_1",
                &ProjectComponentUpdateInput {
                    component_version: None,
                    active: Some(false),
                    settings: None,
                },
            )
            .await
            .unwrap();

        assert!(updated.active);
        let requests = mock.requests();
        assert_eq!(
            requests[0].query.as_deref(),
            Some("category=data_collection&subcategory=conversion+api")
        );
        assert_eq!(requests[1].method, "POST");
        assert_eq!(requests[1].path, "/v1/projects/prj_1/components/cmp_1");
    }

    #[tokio::test]
    async fn incoming_events_decode_and_paginate() {
        let body = json!({
            "object": "list",
            "url": "/v1/projects/prj_1/debug/data-collection/incoming",
            "has_more": true,
            "last_key": "cursor-2",
            "data": [{
                "object": "incoming_event",
                "uuid": "evt_1",
                "timestamp": "2024-01-01T00:00:00Z",
                "type": "page",
                "from": "client",
                "data": {"path": "/"},
                "context": {}
            }]
        })
        .to_string();
        let mock = MockApi::start(200, body).await;
        let client = client_for(&mock);
        let params = ListParams {
            limit: Some(1),
            ..Default::default()
        };

        let page = client
            .get_incoming_data_collection_events("prj_1", &params)
            .await
            .unwrap();

        assert!(page.has_more);
        assert_eq!(page.last_key.as_deref(), Some("cursor-2"));
        assert_eq!(page.data[0].kind, EventKind::Page);
        let req = mock.last_request();
        assert_eq!(req.path, "/v1/projects/prj_1/debug/data-collection/incoming");
        assert_eq!(req.query.as_deref(), Some("limit=1"));
    }

    #[tokio::test]
    async fn outgoing_events_address_event() {
        let mock = MockApi::start(
            200,
            empty_list("/v1/projects/prj_1/debug/data-collection/outgoing/evt_1"),
        )
        .await;
        let client = client_for(&mock);

        client
            .get_outgoing_data_collection_events("prj_1", "evt_1", &ListParams::default())
            .await
            .unwrap();

        assert_eq!(
            mock.last_request().path,
            "/v1/projects/prj_1/debug/data-collection/outgoing/evt_1"
        );
    }

    #[tokio::test]
    async fn delete_project_component_sends_no_body() {
        let mock = MockApi::start(200, DELETED).await;
        let client = client_for(&mock);

        client
            .delete_project_component("prj_1", "cmp_1")
            .await
            .unwrap();

        let req = mock.last_request();
        assert_eq!(req.method, "DELETE");
        assert!(req.header("content-type").is_none());
    }
}
