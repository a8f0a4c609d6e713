use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use super::models::ChampionshipConfiguration;
use super::types::{
    ConfigurationResponse, CreateConfigurationRequest, ListConfigurationsQuery,
    UpdateConfigurationRequest,
};
use crate::shared::{AppError, AppState};

/// HTTP handler returning the active grouping strategy name
///
/// GET /api/championships/strategy
#[instrument(name = "get_strategy", skip(state))]
pub async fn get_strategy(State(state): State<AppState>) -> Json<String> {
    Json(state.settings.grouping_strategy.to_string())
}

/// HTTP handler for listing championship configurations
///
/// GET /api/championships/configurations?include_expired=false
#[instrument(name = "list_configurations", skip(state))]
pub async fn list_configurations(
    State(state): State<AppState>,
    Query(query): Query<ListConfigurationsQuery>,
) -> Result<Json<Vec<ConfigurationResponse>>, AppError> {
    let configurations = state
        .configuration_store
        .get_all(query.include_expired)
        .await?;

    Ok(Json(
        configurations
            .into_iter()
            .map(ConfigurationResponse::from)
            .collect(),
    ))
}

/// HTTP handler for fetching one championship configuration
///
/// GET /api/championships/configurations/{id}
#[instrument(name = "get_configuration", skip(state))]
pub async fn get_configuration(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ConfigurationResponse>, AppError> {
    let config = state.configuration_store.get(&id).await?.ok_or_else(|| {
        AppError::NotFound(format!(
            "Championship configuration with ID '{}' not found",
            id
        ))
    })?;

    Ok(Json(config.into()))
}

/// HTTP handler for creating a championship configuration
///
/// POST /api/championships/configurations
#[instrument(name = "create_configuration", skip(state, request))]
pub async fn create_configuration(
    State(state): State<AppState>,
    Json(request): Json<CreateConfigurationRequest>,
) -> Result<(StatusCode, Json<ConfigurationResponse>), AppError> {
    let config = ChampionshipConfiguration::new(
        request.name,
        request.start_date,
        request.end_date,
    );

    state.configuration_store.add(&config).await?;

    info!(config_id = %config.id, name = %config.name, "Championship configuration created");
    Ok((StatusCode::CREATED, Json(config.into())))
}

/// HTTP handler for updating a championship configuration
///
/// PUT /api/championships/configurations/{id}
#[instrument(name = "update_configuration", skip(state, request))]
pub async fn update_configuration(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateConfigurationRequest>,
) -> Result<Json<ConfigurationResponse>, AppError> {
    let updated = state
        .configuration_store
        .update(&id, request.name, request.start_date, request.end_date)
        .await?;

    Ok(Json(updated.into()))
}

/// HTTP handler for deleting a championship configuration
///
/// DELETE /api/championships/configurations/{id}
#[instrument(name = "delete_configuration", skip(state))]
pub async fn delete_configuration(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let existed = state.configuration_store.remove(&id).await?;
    if !existed {
        return Err(AppError::NotFound(format!(
            "Championship configuration with ID '{}' not found",
            id
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::{get, post},
        Router,
    };
    use tower::ServiceExt; // for `oneshot`

    fn router(state: AppState) -> Router {
        Router::new()
            .route(
                "/api/championships/configurations",
                post(create_configuration).get(list_configurations),
            )
            .route(
                "/api/championships/configurations/:id",
                get(get_configuration)
                    .put(update_configuration)
                    .delete(delete_configuration),
            )
            .route("/api/championships/strategy", get(get_strategy))
            .with_state(state)
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn response_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_create_configuration_returns_created() {
        let app = router(AppStateBuilder::new().build().await);

        let request = json_request(
            "POST",
            "/api/championships/configurations",
            r#"{"name": "January Cup", "start_date": "2025-01-01", "end_date": "2025-01-31"}"#,
        );
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let created: ConfigurationResponse = response_json(response).await;
        assert_eq!(created.name, "January Cup");
        assert!(!created.id.is_empty());
    }

    #[tokio::test]
    async fn test_create_configuration_rejects_blank_name() {
        let app = router(AppStateBuilder::new().build().await);

        let request = json_request(
            "POST",
            "/api/championships/configurations",
            r#"{"name": "  ", "start_date": "2025-01-01", "end_date": "2025-01-31"}"#,
        );
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_configuration_rejects_inverted_range() {
        let app = router(AppStateBuilder::new().build().await);

        let request = json_request(
            "POST",
            "/api/championships/configurations",
            r#"{"name": "Backwards", "start_date": "2025-02-01", "end_date": "2025-01-01"}"#,
        );
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_overlapping_configuration_returns_conflict() {
        let app = router(AppStateBuilder::new().build().await);

        let first = json_request(
            "POST",
            "/api/championships/configurations",
            r#"{"name": "January Cup", "start_date": "2025-01-01", "end_date": "2025-01-31"}"#,
        );
        let response = app.clone().oneshot(first).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let overlapping = json_request(
            "POST",
            "/api/championships/configurations",
            r#"{"name": "Touching", "start_date": "2025-01-31", "end_date": "2025-02-15"}"#,
        );
        let response = app.oneshot(overlapping).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body: serde_json::Value = response_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("January Cup"));
    }

    #[tokio::test]
    async fn test_get_configuration_not_found() {
        let app = router(AppStateBuilder::new().build().await);

        let request = Request::builder()
            .method("GET")
            .uri("/api/championships/configurations/missing")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_and_delete_configuration() {
        let app = router(AppStateBuilder::new().build().await);

        let create = json_request(
            "POST",
            "/api/championships/configurations",
            r#"{"name": "Spring Cup", "start_date": "2025-03-01", "end_date": "2025-03-31"}"#,
        );
        let response = app.clone().oneshot(create).await.unwrap();
        let created: ConfigurationResponse = response_json(response).await;

        let update = json_request(
            "PUT",
            &format!("/api/championships/configurations/{}", created.id),
            r#"{"name": "Spring Cup 2", "start_date": "2025-03-05", "end_date": "2025-03-25"}"#,
        );
        let response = app.clone().oneshot(update).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated: ConfigurationResponse = response_json(response).await;
        assert_eq!(updated.name, "Spring Cup 2");
        assert_eq!(updated.id, created.id);

        let delete = Request::builder()
            .method("DELETE")
            .uri(format!("/api/championships/configurations/{}", created.id))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(delete).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        // Deleting again reports not found.
        let delete_again = Request::builder()
            .method("DELETE")
            .uri(format!("/api/championships/configurations/{}", created.id))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(delete_again).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_configurations_filters_expired() {
        let app = router(AppStateBuilder::new().build().await);

        let past = json_request(
            "POST",
            "/api/championships/configurations",
            r#"{"name": "Ancient", "start_date": "2001-01-01", "end_date": "2001-12-31"}"#,
        );
        app.clone().oneshot(past).await.unwrap();

        let future = json_request(
            "POST",
            "/api/championships/configurations",
            r#"{"name": "Upcoming", "start_date": "2099-01-01", "end_date": "2099-12-31"}"#,
        );
        app.clone().oneshot(future).await.unwrap();

        let request = Request::builder()
            .method("GET")
            .uri("/api/championships/configurations?include_expired=false")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let active: Vec<ConfigurationResponse> = response_json(response).await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Upcoming");

        let request = Request::builder()
            .method("GET")
            .uri("/api/championships/configurations")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let all: Vec<ConfigurationResponse> = response_json(response).await;
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_get_strategy_reports_active_kind() {
        let app = router(AppStateBuilder::new().build().await);

        let request = Request::builder()
            .method("GET")
            .uri("/api/championships/strategy")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let strategy: String = response_json(response).await;
        assert_eq!(strategy, "Monthly");
    }
}
