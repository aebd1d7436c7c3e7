use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::api::error_response;
use crate::services::property_service;

/// GET /api/users/:id/properties - available listings sold by this user
pub async fn list_user_properties(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match property_service::list_seller_properties(&db, id).await {
        Ok(properties) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "properties": properties,
                "count": properties.len()
            })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
