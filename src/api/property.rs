use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;

use crate::api::error_response;
use crate::models::property::{PropertyDraft, PropertyPatch, PropertyState};
use crate::services::property_service::{self, PropertyFilter};

/// Query parameters for listing properties
#[derive(Debug, Deserialize)]
pub struct ListPropertiesQuery {
    pub state: Option<PropertyState>,
    pub property_type_id: Option<i32>,
    pub seller_id: Option<i32>,
    pub postcode: Option<String>,
    pub min_expected_price: Option<f64>,
    pub max_expected_price: Option<f64>,
    pub available: Option<bool>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct GardenDefaultsQuery {
    pub garden: bool,
}

/// POST /api/properties - Create a listing
#[utoipa::path(
    post,
    path = "/api/properties",
    responses(
        (status = 201, description = "Property created"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_property(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<PropertyDraft>,
) -> impl IntoResponse {
    match property_service::create_property(&db, payload).await {
        Ok(prop) => (
            StatusCode::CREATED,
            Json(json!({ "success": true, "property": prop })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/properties - List listings with optional filters
#[utoipa::path(
    get,
    path = "/api/properties",
    responses(
        (status = 200, description = "Matching properties")
    )
)]
pub async fn list_properties(
    State(db): State<DatabaseConnection>,
    Query(params): Query<ListPropertiesQuery>,
) -> impl IntoResponse {
    let filter = PropertyFilter {
        state: params.state,
        property_type_id: params.property_type_id,
        seller_id: params.seller_id,
        postcode: params.postcode,
        min_expected_price: params.min_expected_price,
        max_expected_price: params.max_expected_price,
        available: params.available,
        active: params.active,
    };

    match property_service::list_properties(&db, filter).await {
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

/// GET /api/properties/:id - Fetch one listing with its offers and tags
#[utoipa::path(
    get,
    path = "/api/properties/{id}",
    params(("id" = i32, Path, description = "Property id")),
    responses(
        (status = 200, description = "Property with offers and tags"),
        (status = 404, description = "Property not found")
    )
)]
pub async fn get_property(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match property_service::get_property_details(&db, id).await {
        Ok(details) => (StatusCode::OK, Json(details)).into_response(),
        Err(e) => error_response(e),
    }
}

/// PUT /api/properties/:id - Partial update
#[utoipa::path(
    put,
    path = "/api/properties/{id}",
    params(("id" = i32, Path, description = "Property id")),
    responses(
        (status = 200, description = "Property updated"),
        (status = 404, description = "Property not found"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn update_property(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<PropertyPatch>,
) -> impl IntoResponse {
    match property_service::update_property(&db, id, payload).await {
        Ok(prop) => (
            StatusCode::OK,
            Json(json!({ "success": true, "property": prop })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE /api/properties/:id - Delete (only in state new/cancelled)
#[utoipa::path(
    delete,
    path = "/api/properties/{id}",
    params(("id" = i32, Path, description = "Property id")),
    responses(
        (status = 200, description = "Property and its offers deleted"),
        (status = 400, description = "Property is not in a deletable state"),
        (status = 404, description = "Property not found")
    )
)]
pub async fn delete_property(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match property_service::delete_property(&db, id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "Property deleted" })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/properties/:id/sold
#[utoipa::path(
    post,
    path = "/api/properties/{id}/sold",
    params(("id" = i32, Path, description = "Property id")),
    responses(
        (status = 200, description = "Property marked sold"),
        (status = 400, description = "Property already sold or cancelled"),
        (status = 404, description = "Property not found")
    )
)]
pub async fn sold(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match property_service::mark_sold(&db, id).await {
        Ok(prop) => (
            StatusCode::OK,
            Json(json!({ "success": true, "property": prop })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/properties/:id/cancel
#[utoipa::path(
    post,
    path = "/api/properties/{id}/cancel",
    params(("id" = i32, Path, description = "Property id")),
    responses(
        (status = 200, description = "Property cancelled"),
        (status = 400, description = "Property already sold or cancelled"),
        (status = 404, description = "Property not found")
    )
)]
pub async fn cancel(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match property_service::mark_cancelled(&db, id).await {
        Ok(prop) => (
            StatusCode::OK,
            Json(json!({ "success": true, "property": prop })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/properties/garden-defaults - Advisory form defaults for the
/// garden toggle; nothing is persisted
#[utoipa::path(
    get,
    path = "/api/properties/garden-defaults",
    responses(
        (status = 200, description = "Suggested garden area and orientation")
    )
)]
pub async fn garden_defaults(Query(params): Query<GardenDefaultsQuery>) -> impl IntoResponse {
    let suggestion = property_service::garden_defaults(params.garden);
    (StatusCode::OK, Json(suggestion)).into_response()
}

/// POST /api/properties/:id/tags/:tag_id
pub async fn attach_tag(
    State(db): State<DatabaseConnection>,
    Path((id, tag_id)): Path<(i32, i32)>,
) -> impl IntoResponse {
    match property_service::attach_tag(&db, id, tag_id).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE /api/properties/:id/tags/:tag_id
pub async fn detach_tag(
    State(db): State<DatabaseConnection>,
    Path((id, tag_id)): Path<(i32, i32)>,
) -> impl IntoResponse {
    match property_service::detach_tag(&db, id, tag_id).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(e) => error_response(e),
    }
}
