use crate::models::property_type::{self, Entity as PropertyType};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sea_orm::*;
use serde::Deserialize;
use serde_json::json;

use crate::api::error_response;
use crate::services::offer_service::{self, OfferFilter};
use crate::services::ServiceError;

#[derive(Deserialize)]
pub struct CreateTypeRequest {
    name: String,
    sequence: Option<i32>,
}

/// GET /api/property-types - ordered by sequence, then name
pub async fn list_types(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    match PropertyType::find()
        .order_by_asc(property_type::Column::Sequence)
        .order_by_asc(property_type::Column::Name)
        .all(&db)
        .await
    {
        Ok(types) => (StatusCode::OK, Json(types)).into_response(),
        Err(e) => error_response(ServiceError::from(e)),
    }
}

/// POST /api/property-types
pub async fn create_type(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<CreateTypeRequest>,
) -> impl IntoResponse {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "success": false, "error": "The name is required" })),
        )
            .into_response();
    }

    let now = chrono::Utc::now().to_rfc3339();
    let property_type = property_type::ActiveModel {
        name: Set(name),
        sequence: Set(payload.sequence.unwrap_or(1)),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    match property_type.insert(&db).await {
        Ok(model) => (StatusCode::CREATED, Json(model)).into_response(),
        Err(e) => error_response(ServiceError::from(e)),
    }
}

/// GET /api/property-types/:id - includes the derived offer count
pub async fn get_type(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let property_type = match PropertyType::find_by_id(id).one(&db).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Property type not found" })),
            )
                .into_response();
        }
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match offer_service::count_offers_for_type(&db, id).await {
        Ok(offer_count) => (
            StatusCode::OK,
            Json(json!({
                "id": property_type.id,
                "name": property_type.name,
                "sequence": property_type.sequence,
                "offer_count": offer_count,
                "created_at": property_type.created_at,
                "updated_at": property_type.updated_at,
            })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/property-types/:id/offers - offers placed on properties of this type
pub async fn list_type_offers(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let filter = OfferFilter {
        property_type_id: Some(id),
        ..Default::default()
    };
    match offer_service::list_offers(&db, filter).await {
        Ok(offers) => (
            StatusCode::OK,
            Json(json!({ "success": true, "offers": offers, "count": offers.len() })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE /api/property-types/:id
pub async fn delete_type(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match PropertyType::find_by_id(id).one(&db).await {
        Ok(Some(property_type)) => match property_type.delete(&db).await {
            Ok(_) => (
                StatusCode::OK,
                Json(json!({ "message": "Property type deleted" })),
            )
                .into_response(),
            Err(e) => error_response(ServiceError::from(e)),
        },
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Property type not found" })),
        )
            .into_response(),
        Err(e) => error_response(ServiceError::from(e)),
    }
}
