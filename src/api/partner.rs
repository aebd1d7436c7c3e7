use crate::models::partner::{self, Entity as Partner};
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
use crate::services::ServiceError;

#[derive(Deserialize)]
pub struct CreatePartnerRequest {
    name: String,
    email: Option<String>,
    phone: Option<String>,
}

pub async fn list_partners(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    match Partner::find()
        .order_by_asc(partner::Column::Name)
        .all(&db)
        .await
    {
        Ok(partners) => (StatusCode::OK, Json(partners)).into_response(),
        Err(e) => error_response(ServiceError::from(e)),
    }
}

pub async fn create_partner(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<CreatePartnerRequest>,
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
    let new_partner = partner::ActiveModel {
        name: Set(name),
        email: Set(payload.email),
        phone: Set(payload.phone),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_partner.insert(&db).await {
        Ok(model) => (StatusCode::CREATED, Json(model)).into_response(),
        Err(e) => error_response(ServiceError::from(e)),
    }
}

pub async fn get_partner(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match Partner::find_by_id(id).one(&db).await {
        Ok(Some(model)) => (StatusCode::OK, Json(model)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Partner not found" })),
        )
            .into_response(),
        Err(e) => error_response(ServiceError::from(e)),
    }
}
