use crate::models::property_tag::{self, Entity as PropertyTag};
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
pub struct CreateTagRequest {
    name: String,
    color: Option<i32>,
}

pub async fn list_tags(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    match PropertyTag::find()
        .order_by_asc(property_tag::Column::Name)
        .all(&db)
        .await
    {
        Ok(tags) => (StatusCode::OK, Json(tags)).into_response(),
        Err(e) => error_response(ServiceError::from(e)),
    }
}

pub async fn create_tag(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<CreateTagRequest>,
) -> impl IntoResponse {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "success": false, "error": "The name is required" })),
        )
            .into_response();
    }

    // Tag names are unique
    let existing = match PropertyTag::find()
        .filter(property_tag::Column::Name.eq(name.clone()))
        .one(&db)
        .await
    {
        Ok(found) => found,
        Err(e) => return error_response(ServiceError::from(e)),
    };
    if existing.is_some() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "success": false, "error": "The tag already in use" })),
        )
            .into_response();
    }

    let now = chrono::Utc::now().to_rfc3339();
    let tag = property_tag::ActiveModel {
        name: Set(name),
        color: Set(payload.color.unwrap_or(0)),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    match tag.insert(&db).await {
        Ok(model) => (StatusCode::CREATED, Json(model)).into_response(),
        Err(e) => error_response(ServiceError::from(e)),
    }
}

pub async fn get_tag(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match PropertyTag::find_by_id(id).one(&db).await {
        Ok(Some(tag)) => (StatusCode::OK, Json(tag)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Tag not found" })),
        )
            .into_response(),
        Err(e) => error_response(ServiceError::from(e)),
    }
}

pub async fn delete_tag(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match PropertyTag::find_by_id(id).one(&db).await {
        Ok(Some(tag)) => match tag.delete(&db).await {
            Ok(_) => (StatusCode::OK, Json(json!({ "message": "Tag deleted" }))).into_response(),
            Err(e) => error_response(ServiceError::from(e)),
        },
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Tag not found" })),
        )
            .into_response(),
        Err(e) => error_response(ServiceError::from(e)),
    }
}
