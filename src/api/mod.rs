pub mod health;
pub mod offer;
pub mod partner;
pub mod property;
pub mod property_type;
pub mod tag;
pub mod user;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::services::ServiceError;

/// Translate a service failure into an HTTP response.
/// Validation -> 422, business-rule rejection -> 400, missing record -> 404.
pub(crate) fn error_response(err: ServiceError) -> Response {
    let (status, message) = match err {
        ServiceError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
        ServiceError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
        ServiceError::InvalidState(msg) => (StatusCode::BAD_REQUEST, msg),
        ServiceError::Database(msg) => {
            tracing::error!("database error: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal error".to_string(),
            )
        }
    };
    (status, Json(json!({ "success": false, "error": message }))).into_response()
}

pub fn api_router(db: DatabaseConnection) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Properties
        .route(
            "/properties",
            get(property::list_properties).post(property::create_property),
        )
        .route(
            "/properties/garden-defaults",
            get(property::garden_defaults),
        )
        .route(
            "/properties/:id",
            get(property::get_property)
                .put(property::update_property)
                .delete(property::delete_property),
        )
        .route("/properties/:id/sold", post(property::sold))
        .route("/properties/:id/cancel", post(property::cancel))
        .route(
            "/properties/:id/tags/:tag_id",
            post(property::attach_tag).delete(property::detach_tag),
        )
        // Offers
        .route("/offers", get(offer::list_offers).post(offer::create_offer))
        .route("/offers/:id", get(offer::get_offer))
        .route("/offers/:id/confirm", post(offer::confirm_offer))
        .route("/offers/:id/refuse", post(offer::refuse_offer))
        // Property types
        .route(
            "/property-types",
            get(property_type::list_types).post(property_type::create_type),
        )
        .route(
            "/property-types/:id",
            get(property_type::get_type).delete(property_type::delete_type),
        )
        .route(
            "/property-types/:id/offers",
            get(property_type::list_type_offers),
        )
        // Tags
        .route("/tags", get(tag::list_tags).post(tag::create_tag))
        .route("/tags/:id", get(tag::get_tag).delete(tag::delete_tag))
        // Partners
        .route(
            "/partners",
            get(partner::list_partners).post(partner::create_partner),
        )
        .route("/partners/:id", get(partner::get_partner))
        // Users
        .route("/users/:id/properties", get(user::list_user_properties))
        .with_state(db)
}
