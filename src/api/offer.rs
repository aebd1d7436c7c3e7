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
use crate::models::offer::{OfferDraft, OfferStatus};
use crate::services::offer_service::{self, OfferFilter};

/// Query parameters for listing offers
#[derive(Debug, Deserialize)]
pub struct ListOffersQuery {
    pub property_id: Option<i32>,
    pub property_type_id: Option<i32>,
    pub partner_id: Option<i32>,
    pub status: Option<OfferStatus>,
}

/// POST /api/offers - Place a bid on a property
pub async fn create_offer(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<OfferDraft>,
) -> impl IntoResponse {
    match offer_service::create_offer(&db, payload).await {
        Ok(off) => (
            StatusCode::CREATED,
            Json(json!({ "success": true, "offer": off })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/offers - List offers, highest price first
pub async fn list_offers(
    State(db): State<DatabaseConnection>,
    Query(params): Query<ListOffersQuery>,
) -> impl IntoResponse {
    let filter = OfferFilter {
        property_id: params.property_id,
        property_type_id: params.property_type_id,
        partner_id: params.partner_id,
        status: params.status,
    };

    match offer_service::list_offers(&db, filter).await {
        Ok(offers) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "offers": offers,
                "count": offers.len()
            })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/offers/:id
pub async fn get_offer(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match offer_service::get_offer(&db, id).await {
        Ok(off) => (StatusCode::OK, Json(off)).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/offers/:id/confirm - Accept the offer and close the deal terms
/// onto the parent property
pub async fn confirm_offer(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match offer_service::confirm_offer(&db, id).await {
        Ok(off) => (
            StatusCode::OK,
            Json(json!({ "success": true, "offer": off })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/offers/:id/refuse
pub async fn refuse_offer(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match offer_service::refuse_offer(&db, id).await {
        Ok(off) => (
            StatusCode::OK,
            Json(json!({ "success": true, "offer": off })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
