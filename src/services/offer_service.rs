//! Offer Service - Admission control and offer/property state transitions
//!
//! Creating an offer is a single transaction: admission check, the forced
//! "offer received" transition on the parent, the insert and the best_price
//! refresh either all apply or none do.

use chrono::{Duration, Utc};
use sea_orm::*;

use crate::models::offer::{self, Entity as Offer, OfferDraft, OfferStatus};
use crate::models::partner::Entity as Partner;
use crate::models::property::{self, Entity as Property, PropertyState};
use crate::services::property_service;
use crate::services::ServiceError;

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

/// Filter parameters for listing offers
#[derive(Debug, Default, Clone)]
pub struct OfferFilter {
    pub property_id: Option<i32>,
    pub property_type_id: Option<i32>,
    pub partner_id: Option<i32>,
    pub status: Option<OfferStatus>,
}

/// Admission predicate: an incoming bid is refused when any existing offer on
/// the property is strictly higher. Ties and first offers pass.
pub async fn has_higher_offer<C: ConnectionTrait>(
    conn: &C,
    property_id: i32,
    price: f64,
) -> Result<bool, ServiceError> {
    let count = Offer::find()
        .filter(offer::Column::PropertyId.eq(property_id))
        .filter(offer::Column::Price.gt(price))
        .count(conn)
        .await?;
    Ok(count > 0)
}

/// Side effect of a successful admission: the parent property is moved to
/// "offer received" unconditionally, whatever its current state.
async fn mark_offer_received<C: ConnectionTrait>(
    conn: &C,
    prop: property::Model,
) -> Result<(), ServiceError> {
    let mut active_model: property::ActiveModel = prop.into();
    active_model.state = Set(PropertyState::OfferReceived);
    active_model.updated_at = Set(now_rfc3339());
    active_model.update(conn).await?;
    Ok(())
}

/// Place a bid on a property
pub async fn create_offer(
    db: &DatabaseConnection,
    draft: OfferDraft,
) -> Result<offer::Model, ServiceError> {
    if draft.price <= 0.0 {
        return Err(ServiceError::Validation(
            "The price must be positive".to_string(),
        ));
    }
    let validity = draft.validity.unwrap_or(7);
    if validity <= 0 {
        return Err(ServiceError::Validation(
            "The validity must be positive".to_string(),
        ));
    }

    let txn = db.begin().await?;

    let prop = Property::find_by_id(draft.property_id)
        .one(&txn)
        .await?
        .ok_or(ServiceError::NotFound)?;
    Partner::find_by_id(draft.partner_id)
        .one(&txn)
        .await?
        .ok_or(ServiceError::NotFound)?;

    if has_higher_offer(&txn, prop.id, draft.price).await? {
        return Err(ServiceError::InvalidState("Price too low".to_string()));
    }

    let property_id = prop.id;
    let property_type_id = prop.property_type_id;
    mark_offer_received(&txn, prop).await?;

    let deadline = property_service::today() + Duration::days(validity as i64);
    let now = now_rfc3339();
    let new_offer = offer::ActiveModel {
        price: Set(draft.price),
        status: Set(None),
        partner_id: Set(draft.partner_id),
        property_id: Set(property_id),
        validity: Set(validity),
        date_deadline: Set(deadline.to_string()),
        property_type_id: Set(property_type_id),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    let saved = new_offer.insert(&txn).await?;

    property_service::refresh_best_price(&txn, property_id).await?;

    txn.commit().await?;
    tracing::info!(offer_id = saved.id, property_id, "offer placed");
    Ok(saved)
}

pub async fn get_offer(db: &DatabaseConnection, id: i32) -> Result<offer::Model, ServiceError> {
    Offer::find_by_id(id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)
}

pub async fn list_offers(
    db: &DatabaseConnection,
    filter: OfferFilter,
) -> Result<Vec<offer::Model>, ServiceError> {
    let mut condition = Condition::all();

    if let Some(property_id) = filter.property_id {
        condition = condition.add(offer::Column::PropertyId.eq(property_id));
    }
    if let Some(type_id) = filter.property_type_id {
        condition = condition.add(offer::Column::PropertyTypeId.eq(type_id));
    }
    if let Some(partner_id) = filter.partner_id {
        condition = condition.add(offer::Column::PartnerId.eq(partner_id));
    }
    if let Some(status) = filter.status {
        condition = condition.add(offer::Column::Status.eq(status));
    }

    let offers = Offer::find()
        .filter(condition)
        .order_by_desc(offer::Column::Price)
        .all(db)
        .await?;
    Ok(offers)
}

/// action_confirm: marks the offer accepted and pushes buyer, selling price
/// and the "offer accepted" state onto the parent property. The selling
/// price floor still applies through the property write.
pub async fn confirm_offer(
    db: &DatabaseConnection,
    id: i32,
) -> Result<offer::Model, ServiceError> {
    let txn = db.begin().await?;

    let off = Offer::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(ServiceError::NotFound)?;
    let prop = Property::find_by_id(off.property_id)
        .one(&txn)
        .await?
        .ok_or(ServiceError::NotFound)?;

    if property_service::selling_price_below_floor(off.price, prop.expected_price) {
        return Err(ServiceError::Validation(
            "Offered price is too low".to_string(),
        ));
    }

    let mut prop_model: property::ActiveModel = prop.into();
    prop_model.buyer_id = Set(Some(off.partner_id));
    prop_model.selling_price = Set(Some(off.price));
    prop_model.state = Set(PropertyState::OfferAccepted);
    prop_model.updated_at = Set(now_rfc3339());
    prop_model.update(&txn).await?;

    let mut offer_model: offer::ActiveModel = off.into();
    offer_model.status = Set(Some(OfferStatus::Accepted));
    offer_model.updated_at = Set(now_rfc3339());
    let updated = offer_model.update(&txn).await?;

    txn.commit().await?;
    tracing::info!(offer_id = updated.id, "offer confirmed");
    Ok(updated)
}

/// action_cancel: marks the offer refused; the property is left untouched
pub async fn refuse_offer(db: &DatabaseConnection, id: i32) -> Result<offer::Model, ServiceError> {
    let off = get_offer(db, id).await?;

    let mut offer_model: offer::ActiveModel = off.into();
    offer_model.status = Set(Some(OfferStatus::Refused));
    offer_model.updated_at = Set(now_rfc3339());
    let updated = offer_model.update(db).await?;
    tracing::info!(offer_id = updated.id, "offer refused");
    Ok(updated)
}

/// Offers associated with a property type (through its properties)
pub async fn count_offers_for_type<C: ConnectionTrait>(
    conn: &C,
    property_type_id: i32,
) -> Result<i64, ServiceError> {
    let count = Offer::find()
        .filter(offer::Column::PropertyTypeId.eq(property_type_id))
        .count(conn)
        .await?;
    Ok(count as i64)
}
