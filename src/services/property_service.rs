//! Property Service - Listing lifecycle, validation and derived fields
//!
//! Derived columns (total_area, available, best_price) are recomputed here,
//! inside the same transaction as the mutation that changes their inputs.

use chrono::{Duration, NaiveDate, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use serde::Serialize;

use crate::models::offer::{self, Entity as Offer};
use crate::models::property::{
    self, Entity as Property, GardenOrientation, PropertyDraft, PropertyPatch, PropertyState,
};
use crate::models::property_tag::{self, Entity as PropertyTag};
use crate::models::property_tag_links::{self, Entity as PropertyTagLink};
use crate::models::property_type::Entity as PropertyType;
use crate::models::user::Entity as User;
use crate::services::ServiceError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Days between creation and the default availability date
const DEFAULT_AVAILABILITY_DAYS: i64 = 90;

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

pub fn parse_date(value: &str) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| ServiceError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", value)))
}

/// total_area = garden_area + living_area
pub fn compute_total_area(garden_area: Option<i32>, living_area: i32) -> i32 {
    garden_area.unwrap_or(0) + living_area
}

/// A property is available iff its availability date is set and not in the past.
pub fn compute_available(date_availability: Option<&str>, today: NaiveDate) -> bool {
    match date_availability {
        Some(value) => NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map(|d| d >= today)
            .unwrap_or(false),
        None => false,
    }
}

/// Floor check on the selling price: below 90% of the expected price is
/// rejected. Compared at cent precision.
pub fn selling_price_below_floor(selling_price: f64, expected_price: f64) -> bool {
    let cents = |v: f64| (v * 100.0).round() as i64;
    cents(selling_price) < cents(expected_price * 0.9)
}

/// Advisory values suggested when the garden flag is toggled in a form.
/// Never applied server-side.
#[derive(Debug, Serialize)]
pub struct GardenDefaults {
    pub garden_area: Option<i32>,
    pub garden_orientation: Option<GardenOrientation>,
}

pub fn garden_defaults(enabled: bool) -> GardenDefaults {
    if enabled {
        GardenDefaults {
            garden_area: Some(10),
            garden_orientation: Some(GardenOrientation::North),
        }
    } else {
        GardenDefaults {
            garden_area: None,
            garden_orientation: None,
        }
    }
}

/// Filter parameters for listing properties
#[derive(Debug, Default, Clone)]
pub struct PropertyFilter {
    pub state: Option<PropertyState>,
    pub property_type_id: Option<i32>,
    pub seller_id: Option<i32>,
    pub postcode: Option<String>,
    pub min_expected_price: Option<f64>,
    pub max_expected_price: Option<f64>,
    pub available: Option<bool>,
    pub active: Option<bool>,
}

/// Property enriched with its offers and tags
#[derive(Debug, Serialize)]
pub struct PropertyDetails {
    pub property: property::Model,
    pub offers: Vec<offer::Model>,
    pub tags: Vec<property_tag::Model>,
}

async fn ensure_unique_name(
    db: &DatabaseConnection,
    name: &str,
    exclude_id: Option<i32>,
) -> Result<(), ServiceError> {
    let mut query = Property::find().filter(property::Column::Name.eq(name));
    if let Some(id) = exclude_id {
        query = query.filter(property::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(ServiceError::Validation(format!(
            "A property named '{}' already exists",
            name
        )));
    }
    Ok(())
}

/// Create a listing. The seller defaults to user 1 (single-user mode).
pub async fn create_property(
    db: &DatabaseConnection,
    draft: PropertyDraft,
) -> Result<property::Model, ServiceError> {
    let name = draft.name.trim().to_string();
    if name.is_empty() {
        return Err(ServiceError::Validation("The name is required".to_string()));
    }
    if draft.expected_price <= 0.0 {
        return Err(ServiceError::Validation(
            "The expected price must be positive".to_string(),
        ));
    }
    ensure_unique_name(db, &name, None).await?;

    if let Some(type_id) = draft.property_type_id {
        PropertyType::find_by_id(type_id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound)?;
    }

    let seller_id = draft.seller_id.unwrap_or(1);
    User::find_by_id(seller_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let today = today();
    let date_availability = match draft.date_availability {
        Some(value) => {
            parse_date(&value)?;
            Some(value)
        }
        None => Some((today + Duration::days(DEFAULT_AVAILABILITY_DAYS)).to_string()),
    };

    let living_area = draft.living_area.unwrap_or(0);
    let garden_area = draft.garden_area;
    let now = now_rfc3339();

    let new_property = property::ActiveModel {
        name: Set(name),
        description: Set(draft.description),
        postcode: Set(draft.postcode),
        available: Set(compute_available(date_availability.as_deref(), today)),
        date_availability: Set(date_availability),
        expected_price: Set(draft.expected_price),
        selling_price: Set(None),
        bedrooms: Set(draft.bedrooms.unwrap_or(2)),
        living_area: Set(living_area),
        facades: Set(draft.facades.unwrap_or(0)),
        garage: Set(draft.garage.unwrap_or(false)),
        garden: Set(draft.garden.unwrap_or(false)),
        garden_area: Set(garden_area),
        garden_orientation: Set(draft.garden_orientation),
        active: Set(true),
        state: Set(PropertyState::New),
        total_area: Set(compute_total_area(garden_area, living_area)),
        best_price: Set(0.0),
        property_type_id: Set(draft.property_type_id),
        seller_id: Set(seller_id),
        buyer_id: Set(None),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    let saved = new_property.insert(db).await?;
    tracing::info!(property_id = saved.id, "property created");
    Ok(saved)
}

pub async fn get_property(
    db: &DatabaseConnection,
    id: i32,
) -> Result<property::Model, ServiceError> {
    Property::find_by_id(id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)
}

pub async fn get_property_details(
    db: &DatabaseConnection,
    id: i32,
) -> Result<PropertyDetails, ServiceError> {
    let prop = get_property(db, id).await?;
    let offers = prop
        .find_related(Offer)
        .order_by_desc(offer::Column::Price)
        .all(db)
        .await?;
    let tags = prop.find_related(PropertyTag).all(db).await?;
    Ok(PropertyDetails {
        property: prop,
        offers,
        tags,
    })
}

pub async fn list_properties(
    db: &DatabaseConnection,
    filter: PropertyFilter,
) -> Result<Vec<property::Model>, ServiceError> {
    let mut condition = Condition::all();

    if let Some(state) = filter.state {
        condition = condition.add(property::Column::State.eq(state));
    }
    if let Some(type_id) = filter.property_type_id {
        condition = condition.add(property::Column::PropertyTypeId.eq(type_id));
    }
    if let Some(seller_id) = filter.seller_id {
        condition = condition.add(property::Column::SellerId.eq(seller_id));
    }
    if let Some(postcode) = filter.postcode {
        condition = condition.add(property::Column::Postcode.eq(postcode));
    }
    if let Some(min) = filter.min_expected_price {
        condition = condition.add(property::Column::ExpectedPrice.gte(min));
    }
    if let Some(max) = filter.max_expected_price {
        condition = condition.add(property::Column::ExpectedPrice.lte(max));
    }
    if let Some(available) = filter.available {
        condition = condition.add(property::Column::Available.eq(available));
    }
    if let Some(active) = filter.active {
        condition = condition.add(property::Column::Active.eq(active));
    }

    let properties = Property::find()
        .filter(condition)
        .order_by_desc(property::Column::Id)
        .all(db)
        .await?;
    Ok(properties)
}

/// Available listings of one seller
pub async fn list_seller_properties(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<property::Model>, ServiceError> {
    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let properties = Property::find()
        .filter(property::Column::SellerId.eq(user_id))
        .filter(property::Column::Available.eq(true))
        .order_by_desc(property::Column::Id)
        .all(db)
        .await?;
    Ok(properties)
}

/// Partial update. Price invariants are revalidated and derived columns
/// recomputed; on any violation the whole write is rejected.
pub async fn update_property(
    db: &DatabaseConnection,
    id: i32,
    patch: PropertyPatch,
) -> Result<property::Model, ServiceError> {
    let prop = get_property(db, id).await?;

    let name = match patch.name {
        Some(value) => {
            let value = value.trim().to_string();
            if value.is_empty() {
                return Err(ServiceError::Validation("The name is required".to_string()));
            }
            if value != prop.name {
                ensure_unique_name(db, &value, Some(id)).await?;
            }
            value
        }
        None => prop.name.clone(),
    };

    let expected_price = patch.expected_price.unwrap_or(prop.expected_price);
    if expected_price <= 0.0 {
        return Err(ServiceError::Validation(
            "The expected price must be positive".to_string(),
        ));
    }

    if let Some(selling_price) = patch.selling_price {
        if selling_price <= 0.0 {
            return Err(ServiceError::Validation(
                "The selling price must be positive".to_string(),
            ));
        }
    }
    let selling_price = patch.selling_price.or(prop.selling_price);
    if let Some(value) = selling_price {
        if selling_price_below_floor(value, expected_price) {
            return Err(ServiceError::Validation(
                "Offered price is too low".to_string(),
            ));
        }
    }

    if let Some(type_id) = patch.property_type_id {
        PropertyType::find_by_id(type_id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound)?;
    }

    let date_availability = match patch.date_availability {
        Some(value) => {
            parse_date(&value)?;
            Some(value)
        }
        None => prop.date_availability.clone(),
    };

    let living_area = patch.living_area.unwrap_or(prop.living_area);
    let garden_area = patch.garden_area.or(prop.garden_area);

    let mut active_model: property::ActiveModel = prop.clone().into();
    active_model.name = Set(name);
    if patch.description.is_some() {
        active_model.description = Set(patch.description);
    }
    if patch.postcode.is_some() {
        active_model.postcode = Set(patch.postcode);
    }
    active_model.date_availability = Set(date_availability.clone());
    active_model.expected_price = Set(expected_price);
    active_model.selling_price = Set(selling_price);
    active_model.bedrooms = Set(patch.bedrooms.unwrap_or(prop.bedrooms));
    active_model.living_area = Set(living_area);
    active_model.facades = Set(patch.facades.unwrap_or(prop.facades));
    active_model.garage = Set(patch.garage.unwrap_or(prop.garage));
    active_model.garden = Set(patch.garden.unwrap_or(prop.garden));
    active_model.garden_area = Set(garden_area);
    if patch.garden_orientation.is_some() {
        active_model.garden_orientation = Set(patch.garden_orientation);
    }
    active_model.active = Set(patch.active.unwrap_or(prop.active));
    if patch.property_type_id.is_some() {
        active_model.property_type_id = Set(patch.property_type_id);
    }
    active_model.total_area = Set(compute_total_area(garden_area, living_area));
    active_model.available = Set(compute_available(date_availability.as_deref(), today()));
    active_model.updated_at = Set(now_rfc3339());

    let updated = active_model.update(db).await?;
    Ok(updated)
}

/// action_sold: refuse if already sold or cancelled
pub async fn mark_sold(db: &DatabaseConnection, id: i32) -> Result<property::Model, ServiceError> {
    let prop = get_property(db, id).await?;
    if prop.state.is_closed() {
        return Err(ServiceError::InvalidState(
            "This property was sold already!".to_string(),
        ));
    }

    let mut active_model: property::ActiveModel = prop.into();
    active_model.state = Set(PropertyState::Sold);
    active_model.updated_at = Set(now_rfc3339());
    let updated = active_model.update(db).await?;
    tracing::info!(property_id = updated.id, "property sold");
    Ok(updated)
}

/// action_cancel: refuse if already sold or cancelled
pub async fn mark_cancelled(
    db: &DatabaseConnection,
    id: i32,
) -> Result<property::Model, ServiceError> {
    let prop = get_property(db, id).await?;
    if prop.state.is_closed() {
        return Err(ServiceError::InvalidState(
            "This property was cancelled already!".to_string(),
        ));
    }

    let mut active_model: property::ActiveModel = prop.into();
    active_model.state = Set(PropertyState::Cancelled);
    active_model.updated_at = Set(now_rfc3339());
    let updated = active_model.update(db).await?;
    tracing::info!(property_id = updated.id, "property cancelled");
    Ok(updated)
}

/// Delete a listing. Only allowed in state New or Cancelled; its offers and
/// tag links are removed first, in the same transaction.
pub async fn delete_property(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let txn = db.begin().await?;

    let prop = Property::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(ServiceError::NotFound)?;

    if !prop.state.is_deletable() {
        return Err(ServiceError::InvalidState(
            "Record cannot be deleted".to_string(),
        ));
    }

    Offer::delete_many()
        .filter(offer::Column::PropertyId.eq(id))
        .exec(&txn)
        .await?;
    PropertyTagLink::delete_many()
        .filter(property_tag_links::Column::PropertyId.eq(id))
        .exec(&txn)
        .await?;
    prop.delete(&txn).await?;

    txn.commit().await?;
    tracing::info!(property_id = id, "property deleted");
    Ok(())
}

/// Recompute best_price = max offer price. Left untouched when the property
/// has no offers (last known best is kept).
pub async fn refresh_best_price<C: ConnectionTrait>(
    conn: &C,
    property_id: i32,
) -> Result<(), ServiceError> {
    let offers = Offer::find()
        .filter(offer::Column::PropertyId.eq(property_id))
        .all(conn)
        .await?;
    if offers.is_empty() {
        return Ok(());
    }

    let best = offers.iter().map(|o| o.price).fold(0.0_f64, f64::max);

    let prop = Property::find_by_id(property_id)
        .one(conn)
        .await?
        .ok_or(ServiceError::NotFound)?;
    let mut active_model: property::ActiveModel = prop.into();
    active_model.best_price = Set(best);
    active_model.updated_at = Set(now_rfc3339());
    active_model.update(conn).await?;
    Ok(())
}

pub async fn attach_tag(
    db: &DatabaseConnection,
    property_id: i32,
    tag_id: i32,
) -> Result<(), ServiceError> {
    Property::find_by_id(property_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;
    PropertyTag::find_by_id(tag_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let link = property_tag_links::ActiveModel {
        property_id: Set(property_id),
        tag_id: Set(tag_id),
    };
    let insert = PropertyTagLink::insert(link).on_conflict(
        OnConflict::columns([
            property_tag_links::Column::PropertyId,
            property_tag_links::Column::TagId,
        ])
        .do_nothing()
        .to_owned(),
    );
    match insert.exec(db).await {
        Ok(_) => Ok(()),
        // Attaching an already attached tag is a no-op
        Err(DbErr::RecordNotInserted) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

pub async fn detach_tag(
    db: &DatabaseConnection,
    property_id: i32,
    tag_id: i32,
) -> Result<(), ServiceError> {
    Property::find_by_id(property_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;

    PropertyTagLink::delete_many()
        .filter(property_tag_links::Column::PropertyId.eq(property_id))
        .filter(property_tag_links::Column::TagId.eq(tag_id))
        .exec(db)
        .await?;
    Ok(())
}
