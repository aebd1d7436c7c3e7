use sea_orm::*;

use crate::models::{partner, property, property_tag, property_type};
use crate::services::{offer_service, property_service, ServiceError};

/// Seed demo data (types, tags, partners, a few listings and offers).
/// Listings and offers go through the services so derived fields and state
/// transitions are exercised the same way as in production.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), ServiceError> {
    let now = chrono::Utc::now().to_rfc3339();

    // 1. Property types
    for (name, sequence) in [("House", 1), ("Apartment", 2), ("Land", 3)] {
        let existing = property_type::Entity::find()
            .filter(property_type::Column::Name.eq(name))
            .one(db)
            .await?;
        if existing.is_none() {
            property_type::ActiveModel {
                name: Set(name.to_owned()),
                sequence: Set(sequence),
                created_at: Set(now.clone()),
                updated_at: Set(now.clone()),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
    }

    // 2. Tags
    for (name, color) in [("cozy", 2), ("renovated", 5), ("quiet street", 7)] {
        let tag = property_tag::ActiveModel {
            name: Set(name.to_owned()),
            color: Set(color),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        };
        let _ = property_tag::Entity::insert(tag)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(property_tag::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(db)
            .await;
    }

    // 3. Partners
    let mut partner_ids = Vec::new();
    for name in ["Alice Martin", "Bob Durand"] {
        let existing = partner::Entity::find()
            .filter(partner::Column::Name.eq(name))
            .one(db)
            .await?;
        let model = match existing {
            Some(model) => model,
            None => {
                partner::ActiveModel {
                    name: Set(name.to_owned()),
                    email: Set(None),
                    phone: Set(None),
                    created_at: Set(now.clone()),
                    updated_at: Set(now.clone()),
                    ..Default::default()
                }
                .insert(db)
                .await?
            }
        };
        partner_ids.push(model.id);
    }

    // 4. A couple of listings with one offer each
    let house_type = property_type::Entity::find()
        .filter(property_type::Column::Name.eq("House"))
        .one(db)
        .await?;

    for (name, expected_price, living_area, offer_price) in [
        ("Maple Street 12", 320_000.0, 140, 300_000.0),
        ("River View Loft", 210_000.0, 85, 205_000.0),
    ] {
        let existing = property::Entity::find()
            .filter(property::Column::Name.eq(name))
            .one(db)
            .await?;
        if existing.is_some() {
            continue;
        }

        let prop = property_service::create_property(
            db,
            property::PropertyDraft {
                name: name.to_owned(),
                description: None,
                postcode: Some("1040".to_owned()),
                date_availability: None,
                expected_price,
                bedrooms: Some(3),
                living_area: Some(living_area),
                facades: Some(2),
                garage: Some(true),
                garden: Some(false),
                garden_area: None,
                garden_orientation: None,
                property_type_id: house_type.as_ref().map(|t| t.id),
                seller_id: None,
            },
        )
        .await?;

        offer_service::create_offer(
            db,
            crate::models::offer::OfferDraft {
                property_id: prop.id,
                partner_id: partner_ids[0],
                price: offer_price,
                validity: None,
            },
        )
        .await?;
    }

    Ok(())
}
