use chrono::{Duration, Utc};
use estate_pilot::db;
use estate_pilot::models::offer::{self, OfferDraft};
use estate_pilot::models::property::{PropertyDraft, PropertyPatch, PropertyState};
use estate_pilot::services::{offer_service, property_service, ServiceError};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

// Helper to create a test database
async fn setup_test_db() -> DatabaseConnection {
    // In-memory SQLite for testing
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

fn draft(name: &str, expected_price: f64) -> PropertyDraft {
    PropertyDraft {
        name: name.to_string(),
        description: None,
        postcode: None,
        date_availability: None,
        expected_price,
        bedrooms: None,
        living_area: None,
        facades: None,
        garage: None,
        garden: None,
        garden_area: None,
        garden_orientation: None,
        property_type_id: None,
        seller_id: None,
    }
}

async fn create_test_partner(db: &DatabaseConnection, name: &str) -> i32 {
    use estate_pilot::models::partner;
    use sea_orm::{ActiveModelTrait, Set};
    let now = Utc::now().to_rfc3339();
    let model = partner::ActiveModel {
        name: Set(name.to_string()),
        email: Set(None),
        phone: Set(None),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create partner");
    model.id
}

#[tokio::test]
async fn create_applies_defaults() {
    let db = setup_test_db().await;

    let prop = property_service::create_property(&db, draft("Maple Street 12", 320_000.0))
        .await
        .expect("create failed");

    assert_eq!(prop.state, PropertyState::New);
    assert_eq!(prop.bedrooms, 2);
    assert_eq!(prop.seller_id, 1);
    assert_eq!(prop.best_price, 0.0);
    assert!(prop.selling_price.is_none());
    assert!(prop.active);

    // availability defaults to 90 days out, so the listing is available
    let expected_date = (Utc::now().date_naive() + Duration::days(90)).to_string();
    assert_eq!(prop.date_availability.as_deref(), Some(expected_date.as_str()));
    assert!(prop.available);
}

#[tokio::test]
async fn create_rejects_non_positive_expected_price() {
    let db = setup_test_db().await;

    for bad_price in [0.0, -5.0] {
        let err = property_service::create_property(&db, draft("Bad Price", bad_price))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}

#[tokio::test]
async fn create_rejects_duplicate_name() {
    let db = setup_test_db().await;

    property_service::create_property(&db, draft("Unique House", 100_000.0))
        .await
        .expect("first create failed");
    let err = property_service::create_property(&db, draft("Unique House", 200_000.0))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn create_rejects_unknown_seller() {
    let db = setup_test_db().await;

    let mut d = draft("Orphan House", 100_000.0);
    d.seller_id = Some(999);
    let err = property_service::create_property(&db, d).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound));
}

#[tokio::test]
async fn total_area_tracks_garden_and_living_area() {
    let db = setup_test_db().await;

    let mut d = draft("Garden House", 250_000.0);
    d.living_area = Some(120);
    d.garden_area = Some(10);
    let prop = property_service::create_property(&db, d)
        .await
        .expect("create failed");
    assert_eq!(prop.total_area, 130);

    let patch = PropertyPatch {
        living_area: Some(200),
        ..Default::default()
    };
    let updated = property_service::update_property(&db, prop.id, patch)
        .await
        .expect("update failed");
    assert_eq!(updated.total_area, 210);
}

#[tokio::test]
async fn available_recomputed_from_availability_date() {
    let db = setup_test_db().await;

    let prop = property_service::create_property(&db, draft("Dated House", 100_000.0))
        .await
        .expect("create failed");
    assert!(prop.available);

    let yesterday = (Utc::now().date_naive() - Duration::days(1)).to_string();
    let updated = property_service::update_property(
        &db,
        prop.id,
        PropertyPatch {
            date_availability: Some(yesterday),
            ..Default::default()
        },
    )
    .await
    .expect("update failed");
    assert!(!updated.available);

    let today = Utc::now().date_naive().to_string();
    let updated = property_service::update_property(
        &db,
        prop.id,
        PropertyPatch {
            date_availability: Some(today),
            ..Default::default()
        },
    )
    .await
    .expect("update failed");
    assert!(updated.available);
}

#[tokio::test]
async fn selling_price_floor_is_enforced_on_write() {
    let db = setup_test_db().await;

    let prop = property_service::create_property(&db, draft("Floor House", 100_000.0))
        .await
        .expect("create failed");

    // below 90% of the expected price: rejected, nothing written
    let err = property_service::update_property(
        &db,
        prop.id,
        PropertyPatch {
            selling_price: Some(89_999.0),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let unchanged = property_service::get_property(&db, prop.id)
        .await
        .expect("fetch failed");
    assert!(unchanged.selling_price.is_none());

    // exactly at the floor: accepted
    let updated = property_service::update_property(
        &db,
        prop.id,
        PropertyPatch {
            selling_price: Some(90_000.0),
            ..Default::default()
        },
    )
    .await
    .expect("update failed");
    assert_eq!(updated.selling_price, Some(90_000.0));
}

#[tokio::test]
async fn selling_price_must_be_positive() {
    let db = setup_test_db().await;

    let prop = property_service::create_property(&db, draft("Positive House", 100_000.0))
        .await
        .expect("create failed");

    let err = property_service::update_property(
        &db,
        prop.id,
        PropertyPatch {
            selling_price: Some(-1.0),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn garden_toggle_is_advisory_only() {
    let db = setup_test_db().await;

    let mut d = draft("No Garden Defaults", 100_000.0);
    d.garden = Some(true);
    let prop = property_service::create_property(&db, d)
        .await
        .expect("create failed");

    // the suggestion is never applied server-side
    assert!(prop.garden);
    assert!(prop.garden_area.is_none());
    assert!(prop.garden_orientation.is_none());
}

#[tokio::test]
async fn sold_action_cannot_be_repeated() {
    let db = setup_test_db().await;

    let prop = property_service::create_property(&db, draft("Sold House", 100_000.0))
        .await
        .expect("create failed");

    let sold = property_service::mark_sold(&db, prop.id)
        .await
        .expect("first sold failed");
    assert_eq!(sold.state, PropertyState::Sold);

    let err = property_service::mark_sold(&db, prop.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)));

    // a sold property cannot be cancelled either
    let err = property_service::mark_cancelled(&db, prop.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)));
}

#[tokio::test]
async fn cancel_action_cannot_be_repeated() {
    let db = setup_test_db().await;

    let prop = property_service::create_property(&db, draft("Cancelled House", 100_000.0))
        .await
        .expect("create failed");

    let cancelled = property_service::mark_cancelled(&db, prop.id)
        .await
        .expect("first cancel failed");
    assert_eq!(cancelled.state, PropertyState::Cancelled);

    let err = property_service::mark_cancelled(&db, prop.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)));
}

#[tokio::test]
async fn delete_guard_follows_state() {
    let db = setup_test_db().await;
    let partner_id = create_test_partner(&db, "Alice").await;

    // deletable while new
    let prop = property_service::create_property(&db, draft("Fresh House", 100_000.0))
        .await
        .expect("create failed");
    property_service::delete_property(&db, prop.id)
        .await
        .expect("delete of new property failed");

    // not deletable once an offer was accepted
    let prop = property_service::create_property(&db, draft("Busy House", 100_000.0))
        .await
        .expect("create failed");
    let off = offer_service::create_offer(
        &db,
        OfferDraft {
            property_id: prop.id,
            partner_id,
            price: 95_000.0,
            validity: None,
        },
    )
    .await
    .expect("offer failed");
    offer_service::confirm_offer(&db, off.id)
        .await
        .expect("confirm failed");

    let err = property_service::delete_property(&db, prop.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)));
}

#[tokio::test]
async fn delete_cascades_offers_when_cancelled() {
    let db = setup_test_db().await;
    let partner_id = create_test_partner(&db, "Bob").await;

    let prop = property_service::create_property(&db, draft("Doomed House", 100_000.0))
        .await
        .expect("create failed");
    offer_service::create_offer(
        &db,
        OfferDraft {
            property_id: prop.id,
            partner_id,
            price: 95_000.0,
            validity: None,
        },
    )
    .await
    .expect("offer failed");

    // cancelling makes the listing deletable again
    property_service::mark_cancelled(&db, prop.id)
        .await
        .expect("cancel failed");
    property_service::delete_property(&db, prop.id)
        .await
        .expect("delete failed");

    let remaining = offer::Entity::find()
        .filter(offer::Column::PropertyId.eq(prop.id))
        .count(&db)
        .await
        .expect("count failed");
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn list_properties_applies_filters() {
    let db = setup_test_db().await;

    let mut d = draft("Filtered House", 100_000.0);
    d.postcode = Some("1040".to_string());
    property_service::create_property(&db, d)
        .await
        .expect("create failed");
    property_service::create_property(&db, draft("Other House", 500_000.0))
        .await
        .expect("create failed");

    let found = property_service::list_properties(
        &db,
        property_service::PropertyFilter {
            postcode: Some("1040".to_string()),
            max_expected_price: Some(200_000.0),
            ..Default::default()
        },
    )
    .await
    .expect("list failed");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Filtered House");

    let all = property_service::list_properties(&db, Default::default())
        .await
        .expect("list failed");
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn seller_property_listing_only_shows_available() {
    let db = setup_test_db().await;

    property_service::create_property(&db, draft("Available House", 100_000.0))
        .await
        .expect("create failed");

    let prop = property_service::create_property(&db, draft("Past House", 100_000.0))
        .await
        .expect("create failed");
    let yesterday = (Utc::now().date_naive() - Duration::days(1)).to_string();
    property_service::update_property(
        &db,
        prop.id,
        PropertyPatch {
            date_availability: Some(yesterday),
            ..Default::default()
        },
    )
    .await
    .expect("update failed");

    let listed = property_service::list_seller_properties(&db, 1)
        .await
        .expect("list failed");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Available House");

    let err = property_service::list_seller_properties(&db, 42)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound));
}

#[tokio::test]
async fn tags_can_be_attached_and_detached() {
    use estate_pilot::models::property_tag;
    use sea_orm::{ActiveModelTrait, Set};

    let db = setup_test_db().await;
    let prop = property_service::create_property(&db, draft("Tagged House", 100_000.0))
        .await
        .expect("create failed");

    let now = Utc::now().to_rfc3339();
    let tag = property_tag::ActiveModel {
        name: Set("cozy".to_string()),
        color: Set(3),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await
    .expect("tag create failed");

    property_service::attach_tag(&db, prop.id, tag.id)
        .await
        .expect("attach failed");
    // attaching twice is a no-op
    property_service::attach_tag(&db, prop.id, tag.id)
        .await
        .expect("second attach failed");

    let details = property_service::get_property_details(&db, prop.id)
        .await
        .expect("details failed");
    assert_eq!(details.tags.len(), 1);
    assert_eq!(details.tags[0].name, "cozy");

    property_service::detach_tag(&db, prop.id, tag.id)
        .await
        .expect("detach failed");
    let details = property_service::get_property_details(&db, prop.id)
        .await
        .expect("details failed");
    assert!(details.tags.is_empty());
}
