use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Listing lifecycle. Stored as lowercase codes; `label()` gives the
/// human-facing text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "snake_case")]
pub enum PropertyState {
    #[sea_orm(string_value = "new")]
    New,
    #[sea_orm(string_value = "offer_received")]
    OfferReceived,
    #[sea_orm(string_value = "offer_accepted")]
    OfferAccepted,
    #[sea_orm(string_value = "sold")]
    Sold,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl PropertyState {
    pub fn label(&self) -> &'static str {
        match self {
            PropertyState::New => "New",
            PropertyState::OfferReceived => "Offer Received",
            PropertyState::OfferAccepted => "Offer Accepted",
            PropertyState::Sold => "Sold",
            PropertyState::Cancelled => "Cancelled",
        }
    }

    /// Sold and cancelled properties cannot be re-closed.
    pub fn is_closed(&self) -> bool {
        matches!(self, PropertyState::Sold | PropertyState::Cancelled)
    }

    /// Only untouched or cancelled listings may be deleted.
    pub fn is_deletable(&self) -> bool {
        matches!(self, PropertyState::New | PropertyState::Cancelled)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "snake_case")]
pub enum GardenOrientation {
    #[sea_orm(string_value = "north")]
    North,
    #[sea_orm(string_value = "south")]
    South,
    #[sea_orm(string_value = "east")]
    East,
    #[sea_orm(string_value = "west")]
    West,
}

impl GardenOrientation {
    pub fn label(&self) -> &'static str {
        match self {
            GardenOrientation::North => "North",
            GardenOrientation::South => "South",
            GardenOrientation::East => "East",
            GardenOrientation::West => "West",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
    pub postcode: Option<String>,
    /// ISO date (YYYY-MM-DD); defaults to 90 days after creation
    pub date_availability: Option<String>,
    pub expected_price: f64,
    pub selling_price: Option<f64>,
    pub bedrooms: i32,
    pub living_area: i32,
    pub facades: i32,
    pub garage: bool,
    pub garden: bool,
    pub garden_area: Option<i32>,
    pub garden_orientation: Option<GardenOrientation>,
    pub active: bool,
    pub state: PropertyState,
    // Derived columns, recomputed by the service layer
    pub available: bool,
    pub total_area: i32,
    pub best_price: f64,
    pub property_type_id: Option<i32>,
    pub seller_id: i32,
    pub buyer_id: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::property_type::Entity",
        from = "Column::PropertyTypeId",
        to = "super::property_type::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    PropertyType,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SellerId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Seller,
    #[sea_orm(
        belongs_to = "super::partner::Entity",
        from = "Column::BuyerId",
        to = "super::partner::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Buyer,
    #[sea_orm(has_many = "super::offer::Entity")]
    Offer,
}

impl Related<super::property_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PropertyType.def()
    }
}

impl Related<super::offer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Offer.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seller.def()
    }
}

impl Related<super::property_tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::property_tag_links::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::property_tag_links::Relation::Property.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Creation payload handed to the property service
#[derive(Debug, Deserialize)]
pub struct PropertyDraft {
    pub name: String,
    pub description: Option<String>,
    pub postcode: Option<String>,
    pub date_availability: Option<String>,
    pub expected_price: f64,
    pub bedrooms: Option<i32>,
    pub living_area: Option<i32>,
    pub facades: Option<i32>,
    pub garage: Option<bool>,
    pub garden: Option<bool>,
    pub garden_area: Option<i32>,
    pub garden_orientation: Option<GardenOrientation>,
    pub property_type_id: Option<i32>,
    /// Defaults to user 1 (single-user mode)
    pub seller_id: Option<i32>,
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Default, Deserialize)]
pub struct PropertyPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub postcode: Option<String>,
    pub date_availability: Option<String>,
    pub expected_price: Option<f64>,
    pub selling_price: Option<f64>,
    pub bedrooms: Option<i32>,
    pub living_area: Option<i32>,
    pub facades: Option<i32>,
    pub garage: Option<bool>,
    pub garden: Option<bool>,
    pub garden_area: Option<i32>,
    pub garden_orientation: Option<GardenOrientation>,
    pub active: Option<bool>,
    pub property_type_id: Option<i32>,
}
