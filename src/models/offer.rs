use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Offer outcome; a NULL status means the offer is still pending.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "refused")]
    Refused,
}

impl OfferStatus {
    pub fn label(&self) -> &'static str {
        match self {
            OfferStatus::Accepted => "Accepted",
            OfferStatus::Refused => "Refused",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "offers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub price: f64,
    pub status: Option<OfferStatus>,
    pub partner_id: i32,
    pub property_id: i32,
    /// Validity window in days
    pub validity: i32,
    /// ISO date (YYYY-MM-DD), creation date + validity
    pub date_deadline: String,
    /// Copied from the parent property at creation, kept for filtering
    pub property_type_id: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::property::Entity",
        from = "Column::PropertyId",
        to = "super::property::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Property,
    #[sea_orm(
        belongs_to = "super::partner::Entity",
        from = "Column::PartnerId",
        to = "super::partner::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Partner,
    #[sea_orm(
        belongs_to = "super::property_type::Entity",
        from = "Column::PropertyTypeId",
        to = "super::property_type::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    PropertyType,
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl Related<super::partner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Partner.def()
    }
}

impl Related<super::property_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PropertyType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Creation payload handed to the offer service
#[derive(Debug, Deserialize)]
pub struct OfferDraft {
    pub property_id: i32,
    pub partner_id: i32,
    pub price: f64,
    /// Days before the offer lapses; defaults to 7
    pub validity: Option<i32>,
}
