use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "property_tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub color: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        super::property_tag_links::Relation::Property.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::property_tag_links::Relation::Tag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
