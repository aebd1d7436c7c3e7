pub mod offer;
pub mod partner;
pub mod property;
pub mod property_tag;
pub mod property_tag_links;
pub mod property_type;
pub mod user;
