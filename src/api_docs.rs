use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::property::list_properties,
        api::property::create_property,
        api::property::get_property,
        api::property::update_property,
        api::property::delete_property,
        api::property::sold,
        api::property::cancel,
        api::property::garden_defaults,
        // Add other endpoints here as we document them
    ),
    tags(
        (name = "estate-pilot", description = "Real estate listings API")
    )
)]
pub struct ApiDoc;
