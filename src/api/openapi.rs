//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{bookings, health, items, requests, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LendHub API",
        version = "1.0.0",
        description = "Peer-to-Peer Item Sharing REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Users
        users::create_user,
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user,
        // Items
        items::create_item,
        items::update_item,
        items::get_item,
        items::list_items,
        items::search_items,
        items::add_comment,
        // Bookings
        bookings::create_booking,
        bookings::approve_booking,
        bookings::get_booking,
        bookings::list_renter_bookings,
        bookings::list_owner_bookings,
        // Requests
        requests::create_request,
        requests::list_my_requests,
        requests::list_other_requests,
        requests::get_request,
    ),
    components(
        schemas(
            // Users
            crate::models::user::User,
            crate::models::user::UserShort,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            // Items
            crate::models::item::Item,
            crate::models::item::ItemShort,
            crate::models::item::ItemDetails,
            crate::models::item::ItemWithBookings,
            crate::models::item::CreateItem,
            crate::models::item::UpdateItem,
            // Bookings
            crate::models::booking::BookingStatus,
            crate::models::booking::BookingState,
            crate::models::booking::BookingDetails,
            crate::models::booking::CreateBooking,
            // Requests
            crate::models::request::ItemRequest,
            crate::models::request::ItemRequestDetails,
            crate::models::request::CreateRequest,
            // Comments
            crate::models::comment::Comment,
            crate::models::comment::CreateComment,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User directory"),
        (name = "items", description = "Item catalog"),
        (name = "bookings", description = "Booking ledger"),
        (name = "requests", description = "Request board")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
