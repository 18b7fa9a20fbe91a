use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{Claims, LoginRequest, LoginResponse, RegisterRequest},
        bookings::{BookingList, CreateBookingRequest, UpdateBookingRequest},
        messages::{MessageList, SendMessageRequest},
        reviews::{CreateReviewRequest, ReviewList},
        services::{CreateServiceRequest, ServiceList, UpdateServiceRequest},
        users::{NearbyAssistant, NearbyAssistantList, UpdateUserRequest},
    },
    models::{
        Booking, BookingLocation, BookingStatus, GeoPoint, Message, Review, Role, Service,
        ServiceCategory, User,
    },
    response::{ApiResponse, Meta},
    routes::{auth, bookings, categories, health, messages, reviews, services, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::logout,
        auth::me,
        users::nearby_assistants,
        users::get_user,
        users::update_user,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        services::list_services,
        services::get_service,
        services::create_service,
        services::update_service,
        services::delete_service,
        bookings::list_bookings,
        bookings::get_booking,
        bookings::create_booking,
        bookings::update_booking,
        reviews::list_reviews,
        reviews::create_review,
        messages::send_message,
        messages::get_conversation,
        messages::mark_read
    ),
    components(
        schemas(
            Role,
            BookingStatus,
            GeoPoint,
            BookingLocation,
            User,
            ServiceCategory,
            Service,
            Booking,
            Review,
            Message,
            Claims,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            UpdateUserRequest,
            NearbyAssistant,
            NearbyAssistantList,
            categories::CreateCategoryRequest,
            categories::UpdateCategoryRequest,
            categories::CategoryList,
            CreateServiceRequest,
            UpdateServiceRequest,
            ServiceList,
            CreateBookingRequest,
            UpdateBookingRequest,
            BookingList,
            CreateReviewRequest,
            ReviewList,
            SendMessageRequest,
            MessageList,
            Meta,
            ApiResponse<User>,
            ApiResponse<Booking>,
            ApiResponse<ServiceList>,
            ApiResponse<NearbyAssistantList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login and session identity"),
        (name = "Users", description = "Profiles and nearby-assistant search"),
        (name = "Categories", description = "Service category endpoints"),
        (name = "Services", description = "Service listing endpoints"),
        (name = "Bookings", description = "Booking lifecycle endpoints"),
        (name = "Reviews", description = "Review endpoints"),
        (name = "Messages", description = "Direct messaging endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
