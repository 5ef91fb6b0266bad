//! OpenAPI document served at `/api-docs/openapi.json`.
//! The schema types below describe the wire shapes only.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct MessageResponse { pub message: String }

#[derive(ToSchema)]
pub struct LocationDoc { pub lat: f64, pub lng: f64 }

#[derive(ToSchema)]
pub struct PlaceDoc {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: String,
    pub address: String,
    pub location: Option<LocationDoc>,
    pub creator: Uuid,
}

#[derive(ToSchema)]
pub struct PlaceResponse { pub place: PlaceDoc }

#[derive(ToSchema)]
pub struct PlacesResponse { pub places: Vec<PlaceDoc> }

#[derive(ToSchema)]
pub struct UserDoc {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub places: Vec<Uuid>,
}

#[derive(ToSchema)]
pub struct UsersResponse { pub users: Vec<UserDoc> }

#[derive(ToSchema)]
#[allow(non_snake_case)]
pub struct AuthResponse { pub userId: Uuid, pub email: String, pub token: String }

#[derive(ToSchema)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct CreatePlaceForm {
    pub title: String,
    pub description: String,
    pub address: String,
    pub creator: Option<Uuid>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

#[derive(ToSchema)]
pub struct UpdatePlaceRequest { pub title: String, pub description: String }

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::places::get_place,
        crate::routes::places::list_user_places,
        crate::routes::places::create_place,
        crate::routes::places::update_place,
        crate::routes::places::delete_place,
        crate::routes::users::list_users,
        crate::routes::users::signup,
        crate::routes::users::login,
    ),
    components(
        schemas(
            HealthResponse,
            MessageResponse,
            LocationDoc,
            PlaceDoc,
            PlaceResponse,
            PlacesResponse,
            UserDoc,
            UsersResponse,
            AuthResponse,
            SignupForm,
            LoginRequest,
            CreatePlaceForm,
            UpdatePlaceRequest,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "places"),
        (name = "users")
    )
)]
pub struct ApiDoc;
