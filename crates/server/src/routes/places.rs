use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use common::types::Message;
use service::places::domain::{Location, NewPlace, Place, PlaceUpdate};
use service::places::service::{PLACE_NOT_FOUND, USER_PLACES_NOT_FOUND};

use crate::errors::ApiError;
use crate::forms::FormPayload;
use crate::routes::auth::AuthContext;
use crate::state::AppState;

pub const CREATE_FOR_OTHER_USER: &str = "You are not allowed to add places for another user.";

#[derive(Debug, Serialize)]
pub struct PlaceBody {
    pub place: Place,
}

#[derive(Debug, Serialize)]
pub struct PlacesBody {
    pub places: Vec<Place>,
}

/// Malformed ids in paths are indistinguishable from unknown ones.
fn parse_id(raw: &str, not_found: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(not_found.to_string()))
}

#[utoipa::path(get, path = "/api/places/{pid}", tag = "places",
    params(("pid" = String, Path, description = "Place id")),
    responses((status = 200, description = "Place", body = crate::openapi::PlaceResponse), (status = 404, description = "Not Found", body = crate::openapi::MessageResponse)))]
pub async fn get_place(State(state): State<AppState>, Path(pid): Path<String>) -> Result<Json<PlaceBody>, ApiError> {
    let id = parse_id(&pid, PLACE_NOT_FOUND)?;
    let place = state.places.get(id).await?;
    Ok(Json(PlaceBody { place }))
}

#[utoipa::path(get, path = "/api/places/user/{uid}", tag = "places",
    params(("uid" = String, Path, description = "User id")),
    responses((status = 200, description = "Places of the user", body = crate::openapi::PlacesResponse), (status = 404, description = "Not Found", body = crate::openapi::MessageResponse)))]
pub async fn list_user_places(State(state): State<AppState>, Path(uid): Path<String>) -> Result<Json<PlacesBody>, ApiError> {
    let user_id = parse_id(&uid, USER_PLACES_NOT_FOUND)?;
    let places = state.places.list_by_user(user_id).await?;
    debug!(user_id = %user_id, count = places.len(), "list places");
    Ok(Json(PlacesBody { places }))
}

#[utoipa::path(post, path = "/api/places", tag = "places",
    request_body(content = crate::openapi::CreatePlaceForm, content_type = "multipart/form-data"),
    responses((status = 201, description = "Created", body = crate::openapi::PlaceResponse), (status = 401, description = "Unauthorized"), (status = 422, description = "Invalid inputs")),
    security(("bearer" = [])))]
pub async fn create_place(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    form: FormPayload,
) -> Result<(StatusCode, Json<PlaceBody>), ApiError> {
    if let Some(creator) = form.text("creator") {
        if Uuid::parse_str(creator).ok() != Some(auth.user_id) {
            warn!(user_id = %auth.user_id, creator = %creator, "creator does not match caller");
            return Err(ApiError::Unauthorized(CREATE_FOR_OTHER_USER.into()));
        }
    }
    let title = form.require("title")?.to_string();
    let description = form.require("description")?.to_string();
    let address = form.require("address")?.to_string();
    let location = match (form.number("lat")?, form.number("lng")?) {
        (Some(lat), Some(lng)) => Some(Location { lat, lng }),
        (None, None) => None,
        _ => return Err(ApiError::invalid_inputs()),
    };
    let image = form.image.as_ref().ok_or_else(ApiError::invalid_inputs)?;
    let stored = state.images.save(image).await?;

    let input = NewPlace { title, description, address, image: stored.clone(), location };
    match state.places.create(auth.user_id, input).await {
        Ok(place) => Ok((StatusCode::CREATED, Json(PlaceBody { place }))),
        Err(e) => {
            state.images.discard(&stored).await;
            Err(e.into())
        }
    }
}

#[utoipa::path(patch, path = "/api/places/{pid}", tag = "places",
    params(("pid" = String, Path, description = "Place id")),
    request_body = crate::openapi::UpdatePlaceRequest,
    responses((status = 200, description = "Updated", body = crate::openapi::PlaceResponse), (status = 401, description = "Not the owner"), (status = 404, description = "Not Found"), (status = 422, description = "Invalid inputs")),
    security(("bearer" = [])))]
pub async fn update_place(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(pid): Path<String>,
    body: Result<Json<PlaceUpdate>, JsonRejection>,
) -> Result<Json<PlaceBody>, ApiError> {
    let Json(update) = body.map_err(|e| {
        debug!(error = %e, "rejected update body");
        ApiError::invalid_inputs()
    })?;
    let id = parse_id(&pid, PLACE_NOT_FOUND)?;
    let place = state.places.update(id, auth.user_id, update).await?;
    Ok(Json(PlaceBody { place }))
}

#[utoipa::path(delete, path = "/api/places/{pid}", tag = "places",
    params(("pid" = String, Path, description = "Place id")),
    responses((status = 200, description = "Deleted", body = crate::openapi::MessageResponse), (status = 401, description = "Not the owner"), (status = 404, description = "Not Found")),
    security(("bearer" = [])))]
pub async fn delete_place(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(pid): Path<String>,
) -> Result<Json<Message>, ApiError> {
    let id = parse_id(&pid, PLACE_NOT_FOUND)?;
    let removed = state.places.delete(id, auth.user_id).await?;
    state.images.discard(&removed.image).await;
    Ok(Json(Message::new("Deleted place.")))
}
