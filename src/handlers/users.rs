use crate::errors::{ApiError, database_error, not_found, write_error};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use model::entities::{custom_user, user};
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating a new user
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateUserRequest {
    /// Username (must be unique)
    #[validate(length(min = 1, max = 150))]
    pub username: String,
}

/// Request body for updating a user
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateUserRequest {
    /// Username (must be unique)
    #[validate(length(min = 1, max = 150))]
    pub username: Option<String>,
}

/// User profile response model. `id` is the profile id that teams,
/// leagues and notifications refer to.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
}

impl UserResponse {
    fn new(profile: custom_user::Model, identity: user::Model) -> Self {
        Self {
            id: profile.id,
            user_id: identity.id,
            username: identity.username,
        }
    }
}

async fn load_profile(state: &AppState, profile_id: i32) -> Result<(custom_user::Model, user::Model), ApiError> {
    match custom_user::Entity::find_with_user(&state.db, profile_id).await {
        Ok(Some(found)) => Ok(found),
        Ok(None) => Err(not_found("User", profile_id)),
        Err(db_error) => Err(database_error("Failed to retrieve user", db_error)),
    }
}

/// Create a new user together with its profile
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Username already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_user(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateUserRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    trace!("Entering create_user function");
    debug!("Creating user with username: {}", request.username);

    let conflict = format!("Username '{}' already exists", request.username);
    let txn = state
        .db
        .begin()
        .await
        .map_err(|e| database_error("Failed to start transaction", e))?;

    let identity = user::ActiveModel {
        username: Set(request.username.clone()),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| write_error("Failed to create user", e, &conflict, "USERNAME_ALREADY_EXISTS"))?;

    let profile = custom_user::ActiveModel {
        user_id: Set(identity.id),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| database_error("Failed to create user profile", e))?;

    txn.commit()
        .await
        .map_err(|e| database_error("Failed to commit user creation", e))?;

    info!(
        "User created successfully with profile ID: {}, username: {}",
        profile.id, identity.username
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(UserResponse::new(profile, identity), "User created successfully")),
    ))
}

/// Get all users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<UserResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_users(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    trace!("Entering get_users function");

    let rows = custom_user::Entity::find()
        .find_also_related(user::Entity)
        .all(&state.db)
        .await
        .map_err(|e| database_error("Failed to retrieve users", e))?;

    let users: Vec<UserResponse> = rows
        .into_iter()
        .filter_map(|(profile, identity)| identity.map(|identity| UserResponse::new(profile, identity)))
        .collect();

    info!("Successfully retrieved {} users", users.len());
    Ok(Json(ApiResponse::ok(users, "Users retrieved successfully")))
}

/// Get a specific user by profile ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User profile ID"),
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    trace!("Entering get_user function for user_id: {}", user_id);

    let (profile, identity) = load_profile(&state, user_id).await?;
    info!("Successfully retrieved user {} ({})", profile.id, identity.username);
    Ok(Json(ApiResponse::ok(
        UserResponse::new(profile, identity),
        "User retrieved successfully",
    )))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User profile ID"),
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Username already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateUserRequest>>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    trace!("Entering update_user function for user_id: {}", user_id);

    let (profile, identity) = load_profile(&state, user_id).await?;
    let Some(username) = request.username else {
        debug!("No fields to update for user ID: {}", user_id);
        return Ok(Json(ApiResponse::ok(
            UserResponse::new(profile, identity),
            "User updated successfully",
        )));
    };

    debug!("Updating username to: {}", username);
    let conflict = format!("Username '{}' already exists", username);
    let mut active: user::ActiveModel = identity.into();
    active.username = Set(username);
    let identity = active
        .update(&state.db)
        .await
        .map_err(|e| write_error("Failed to update user", e, &conflict, "USERNAME_ALREADY_EXISTS"))?;

    info!("User with ID {} updated successfully", user_id);
    Ok(Json(ApiResponse::ok(
        UserResponse::new(profile, identity),
        "User updated successfully",
    )))
}

/// Delete a user. Their teams, league and notifications go with them.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User profile ID"),
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_user function for user_id: {}", user_id);

    let (_, identity) = load_profile(&state, user_id).await?;
    let delete_result = user::Entity::delete_by_id(identity.id)
        .exec(&state.db)
        .await
        .map_err(|e| database_error("Failed to delete user", e))?;

    if delete_result.rows_affected == 0 {
        warn!("User with ID {} vanished before deletion", user_id);
        return Err(not_found("User", user_id));
    }

    info!("User with ID {} deleted successfully", user_id);
    Ok(Json(ApiResponse::ok(format!("User {} deleted", user_id), "User deleted successfully")))
}
