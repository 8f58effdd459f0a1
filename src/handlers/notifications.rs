use crate::errors::{ApiError, database_error, not_found, write_error};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::NaiveDateTime;
use model::entities::{custom_user, system_notif, user_notif};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for a system or user notification
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateNotificationRequest {
    #[validate(length(min = 1, max = 1000))]
    pub message: String,
}

/// Notification response model; `user_id` is absent for system notifications
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotificationResponse {
    pub id: i32,
    pub user_id: Option<i32>,
    pub message: String,
    pub created_at: NaiveDateTime,
    pub is_read: bool,
}

impl From<system_notif::Model> for NotificationResponse {
    fn from(model: system_notif::Model) -> Self {
        Self {
            id: model.id,
            user_id: None,
            message: model.message,
            created_at: model.created_at,
            is_read: model.is_read,
        }
    }
}

impl From<user_notif::Model> for NotificationResponse {
    fn from(model: user_notif::Model) -> Self {
        Self {
            id: model.id,
            user_id: Some(model.user_id),
            message: model.message,
            created_at: model.created_at,
            is_read: model.is_read,
        }
    }
}

/// Publish a system notification
#[utoipa::path(
    post,
    path = "/api/v1/notifications",
    tag = "notifications",
    request_body = CreateNotificationRequest,
    responses(
        (status = 201, description = "Notification created", body = ApiResponse<NotificationResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_system_notification(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateNotificationRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<NotificationResponse>>), ApiError> {
    trace!("Entering create_system_notification function");

    let notification = system_notif::ActiveModel {
        message: Set(request.message),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| database_error("Failed to create notification", e))?;

    info!("System notification created with ID: {}", notification.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(NotificationResponse::from(notification), "Notification created")),
    ))
}

/// List system notifications, newest first
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    tag = "notifications",
    responses(
        (status = 200, description = "Notifications retrieved successfully", body = ApiResponse<Vec<NotificationResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_system_notifications(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<NotificationResponse>>>, ApiError> {
    trace!("Entering get_system_notifications function");

    let notifications = system_notif::Entity::find()
        .order_by_desc(system_notif::Column::CreatedAt)
        .order_by_desc(system_notif::Column::Id)
        .all(&state.db)
        .await
        .map_err(|e| database_error("Failed to retrieve notifications", e))?;

    let data = notifications.into_iter().map(NotificationResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Notifications retrieved successfully")))
}

/// Mark a system notification as read
#[utoipa::path(
    post,
    path = "/api/v1/notifications/{notification_id}/read",
    tag = "notifications",
    params(
        ("notification_id" = i32, Path, description = "Notification ID"),
    ),
    responses(
        (status = 200, description = "Notification marked as read", body = ApiResponse<NotificationResponse>),
        (status = 404, description = "Notification not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn mark_system_notification_read(
    Path(notification_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<NotificationResponse>>, ApiError> {
    trace!("Entering mark_system_notification_read function");

    let notification = system_notif::Entity::find_by_id(notification_id)
        .one(&state.db)
        .await
        .map_err(|e| database_error("Failed to retrieve notification", e))?
        .ok_or_else(|| not_found("Notification", notification_id))?;

    let mut active: system_notif::ActiveModel = notification.into();
    active.is_read = Set(true);
    let notification = active
        .update(&state.db)
        .await
        .map_err(|e| database_error("Failed to update notification", e))?;

    debug!("System notification {} marked as read", notification_id);
    Ok(Json(ApiResponse::ok(NotificationResponse::from(notification), "Notification marked as read")))
}

/// Send a notification to one user
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/notifications",
    tag = "notifications",
    params(
        ("user_id" = i32, Path, description = "User profile ID"),
    ),
    request_body = CreateNotificationRequest,
    responses(
        (status = 201, description = "Notification created", body = ApiResponse<NotificationResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_user_notification(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateNotificationRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<NotificationResponse>>), ApiError> {
    trace!("Entering create_user_notification function for user_id: {}", user_id);

    custom_user::Entity::find_by_id(user_id)
        .one(&state.db)
        .await
        .map_err(|e| database_error("Failed to retrieve user", e))?
        .ok_or_else(|| not_found("User", user_id))?;

    let notification = user_notif::ActiveModel {
        user_id: Set(user_id),
        message: Set(request.message),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| write_error("Failed to create notification", e, "Notification already exists", "NOTIFICATION_CONFLICT"))?;

    info!("Notification {} sent to user {}", notification.id, user_id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(NotificationResponse::from(notification), "Notification created")),
    ))
}

/// List a user's notifications, newest first. Unread ones are marked read
/// once listed; the response shows them as they were.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/notifications",
    tag = "notifications",
    params(
        ("user_id" = i32, Path, description = "User profile ID"),
    ),
    responses(
        (status = 200, description = "Notifications retrieved successfully", body = ApiResponse<Vec<NotificationResponse>>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_user_notifications(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<NotificationResponse>>>, ApiError> {
    trace!("Entering get_user_notifications function for user_id: {}", user_id);

    custom_user::Entity::find_by_id(user_id)
        .one(&state.db)
        .await
        .map_err(|e| database_error("Failed to retrieve user", e))?
        .ok_or_else(|| not_found("User", user_id))?;

    let notifications = user_notif::Entity::take_for_user(&state.db, user_id)
        .await
        .map_err(|e| database_error("Failed to retrieve notifications", e))?;

    debug!("User {} had {} notifications", user_id, notifications.len());
    let data = notifications.into_iter().map(NotificationResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Notifications retrieved successfully")))
}
