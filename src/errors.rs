//! Mapping from store and compute errors to HTTP error responses.

use axum::{http::StatusCode, response::Json};
use compute::ComputeError;
use model::entities::team_membership::MembershipError;
use sea_orm::{DbErr, SqlErr};
use tracing::{error, warn};

use crate::schemas::ErrorResponse;

/// Error half of every JSON handler's return type.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(status: StatusCode, error: impl Into<String>, code: &str) -> ApiError {
    (status, Json(ErrorResponse::new(error, code)))
}

pub fn not_found(entity: &str, id: i32) -> ApiError {
    warn!("{} with ID {} not found", entity, id);
    api_error(
        StatusCode::NOT_FOUND,
        format!("{} with id {} not found", entity, id),
        &format!("{}_NOT_FOUND", entity.to_uppercase().replace(' ', "_")),
    )
}

pub fn database_error(context: &str, db_error: DbErr) -> ApiError {
    error!("{}: {}", context, db_error);
    api_error(StatusCode::INTERNAL_SERVER_ERROR, context, "DATABASE_ERROR")
}

/// Maps a failed insert or update. Unique violations become 409 with
/// `conflict_code`, foreign key violations become 400 `INVALID_REFERENCE`.
pub fn write_error(context: &str, db_error: DbErr, conflict_message: &str, conflict_code: &str) -> ApiError {
    match db_error.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            warn!("{}: unique constraint violated ({})", context, detail);
            api_error(StatusCode::CONFLICT, conflict_message, conflict_code)
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            warn!("{}: foreign key constraint violated ({})", context, detail);
            api_error(
                StatusCode::BAD_REQUEST,
                "A referenced record does not exist",
                "INVALID_REFERENCE",
            )
        }
        _ => database_error(context, db_error),
    }
}

pub fn compute_error(compute_error: ComputeError) -> ApiError {
    match compute_error {
        ComputeError::Database(db_error) => database_error("Database error during computation", db_error),
        ComputeError::NotFound { entity, id } => not_found(entity, id),
        err @ ComputeError::NotMember { .. } => {
            warn!("{}", err);
            api_error(StatusCode::NOT_FOUND, err.to_string(), "NOT_A_MEMBER")
        }
        err @ ComputeError::AlreadyOnRoster { .. } => {
            warn!("{}", err);
            api_error(StatusCode::CONFLICT, err.to_string(), "PLAYER_ALREADY_ON_TEAM")
        }
        err @ ComputeError::RosterFull { .. } => {
            warn!("{}", err);
            api_error(StatusCode::CONFLICT, err.to_string(), "ROSTER_FULL")
        }
        err @ ComputeError::PositionLimitReached { .. } => {
            warn!("{}", err);
            api_error(StatusCode::CONFLICT, err.to_string(), "POSITION_LIMIT_REACHED")
        }
        err @ ComputeError::SameTeamTransfer { .. } => {
            warn!("{}", err);
            api_error(StatusCode::BAD_REQUEST, err.to_string(), "SAME_TEAM_TRANSFER")
        }
        err @ ComputeError::NotOnOutgoingTeam { .. } => {
            warn!("{}", err);
            api_error(StatusCode::CONFLICT, err.to_string(), "PLAYER_NOT_ON_OUTGOING_TEAM")
        }
        err @ ComputeError::NoSharedLeague { .. } => {
            warn!("{}", err);
            api_error(StatusCode::CONFLICT, err.to_string(), "NO_SHARED_LEAGUE")
        }
        err @ ComputeError::PointsOutOfRange { .. } => {
            warn!("{}", err);
            api_error(StatusCode::UNPROCESSABLE_ENTITY, err.to_string(), "POINTS_OUT_OF_RANGE")
        }
        err @ ComputeError::NotEnoughParticipants { .. } => {
            warn!("{}", err);
            api_error(StatusCode::UNPROCESSABLE_ENTITY, err.to_string(), "NOT_ENOUGH_PARTICIPANTS")
        }
    }
}

pub fn membership_error(membership_error: MembershipError) -> ApiError {
    match membership_error {
        err @ MembershipError::AlreadyMember { .. } => {
            api_error(StatusCode::CONFLICT, err.to_string(), "ALREADY_A_MEMBER")
        }
        err @ MembershipError::UnknownReference { .. } => {
            api_error(StatusCode::BAD_REQUEST, err.to_string(), "INVALID_REFERENCE")
        }
        MembershipError::Database(db_error) => database_error("Failed to enroll team", db_error),
    }
}
