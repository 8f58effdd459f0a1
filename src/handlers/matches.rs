use crate::errors::{ApiError, api_error, database_error, not_found, write_error};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{NaiveDate, NaiveDateTime};
use model::entities::football_match::{self, score_line};
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request body for recording a match
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateMatchRequest {
    pub home_team_id: i32,
    pub away_team_id: i32,
    pub date: NaiveDate,
    pub date_time: NaiveDateTime,
    /// "home-away"; derived from the goal counts when omitted
    #[schema(example = "2-1")]
    pub final_score: Option<String>,
    #[validate(range(min = 0, max = 99))]
    pub home_team_goals: i32,
    #[validate(range(min = 0, max = 99))]
    pub away_team_goals: i32,
    #[validate(range(min = 0, max = 99))]
    pub cards: i32,
}

/// Match response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MatchResponse {
    pub id: i32,
    pub home_team_id: i32,
    pub away_team_id: i32,
    pub date: NaiveDate,
    pub date_time: NaiveDateTime,
    pub final_score: String,
    pub home_team_goals: i32,
    pub away_team_goals: i32,
    pub cards: i32,
}

impl From<football_match::Model> for MatchResponse {
    fn from(model: football_match::Model) -> Self {
        Self {
            id: model.id,
            home_team_id: model.home_team_id,
            away_team_id: model.away_team_id,
            date: model.date,
            date_time: model.date_time,
            final_score: model.final_score,
            home_team_goals: model.home_team_goals,
            away_team_goals: model.away_team_goals,
            cards: model.cards,
        }
    }
}

/// Query parameters for listing matches
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct MatchQuery {
    /// Only matches this team played in, home or away
    pub team_id: Option<i32>,
}

/// Record a match
#[utoipa::path(
    post,
    path = "/api/v1/matches",
    tag = "matches",
    request_body = CreateMatchRequest,
    responses(
        (status = 201, description = "Match recorded", body = ApiResponse<MatchResponse>),
        (status = 400, description = "Invalid request, unknown team or inconsistent score", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_match(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateMatchRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<MatchResponse>>), ApiError> {
    trace!("Entering create_match function");

    if request.home_team_id == request.away_team_id {
        warn!("Match between team {} and itself rejected", request.home_team_id);
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "A team cannot play against itself",
            "SAME_TEAM_MATCH",
        ));
    }

    let expected = score_line(request.home_team_goals, request.away_team_goals);
    let final_score = match request.final_score {
        Some(given) if given.trim() != expected => {
            warn!("Final score {} disagrees with goals {}", given, expected);
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                format!("final_score '{}' does not match the goal counts ({})", given, expected),
                "INCONSISTENT_SCORE",
            ));
        }
        _ => expected,
    };
    debug!("Recording match {} vs {}: {}", request.home_team_id, request.away_team_id, final_score);

    let new_match = football_match::ActiveModel {
        home_team_id: Set(request.home_team_id),
        away_team_id: Set(request.away_team_id),
        date: Set(request.date),
        date_time: Set(request.date_time),
        final_score: Set(final_score),
        home_team_goals: Set(request.home_team_goals),
        away_team_goals: Set(request.away_team_goals),
        cards: Set(request.cards),
        ..Default::default()
    };

    let recorded = new_match
        .insert(&state.db)
        .await
        .map_err(|e| write_error("Failed to record match", e, "Match already exists", "MATCH_ALREADY_EXISTS"))?;

    info!("Match recorded with ID: {}", recorded.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(MatchResponse::from(recorded), "Match recorded successfully")),
    ))
}

/// List matches, most recent first
#[utoipa::path(
    get,
    path = "/api/v1/matches",
    tag = "matches",
    params(MatchQuery),
    responses(
        (status = 200, description = "Matches retrieved successfully", body = ApiResponse<Vec<MatchResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_matches(
    Query(query): Query<MatchQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MatchResponse>>>, ApiError> {
    trace!("Entering get_matches function");

    let mut query_builder = football_match::Entity::find();
    if let Some(team_id) = query.team_id {
        query_builder = query_builder.filter(
            Condition::any()
                .add(football_match::Column::HomeTeamId.eq(team_id))
                .add(football_match::Column::AwayTeamId.eq(team_id)),
        );
    }

    let matches = query_builder
        .order_by_desc(football_match::Column::DateTime)
        .order_by_desc(football_match::Column::Id)
        .all(&state.db)
        .await
        .map_err(|e| database_error("Failed to retrieve matches", e))?;

    info!("Successfully retrieved {} matches", matches.len());
    let data = matches.into_iter().map(MatchResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Matches retrieved successfully")))
}

/// Get a specific match by ID
#[utoipa::path(
    get,
    path = "/api/v1/matches/{match_id}",
    tag = "matches",
    params(
        ("match_id" = i32, Path, description = "Match ID"),
    ),
    responses(
        (status = 200, description = "Match retrieved successfully", body = ApiResponse<MatchResponse>),
        (status = 404, description = "Match not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_match(
    Path(match_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<MatchResponse>>, ApiError> {
    trace!("Entering get_match function for match_id: {}", match_id);

    let found = football_match::Entity::find_by_id(match_id)
        .one(&state.db)
        .await
        .map_err(|e| database_error("Failed to retrieve match", e))?
        .ok_or_else(|| not_found("Match", match_id))?;

    Ok(Json(ApiResponse::ok(MatchResponse::from(found), "Match retrieved successfully")))
}

/// Delete a match
#[utoipa::path(
    delete,
    path = "/api/v1/matches/{match_id}",
    tag = "matches",
    params(
        ("match_id" = i32, Path, description = "Match ID"),
    ),
    responses(
        (status = 200, description = "Match deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Match not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_match(
    Path(match_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_match function for match_id: {}", match_id);

    let delete_result = football_match::Entity::delete_by_id(match_id)
        .exec(&state.db)
        .await
        .map_err(|e| database_error("Failed to delete match", e))?;

    if delete_result.rows_affected == 0 {
        return Err(not_found("Match", match_id));
    }

    info!("Match with ID {} deleted successfully", match_id);
    Ok(Json(ApiResponse::ok(format!("Match {} deleted", match_id), "Match deleted successfully")))
}
