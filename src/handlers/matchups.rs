use crate::errors::{ApiError, compute_error, database_error};
use crate::handlers::leagues::find_league;
use crate::handlers::teams::TeamResponse;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use compute::{results, schedule};
use model::entities::matchup;
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

/// A scheduled head-to-head fixture
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MatchupResponse {
    pub id: i32,
    pub league_id: i32,
    pub week_number: i32,
    pub home_team_id: i32,
    pub away_team_id: i32,
    /// Recorded result, null until one is posted
    pub home_points: Option<i32>,
    pub away_points: Option<i32>,
}

impl From<matchup::Model> for MatchupResponse {
    fn from(model: matchup::Model) -> Self {
        Self {
            id: model.id,
            league_id: model.league_id,
            week_number: model.week_number,
            home_team_id: model.home_team_id,
            away_team_id: model.away_team_id,
            home_points: model.home_points,
            away_points: model.away_points,
        }
    }
}

/// Fantasy points both sides scored in a matchup
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct MatchupResultRequest {
    #[validate(range(min = -1000, max = 1000))]
    pub home_points: i32,
    #[validate(range(min = -1000, max = 1000))]
    pub away_points: i32,
}

/// Both teams after a result has been applied
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MatchupResultResponse {
    pub matchup_id: i32,
    pub home_team: TeamResponse,
    pub away_team: TeamResponse,
}

/// List a league's schedule
#[utoipa::path(
    get,
    path = "/api/v1/leagues/{league_id}/matchups",
    tag = "matchups",
    params(
        ("league_id" = i32, Path, description = "League ID"),
    ),
    responses(
        (status = 200, description = "Matchups retrieved successfully", body = ApiResponse<Vec<MatchupResponse>>),
        (status = 404, description = "League not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_league_matchups(
    Path(league_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MatchupResponse>>>, ApiError> {
    trace!("Entering get_league_matchups function for league_id: {}", league_id);

    let league = find_league(&state, league_id).await?;
    let matchups = league
        .matchups(&state.db)
        .await
        .map_err(|e| database_error("Failed to retrieve matchups", e))?;

    info!("Successfully retrieved {} matchups", matchups.len());
    let data = matchups.into_iter().map(MatchupResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Matchups retrieved successfully")))
}

/// Replace a league's schedule with a round robin over its participants
#[utoipa::path(
    post,
    path = "/api/v1/leagues/{league_id}/matchups/generate",
    tag = "matchups",
    params(
        ("league_id" = i32, Path, description = "League ID"),
    ),
    responses(
        (status = 201, description = "Schedule generated", body = ApiResponse<Vec<MatchupResponse>>),
        (status = 404, description = "League not found", body = ErrorResponse),
        (status = 422, description = "Fewer than two participants", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn generate_matchups(
    Path(league_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<MatchupResponse>>>), ApiError> {
    trace!("Entering generate_matchups function for league_id: {}", league_id);

    let matchups = schedule::generate_league_schedule(&state.db, league_id)
        .await
        .map_err(compute_error)?;

    info!("Generated {} matchups for league {}", matchups.len(), league_id);
    let data = matchups.into_iter().map(MatchupResponse::from).collect();
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(data, "Schedule generated"))))
}

/// Apply a head-to-head result to both teams. Posting again for the same
/// matchup replaces the earlier result.
#[utoipa::path(
    post,
    path = "/api/v1/matchups/{matchup_id}/result",
    tag = "matchups",
    params(
        ("matchup_id" = i32, Path, description = "Matchup ID"),
    ),
    request_body = MatchupResultRequest,
    responses(
        (status = 200, description = "Result recorded", body = ApiResponse<MatchupResultResponse>),
        (status = 400, description = "Points out of range", body = ErrorResponse),
        (status = 404, description = "Matchup not found", body = ErrorResponse),
        (status = 422, description = "Season totals would go out of range", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn record_matchup_result(
    Path(matchup_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<MatchupResultRequest>>,
) -> Result<Json<ApiResponse<MatchupResultResponse>>, ApiError> {
    trace!("Entering record_matchup_result function for matchup_id: {}", matchup_id);
    debug!(
        "Recording {}-{} for matchup {}",
        request.home_points, request.away_points, matchup_id
    );

    let outcome = results::record_matchup_result(&state.db, matchup_id, request.home_points, request.away_points)
        .await
        .map_err(compute_error)?;

    info!(
        "Result of matchup {} recorded: {} {} - {} {}",
        matchup_id, outcome.home, request.home_points, request.away_points, outcome.away
    );
    Ok(Json(ApiResponse::ok(
        MatchupResultResponse {
            matchup_id,
            home_team: TeamResponse::from(outcome.home),
            away_team: TeamResponse::from(outcome.away),
        },
        "Result recorded",
    )))
}
