use crate::errors::{ApiError, compute_error, database_error, not_found};
use crate::handlers::leagues::find_league;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use compute::scoring::{self, PlayerEvents, PlayerScore};
use model::entities::in_game_scoring;
use model::scoring::ScoringRules;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for storing a named ruleset
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateScoringRulesRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[schema(value_type = Object, example = json!({"goals": {"forward": 4}, "assists": 3, "red_cards": -3}))]
    pub rules: ScoringRules,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ScoringRulesResponse {
    pub id: i32,
    pub name: String,
    #[schema(value_type = Object)]
    pub rules: ScoringRules,
}

impl From<in_game_scoring::Model> for ScoringRulesResponse {
    fn from(model: in_game_scoring::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            rules: model.rules,
        }
    }
}

/// What a player did in one match. Omitted counts are zero.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct PlayerEventsRequest {
    pub goals: u32,
    pub assists: u32,
    pub clean_sheet: bool,
    pub yellow_cards: u32,
    pub red_cards: u32,
}

impl From<PlayerEventsRequest> for PlayerEvents {
    fn from(request: PlayerEventsRequest) -> Self {
        Self {
            goals: request.goals,
            assists: request.assists,
            clean_sheet: request.clean_sheet,
            yellow_cards: request.yellow_cards,
            red_cards: request.red_cards,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ScoreRequest {
    pub player_id: i32,
    #[serde(default)]
    pub events: PlayerEventsRequest,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventPointsResponse {
    /// goals, assists, clean_sheets, yellow_cards or red_cards
    pub event: String,
    pub count: u32,
    pub points: i64,
}

/// Points a player earned, with one breakdown entry per event kind
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlayerScoreResponse {
    pub player_id: i32,
    pub position: String,
    pub total: i64,
    pub breakdown: Vec<EventPointsResponse>,
}

impl From<PlayerScore> for PlayerScoreResponse {
    fn from(score: PlayerScore) -> Self {
        Self {
            player_id: score.player_id,
            position: score.position.to_string(),
            total: score.total,
            breakdown: score
                .breakdown
                .into_iter()
                .map(|entry| EventPointsResponse {
                    event: entry.event.to_string(),
                    count: entry.count,
                    points: entry.points,
                })
                .collect(),
        }
    }
}

async fn find_rules(state: &AppState, rules_id: i32) -> Result<in_game_scoring::Model, ApiError> {
    in_game_scoring::Entity::find_by_id(rules_id)
        .one(&state.db)
        .await
        .map_err(|e| database_error("Failed to retrieve scoring rules", e))?
        .ok_or_else(|| not_found("Scoring rules", rules_id))
}

async fn score(state: &AppState, rules: &ScoringRules, request: ScoreRequest) -> Result<PlayerScoreResponse, ApiError> {
    let player_score = scoring::score_player(&state.db, rules, request.player_id, request.events.into())
        .await
        .map_err(compute_error)?;
    debug!("Player {} scored {} points", player_score.player_id, player_score.total);
    Ok(PlayerScoreResponse::from(player_score))
}

/// Store a named scoring ruleset
#[utoipa::path(
    post,
    path = "/api/v1/scoring-rules",
    tag = "scoring",
    request_body = CreateScoringRulesRequest,
    responses(
        (status = 201, description = "Ruleset stored", body = ApiResponse<ScoringRulesResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 422, description = "Unknown event or position", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_scoring_rules(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateScoringRulesRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<ScoringRulesResponse>>), ApiError> {
    trace!("Entering create_scoring_rules function");

    let stored = in_game_scoring::ActiveModel {
        name: Set(request.name),
        rules: Set(request.rules),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| database_error("Failed to store scoring rules", e))?;

    info!("Scoring rules stored with ID: {}", stored.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(ScoringRulesResponse::from(stored), "Scoring rules stored successfully")),
    ))
}

/// List stored rulesets
#[utoipa::path(
    get,
    path = "/api/v1/scoring-rules",
    tag = "scoring",
    responses(
        (status = 200, description = "Rulesets retrieved successfully", body = ApiResponse<Vec<ScoringRulesResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_scoring_rules_list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ScoringRulesResponse>>>, ApiError> {
    trace!("Entering get_scoring_rules_list function");

    let rulesets = in_game_scoring::Entity::find()
        .order_by_asc(in_game_scoring::Column::Id)
        .all(&state.db)
        .await
        .map_err(|e| database_error("Failed to retrieve scoring rules", e))?;

    let data = rulesets.into_iter().map(ScoringRulesResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Scoring rules retrieved successfully")))
}

/// Get a stored ruleset
#[utoipa::path(
    get,
    path = "/api/v1/scoring-rules/{rules_id}",
    tag = "scoring",
    params(
        ("rules_id" = i32, Path, description = "Ruleset ID"),
    ),
    responses(
        (status = 200, description = "Ruleset retrieved successfully", body = ApiResponse<ScoringRulesResponse>),
        (status = 404, description = "Ruleset not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_scoring_rules(
    Path(rules_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ScoringRulesResponse>>, ApiError> {
    let rules = find_rules(&state, rules_id).await?;
    Ok(Json(ApiResponse::ok(ScoringRulesResponse::from(rules), "Scoring rules retrieved successfully")))
}

/// Delete a stored ruleset
#[utoipa::path(
    delete,
    path = "/api/v1/scoring-rules/{rules_id}",
    tag = "scoring",
    params(
        ("rules_id" = i32, Path, description = "Ruleset ID"),
    ),
    responses(
        (status = 200, description = "Ruleset deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Ruleset not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_scoring_rules(
    Path(rules_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_scoring_rules function for rules_id: {}", rules_id);

    let delete_result = in_game_scoring::Entity::delete_by_id(rules_id)
        .exec(&state.db)
        .await
        .map_err(|e| database_error("Failed to delete scoring rules", e))?;

    if delete_result.rows_affected == 0 {
        return Err(not_found("Scoring rules", rules_id));
    }

    info!("Scoring rules with ID {} deleted", rules_id);
    Ok(Json(ApiResponse::ok(format!("Scoring rules {} deleted", rules_id), "Scoring rules deleted successfully")))
}

/// Score a player's match events with a stored ruleset
#[utoipa::path(
    post,
    path = "/api/v1/scoring-rules/{rules_id}/score",
    tag = "scoring",
    params(
        ("rules_id" = i32, Path, description = "Ruleset ID"),
    ),
    request_body = ScoreRequest,
    responses(
        (status = 200, description = "Points calculated", body = ApiResponse<PlayerScoreResponse>),
        (status = 404, description = "Ruleset or player not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn score_with_rules(
    Path(rules_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ApiResponse<PlayerScoreResponse>>, ApiError> {
    trace!("Entering score_with_rules function for rules_id: {}", rules_id);

    let stored = find_rules(&state, rules_id).await?;
    let response = score(&state, &stored.rules, request).await?;
    Ok(Json(ApiResponse::ok(response, "Points calculated")))
}

/// Score a player's match events with a league's scoring system
#[utoipa::path(
    post,
    path = "/api/v1/leagues/{league_id}/score",
    tag = "scoring",
    params(
        ("league_id" = i32, Path, description = "League ID"),
    ),
    request_body = ScoreRequest,
    responses(
        (status = 200, description = "Points calculated", body = ApiResponse<PlayerScoreResponse>),
        (status = 404, description = "League or player not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn score_in_league(
    Path(league_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ApiResponse<PlayerScoreResponse>>, ApiError> {
    trace!("Entering score_in_league function for league_id: {}", league_id);

    let league = find_league(&state, league_id).await?;
    let response = score(&state, &league.scoring_system, request).await?;
    Ok(Json(ApiResponse::ok(response, "Points calculated")))
}
