use crate::errors::{ApiError, api_error, compute_error, database_error, not_found, write_error};
use crate::handlers::players::PlayerResponse;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use compute::roster::{self, RosterStatus};
use model::entities::team::{self, Formation};
use model::entities::team_player;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request body for creating a team
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Profile id of the owning user
    pub owner_id: i32,
    /// Formation in dashed notation (default: 4-4-2)
    #[schema(value_type = Option<String>, example = "4-3-3")]
    pub formation: Option<Formation>,
}

/// Request body for updating a team
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateTeamRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[schema(value_type = Option<String>)]
    pub formation: Option<Formation>,
}

/// Request body for putting a player on a team
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AddPlayerRequest {
    pub player_id: i32,
}

/// Team response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TeamResponse {
    pub id: i32,
    pub name: String,
    pub owner_id: i32,
    #[schema(value_type = String)]
    pub formation: Formation,
    pub weekly_pts: i32,
    pub total_pts: i32,
    pub pts_scored_against_weekly: i32,
    pub pts_scored_against_season: i32,
}

impl From<team::Model> for TeamResponse {
    fn from(model: team::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            owner_id: model.owner_id,
            formation: model.formation,
            weekly_pts: model.weekly_pts,
            total_pts: model.total_pts,
            pts_scored_against_weekly: model.pts_scored_against_weekly,
            pts_scored_against_season: model.pts_scored_against_season,
        }
    }
}

/// Players held at one position compared with the league requirement
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PositionCountResponse {
    pub position: String,
    pub count: usize,
    /// Absent when the league puts no limit on the position
    pub required: Option<i32>,
}

/// A team's roster measured against one league
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RosterStatusResponse {
    pub team_id: i32,
    pub league_id: i32,
    pub roster_size: i32,
    pub player_count: usize,
    pub positions: Vec<PositionCountResponse>,
    pub complete: bool,
}

impl From<RosterStatus> for RosterStatusResponse {
    fn from(status: RosterStatus) -> Self {
        Self {
            team_id: status.team_id,
            league_id: status.league_id,
            roster_size: status.roster_size,
            player_count: status.player_count,
            positions: status
                .positions
                .into_iter()
                .map(|entry| PositionCountResponse {
                    position: entry.position.to_string(),
                    count: entry.count,
                    required: entry.required,
                })
                .collect(),
            complete: status.complete,
        }
    }
}

/// Query parameters for listing teams
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct TeamQuery {
    /// Only teams of this owner
    pub owner_id: Option<i32>,
}

/// Query parameters for the roster status
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct RosterQuery {
    /// League whose rules the roster is measured against
    pub league_id: i32,
}

pub(crate) async fn find_team(state: &AppState, team_id: i32) -> Result<team::Model, ApiError> {
    match team::Entity::find_by_id(team_id).one(&state.db).await {
        Ok(Some(team)) => Ok(team),
        Ok(None) => Err(not_found("Team", team_id)),
        Err(db_error) => Err(database_error("Failed to retrieve team", db_error)),
    }
}

/// Create a new team
#[utoipa::path(
    post,
    path = "/api/v1/teams",
    tag = "teams",
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "Team created successfully", body = ApiResponse<TeamResponse>),
        (status = 400, description = "Invalid request or unknown owner", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_team(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateTeamRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<TeamResponse>>), ApiError> {
    trace!("Entering create_team function");
    let formation = request.formation.unwrap_or(Formation::FourFourTwo);
    debug!("Creating team {} for owner {} in {}", request.name, request.owner_id, formation);

    let new_team = team::ActiveModel {
        name: Set(request.name),
        owner_id: Set(request.owner_id),
        formation: Set(formation),
        weekly_pts: Set(0),
        total_pts: Set(0),
        pts_scored_against_weekly: Set(0),
        pts_scored_against_season: Set(0),
        ..Default::default()
    };

    let team = new_team
        .insert(&state.db)
        .await
        .map_err(|e| write_error("Failed to create team", e, "Team already exists", "TEAM_ALREADY_EXISTS"))?;

    info!("Team created successfully with ID: {}", team.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(TeamResponse::from(team), "Team created successfully")),
    ))
}

/// Get all teams
#[utoipa::path(
    get,
    path = "/api/v1/teams",
    tag = "teams",
    params(TeamQuery),
    responses(
        (status = 200, description = "Teams retrieved successfully", body = ApiResponse<Vec<TeamResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_teams(
    Query(query): Query<TeamQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TeamResponse>>>, ApiError> {
    trace!("Entering get_teams function");

    let mut query_builder = team::Entity::find();
    if let Some(owner_id) = query.owner_id {
        debug!("Filtering teams by owner {}", owner_id);
        query_builder = query_builder.filter(team::Column::OwnerId.eq(owner_id));
    }

    let teams = query_builder
        .order_by_asc(team::Column::Id)
        .all(&state.db)
        .await
        .map_err(|e| database_error("Failed to retrieve teams", e))?;

    info!("Successfully retrieved {} teams", teams.len());
    let data = teams.into_iter().map(TeamResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Teams retrieved successfully")))
}

/// Get a specific team by ID
#[utoipa::path(
    get,
    path = "/api/v1/teams/{team_id}",
    tag = "teams",
    params(
        ("team_id" = i32, Path, description = "Team ID"),
    ),
    responses(
        (status = 200, description = "Team retrieved successfully", body = ApiResponse<TeamResponse>),
        (status = 404, description = "Team not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_team(
    Path(team_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TeamResponse>>, ApiError> {
    trace!("Entering get_team function for team_id: {}", team_id);

    let team = find_team(&state, team_id).await?;
    Ok(Json(ApiResponse::ok(TeamResponse::from(team), "Team retrieved successfully")))
}

/// Update a team
#[utoipa::path(
    put,
    path = "/api/v1/teams/{team_id}",
    tag = "teams",
    params(
        ("team_id" = i32, Path, description = "Team ID"),
    ),
    request_body = UpdateTeamRequest,
    responses(
        (status = 200, description = "Team updated successfully", body = ApiResponse<TeamResponse>),
        (status = 404, description = "Team not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_team(
    Path(team_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateTeamRequest>>,
) -> Result<Json<ApiResponse<TeamResponse>>, ApiError> {
    trace!("Entering update_team function for team_id: {}", team_id);

    let existing = find_team(&state, team_id).await?;
    let mut active: team::ActiveModel = existing.into();

    if let Some(name) = request.name {
        debug!("Renaming team {} to {}", team_id, name);
        active.name = Set(name);
    }
    if let Some(formation) = request.formation {
        debug!("Switching team {} to {}", team_id, formation);
        active.formation = Set(formation);
    }

    let team = active
        .update(&state.db)
        .await
        .map_err(|e| database_error("Failed to update team", e))?;

    info!("Team with ID {} updated successfully", team_id);
    Ok(Json(ApiResponse::ok(TeamResponse::from(team), "Team updated successfully")))
}

/// Delete a team
#[utoipa::path(
    delete,
    path = "/api/v1/teams/{team_id}",
    tag = "teams",
    params(
        ("team_id" = i32, Path, description = "Team ID"),
    ),
    responses(
        (status = 200, description = "Team deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Team not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_team(
    Path(team_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_team function for team_id: {}", team_id);

    let delete_result = team::Entity::delete_by_id(team_id)
        .exec(&state.db)
        .await
        .map_err(|e| database_error("Failed to delete team", e))?;

    if delete_result.rows_affected == 0 {
        return Err(not_found("Team", team_id));
    }

    info!("Team with ID {} deleted successfully", team_id);
    Ok(Json(ApiResponse::ok(format!("Team {} deleted", team_id), "Team deleted successfully")))
}

/// List the players on a team
#[utoipa::path(
    get,
    path = "/api/v1/teams/{team_id}/players",
    tag = "teams",
    params(
        ("team_id" = i32, Path, description = "Team ID"),
    ),
    responses(
        (status = 200, description = "Roster retrieved successfully", body = ApiResponse<Vec<PlayerResponse>>),
        (status = 404, description = "Team not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_team_players(
    Path(team_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PlayerResponse>>>, ApiError> {
    trace!("Entering get_team_players function for team_id: {}", team_id);

    let team = find_team(&state, team_id).await?;
    let players = team
        .players(&state.db)
        .await
        .map_err(|e| database_error("Failed to retrieve roster", e))?;

    debug!("Team {} holds {} players", team_id, players.len());
    let data = players.into_iter().map(PlayerResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Roster retrieved successfully")))
}

/// Put a player on a team, enforcing the roster rules of every league the
/// team plays in
#[utoipa::path(
    post,
    path = "/api/v1/teams/{team_id}/players",
    tag = "teams",
    params(
        ("team_id" = i32, Path, description = "Team ID"),
    ),
    request_body = AddPlayerRequest,
    responses(
        (status = 201, description = "Player added to roster", body = ApiResponse<PlayerResponse>),
        (status = 404, description = "Team or player not found", body = ErrorResponse),
        (status = 409, description = "Player already on team, roster full or position limit reached", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn add_team_player(
    Path(team_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<AddPlayerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PlayerResponse>>), ApiError> {
    trace!("Entering add_team_player function for team_id: {}", team_id);

    roster::add_player_to_team(&state.db, team_id, request.player_id)
        .await
        .map_err(compute_error)?;

    let player = crate::handlers::players::find_player(&state, request.player_id).await?;
    info!("Player {} added to team {}", player.id, team_id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(PlayerResponse::from(player), "Player added to roster")),
    ))
}

/// Take a player off a team
#[utoipa::path(
    delete,
    path = "/api/v1/teams/{team_id}/players/{player_id}",
    tag = "teams",
    params(
        ("team_id" = i32, Path, description = "Team ID"),
        ("player_id" = i32, Path, description = "Player ID"),
    ),
    responses(
        (status = 200, description = "Player removed from roster", body = ApiResponse<String>),
        (status = 404, description = "Player is not on the team", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn remove_team_player(
    Path((team_id, player_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering remove_team_player function");

    let delete_result = team_player::Entity::delete_by_id((team_id, player_id))
        .exec(&state.db)
        .await
        .map_err(|e| database_error("Failed to update roster", e))?;

    if delete_result.rows_affected == 0 {
        warn!("Player {} is not on team {}", player_id, team_id);
        return Err(api_error(
            StatusCode::NOT_FOUND,
            format!("Player {} is not on team {}", player_id, team_id),
            "ROSTER_ENTRY_NOT_FOUND",
        ));
    }

    info!("Player {} removed from team {}", player_id, team_id);
    Ok(Json(ApiResponse::ok(
        format!("Player {} removed from team {}", player_id, team_id),
        "Player removed from roster",
    )))
}

/// Measure a team's roster against one of its leagues
#[utoipa::path(
    get,
    path = "/api/v1/teams/{team_id}/roster",
    tag = "teams",
    params(
        ("team_id" = i32, Path, description = "Team ID"),
        RosterQuery,
    ),
    responses(
        (status = 200, description = "Roster status computed", body = ApiResponse<RosterStatusResponse>),
        (status = 404, description = "Team or league not found, or team not in league", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_roster_status(
    Path(team_id): Path<i32>,
    Query(query): Query<RosterQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<RosterStatusResponse>>, ApiError> {
    trace!("Entering get_roster_status function for team_id: {}", team_id);

    let status = roster::roster_status(&state.db, team_id, query.league_id)
        .await
        .map_err(compute_error)?;

    debug!(
        "Team {} has {} players, complete: {}",
        team_id, status.player_count, status.complete
    );
    Ok(Json(ApiResponse::ok(
        RosterStatusResponse::from(status),
        "Roster status computed",
    )))
}
