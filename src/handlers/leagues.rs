use crate::errors::{ApiError, api_error, database_error, membership_error, not_found, write_error};
use crate::handlers::teams::{TeamResponse, find_team};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use model::entities::league::{self, DEFAULT_SEASON_DURATION};
use model::entities::position::{self, PlayerPosition};
use model::entities::{roster_requirement, team_membership};
use model::scoring::ScoringRules;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating a league
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateLeagueRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Profile id of the commissioner; a user commissions at most one league
    pub commissioner_id: i32,
    pub description: Option<String>,
    /// Scoring ruleset (default: the standard ruleset)
    #[schema(value_type = Option<Object>)]
    pub scoring_system: Option<ScoringRules>,
    #[validate(range(min = 1, max = 100))]
    pub roster_size: i32,
    #[validate(range(min = 1, max = 100))]
    pub lineup_size: i32,
    /// Number of weeks in the season (default: 38)
    #[validate(range(min = 1, max = 100))]
    pub season_duration: Option<i32>,
}

/// Request body for updating a league
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateLeagueRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub scoring_system: Option<ScoringRules>,
    #[validate(range(min = 1, max = 100))]
    pub roster_size: Option<i32>,
    #[validate(range(min = 1, max = 100))]
    pub lineup_size: Option<i32>,
    #[validate(range(min = 1, max = 100))]
    pub season_duration: Option<i32>,
}

/// Request body for enrolling a team in a league
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MembershipRequest {
    pub team_id: i32,
}

/// Request body for setting how many players of a position a roster holds
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct RosterRequirementRequest {
    #[schema(value_type = String, example = "Defender")]
    pub position: PlayerPosition,
    #[validate(range(min = 0, max = 100))]
    pub required_number: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RosterRequirementResponse {
    pub league_id: i32,
    #[schema(value_type = String)]
    pub position: PlayerPosition,
    pub required_number: i32,
}

/// League response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LeagueResponse {
    pub id: i32,
    pub name: String,
    pub commissioner_id: i32,
    pub description: String,
    #[schema(value_type = Object)]
    pub scoring_system: ScoringRules,
    pub roster_size: i32,
    pub lineup_size: i32,
    pub season_duration: i32,
}

impl From<league::Model> for LeagueResponse {
    fn from(model: league::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            commissioner_id: model.commissioner_id,
            description: model.description,
            scoring_system: model.scoring_system,
            roster_size: model.roster_size,
            lineup_size: model.lineup_size,
            season_duration: model.season_duration,
        }
    }
}

pub(crate) async fn find_league(state: &AppState, league_id: i32) -> Result<league::Model, ApiError> {
    match league::Entity::find_by_id(league_id).one(&state.db).await {
        Ok(Some(league)) => Ok(league),
        Ok(None) => Err(not_found("League", league_id)),
        Err(db_error) => Err(database_error("Failed to retrieve league", db_error)),
    }
}

fn check_lineup(lineup_size: i32, roster_size: i32) -> Result<(), ApiError> {
    if lineup_size > roster_size {
        warn!("Lineup size {} exceeds roster size {}", lineup_size, roster_size);
        return Err(api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("lineup_size ({}) must not exceed roster_size ({})", lineup_size, roster_size),
            "INVALID_LINEUP_SIZE",
        ));
    }
    Ok(())
}

/// Create a new league
#[utoipa::path(
    post,
    path = "/api/v1/leagues",
    tag = "leagues",
    request_body = CreateLeagueRequest,
    responses(
        (status = 201, description = "League created successfully", body = ApiResponse<LeagueResponse>),
        (status = 400, description = "Invalid request or unknown commissioner", body = ErrorResponse),
        (status = 409, description = "Commissioner already runs a league", body = ErrorResponse),
        (status = 422, description = "Inconsistent sizes", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_league(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateLeagueRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<LeagueResponse>>), ApiError> {
    trace!("Entering create_league function");
    debug!("Creating league {} for commissioner {}", request.name, request.commissioner_id);

    check_lineup(request.lineup_size, request.roster_size)?;

    let new_league = league::ActiveModel {
        name: Set(request.name),
        commissioner_id: Set(request.commissioner_id),
        description: Set(request.description.unwrap_or_default()),
        scoring_system: Set(request.scoring_system.unwrap_or_else(ScoringRules::standard)),
        roster_size: Set(request.roster_size),
        lineup_size: Set(request.lineup_size),
        season_duration: Set(request.season_duration.unwrap_or(DEFAULT_SEASON_DURATION)),
        ..Default::default()
    };

    let league = new_league.insert(&state.db).await.map_err(|e| {
        write_error(
            "Failed to create league",
            e,
            "Commissioner already runs a league",
            "COMMISSIONER_ALREADY_ASSIGNED",
        )
    })?;

    info!("League created successfully with ID: {}", league.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(LeagueResponse::from(league), "League created successfully")),
    ))
}

/// Get all leagues
#[utoipa::path(
    get,
    path = "/api/v1/leagues",
    tag = "leagues",
    responses(
        (status = 200, description = "Leagues retrieved successfully", body = ApiResponse<Vec<LeagueResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_leagues(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<LeagueResponse>>>, ApiError> {
    trace!("Entering get_leagues function");

    let leagues = league::Entity::find()
        .order_by_asc(league::Column::Id)
        .all(&state.db)
        .await
        .map_err(|e| database_error("Failed to retrieve leagues", e))?;

    info!("Successfully retrieved {} leagues", leagues.len());
    let data = leagues.into_iter().map(LeagueResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Leagues retrieved successfully")))
}

/// Get a specific league by ID
#[utoipa::path(
    get,
    path = "/api/v1/leagues/{league_id}",
    tag = "leagues",
    params(
        ("league_id" = i32, Path, description = "League ID"),
    ),
    responses(
        (status = 200, description = "League retrieved successfully", body = ApiResponse<LeagueResponse>),
        (status = 404, description = "League not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_league(
    Path(league_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<LeagueResponse>>, ApiError> {
    trace!("Entering get_league function for league_id: {}", league_id);

    let league = find_league(&state, league_id).await?;
    Ok(Json(ApiResponse::ok(LeagueResponse::from(league), "League retrieved successfully")))
}

/// Update a league
#[utoipa::path(
    put,
    path = "/api/v1/leagues/{league_id}",
    tag = "leagues",
    params(
        ("league_id" = i32, Path, description = "League ID"),
    ),
    request_body = UpdateLeagueRequest,
    responses(
        (status = 200, description = "League updated successfully", body = ApiResponse<LeagueResponse>),
        (status = 404, description = "League not found", body = ErrorResponse),
        (status = 422, description = "Inconsistent sizes", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_league(
    Path(league_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateLeagueRequest>>,
) -> Result<Json<ApiResponse<LeagueResponse>>, ApiError> {
    trace!("Entering update_league function for league_id: {}", league_id);

    let existing = find_league(&state, league_id).await?;
    check_lineup(
        request.lineup_size.unwrap_or(existing.lineup_size),
        request.roster_size.unwrap_or(existing.roster_size),
    )?;

    let mut active: league::ActiveModel = existing.into();
    let mut updated_fields = Vec::new();

    if let Some(name) = request.name {
        active.name = Set(name);
        updated_fields.push("name");
    }
    if let Some(description) = request.description {
        active.description = Set(description);
        updated_fields.push("description");
    }
    if let Some(scoring_system) = request.scoring_system {
        active.scoring_system = Set(scoring_system);
        updated_fields.push("scoring_system");
    }
    if let Some(roster_size) = request.roster_size {
        active.roster_size = Set(roster_size);
        updated_fields.push("roster_size");
    }
    if let Some(lineup_size) = request.lineup_size {
        active.lineup_size = Set(lineup_size);
        updated_fields.push("lineup_size");
    }
    if let Some(season_duration) = request.season_duration {
        active.season_duration = Set(season_duration);
        updated_fields.push("season_duration");
    }
    debug!("Updating fields: {:?}", updated_fields);

    let league = active
        .update(&state.db)
        .await
        .map_err(|e| database_error("Failed to update league", e))?;

    info!("League with ID {} updated successfully", league_id);
    Ok(Json(ApiResponse::ok(LeagueResponse::from(league), "League updated successfully")))
}

/// Delete a league
#[utoipa::path(
    delete,
    path = "/api/v1/leagues/{league_id}",
    tag = "leagues",
    params(
        ("league_id" = i32, Path, description = "League ID"),
    ),
    responses(
        (status = 200, description = "League deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "League not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_league(
    Path(league_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_league function for league_id: {}", league_id);

    let delete_result = league::Entity::delete_by_id(league_id)
        .exec(&state.db)
        .await
        .map_err(|e| database_error("Failed to delete league", e))?;

    if delete_result.rows_affected == 0 {
        return Err(not_found("League", league_id));
    }

    info!("League with ID {} deleted successfully", league_id);
    Ok(Json(ApiResponse::ok(format!("League {} deleted", league_id), "League deleted successfully")))
}

/// List the teams taking part in a league
#[utoipa::path(
    get,
    path = "/api/v1/leagues/{league_id}/teams",
    tag = "leagues",
    params(
        ("league_id" = i32, Path, description = "League ID"),
    ),
    responses(
        (status = 200, description = "Participants retrieved successfully", body = ApiResponse<Vec<TeamResponse>>),
        (status = 404, description = "League not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_league_teams(
    Path(league_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TeamResponse>>>, ApiError> {
    trace!("Entering get_league_teams function for league_id: {}", league_id);

    let league = find_league(&state, league_id).await?;
    let teams = league
        .participants(&state.db)
        .await
        .map_err(|e| database_error("Failed to retrieve participants", e))?;

    debug!("League {} has {} participants", league_id, teams.len());
    let data = teams.into_iter().map(TeamResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Participants retrieved successfully")))
}

/// Enroll a team in a league
#[utoipa::path(
    post,
    path = "/api/v1/leagues/{league_id}/teams",
    tag = "leagues",
    params(
        ("league_id" = i32, Path, description = "League ID"),
    ),
    request_body = MembershipRequest,
    responses(
        (status = 201, description = "Team enrolled", body = ApiResponse<TeamResponse>),
        (status = 404, description = "League or team not found", body = ErrorResponse),
        (status = 409, description = "Team already in league", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn join_league(
    Path(league_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<MembershipRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TeamResponse>>), ApiError> {
    trace!("Entering join_league function for league_id: {}", league_id);

    find_league(&state, league_id).await?;
    let team = find_team(&state, request.team_id).await?;

    team_membership::Entity::join(&state.db, team.id, league_id)
        .await
        .map_err(membership_error)?;

    info!("Team {} joined league {}", team.id, league_id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(TeamResponse::from(team), "Team enrolled in league")),
    ))
}

/// Withdraw a team from a league
#[utoipa::path(
    delete,
    path = "/api/v1/leagues/{league_id}/teams/{team_id}",
    tag = "leagues",
    params(
        ("league_id" = i32, Path, description = "League ID"),
        ("team_id" = i32, Path, description = "Team ID"),
    ),
    responses(
        (status = 200, description = "Team withdrawn", body = ApiResponse<String>),
        (status = 404, description = "Team is not in the league", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn leave_league(
    Path((league_id, team_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering leave_league function");

    let removed = team_membership::Entity::leave(&state.db, team_id, league_id)
        .await
        .map_err(|e| database_error("Failed to withdraw team", e))?;

    if !removed {
        warn!("Team {} is not a member of league {}", team_id, league_id);
        return Err(api_error(
            StatusCode::NOT_FOUND,
            format!("Team {} is not a member of league {}", team_id, league_id),
            "NOT_A_MEMBER",
        ));
    }

    info!("Team {} left league {}", team_id, league_id);
    Ok(Json(ApiResponse::ok(
        format!("Team {} withdrawn from league {}", team_id, league_id),
        "Team withdrawn from league",
    )))
}

/// List a league's roster requirements
#[utoipa::path(
    get,
    path = "/api/v1/leagues/{league_id}/roster-requirements",
    tag = "leagues",
    params(
        ("league_id" = i32, Path, description = "League ID"),
    ),
    responses(
        (status = 200, description = "Requirements retrieved", body = ApiResponse<Vec<RosterRequirementResponse>>),
        (status = 404, description = "League not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_roster_requirements(
    Path(league_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RosterRequirementResponse>>>, ApiError> {
    trace!("Entering get_roster_requirements function for league_id: {}", league_id);

    let league = find_league(&state, league_id).await?;
    let mut requirements = league
        .roster_requirements(&state.db)
        .await
        .map_err(|e| database_error("Failed to retrieve roster requirements", e))?;
    requirements.sort();

    let data = requirements
        .into_iter()
        .map(|(position, required_number)| RosterRequirementResponse {
            league_id,
            position,
            required_number,
        })
        .collect();
    Ok(Json(ApiResponse::ok(data, "Roster requirements retrieved successfully")))
}

/// Set the number of players a roster holds at one position
#[utoipa::path(
    put,
    path = "/api/v1/leagues/{league_id}/roster-requirements",
    tag = "leagues",
    params(
        ("league_id" = i32, Path, description = "League ID"),
    ),
    request_body = RosterRequirementRequest,
    responses(
        (status = 200, description = "Requirement stored", body = ApiResponse<RosterRequirementResponse>),
        (status = 404, description = "League not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn set_roster_requirement(
    Path(league_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<RosterRequirementRequest>>,
) -> Result<Json<ApiResponse<RosterRequirementResponse>>, ApiError> {
    trace!("Entering set_roster_requirement function for league_id: {}", league_id);

    find_league(&state, league_id).await?;
    let catalog_row = position::Entity::find_by_position(&state.db, request.position)
        .await
        .map_err(|e| database_error("Failed to look up position", e))?
        .ok_or_else(|| {
            warn!("Position catalog has no row for {}", request.position);
            api_error(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Position {} is not in the catalog", request.position),
                "UNKNOWN_POSITION",
            )
        })?;

    let existing = roster_requirement::Entity::find()
        .filter(roster_requirement::Column::LeagueId.eq(league_id))
        .filter(roster_requirement::Column::PositionId.eq(catalog_row.id))
        .one(&state.db)
        .await
        .map_err(|e| database_error("Failed to retrieve roster requirement", e))?;

    let stored = match existing {
        Some(requirement) => {
            debug!("Replacing requirement {} for {}", requirement.id, request.position);
            let mut active: roster_requirement::ActiveModel = requirement.into();
            active.required_number = Set(request.required_number);
            active.update(&state.db).await
        }
        None => {
            debug!("Adding requirement for {}", request.position);
            roster_requirement::ActiveModel {
                league_id: Set(league_id),
                position_id: Set(catalog_row.id),
                required_number: Set(request.required_number),
                ..Default::default()
            }
            .insert(&state.db)
            .await
        }
    }
    .map_err(|e| {
        write_error(
            "Failed to store roster requirement",
            e,
            "Requirement already exists",
            "ROSTER_REQUIREMENT_CONFLICT",
        )
    })?;

    info!(
        "League {} now requires {} x {}",
        league_id, stored.required_number, request.position
    );
    Ok(Json(ApiResponse::ok(
        RosterRequirementResponse {
            league_id,
            position: request.position,
            required_number: stored.required_number,
        },
        "Roster requirement stored",
    )))
}
