use crate::errors::{ApiError, api_error, database_error, not_found};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use model::entities::player;
use model::entities::position::PlayerPosition;
use model::statistics::{PlayerStatistics, StatValue};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request body for creating a player
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreatePlayerRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Goalkeeper, Defender, Midfielder or Forward (any case, or GK/DEF/MID/FWD)
    #[schema(value_type = String, example = "Midfielder")]
    pub position: PlayerPosition,
    #[schema(value_type = String, example = "7.50")]
    pub current_form: Decimal,
    #[schema(value_type = String, example = "10.50")]
    pub price: Decimal,
    /// Real-world club
    #[validate(length(max = 100))]
    pub epl_team: Option<String>,
    /// Initial statistics; values must be scalars
    #[schema(value_type = Option<Object>)]
    pub statistics: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Request body for updating a player
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdatePlayerRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[schema(value_type = Option<String>)]
    pub position: Option<PlayerPosition>,
    #[schema(value_type = Option<String>)]
    pub current_form: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    #[validate(length(max = 100))]
    pub epl_team: Option<String>,
    /// Reset the club to null; cannot be combined with `epl_team`
    #[serde(default)]
    pub clear_epl_team: bool,
}

/// Statistics to merge into a player's record
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateStatisticsRequest {
    #[schema(value_type = Object, example = json!({"goals": 7, "assists": 3}))]
    pub statistics: serde_json::Map<String, serde_json::Value>,
}

/// Player response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlayerResponse {
    pub id: i32,
    pub name: String,
    #[schema(value_type = String)]
    pub position: PlayerPosition,
    #[schema(value_type = String)]
    pub current_form: Decimal,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub epl_team: Option<String>,
    #[schema(value_type = Object)]
    pub statistics: PlayerStatistics,
}

impl From<player::Model> for PlayerResponse {
    fn from(model: player::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            position: model.position,
            current_form: model.current_form,
            price: model.price,
            epl_team: model.epl_team,
            statistics: model.statistics,
        }
    }
}

/// A single statistic of a player; `value` is null when never recorded
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatisticResponse {
    pub player_id: i32,
    pub name: String,
    #[schema(value_type = Option<Object>)]
    pub value: Option<StatValue>,
}

/// Query parameters for listing players
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct PlayerQuery {
    /// Page number (default: 1)
    #[validate(range(min = 1, max = 10000))]
    pub page: Option<u64>,
    /// Page size (default: 50)
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u64>,
    /// Filter by position
    pub position: Option<String>,
    /// Filter by real-world club
    pub epl_team: Option<String>,
}

/// Checks that a value fits a two-place decimal column and rounds it.
fn checked_decimal(field: &'static str, value: Decimal) -> Result<Decimal, ApiError> {
    player::checked_amount(field, value).map_err(|e| {
        warn!("{} value {} is out of range", e.field, e.value);
        api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string(), "INVALID_DECIMAL")
    })
}

fn checked_statistics(raw: serde_json::Map<String, serde_json::Value>) -> Result<PlayerStatistics, ApiError> {
    PlayerStatistics::from_json_map(raw).map_err(|e| {
        warn!("Rejected statistics: {}", e);
        api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string(), "INVALID_STATISTICS")
    })
}

pub(crate) async fn find_player(state: &AppState, player_id: i32) -> Result<player::Model, ApiError> {
    match player::Entity::find_by_id(player_id).one(&state.db).await {
        Ok(Some(player)) => Ok(player),
        Ok(None) => Err(not_found("Player", player_id)),
        Err(db_error) => Err(database_error("Failed to retrieve player", db_error)),
    }
}

/// Create a new player
#[utoipa::path(
    post,
    path = "/api/v1/players",
    tag = "players",
    request_body = CreatePlayerRequest,
    responses(
        (status = 201, description = "Player created successfully", body = ApiResponse<PlayerResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 422, description = "Invalid position, decimal or statistics", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_player(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreatePlayerRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<PlayerResponse>>), ApiError> {
    trace!("Entering create_player function");
    debug!("Creating player {} ({})", request.name, request.position);

    let statistics = match request.statistics {
        Some(raw) => checked_statistics(raw)?,
        None => PlayerStatistics::new(),
    };

    let new_player = player::ActiveModel {
        name: Set(request.name),
        position: Set(request.position),
        current_form: Set(checked_decimal("current_form", request.current_form)?),
        price: Set(checked_decimal("price", request.price)?),
        epl_team: Set(request.epl_team),
        statistics: Set(statistics),
        ..Default::default()
    };

    let player = new_player
        .insert(&state.db)
        .await
        .map_err(|e| database_error("Failed to create player", e))?;

    info!("Player created successfully with ID: {}, name: {}", player.id, player.name);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(PlayerResponse::from(player), "Player created successfully")),
    ))
}

/// Get all players
#[utoipa::path(
    get,
    path = "/api/v1/players",
    tag = "players",
    params(PlayerQuery),
    responses(
        (status = 200, description = "Players retrieved successfully", body = ApiResponse<Vec<PlayerResponse>>),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_players(
    Valid(Query(query)): Valid<Query<PlayerQuery>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PlayerResponse>>>, ApiError> {
    trace!("Entering get_players function");

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(50);
    debug!("Fetching players - page: {}, limit: {}", page, limit);

    let mut query_builder = player::Entity::find();
    if let Some(position) = query.position {
        let position = position
            .parse::<PlayerPosition>()
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string(), "INVALID_POSITION"))?;
        query_builder = query_builder.filter(player::Column::Position.eq(position));
    }
    if let Some(epl_team) = query.epl_team {
        query_builder = query_builder.filter(player::Column::EplTeam.eq(epl_team));
    }

    let players = query_builder
        .order_by_asc(player::Column::Id)
        .paginate(&state.db, limit)
        .fetch_page(page - 1)
        .await
        .map_err(|e| database_error("Failed to retrieve players", e))?;

    info!("Successfully retrieved {} players", players.len());
    let data = players.into_iter().map(PlayerResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Players retrieved successfully")))
}

/// Get a specific player by ID
#[utoipa::path(
    get,
    path = "/api/v1/players/{player_id}",
    tag = "players",
    params(
        ("player_id" = i32, Path, description = "Player ID"),
    ),
    responses(
        (status = 200, description = "Player retrieved successfully", body = ApiResponse<PlayerResponse>),
        (status = 404, description = "Player not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_player(
    Path(player_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PlayerResponse>>, ApiError> {
    trace!("Entering get_player function for player_id: {}", player_id);

    let player = find_player(&state, player_id).await?;
    info!("Successfully retrieved player: {}", player.name);
    Ok(Json(ApiResponse::ok(PlayerResponse::from(player), "Player retrieved successfully")))
}

/// Update a player
#[utoipa::path(
    put,
    path = "/api/v1/players/{player_id}",
    tag = "players",
    params(
        ("player_id" = i32, Path, description = "Player ID"),
    ),
    request_body = UpdatePlayerRequest,
    responses(
        (status = 200, description = "Player updated successfully", body = ApiResponse<PlayerResponse>),
        (status = 400, description = "Invalid request or club both set and cleared", body = ErrorResponse),
        (status = 404, description = "Player not found", body = ErrorResponse),
        (status = 422, description = "Invalid value", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_player(
    Path(player_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdatePlayerRequest>>,
) -> Result<Json<ApiResponse<PlayerResponse>>, ApiError> {
    trace!("Entering update_player function for player_id: {}", player_id);

    let existing = find_player(&state, player_id).await?;
    let mut active: player::ActiveModel = existing.into();
    let mut updated_fields = Vec::new();

    if let Some(name) = request.name {
        active.name = Set(name);
        updated_fields.push("name");
    }
    if let Some(position) = request.position {
        active.position = Set(position);
        updated_fields.push("position");
    }
    if let Some(current_form) = request.current_form {
        active.current_form = Set(checked_decimal("current_form", current_form)?);
        updated_fields.push("current_form");
    }
    if let Some(price) = request.price {
        active.price = Set(checked_decimal("price", price)?);
        updated_fields.push("price");
    }
    match (request.epl_team, request.clear_epl_team) {
        (Some(_), true) => {
            warn!("Update of player {} both sets and clears the club", player_id);
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                "epl_team and clear_epl_team cannot be combined",
                "CONFLICTING_FIELDS",
            ));
        }
        (Some(epl_team), false) => {
            active.epl_team = Set(Some(epl_team));
            updated_fields.push("epl_team");
        }
        (None, true) => {
            active.epl_team = Set(None);
            updated_fields.push("epl_team");
        }
        (None, false) => {}
    }
    debug!("Updating fields: {:?}", updated_fields);

    let player = active
        .update(&state.db)
        .await
        .map_err(|e| database_error("Failed to update player", e))?;

    info!("Player with ID {} updated successfully", player_id);
    Ok(Json(ApiResponse::ok(PlayerResponse::from(player), "Player updated successfully")))
}

/// Delete a player
#[utoipa::path(
    delete,
    path = "/api/v1/players/{player_id}",
    tag = "players",
    params(
        ("player_id" = i32, Path, description = "Player ID"),
    ),
    responses(
        (status = 200, description = "Player deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Player not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_player(
    Path(player_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_player function for player_id: {}", player_id);

    let delete_result = player::Entity::delete_by_id(player_id)
        .exec(&state.db)
        .await
        .map_err(|e| database_error("Failed to delete player", e))?;

    if delete_result.rows_affected == 0 {
        return Err(not_found("Player", player_id));
    }

    info!("Player with ID {} deleted successfully", player_id);
    Ok(Json(ApiResponse::ok(format!("Player {} deleted", player_id), "Player deleted successfully")))
}

/// Merge statistics into a player's record
#[utoipa::path(
    patch,
    path = "/api/v1/players/{player_id}/statistics",
    tag = "players",
    params(
        ("player_id" = i32, Path, description = "Player ID"),
    ),
    request_body = UpdateStatisticsRequest,
    responses(
        (status = 200, description = "Statistics updated successfully", body = ApiResponse<PlayerResponse>),
        (status = 404, description = "Player not found", body = ErrorResponse),
        (status = 422, description = "Statistics contain unsupported values", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_player_statistics(
    Path(player_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateStatisticsRequest>,
) -> Result<Json<ApiResponse<PlayerResponse>>, ApiError> {
    trace!("Entering update_player_statistics function for player_id: {}", player_id);

    let update = checked_statistics(request.statistics)?;
    let player = find_player(&state, player_id).await?;
    debug!("Merging {} statistics into player {}", update.len(), player.id);

    let player = player
        .update_stats(&state.db, update)
        .await
        .map_err(|e| database_error("Failed to update player statistics", e))?;

    info!("Statistics of player {} updated", player_id);
    Ok(Json(ApiResponse::ok(PlayerResponse::from(player), "Statistics updated successfully")))
}

/// Read a single statistic of a player
#[utoipa::path(
    get,
    path = "/api/v1/players/{player_id}/statistics/{statistic_name}",
    tag = "players",
    params(
        ("player_id" = i32, Path, description = "Player ID"),
        ("statistic_name" = String, Path, description = "Statistic name, e.g. goals"),
    ),
    responses(
        (status = 200, description = "Statistic retrieved; value is null when never recorded", body = ApiResponse<StatisticResponse>),
        (status = 404, description = "Player not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_player_statistic(
    Path((player_id, statistic_name)): Path<(i32, String)>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<StatisticResponse>>, ApiError> {
    trace!("Entering get_player_statistic function");

    let player = find_player(&state, player_id).await?;
    let value = player.get_statistics(&statistic_name).cloned();
    if value.is_none() {
        debug!("Player {} has no statistic named {}", player_id, statistic_name);
    }

    Ok(Json(ApiResponse::ok(
        StatisticResponse {
            player_id,
            name: statistic_name,
            value,
        },
        "Statistic retrieved successfully",
    )))
}
