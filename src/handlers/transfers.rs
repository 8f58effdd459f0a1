use crate::errors::{ApiError, compute_error, database_error, not_found};
use crate::handlers::players::find_player;
use crate::handlers::teams::find_team;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{NaiveDate, Utc};
use compute::transfer::execute_transfer;
use model::entities::transfer::{self, NewTransfer};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request body for moving a player between teams
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateTransferRequest {
    pub player_id: i32,
    pub outgoing_team_id: i32,
    pub incoming_team_id: i32,
    /// Defaults to today
    pub transfer_date: Option<NaiveDate>,
    #[validate(range(min = 1, max = 100))]
    pub gameweek: i32,
    /// Bonus or penalty points attached to the transfer (default: 0)
    #[validate(range(min = -100, max = 100))]
    pub additional_points: Option<i32>,
}

/// Transfer response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransferResponse {
    pub id: i32,
    pub player_id: i32,
    pub outgoing_team_id: i32,
    pub incoming_team_id: i32,
    pub transfer_date: NaiveDate,
    pub gameweek: i32,
    pub additional_points: i32,
    /// e.g. "Bukayo Saka transferred from Team A to Team B on 2024-09-01"
    pub summary: String,
}

/// Query parameters for listing transfers
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct TransferQuery {
    /// Only transfers of this player
    pub player_id: Option<i32>,
}

async fn describe(state: &AppState, record: transfer::Model) -> Result<TransferResponse, ApiError> {
    let player = find_player(state, record.player_id).await?;
    let outgoing = find_team(state, record.outgoing_team_id).await?;
    let incoming = find_team(state, record.incoming_team_id).await?;
    let summary = record.summary(&player, &outgoing, &incoming);

    Ok(TransferResponse {
        id: record.id,
        player_id: record.player_id,
        outgoing_team_id: record.outgoing_team_id,
        incoming_team_id: record.incoming_team_id,
        transfer_date: record.transfer_date,
        gameweek: record.gameweek,
        additional_points: record.additional_points,
        summary,
    })
}

/// Move a player between two teams of the same league. The incoming team's
/// roster rules apply as they do for a direct signing.
#[utoipa::path(
    post,
    path = "/api/v1/transfers",
    tag = "transfers",
    request_body = CreateTransferRequest,
    responses(
        (status = 201, description = "Transfer executed", body = ApiResponse<TransferResponse>),
        (status = 400, description = "Invalid request or identical teams", body = ErrorResponse),
        (status = 404, description = "Player or team not found", body = ErrorResponse),
        (status = 409, description = "Player not on the outgoing team, already on the incoming one, teams without a common league, or incoming roster rules violated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_transfer(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateTransferRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<TransferResponse>>), ApiError> {
    trace!("Entering create_transfer function");

    find_player(&state, request.player_id).await?;
    find_team(&state, request.outgoing_team_id).await?;
    find_team(&state, request.incoming_team_id).await?;

    let new_transfer = NewTransfer {
        player_id: request.player_id,
        outgoing_team_id: request.outgoing_team_id,
        incoming_team_id: request.incoming_team_id,
        transfer_date: request.transfer_date.unwrap_or_else(|| Utc::now().date_naive()),
        gameweek: request.gameweek,
        additional_points: request.additional_points.unwrap_or(0),
    };
    debug!("Executing {:?}", new_transfer);

    let record = execute_transfer(&state.db, new_transfer)
        .await
        .map_err(compute_error)?;

    let response = describe(&state, record).await?;
    info!("{}", response.summary);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(response, "Transfer executed successfully")),
    ))
}

/// List transfers, most recent first
#[utoipa::path(
    get,
    path = "/api/v1/transfers",
    tag = "transfers",
    params(TransferQuery),
    responses(
        (status = 200, description = "Transfers retrieved successfully", body = ApiResponse<Vec<TransferResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_transfers(
    Query(query): Query<TransferQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TransferResponse>>>, ApiError> {
    trace!("Entering get_transfers function");

    let mut query_builder = transfer::Entity::find();
    if let Some(player_id) = query.player_id {
        query_builder = query_builder.filter(transfer::Column::PlayerId.eq(player_id));
    }

    let records = query_builder
        .order_by_desc(transfer::Column::TransferDate)
        .order_by_desc(transfer::Column::Id)
        .all(&state.db)
        .await
        .map_err(|e| database_error("Failed to retrieve transfers", e))?;

    let mut data = Vec::with_capacity(records.len());
    for record in records {
        data.push(describe(&state, record).await?);
    }

    info!("Successfully retrieved {} transfers", data.len());
    Ok(Json(ApiResponse::ok(data, "Transfers retrieved successfully")))
}

/// Get a specific transfer by ID
#[utoipa::path(
    get,
    path = "/api/v1/transfers/{transfer_id}",
    tag = "transfers",
    params(
        ("transfer_id" = i32, Path, description = "Transfer ID"),
    ),
    responses(
        (status = 200, description = "Transfer retrieved successfully", body = ApiResponse<TransferResponse>),
        (status = 404, description = "Transfer not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_transfer(
    Path(transfer_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TransferResponse>>, ApiError> {
    trace!("Entering get_transfer function for transfer_id: {}", transfer_id);

    let record = transfer::Entity::find_by_id(transfer_id)
        .one(&state.db)
        .await
        .map_err(|e| database_error("Failed to retrieve transfer", e))?
        .ok_or_else(|| not_found("Transfer", transfer_id))?;

    let response = describe(&state, record).await?;
    Ok(Json(ApiResponse::ok(response, "Transfer retrieved successfully")))
}
