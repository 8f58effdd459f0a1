use std::sync::Arc;
use std::time::Duration;

use minijinja::Environment;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::handlers::{
    leagues::{
        CreateLeagueRequest, LeagueResponse, MembershipRequest, RosterRequirementRequest,
        RosterRequirementResponse, UpdateLeagueRequest,
    },
    matches::{CreateMatchRequest, MatchResponse},
    matchups::{MatchupResponse, MatchupResultRequest, MatchupResultResponse},
    notifications::{CreateNotificationRequest, NotificationResponse},
    players::{
        CreatePlayerRequest, PlayerResponse, StatisticResponse, UpdatePlayerRequest,
        UpdateStatisticsRequest,
    },
    scoring::{
        CreateScoringRulesRequest, EventPointsResponse, PlayerEventsRequest, PlayerScoreResponse,
        ScoreRequest, ScoringRulesResponse,
    },
    teams::{
        AddPlayerRequest, CreateTeamRequest, PositionCountResponse, RosterStatusResponse,
        TeamResponse, UpdateTeamRequest,
    },
    transfers::{CreateTransferRequest, TransferResponse},
    users::{CreateUserRequest, UpdateUserRequest, UserResponse},
};
use crate::templates;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Compiled HTML templates
    pub templates: Arc<Environment<'static>>,
    /// Upper bound for a single request
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(db: DatabaseConnection, request_timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            db,
            templates: Arc::new(templates::environment()?),
            request_timeout,
        })
    }
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: &str) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
            success: false,
        }
    }
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::users::create_user,
        crate::handlers::users::get_users,
        crate::handlers::users::get_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::players::create_player,
        crate::handlers::players::get_players,
        crate::handlers::players::get_player,
        crate::handlers::players::update_player,
        crate::handlers::players::delete_player,
        crate::handlers::players::update_player_statistics,
        crate::handlers::players::get_player_statistic,
        crate::handlers::teams::create_team,
        crate::handlers::teams::get_teams,
        crate::handlers::teams::get_team,
        crate::handlers::teams::update_team,
        crate::handlers::teams::delete_team,
        crate::handlers::teams::get_team_players,
        crate::handlers::teams::add_team_player,
        crate::handlers::teams::remove_team_player,
        crate::handlers::teams::get_roster_status,
        crate::handlers::leagues::create_league,
        crate::handlers::leagues::get_leagues,
        crate::handlers::leagues::get_league,
        crate::handlers::leagues::update_league,
        crate::handlers::leagues::delete_league,
        crate::handlers::leagues::get_league_teams,
        crate::handlers::leagues::join_league,
        crate::handlers::leagues::leave_league,
        crate::handlers::leagues::get_roster_requirements,
        crate::handlers::leagues::set_roster_requirement,
        crate::handlers::matches::create_match,
        crate::handlers::matches::get_matches,
        crate::handlers::matches::get_match,
        crate::handlers::matches::delete_match,
        crate::handlers::matchups::get_league_matchups,
        crate::handlers::matchups::generate_matchups,
        crate::handlers::matchups::record_matchup_result,
        crate::handlers::transfers::create_transfer,
        crate::handlers::transfers::get_transfers,
        crate::handlers::transfers::get_transfer,
        crate::handlers::scoring::create_scoring_rules,
        crate::handlers::scoring::get_scoring_rules_list,
        crate::handlers::scoring::get_scoring_rules,
        crate::handlers::scoring::delete_scoring_rules,
        crate::handlers::scoring::score_with_rules,
        crate::handlers::scoring::score_in_league,
        crate::handlers::notifications::create_system_notification,
        crate::handlers::notifications::get_system_notifications,
        crate::handlers::notifications::mark_system_notification_read,
        crate::handlers::notifications::create_user_notification,
        crate::handlers::notifications::get_user_notifications,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            CreateUserRequest,
            UpdateUserRequest,
            UserResponse,
            CreatePlayerRequest,
            UpdatePlayerRequest,
            UpdateStatisticsRequest,
            PlayerResponse,
            StatisticResponse,
            CreateTeamRequest,
            UpdateTeamRequest,
            AddPlayerRequest,
            TeamResponse,
            PositionCountResponse,
            RosterStatusResponse,
            CreateLeagueRequest,
            UpdateLeagueRequest,
            MembershipRequest,
            RosterRequirementRequest,
            RosterRequirementResponse,
            LeagueResponse,
            CreateMatchRequest,
            MatchResponse,
            MatchupResponse,
            MatchupResultRequest,
            MatchupResultResponse,
            CreateTransferRequest,
            TransferResponse,
            CreateScoringRulesRequest,
            ScoringRulesResponse,
            PlayerEventsRequest,
            ScoreRequest,
            EventPointsResponse,
            PlayerScoreResponse,
            CreateNotificationRequest,
            NotificationResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User profiles"),
        (name = "players", description = "Players and their statistics"),
        (name = "teams", description = "Fantasy teams and rosters"),
        (name = "leagues", description = "Leagues, memberships and roster requirements"),
        (name = "matches", description = "Real-world match results"),
        (name = "matchups", description = "League schedules and head-to-head results"),
        (name = "transfers", description = "Player transfers between teams"),
        (name = "scoring", description = "Scoring rulesets and point calculation"),
        (name = "notifications", description = "System and user notifications"),
    ),
    info(
        title = "Fantasy League API",
        description = "Fantasy football league service: players, teams, leagues, schedules and scoring",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
