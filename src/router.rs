use crate::handlers::{
    health::health_check,
    leagues::{
        create_league, delete_league, get_league, get_league_teams, get_leagues,
        get_roster_requirements, join_league, leave_league, set_roster_requirement, update_league,
    },
    matches::{create_match, delete_match, get_match, get_matches},
    matchups::{generate_matchups, get_league_matchups, record_matchup_result},
    notifications::{
        create_system_notification, create_user_notification, get_system_notifications,
        get_user_notifications, mark_system_notification_read,
    },
    pages::player_details,
    players::{
        create_player, delete_player, get_player, get_player_statistic, get_players,
        update_player, update_player_statistics,
    },
    scoring::{
        create_scoring_rules, delete_scoring_rules, get_scoring_rules, get_scoring_rules_list,
        score_in_league, score_with_rules,
    },
    teams::{
        add_team_player, create_team, delete_team, get_roster_status, get_team, get_team_players,
        get_teams, remove_team_player, update_team,
    },
    transfers::{create_transfer, get_transfer, get_transfers},
    users::{create_user, delete_user, get_user, get_users, update_user},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let request_timeout = state.request_timeout;

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // HTML pages
        .route("/players/:player_id", get(player_details))
        // User routes
        .route("/api/v1/users", post(create_user))
        .route("/api/v1/users", get(get_users))
        .route("/api/v1/users/:user_id", get(get_user))
        .route("/api/v1/users/:user_id", put(update_user))
        .route("/api/v1/users/:user_id", delete(delete_user))
        .route("/api/v1/users/:user_id/notifications", post(create_user_notification))
        .route("/api/v1/users/:user_id/notifications", get(get_user_notifications))
        // Player routes
        .route("/api/v1/players", post(create_player))
        .route("/api/v1/players", get(get_players))
        .route("/api/v1/players/:player_id", get(get_player))
        .route("/api/v1/players/:player_id", put(update_player))
        .route("/api/v1/players/:player_id", delete(delete_player))
        .route("/api/v1/players/:player_id/statistics", patch(update_player_statistics))
        .route("/api/v1/players/:player_id/statistics/:statistic_name", get(get_player_statistic))
        // Team routes
        .route("/api/v1/teams", post(create_team))
        .route("/api/v1/teams", get(get_teams))
        .route("/api/v1/teams/:team_id", get(get_team))
        .route("/api/v1/teams/:team_id", put(update_team))
        .route("/api/v1/teams/:team_id", delete(delete_team))
        .route("/api/v1/teams/:team_id/players", get(get_team_players))
        .route("/api/v1/teams/:team_id/players", post(add_team_player))
        .route("/api/v1/teams/:team_id/players/:player_id", delete(remove_team_player))
        .route("/api/v1/teams/:team_id/roster", get(get_roster_status))
        // League routes
        .route("/api/v1/leagues", post(create_league))
        .route("/api/v1/leagues", get(get_leagues))
        .route("/api/v1/leagues/:league_id", get(get_league))
        .route("/api/v1/leagues/:league_id", put(update_league))
        .route("/api/v1/leagues/:league_id", delete(delete_league))
        .route("/api/v1/leagues/:league_id/teams", get(get_league_teams))
        .route("/api/v1/leagues/:league_id/teams", post(join_league))
        .route("/api/v1/leagues/:league_id/teams/:team_id", delete(leave_league))
        .route("/api/v1/leagues/:league_id/roster-requirements", get(get_roster_requirements))
        .route("/api/v1/leagues/:league_id/roster-requirements", put(set_roster_requirement))
        .route("/api/v1/leagues/:league_id/matchups", get(get_league_matchups))
        .route("/api/v1/leagues/:league_id/matchups/generate", post(generate_matchups))
        .route("/api/v1/leagues/:league_id/score", post(score_in_league))
        // Matchup routes
        .route("/api/v1/matchups/:matchup_id/result", post(record_matchup_result))
        // Match routes
        .route("/api/v1/matches", post(create_match))
        .route("/api/v1/matches", get(get_matches))
        .route("/api/v1/matches/:match_id", get(get_match))
        .route("/api/v1/matches/:match_id", delete(delete_match))
        // Transfer routes
        .route("/api/v1/transfers", post(create_transfer))
        .route("/api/v1/transfers", get(get_transfers))
        .route("/api/v1/transfers/:transfer_id", get(get_transfer))
        // Scoring rules routes
        .route("/api/v1/scoring-rules", post(create_scoring_rules))
        .route("/api/v1/scoring-rules", get(get_scoring_rules_list))
        .route("/api/v1/scoring-rules/:rules_id", get(get_scoring_rules))
        .route("/api/v1/scoring-rules/:rules_id", delete(delete_scoring_rules))
        .route("/api/v1/scoring-rules/:rules_id/score", post(score_with_rules))
        // Notification routes
        .route("/api/v1/notifications", post(create_system_notification))
        .route("/api/v1/notifications", get(get_system_notifications))
        .route("/api/v1/notifications/:notification_id/read", post(mark_system_notification_read))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
