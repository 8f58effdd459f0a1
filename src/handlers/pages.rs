//! Server-rendered HTML pages.

use crate::handlers::players::PlayerResponse;
use crate::schemas::AppState;
use crate::templates::PLAYER_DETAILS;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use minijinja::context;
use model::entities::player;
use sea_orm::EntityTrait;
use tracing::{debug, error, instrument, warn};

fn page_not_found() -> Response {
    (StatusCode::NOT_FOUND, Html("<h1>Player not found</h1>")).into_response()
}

fn page_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Html("<h1>Internal server error</h1>")).into_response()
}

/// Player detail page. Identifiers that are not numbers are treated like
/// unknown players.
#[instrument(skip(state))]
pub async fn player_details(Path(raw_id): Path<String>, State(state): State<AppState>) -> Response {
    let Ok(player_id) = raw_id.parse::<i32>() else {
        warn!("Player page requested with non-numeric id {:?}", raw_id);
        return page_not_found();
    };

    let player = match player::Entity::find_by_id(player_id).one(&state.db).await {
        Ok(Some(player)) => player,
        Ok(None) => {
            warn!("Player with ID {} not found", player_id);
            return page_not_found();
        }
        Err(db_error) => {
            error!("Failed to retrieve player {}: {}", player_id, db_error);
            return page_error();
        }
    };

    debug!("Rendering {} for player {}", PLAYER_DETAILS, player.id);
    let rendered = state
        .templates
        .get_template(PLAYER_DETAILS)
        .and_then(|template| template.render(context! { player => PlayerResponse::from(player) }));

    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(render_error) => {
            error!("Failed to render {}: {}", PLAYER_DETAILS, render_error);
            page_error()
        }
    }
}
