use model::entities::position::PlayerPosition;
use thiserror::Error;

/// Error types for the compute module
#[derive(Error, Debug)]
pub enum ComputeError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A referenced record does not exist
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    /// The team is not enrolled in the league
    #[error("Team {team_id} is not a member of league {league_id}")]
    NotMember { team_id: i32, league_id: i32 },

    #[error("Player {player_id} is already on team {team_id}")]
    AlreadyOnRoster { player_id: i32, team_id: i32 },

    #[error("Team {team_id} already has {roster_size} players, the limit in league {league_id}")]
    RosterFull {
        team_id: i32,
        league_id: i32,
        roster_size: i32,
    },

    #[error("League {league_id} allows at most {required} players at {position}")]
    PositionLimitReached {
        league_id: i32,
        position: PlayerPosition,
        required: i32,
    },

    #[error("A player cannot be transferred to team {team_id}, the team they are leaving")]
    SameTeamTransfer { team_id: i32 },

    #[error("Player {player_id} is not on team {team_id}")]
    NotOnOutgoingTeam { player_id: i32, team_id: i32 },

    /// Transfers only happen between teams of a common league
    #[error("Teams {outgoing_team_id} and {incoming_team_id} do not share a league")]
    NoSharedLeague {
        outgoing_team_id: i32,
        incoming_team_id: i32,
    },

    #[error("Season totals of team {team_id} would go out of range")]
    PointsOutOfRange { team_id: i32 },

    /// Scheduling needs at least two teams
    #[error("League {league_id} has {count} participant(s); at least two are needed")]
    NotEnoughParticipants { league_id: i32, count: usize },
}

impl ComputeError {
    pub(crate) fn not_found(entity: &'static str, id: i32) -> Self {
        ComputeError::NotFound { entity, id }
    }
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
