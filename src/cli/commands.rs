pub mod import_players;
pub mod initdb;
pub mod migrate_and_serve;
pub mod serve;

pub use import_players::import_players;
pub use initdb::init_database;
pub use migrate_and_serve::migrate_and_serve;
pub use serve::serve;
