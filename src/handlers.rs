pub mod health;
pub mod leagues;
pub mod matches;
pub mod matchups;
pub mod notifications;
pub mod pages;
pub mod players;
pub mod scoring;
pub mod teams;
pub mod transfers;
pub mod users;
