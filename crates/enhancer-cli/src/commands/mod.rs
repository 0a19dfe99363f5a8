pub mod auth;
pub mod config;
pub mod enhance;
pub mod history;
pub mod utils;
