pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod recipes;
pub mod session;
pub mod state;
pub mod users;
