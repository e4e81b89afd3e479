use crate::state::AppState;
use axum::Router;

mod dto;
pub mod gate;
pub mod handlers;
pub mod password;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
