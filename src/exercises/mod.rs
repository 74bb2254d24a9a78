pub mod catalog;
pub mod handlers;

use crate::state::AppState;
use axum::Router;

pub use catalog::Catalog;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
