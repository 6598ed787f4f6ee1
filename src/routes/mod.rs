use axum::Router;

use crate::state::SharedState;

pub mod catalog;
pub mod docs;
pub mod health;
pub mod players;
pub mod rooms;
pub mod sse;

/// Compose the REST, SSE and documentation trees over one shared state.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(sse::router())
        .merge(catalog::router())
        .merge(rooms::router())
        .merge(players::router())
        .merge(docs::router());

    api_router.with_state(state)
}
