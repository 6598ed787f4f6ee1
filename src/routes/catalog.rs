use axum::{Json, Router, extract::State, routing::get};

use crate::{dto::catalog::CatalogView, services::view_service, state::SharedState};

#[utoipa::path(
    get,
    path = "/catalog",
    tag = "catalog",
    responses((status = 200, description = "Babies and guess options, answers withheld", body = CatalogView))
)]
/// Babies and the names players can pick from.
pub async fn get_catalog(State(state): State<SharedState>) -> Json<CatalogView> {
    Json(view_service::catalog(&state))
}

/// Configure the catalog route.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/catalog", get(get_catalog))
}
