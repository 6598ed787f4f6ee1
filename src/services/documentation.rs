use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the Baby Match backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::catalog::get_catalog,
        crate::routes::rooms::create_room,
        crate::routes::rooms::find_room_by_code,
        crate::routes::rooms::join_room,
        crate::routes::rooms::get_room,
        crate::routes::rooms::get_roster,
        crate::routes::rooms::start_guessing,
        crate::routes::rooms::start_reveal,
        crate::routes::rooms::next_baby,
        crate::routes::rooms::show_results,
        crate::routes::rooms::get_reveal_tally,
        crate::routes::rooms::score_baby,
        crate::routes::rooms::recompute_scores,
        crate::routes::rooms::get_leaderboard,
        crate::routes::players::submit_guesses,
        crate::routes::sse::public_stream,
        crate::routes::sse::room_stream,
    ),
    components(
        schemas(
            crate::error::ErrorBody,
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::dto::phase::VisiblePhase,
            crate::dto::sse::Handshake,
            crate::dto::sse::SystemStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "catalog", description = "Babies and guess options"),
        (name = "rooms", description = "Room lifecycle driven by the host"),
        (name = "players", description = "Player guess submission"),
        (name = "views", description = "Roster, reveal tally and leaderboard"),
        (name = "scores", description = "Scoring actions"),
        (name = "sse", description = "Server-sent events streams"),
    )
)]
pub struct ApiDoc;
