/// OpenAPI documentation generation.
pub mod documentation;
/// Guess Ledger: one guess batch per player.
pub mod guess_service;
/// Health check service.
pub mod health_service;
/// Room lifecycle: creation, joining and phase transitions.
pub mod room_service;
/// Per-baby and bulk scoring.
pub mod scoring_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Storage connection supervisor toggling degraded mode.
pub mod storage_supervisor;
/// Roster, reveal tally and leaderboard views.
pub mod view_service;
