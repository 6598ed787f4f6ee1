/// Persistence port and its adapters.
pub mod game_store;
/// Entities and partial updates exchanged with the store.
pub mod models;
/// Backend-agnostic storage errors.
pub mod storage;
