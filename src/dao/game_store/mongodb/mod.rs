//! MongoDB adapter for [`crate::dao::game_store::GameStore`].

pub mod config;
mod connection;
mod error;
mod models;
pub mod store;

pub use config::MongoConfig;
pub use error::MongoDaoError;
pub use store::MongoGameStore;

use crate::dao::storage::StorageError;

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        match err {
            MongoDaoError::InvalidDocument { .. } | MongoDaoError::IndexOverflow { .. } => {
                StorageError::corrupted(err.to_string())
            }
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}
