use tracing::warn;

use crate::{dto::health::HealthStatus, state::SharedState};

/// Ping the store and report `ok` or `degraded`.
///
/// The flag itself is owned by the storage supervisor; a failed ping here only logs.
pub async fn health_status(state: &SharedState) -> HealthStatus {
    let Some(store) = state.game_store().await else {
        return HealthStatus::Degraded;
    };

    if let Err(err) = store.health_check().await {
        warn!(error = %err, "storage health check failed");
        return HealthStatus::Degraded;
    }

    if state.is_degraded().await {
        HealthStatus::Degraded
    } else {
        HealthStatus::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::test_support::memory_state,
        state::{AppState, catalog::Catalog},
    };

    #[tokio::test]
    async fn reports_degraded_without_store() {
        let state = AppState::new(Catalog::default());
        assert_eq!(health_status(&state).await, HealthStatus::Degraded);
    }

    #[tokio::test]
    async fn reports_ok_with_healthy_store() {
        let (state, _) = memory_state().await;
        assert_eq!(health_status(&state).await, HealthStatus::Ok);
    }
}
