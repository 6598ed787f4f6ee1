use std::collections::HashSet;

use tracing::{error, info};
use uuid::Uuid;

use crate::{
    dao::models::{GuessEntity, PlayerUpdate},
    dto::{
        guess::{GuessInput, SubmitGuessesRequest, SubmitGuessesResponse},
        room::PlayerSummary,
    },
    error::ServiceError,
    services::sse_events,
    state::SharedState,
};

/// Record a player's full guess batch and mark the player as submitted.
///
/// Rows are inserted before the flag flips. If the flag write fails the rows stay in place and
/// the error is returned; readers must rely on the flag, not on row presence.
pub async fn submit_guesses(
    state: &SharedState,
    player_id: Uuid,
    request: SubmitGuessesRequest,
) -> Result<SubmitGuessesResponse, ServiceError> {
    validate_batch(&request.guesses, state.catalog().len())?;

    let store = state.require_game_store().await?;
    let mut player = store
        .find_player(player_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("player `{player_id}`")))?;
    if player.submitted_guesses {
        return Err(ServiceError::DuplicateSubmission { player_id });
    }

    let rows: Vec<GuessEntity> = request
        .guesses
        .iter()
        .map(|guess| GuessEntity {
            id: Uuid::new_v4(),
            room_id: player.room_id,
            player_id,
            baby_index: guess.baby_index,
            couple: guess.couple_token(),
        })
        .collect();
    let recorded = rows.len();
    store.insert_guesses(rows).await?;

    match store.update_player(player_id, PlayerUpdate::submitted()).await {
        Ok(true) => {}
        Ok(false) => {
            error!(%player_id, "player vanished after guesses were recorded");
            return Err(ServiceError::NotFound(format!("player `{player_id}`")));
        }
        Err(err) => {
            error!(
                %player_id,
                recorded,
                error = %err,
                "guesses recorded but submitted flag not set"
            );
            return Err(err.into());
        }
    }
    player.submitted_guesses = true;
    info!(%player_id, room_id = %player.room_id, recorded, "guesses submitted");

    if let Ok(Some(room)) = store.find_room(player.room_id).await {
        sse_events::publish_room_snapshot(state, store.as_ref(), &room).await;
    }

    Ok(SubmitGuessesResponse {
        player: PlayerSummary::from(player),
        recorded,
    })
}

/// A batch must cover every baby index in `0..baby_count` exactly once.
pub fn validate_batch(guesses: &[GuessInput], baby_count: usize) -> Result<(), ServiceError> {
    if guesses.len() != baby_count {
        return Err(ServiceError::InvalidInput(format!(
            "expected {baby_count} guesses, got {}",
            guesses.len()
        )));
    }

    let mut seen = HashSet::with_capacity(baby_count);
    for guess in guesses {
        if guess.baby_index >= baby_count {
            return Err(ServiceError::InvalidInput(format!(
                "baby index {} out of range 0..{baby_count}",
                guess.baby_index
            )));
        }
        if !seen.insert(guess.baby_index) {
            return Err(ServiceError::InvalidInput(format!(
                "baby index {} guessed twice",
                guess.baby_index
            )));
        }
    }

    Ok(())
}
