use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::{
    dto::{room::PlayerSummary, validation::validate_guess_name},
    state::couple,
};

/// One player's guesses for every baby, submitted at once.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SubmitGuessesRequest {
    #[validate(length(min = 1), nested)]
    pub guesses: Vec<GuessInput>,
}

/// Couple guessed for one baby. Leave both names empty to skip the baby.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GuessInput {
    pub baby_index: usize,
    #[serde(default)]
    pub mom: String,
    #[serde(default)]
    pub dad: String,
}

impl GuessInput {
    /// Token stored in the ledger; empty when nothing was picked.
    pub fn couple_token(&self) -> String {
        if self.mom.is_empty() && self.dad.is_empty() {
            String::new()
        } else {
            couple::encode(&self.mom, &self.dad)
        }
    }
}

impl Validate for GuessInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validate_guess_name(&self.mom) {
            errors.add("mom", e);
        }
        if let Err(e) = validate_guess_name(&self.dad) {
            errors.add("dad", e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Acknowledgement of an accepted guess batch.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitGuessesResponse {
    pub player: PlayerSummary,
    pub recorded: usize,
}
