use serde::{Deserialize, Serialize};
use thiserror::Error;

/// High-level phases a room can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomPhase {
    /// Players are joining; nothing has been guessed yet.
    #[default]
    Lobby,
    /// Players submit one guess batch each.
    Guessing,
    /// The host steps through the babies one at a time.
    Reveal,
    /// Final leaderboard is displayed. Terminal.
    Results,
}

impl RoomPhase {
    /// Storage representation of the phase.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lobby => "LOBBY",
            Self::Guessing => "GUESSING",
            Self::Reveal => "REVEAL",
            Self::Results => "RESULTS",
        }
    }

    /// Parse the storage representation (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "LOBBY" => Some(Self::Lobby),
            "GUESSING" => Some(Self::Guessing),
            "REVEAL" => Some(Self::Reveal),
            "RESULTS" => Some(Self::Results),
            _ => None,
        }
    }

    /// Whether the reveal cursor carries meaning in this phase.
    pub const fn has_reveal_cursor(&self) -> bool {
        matches!(self, Self::Reveal | Self::Results)
    }
}

/// Host actions that can be applied to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomEvent {
    /// Close the lobby and open guessing.
    StartGuessing,
    /// Close guessing and reveal the first baby.
    StartReveal,
    /// Move the reveal cursor to the next baby.
    NextBaby,
    /// Leave the reveal once the last baby has been shown.
    ShowResults,
}

/// Phase and cursor pair persisted for a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoomProgress {
    /// Current phase.
    pub phase: RoomPhase,
    /// Index of the baby being revealed; `0` outside the reveal.
    pub reveal_cursor: usize,
}

/// Error returned when attempting to apply an invalid transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?} (reveal cursor {reveal_cursor})")]
pub struct InvalidTransition {
    /// The phase the room was in when the event was received.
    pub from: RoomPhase,
    /// Reveal cursor at the time of the rejection.
    pub reveal_cursor: usize,
    /// The event that cannot be applied.
    pub event: RoomEvent,
}

/// State machine implementing the room flow for a fixed number of babies.
///
/// The cursor stays in `[0, baby_count)` and never decreases.
#[derive(Debug, Clone)]
pub struct RoomStateMachine {
    progress: RoomProgress,
    baby_count: usize,
}

impl RoomStateMachine {
    /// Create a state machine for a fresh room, in the lobby with cursor 0.
    pub fn new(baby_count: usize) -> Self {
        Self::resume(RoomProgress::default(), baby_count)
    }

    /// Rebuild the state machine from persisted progress.
    pub fn resume(progress: RoomProgress, baby_count: usize) -> Self {
        Self {
            progress,
            baby_count,
        }
    }

    /// Inspect the current phase.
    pub fn phase(&self) -> RoomPhase {
        self.progress.phase
    }

    /// Inspect the current reveal cursor.
    pub fn reveal_cursor(&self) -> usize {
        self.progress.reveal_cursor
    }

    /// Phase and cursor together.
    pub fn progress(&self) -> RoomProgress {
        self.progress
    }

    /// Number of babies the cursor walks over.
    pub fn baby_count(&self) -> usize {
        self.baby_count
    }

    /// Validate and apply `event`. A rejected event leaves the machine untouched.
    pub fn apply(&mut self, event: RoomEvent) -> Result<RoomProgress, InvalidTransition> {
        let next = self.compute_transition(event)?;
        self.progress = next;
        Ok(next)
    }

    /// Compute the progress reached by `event` without applying it.
    pub fn compute_transition(&self, event: RoomEvent) -> Result<RoomProgress, InvalidTransition> {
        let RoomProgress {
            phase,
            reveal_cursor,
        } = self.progress;

        let next = match (phase, event) {
            (RoomPhase::Lobby, RoomEvent::StartGuessing) => RoomProgress {
                phase: RoomPhase::Guessing,
                reveal_cursor,
            },
            (RoomPhase::Guessing, RoomEvent::StartReveal) if self.baby_count > 0 => RoomProgress {
                phase: RoomPhase::Reveal,
                reveal_cursor: 0,
            },
            (RoomPhase::Reveal, RoomEvent::NextBaby) if reveal_cursor + 1 < self.baby_count => {
                RoomProgress {
                    phase: RoomPhase::Reveal,
                    reveal_cursor: reveal_cursor + 1,
                }
            }
            (RoomPhase::Reveal, RoomEvent::ShowResults)
                if reveal_cursor + 1 == self.baby_count =>
            {
                RoomProgress {
                    phase: RoomPhase::Results,
                    reveal_cursor,
                }
            }
            (from, event) => {
                return Err(InvalidTransition {
                    from,
                    reveal_cursor,
                    event,
                });
            }
        };

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BABIES: usize = 9;

    fn apply(sm: &mut RoomStateMachine, event: RoomEvent) -> RoomProgress {
        sm.apply(event).unwrap()
    }

    #[test]
    fn initial_state_is_lobby() {
        let sm = RoomStateMachine::new(BABIES);
        assert_eq!(sm.phase(), RoomPhase::Lobby);
        assert_eq!(sm.reveal_cursor(), 0);
    }

    #[test]
    fn full_happy_path_through_room() {
        let mut sm = RoomStateMachine::new(BABIES);

        assert_eq!(apply(&mut sm, RoomEvent::StartGuessing).phase, RoomPhase::Guessing);
        assert_eq!(
            apply(&mut sm, RoomEvent::StartReveal),
            RoomProgress {
                phase: RoomPhase::Reveal,
                reveal_cursor: 0
            }
        );

        let mut history = vec![sm.reveal_cursor()];
        for expected in 1..BABIES {
            let next = apply(&mut sm, RoomEvent::NextBaby);
            assert_eq!(next.reveal_cursor, expected);
            history.push(next.reveal_cursor);
        }

        let results = apply(&mut sm, RoomEvent::ShowResults);
        assert_eq!(results.phase, RoomPhase::Results);
        assert_eq!(results.reveal_cursor, BABIES - 1);
        history.push(results.reveal_cursor);

        assert!(history.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!(history.iter().all(|cursor| *cursor < BABIES));
    }

    #[test]
    fn cannot_advance_past_last_baby() {
        let mut sm = RoomStateMachine::resume(
            RoomProgress {
                phase: RoomPhase::Reveal,
                reveal_cursor: BABIES - 1,
            },
            BABIES,
        );

        let err = sm.apply(RoomEvent::NextBaby).unwrap_err();
        assert_eq!(
            err,
            InvalidTransition {
                from: RoomPhase::Reveal,
                reveal_cursor: BABIES - 1,
                event: RoomEvent::NextBaby,
            }
        );
        assert_eq!(sm.reveal_cursor(), BABIES - 1);
    }

    #[test]
    fn results_require_last_baby() {
        let mut sm = RoomStateMachine::resume(
            RoomProgress {
                phase: RoomPhase::Reveal,
                reveal_cursor: 3,
            },
            BABIES,
        );
        assert!(sm.apply(RoomEvent::ShowResults).is_err());
        assert_eq!(sm.phase(), RoomPhase::Reveal);
        assert_eq!(sm.reveal_cursor(), 3);
    }

    #[test]
    fn invalid_transitions_leave_state_unchanged() {
        let illegal = [
            (RoomPhase::Lobby, RoomEvent::StartReveal),
            (RoomPhase::Lobby, RoomEvent::NextBaby),
            (RoomPhase::Lobby, RoomEvent::ShowResults),
            (RoomPhase::Guessing, RoomEvent::StartGuessing),
            (RoomPhase::Guessing, RoomEvent::NextBaby),
            (RoomPhase::Guessing, RoomEvent::ShowResults),
            (RoomPhase::Reveal, RoomEvent::StartGuessing),
            (RoomPhase::Reveal, RoomEvent::StartReveal),
            (RoomPhase::Results, RoomEvent::StartGuessing),
            (RoomPhase::Results, RoomEvent::StartReveal),
            (RoomPhase::Results, RoomEvent::NextBaby),
            (RoomPhase::Results, RoomEvent::ShowResults),
        ];

        for (phase, event) in illegal {
            let before = RoomProgress {
                phase,
                reveal_cursor: 2,
            };
            let mut sm = RoomStateMachine::resume(before, BABIES);
            let err = sm.apply(event).unwrap_err();
            assert_eq!(err.from, phase);
            assert_eq!(err.event, event);
            assert_eq!(sm.progress(), before, "{phase:?} + {event:?}");
        }
    }

    #[test]
    fn single_baby_room_goes_straight_to_results() {
        let mut sm = RoomStateMachine::new(1);
        apply(&mut sm, RoomEvent::StartGuessing);
        apply(&mut sm, RoomEvent::StartReveal);
        assert!(sm.apply(RoomEvent::NextBaby).is_err());
        assert_eq!(apply(&mut sm, RoomEvent::ShowResults).phase, RoomPhase::Results);
    }

    #[test]
    fn reveal_needs_at_least_one_baby() {
        let mut sm = RoomStateMachine::new(0);
        apply(&mut sm, RoomEvent::StartGuessing);
        assert!(sm.apply(RoomEvent::StartReveal).is_err());
        assert_eq!(sm.phase(), RoomPhase::Guessing);
    }

    #[test]
    fn phase_round_trips_through_storage_string() {
        for phase in [
            RoomPhase::Lobby,
            RoomPhase::Guessing,
            RoomPhase::Reveal,
            RoomPhase::Results,
        ] {
            assert_eq!(RoomPhase::parse(phase.as_str()), Some(phase));
        }
        assert_eq!(RoomPhase::parse("reveal"), Some(RoomPhase::Reveal));
        assert_eq!(RoomPhase::parse("idle"), None);
    }
}
