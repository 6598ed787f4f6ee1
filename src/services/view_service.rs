use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use uuid::Uuid;

use crate::{
    dao::models::{GuessEntity, GuessFilter, PlayerEntity},
    dto::{
        catalog::CatalogView,
        view::{
            CoupleDto, LeaderboardEntry, LeaderboardView, RevealTallyView, RosterEntry, RosterView,
            TallyGroup,
        },
    },
    error::ServiceError,
    services::room_service::load_room,
    state::{SharedState, catalog::AnswerKey, couple},
};

/// Players of a room with their submission flag. An empty room yields an empty roster.
pub async fn roster(state: &SharedState, room_id: Uuid) -> Result<RosterView, ServiceError> {
    let store = state.require_game_store().await?;
    let room = load_room(store.as_ref(), room_id).await?;
    let players: Vec<RosterEntry> = store
        .list_players(room_id)
        .await?
        .into_iter()
        .map(|player| RosterEntry {
            player_id: player.id,
            name: player.name,
            submitted_guesses: player.submitted_guesses,
        })
        .collect();
    let waiting_on = players.iter().filter(|p| !p.submitted_guesses).count();

    Ok(RosterView {
        room_id,
        phase: room.phase.into(),
        players,
        waiting_on,
    })
}

/// Guesses for the baby under the reveal cursor, grouped by couple.
pub async fn reveal_tally(
    state: &SharedState,
    room_id: Uuid,
) -> Result<RevealTallyView, ServiceError> {
    let store = state.require_game_store().await?;
    let room = load_room(store.as_ref(), room_id).await?;
    if !room.phase.has_reveal_cursor() {
        return Err(ServiceError::InvalidState(format!(
            "room is in {}, tally needs REVEAL or RESULTS",
            room.phase.as_str()
        )));
    }

    let baby_index = room.reveal_cursor;
    let baby = state.catalog().baby(baby_index).ok_or_else(|| {
        ServiceError::InvalidState(format!("reveal cursor {baby_index} is outside the catalog"))
    })?;

    let players = store.list_players(room_id).await?;
    let guesses = store
        .list_guesses(GuessFilter::room(room_id).baby(baby_index))
        .await?;
    let groups = tally(
        &guesses,
        &submitted_names(&players),
        state.catalog().answer_key(),
        baby_index,
    );

    Ok(RevealTallyView {
        room_id,
        baby_index,
        image_url: baby.image_url.clone(),
        answer: CoupleDto::from(baby.answer.clone()),
        total_guesses: groups.iter().map(|group| group.count).sum(),
        groups,
    })
}

/// Players ordered by score, highest first.
pub async fn leaderboard(
    state: &SharedState,
    room_id: Uuid,
) -> Result<LeaderboardView, ServiceError> {
    let store = state.require_game_store().await?;
    load_room(store.as_ref(), room_id).await?;
    let players = store.list_players(room_id).await?;

    Ok(LeaderboardView {
        room_id,
        entries: rank_players(players),
    })
}

/// Babies and guess options, answers withheld.
pub fn catalog(state: &SharedState) -> CatalogView {
    CatalogView::from(state.catalog())
}

/// Group guesses by token, most frequent first. Groups with equal counts keep the order in
/// which their first guess appeared.
///
/// Only players present in `names` are counted, once each: later rows for the same
/// (player, baby) pair are ignored, as in scoring.
pub fn tally(
    guesses: &[GuessEntity],
    names: &HashMap<Uuid, String>,
    key: &AnswerKey,
    baby_index: usize,
) -> Vec<TallyGroup> {
    let mut seen = HashSet::new();
    let mut groups: IndexMap<&str, TallyGroup> = IndexMap::new();
    for guess in guesses.iter().filter(|guess| guess.baby_index == baby_index) {
        let Some(name) = names.get(&guess.player_id) else {
            continue;
        };
        if !seen.insert(guess.player_id) {
            continue;
        }
        let group = groups.entry(guess.couple.as_str()).or_insert_with(|| TallyGroup {
            couple: guess.couple.clone(),
            names: CoupleDto::from(couple::decode(&guess.couple)),
            count: 0,
            players: Vec::new(),
            correct: key.is_correct(baby_index, &guess.couple),
        });
        group.count += 1;
        group.players.push(name.clone());
    }

    let mut groups: Vec<TallyGroup> = groups.into_values().collect();
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}

/// Stable sort by score descending; rank is the 1-based position.
pub fn rank_players(mut players: Vec<PlayerEntity>) -> Vec<LeaderboardEntry> {
    players.sort_by(|a, b| b.score.cmp(&a.score));
    players
        .into_iter()
        .enumerate()
        .map(|(position, player)| LeaderboardEntry {
            rank: position + 1,
            player_id: player.id,
            name: player.name,
            score: player.score,
        })
        .collect()
}

/// Names of players whose guess batch is complete; rows of anyone else are still in flight.
fn submitted_names(players: &[PlayerEntity]) -> HashMap<Uuid, String> {
    players
        .iter()
        .filter(|player| player.submitted_guesses)
        .map(|player| (player.id, player.name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;
    use crate::{
        dto::room::JoinRoomRequest,
        services::{
            guess_service::submit_guesses,
            room_service,
            test_support::{full_batch, memory_state},
        },
    };

    fn player(name: &str, score: u32) -> PlayerEntity {
        PlayerEntity {
            id: Uuid::new_v4(),
            room_id: Uuid::nil(),
            name: name.into(),
            score,
            submitted_guesses: true,
            joined_at: SystemTime::now(),
        }
    }

    fn guess(player_id: Uuid, couple: &str) -> GuessEntity {
        GuessEntity {
            id: Uuid::new_v4(),
            room_id: Uuid::nil(),
            player_id,
            baby_index: 0,
            couple: couple.into(),
        }
    }

    #[test]
    fn leaderboard_orders_by_score_descending() {
        let players = [("Alice", 8), ("Bob", 6), ("Charlie", 4), ("Diana", 9), ("Eddie", 2)]
            .into_iter()
            .map(|(name, score)| player(name, score))
            .collect();

        let order: Vec<(String, u32)> = rank_players(players)
            .into_iter()
            .map(|entry| (entry.name, entry.score))
            .collect();
        let expected = [("Diana", 9), ("Alice", 8), ("Bob", 6), ("Charlie", 4), ("Eddie", 2)]
            .map(|(name, score)| (name.to_string(), score));
        assert_eq!(order, expected);
    }

    #[test]
    fn leaderboard_ties_keep_join_order() {
        let players = vec![player("First", 3), player("Top", 5), player("Second", 3)];
        let ranked = rank_players(players);
        let names: Vec<_> = ranked.iter().map(|entry| entry.name.as_str()).collect();
        assert_eq!(names, ["Top", "First", "Second"]);
        assert_eq!(ranked.iter().map(|e| e.rank).collect::<Vec<_>>(), [1, 2, 3]);
    }

    #[test]
    fn tally_groups_and_counts_by_couple() {
        let key = AnswerKey::from_tokens(vec!["Daddy & Halle Berry".into()]);
        let (a, b, c, d) = (player("A", 0), player("B", 0), player("C", 0), player("D", 0));
        let names = submitted_names(&[a.clone(), b.clone(), c.clone(), d.clone()]);
        let guesses = [
            guess(a.id, "Mommy & Zendaya"),
            guess(b.id, "Daddy & Halle Berry"),
            guess(c.id, "Daddy & Halle Berry"),
            guess(d.id, ""),
        ];

        let groups = tally(&guesses, &names, &key, 0);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].couple, "Daddy & Halle Berry");
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[0].players, ["B", "C"]);
        assert!(groups[0].correct);
        assert_eq!(groups[1].couple, "Mommy & Zendaya");
        assert!(!groups[1].correct);
        assert_eq!(groups[2].names, CoupleDto { mom: String::new(), dad: String::new() });
    }

    #[test]
    fn tally_counts_each_player_once() {
        let key = AnswerKey::from_tokens(vec!["Daddy & Halle Berry".into()]);
        let a = player("A", 0);
        let names = submitted_names(&[a.clone()]);
        let guesses = [guess(a.id, "Daddy & Halle Berry"), guess(a.id, "Mommy & Zendaya")];

        let groups = tally(&guesses, &names, &key, 0);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].count, 1);
        assert_eq!(groups[0].players, ["A"]);
    }

    #[test]
    fn tally_skips_players_still_submitting() {
        let key = AnswerKey::from_tokens(vec!["Daddy & Halle Berry".into()]);
        let done = player("Done", 0);
        let pending = PlayerEntity {
            submitted_guesses: false,
            ..player("Pending", 0)
        };
        let names = submitted_names(&[done.clone(), pending.clone()]);
        let guesses = [guess(pending.id, "Daddy & Halle Berry"), guess(done.id, "Mommy & Zendaya")];

        let groups = tally(&guesses, &names, &key, 0);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].players, ["Done"]);
        assert!(!groups[0].correct);
    }

    #[tokio::test]
    async fn empty_room_has_empty_roster() {
        let (state, _) = memory_state().await;
        let room = room_service::create_room(&state).await.unwrap();

        let view = roster(&state, room.id).await.unwrap();
        assert!(view.players.is_empty());
        assert_eq!(view.waiting_on, 0);
    }

    #[tokio::test]
    async fn roster_tracks_submissions() {
        let (state, _) = memory_state().await;
        let room = room_service::create_room(&state).await.unwrap();
        for name in ["Alice", "Bob"] {
            room_service::join_room(&state, &room.code, JoinRoomRequest { name: name.into() })
                .await
                .unwrap();
        }
        let alice = roster(&state, room.id).await.unwrap().players[0].player_id;
        submit_guesses(&state, alice, full_batch(&[])).await.unwrap();

        let view = roster(&state, room.id).await.unwrap();
        assert_eq!(view.waiting_on, 1);
        assert!(view.players[0].submitted_guesses);
        assert!(!view.players[1].submitted_guesses);
    }

    #[tokio::test]
    async fn tally_follows_reveal_cursor() {
        let (state, _) = memory_state().await;
        let room = room_service::create_room(&state).await.unwrap();
        let joined =
            room_service::join_room(&state, &room.code, JoinRoomRequest { name: "P".into() })
                .await
                .unwrap();
        submit_guesses(
            &state,
            joined.player.id,
            full_batch(&[(0, "Daddy", "Halle Berry"), (1, "Mommy", "Zendaya")]),
        )
        .await
        .unwrap();

        room_service::start_guessing(&state, room.id).await.unwrap();
        assert!(matches!(
            reveal_tally(&state, room.id).await.unwrap_err(),
            ServiceError::InvalidState(_)
        ));

        room_service::start_reveal(&state, room.id).await.unwrap();
        let first = reveal_tally(&state, room.id).await.unwrap();
        assert_eq!(first.baby_index, 0);
        assert!(first.groups[0].correct);
        assert_eq!(first.answer.dad, "Halle Berry");

        room_service::next_baby(&state, room.id).await.unwrap();
        let second = reveal_tally(&state, room.id).await.unwrap();
        assert_eq!(second.baby_index, 1);
        assert_eq!(second.total_guesses, 1);
        assert!(!second.groups[0].correct);
        assert_eq!(second.groups[0].players, ["P"]);
    }
}
