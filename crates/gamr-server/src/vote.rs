use gamr_core::game::Game;
use gamr_core::params::{GameId, Rating};

use crate::store::{GameStore, StoreError};

/// Read the game, apply the vote, write the new rating back.
///
/// The read and the write are separate statements with no lock held in
/// between: two concurrent votes on one game can both read the same state and
/// the later write wins.
pub fn cast_vote(store: &GameStore, id: GameId, rating: Rating) -> Result<Game, StoreError> {
    let game = store.get(id)?;
    let updated = game.with_vote(rating);
    store.save_rating(&updated)?;
    tracing::debug!(
        game_id = updated.id,
        rating = rating.value(),
        avg_rating = updated.avg_rating,
        votes = updated.votes,
        "Vote recorded"
    );
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamr_core::test_helpers::sample_catalog;

    fn seeded() -> GameStore {
        let store = GameStore::open_in_memory().unwrap();
        store.seed_if_empty(&sample_catalog()).unwrap();
        store
    }

    #[test]
    fn upvote_updates_running_average() {
        let store = seeded();
        let id = GameId::from(1);
        let before = store.get(id).unwrap();
        let returned = cast_vote(&store, id, Rating::Up).unwrap();
        let after = store.get(id).unwrap();

        let expected =
            (before.avg_rating * before.votes as f64 + 1.0) / (before.votes + 1) as f64;
        assert_eq!(after, returned);
        assert_eq!(after.votes, before.votes + 1);
        assert!((after.avg_rating - expected).abs() < 1e-9);
    }

    #[test]
    fn downvote_updates_running_average() {
        let store = seeded();
        let id = GameId::from(2);
        let before = store.get(id).unwrap();
        cast_vote(&store, id, Rating::Down).unwrap();
        let after = store.get(id).unwrap();

        let expected = before.avg_rating * before.votes as f64 / (before.votes + 1) as f64;
        assert_eq!(after.votes, before.votes + 1);
        assert!((after.avg_rating - expected).abs() < 1e-9);
    }

    #[test]
    fn votes_accumulate() {
        let store = seeded();
        let id = GameId::from(4);
        for _ in 0..3 {
            cast_vote(&store, id, Rating::Up).unwrap();
        }
        let after = store.get(id).unwrap();
        // Doom starts at 0.5 over 2 votes: (1 + 3) / 5.
        assert_eq!(after.votes, 5);
        assert!((after.avg_rating - 0.8).abs() < 1e-9);
    }

    #[test]
    fn vote_for_unknown_game_is_not_found() {
        let store = seeded();
        let result = cast_vote(&store, GameId::from(100), Rating::Down);
        assert!(matches!(result, Err(StoreError::NotFound(_))));
        assert_eq!(store.count().unwrap(), 5);
    }

    #[test]
    fn other_games_are_untouched() {
        let store = seeded();
        let other = store.get(GameId::from(3)).unwrap();
        cast_vote(&store, GameId::from(1), Rating::Up).unwrap();
        assert_eq!(store.get(GameId::from(3)).unwrap(), other);
    }
}
