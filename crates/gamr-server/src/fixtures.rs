use std::path::Path;

use gamr_core::game::NewGame;

use crate::store::{GameStore, StoreError};

/// Read a JSON array of games, e.g.
/// `[{"title": "Pac Man", "year": 1980, "pic": "pacman.jpg", "avgRating": 0.87, "votes": 23}]`.
pub fn load_fixtures(path: &Path) -> Result<Vec<NewGame>, StoreError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| StoreError::Fixture(format!("cannot read {}: {e}", path.display())))?;
    parse_fixtures(&content)
        .map_err(|e| StoreError::Fixture(format!("{}: {e}", path.display())))
}

pub fn parse_fixtures(content: &str) -> Result<Vec<NewGame>, serde_json::Error> {
    serde_json::from_str(content)
}

/// Seed the store from `path` if it holds no games yet.
pub fn seed_from_file(store: &GameStore, path: &Path) -> Result<usize, StoreError> {
    let games = load_fixtures(path)?;
    let inserted = store.seed_if_empty(&games)?;
    if inserted == 0 {
        tracing::debug!(path = %path.display(), "Catalog already populated, fixtures skipped");
    } else {
        tracing::info!(path = %path.display(), inserted, "Seeded catalog from fixtures");
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"[
        {"title": "Super Mario Bros.", "year": 1985, "pic": "smb.jpg", "avgRating": 0.9, "votes": 10},
        {"title": "Tetris", "year": 1984, "pic": "tetris.jpg"}
    ]"#;

    #[test]
    fn parses_fixture_array() {
        let games = parse_fixtures(FIXTURE).unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].votes, 10);
        assert_eq!(games[1].votes, 0);
    }

    #[test]
    fn rejects_non_array() {
        assert!(parse_fixtures(r#"{"title": "Tetris"}"#).is_err());
    }

    #[test]
    fn missing_file_is_a_fixture_error() {
        let store = GameStore::open_in_memory().unwrap();
        let result = seed_from_file(&store, Path::new("no/such/fixtures.json"));
        assert!(matches!(result, Err(StoreError::Fixture(_))));
    }

    #[test]
    fn bundled_fixtures_are_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/games.json");
        let store = GameStore::open_in_memory().unwrap();
        let inserted = seed_from_file(&store, &path).unwrap();
        assert!(inserted > 0);
        assert_eq!(store.count().unwrap(), inserted as u64);
        assert_eq!(seed_from_file(&store, &path).unwrap(), 0);
    }
}
