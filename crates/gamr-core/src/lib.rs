pub mod envelope;
pub mod game;
pub mod params;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::game::NewGame;

    /// Build a fixture game with the given title and rating state.
    pub fn make_new_game(title: &str, avg_rating: f64, votes: u64) -> NewGame {
        NewGame {
            title: title.to_string(),
            year: 1985,
            pic: format!("{}.jpg", title.to_lowercase().replace(' ', "_")),
            avg_rating,
            votes,
        }
    }

    /// A small catalog with distinct ratings. The first entry is id 1 once
    /// inserted into an empty store.
    pub fn sample_catalog() -> Vec<NewGame> {
        vec![
            NewGame {
                title: "Super Mario Bros.".to_string(),
                year: 1985,
                pic: "super_mario_bros.jpg".to_string(),
                avg_rating: 0.9,
                votes: 10,
            },
            make_new_game("Pac Man", 0.87, 23),
            make_new_game("Tetris", 0.75, 4),
            make_new_game("Doom", 0.5, 2),
            make_new_game("E.T.", 0.1, 10),
        ]
    }
}
