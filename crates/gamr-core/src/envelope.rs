use serde::{Deserialize, Serialize};

use crate::game::Game;

/// `{ "data": ... }` wrapper used for every successful response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

pub type GameResponse = Envelope<Game>;
pub type GameListResponse = Envelope<Vec<Game>>;
