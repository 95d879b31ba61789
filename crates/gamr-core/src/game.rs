use serde::{Deserialize, Serialize};

use crate::params::Rating;

/// Store-assigned game identifier.
pub type GameIdValue = i64;

/// A catalog entry as persisted in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: GameIdValue,
    pub title: String,
    pub year: i32,
    pub pic: String,
    /// Mean of every vote cast so far, in `[0, 1]`.
    pub avg_rating: f64,
    pub votes: u64,
}

impl Game {
    /// Apply one vote to the running average and return the updated record.
    ///
    /// The caller is responsible for persisting the result.
    pub fn with_vote(&self, rating: Rating) -> Game {
        let total = self.avg_rating * self.votes as f64 + rating.value();
        let votes = self.votes + 1;
        Game {
            avg_rating: total / votes as f64,
            votes,
            ..self.clone()
        }
    }
}

/// Insert shape for seeding the catalog. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGame {
    pub title: String,
    pub year: i32,
    pub pic: String,
    #[serde(default)]
    pub avg_rating: f64,
    #[serde(default)]
    pub votes: u64,
}

/// Column limits carried over from the catalog schema.
pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_PIC_LEN: usize = 255;

/// Reasons a fixture entry cannot be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewGameError {
    EmptyTitle,
    TitleTooLong(usize),
    PicTooLong(usize),
    RatingOutOfRange,
    RatingWithoutVotes,
}

impl std::fmt::Display for NewGameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong(len) => {
                write!(f, "title is {len} chars (max {MAX_TITLE_LEN})")
            },
            Self::PicTooLong(len) => write!(f, "pic is {len} chars (max {MAX_PIC_LEN})"),
            Self::RatingOutOfRange => write!(f, "avgRating must be within [0, 1]"),
            Self::RatingWithoutVotes => write!(f, "avgRating must be 0 when votes is 0"),
        }
    }
}

impl std::error::Error for NewGameError {}

impl NewGame {
    /// Check the record against the data model before it reaches the store.
    pub fn validate(&self) -> Result<(), NewGameError> {
        if self.title.trim().is_empty() {
            return Err(NewGameError::EmptyTitle);
        }
        let title_len = self.title.chars().count();
        if title_len > MAX_TITLE_LEN {
            return Err(NewGameError::TitleTooLong(title_len));
        }
        let pic_len = self.pic.chars().count();
        if pic_len > MAX_PIC_LEN {
            return Err(NewGameError::PicTooLong(pic_len));
        }
        if !(0.0..=1.0).contains(&self.avg_rating) {
            return Err(NewGameError::RatingOutOfRange);
        }
        if self.votes == 0 && self.avg_rating != 0.0 {
            return Err(NewGameError::RatingWithoutVotes);
        }
        Ok(())
    }
}
