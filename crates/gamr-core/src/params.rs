//! Typed parsing of raw request parameters.
//!
//! Every parser runs before the store is touched and reports failures as a
//! [`ParamError`], which the server maps to a client error.

use crate::game::GameIdValue;

/// Number of games returned by the top list when `n` is absent.
pub const DEFAULT_TOP_COUNT: u32 = 3;
/// Inclusive bounds for the top list size.
pub const MIN_TOP_COUNT: u32 = 1;
pub const MAX_TOP_COUNT: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    TopCountNotInteger,
    TopCountOutOfRange,
    IdNotInteger,
    /// All digits, but larger than any id the store can hold.
    IdOutOfRange(String),
    RatingMissing,
    RatingNotInteger,
    RatingOutOfRange,
}

impl std::fmt::Display for ParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TopCountNotInteger => write!(f, "The parameter n has to be an integer."),
            Self::TopCountOutOfRange => write!(
                f,
                "The parameter n has to be between {MIN_TOP_COUNT} and {MAX_TOP_COUNT}."
            ),
            Self::IdNotInteger => write!(f, "The game ID has to be an integer."),
            Self::IdOutOfRange(raw) => {
                write!(f, "The game with ID {raw} is not in our collection.")
            },
            Self::RatingMissing => write!(f, "The rating is a required parameter."),
            Self::RatingNotInteger => write!(f, "The rating has to be an integer."),
            Self::RatingOutOfRange => write!(f, "The rating has to be 0 or 1."),
        }
    }
}

impl std::error::Error for ParamError {}

/// Validated size of the top list, always within `[1, 10]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopCount(u32);

impl TopCount {
    /// Parse the optional `n` query value. Absent means the default; present
    /// but empty or non-numeric is rejected.
    pub fn parse(raw: Option<&str>) -> Result<Self, ParamError> {
        let Some(raw) = raw else {
            return Ok(Self::default());
        };
        let n: i64 = raw
            .trim()
            .parse()
            .map_err(|_| ParamError::TopCountNotInteger)?;
        if n < i64::from(MIN_TOP_COUNT) || n > i64::from(MAX_TOP_COUNT) {
            return Err(ParamError::TopCountOutOfRange);
        }
        // Bounded by MAX_TOP_COUNT above.
        Ok(Self(n as u32))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for TopCount {
    fn default() -> Self {
        Self(DEFAULT_TOP_COUNT)
    }
}

/// Identifier taken from a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameId(GameIdValue);

impl GameId {
    /// Accept only non-empty strings of ASCII digits.
    pub fn parse(raw: &str) -> Result<Self, ParamError> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParamError::IdNotInteger);
        }
        raw.parse::<GameIdValue>()
            .map(Self)
            .map_err(|_| ParamError::IdOutOfRange(raw.to_string()))
    }

    pub fn get(self) -> GameIdValue {
        self.0
    }
}

impl From<GameIdValue> for GameId {
    fn from(id: GameIdValue) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single binary vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Down,
    Up,
}

impl Rating {
    /// Parse the `rating` form field. It is required and must be 0 or 1.
    pub fn parse(raw: Option<&str>) -> Result<Self, ParamError> {
        let raw = raw.ok_or(ParamError::RatingMissing)?;
        let value: i64 = raw
            .trim()
            .parse()
            .map_err(|_| ParamError::RatingNotInteger)?;
        match value {
            0 => Ok(Self::Down),
            1 => Ok(Self::Up),
            _ => Err(ParamError::RatingOutOfRange),
        }
    }

    pub fn value(self) -> f64 {
        match self {
            Self::Down => 0.0,
            Self::Up => 1.0,
        }
    }
}
