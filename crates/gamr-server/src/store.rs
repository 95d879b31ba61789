use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::{Connection, OptionalExtension, Row, params};

use gamr_core::game::{Game, NewGame};
use gamr_core::params::{GameId, TopCount};

/// How long a statement waits on a locked database file before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS game (
    id INTEGER PRIMARY KEY,
    title VARCHAR(100) NOT NULL,
    year INTEGER NOT NULL,
    pic VARCHAR(255) NOT NULL,
    avgRating REAL NOT NULL DEFAULT 0,
    votes INTEGER NOT NULL DEFAULT 0
)";

const GAME_COLUMNS: &str = "id, title, year, pic, avgRating, votes";

#[derive(Debug)]
pub enum StoreError {
    NotFound(String),
    Sqlite(rusqlite::Error),
    /// A previous holder of the connection panicked.
    Poisoned,
    /// The blocking task running a store call failed to complete.
    Task(String),
    Fixture(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(m) | Self::Task(m) => write!(f, "{m}"),
            Self::Sqlite(e) => write!(f, "sqlite error: {e}"),
            Self::Poisoned => write!(f, "store connection lock poisoned"),
            Self::Fixture(m) => write!(f, "invalid fixture: {m}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sqlite(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Sqlite(err)
    }
}

fn not_found(id: GameId) -> StoreError {
    StoreError::NotFound(format!("The game with ID {id} is not in our collection."))
}

/// Accept a bare path, `:memory:`, or an SQLAlchemy-style `sqlite:///path`.
fn sqlite_path(url: &str) -> &str {
    url.strip_prefix("sqlite:///").unwrap_or(url)
}

fn map_game(row: &Row<'_>) -> rusqlite::Result<Game> {
    Ok(Game {
        id: row.get(0)?,
        title: row.get(1)?,
        year: row.get(2)?,
        pic: row.get(3)?,
        avg_rating: row.get(4)?,
        votes: votes_from_sql(row.get(5)?)?,
    })
}

fn votes_from_sql(votes: i64) -> rusqlite::Result<u64> {
    u64::try_from(votes).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(5, votes))
}

fn votes_to_sql(votes: u64) -> Result<i64, StoreError> {
    i64::try_from(votes)
        .map_err(|_| StoreError::Task(format!("vote count {votes} exceeds the store range")))
}

/// Handle to the relational game table.
///
/// Every method takes the connection lock for a single statement (or a single
/// transaction for seeding), so a read followed by a write from the same
/// caller is not isolated from other callers.
#[derive(Clone)]
pub struct GameStore {
    conn: Arc<Mutex<Connection>>,
}

impl GameStore {
    pub fn open(url: &str) -> Result<Self, StoreError> {
        let path = sqlite_path(url);
        let conn = if path == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open(path)?
        };
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::open(":memory:")
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Run a synchronous store call on the blocking thread pool.
    pub async fn call<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&GameStore) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| StoreError::Task(format!("store task failed: {e}")))?
    }

    /// Up to `n` games, highest average rating first.
    pub fn top(&self, n: TopCount) -> Result<Vec<Game>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {GAME_COLUMNS} FROM game ORDER BY avgRating DESC LIMIT ?1"
        ))?;
        let games = stmt
            .query_map(params![n.get()], map_game)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(games)
    }

    pub fn random(&self) -> Result<Game, StoreError> {
        let conn = self.lock()?;
        conn.query_row(
            &format!("SELECT {GAME_COLUMNS} FROM game ORDER BY random() LIMIT 1"),
            [],
            map_game,
        )
        .optional()?
        .ok_or_else(|| {
            StoreError::NotFound(
                "A random game could not be retrieved from our collection.".to_string(),
            )
        })
    }

    pub fn get(&self, id: GameId) -> Result<Game, StoreError> {
        let conn = self.lock()?;
        conn.query_row(
            &format!("SELECT {GAME_COLUMNS} FROM game WHERE id = ?1"),
            params![id.get()],
            map_game,
        )
        .optional()?
        .ok_or_else(|| not_found(id))
    }

    /// Persist the rating fields of an already-updated record.
    pub fn save_rating(&self, game: &Game) -> Result<(), StoreError> {
        let votes = votes_to_sql(game.votes)?;
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE game SET avgRating = ?1, votes = ?2 WHERE id = ?3",
            params![game.avg_rating, votes, game.id],
        )?;
        if changed == 0 {
            return Err(not_found(GameId::from(game.id)));
        }
        Ok(())
    }

    pub fn insert(&self, game: &NewGame) -> Result<Game, StoreError> {
        game.validate()
            .map_err(|e| StoreError::Fixture(format!("{}: {e}", game.title)))?;
        let conn = self.lock()?;
        insert_row(&conn, game)
    }

    pub fn count(&self) -> Result<u64, StoreError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT count(*) FROM game", [], |r| r.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// Insert `games` in one transaction if the table has no rows.
    /// Returns the number of rows inserted.
    pub fn seed_if_empty(&self, games: &[NewGame]) -> Result<usize, StoreError> {
        for game in games {
            game.validate()
                .map_err(|e| StoreError::Fixture(format!("{}: {e}", game.title)))?;
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let existing: i64 = tx.query_row("SELECT count(*) FROM game", [], |r| r.get(0))?;
        if existing > 0 {
            return Ok(0);
        }
        for game in games {
            insert_row(&tx, game)?;
        }
        tx.commit()?;
        Ok(games.len())
    }
}

fn insert_row(conn: &Connection, game: &NewGame) -> Result<Game, StoreError> {
    let votes = votes_to_sql(game.votes)?;
    conn.execute(
        "INSERT INTO game (title, year, pic, avgRating, votes) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![game.title, game.year, game.pic, game.avg_rating, votes],
    )?;
    Ok(Game {
        id: conn.last_insert_rowid(),
        title: game.title.clone(),
        year: game.year,
        pic: game.pic.clone(),
        avg_rating: game.avg_rating,
        votes: game.votes,
    })
}
