//! SQLite-backed repositories.
//!
//! One table per record type, upserts via `ON CONFLICT(id) DO UPDATE`.
//! Every sqlx failure surfaces as `DomainError::Internal`; not-found and
//! duplicate handling stays in the service layer, same as the in-memory
//! backend.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};

use statsvc_core::{DomainError, DomainResult, Entity, EntityRepository};
use statsvc_earthquakes::Earthquake;
use statsvc_players::Player;

const EARTHQUAKES_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS earthquakes (
    id             TEXT PRIMARY KEY,
    time           TEXT NULL,
    latitude       REAL NULL,
    longitude      REAL NULL,
    depth          REAL NULL,
    magnitude      REAL NULL,
    place          TEXT NULL,
    magnitude_type TEXT NULL
)
"#;

const PLAYERS_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS players (
    id            TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    team          TEXT NOT NULL,
    position      TEXT NOT NULL,
    height_inches INTEGER NULL,
    weight_lbs    INTEGER NULL,
    age           REAL NULL
)
"#;

/// Open a pool against `url` (e.g. `sqlite://statsvc.db` or
/// `sqlite::memory:`) and bootstrap both tables.
///
/// A single connection with no idle timeout keeps `:memory:` databases
/// alive for the life of the pool.
pub async fn connect(url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    sqlx::query(EARTHQUAKES_SCHEMA).execute(&pool).await?;
    sqlx::query(PLAYERS_SCHEMA).execute(&pool).await?;
    tracing::debug!(url, "sqlite schema ready");
    Ok(pool)
}

fn internal(err: sqlx::Error) -> DomainError {
    DomainError::internal(format!("sqlite error: {err}"))
}

// ----- Earthquakes -----

#[derive(Clone)]
pub struct SqliteEarthquakeRepository {
    pool: SqlitePool,
}

impl SqliteEarthquakeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn upsert(&self, quake: &Earthquake) -> DomainResult<()> {
        sqlx::query(
            r#"
            INSERT INTO earthquakes
                (id, time, latitude, longitude, depth, magnitude, place, magnitude_type)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                time           = excluded.time,
                latitude       = excluded.latitude,
                longitude      = excluded.longitude,
                depth          = excluded.depth,
                magnitude      = excluded.magnitude,
                place          = excluded.place,
                magnitude_type = excluded.magnitude_type
            "#,
        )
        .bind(&quake.id)
        .bind(quake.time)
        .bind(quake.latitude)
        .bind(quake.longitude)
        .bind(quake.depth)
        .bind(quake.magnitude)
        .bind(&quake.place)
        .bind(&quake.magnitude_type)
        .execute(&self.pool)
        .await
        .map_err(internal)?;
        Ok(())
    }
}

fn earthquake_from_row(row: &sqlx::sqlite::SqliteRow) -> DomainResult<Earthquake> {
    Ok(Earthquake {
        id: row.try_get("id").map_err(internal)?,
        time: row.try_get("time").map_err(internal)?,
        latitude: row.try_get("latitude").map_err(internal)?,
        longitude: row.try_get("longitude").map_err(internal)?,
        depth: row.try_get("depth").map_err(internal)?,
        magnitude: row.try_get("magnitude").map_err(internal)?,
        place: row.try_get("place").map_err(internal)?,
        magnitude_type: row.try_get("magnitude_type").map_err(internal)?,
    })
}

#[async_trait]
impl EntityRepository<Earthquake> for SqliteEarthquakeRepository {
    async fn save(&self, entity: Earthquake) -> DomainResult<Earthquake> {
        if entity.id().is_empty() {
            return Err(DomainError::bad_request("entity id must not be empty"));
        }
        self.upsert(&entity).await?;
        Ok(entity)
    }

    async fn insert_if_absent(&self, entity: Earthquake) -> DomainResult<Option<Earthquake>> {
        if entity.id().is_empty() {
            return Err(DomainError::bad_request("entity id must not be empty"));
        }
        let result = sqlx::query(
            r#"
            INSERT INTO earthquakes
                (id, time, latitude, longitude, depth, magnitude, place, magnitude_type)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO NOTHING
            "#,
        )
        .bind(&entity.id)
        .bind(entity.time)
        .bind(entity.latitude)
        .bind(entity.longitude)
        .bind(entity.depth)
        .bind(entity.magnitude)
        .bind(&entity.place)
        .bind(&entity.magnitude_type)
        .execute(&self.pool)
        .await
        .map_err(internal)?;

        Ok((result.rows_affected() == 1).then_some(entity))
    }

    async fn save_all(&self, entities: Vec<Earthquake>) -> DomainResult<Vec<Earthquake>> {
        if entities.iter().any(|e| e.id().is_empty()) {
            return Err(DomainError::bad_request("entity id must not be empty"));
        }
        for entity in &entities {
            self.upsert(entity).await?;
        }
        Ok(entities)
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        sqlx::query("DELETE FROM earthquakes WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Earthquake>> {
        let row = sqlx::query("SELECT * FROM earthquakes WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?;
        row.as_ref().map(earthquake_from_row).transpose()
    }

    async fn find_all(&self) -> DomainResult<Vec<Earthquake>> {
        let rows = sqlx::query("SELECT * FROM earthquakes ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(internal)?;
        rows.iter().map(earthquake_from_row).collect()
    }

    async fn exists(&self, id: &str) -> DomainResult<bool> {
        let row = sqlx::query("SELECT 1 FROM earthquakes WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?;
        Ok(row.is_some())
    }

    async fn count(&self) -> DomainResult<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM earthquakes")
            .fetch_one(&self.pool)
            .await
            .map_err(internal)?;
        let n: i64 = row.try_get("n").map_err(internal)?;
        Ok(n as u64)
    }

    async fn clear(&self) -> DomainResult<u64> {
        let result = sqlx::query("DELETE FROM earthquakes")
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        Ok(result.rows_affected())
    }
}

// ----- Players -----

#[derive(Clone)]
pub struct SqlitePlayerRepository {
    pool: SqlitePool,
}

impl SqlitePlayerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn upsert(&self, player: &Player) -> DomainResult<()> {
        sqlx::query(
            r#"
            INSERT INTO players
                (id, name, team, position, height_inches, weight_lbs, age)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id) DO UPDATE SET
                name          = excluded.name,
                team          = excluded.team,
                position      = excluded.position,
                height_inches = excluded.height_inches,
                weight_lbs    = excluded.weight_lbs,
                age           = excluded.age
            "#,
        )
        .bind(player.id())
        .bind(&player.name)
        .bind(&player.team)
        .bind(&player.position)
        .bind(player.height_inches)
        .bind(player.weight_lbs)
        .bind(player.age)
        .execute(&self.pool)
        .await
        .map_err(internal)?;
        Ok(())
    }
}

fn player_from_row(row: &sqlx::sqlite::SqliteRow) -> DomainResult<Player> {
    let id: String = row.try_get("id").map_err(internal)?;
    let name: String = row.try_get("name").map_err(internal)?;
    let team: String = row.try_get("team").map_err(internal)?;
    let position: String = row.try_get("position").map_err(internal)?;
    let height_inches: Option<i32> = row.try_get("height_inches").map_err(internal)?;
    let weight_lbs: Option<i32> = row.try_get("weight_lbs").map_err(internal)?;
    let age: Option<f64> = row.try_get("age").map_err(internal)?;
    Ok(Player::new(name, team, position, height_inches, weight_lbs, age).with_id(id))
}

#[async_trait]
impl EntityRepository<Player> for SqlitePlayerRepository {
    async fn save(&self, entity: Player) -> DomainResult<Player> {
        if entity.id().is_empty() {
            return Err(DomainError::bad_request("entity id must not be empty"));
        }
        self.upsert(&entity).await?;
        Ok(entity)
    }

    async fn insert_if_absent(&self, entity: Player) -> DomainResult<Option<Player>> {
        if entity.id().is_empty() {
            return Err(DomainError::bad_request("entity id must not be empty"));
        }
        let result = sqlx::query(
            r#"
            INSERT INTO players
                (id, name, team, position, height_inches, weight_lbs, age)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id) DO NOTHING
            "#,
        )
        .bind(entity.id())
        .bind(&entity.name)
        .bind(&entity.team)
        .bind(&entity.position)
        .bind(entity.height_inches)
        .bind(entity.weight_lbs)
        .bind(entity.age)
        .execute(&self.pool)
        .await
        .map_err(internal)?;

        Ok((result.rows_affected() == 1).then_some(entity))
    }

    async fn save_all(&self, entities: Vec<Player>) -> DomainResult<Vec<Player>> {
        if entities.iter().any(|e| e.id().is_empty()) {
            return Err(DomainError::bad_request("entity id must not be empty"));
        }
        for entity in &entities {
            self.upsert(entity).await?;
        }
        Ok(entities)
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        sqlx::query("DELETE FROM players WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Player>> {
        let row = sqlx::query("SELECT * FROM players WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?;
        row.as_ref().map(player_from_row).transpose()
    }

    async fn find_all(&self) -> DomainResult<Vec<Player>> {
        let rows = sqlx::query("SELECT * FROM players ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(internal)?;
        rows.iter().map(player_from_row).collect()
    }

    async fn exists(&self, id: &str) -> DomainResult<bool> {
        let row = sqlx::query("SELECT 1 FROM players WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?;
        Ok(row.is_some())
    }

    async fn count(&self) -> DomainResult<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM players")
            .fetch_one(&self.pool)
            .await
            .map_err(internal)?;
        let n: i64 = row.try_get("n").map_err(internal)?;
        Ok(n as u64)
    }

    async fn clear(&self) -> DomainResult<u64> {
        let result = sqlx::query("DELETE FROM players")
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        Ok(result.rows_affected())
    }
}
