//! Shared application state: services over the chosen backend.

use std::sync::Arc;

use anyhow::Context;

use statsvc_auth::UserStore;
use statsvc_core::{EntityRepository, MemoryRepository};
use statsvc_earthquakes::{Earthquake, EarthquakesService};
use statsvc_players::{Player, PlayerService};
use statsvc_store::{SqliteEarthquakeRepository, SqlitePlayerRepository};

use crate::config::{Backend, Config};

pub struct AppState {
    pub earthquakes: EarthquakesService,
    pub players: PlayerService,
    pub users: UserStore,
    pub backend: &'static str,
}

/// Choose the backend once, seed it, and wire the services. A malformed
/// seed CSV is fatal here: a service that starts with a silently empty
/// or partial data set is worse than one that refuses to start.
pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let users = UserStore::new();
    users.seed_defaults()?;

    let (earthquake_repo, player_repo): (
        Arc<dyn EntityRepository<Earthquake>>,
        Arc<dyn EntityRepository<Player>>,
    ) = match config.backend {
        Backend::Memory => {
            let quakes = statsvc_earthquakes::csv::parse_file(&config.earthquakes_csv)
                .with_context(|| {
                    format!("loading {}", config.earthquakes_csv.display())
                })?;
            let players = statsvc_players::csv::parse_file(&config.players_csv)
                .with_context(|| format!("loading {}", config.players_csv.display()))?;

            let quake_count = quakes.len();
            let player_count = players.len();
            let quake_repo = Arc::new(MemoryRepository::new());
            let player_repo = Arc::new(MemoryRepository::new());
            quake_repo.save_all(quakes).await?;
            player_repo.save_all(players).await?;
            tracing::info!(
                earthquakes = quake_count,
                players = player_count,
                "seeded in-memory backend from csv"
            );
            (quake_repo, player_repo)
        }
        Backend::Sqlite => {
            let pool = statsvc_store::connect(&config.database_url)
                .await
                .with_context(|| format!("connecting to {}", config.database_url))?;
            (
                Arc::new(SqliteEarthquakeRepository::new(pool.clone())),
                Arc::new(SqlitePlayerRepository::new(pool)),
            )
        }
    };

    Ok(Arc::new(AppState {
        earthquakes: EarthquakesService::new(earthquake_repo),
        players: PlayerService::new(player_repo),
        users,
        backend: config.backend.as_str(),
    }))
}

/// Empty in-memory state with seeded credentials. Used by the black-box
/// tests, which populate data through the HTTP surface.
pub fn empty_in_memory() -> anyhow::Result<Arc<AppState>> {
    let users = UserStore::new();
    users.seed_defaults()?;

    let quake_repo: Arc<dyn EntityRepository<Earthquake>> = Arc::new(MemoryRepository::new());
    let player_repo: Arc<dyn EntityRepository<Player>> = Arc::new(MemoryRepository::new());

    Ok(Arc::new(AppState {
        earthquakes: EarthquakesService::new(quake_repo),
        players: PlayerService::new(player_repo),
        users,
        backend: "memory",
    }))
}
