//! Player service: CRUD, filters, statistics, and bulk import.
//!
//! All filters and statistics are full scans over `find_all()` reduced
//! through the shared helpers in `statsvc-core`; there is no indexing and
//! no backend pushdown, so every backend yields identical numbers.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use statsvc_core::{stats, DomainError, DomainResult, EntityRepository};

use crate::model::Player;

const TOP_N: usize = 10;

/// Outcome of a bulk CSV import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub total: u64,
    pub imported: u64,
    pub duplicates: u64,
    pub errors: u64,
}

/// Min/max pair for an integer field; zeros when the store is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RangeStats {
    pub min: i32,
    pub max: i32,
}

/// Composition summary for a single team.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStatistics {
    pub team: String,
    pub total_players: u64,
    pub average_age: f64,
    pub average_height: f64,
    pub average_weight: f64,
}

/// The combined payload behind `/stats/overall`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStatistics {
    pub total_players: u64,
    pub average_age: f64,
    pub average_height: f64,
    pub average_weight: f64,
    pub players_by_team: BTreeMap<String, u64>,
    pub players_by_position: BTreeMap<String, u64>,
    pub height_stats: RangeStats,
    pub weight_stats: RangeStats,
}

#[derive(Clone)]
pub struct PlayerService {
    repo: Arc<dyn EntityRepository<Player>>,
}

impl PlayerService {
    pub fn new(repo: Arc<dyn EntityRepository<Player>>) -> Self {
        Self { repo }
    }

    // ----- CRUD -----

    pub async fn get_all(&self) -> DomainResult<Vec<Player>> {
        self.repo.find_all().await
    }

    pub async fn get_by_id(&self, id: &str) -> DomainResult<Player> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("player not found"))
    }

    /// Insert-if-absent is a single storage operation, so two racing
    /// creates for the same id produce exactly one success and one
    /// `Conflict`, never a silent overwrite.
    pub async fn create(&self, player: Player) -> DomainResult<Player> {
        if player.id().is_empty() {
            return Err(DomainError::bad_request("id is required"));
        }
        self.repo
            .insert_if_absent(player)
            .await?
            .ok_or_else(|| DomainError::conflict("player already exists"))
    }

    /// Full overwrite under an existing id; the caller has already forced
    /// the id from the route path.
    pub async fn update(&self, player: Player) -> DomainResult<Player> {
        if !self.repo.exists(player.id()).await? {
            return Err(DomainError::not_found("player not found"));
        }
        self.repo.save(player).await
    }

    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        if !self.repo.exists(id).await? {
            return Err(DomainError::not_found("player not found"));
        }
        self.repo.delete(id).await
    }

    // ----- Filters -----

    pub async fn by_team(&self, team: &str) -> DomainResult<Vec<Player>> {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .filter(|p| p.team == team)
            .collect())
    }

    pub async fn by_position(&self, position: &str) -> DomainResult<Vec<Player>> {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .filter(|p| p.position == position)
            .collect())
    }

    pub async fn by_team_and_position(
        &self,
        team: &str,
        position: &str,
    ) -> DomainResult<Vec<Player>> {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .filter(|p| p.team == team && p.position == position)
            .collect())
    }

    /// Players whose age lies within `[min_age, max_age]` (inclusive).
    pub async fn by_age_range(&self, min_age: f64, max_age: f64) -> DomainResult<Vec<Player>> {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .filter(|p| p.age.is_some_and(|a| a >= min_age && a <= max_age))
            .collect())
    }

    pub async fn by_min_height(&self, min_height: i32) -> DomainResult<Vec<Player>> {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .filter(|p| p.height_inches.is_some_and(|h| h >= min_height))
            .collect())
    }

    pub async fn by_min_weight(&self, min_weight: i32) -> DomainResult<Vec<Player>> {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .filter(|p| p.weight_lbs.is_some_and(|w| w >= min_weight))
            .collect())
    }

    /// Case-insensitive substring match on the player name.
    pub async fn search_by_name(&self, fragment: &str) -> DomainResult<Vec<Player>> {
        let needle = fragment.to_lowercase();
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect())
    }

    pub async fn with_bmi_above(&self, threshold: f64) -> DomainResult<Vec<Player>> {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .filter(|p| p.bmi().is_some_and(|bmi| bmi > threshold))
            .collect())
    }

    // ----- Statistics -----

    pub async fn average_age(&self) -> DomainResult<f64> {
        let players = self.get_all().await?;
        Ok(stats::average(&players, |p| p.age))
    }

    pub async fn average_height(&self) -> DomainResult<f64> {
        let players = self.get_all().await?;
        Ok(stats::average(&players, |p| p.height_inches.map(f64::from)))
    }

    pub async fn average_weight(&self) -> DomainResult<f64> {
        let players = self.get_all().await?;
        Ok(stats::average(&players, |p| p.weight_lbs.map(f64::from)))
    }

    pub async fn count_by_team(&self) -> DomainResult<BTreeMap<String, u64>> {
        let players = self.get_all().await?;
        Ok(stats::count_by(&players, |p| Some(p.team.clone())))
    }

    pub async fn count_by_position(&self) -> DomainResult<BTreeMap<String, u64>> {
        let players = self.get_all().await?;
        Ok(stats::count_by(&players, |p| Some(p.position.clone())))
    }

    pub async fn height_stats(&self) -> DomainResult<RangeStats> {
        let players = self.get_all().await?;
        Ok(int_range(&players, |p| p.height_inches))
    }

    pub async fn weight_stats(&self) -> DomainResult<RangeStats> {
        let players = self.get_all().await?;
        Ok(int_range(&players, |p| p.weight_lbs))
    }

    /// Everyone sharing the minimum recorded age.
    pub async fn youngest(&self) -> DomainResult<Vec<Player>> {
        let players = self.get_all().await?;
        Ok(players_at_age(&players, stats::min_of(&players, |p| p.age)))
    }

    /// Everyone sharing the maximum recorded age.
    pub async fn oldest(&self) -> DomainResult<Vec<Player>> {
        let players = self.get_all().await?;
        Ok(players_at_age(&players, stats::max_of(&players, |p| p.age)))
    }

    pub async fn top10_tallest(&self) -> DomainResult<Vec<Player>> {
        let players = self.get_all().await?;
        Ok(stats::top_n_by(&players, TOP_N, |p| {
            p.height_inches.map(f64::from)
        }))
    }

    pub async fn top10_heaviest(&self) -> DomainResult<Vec<Player>> {
        let players = self.get_all().await?;
        Ok(stats::top_n_by(&players, TOP_N, |p| {
            p.weight_lbs.map(f64::from)
        }))
    }

    pub async fn team_statistics(&self, team: &str) -> DomainResult<TeamStatistics> {
        let roster = self.by_team(team).await?;
        Ok(TeamStatistics {
            team: team.to_string(),
            total_players: roster.len() as u64,
            average_age: stats::average(&roster, |p| p.age),
            average_height: stats::average(&roster, |p| p.height_inches.map(f64::from)),
            average_weight: stats::average(&roster, |p| p.weight_lbs.map(f64::from)),
        })
    }

    pub async fn overall_statistics(&self) -> DomainResult<OverallStatistics> {
        let players = self.get_all().await?;
        Ok(OverallStatistics {
            total_players: players.len() as u64,
            average_age: stats::average(&players, |p| p.age),
            average_height: stats::average(&players, |p| p.height_inches.map(f64::from)),
            average_weight: stats::average(&players, |p| p.weight_lbs.map(f64::from)),
            players_by_team: stats::count_by(&players, |p| Some(p.team.clone())),
            players_by_position: stats::count_by(&players, |p| Some(p.position.clone())),
            height_stats: int_range(&players, |p| p.height_inches),
            weight_stats: int_range(&players, |p| p.weight_lbs),
        })
    }

    // ----- Bulk admin operations -----

    /// Import parsed rows: existing ids are skipped as duplicates, failed
    /// creates are counted as errors, the rest are persisted.
    pub async fn import(&self, players: Vec<Player>) -> DomainResult<ImportReport> {
        let mut report = ImportReport {
            total: players.len() as u64,
            ..ImportReport::default()
        };

        for player in players {
            match self.repo.insert_if_absent(player).await {
                Ok(Some(_)) => report.imported += 1,
                Ok(None) => report.duplicates += 1,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to import player row");
                    report.errors += 1;
                }
            }
        }

        tracing::info!(
            imported = report.imported,
            duplicates = report.duplicates,
            errors = report.errors,
            "csv import finished"
        );
        Ok(report)
    }

    /// Remove every player; returns how many were deleted.
    pub async fn clear_all(&self) -> DomainResult<u64> {
        self.repo.clear().await
    }
}

fn int_range<F>(players: &[Player], field: F) -> RangeStats
where
    F: Fn(&Player) -> Option<i32> + Copy,
{
    RangeStats {
        min: stats::min_of(players, |p| field(p).map(f64::from)).unwrap_or(0.0) as i32,
        max: stats::max_of(players, |p| field(p).map(f64::from)).unwrap_or(0.0) as i32,
    }
}

fn players_at_age(players: &[Player], bound: Option<f64>) -> Vec<Player> {
    let Some(bound) = bound else {
        return Vec::new();
    };
    players
        .iter()
        .filter(|p| p.age == Some(bound))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use statsvc_core::MemoryRepository;

    fn service() -> PlayerService {
        PlayerService::new(Arc::new(MemoryRepository::new()))
    }

    fn player(name: &str, team: &str, position: &str, height: i32, weight: i32, age: f64) -> Player {
        Player::new(name, team, position, Some(height), Some(weight), Some(age))
    }

    async fn seeded() -> PlayerService {
        let svc = service();
        for p in [
            player("Adam Donachie", "BAL", "Catcher", 74, 180, 22.99),
            player("Paul Bako", "BAL", "Catcher", 75, 215, 34.69),
            player("Ramon Hernandez", "NYY", "Catcher", 72, 210, 30.78),
        ] {
            svc.create(p).await.unwrap();
        }
        svc
    }

    #[tokio::test]
    async fn create_rejects_empty_id() {
        // Empty name/team yields an empty derived id.
        let p = Player::new("", "", "Catcher", None, None, None);
        let err = service().create(p).await.unwrap_err();
        assert!(matches!(err, DomainError::BadRequest(_)));
    }

    #[tokio::test]
    async fn create_rejects_duplicates() {
        let svc = seeded().await;
        let dup = player("Adam Donachie", "BAL", "Outfielder", 70, 150, 19.0);
        let err = svc.create(dup).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        // The stored record is untouched.
        let stored = svc.get_by_id("BAL_Adam_Donachie").await.unwrap();
        assert_eq!(stored.position, "Catcher");
    }

    #[tokio::test]
    async fn update_replaces_the_whole_record() {
        let svc = seeded().await;
        let replacement = Player::new("Adam Donachie", "BAL", "First Baseman", None, None, None);
        svc.update(replacement).await.unwrap();

        let stored = svc.get_by_id("BAL_Adam_Donachie").await.unwrap();
        assert_eq!(stored.position, "First Baseman");
        assert_eq!(stored.height_inches, None);
    }

    #[tokio::test]
    async fn delete_missing_player_is_not_found() {
        let err = seeded().await.delete("BOS_Nobody").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn filters_by_team_position_and_combination() {
        let svc = seeded().await;
        assert_eq!(svc.by_team("BAL").await.unwrap().len(), 2);
        assert_eq!(svc.by_position("Catcher").await.unwrap().len(), 3);
        assert_eq!(
            svc.by_team_and_position("NYY", "Catcher").await.unwrap().len(),
            1
        );
        assert!(svc.by_team_and_position("NYY", "Pitcher").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn age_range_is_inclusive() {
        let svc = seeded().await;
        let hits = svc.by_age_range(22.99, 30.78).await.unwrap();
        let ids: Vec<_> = hits.iter().map(|p| p.id().to_string()).collect();
        assert_eq!(ids, vec!["BAL_Adam_Donachie", "NYY_Ramon_Hernandez"]);
    }

    #[tokio::test]
    async fn name_search_is_case_insensitive() {
        let svc = seeded().await;
        assert_eq!(svc.search_by_name("bako").await.unwrap().len(), 1);
        assert_eq!(svc.search_by_name("RAMON").await.unwrap().len(), 1);
        assert!(svc.search_by_name("ortiz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn average_height_matches_expected_value() {
        let svc = seeded().await;
        // (74 + 75 + 72) / 3
        assert!((svc.average_height().await.unwrap() - 73.666_666).abs() < 1e-3);
    }

    #[tokio::test]
    async fn averages_over_empty_store_are_zero() {
        let svc = service();
        assert_eq!(svc.average_age().await.unwrap(), 0.0);
        assert_eq!(svc.average_height().await.unwrap(), 0.0);
        assert_eq!(svc.average_weight().await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn top10_tallest_is_descending() {
        let svc = seeded().await;
        let heights: Vec<_> = svc
            .top10_tallest()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.height_inches.unwrap())
            .collect();
        assert_eq!(heights, vec![75, 74, 72]);
    }

    #[tokio::test]
    async fn counts_group_by_team() {
        let counts = seeded().await.count_by_team().await.unwrap();
        assert_eq!(counts.get("BAL"), Some(&2));
        assert_eq!(counts.get("NYY"), Some(&1));
    }

    #[tokio::test]
    async fn youngest_and_oldest_pick_the_bounds() {
        let svc = seeded().await;
        let youngest = svc.youngest().await.unwrap();
        assert_eq!(youngest.len(), 1);
        assert_eq!(youngest[0].id(), "BAL_Adam_Donachie");

        let oldest = svc.oldest().await.unwrap();
        assert_eq!(oldest[0].id(), "BAL_Paul_Bako");
    }

    #[tokio::test]
    async fn team_statistics_cover_only_that_team() {
        let stats = seeded().await.team_statistics("BAL").await.unwrap();
        assert_eq!(stats.total_players, 2);
        assert!((stats.average_height - 74.5).abs() < 1e-9);
        assert!((stats.average_weight - 197.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn overall_statistics_aggregate_everything() {
        let overall = seeded().await.overall_statistics().await.unwrap();
        assert_eq!(overall.total_players, 3);
        assert_eq!(overall.height_stats, RangeStats { min: 72, max: 75 });
        assert_eq!(overall.weight_stats, RangeStats { min: 180, max: 215 });
        assert_eq!(overall.players_by_position.get("Catcher"), Some(&3));
    }

    #[tokio::test]
    async fn bmi_filter_uses_derived_values() {
        let svc = seeded().await;
        // Paul Bako: 215 lbs at 75in => BMI ~26.9
        let heavy = svc.with_bmi_above(26.0).await.unwrap();
        assert_eq!(heavy.len(), 2);
        assert!(svc.with_bmi_above(40.0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn import_counts_new_rows_and_duplicates() {
        let svc = seeded().await;
        let rows = vec![
            player("Adam Donachie", "BAL", "Catcher", 74, 180, 22.99),
            player("Kevin Millar", "BAL", "First Baseman", 72, 210, 35.43),
        ];

        let report = svc.import(rows).await.unwrap();
        assert_eq!(
            report,
            ImportReport {
                total: 2,
                imported: 1,
                duplicates: 1,
                errors: 0
            }
        );
        assert!(svc.get_by_id("BAL_Kevin_Millar").await.is_ok());
    }

    #[tokio::test]
    async fn clear_all_reports_removed_count() {
        let svc = seeded().await;
        assert_eq!(svc.clear_all().await.unwrap(), 3);
        assert!(svc.get_all().await.unwrap().is_empty());
    }
}
